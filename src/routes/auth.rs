use actix_web::dev::Payload;
use actix_web::http::{header, StatusCode};
use actix_web::{web, FromRequest, HttpRequest, HttpResponse, ResponseError};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use thiserror::Error;

use crate::models::{Actor, ErrorResponse, Role};

/// Errors raised while identifying the caller
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token subject is not a user id: {0}")]
    InvalidSubject(String),

    #[error("token verification is not configured")]
    NotConfigured,
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::NotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error = match self {
            AuthError::NotConfigured => "auth_not_configured",
            _ => "unauthorized",
        };

        HttpResponse::build(status).json(ErrorResponse {
            error: error.to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}

/// Claims carried by identity provider tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Numeric user id
    pub sub: String,
    pub role: Role,
    pub exp: usize,
}

/// HS256 bearer token verification against a shared secret
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;

        Self {
            decoding_key: DecodingKey::from_secret(secret),
            encoding_key: EncodingKey::from_secret(secret),
            validation,
        }
    }

    /// Resolve a token to the actor it was issued for; expired tokens are rejected
    pub fn verify(&self, token: &str) -> Result<Actor, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        let user_id = data
            .claims
            .sub
            .parse::<i64>()
            .map_err(|_| AuthError::InvalidSubject(data.claims.sub.clone()))?;

        Ok(Actor::new(user_id, data.claims.role))
    }

    /// Sign a token for `actor` that expires at the given unix timestamp
    pub fn issue(&self, actor: Actor, expires_at: usize) -> Result<String, AuthError> {
        let claims = Claims {
            sub: actor.user_id.to_string(),
            role: actor.role,
            exp: expires_at,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn authenticate(req: &HttpRequest) -> Result<Actor, AuthError> {
    let verifier = req
        .app_data::<web::Data<TokenVerifier>>()
        .ok_or(AuthError::NotConfigured)?;
    let token = bearer_token(req).ok_or(AuthError::MissingToken)?;

    verifier.verify(token).map_err(|e| {
        tracing::debug!("Rejected token on {}: {}", req.path(), e);
        e
    })
}

impl FromRequest for Actor {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
