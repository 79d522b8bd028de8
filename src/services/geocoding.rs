use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::models::{Address, Location};

/// Errors that can occur when talking to the geocoding provider
#[derive(Debug, Error)]
pub enum GeocodingError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Why an address produced no coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedReason {
    /// The provider answered but had no candidate for the address
    NoMatch,
    /// Transport, status or parsing failure
    ProviderFailure(String),
}

/// Outcome of a geocoding lookup
///
/// Callers must treat both unresolved reasons the same way; the reason exists
/// for logging.
#[derive(Debug, Clone, PartialEq)]
pub enum Geocoded {
    Resolved(Location),
    Unresolved(UnresolvedReason),
}

impl Geocoded {
    pub fn location(&self) -> Option<Location> {
        match self {
            Geocoded::Resolved(location) => Some(*location),
            Geocoded::Unresolved(_) => None,
        }
    }
}

/// Address to coordinate lookup
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve an address to its best single match; never fails
    async fn geocode(&self, address: &Address) -> Geocoded;
}

/// Mapbox Places geocoding client
///
/// One best-effort request per call: no retries, caching or rate limiting.
pub struct MapboxGeocoder {
    base_url: String,
    access_token: String,
    country: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    /// `[longitude, latitude]`
    coordinates: Vec<f64>,
}

impl MapboxGeocoder {
    /// Create a new Mapbox client
    pub fn new(
        base_url: String,
        access_token: String,
        country: String,
        timeout: Duration,
    ) -> Result<Self, GeocodingError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            access_token,
            country,
            client,
        })
    }

    fn places_url(&self, address: &Address) -> String {
        format!(
            "{}/geocoding/v5/mapbox.places/{}.json",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(&address.one_line())
        )
    }

    /// Query the provider, returning `None` when it has no candidate
    pub async fn lookup(&self, address: &Address) -> Result<Option<Location>, GeocodingError> {
        let url = self.places_url(address);

        tracing::debug!("Geocoding address in {}: {}", self.country, address.one_line());

        let response = self
            .client
            .get(&url)
            .query(&[
                ("access_token", self.access_token.as_str()),
                ("limit", "1"),
                ("country", self.country.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeocodingError::ApiError(format!(
                "Geocoding request failed: {}",
                response.status()
            )));
        }

        let body = response.bytes().await?;
        let collection: FeatureCollection = serde_json::from_slice(&body)
            .map_err(|e| GeocodingError::InvalidResponse(e.to_string()))?;

        let Some(feature) = collection.features.into_iter().next() else {
            return Ok(None);
        };

        match feature.geometry.coordinates.as_slice() {
            [longitude, latitude, ..] => Location::new(*latitude, *longitude)
                .map(Some)
                .map_err(|e| GeocodingError::InvalidResponse(e.to_string())),
            other => Err(GeocodingError::InvalidResponse(format!(
                "Expected [lon, lat] coordinates, got {} values",
                other.len()
            ))),
        }
    }
}

#[async_trait]
impl Geocoder for MapboxGeocoder {
    async fn geocode(&self, address: &Address) -> Geocoded {
        match self.lookup(address).await {
            Ok(Some(location)) => Geocoded::Resolved(location),
            Ok(None) => {
                tracing::info!("No geocoding match for {:?}", address.one_line());
                Geocoded::Unresolved(UnresolvedReason::NoMatch)
            }
            Err(e) => {
                tracing::warn!("Geocoding failed for {:?}: {}", address.one_line(), e);
                Geocoded::Unresolved(UnresolvedReason::ProviderFailure(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_places_url_encodes_address() {
        let geocoder = MapboxGeocoder::new(
            "https://api.mapbox.test/".to_string(),
            "token".to_string(),
            "NG".to_string(),
            Duration::from_secs(5),
        )
        .unwrap();

        let url = geocoder.places_url(&Address::new("12 Allen Avenue", "Ikeja", "100271"));
        assert_eq!(
            url,
            "https://api.mapbox.test/geocoding/v5/mapbox.places/12%20Allen%20Avenue%2C%20Ikeja%2C%20100271.json"
        );
    }

    #[test]
    fn test_geocoded_location() {
        let location = Location::new(6.6, 3.35).unwrap();
        assert_eq!(Geocoded::Resolved(location).location(), Some(location));
        assert_eq!(Geocoded::Unresolved(UnresolvedReason::NoMatch).location(), None);
    }
}
