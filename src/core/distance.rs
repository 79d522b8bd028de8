use std::cmp::Ordering;

use geo::{GeodesicDistance, Point};
use serde::Deserialize;
use thiserror::Error;

use crate::models::{BoundingBox, Location};

/// Earth's mean radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Fewest kilometers spanned by one degree of latitude anywhere on the ellipsoid,
/// rounded down so bounding boxes err on the wide side
const MIN_KM_PER_DEGREE: f64 = 110.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceAreaError {
    #[error("service area radius must be a finite, non-negative number of km (got {0})")]
    InvalidRadius(f64),
}

/// How distances between two locations are measured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMethod {
    /// Ellipsoidal (WGS84) geodesic distance
    #[default]
    Geodesic,
    /// Spherical great-circle distance
    Haversine,
}

/// Circular region inside which job postings are accepted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServiceArea {
    center: Location,
    radius_km: f64,
}

impl ServiceArea {
    pub fn new(center: Location, radius_km: f64) -> Result<Self, ServiceAreaError> {
        if !radius_km.is_finite() || radius_km < 0.0 {
            return Err(ServiceAreaError::InvalidRadius(radius_km));
        }
        Ok(Self { center, radius_km })
    }

    pub fn center(&self) -> Location {
        self.center
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }
}

/// Distance calculations and service-area containment
///
/// The service area is fixed at construction and never changes afterwards.
#[derive(Debug, Clone, Copy)]
pub struct DistanceEngine {
    service_area: ServiceArea,
    method: DistanceMethod,
}

impl DistanceEngine {
    pub fn new(service_area: ServiceArea, method: DistanceMethod) -> Self {
        Self {
            service_area,
            method,
        }
    }

    pub fn service_area(&self) -> &ServiceArea {
        &self.service_area
    }

    pub fn method(&self) -> DistanceMethod {
        self.method
    }

    /// Great-circle distance in kilometers
    ///
    /// Symmetric bit-for-bit: the pair is put in a canonical order before measuring,
    /// so `distance(a, b) == distance(b, a)`. Identical points are exactly 0.
    pub fn distance(&self, a: Location, b: Location) -> f64 {
        if a == b {
            return 0.0;
        }

        let (from, to) = canonical_pair(a, b);
        match self.method {
            DistanceMethod::Geodesic => geodesic_distance(from, to),
            DistanceMethod::Haversine => haversine_distance(from, to),
        }
    }

    /// Distance from the service-area center
    pub fn distance_from_center(&self, location: Location) -> f64 {
        self.distance(location, self.service_area.center)
    }

    /// Whether a location lies inside the configured service area (boundary included)
    pub fn within_service_area(&self, location: Location) -> bool {
        self.distance_from_center(location) <= self.service_area.radius_km
    }
}

fn canonical_pair(a: Location, b: Location) -> (Location, Location) {
    let order = a
        .latitude
        .total_cmp(&b.latitude)
        .then_with(|| a.longitude.total_cmp(&b.longitude));

    match order {
        Ordering::Greater => (b, a),
        _ => (a, b),
    }
}

/// Calculate the ellipsoidal geodesic distance between two points in kilometers
#[inline]
pub fn geodesic_distance(a: Location, b: Location) -> f64 {
    let from = Point::new(a.longitude, a.latitude);
    let to = Point::new(b.longitude, b.latitude);
    from.geodesic_distance(&to) / 1000.0
}

/// Calculate the Haversine distance between two points in kilometers
#[inline]
pub fn haversine_distance(a: Location, b: Location) -> f64 {
    let lat1_rad = a.latitude.to_radians();
    let lat2_rad = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Calculate a bounding box around a center point
///
/// Used as a cheap storage pre-filter before exact distances are computed, so the
/// box is deliberately loose: every point within `radius_km` of `center` is inside it.
/// Boxes that would reach a pole or cross the antimeridian span all longitudes.
pub fn calculate_bounding_box(center: Location, radius_km: f64) -> BoundingBox {
    let lat_delta = radius_km.max(0.0) / MIN_KM_PER_DEGREE;

    let min_lat = center.latitude - lat_delta;
    let max_lat = center.latitude + lat_delta;

    let full_width = BoundingBox {
        min_lat: min_lat.max(-90.0),
        max_lat: max_lat.min(90.0),
        min_lon: -180.0,
        max_lon: 180.0,
    };

    if min_lat <= -90.0 || max_lat >= 90.0 {
        return full_width;
    }

    // Longitude degrees shrink towards the poles; size for the most poleward edge.
    let poleward = min_lat.abs().max(max_lat.abs());
    let lon_delta = lat_delta / poleward.to_radians().cos();

    let min_lon = center.longitude - lon_delta;
    let max_lon = center.longitude + lon_delta;

    if !lon_delta.is_finite() || min_lon < -180.0 || max_lon > 180.0 {
        return full_width;
    }

    BoundingBox {
        min_lat,
        max_lat,
        min_lon,
        max_lon,
    }
}

/// Check if a point is within a bounding box
#[inline]
pub fn is_within_bounding_box(location: Location, bbox: &BoundingBox) -> bool {
    location.latitude >= bbox.min_lat
        && location.latitude <= bbox.max_lat
        && location.longitude >= bbox.min_lon
        && location.longitude <= bbox.max_lon
}
