//! Geo-radius query model
//!
//! The search index receives a center, a radius and a result limit. The radius
//! travels to the index as a kilometer distance string (`"200km"`).

use std::fmt;

use super::SearchError;
use crate::post::Location;

/// Mean Earth radius in kilometers, as used by Elasticsearch's arc distance
pub const EARTH_RADIUS_KM: f64 = 6_371.008_771_4;

/// A search radius in kilometers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Radius {
    km: f64,
}

impl Radius {
    /// Radius applied when the caller does not send one
    pub const DEFAULT: Radius = Radius { km: 200.0 };

    /// Create a radius from a kilometer value
    ///
    /// # Errors
    ///
    /// Returns `SearchError::MalformedQuery` for negative, NaN or infinite values
    pub fn from_km(km: f64) -> Result<Self, SearchError> {
        if km.is_finite() && km >= 0.0 {
            Ok(Self { km })
        } else {
            Err(SearchError::malformed_query(format!(
                "radius must be a finite, non-negative number of kilometers, got {km}"
            )))
        }
    }

    /// Parse the bare number sent in the `range` request parameter
    ///
    /// The unit is not part of the input: callers send `"25"` and the
    /// kilometer suffix is appended when the query is rendered.
    pub fn parse_range(raw: &str) -> Result<Self, SearchError> {
        let km = raw.parse::<f64>().map_err(|err| {
            SearchError::malformed_query(format!("invalid range '{raw}': {err}"))
        })?;
        Self::from_km(km)
    }

    pub fn km(&self) -> f64 {
        self.km
    }
}

impl Default for Radius {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Radius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}km", self.km)
    }
}

/// Decoded search parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub center: Location,
    /// `None` means the service's default radius applies
    pub radius: Option<Radius>,
}

impl SearchRequest {
    pub fn new(center: Location, radius: Option<Radius>) -> Self {
        Self { center, radius }
    }

    /// Decode raw query parameters
    ///
    /// Coordinates are parsed lossily (see [`Location::parse_lossy`]). An
    /// absent or empty `range` falls back to the default radius; any other
    /// value must be a valid kilometer count.
    pub fn from_params(
        lat: Option<&str>,
        lon: Option<&str>,
        range: Option<&str>,
    ) -> Result<Self, SearchError> {
        let radius = match range {
            Some(raw) if !raw.is_empty() => Some(Radius::parse_range(raw)?),
            _ => None,
        };

        Ok(Self {
            center: Location::parse_lossy(lat, lon),
            radius,
        })
    }
}

/// All documents whose `location` lies within `radius` of `center`
#[derive(Debug, Clone, PartialEq)]
pub struct GeoRadiusQuery {
    pub center: Location,
    pub radius: Radius,
    /// Maximum number of hits the index should return
    pub limit: usize,
}

impl GeoRadiusQuery {
    pub fn new(center: Location, radius: Radius, limit: usize) -> Self {
        Self {
            center,
            radius,
            limit,
        }
    }

    /// Check whether `point` falls inside the query circle
    ///
    /// The boundary is inclusive: a point exactly `radius` away matches.
    pub fn matches(&self, point: &Location) -> bool {
        distance_km(&self.center, point) <= self.radius.km()
    }
}

/// Great-circle (haversine) distance between two points in kilometers
pub fn distance_km(a: &Location, b: &Location) -> f64 {
    let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
    let d_lat = lat2 - lat1;
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_renders_with_km_suffix() {
        assert_eq!(Radius::DEFAULT.to_string(), "200km");
        assert_eq!(Radius::parse_range("1").unwrap().to_string(), "1km");
        assert_eq!(Radius::parse_range("2.5").unwrap().to_string(), "2.5km");
    }

    #[test]
    fn test_radius_rejects_garbage() {
        assert!(matches!(
            Radius::parse_range("ten"),
            Err(SearchError::MalformedQuery(_))
        ));
        assert!(Radius::parse_range("-3").is_err());
        assert!(Radius::parse_range("NaN").is_err());
        assert!(Radius::parse_range("10km").is_err());
    }

    #[test]
    fn test_request_from_params_defaults() {
        let request = SearchRequest::from_params(Some("37"), Some("bad"), None).unwrap();
        assert_eq!(request.center, Location::new(37.0, 0.0));
        assert_eq!(request.radius, None);

        let request = SearchRequest::from_params(None, None, Some("")).unwrap();
        assert_eq!(request.radius, None);
    }

    #[test]
    fn test_request_center_is_always_finite() {
        let request = SearchRequest::from_params(Some("NaN"), Some("-inf"), None).unwrap();
        assert_eq!(request.center, Location::new(0.0, 0.0));
    }

    #[test]
    fn test_request_from_params_with_range() {
        let request = SearchRequest::from_params(Some("1"), Some("2"), Some("15")).unwrap();
        assert_eq!(request.radius, Some(Radius::from_km(15.0).unwrap()));
    }

    #[test]
    fn test_distance_known_value() {
        // One degree of latitude is roughly 111.2 km
        let d = distance_km(&Location::new(0.0, 0.0), &Location::new(1.0, 0.0));
        assert!((d - 111.19).abs() < 0.1, "got {d}");
    }

    #[test]
    fn test_matches_is_inclusive() {
        let center = Location::new(37.0, -120.0);
        let point = Location::new(37.05, -120.05);
        let exact = Radius::from_km(distance_km(&center, &point)).unwrap();

        assert!(GeoRadiusQuery::new(center, exact, 10).matches(&point));

        let shorter = Radius::from_km(exact.km() * 0.999).unwrap();
        assert!(!GeoRadiusQuery::new(center, shorter, 10).matches(&point));
    }
}
