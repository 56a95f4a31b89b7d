//! Search domain module
//!
//! Geo-radius queries over indexed posts, with the content policy applied to
//! the results.

mod error;
mod query;
mod service;

pub use error::{HitDecodeFailure, SearchError};
pub use query::{distance_km, GeoRadiusQuery, Radius, SearchRequest, EARTH_RADIUS_KM};
pub use service::{ProximitySearchService, SearchConfig};
