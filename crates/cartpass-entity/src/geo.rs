//! Geolocation value object.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair captured from a field device.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}
