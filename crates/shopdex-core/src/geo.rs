//! Great-circle distance math for radius searches.

/// Mean Earth radius in kilometers, matching the constant used by the
/// radius-search SQL.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine great-circle distance between two lat/lng points, in km.
///
/// Inputs are degrees.
#[must_use]
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}
