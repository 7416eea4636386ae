//! Great-circle distance between two coordinates.

use crate::models::LatLng;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometres.
///
/// Symmetric, non-negative and exactly zero for identical points. There is
/// no validation: NaN or out-of-range coordinates yield NaN (or a
/// meaningless number) rather than an error, callers validate upstream.
pub fn distance_km(a: LatLng, b: LatLng) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Round a distance for display (two decimals, as shown in the list).
pub fn round_distance(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}
