use crate::models::{BoundingBox, Coordinate};

/// Earth's radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometers per degree used by the planar radius metric
pub const KM_PER_DEGREE: f64 = 111.0;

/// Calculate the Haversine distance between two points in kilometers
///
/// Used for human-readable distance display only. The radius filter uses
/// [`approximate_distance`] instead.
#[inline]
pub fn haversine_distance(from: &Coordinate, to: &Coordinate) -> f64 {
    let lat1_rad = from.latitude.to_radians();
    let lat2_rad = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Planar approximation used by the radius filter
///
/// Euclidean distance in degree space scaled by 111 km per degree. It does
/// not shrink longitude with latitude, so it overestimates east-west
/// distances away from the equator. Radius filtering is defined in terms of
/// this metric, not the great-circle one.
#[inline]
pub fn approximate_distance(from: &Coordinate, to: &Coordinate) -> f64 {
    let delta_lat = to.latitude - from.latitude;
    let delta_lon = to.longitude - from.longitude;

    (delta_lat * delta_lat + delta_lon * delta_lon).sqrt() * KM_PER_DEGREE
}

/// Relative widening of the bounding box so rounding at its edges can never
/// reject a point that [`approximate_distance`] accepts
const BOUNDING_BOX_MARGIN: f64 = 1e-9;

/// Calculate a bounding box around a center point in the planar metric
///
/// Both axes use the same `radius_km / 111` degree delta, slightly widened,
/// so any point outside the box is also outside the circle of
/// [`approximate_distance`]. Cheap pre-check before the square root; the
/// metric itself decides the boundary.
pub fn calculate_bounding_box(center: &Coordinate, radius_km: f64) -> BoundingBox {
    let delta = radius_km / KM_PER_DEGREE * (1.0 + BOUNDING_BOX_MARGIN);

    BoundingBox {
        min_lat: center.latitude - delta,
        max_lat: center.latitude + delta,
        min_lon: center.longitude - delta,
        max_lon: center.longitude + delta,
    }
}

/// Check if a point is within a bounding box
#[inline]
pub fn is_within_bounding_box(point: &Coordinate, bbox: &BoundingBox) -> bool {
    point.latitude >= bbox.min_lat
        && point.latitude <= bbox.max_lat
        && point.longitude >= bbox.min_lon
        && point.longitude <= bbox.max_lon
}

/// Label for a display distance: metres under 1 km, otherwise one decimal km
pub fn format_distance(distance_km: f64) -> String {
    if distance_km < 1.0 {
        format!("{:.0} ม.", distance_km * 1000.0)
    } else {
        format!("{:.1} กม.", distance_km)
    }
}
