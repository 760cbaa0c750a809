//! Geodetic and spherical geometry.
//!
//! The projector maps a WGS84 observer into the fundamental-plane frame of
//! an eclipse (direction cosines ξ, η, ζ in Earth-equatorial-radii). The
//! great-circle helpers serve the ground-track tracer; they work on a
//! spherical Earth, which is well within the tolerance of the coarse
//! overlay polygons.

use crate::math::{normalize_degrees_360, normalize_longitude_deg};

// ============================================================================
// Constants
// ============================================================================

/// WGS84 flattening.
const WGS84_FLATTENING: f64 = 1.0 / 298.257223563;

/// WGS84 first eccentricity squared, f·(2 − f).
const WGS84_E2: f64 = WGS84_FLATTENING * (2.0 - WGS84_FLATTENING);

/// WGS84 equatorial radius in meters.
const EARTH_EQUATORIAL_RADIUS_M: f64 = 6_378_137.0;

// ============================================================================
// Fundamental-plane projection
// ============================================================================

/// Projects a geodetic observer into the fundamental-plane frame.
///
/// The observer's hour angle is `μ + λ` (east-positive longitude); the
/// elevation enters in units of the equatorial radius.
///
/// # Arguments
/// * `lat_deg` - Geodetic latitude in degrees
/// * `lon_deg` - East-positive longitude in degrees
/// * `d_deg` - Declination of the shadow axis in degrees, from the
///   Besselian elements at the instant of interest
/// * `mu_deg` - Greenwich hour angle of the shadow axis in degrees
/// * `elev_m` - Elevation above the WGS84 ellipsoid in meters
///
/// # Returns
/// The direction cosines (ξ, η, ζ), dimensionless in
/// Earth-equatorial-radii, consistent with the Besselian x, y, l1, l2.
///
/// The arithmetic sequence below is fixed; reassociating it changes
/// last-bit results and breaks millisecond-level output snapshots.
pub fn observer_to_fundamental(lat_deg: f64, lon_deg: f64, d_deg: f64, mu_deg: f64, elev_m: f64) -> (f64, f64, f64) {
    let lat = lat_deg.to_radians();
    let lon = lon_deg.to_radians();
    let d = d_deg.to_radians();
    let mu = mu_deg.to_radians();

    let hour_angle = mu + lon;
    let h = elev_m / EARTH_EQUATORIAL_RADIUS_M;

    // Prime-vertical radius of curvature and the observer's geocentric
    // cylindrical components, ρ·cos φ′ and ρ·sin φ′.
    let n = 1.0 / (1.0 - WGS84_E2 * lat.sin() * lat.sin()).sqrt();
    let rho_cos_phi_prime = (n + h) * lat.cos();
    let rho_sin_phi_prime = (n * (1.0 - WGS84_E2) + h) * lat.sin();

    let xi = rho_cos_phi_prime * hour_angle.sin();
    let eta = rho_sin_phi_prime * d.cos() - rho_cos_phi_prime * hour_angle.cos() * d.sin();
    let zeta = rho_sin_phi_prime * d.sin() + rho_cos_phi_prime * hour_angle.cos() * d.cos();
    (xi, eta, zeta)
}

// ============================================================================
// Great-circle helpers (spherical Earth)
// ============================================================================

/// Haversine angular distance between two points, in degrees of arc.
pub(crate) fn angular_distance_deg(lat1_deg: f64, lon1_deg: f64, lat2_deg: f64, lon2_deg: f64) -> f64 {
    let lat1 = lat1_deg.to_radians();
    let lat2 = lat2_deg.to_radians();
    let dlat = (lat2_deg - lat1_deg).to_radians();
    let dlon = (lon2_deg - lon1_deg).to_radians();
    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    (2.0 * a.sqrt().min(1.0).asin()).to_degrees()
}

/// Forward azimuth from the first point towards the second, degrees in
/// [0, 360).
pub(crate) fn initial_bearing_deg(lat1_deg: f64, lon1_deg: f64, lat2_deg: f64, lon2_deg: f64) -> f64 {
    let lat1 = lat1_deg.to_radians();
    let lat2 = lat2_deg.to_radians();
    let dlon = (lon2_deg - lon1_deg).to_radians();
    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    normalize_degrees_360(y.atan2(x).to_degrees())
}

/// Destination reached from `(lat, lon)` along `bearing_deg` after
/// `distance_deg` degrees of great-circle arc.
///
/// Longitude of the result is normalized to (−180, 180].
pub(crate) fn destination_point_deg(lat_deg: f64, lon_deg: f64, bearing_deg: f64, distance_deg: f64) -> (f64, f64) {
    let lat = lat_deg.to_radians();
    let bearing = bearing_deg.to_radians();
    let arc = distance_deg.to_radians();

    let sin_lat2 = lat.sin() * arc.cos() + lat.cos() * arc.sin() * bearing.cos();
    let lat2 = sin_lat2.clamp(-1.0, 1.0).asin();
    let lon2 = lon_deg.to_radians()
        + (bearing.sin() * arc.sin() * lat.cos()).atan2(arc.cos() - lat.sin() * sin_lat2);
    (lat2.to_degrees(), normalize_longitude_deg(lon2.to_degrees()))
}

/// Interpolates between two points along the chord of the unit sphere.
///
/// Linear interpolation of the Cartesian direction vectors, projected back
/// to latitude/longitude. Precision is adequate for the overlay tolerance;
/// antipodal inputs (degenerate chord) fall back to the first point.
pub(crate) fn spherical_interp(
    lat1_deg: f64,
    lon1_deg: f64,
    lat2_deg: f64,
    lon2_deg: f64,
    fraction: f64,
) -> (f64, f64) {
    let (x1, y1, z1) = unit_vector(lat1_deg, lon1_deg);
    let (x2, y2, z2) = unit_vector(lat2_deg, lon2_deg);
    let x = x1 + (x2 - x1) * fraction;
    let y = y1 + (y2 - y1) * fraction;
    let z = z1 + (z2 - z1) * fraction;
    let norm = (x * x + y * y + z * z).sqrt();
    if norm < 1e-9 {
        return (lat1_deg, lon1_deg);
    }
    let lat = (z / norm).clamp(-1.0, 1.0).asin().to_degrees();
    let lon = y.atan2(x).to_degrees();
    (lat, crate::math::normalize_longitude_deg(lon))
}

fn unit_vector(lat_deg: f64, lon_deg: f64) -> (f64, f64, f64) {
    let lat = lat_deg.to_radians();
    let lon = lon_deg.to_radians();
    (lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
}
