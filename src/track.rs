//! Ground-track overlays: coarse shadow polygons swept over the eclipse
//! window.
//!
//! Two polygon sets are produced per eclipse. The *visible* band is the
//! outer envelope of the penumbral outline across the window; the *central*
//! band follows the umbral/antumbral outline as a left/right edge pair with
//! caps. Outlines are traced by radial bisection along great-circle
//! bearings from the shadow-axis ground point, so no closed-form outline
//! model is needed.

use log::debug;
use serde::Serialize;

use crate::geo::{
    angular_distance_deg, destination_point_deg, initial_bearing_deg, spherical_interp,
};
use crate::math::{normalize_longitude_deg, polynomial};
use crate::solver::geometry_at;
use crate::types::{EclipseRecord, Observer};

/// Latitudes are clamped inside this bound to avoid pole singularities in
/// bearing math downstream.
const LAT_CLAMP_DEG: f64 = 89.9;

/// Tuning parameters for the ground-track tracer.
///
/// The defaults are the experimentally tuned values: the penumbra envelope
/// sweeps at ~6 min with 120 bearings out to 80°, the central band at
/// ~3 min with 72 bearings out to 10°, 22 radial bisection steps, and a
/// 0.08° Douglas–Peucker tolerance.
#[derive(Debug, Clone, Copy)]
pub struct OverlayConfig {
    /// Half-width of the sweep window around t₀, hours.
    pub window_hours: f64,
    /// Time step of the penumbra envelope sweep, hours.
    pub visible_step_hours: f64,
    /// Time step of the central band sweep, hours.
    pub central_step_hours: f64,
    /// Bearings per outline for the penumbra envelope.
    pub visible_bearings: usize,
    /// Bearings per outline for the central band.
    pub central_bearings: usize,
    /// Maximum search radius for penumbral boundaries, degrees of arc.
    pub visible_search_radius_deg: f64,
    /// Maximum search radius for umbral boundaries, degrees of arc.
    pub central_search_radius_deg: f64,
    /// Radial bisection iterations per bearing.
    pub radial_iterations: u32,
    /// Douglas–Peucker simplification tolerance, degrees.
    pub simplify_tolerance_deg: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            window_hours: 3.0,
            visible_step_hours: 0.1,
            central_step_hours: 0.05,
            visible_bearings: 120,
            central_bearings: 72,
            visible_search_radius_deg: 80.0,
            central_search_radius_deg: 10.0,
            radial_iterations: 22,
            simplify_tolerance_deg: 0.08,
        }
    }
}

/// A vertex of an overlay polygon. Latitude lies in [−89.9, 89.9] and
/// longitude in (−180, 180].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    pub lat_deg: f64,
    pub lon_deg: f64,
}

/// Overlay polygon sets for one eclipse.
///
/// Polygons are ordered vertex lists; the closing edge back to the first
/// vertex is implicit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShadowOverlays {
    /// Penumbra envelope: where any part of the eclipse is visible.
    pub visible: Vec<Vec<GeoPoint>>,
    /// Umbral/antumbral band: where the eclipse is central.
    pub central: Vec<Vec<GeoPoint>>,
}

/// Builds the overlay polygons with the default [`OverlayConfig`].
pub fn build_overlays(record: &EclipseRecord) -> ShadowOverlays {
    build_overlays_with(record, &OverlayConfig::default())
}

/// Builds the overlay polygons for one eclipse.
///
/// Pure: the same record and config always produce identical polygon sets.
/// A record whose shadow never intersects Earth (or whose elements are
/// non-finite) yields empty sets rather than an error.
pub fn build_overlays_with(record: &EclipseRecord, config: &OverlayConfig) -> ShadowOverlays {
    let visible = trace_visible_band(record, config);
    let central = trace_central_band(record, config);
    debug!(
        "record {}: visible band {} polygon(s), central band {} polygon(s)",
        record.id,
        visible.len(),
        central.len(),
    );
    ShadowOverlays { visible, central }
}

// ============================================================================
// Shadow-axis geometry
// ============================================================================

/// Ground point under the shadow axis at `t`, if the axis meets Earth.
///
/// For 1 < x² + y² ≤ 2.5 the axis grazes past the limb; the surface point
/// nearest the axis is still returned (ζ₀ = 0) so grazing frames anchor an
/// outline search. Beyond 2.5 the axis misses entirely.
fn shadow_axis_point(record: &EclipseRecord, t: f64) -> Option<GeoPoint> {
    let x = polynomial(&record.x, t);
    let y = polynomial(&record.y, t);
    let d = polynomial(&record.d, t).to_radians();
    let mu = polynomial(&record.mu, t);
    let r2 = x * x + y * y;
    if !r2.is_finite() || r2 > 2.5 {
        return None;
    }
    let zeta0 = if r2 < 1.0 { (1.0 - r2).sqrt() } else { 0.0 };
    let sin_lat = (d.sin() * zeta0 + y * d.cos()).clamp(-1.0, 1.0);
    let lat = sin_lat.asin().to_degrees();
    let hour_angle = x.atan2(d.cos() * zeta0 - y * d.sin()).to_degrees();
    let lon = normalize_longitude_deg(hour_angle - mu);
    if !lat.is_finite() || !lon.is_finite() {
        return None;
    }
    Some(GeoPoint {
        lat_deg: lat.clamp(-LAT_CLAMP_DEG, LAT_CLAMP_DEG),
        lon_deg: lon,
    })
}

/// Shadow membership metric at a ground point: negative inside the shadow,
/// positive outside, zero on the boundary.
fn shadow_metric(record: &EclipseRecord, t: f64, umbral: bool, point: GeoPoint) -> f64 {
    let observer = Observer::new(point.lat_deg, point.lon_deg);
    let g = geometry_at(record, &observer, t);
    if umbral {
        g.delta - g.l2_obs.abs()
    } else {
        g.delta - g.l1_obs
    }
}

/// Searches outward from `center` along one bearing for the shadow
/// boundary, out to `max_radius_deg` of great-circle arc.
///
/// Both endpoints non-negative means no boundary on this bearing; both
/// negative means the shadow extends past the search radius and the far
/// point is used. Otherwise the radius is bisected for a fixed number of
/// iterations.
fn radial_boundary(
    record: &EclipseRecord,
    t: f64,
    umbral: bool,
    center: GeoPoint,
    bearing_deg: f64,
    max_radius_deg: f64,
    iterations: u32,
) -> Option<GeoPoint> {
    let metric = |point: GeoPoint| shadow_metric(record, t, umbral, point);
    let f_center = metric(center);
    let (far_lat, far_lon) = destination_point_deg(center.lat_deg, center.lon_deg, bearing_deg, max_radius_deg);
    let far = GeoPoint { lat_deg: far_lat, lon_deg: far_lon };
    let f_far = metric(far);
    if !f_center.is_finite() || !f_far.is_finite() {
        return None;
    }
    if f_center >= 0.0 && f_far >= 0.0 {
        return None;
    }
    if f_center < 0.0 && f_far < 0.0 {
        return Some(far);
    }

    let mut lo = 0.0;
    let mut hi = max_radius_deg;
    let mut f_lo = f_center;
    for _ in 0..iterations {
        let mid = 0.5 * (lo + hi);
        let (lat, lon) = destination_point_deg(center.lat_deg, center.lon_deg, bearing_deg, mid);
        let fm = metric(GeoPoint { lat_deg: lat, lon_deg: lon });
        if !fm.is_finite() {
            return None;
        }
        if (fm < 0.0) == (f_lo < 0.0) {
            lo = mid;
            f_lo = fm;
        } else {
            hi = mid;
        }
    }
    let (lat, lon) = destination_point_deg(center.lat_deg, center.lon_deg, bearing_deg, 0.5 * (lo + hi));
    Some(GeoPoint { lat_deg: lat, lon_deg: lon })
}

/// One timestep's outline: the axis ground point and the boundary points
/// found around it.
struct Outline {
    center: GeoPoint,
    points: Vec<GeoPoint>,
}

fn trace_outline(
    record: &EclipseRecord,
    t: f64,
    umbral: bool,
    bearings: usize,
    max_radius_deg: f64,
    iterations: u32,
) -> Option<Outline> {
    let center = shadow_axis_point(record, t)?;
    let mut points = Vec::with_capacity(bearings);
    for step in 0..bearings {
        let bearing = step as f64 * 360.0 / bearings as f64;
        if let Some(point) = radial_boundary(record, t, umbral, center, bearing, max_radius_deg, iterations) {
            points.push(point);
        }
    }
    Some(Outline { center, points })
}

fn sweep_times(window_hours: f64, step_hours: f64) -> Vec<f64> {
    let mut times = Vec::new();
    if !(step_hours > 0.0) || !window_hours.is_finite() {
        return times;
    }
    let slack = step_hours * 1e-6;
    let mut step = 0u64;
    loop {
        let t = -window_hours + step as f64 * step_hours;
        if t > window_hours + slack {
            break;
        }
        times.push(t);
        step += 1;
    }
    times
}

// ============================================================================
// Penumbra envelope
// ============================================================================

fn trace_visible_band(record: &EclipseRecord, config: &OverlayConfig) -> Vec<Vec<GeoPoint>> {
    let mut boundary: Vec<GeoPoint> = Vec::new();
    for t in sweep_times(config.window_hours, config.visible_step_hours) {
        if let Some(outline) = trace_outline(
            record,
            t,
            false,
            config.visible_bearings,
            config.visible_search_radius_deg,
            config.radial_iterations,
        ) {
            boundary.extend(outline.points);
        }
    }
    if boundary.len() < 3 {
        return Vec::new();
    }

    // Keep, per bearing sector around the centroid, only the point farthest
    // out; the result is the outer envelope of all per-timestep outlines.
    let centroid = spherical_centroid(&boundary);
    let sectors = config.visible_bearings;
    let mut farthest: Vec<Option<(f64, GeoPoint)>> = vec![None; sectors];
    for point in &boundary {
        let bearing = initial_bearing_deg(centroid.lat_deg, centroid.lon_deg, point.lat_deg, point.lon_deg);
        let sector = ((bearing / 360.0 * sectors as f64).floor() as usize).min(sectors - 1);
        let distance = angular_distance_deg(centroid.lat_deg, centroid.lon_deg, point.lat_deg, point.lon_deg);
        let keep = match farthest[sector] {
            Some((best, _)) => distance > best,
            None => true,
        };
        if keep {
            farthest[sector] = Some((distance, *point));
        }
    }

    let filled = fill_empty_sectors(&farthest);
    if filled.is_empty() {
        return Vec::new();
    }
    vec![finalize_ring(filled)]
}

/// Replaces empty sectors by slerp between the nearest populated
/// neighbors on either side.
fn fill_empty_sectors(farthest: &[Option<(f64, GeoPoint)>]) -> Vec<GeoPoint> {
    let sectors = farthest.len();
    let populated: Vec<usize> = (0..sectors).filter(|&i| farthest[i].is_some()).collect();
    if populated.is_empty() {
        return Vec::new();
    }
    let mut ring = Vec::with_capacity(sectors);
    for sector in 0..sectors {
        if let Some((_, point)) = farthest[sector] {
            ring.push(point);
            continue;
        }
        // Nearest populated sector before and after, cyclically.
        let previous = *populated
            .iter()
            .rev()
            .find(|&&i| i < sector)
            .unwrap_or_else(|| populated.last().expect("non-empty"));
        let next = *populated
            .iter()
            .find(|&&i| i > sector)
            .unwrap_or_else(|| populated.first().expect("non-empty"));
        let gap = (next + sectors - previous) % sectors;
        if gap == 0 {
            // Single populated sector; reuse its point.
            let (_, point) = farthest[previous].expect("populated");
            ring.push(point);
            continue;
        }
        let offset = (sector + sectors - previous) % sectors;
        let fraction = offset as f64 / gap as f64;
        let (_, a) = farthest[previous].expect("populated");
        let (_, b) = farthest[next].expect("populated");
        let (lat, lon) = spherical_interp(a.lat_deg, a.lon_deg, b.lat_deg, b.lon_deg, fraction);
        ring.push(GeoPoint { lat_deg: lat, lon_deg: lon });
    }
    ring
}

/// Unit-vector mean of a point set, projected back to the sphere.
fn spherical_centroid(points: &[GeoPoint]) -> GeoPoint {
    let mut x = 0.0;
    let mut y = 0.0;
    let mut z = 0.0;
    for point in points {
        let lat = point.lat_deg.to_radians();
        let lon = point.lon_deg.to_radians();
        x += lat.cos() * lon.cos();
        y += lat.cos() * lon.sin();
        z += lat.sin();
    }
    let norm = (x * x + y * y + z * z).sqrt();
    if norm < 1e-9 {
        return GeoPoint { lat_deg: 0.0, lon_deg: 0.0 };
    }
    GeoPoint {
        lat_deg: (z / norm).clamp(-1.0, 1.0).asin().to_degrees(),
        lon_deg: normalize_longitude_deg(y.atan2(x).to_degrees()),
    }
}

// ============================================================================
// Central band
// ============================================================================

/// A central-band frame: outline points tagged with their signed offset
/// perpendicular to the sweep direction.
struct Frame {
    edge: Vec<(f64, GeoPoint)>,
}

fn trace_central_band(record: &EclipseRecord, config: &OverlayConfig) -> Vec<Vec<GeoPoint>> {
    let mut outlines: Vec<Outline> = Vec::new();
    for t in sweep_times(config.window_hours, config.central_step_hours) {
        if let Some(outline) = trace_outline(
            record,
            t,
            true,
            config.central_bearings,
            config.central_search_radius_deg,
            config.radial_iterations,
        ) {
            if !outline.points.is_empty() {
                outlines.push(outline);
            }
        }
    }
    if outlines.len() < 2 {
        return Vec::new();
    }

    let first_center = outlines.first().expect("len >= 2").center;
    let last_center = outlines.last().expect("len >= 2").center;
    let sweep_bearing = initial_bearing_deg(
        first_center.lat_deg,
        first_center.lon_deg,
        last_center.lat_deg,
        last_center.lon_deg,
    );

    let frames: Vec<Frame> = outlines
        .iter()
        .map(|outline| {
            let edge = outline
                .points
                .iter()
                .map(|point| {
                    let distance = angular_distance_deg(
                        outline.center.lat_deg,
                        outline.center.lon_deg,
                        point.lat_deg,
                        point.lon_deg,
                    );
                    let bearing = initial_bearing_deg(
                        outline.center.lat_deg,
                        outline.center.lon_deg,
                        point.lat_deg,
                        point.lon_deg,
                    );
                    let relative = normalize_longitude_deg(bearing - sweep_bearing);
                    (distance * relative.to_radians().sin(), *point)
                })
                .collect();
            Frame { edge }
        })
        .collect();

    let left_edge: Vec<GeoPoint> = frames
        .iter()
        .map(|frame| extreme_point(&frame.edge, false))
        .collect();
    let right_edge: Vec<GeoPoint> = frames
        .iter()
        .map(|frame| extreme_point(&frame.edge, true))
        .collect();

    // left edge forward, trailing cap across the last frame, right edge
    // backward, leading cap across the first frame back to the start.
    let mut trailing_cap: Vec<(f64, GeoPoint)> = frames.last().expect("len >= 2").edge.clone();
    trailing_cap.sort_by(|a, b| a.0.total_cmp(&b.0));
    let mut leading_cap: Vec<(f64, GeoPoint)> = frames.first().expect("len >= 2").edge.clone();
    leading_cap.sort_by(|a, b| a.0.total_cmp(&b.0));
    leading_cap.reverse();

    let mut ring: Vec<GeoPoint> = Vec::new();
    ring.extend(left_edge);
    ring.extend(trailing_cap.into_iter().map(|(_, point)| point));
    ring.extend(right_edge.into_iter().rev());
    ring.extend(leading_cap.into_iter().map(|(_, point)| point));

    unwrap_longitudes(&mut ring);
    let simplified = simplify_polyline(&ring, config.simplify_tolerance_deg);
    vec![finalize_ring(simplified)]
}

/// Point with the largest (`rightmost = true`) or smallest perpendicular
/// offset in a frame.
fn extreme_point(edge: &[(f64, GeoPoint)], rightmost: bool) -> GeoPoint {
    let chosen = if rightmost {
        edge.iter().max_by(|a, b| a.0.total_cmp(&b.0))
    } else {
        edge.iter().min_by(|a, b| a.0.total_cmp(&b.0))
    };
    chosen.expect("frames carry at least one point").1
}

// ============================================================================
// Polyline post-processing
// ============================================================================

/// Makes longitudes continuous along a polyline: any step beyond ±180° is
/// brought back by whole turns.
fn unwrap_longitudes(points: &mut [GeoPoint]) {
    for index in 1..points.len() {
        let previous = points[index - 1].lon_deg;
        let mut lon = points[index].lon_deg;
        while lon - previous > 180.0 {
            lon -= 360.0;
        }
        while lon - previous < -180.0 {
            lon += 360.0;
        }
        points[index].lon_deg = lon;
    }
}

/// Douglas–Peucker simplification in the (lon, lat) plane.
///
/// Endpoints are always kept. The tolerance is an angular distance in
/// degrees; the planar approximation is fine at overlay scale.
fn simplify_polyline(points: &[GeoPoint], tolerance_deg: f64) -> Vec<GeoPoint> {
    if points.len() <= 2 {
        return points.to_vec();
    }
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[points.len() - 1] = true;
    let mut spans = vec![(0usize, points.len() - 1)];
    while let Some((start, end)) = spans.pop() {
        if end <= start + 1 {
            continue;
        }
        let mut max_distance = 0.0;
        let mut max_index = start;
        for index in start + 1..end {
            let distance = perpendicular_distance(points[index], points[start], points[end]);
            if distance > max_distance {
                max_distance = distance;
                max_index = index;
            }
        }
        if max_distance > tolerance_deg {
            keep[max_index] = true;
            spans.push((start, max_index));
            spans.push((max_index, end));
        }
    }
    points
        .iter()
        .zip(keep)
        .filter_map(|(point, kept)| kept.then_some(*point))
        .collect()
}

fn perpendicular_distance(point: GeoPoint, start: GeoPoint, end: GeoPoint) -> f64 {
    let dx = end.lon_deg - start.lon_deg;
    let dy = end.lat_deg - start.lat_deg;
    let length2 = dx * dx + dy * dy;
    if length2 == 0.0 {
        return (point.lon_deg - start.lon_deg).hypot(point.lat_deg - start.lat_deg);
    }
    let along = ((point.lon_deg - start.lon_deg) * dx + (point.lat_deg - start.lat_deg) * dy) / length2;
    let along = along.clamp(0.0, 1.0);
    let nearest_lon = start.lon_deg + along * dx;
    let nearest_lat = start.lat_deg + along * dy;
    (point.lon_deg - nearest_lon).hypot(point.lat_deg - nearest_lat)
}

/// Output contract: latitude clamped inside ±89.9°, longitude in
/// (−180, 180].
fn finalize_ring(points: Vec<GeoPoint>) -> Vec<GeoPoint> {
    points
        .into_iter()
        .map(|point| GeoPoint {
            lat_deg: point.lat_deg.clamp(-LAT_CLAMP_DEG, LAT_CLAMP_DEG),
            lon_deg: normalize_longitude_deg(point.lon_deg),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EclipseKind;

    /// Same equatorial sweep geometry as the solver tests: the umbra
    /// crosses (0°, 0°) at t = 0 moving east.
    fn sweep_record() -> EclipseRecord {
        EclipseRecord {
            id: "sweep".to_owned(),
            date_ymd: "2026-02-17".to_owned(),
            kind: EclipseKind::Total,
            t0_tt_hours: 12.0,
            delta_t_seconds: 69.0,
            tan_f1: 0.0046,
            tan_f2: 0.0046,
            x: vec![0.0, 0.5],
            y: vec![0.0],
            d: vec![0.0],
            mu: vec![0.0, 15.0],
            l1: vec![0.54],
            l2: vec![-0.005],
            greatest_eclipse_lat_deg: None,
            greatest_eclipse_lon_deg: None,
            greatest_eclipse_utc: None,
        }
    }

    #[test]
    fn axis_point_at_reference_instant() {
        let point = shadow_axis_point(&sweep_record(), 0.0).unwrap();
        assert!(point.lat_deg.abs() < 1e-9);
        assert!(point.lon_deg.abs() < 1e-9);
    }

    #[test]
    fn axis_point_moves_east_with_the_sweep() {
        let point = shadow_axis_point(&sweep_record(), 1.0).unwrap();
        // x = 0.5 puts the axis 30° east of the sub-axis meridian; μ has
        // advanced 15°, leaving the ground point near 15°E.
        assert!(point.lat_deg.abs() < 1e-9);
        assert!((point.lon_deg - 15.0).abs() < 0.01, "lon = {}", point.lon_deg);
    }

    #[test]
    fn axis_misses_earth_when_far_off_plane() {
        let mut record = sweep_record();
        record.y = vec![2.0];
        assert!(shadow_axis_point(&record, 0.0).is_none());
    }

    #[test]
    fn radial_boundary_finds_umbral_edge() {
        let record = sweep_record();
        let center = shadow_axis_point(&record, 0.0).unwrap();
        for bearing in [0.0, 90.0, 180.0, 270.0] {
            let point = radial_boundary(&record, 0.0, true, center, bearing, 10.0, 22).unwrap();
            let radius = angular_distance_deg(center.lat_deg, center.lon_deg, point.lat_deg, point.lon_deg);
            // |L2obs| ≈ 0.0096 Earth radii ≈ 0.55° of arc at the sub-axis
            // point.
            assert!((0.3..0.9).contains(&radius), "bearing {bearing}: radius = {radius}");
        }
    }

    #[test]
    fn radial_boundary_reports_no_edge_outside_shadow() {
        let record = sweep_record();
        // A point well away from the shadow: both samples non-negative.
        let center = GeoPoint { lat_deg: 60.0, lon_deg: 120.0 };
        assert!(radial_boundary(&record, 0.0, true, center, 0.0, 10.0, 22).is_none());
    }

    #[test]
    fn central_band_hugs_the_equator() {
        let overlays = build_overlays(&sweep_record());
        assert_eq!(overlays.central.len(), 1);
        let band = &overlays.central[0];
        assert!(band.len() >= 8);
        for point in band {
            assert!(point.lat_deg.abs() < 1.0, "lat = {}", point.lat_deg);
            assert!((-75.0..=75.0).contains(&point.lon_deg), "lon = {}", point.lon_deg);
        }
    }

    #[test]
    fn visible_band_is_a_single_wide_ring() {
        let overlays = build_overlays(&sweep_record());
        assert_eq!(overlays.visible.len(), 1);
        let ring = &overlays.visible[0];
        assert_eq!(ring.len(), OverlayConfig::default().visible_bearings);
        let max_lat = ring.iter().map(|p| p.lat_deg.abs()).fold(0.0, f64::max);
        // Penumbra radius 0.54 Earth radii spans roughly 30° of arc.
        assert!(max_lat > 20.0 && max_lat < 60.0, "max |lat| = {max_lat}");
        for point in ring {
            assert!((-89.9..=89.9).contains(&point.lat_deg));
            assert!(point.lon_deg > -180.0 && point.lon_deg <= 180.0);
        }
    }

    #[test]
    fn overlays_are_idempotent() {
        let record = sweep_record();
        assert_eq!(build_overlays(&record), build_overlays(&record));
    }

    #[test]
    fn non_finite_elements_yield_empty_overlays() {
        let mut record = sweep_record();
        record.x = vec![f64::NAN];
        let overlays = build_overlays(&record);
        assert!(overlays.visible.is_empty());
        assert!(overlays.central.is_empty());
    }

    #[test]
    fn unwrap_keeps_polyline_continuous_across_dateline() {
        let mut points = vec![
            GeoPoint { lat_deg: 0.0, lon_deg: 179.0 },
            GeoPoint { lat_deg: 0.0, lon_deg: -179.0 },
            GeoPoint { lat_deg: 0.0, lon_deg: -178.0 },
        ];
        unwrap_longitudes(&mut points);
        assert_eq!(points[1].lon_deg, 181.0);
        assert_eq!(points[2].lon_deg, 182.0);
    }

    #[test]
    fn simplification_drops_collinear_points() {
        let line: Vec<GeoPoint> = (0..=10)
            .map(|i| GeoPoint { lat_deg: 0.0, lon_deg: f64::from(i) })
            .collect();
        let simplified = simplify_polyline(&line, 0.08);
        assert_eq!(simplified.len(), 2);
        assert_eq!(simplified[0], line[0]);
        assert_eq!(simplified[1], line[10]);
    }

    #[test]
    fn simplification_keeps_corners() {
        let corner = vec![
            GeoPoint { lat_deg: 0.0, lon_deg: 0.0 },
            GeoPoint { lat_deg: 0.0, lon_deg: 1.0 },
            GeoPoint { lat_deg: 1.0, lon_deg: 1.0 },
        ];
        let simplified = simplify_polyline(&corner, 0.08);
        assert_eq!(simplified.len(), 3);
    }
}
