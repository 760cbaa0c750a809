//! Local-circumstances solver: contact times, classification, magnitude and
//! central duration for one eclipse at one observer.
//!
//! The solver brackets the penumbral and umbral metric functions over a
//! fixed window around t₀, refines each bracket by bisection, and derives
//! everything else from the roots. Numerical degeneracies never raise: a
//! record whose metrics go non-finite or never change sign yields a
//! well-formed result with `visible = false`.

use std::cell::RefCell;
use std::collections::HashMap;

use log::{debug, trace};

use crate::geo::observer_to_fundamental;
use crate::math::polynomial;
use crate::roots::{bisect, bracket_roots, Bracket, DEFAULT_MAX_ITERATIONS};
use crate::time::{format_utc_millis, offset_hours, tt_instant, tt_to_utc};
use crate::types::{
    Circumstances, EclipseError, EclipseRecord, LocalEclipseKind, Observer, SolverDebug,
};

/// Tuning parameters for the contact solver.
///
/// The defaults are the experimentally tuned values: a ±3 h search window,
/// a 60 s coarse bracketing step, a 6 s fine scan step for the maximum
/// selection, and a bisection tolerance of 1e-7 h (≈0.36 ms).
#[derive(Debug, Clone, Copy)]
pub struct SolverConfig {
    /// Half-width of the search window around t₀, hours.
    pub window_hours: f64,
    /// Bracketing step for the coarse root scan, hours.
    pub coarse_step_hours: f64,
    /// Step of the fine scan that selects the maximum-obscuration time,
    /// hours.
    pub fine_step_hours: f64,
    /// Absolute bisection tolerance, hours.
    pub tolerance_hours: f64,
    /// Bisection iteration cap.
    pub max_bisection_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            window_hours: 3.0,
            coarse_step_hours: 1.0 / 60.0,
            fine_step_hours: 1.0 / 600.0,
            tolerance_hours: 1e-7,
            max_bisection_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Every geometric quantity of one record/observer pair at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstantGeometry {
    /// Hours from t₀, TT.
    pub t_hours: f64,
    pub x: f64,
    pub y: f64,
    /// Shadow-axis declination, degrees.
    pub d: f64,
    /// Shadow-axis Greenwich hour angle, degrees.
    pub mu: f64,
    pub l1: f64,
    pub l2: f64,
    pub xi: f64,
    pub eta: f64,
    pub zeta: f64,
    /// Distance from the shadow axis on the fundamental plane.
    pub delta: f64,
    /// Penumbral radius projected to the observer's tangent plane.
    pub l1_obs: f64,
    /// Umbral radius projected to the observer's tangent plane. Negative
    /// for a total shadow, positive for an annular one.
    pub l2_obs: f64,
}

/// Evaluates the six element polynomials and projects the observer at
/// `t_hours` from t₀.
pub fn geometry_at(record: &EclipseRecord, observer: &Observer, t_hours: f64) -> InstantGeometry {
    let x = polynomial(&record.x, t_hours);
    let y = polynomial(&record.y, t_hours);
    let d = polynomial(&record.d, t_hours);
    let mu = polynomial(&record.mu, t_hours);
    let l1 = polynomial(&record.l1, t_hours);
    let l2 = polynomial(&record.l2, t_hours);
    let (xi, eta, zeta) = observer_to_fundamental(observer.lat_deg, observer.lon_deg, d, mu, observer.elev_m);
    let delta = (x - xi).hypot(y - eta);
    let l1_obs = l1 - zeta * record.tan_f1;
    let l2_obs = l2 - zeta * record.tan_f2;
    InstantGeometry { t_hours, x, y, d, mu, l1, l2, xi, eta, zeta, delta, l1_obs, l2_obs }
}

/// Per-call geometry cache.
///
/// Each instant costs ~30 trig/polynomial operations and is probed by both
/// metric functions, so results are memoized on the exact bit pattern of t.
/// Keying on the bits (not a rounded value) keeps the floating-point
/// evaluation order identical between runs, which in turn keeps the output
/// strings byte-identical on a given platform.
struct MetricCache<'a> {
    record: &'a EclipseRecord,
    observer: Observer,
    cache: RefCell<HashMap<u64, InstantGeometry>>,
}

impl<'a> MetricCache<'a> {
    fn new(record: &'a EclipseRecord, observer: Observer) -> Self {
        Self { record, observer, cache: RefCell::new(HashMap::new()) }
    }

    fn geometry(&self, t_hours: f64) -> InstantGeometry {
        let key = t_hours.to_bits();
        if let Some(cached) = self.cache.borrow().get(&key) {
            return *cached;
        }
        let geometry = geometry_at(self.record, &self.observer, t_hours);
        self.cache.borrow_mut().insert(key, geometry);
        geometry
    }

    /// Δ − L1obs: zero at the external contacts C1/C4.
    fn penumbral_metric(&self, t_hours: f64) -> f64 {
        let g = self.geometry(t_hours);
        g.delta - g.l1_obs
    }

    /// Δ − |L2obs|: zero at the internal contacts C2/C3.
    fn umbral_metric(&self, t_hours: f64) -> f64 {
        let g = self.geometry(t_hours);
        g.delta - g.l2_obs.abs()
    }
}

/// Computes local circumstances with the default [`SolverConfig`].
///
/// Side-effect-free and re-entrant; see [`compute_circumstances_with`].
pub fn compute_circumstances(record: &EclipseRecord, observer: &Observer) -> Result<Circumstances, EclipseError> {
    compute_circumstances_with(record, observer, &SolverConfig::default())
}

/// Computes local circumstances for one record at one observer.
///
/// # Errors
///
/// Only structural malformations error out: an unparseable record date, a
/// non-finite t₀/ΔT (no output time could be formatted), or an observer
/// latitude outside [−90, 90]. Everything numeric degrades into the output
/// value instead: missing contacts, `visible = false`,
/// `kind_at_location = None`.
pub fn compute_circumstances_with(
    record: &EclipseRecord,
    observer: &Observer,
    config: &SolverConfig,
) -> Result<Circumstances, EclipseError> {
    if !(-90.0..=90.0).contains(&observer.lat_deg) {
        return Err(EclipseError::LatitudeOutOfRange { lat_deg: observer.lat_deg });
    }
    let t0_tt = tt_instant(&record.date_ymd, record.t0_tt_hours)?;
    if !record.delta_t_seconds.is_finite() {
        return Err(EclipseError::NonFiniteTime { value: record.delta_t_seconds });
    }

    let window = config.window_hours;
    let cache = MetricCache::new(record, *observer);

    let (penumbral_roots, penumbral_brackets) = collect_roots(
        |t| cache.penumbral_metric(t),
        window,
        config,
    );
    let (umbral_roots, umbral_brackets) = collect_roots(
        |t| cache.umbral_metric(t),
        window,
        config,
    );
    trace!(
        "record {}: {} penumbral roots ({} brackets), {} umbral roots ({} brackets)",
        record.id,
        penumbral_roots.len(),
        penumbral_brackets,
        umbral_roots.len(),
        umbral_brackets,
    );

    let c1 = penumbral_roots.first().copied();
    let c4 = if penumbral_roots.len() >= 2 { penumbral_roots.last().copied() } else { None };
    let (c2, c3) = if umbral_roots.len() >= 2 {
        (umbral_roots.first().copied(), umbral_roots.last().copied())
    } else {
        (None, None)
    };
    let visible = c1.is_some() && c4.is_some();

    // Maximum-obscuration selection and local classification. The umbral
    // pair takes the central branch only when it lies inside the penumbral
    // window [C1, C4]; an umbral pair outside it routes to partial.
    let (max_t, kind) = match (visible, c2, c3) {
        (true, Some(start), Some(end))
            if end > start
                && c1.is_some_and(|first| start >= first)
                && c4.is_some_and(|last| end <= last) =>
        {
            let max_t = scan_minimum(|t| cache.umbral_metric(t), start, end, config.fine_step_hours);
            let kind = if cache.geometry(max_t).l2_obs < 0.0 {
                LocalEclipseKind::Total
            } else {
                LocalEclipseKind::Annular
            };
            (max_t, kind)
        }
        (true, _, _) => {
            let start = c1.unwrap_or(-window);
            let end = c4.unwrap_or(window);
            let max_t = scan_minimum(|t| cache.penumbral_metric(t), start, end, config.fine_step_hours);
            (max_t, LocalEclipseKind::Partial)
        }
        _ => {
            let max_t = scan_minimum(|t| cache.geometry(t).delta, -window, window, config.fine_step_hours);
            (max_t, LocalEclipseKind::None)
        }
    };

    let to_utc = |t_hours: f64| -> Option<String> {
        if !t_hours.is_finite() {
            return None;
        }
        let tt = offset_hours(t0_tt, t_hours);
        Some(format_utc_millis(tt_to_utc(tt, record.delta_t_seconds)))
    };

    let duration_seconds = match (c2, c3) {
        (Some(start), Some(end)) if end > start => Some((end - start) * 3600.0),
        _ => None,
    };

    let magnitude = if visible {
        let g = cache.geometry(max_t);
        if !g.l1_obs.is_finite() || !g.delta.is_finite() || g.l1_obs <= 0.0 {
            None
        } else if kind == LocalEclipseKind::Total || kind == LocalEclipseKind::Annular {
            Some(1.0)
        } else {
            Some(((g.l1_obs - g.delta) / g.l1_obs).clamp(0.0, 1.0))
        }
    } else {
        None
    };

    debug!(
        "record {} at ({:.4}, {:.4}): {:?}, visible={}, duration={:?}",
        record.id, observer.lat_deg, observer.lon_deg, kind, visible, duration_seconds,
    );

    Ok(Circumstances {
        eclipse_id: record.id.clone(),
        visible,
        kind_at_location: kind,
        c1_utc: c1.and_then(|t| to_utc(t)),
        c2_utc: c2.and_then(|t| to_utc(t)),
        max_utc: to_utc(max_t),
        c3_utc: c3.and_then(|t| to_utc(t)),
        c4_utc: c4.and_then(|t| to_utc(t)),
        magnitude,
        duration_seconds,
        debug: Some(SolverDebug {
            penumbral_roots,
            umbral_roots,
            penumbral_brackets,
            umbral_brackets,
            max_t_hours: max_t,
        }),
    })
}

/// Brackets and refines every root of `metric` in the window, ascending.
fn collect_roots<F: Fn(f64) -> f64>(metric: F, window: f64, config: &SolverConfig) -> (Vec<f64>, usize) {
    let brackets: Vec<Bracket> = bracket_roots(&metric, -window, window, config.coarse_step_hours);
    let bracket_count = brackets.len();
    let mut roots: Vec<f64> = brackets
        .into_iter()
        .filter_map(|bracket| bisect(&metric, bracket, config.tolerance_hours, config.max_bisection_iterations))
        .map(|root| root.t_hours)
        .filter(|t| t.is_finite())
        .collect();
    roots.sort_by(f64::total_cmp);
    (roots, bracket_count)
}

/// Samples `f` on `[a, b]` at step `h` and returns the abscissa of the
/// smallest finite value. The first of equal minima wins, which keeps the
/// selection deterministic; if every sample is non-finite, `a` is returned.
fn scan_minimum<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, h: f64) -> f64 {
    if !(h > 0.0) || !a.is_finite() || !b.is_finite() {
        return a;
    }
    let slack = h * 1e-6;
    let mut best_t = a;
    let mut best_value = f64::INFINITY;
    let mut found = false;
    let mut step = 0u64;
    loop {
        let t = a + step as f64 * h;
        if t > b + slack {
            break;
        }
        let value = f(t);
        if value.is_finite() && value < best_value {
            best_value = value;
            best_t = t;
            found = true;
        }
        step += 1;
    }
    if found {
        best_t
    } else {
        a
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EclipseKind;

    /// A shadow sweeping straight over an equatorial observer: d = 0, the
    /// axis crosses the observer's meridian at t = 0 and moves east at
    /// 0.5 R/h against the observer's 15°/h rotation.
    fn sweep_record(y0: f64, l2_0: f64) -> EclipseRecord {
        EclipseRecord {
            id: "sweep".to_owned(),
            date_ymd: "2026-02-17".to_owned(),
            kind: EclipseKind::Total,
            t0_tt_hours: 12.0,
            delta_t_seconds: 69.0,
            tan_f1: 0.0046,
            tan_f2: 0.0046,
            x: vec![0.0, 0.5],
            y: vec![y0],
            d: vec![0.0],
            mu: vec![0.0, 15.0],
            l1: vec![0.54],
            l2: vec![l2_0],
            greatest_eclipse_lat_deg: None,
            greatest_eclipse_lon_deg: None,
            greatest_eclipse_utc: None,
        }
    }

    fn equator() -> Observer {
        Observer::new(0.0, 0.0)
    }

    #[test]
    fn central_total_passage() {
        let circumstances = compute_circumstances(&sweep_record(0.0, -0.005), &equator()).unwrap();
        assert!(circumstances.visible);
        assert_eq!(circumstances.kind_at_location, LocalEclipseKind::Total);
        assert_eq!(circumstances.magnitude, Some(1.0));
        let duration = circumstances.duration_seconds.unwrap();
        assert!((duration - 290.2).abs() < 5.0, "duration = {duration}");
        let debug = circumstances.debug.unwrap();
        assert_eq!(debug.penumbral_roots.len(), 2);
        assert_eq!(debug.umbral_roots.len(), 2);
        // C1 ~ -2.131 h, C2 ~ -0.0403 h, symmetric exits.
        assert!((debug.penumbral_roots[0] + 2.131).abs() < 0.01);
        assert!((debug.umbral_roots[0] + 0.0403).abs() < 0.001);
        assert!(debug.max_t_hours.abs() < 0.01);
    }

    #[test]
    fn annular_when_l2_obs_positive() {
        let circumstances = compute_circumstances(&sweep_record(0.0, 0.006), &equator()).unwrap();
        assert_eq!(circumstances.kind_at_location, LocalEclipseKind::Annular);
        assert_eq!(circumstances.magnitude, Some(1.0));
        let duration = circumstances.duration_seconds.unwrap();
        assert!((duration - 42.3).abs() < 3.0, "duration = {duration}");
    }

    #[test]
    fn partial_when_axis_misses_but_penumbra_does_not() {
        let circumstances = compute_circumstances(&sweep_record(0.3, -0.005), &equator()).unwrap();
        assert!(circumstances.visible);
        assert_eq!(circumstances.kind_at_location, LocalEclipseKind::Partial);
        assert!(circumstances.c2_utc.is_none());
        assert!(circumstances.c3_utc.is_none());
        assert!(circumstances.duration_seconds.is_none());
        let magnitude = circumstances.magnitude.unwrap();
        assert!((magnitude - 0.4397).abs() < 0.002, "magnitude = {magnitude}");
    }

    #[test]
    fn umbral_pair_outside_penumbral_window_is_partial() {
        // A runaway l2 makes the umbral metric cross zero at ±2.686 h,
        // outside the penumbral window [−2.131, +2.131]: the pair must not
        // drive a central classification.
        let circumstances = compute_circumstances(&sweep_record(0.0, 0.7), &equator()).unwrap();
        assert!(circumstances.visible);
        assert_eq!(circumstances.kind_at_location, LocalEclipseKind::Partial);
        let debug = circumstances.debug.as_ref().unwrap();
        assert_eq!(debug.umbral_roots.len(), 2);
        assert!((debug.umbral_roots[0] + 2.6865).abs() < 0.01);
        assert!((debug.penumbral_roots[0] + 2.1310).abs() < 0.01);
        assert!(debug.umbral_roots[0] < debug.penumbral_roots[0]);
        // The pair itself is still reported, timestamps and duration
        // included; only the classification routes to partial.
        assert!(circumstances.c2_utc.is_some());
        assert!(circumstances.c3_utc.is_some());
        let duration = circumstances.duration_seconds.unwrap();
        assert!((duration - 19342.8).abs() < 10.0, "duration = {duration}");
    }

    #[test]
    fn invisible_when_penumbra_misses() {
        let circumstances = compute_circumstances(&sweep_record(2.0, -0.005), &equator()).unwrap();
        assert!(!circumstances.visible);
        assert_eq!(circumstances.kind_at_location, LocalEclipseKind::None);
        assert!(circumstances.c1_utc.is_none());
        assert!(circumstances.c4_utc.is_none());
        assert!(circumstances.max_utc.is_some());
        assert!(circumstances.magnitude.is_none());
    }

    #[test]
    fn metric_functions_match_geometry() {
        let record = sweep_record(0.1, -0.005);
        let observer = equator();
        let cache = MetricCache::new(&record, observer);
        for step in -30..=30 {
            let t = f64::from(step) * 0.1;
            let g = geometry_at(&record, &observer, t);
            assert_eq!(cache.penumbral_metric(t), g.delta - g.l1_obs);
            assert_eq!(cache.umbral_metric(t), g.delta - g.l2_obs.abs());
        }
    }

    #[test]
    fn cache_returns_identical_geometry() {
        let record = sweep_record(0.0, -0.005);
        let cache = MetricCache::new(&record, equator());
        let first = cache.geometry(0.123456789);
        let second = cache.geometry(0.123456789);
        assert_eq!(first, second);
    }

    #[test]
    fn solver_is_deterministic() {
        let record = sweep_record(0.0, -0.005);
        let first = compute_circumstances(&record, &equator()).unwrap();
        let second = compute_circumstances(&record, &equator()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        let record = sweep_record(0.0, -0.005);
        assert!(matches!(
            compute_circumstances(&record, &Observer::new(91.0, 0.0)),
            Err(EclipseError::LatitudeOutOfRange { .. })
        ));
        assert!(matches!(
            compute_circumstances(&record, &Observer::new(f64::NAN, 0.0)),
            Err(EclipseError::LatitudeOutOfRange { .. })
        ));
    }

    #[test]
    fn surfaces_malformed_date() {
        let mut record = sweep_record(0.0, -0.005);
        record.date_ymd = "02/17/2026".to_owned();
        assert!(matches!(
            compute_circumstances(&record, &equator()),
            Err(EclipseError::MalformedDate { .. })
        ));
    }

    #[test]
    fn tolerates_nan_polynomials() {
        let mut record = sweep_record(0.0, -0.005);
        record.x = vec![f64::NAN];
        let circumstances = compute_circumstances(&record, &equator()).unwrap();
        assert!(!circumstances.visible);
        assert_eq!(circumstances.kind_at_location, LocalEclipseKind::None);
        assert!(circumstances.max_utc.is_some());
    }

    #[test]
    fn contact_ordering_is_strict_for_central_eclipses() {
        let circumstances = compute_circumstances(&sweep_record(0.0, -0.005), &equator()).unwrap();
        let debug = circumstances.debug.as_ref().unwrap();
        let c1 = debug.penumbral_roots[0];
        let c4 = *debug.penumbral_roots.last().unwrap();
        let c2 = debug.umbral_roots[0];
        let c3 = *debug.umbral_roots.last().unwrap();
        assert!(c1 < c2 && c2 < debug.max_t_hours && debug.max_t_hours < c3 && c3 < c4);
    }
}
