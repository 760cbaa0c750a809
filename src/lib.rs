//! # Eclipse Calculator
//!
//! Local circumstances and shadow ground tracks for solar eclipses, computed
//! from per-eclipse Besselian element polynomials.
//!
//! Given a record of Besselian elements (valid for a few hours around a
//! reference instant t₀) and a geodetic observer, the solver locates the
//! four contact times C1–C4 by bracketing and bisecting the penumbral and
//! umbral metric functions, selects the maximum-obscuration time, classifies
//! the eclipse at the location (none / partial / total / annular), and
//! derives magnitude and central duration. A separate tracer sweeps the
//! shadow axis across the window and emits coarse map overlay polygons for
//! the penumbral ("visible") and umbral ("central") bands.
//!
//! The crate does no ephemeris work of its own: elements and the ΔT offset
//! come precomputed with each record. All computation is pure and
//! re-entrant; results for a given input are byte-identical across runs on
//! the same IEEE-754 platform.
//!
//! ## Basic usage
//!
//! ```
//! use eclipse_calculator::{compute_circumstances, EclipseKind, EclipseRecord, Observer};
//!
//! // A shadow sweeping straight across the equator at 0.5 Earth radii per
//! // hour, central at (0°, 0°) at the reference instant.
//! let record = EclipseRecord {
//!     id: "demo".to_owned(),
//!     date_ymd: "2026-02-17".to_owned(),
//!     kind: EclipseKind::Total,
//!     t0_tt_hours: 12.0,
//!     delta_t_seconds: 69.0,
//!     tan_f1: 0.0046,
//!     tan_f2: 0.0046,
//!     x: vec![0.0, 0.5],
//!     y: vec![0.0],
//!     d: vec![0.0],
//!     mu: vec![0.0, 15.0],
//!     l1: vec![0.54],
//!     l2: vec![-0.005],
//!     greatest_eclipse_lat_deg: None,
//!     greatest_eclipse_lon_deg: None,
//!     greatest_eclipse_utc: None,
//! };
//!
//! let observer = Observer::new(0.0, 0.0);
//! let circumstances = compute_circumstances(&record, &observer)?;
//! assert!(circumstances.visible);
//! println!(
//!     "{:?} eclipse, max at {}",
//!     circumstances.kind_at_location,
//!     circumstances.max_utc.as_deref().unwrap_or("-"),
//! );
//! # Ok::<(), eclipse_calculator::EclipseError>(())
//! ```
//!
//! ## Overlays
//!
//! [`build_overlays`] consumes only the record and returns the polygon sets
//! for map rendering; see [`ShadowOverlays`].

mod geo;
mod math;
mod roots;
mod solver;
mod time;
mod track;
mod types;


pub use geo::observer_to_fundamental;
pub use solver::{
    compute_circumstances, compute_circumstances_with, geometry_at, InstantGeometry, SolverConfig,
};
pub use track::{build_overlays, build_overlays_with, GeoPoint, OverlayConfig, ShadowOverlays};
pub use types::{
    records_from_json, Circumstances, EclipseError, EclipseKind, EclipseRecord, LocalEclipseKind,
    Observer, SolverDebug,
};
