//! Input records, observers, solver output and the error taxonomy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Catalog-level eclipse classification.
///
/// Descriptive only: the solver classifies per-location from the shadow
/// geometry and never trusts this field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EclipseKind {
    Total,
    Annular,
    Partial,
    Hybrid,
}

/// Local eclipse classification at an observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocalEclipseKind {
    /// No contact with the penumbra inside the search window.
    None,
    Partial,
    Total,
    Annular,
}

/// Besselian elements and metadata for a single eclipse.
///
/// Polynomial coefficient arrays are **lowest order first** and evaluated in
/// hours from the reference instant t₀. Missing higher orders are zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EclipseRecord {
    /// Opaque catalog key.
    pub id: String,
    /// Civil date of t₀ as `YYYY-MM-DD` (proleptic Gregorian, UTC civil
    /// date of the TT instant).
    pub date_ymd: String,
    /// Catalog classification; see [`EclipseKind`].
    pub kind: EclipseKind,
    /// Decimal hours of t₀ within `date_ymd`, TT scale. Values ≥ 24 carry
    /// into the next day.
    pub t0_tt_hours: f64,
    /// TT − UTC at t₀ in seconds; may be negative in historical records.
    pub delta_t_seconds: f64,
    /// Tangent of the penumbral cone half-angle.
    pub tan_f1: f64,
    /// Tangent of the umbral cone half-angle.
    pub tan_f2: f64,
    /// Shadow-axis x on the fundamental plane, Earth-radii.
    pub x: Vec<f64>,
    /// Shadow-axis y on the fundamental plane, Earth-radii.
    pub y: Vec<f64>,
    /// Declination of the shadow axis, degrees.
    pub d: Vec<f64>,
    /// Greenwich hour angle of the shadow axis, degrees.
    pub mu: Vec<f64>,
    /// Penumbral shadow radius on the fundamental plane, Earth-radii.
    pub l1: Vec<f64>,
    /// Umbral shadow radius on the fundamental plane, Earth-radii.
    pub l2: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greatest_eclipse_lat_deg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greatest_eclipse_lon_deg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greatest_eclipse_utc: Option<String>,
}

/// A geodetic observer on the WGS84 ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observer {
    /// Geodetic latitude in degrees, [−90, 90].
    pub lat_deg: f64,
    /// East-positive longitude in degrees; any value, wrapped by trig
    /// periodicity.
    pub lon_deg: f64,
    /// Elevation above the ellipsoid in meters.
    #[serde(default)]
    pub elev_m: f64,
}

impl Observer {
    /// Observer at sea level.
    pub fn new(lat_deg: f64, lon_deg: f64) -> Self {
        Self { lat_deg, lon_deg, elev_m: 0.0 }
    }

    /// Observer at a given elevation in meters.
    pub fn with_elevation(lat_deg: f64, lon_deg: f64, elev_m: f64) -> Self {
        Self { lat_deg, lon_deg, elev_m }
    }
}

/// Diagnostic payload attached to [`Circumstances`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverDebug {
    /// Penumbral metric roots, hours from t₀, ascending.
    pub penumbral_roots: Vec<f64>,
    /// Umbral metric roots, hours from t₀, ascending.
    pub umbral_roots: Vec<f64>,
    /// Number of penumbral brackets found by the coarse scan.
    pub penumbral_brackets: usize,
    /// Number of umbral brackets found by the coarse scan.
    pub umbral_brackets: usize,
    /// Selected maximum-obscuration time, hours from t₀.
    pub max_t_hours: f64,
}

/// Local circumstances of one eclipse for one observer.
///
/// Times are ISO-8601 UTC strings with millisecond precision
/// (`YYYY-MM-DDTHH:MM:SS.sssZ`). Absent contacts are `None`; `max_utc` is
/// always present.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Circumstances {
    pub eclipse_id: String,
    /// True when both external contacts (C1 and C4) exist in the window.
    pub visible: bool,
    pub kind_at_location: LocalEclipseKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub c1_utc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub c2_utc: Option<String>,
    pub max_utc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub c3_utc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub c4_utc: Option<String>,
    /// Fraction of the Sun's diameter covered at maximum, clipped to [0, 1].
    /// 1.0 for central eclipses; absent when not visible or degenerate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub magnitude: Option<f64>,
    /// Central duration (C3 − C2) in seconds; present iff both exist with
    /// C3 > C2.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<SolverDebug>,
}

/// Errors surfaced by the solver and the record ingester.
///
/// Numerical degeneracies (non-finite polynomial values, empty coefficient
/// arrays, missing roots) are never errors; they degrade to a well-formed
/// [`Circumstances`] with `visible = false`. Only structural malformations
/// that make output construction impossible are reported here.
#[derive(Error, Debug)]
pub enum EclipseError {
    /// The record's civil date does not parse as `YYYY-MM-DD`.
    #[error("malformed date `{date}` (expected YYYY-MM-DD)")]
    MalformedDate { date: String },

    /// A time-scale input (t₀ hours or ΔT) is NaN or infinite.
    #[error("non-finite time value {value}")]
    NonFiniteTime { value: f64 },

    /// Observer latitude outside [−90, 90] degrees.
    #[error("latitude {lat_deg} out of range [-90, 90]")]
    LatitudeOutOfRange { lat_deg: f64 },

    /// A record carried a non-finite numeric field at ingestion.
    #[error("record `{id}`: field `{field}` is not finite")]
    NonFiniteField { id: String, field: &'static str },

    /// A record carried a negative t₀ at ingestion.
    #[error("record `{id}`: t0TtHours is negative")]
    NegativeReferenceHours { id: String },

    /// The record payload is not valid JSON for the documented contract.
    #[error("record parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EclipseRecord {
    /// Validates the ingestion invariants: every numeric field finite and
    /// t₀ non-negative.
    ///
    /// The solver itself tolerates non-finite polynomial coefficients; this
    /// check belongs to the ingestion boundary, where the documented
    /// contract requires rejection.
    pub fn validate(&self) -> Result<(), EclipseError> {
        let scalars: [(&'static str, f64); 4] = [
            ("t0TtHours", self.t0_tt_hours),
            ("deltaTSeconds", self.delta_t_seconds),
            ("tanF1", self.tan_f1),
            ("tanF2", self.tan_f2),
        ];
        for (field, value) in scalars {
            if !value.is_finite() {
                return Err(EclipseError::NonFiniteField { id: self.id.clone(), field });
            }
        }
        let arrays: [(&'static str, &[f64]); 6] = [
            ("x", &self.x),
            ("y", &self.y),
            ("d", &self.d),
            ("mu", &self.mu),
            ("l1", &self.l1),
            ("l2", &self.l2),
        ];
        for (field, coefficients) in arrays {
            if coefficients.iter().any(|c| !c.is_finite()) {
                return Err(EclipseError::NonFiniteField { id: self.id.clone(), field });
            }
        }
        if self.t0_tt_hours < 0.0 {
            return Err(EclipseError::NegativeReferenceHours { id: self.id.clone() });
        }
        Ok(())
    }
}

/// Parses a JSON array of eclipse records and validates each one.
///
/// This is the ingestion side of the record contract: the array uses the
/// camelCase field names of [`EclipseRecord`], coefficient arrays lowest
/// order first. Records with non-finite numeric fields are rejected here,
/// naming the offending record and field; the solver downstream never sees
/// them.
///
/// # Errors
///
/// [`EclipseError::Json`] on malformed JSON, or the validation errors of
/// [`EclipseRecord::validate`].
pub fn records_from_json(json: &str) -> Result<Vec<EclipseRecord>, EclipseError> {
    let records: Vec<EclipseRecord> = serde_json::from_str(json)?;
    for record in &records {
        record.validate()?;
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"[{
            "id": "2027-08-02",
            "dateYmd": "2027-08-02",
            "kind": "total",
            "t0TtHours": 10.0,
            "deltaTSeconds": 71.0,
            "tanF1": 0.0046141,
            "tanF2": 0.0045912,
            "x": [-0.027796, 0.535674],
            "y": [0.164014, -0.213215],
            "d": [17.76247, -0.00625],
            "mu": [328.42249, 15.00357],
            "l1": [0.53503, -0.0000618],
            "l2": [-0.0148, -0.0000615],
            "greatestEclipseLatDeg": 25.5,
            "greatestEclipseLonDeg": 33.2
        }]"#
    }

    #[test]
    fn parses_camel_case_records() {
        let records = records_from_json(sample_json()).unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.kind, EclipseKind::Total);
        assert_eq!(record.t0_tt_hours, 10.0);
        assert_eq!(record.x, vec![-0.027796, 0.535674]);
        assert_eq!(record.greatest_eclipse_lat_deg, Some(25.5));
        assert_eq!(record.greatest_eclipse_utc, None);
    }

    #[test]
    fn round_trips_through_serde() {
        let records = records_from_json(sample_json()).unwrap();
        let json = serde_json::to_string(&records).unwrap();
        assert!(json.contains("\"dateYmd\""));
        assert!(json.contains("\"tanF1\""));
        let again = records_from_json(&json).unwrap();
        assert_eq!(records, again);
    }

    #[test]
    fn rejects_non_finite_fields() {
        let mut records = records_from_json(sample_json()).unwrap();
        records[0].l2[0] = f64::INFINITY;
        let err = records[0].validate().unwrap_err();
        assert!(matches!(err, EclipseError::NonFiniteField { field: "l2", .. }));
    }

    #[test]
    fn rejects_negative_reference_hours() {
        let mut records = records_from_json(sample_json()).unwrap();
        records[0].t0_tt_hours = -1.0;
        assert!(matches!(
            records[0].validate().unwrap_err(),
            EclipseError::NegativeReferenceHours { .. }
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(records_from_json("not json"), Err(EclipseError::Json(_))));
    }

    #[test]
    fn observer_defaults_to_sea_level() {
        let observer: Observer = serde_json::from_str(r#"{"latDeg": 10.0, "lonDeg": -3.0}"#).unwrap();
        assert_eq!(observer.elev_m, 0.0);
        assert_eq!(Observer::new(10.0, -3.0), observer);
    }
}
