//! Terrestrial Time instants and their UTC rendering.
//!
//! An eclipse record anchors its polynomials at t₀, given as a civil date
//! plus decimal hours in the TT scale. Instants are held as chrono UTC
//! date-times carrying TT values; the ΔT offset is applied only when a
//! time is rendered for output. All arithmetic is done in whole
//! milliseconds, rounding sub-millisecond fractions half away from zero.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use crate::types::EclipseError;

/// Builds the TT instant for a record's reference epoch.
///
/// `date_ymd` is a proleptic-Gregorian `YYYY-MM-DD` civil date; `tt_hours`
/// are decimal hours past civil midnight on that date, in TT. Hour values of
/// 24 and above carry into the following day(s).
///
/// # Errors
///
/// [`EclipseError::MalformedDate`] when the date does not parse, and
/// [`EclipseError::NonFiniteTime`] when `tt_hours` is NaN or infinite —
/// either way no output time could ever be built from the record.
pub(crate) fn tt_instant(date_ymd: &str, tt_hours: f64) -> Result<DateTime<Utc>, EclipseError> {
    let date = NaiveDate::parse_from_str(date_ymd, "%Y-%m-%d").map_err(|_| EclipseError::MalformedDate {
        date: date_ymd.to_owned(),
    })?;
    if !tt_hours.is_finite() {
        return Err(EclipseError::NonFiniteTime { value: tt_hours });
    }
    let midnight = date.and_time(NaiveTime::MIN).and_utc();
    Ok(midnight + Duration::milliseconds(hours_to_millis(tt_hours)))
}

/// The TT instant `t_hours` decimal hours after `t0`.
pub(crate) fn offset_hours(t0: DateTime<Utc>, t_hours: f64) -> DateTime<Utc> {
    t0 + Duration::milliseconds(hours_to_millis(t_hours))
}

/// Converts a TT instant to UTC by subtracting ΔT (TT − UTC, seconds).
///
/// ΔT may be negative for historical records.
pub(crate) fn tt_to_utc(tt: DateTime<Utc>, delta_t_seconds: f64) -> DateTime<Utc> {
    tt - Duration::milliseconds((delta_t_seconds * 1_000.0).round() as i64)
}

/// Formats an instant as `YYYY-MM-DDTHH:MM:SS.sssZ`, always with exactly
/// three fractional digits and the literal `Z` suffix.
pub(crate) fn format_utc_millis(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Decimal hours to whole milliseconds, half away from zero.
fn hours_to_millis(hours: f64) -> i64 {
    (hours * 3_600_000.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_instant_at_whole_hours() {
        let t0 = tt_instant("2027-08-02", 10.0).unwrap();
        assert_eq!(format_utc_millis(t0), "2027-08-02T10:00:00.000Z");
    }

    #[test]
    fn hours_carry_across_day_boundary() {
        // 23h 59m 59.9996s rounds up to the next midnight.
        let hours = 23.0 + 59.0 / 60.0 + 59.9996 / 3600.0;
        let t0 = tt_instant("2031-12-31", hours).unwrap();
        assert_eq!(format_utc_millis(t0), "2032-01-01T00:00:00.000Z");
    }

    #[test]
    fn negative_delta_t_shifts_utc_forward() {
        let hours = 23.0 + 59.0 / 60.0 + 59.9996 / 3600.0;
        let t0 = tt_instant("2031-12-31", hours).unwrap();
        let utc = tt_to_utc(t0, -2.2);
        assert_eq!(format_utc_millis(utc), "2032-01-01T00:00:02.200Z");
    }

    #[test]
    fn positive_delta_t_shifts_utc_back() {
        let t0 = tt_instant("2027-08-02", 10.0).unwrap();
        let utc = tt_to_utc(t0, 71.0);
        assert_eq!(format_utc_millis(utc), "2027-08-02T09:58:49.000Z");
    }

    #[test]
    fn offset_is_millisecond_exact() {
        let t0 = tt_instant("2027-08-02", 10.0).unwrap();
        let shifted = offset_hours(t0, -1.5);
        assert_eq!(format_utc_millis(shifted), "2027-08-02T08:30:00.000Z");
        // 1e-7 h tolerance of the bisection is ~0.36 ms; rounding keeps
        // the formatted value stable.
        let nearby = offset_hours(t0, -1.5 + 1.0e-7);
        assert_eq!(format_utc_millis(nearby), "2027-08-02T08:30:00.000Z");
    }

    #[test]
    fn malformed_dates_are_rejected() {
        assert!(matches!(
            tt_instant("2027-13-40", 0.0),
            Err(EclipseError::MalformedDate { .. })
        ));
        assert!(matches!(tt_instant("not-a-date", 0.0), Err(EclipseError::MalformedDate { .. })));
        assert!(matches!(tt_instant("", 12.0), Err(EclipseError::MalformedDate { .. })));
    }

    #[test]
    fn non_finite_hours_are_rejected() {
        assert!(matches!(
            tt_instant("2027-08-02", f64::NAN),
            Err(EclipseError::NonFiniteTime { .. })
        ));
    }

    #[test]
    fn formatting_keeps_three_fraction_digits() {
        let t0 = tt_instant("2024-04-08", 18.0 + 0.0425 / 3600.0).unwrap();
        assert_eq!(format_utc_millis(t0), "2024-04-08T18:00:00.043Z");
    }
}
