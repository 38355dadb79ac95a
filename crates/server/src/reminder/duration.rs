//! Rounding and display helpers for elapsed time.
//!
//! A month here is always exactly 30 days. Due dates are computed with real
//! calendar months in [`super::due`]; the two models are kept apart.

use time::Duration;

const HOURS_PER_DAY: f64 = 24.0;
const DAYS_PER_MONTH: f64 = 30.0;

/// Round to the nearest integer, with halves moving away from zero.
///
/// `floor(x + 0.5)` for non-negative input, `ceil(x - 0.5)` otherwise.
pub fn round_half_away_from_zero(x: f64) -> i64 {
    let rounded = if x < 0.0 {
        (x - 0.5).ceil()
    } else {
        (x + 0.5).floor()
    };
    rounded as i64
}

fn hours(d: Duration) -> f64 {
    d.as_seconds_f64() / 3600.0
}

/// Approximate month count of `d`, using 30-day months.
pub fn approximate_months(d: Duration) -> i64 {
    round_half_away_from_zero(hours(d) / HOURS_PER_DAY / DAYS_PER_MONTH)
}

/// German rendering of `d`, in days below one (rounded) month and in months otherwise.
pub fn humanize(d: Duration) -> String {
    let months = approximate_months(d);
    if months < 1 {
        let days = round_half_away_from_zero(hours(d) / HOURS_PER_DAY);
        format!("{days} Tagen")
    } else {
        format!("{months} Monaten")
    }
}
