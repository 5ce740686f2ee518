use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Sales time series
// ---------------------------------------------------------------------------

/// One point of the monthly sales series returned by the backend.
///
/// Both fields are defaulted so that a sparse backend payload (missing
/// months, missing totals) still deserializes into a usable point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesPoint {
    #[serde(default)]
    pub month: Option<String>,
    #[serde(default)]
    pub sales: f64,
}

// ---------------------------------------------------------------------------
// Growth between the two most recent points
// ---------------------------------------------------------------------------

/// Absolute and relative growth between the last two points of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthIndicator {
    /// Change between the two points, scaled down by 1000 (display units).
    pub growth: f64,
    /// Change relative to the earlier point, as a percentage.
    pub growth_percentage: f64,
}

/// Direction of the trend, derived from the growth percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Upward,
    Downward,
}

impl TrendDirection {
    /// Negative percentages point down, everything else (including zero)
    /// points up.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage < 0.0 {
            TrendDirection::Downward
        } else {
            TrendDirection::Upward
        }
    }
}

/// Compares the last point of `series` against the one before it.
///
/// A series with fewer than two points has nothing to compare against, so
/// both growth and percentage come out as zero. A genuine climb from a
/// zero-valued month is reported as 100%, while a degenerate comparison
/// (zero to zero, or a drop from zero) is reported as 0%.
pub fn calculate_growth<T>(series: &[T], value: impl Fn(&T) -> f64) -> GrowthIndicator {
    let value_end = series.last().map(&value).unwrap_or(0.0);
    let value_start = if series.len() >= 2 {
        value(&series[series.len() - 2])
    } else {
        value_end
    };

    let change = value_end - value_start;
    let raw_percent = change / value_start * 100.0;
    let change_percent = if raw_percent == f64::INFINITY {
        100.0
    } else if !raw_percent.is_finite() {
        0.0
    } else {
        raw_percent
    };

    GrowthIndicator {
        growth: ceil_excess_decimals(change / 1000.0),
        growth_percentage: (change_percent * 100.0).round() / 100.0,
    }
}

/// Rounds up to two decimal places, but only when the decimal form actually
/// carries more than two digits after the point. Values that already fit
/// pass through unchanged.
fn ceil_excess_decimals(value: f64) -> f64 {
    match value.to_string().split_once('.') {
        Some((_, fraction)) if fraction.len() > 2 => (value * 100.0).ceil() / 100.0,
        _ => value,
    }
}
