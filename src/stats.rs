//! ==============================================================================
//! stats.rs - dashboard statistics over a value series
//! ==============================================================================
//!
//! pure arithmetic, no io. mirrors the figures the dashboard script shows so
//! the same numbers are available from GET /light-sensor/stats.
//!
//! energy model: every reading stands for a constant 10 second interval, so
//! each value contributes `value * (10 / 3600)` watt-hours.
//!
//! ==============================================================================

use serde::Serialize;

/// seconds of sensor output a single reading is assumed to cover
pub const SAMPLE_INTERVAL_SECS: f64 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    /// running[i] = sum(values[..=i]) / (i + 1)
    pub running_average: Vec<f64>,
    pub energy_wh: f64,
}

impl Summary {
    pub fn from_values(values: &[f64]) -> Self {
        let mut running_average = Vec::with_capacity(values.len());
        let mut sum = 0.0;
        let mut energy_wh = 0.0;
        let mut min: Option<f64> = None;
        let mut max: Option<f64> = None;

        for (i, &v) in values.iter().enumerate() {
            sum += v;
            running_average.push(sum / (i + 1) as f64);
            energy_wh += v * (SAMPLE_INTERVAL_SECS / 3600.0);
            min = Some(min.map_or(v, |m| m.min(v)));
            max = Some(max.map_or(v, |m| m.max(v)));
        }

        let mean = if values.is_empty() { None } else { Some(sum / values.len() as f64) };

        Self { count: values.len(), min, max, mean, running_average, energy_wh }
    }

    /// two-decimal rendering used by the dashboard and the stats endpoint
    pub fn display(&self) -> SummaryDisplay {
        SummaryDisplay {
            count: self.count,
            min: self.min.map(format_2dp),
            max: self.max.map(format_2dp),
            mean: self.mean.map(format_2dp),
            energy_wh: format_2dp(self.energy_wh),
            running_average: self.running_average.iter().copied().map(format_2dp).collect(),
        }
    }
}

/// json body of GET /light-sensor/stats
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SummaryDisplay {
    pub count: usize,
    pub min: Option<String>,
    pub max: Option<String>,
    pub mean: Option<String>,
    pub energy_wh: String,
    pub running_average: Vec<String>,
}

/// two decimals the way the browser's `Number.prototype.toFixed(2)` prints them:
/// exact halfway values round away from zero, `-0` prints as `0.00`.
///
/// `{:.2}` already rounds the exact binary value; it only disagrees on exact
/// ties, where it goes half-to-even. a double sits exactly on a third-decimal
/// tie only when it is an odd multiple of 1/8 (.125, .375, .625, .875).
pub fn format_2dp(value: f64) -> String {
    if value.is_infinite() {
        return if value > 0.0 { "Infinity".to_string() } else { "-Infinity".to_string() };
    }
    if value == 0.0 {
        return "0.00".to_string();
    }

    let eighths = value * 8.0;
    if eighths.fract() == 0.0 && eighths.abs() < 2f64.powi(53) && (eighths as i64) % 2 != 0 {
        // |value| * 100 = 25k / 2 with 25k odd, so away-from-zero is (25k + 1) / 2
        let k = (eighths as i64).unsigned_abs() as u128;
        let hundredths = (25 * k + 1) / 2;
        let sign = if value < 0.0 { "-" } else { "" };
        return format!("{}{}.{:02}", sign, hundredths / 100, hundredths % 100);
    }

    format!("{:.2}", value)
}
