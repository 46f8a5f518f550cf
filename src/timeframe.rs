//! Static table of the display timeframes and their fetch parameters.

use std::fmt;

/// Key of the timeframe selected at startup unless configured otherwise.
pub const DEFAULT_TIMEFRAME: &str = "24h";

/// Spacing between samples requested from the history endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleGranularity {
    FiveMinutes,
    ThirtyMinutes,
    Hourly,
    Daily,
}

impl SampleGranularity {
    /// Returns the `interval` query value, or `None` to let the API pick
    /// its automatic granularity for the requested span.
    pub fn interval_param(&self) -> Option<&'static str> {
        match self {
            SampleGranularity::FiveMinutes | SampleGranularity::ThirtyMinutes => None,
            SampleGranularity::Hourly => Some("hourly"),
            SampleGranularity::Daily => Some("daily"),
        }
    }
}

/// Tick unit of the chart's time axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisUnit {
    Minute,
    Hour,
    Day,
}

impl AxisUnit {
    /// `chrono` format string for axis labels in this unit.
    pub fn label_format(&self) -> &'static str {
        match self {
            AxisUnit::Minute => "%H:%M:%S",
            AxisUnit::Hour => "%H:%M",
            AxisUnit::Day => "%d/%m",
        }
    }
}

/// Fetch and display parameters for one timeframe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeframeConfig {
    pub key: &'static str,
    pub lookback_days: u32,
    pub granularity: SampleGranularity,
    pub label: &'static str,
    pub axis_unit: AxisUnit,
}

impl fmt::Display for TimeframeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key)
    }
}

const TIMEFRAMES: [TimeframeConfig; 4] = [
    TimeframeConfig {
        key: "24h",
        lookback_days: 1,
        granularity: SampleGranularity::Hourly,
        label: "24 Hours",
        axis_unit: AxisUnit::Hour,
    },
    TimeframeConfig {
        key: "7d",
        lookback_days: 7,
        granularity: SampleGranularity::Hourly,
        label: "7 Days",
        axis_unit: AxisUnit::Day,
    },
    TimeframeConfig {
        key: "30d",
        lookback_days: 30,
        granularity: SampleGranularity::Daily,
        label: "30 Days",
        axis_unit: AxisUnit::Day,
    },
    TimeframeConfig {
        key: "90d",
        lookback_days: 90,
        granularity: SampleGranularity::Daily,
        label: "90 Days",
        axis_unit: AxisUnit::Day,
    },
];

/// All configured timeframes in display order.
pub fn all() -> &'static [TimeframeConfig] {
    &TIMEFRAMES
}

/// Looks up a timeframe by key.
pub fn lookup(key: &str) -> Option<&'static TimeframeConfig> {
    TIMEFRAMES.iter().find(|tf| tf.key == key)
}

/// Display index of a timeframe key.
pub fn position(key: &str) -> Option<usize> {
    TIMEFRAMES.iter().position(|tf| tf.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timeframe_is_registered() {
        assert!(lookup(DEFAULT_TIMEFRAME).is_some());
    }

    #[test]
    fn keys_are_unique() {
        for (i, tf) in all().iter().enumerate() {
            assert_eq!(position(tf.key), Some(i), "duplicate key {}", tf.key);
        }
    }

    #[test]
    fn lookup_unknown_key() {
        assert!(lookup("1y").is_none());
        assert!(position("").is_none());
    }

    #[test]
    fn interval_param_only_for_explicit_granularity() {
        assert_eq!(SampleGranularity::FiveMinutes.interval_param(), None);
        assert_eq!(SampleGranularity::ThirtyMinutes.interval_param(), None);
        assert_eq!(SampleGranularity::Hourly.interval_param(), Some("hourly"));
        assert_eq!(SampleGranularity::Daily.interval_param(), Some("daily"));
    }

    #[test]
    fn lookback_grows_with_display_order() {
        let days: Vec<u32> = all().iter().map(|tf| tf.lookback_days).collect();
        assert!(days.windows(2).all(|w| w[0] < w[1]));
    }
}
