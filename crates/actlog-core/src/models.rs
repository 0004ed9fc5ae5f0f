use chrono::{Datelike, NaiveDateTime, Weekday};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One logged activity event.
///
/// `timestamp` is local wall-clock time; inputs that carry a UTC offset are
/// localised before the offset is dropped. `kind` may be absent depending on
/// the data source. Records are immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// When the activity happened (local wall-clock).
    pub timestamp: NaiveDateTime,
    /// How many times the activity was repeated in this entry.
    #[serde(default = "default_repeat")]
    pub repeat: u32,
    /// Optional category label.
    #[serde(default)]
    pub kind: Option<String>,
}

fn default_repeat() -> u32 {
    1
}

impl Record {
    /// Weekday of the record's timestamp.
    pub fn weekday(&self) -> Weekday {
        self.timestamp.weekday()
    }
}

/// Calendar bucket size for the frequency-over-time aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// One bucket per calendar day.
    Day,
    /// One bucket per ISO week.
    Week,
    /// One bucket per calendar month.
    Month,
}

impl Period {
    /// String bucket key for `ts`, e.g. `"2024-01-15"`, `"2024-W03"` or
    /// `"2024-01"`. Keys sort chronologically within one period kind.
    pub fn key(&self, ts: NaiveDateTime) -> String {
        match self {
            Period::Day => ts.format("%Y-%m-%d").to_string(),
            Period::Week => ts.format("%G-W%V").to_string(),
            Period::Month => ts.format("%Y-%m").to_string(),
        }
    }

    /// Human-readable name used in axis labels.
    pub fn label(&self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Chart selector exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChartKind {
    /// Frequency per time period.
    Freq,
    /// Day-of-week distribution.
    Day,
    /// Kernel density estimate of time-of-day.
    Kde,
    /// Per-kind activity over the hours of a day.
    Hours,
    /// Every chart, each as its own file.
    All,
}
