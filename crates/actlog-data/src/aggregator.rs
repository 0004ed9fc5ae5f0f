//! Aggregation over the loaded record table.
//!
//! Every operation here is a pure read: records go in, summary structures
//! come out, nothing is mutated.

use std::collections::{BTreeMap, HashMap};

use actlog_core::models::{Period, Record};
use actlog_core::time_utils::{clock_hour, clock_resolution};
use chrono::Weekday;

// ── FrequencyBucket ───────────────────────────────────────────────────────────

/// Counts accumulated for one calendar bucket.
#[derive(Debug, Clone, Default)]
pub struct FrequencyBucket {
    /// The bucket key, e.g. `"2024-01-15"` (day) or `"2024-01"` (month).
    pub key: String,
    /// Number of records in this bucket.
    pub records: u32,
    /// Sum of the records' repeat counts.
    pub repeats: u64,
    /// Per-kind record counts; records without a kind count as `"unknown"`.
    pub kind_counts: HashMap<String, u32>,
}

impl FrequencyBucket {
    fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    /// Accumulate `record` into the bucket.
    fn add(&mut self, record: &Record) {
        self.records += 1;
        self.repeats += u64::from(record.repeat);

        let kind = record
            .kind
            .clone()
            .unwrap_or_else(|| "unknown".to_string());
        *self.kind_counts.entry(kind).or_default() += 1;
    }
}

// ── WeekdayDistribution ───────────────────────────────────────────────────────

/// Record counts per weekday, Monday first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeekdayDistribution {
    counts: [u32; 7],
}

impl WeekdayDistribution {
    /// Axis labels, Monday first.
    pub const LABELS: [&'static str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

    /// Count for one weekday.
    pub fn get(&self, day: Weekday) -> u32 {
        self.counts[day.num_days_from_monday() as usize]
    }

    /// The seven counts, Monday first.
    pub fn counts(&self) -> &[u32; 7] {
        &self.counts
    }

    /// Sum of all seven counts.
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Iterate `(label, count)` pairs, Monday first.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u32)> + '_ {
        Self::LABELS.iter().copied().zip(self.counts.iter().copied())
    }
}

// ── KindProfile ───────────────────────────────────────────────────────────────

/// Occurrence counts over the clock for one kind of activity.
#[derive(Debug, Clone, PartialEq)]
pub struct KindProfile {
    /// Category label; `"unknown"` for records without one.
    pub kind: String,
    /// `(clock hour, occurrences)` pairs sorted by clock hour.
    pub points: Vec<(f64, u32)>,
}

// ── Aggregator ────────────────────────────────────────────────────────────────

/// Stateless helper that derives summary statistics from a record table.
pub struct Aggregator;

impl Aggregator {
    /// Bucket records by calendar period.
    ///
    /// Returns buckets sorted by key (ascending). Bucket record counts sum
    /// to the total record count.
    pub fn frequency(records: &[Record], period: Period) -> Vec<FrequencyBucket> {
        // Use BTreeMap for automatically sorted keys.
        let mut map: BTreeMap<String, FrequencyBucket> = BTreeMap::new();

        for record in records {
            let key = period.key(record.timestamp);
            map.entry(key.clone())
                .or_insert_with(|| FrequencyBucket::new(key))
                .add(record);
        }

        map.into_values().collect()
    }

    /// Count records per weekday, Monday through Sunday.
    pub fn weekday_distribution(records: &[Record]) -> WeekdayDistribution {
        let mut distribution = WeekdayDistribution::default();
        for record in records {
            distribution.counts[record.weekday().num_days_from_monday() as usize] += 1;
        }
        distribution
    }

    /// Reduce every record to a fractional clock hour.
    ///
    /// The minute component is quantised at a resolution adapted to the
    /// sample count (see [`clock_resolution`]).
    pub fn clock_samples(records: &[Record]) -> Vec<f64> {
        let resolution = clock_resolution(records.len());
        records
            .iter()
            .map(|r| clock_hour(r.timestamp, resolution))
            .collect()
    }

    /// Per-kind occurrence counts over the clock, sorted by kind.
    pub fn hourly_profile(records: &[Record]) -> Vec<KindProfile> {
        let resolution = clock_resolution(records.len());

        // Quantised clock positions keyed in minutes so they order correctly.
        let mut map: BTreeMap<String, BTreeMap<i64, u32>> = BTreeMap::new();
        for record in records {
            let clock = clock_hour(record.timestamp, resolution);
            let minutes = (clock * 60.0).round() as i64;
            let kind = record
                .kind
                .clone()
                .unwrap_or_else(|| "unknown".to_string());
            *map.entry(kind).or_default().entry(minutes).or_default() += 1;
        }

        map.into_iter()
            .map(|(kind, points)| KindProfile {
                kind,
                points: points
                    .into_iter()
                    .map(|(minutes, count)| (minutes as f64 / 60.0, count))
                    .collect(),
            })
            .collect()
    }

    /// Mean occurrence count across kinds at each clock position.
    pub fn mean_profile(profiles: &[KindProfile]) -> Vec<(f64, f64)> {
        let mut sums: BTreeMap<i64, (f64, u32)> = BTreeMap::new();
        for profile in profiles {
            for &(clock, count) in &profile.points {
                let minutes = (clock * 60.0).round() as i64;
                let entry = sums.entry(minutes).or_insert((0.0, 0));
                entry.0 += f64::from(count);
                entry.1 += 1;
            }
        }

        sums.into_iter()
            .map(|(minutes, (sum, n))| (minutes as f64 / 60.0, sum / f64::from(n)))
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
