use chrono::{DateTime, NaiveDateTime, Timelike};
use chrono_tz::Tz;
use tracing::warn;

// ── System timezone detection ─────────────────────────────────────────────────

/// Detect the IANA timezone name of the running system.
///
/// Falls back to `"UTC"` if detection fails.
pub fn get_system_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string())
}

// ── TimestampParser ───────────────────────────────────────────────────────────

/// Parses activity-log timestamps into local wall-clock time.
///
/// Inputs that carry a UTC offset (RFC 3339 and friends) are converted to
/// the configured timezone first, then the offset is dropped. Naive inputs
/// are taken as-is.
pub struct TimestampParser {
    tz: Tz,
}

/// Naive formats accepted for offset-free timestamps. The `*`-separated and
/// `DD/MM/YYYY` forms come from the plain activity-log export.
const NAIVE_FMTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d*%H:%M:%S",
    "%Y-%m-%d*%H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Offset-carrying formats that are not strict RFC 3339.
const OFFSET_FMTS: &[&str] = &["%Y-%m-%d %H:%M:%S %z", "%Y-%m-%d %H:%M:%S%z"];

impl TimestampParser {
    /// Create a parser for the given IANA timezone name.
    ///
    /// `"auto"` resolves to the system timezone. An unrecognised name falls
    /// back to UTC and logs a warning.
    pub fn new(tz_name: &str) -> Self {
        let resolved = if tz_name.eq_ignore_ascii_case("auto") {
            get_system_timezone()
        } else {
            tz_name.to_string()
        };
        let tz = resolved.parse::<Tz>().unwrap_or_else(|_| {
            warn!(
                "TimestampParser: unrecognised timezone \"{}\", falling back to UTC",
                resolved
            );
            Tz::UTC
        });
        Self { tz }
    }

    /// Parse a timestamp string into local wall-clock time.
    ///
    /// Returns `None` for empty strings or unrecognised formats.
    pub fn parse(&self, s: &str) -> Option<NaiveDateTime> {
        let s = s.trim().trim_matches('"');
        if s.is_empty() {
            return None;
        }

        // Replace a trailing 'Z' with an explicit zero offset.
        let normalised = if let Some(stripped) = s.strip_suffix('Z') {
            format!("{}+00:00", stripped)
        } else {
            s.to_string()
        };

        if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
            return Some(dt.with_timezone(&self.tz).naive_local());
        }

        for fmt in OFFSET_FMTS {
            if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
                return Some(dt.with_timezone(&self.tz).naive_local());
            }
        }

        for fmt in NAIVE_FMTS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(naive);
            }
        }

        None
    }

    /// Expose the configured timezone.
    pub fn timezone(&self) -> Tz {
        self.tz
    }
}

// ── Clock-hour quantisation ───────────────────────────────────────────────────

/// Minute-quantisation step for time-of-day statistics, adapted to the
/// sample count. Finer than six minutes stops being meaningful.
pub fn clock_resolution(samples: usize) -> f64 {
    if samples <= 50 {
        1.0 // whole hours
    } else if samples <= 100 {
        0.5 // every 30 minutes
    } else if samples <= 200 {
        0.25 // every 15 minutes
    } else {
        0.1 // every 6 minutes
    }
}

/// A timestamp's time-of-day as a fractional hour, minute component rounded
/// to `resolution`. Note that 23:58 at whole-hour resolution yields 24.0.
pub fn clock_hour(ts: NaiveDateTime, resolution: f64) -> f64 {
    let minute_frac = f64::from(ts.minute()) / 60.0;
    f64::from(ts.hour()) + (minute_frac / resolution).round() * resolution
}

// ── Tests ─────────────────────────────────────────────────────────────────────
