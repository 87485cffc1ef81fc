//! Quantities with units: byte sizes and durations.
//!
//! Both types remember the unit they were written in so that a bound value
//! renders back to the text an operator would write (`42GB`, `10s`), while
//! equality compares the underlying quantity (`1024kB == 1MB`).

use std::fmt;
use std::str::FromStr;

/// Binary (1024-based) data size units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataUnit {
    Byte,
    Kilobyte,
    Megabyte,
    Gigabyte,
    Terabyte,
    Petabyte,
}

impl DataUnit {
    pub const ALL: [DataUnit; 6] = [
        DataUnit::Byte,
        DataUnit::Kilobyte,
        DataUnit::Megabyte,
        DataUnit::Gigabyte,
        DataUnit::Terabyte,
        DataUnit::Petabyte,
    ];

    pub const fn factor(self) -> u64 {
        match self {
            Self::Byte => 1,
            Self::Kilobyte => 1 << 10,
            Self::Megabyte => 1 << 20,
            Self::Gigabyte => 1 << 30,
            Self::Terabyte => 1 << 40,
            Self::Petabyte => 1 << 50,
        }
    }

    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Byte => "B",
            Self::Kilobyte => "kB",
            Self::Megabyte => "MB",
            Self::Gigabyte => "GB",
            Self::Terabyte => "TB",
            Self::Petabyte => "PB",
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            // "KB" is what most people type; "kB" is what we print.
            "KB" => Some(Self::Kilobyte),
            _ => Self::ALL.into_iter().find(|unit| unit.suffix() == suffix),
        }
    }
}

/// A non-negative number of bytes, expressed in some [`DataUnit`].
#[derive(Debug, Clone, Copy)]
pub struct DataSize {
    bytes: u64,
    unit: DataUnit,
}

impl DataSize {
    /// `DataSize::of(32, DataUnit::Megabyte)`
    pub const fn of(value: u64, unit: DataUnit) -> Self {
        Self {
            bytes: value.saturating_mul(unit.factor()),
            unit,
        }
    }

    pub const fn from_bytes(bytes: u64) -> Self {
        Self {
            bytes,
            unit: DataUnit::Byte,
        }
    }

    pub const fn to_bytes(self) -> u64 {
        self.bytes
    }

    pub const fn unit(self) -> DataUnit {
        self.unit
    }

    /// Magnitude in this size's own unit.
    pub fn value(self) -> f64 {
        self.bytes as f64 / self.unit.factor() as f64
    }
}

impl PartialEq for DataSize {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for DataSize {}

impl fmt::Display for DataSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Not whole in its own unit: fall back to the largest unit that
        // divides it, so the text parses back to the same byte count.
        let unit = if self.bytes % self.unit.factor() == 0 {
            self.unit
        } else {
            DataUnit::ALL
                .into_iter()
                .rev()
                .find(|unit| self.bytes % unit.factor() == 0)
                .unwrap_or(DataUnit::Byte)
        };
        write!(f, "{}{}", self.bytes / unit.factor(), unit.suffix())
    }
}

impl FromStr for DataSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (magnitude, suffix) = split_magnitude(s)?;
        let unit = DataUnit::from_suffix(suffix).ok_or_else(|| {
            format!("unknown data size unit '{suffix}' (valid units: B, kB, MB, GB, TB, PB)")
        })?;
        let bytes = scale(magnitude, unit.factor() as f64)?;
        Ok(Self { bytes, unit })
    }
}

/// Time units from nanoseconds to days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    pub const ALL: [TimeUnit; 7] = [
        TimeUnit::Nanoseconds,
        TimeUnit::Microseconds,
        TimeUnit::Milliseconds,
        TimeUnit::Seconds,
        TimeUnit::Minutes,
        TimeUnit::Hours,
        TimeUnit::Days,
    ];

    /// Length of one unit in nanoseconds.
    pub const fn nanos(self) -> u64 {
        match self {
            Self::Nanoseconds => 1,
            Self::Microseconds => 1_000,
            Self::Milliseconds => 1_000_000,
            Self::Seconds => 1_000_000_000,
            Self::Minutes => 60 * 1_000_000_000,
            Self::Hours => 60 * 60 * 1_000_000_000,
            Self::Days => 24 * 60 * 60 * 1_000_000_000,
        }
    }

    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Nanoseconds => "ns",
            Self::Microseconds => "us",
            Self::Milliseconds => "ms",
            Self::Seconds => "s",
            Self::Minutes => "m",
            Self::Hours => "h",
            Self::Days => "d",
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|unit| unit.suffix() == suffix)
    }
}

/// A non-negative span of time, expressed in some [`TimeUnit`].
///
/// Named after the quantity operators write in property files; convert with
/// [`Duration::to_std`] before handing it to timers.
#[derive(Debug, Clone, Copy)]
pub struct Duration {
    nanos: u64,
    unit: TimeUnit,
}

impl Duration {
    /// `Duration::of(3, TimeUnit::Minutes)`
    pub const fn of(value: u64, unit: TimeUnit) -> Self {
        Self {
            nanos: value.saturating_mul(unit.nanos()),
            unit,
        }
    }

    pub const fn unit(self) -> TimeUnit {
        self.unit
    }

    pub const fn to_nanos(self) -> u64 {
        self.nanos
    }

    pub const fn to_std(self) -> std::time::Duration {
        std::time::Duration::from_nanos(self.nanos)
    }

    /// Magnitude in this duration's own unit.
    pub fn value(self) -> f64 {
        self.nanos as f64 / self.unit.nanos() as f64
    }
}

impl PartialEq for Duration {
    fn eq(&self, other: &Self) -> bool {
        self.nanos == other.nanos
    }
}

impl Eq for Duration {}

impl PartialOrd for Duration {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Duration {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.nanos.cmp(&other.nanos)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = if self.nanos % self.unit.nanos() == 0 {
            self.unit
        } else {
            TimeUnit::ALL
                .into_iter()
                .rev()
                .find(|unit| self.nanos % unit.nanos() == 0)
                .unwrap_or(TimeUnit::Nanoseconds)
        };
        write!(f, "{}{}", self.nanos / unit.nanos(), unit.suffix())
    }
}

impl FromStr for Duration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (magnitude, suffix) = split_magnitude(s)?;
        let unit = TimeUnit::from_suffix(suffix).ok_or_else(|| {
            format!("unknown time unit '{suffix}' (valid units: ns, us, ms, s, m, h, d)")
        })?;
        let nanos = scale(magnitude, unit.nanos() as f64)?;
        Ok(Self { nanos, unit })
    }
}

/// Splits `"42 GB"` into `(42.0, "GB")`.
fn split_magnitude(s: &str) -> Result<(f64, &str), String> {
    let s = s.trim();
    let split = s
        .find(|c: char| c.is_ascii_alphabetic())
        .ok_or_else(|| "missing unit suffix".to_string())?;
    let (number, suffix) = s.split_at(split);
    let number = number.trim();
    if number.is_empty() {
        return Err("missing numeric magnitude".to_string());
    }
    let magnitude: f64 = number
        .parse()
        .map_err(|_| format!("'{number}' is not a number"))?;
    if !magnitude.is_finite() {
        return Err(format!("'{number}' is not a finite number"));
    }
    if magnitude < 0.0 {
        return Err("quantity must not be negative".to_string());
    }
    Ok((magnitude, suffix))
}

fn scale(magnitude: f64, factor: f64) -> Result<u64, String> {
    let scaled = (magnitude * factor).round();
    // `u64::MAX as f64` rounds up to 2^64, which itself does not fit.
    if scaled >= u64::MAX as f64 {
        return Err("quantity is too large".to_string());
    }
    Ok(scaled as u64)
}
