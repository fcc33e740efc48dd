//! Calendar bucket labels
//!
//! Each label type knows its complete label set up front, so bucket maps can
//! be created with every label present and zeroed before any tree is placed.

use crate::error::{CoreError, Result};
use chrono::{DateTime, Datelike, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Hours subtracted from the local hour before hour-of-day bucketing
pub const DEFAULT_HOUR_SHIFT: u8 = 2;

/// What to do with day 366 of a leap year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeapDayPolicy {
    /// Count 31 December of a leap year as day 365
    #[default]
    Fold,
    /// Fail with [`CoreError::LeapDayOutOfRange`]
    Reject,
}

/// Conversion from epoch milliseconds to local calendar time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeSettings {
    /// Local zone as a fixed offset east of UTC, in minutes
    pub utc_offset_minutes: i32,
    /// Rotation applied to the local hour, modulo 24
    pub hour_shift: u8,
    /// Handling of day 366
    pub leap_day: LeapDayPolicy,
}

impl Default for TimeSettings {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            hour_shift: DEFAULT_HOUR_SHIFT,
            leap_day: LeapDayPolicy::Fold,
        }
    }
}

impl TimeSettings {
    /// Local calendar time of a millisecond timestamp
    pub fn local_time(&self, timestamp_ms: i64) -> Result<DateTime<FixedOffset>> {
        let offset = FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).ok_or(
            CoreError::InvalidUtcOffset {
                minutes: self.utc_offset_minutes,
            },
        )?;
        let utc = DateTime::from_timestamp_millis(timestamp_ms)
            .ok_or(CoreError::InvalidTimestamp { timestamp_ms })?;
        Ok(utc.with_timezone(&offset))
    }
}

/// A bucket label derived from a root post's timestamp
pub trait BucketKey: Copy + Ord + fmt::Debug + fmt::Display {
    /// Human-readable name of the grouping
    const GROUPING: &'static str;

    /// The complete label set, in display order
    fn all() -> Vec<Self>;

    /// Label for a millisecond timestamp
    fn from_timestamp(timestamp_ms: i64, time: &TimeSettings) -> Result<Self>;
}

/// Bucket map with every label of `K` present and set to `V::default()`
pub fn zeroed_buckets<K: BucketKey, V: Default>() -> BTreeMap<K, V> {
    K::all().into_iter().map(|key| (key, V::default())).collect()
}

/// Day of the week
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    /// Monday
    Monday,
    /// Tuesday
    Tuesday,
    /// Wednesday
    Wednesday,
    /// Thursday
    Thursday,
    /// Friday
    Friday,
    /// Saturday
    Saturday,
    /// Sunday
    Sunday,
}

impl Weekday {
    const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Full English day name
    pub fn name(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        Weekday::ALL[day.num_days_from_monday() as usize]
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl BucketKey for Weekday {
    const GROUPING: &'static str = "weekday";

    fn all() -> Vec<Self> {
        Self::ALL.to_vec()
    }

    fn from_timestamp(timestamp_ms: i64, time: &TimeSettings) -> Result<Self> {
        Ok(time.local_time(timestamp_ms)?.weekday().into())
    }
}

/// Shifted hour of the day, 0..=23
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HourOfDay(u8);

impl HourOfDay {
    /// Bucket for a local hour after rotating it back by `shift` hours
    pub fn shifted(local_hour: u32, shift: u8) -> Self {
        let hour = (local_hour % 24 + 24 - u32::from(shift % 24)) % 24;
        HourOfDay(hour as u8)
    }

    /// The bucket's hour value
    pub fn hour(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for HourOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

impl BucketKey for HourOfDay {
    const GROUPING: &'static str = "hour";

    fn all() -> Vec<Self> {
        (0..24).map(HourOfDay).collect()
    }

    fn from_timestamp(timestamp_ms: i64, time: &TimeSettings) -> Result<Self> {
        let local = time.local_time(timestamp_ms)?;
        Ok(Self::shifted(local.hour(), time.hour_shift))
    }
}

/// Ordinal day of the year, 1..=365
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayOfYear(u16);

impl DayOfYear {
    /// Number of day buckets
    pub const DAYS: u16 = 365;

    /// Bucket for an ordinal day, applying the leap-day policy to day 366
    pub fn from_ordinal(ordinal: u32, policy: LeapDayPolicy) -> Result<Self> {
        match ordinal {
            1..=365 => Ok(DayOfYear(ordinal as u16)),
            366 => match policy {
                LeapDayPolicy::Fold => Ok(DayOfYear(Self::DAYS)),
                LeapDayPolicy::Reject => Err(CoreError::LeapDayOutOfRange),
            },
            _ => Err(CoreError::LeapDayOutOfRange),
        }
    }

    /// The bucket's ordinal
    pub fn ordinal(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for DayOfYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl BucketKey for DayOfYear {
    const GROUPING: &'static str = "day of year";

    fn all() -> Vec<Self> {
        (1..=Self::DAYS).map(DayOfYear).collect()
    }

    fn from_timestamp(timestamp_ms: i64, time: &TimeSettings) -> Result<Self> {
        let local = time.local_time(timestamp_ms)?;
        Self::from_ordinal(local.ordinal(), time.leap_day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2021-03-01T12:00:00Z
    const MONDAY_NOON: i64 = 1_614_600_000_000;

    #[test]
    fn test_weekday_of_known_date() {
        let day = Weekday::from_timestamp(MONDAY_NOON, &TimeSettings::default()).unwrap();
        assert_eq!(day, Weekday::Monday);
        assert_eq!(day.to_string(), "Monday");
    }

    #[test]
    fn test_weekday_respects_offset() {
        // 23:30 on Sunday 2021-02-28 UTC is already Monday at UTC+1
        let ts = 1_614_555_000_000;
        let utc = TimeSettings::default();
        let cet = TimeSettings {
            utc_offset_minutes: 60,
            ..TimeSettings::default()
        };
        assert_eq!(Weekday::from_timestamp(ts, &utc).unwrap(), Weekday::Sunday);
        assert_eq!(Weekday::from_timestamp(ts, &cet).unwrap(), Weekday::Monday);
    }

    #[test]
    fn test_hour_shift_wraps() {
        assert_eq!(HourOfDay::shifted(1, 2).hour(), 23);
        assert_eq!(HourOfDay::shifted(0, 2).hour(), 22);
        assert_eq!(HourOfDay::shifted(2, 2).hour(), 0);
        assert_eq!(HourOfDay::shifted(13, 0).hour(), 13);
    }

    #[test]
    fn test_hour_from_timestamp() {
        // 2021-03-01T01:15:00Z
        let ts = 1_614_561_300_000;
        let hour = HourOfDay::from_timestamp(ts, &TimeSettings::default()).unwrap();
        assert_eq!(hour.hour(), 23);
    }

    #[test]
    fn test_day_of_year_leap_day() {
        assert_eq!(
            DayOfYear::from_ordinal(366, LeapDayPolicy::Fold).unwrap().ordinal(),
            365
        );
        assert_eq!(
            DayOfYear::from_ordinal(366, LeapDayPolicy::Reject),
            Err(CoreError::LeapDayOutOfRange)
        );
        assert_eq!(
            DayOfYear::from_ordinal(1, LeapDayPolicy::Reject).unwrap().ordinal(),
            1
        );
    }

    #[test]
    fn test_day_of_year_from_timestamp() {
        let day = DayOfYear::from_timestamp(MONDAY_NOON, &TimeSettings::default()).unwrap();
        assert_eq!(day.ordinal(), 60);
    }

    #[test]
    fn test_label_sets() {
        assert_eq!(Weekday::all().len(), 7);
        assert_eq!(HourOfDay::all().len(), 24);
        assert_eq!(DayOfYear::all().len(), 365);

        let buckets = zeroed_buckets::<Weekday, u64>();
        assert_eq!(buckets.len(), 7);
        assert!(buckets.values().all(|&v| v == 0));
    }

    #[test]
    fn test_invalid_offset() {
        let time = TimeSettings {
            utc_offset_minutes: 24 * 60,
            ..TimeSettings::default()
        };
        assert_eq!(
            time.local_time(0),
            Err(CoreError::InvalidUtcOffset { minutes: 1440 })
        );
    }
}
