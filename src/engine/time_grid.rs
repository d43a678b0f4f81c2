//! Regular timestamp grids.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Sampling interval, stored in whole minutes.
///
/// Parses pandas-style aliases: `"15T"`, `"30min"`, `"1H"`, `"3H"`, `"D"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Frequency {
    minutes: u32,
}

impl Frequency {
    pub const HOURLY: Frequency = Frequency { minutes: 60 };
    pub const DAILY: Frequency = Frequency { minutes: 1440 };

    /// # Errors
    ///
    /// Returns [`EngineError::InvalidTimeRange`] for a zero interval.
    pub fn from_minutes(minutes: u32) -> Result<Self, EngineError> {
        if minutes == 0 {
            return Err(EngineError::InvalidTimeRange(
                "frequency must be positive".to_string(),
            ));
        }
        Ok(Self { minutes })
    }

    pub fn minutes(self) -> u32 {
        self.minutes
    }

    pub fn hours(self) -> f64 {
        f64::from(self.minutes) / 60.0
    }

    pub fn step(self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.minutes))
    }
}

impl FromStr for Frequency {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let split = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        let (count, unit) = trimmed.split_at(split);
        let count: u32 = if count.is_empty() {
            1
        } else {
            count
                .parse()
                .map_err(|_| EngineError::InvalidTimeRange(format!("bad frequency \"{s}\"")))?
        };
        let per_unit = match unit.to_ascii_uppercase().as_str() {
            "T" | "MIN" => 1,
            "H" | "HOUR" => 60,
            "D" | "DAY" => 1440,
            _ => {
                return Err(EngineError::InvalidTimeRange(format!(
                    "unknown frequency unit in \"{s}\""
                )));
            }
        };
        let minutes = count.checked_mul(per_unit).ok_or_else(|| {
            EngineError::InvalidTimeRange(format!("frequency \"{s}\" is too large"))
        })?;
        Self::from_minutes(minutes)
    }
}

impl TryFrom<String> for Frequency {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Frequency> for String {
    fn from(value: Frequency) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.minutes % 1440 == 0 {
            match self.minutes / 1440 {
                1 => write!(f, "D"),
                n => write!(f, "{n}D"),
            }
        } else if self.minutes % 60 == 0 {
            write!(f, "{}H", self.minutes / 60)
        } else {
            write!(f, "{}T", self.minutes)
        }
    }
}

/// An ordered, evenly spaced sequence of timestamps.
///
/// The grid is a value: iterating it twice yields the same timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeGrid {
    start: NaiveDateTime,
    frequency: Frequency,
    len: usize,
}

impl TimeGrid {
    /// Grid from `start` up to and including `end` when `end` lands on a step.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidTimeRange`] if `end` precedes `start`.
    pub fn new(
        start: NaiveDateTime,
        end: NaiveDateTime,
        frequency: Frequency,
    ) -> Result<Self, EngineError> {
        if end < start {
            return Err(EngineError::InvalidTimeRange(format!(
                "end {end} is before start {start}"
            )));
        }
        let span_minutes = (end - start).num_minutes();
        let len = span_minutes / i64::from(frequency.minutes()) + 1;
        Ok(Self {
            start,
            frequency,
            len: usize::try_from(len).unwrap_or(usize::MAX),
        })
    }

    /// Grid covering whole days from `start_date` through `end_date`.
    ///
    /// The last timestamp is the final step before midnight after
    /// `end_date`; one day at hourly frequency has 24 points.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidTimeRange`] if `end_date` precedes `start_date`.
    pub fn from_dates(
        start_date: NaiveDate,
        end_date: NaiveDate,
        frequency: Frequency,
    ) -> Result<Self, EngineError> {
        if end_date < start_date {
            return Err(EngineError::InvalidTimeRange(format!(
                "end date {end_date} is before start date {start_date}"
            )));
        }
        let start = start_date.and_time(chrono::NaiveTime::MIN);
        let span_minutes = ((end_date - start_date).num_days() + 1) * 1440;
        let step = i64::from(frequency.minutes());
        let len = (span_minutes + step - 1) / step;
        Ok(Self {
            start,
            frequency,
            len: usize::try_from(len).unwrap_or(usize::MAX),
        })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Timestamp at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<NaiveDateTime> {
        if index >= self.len {
            return None;
        }
        let offset = i64::try_from(index).ok()? * i64::from(self.frequency.minutes());
        self.start.checked_add_signed(TimeDelta::minutes(offset))
    }

    /// Last timestamp of the grid.
    pub fn end(&self) -> Option<NaiveDateTime> {
        self.len.checked_sub(1).and_then(|i| self.get(i))
    }

    /// Whole days touched by the grid.
    pub fn span_days(&self) -> u64 {
        match self.end() {
            Some(end) => (end.date() - self.start.date()).num_days().unsigned_abs() + 1,
            None => 0,
        }
    }

    pub fn iter(&self) -> TimeGridIter {
        TimeGridIter {
            grid: *self,
            next: 0,
        }
    }
}

impl IntoIterator for &TimeGrid {
    type Item = (usize, NaiveDateTime);
    type IntoIter = TimeGridIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over `(index, timestamp)` pairs of a [`TimeGrid`].
#[derive(Debug, Clone)]
pub struct TimeGridIter {
    grid: TimeGrid,
    next: usize,
}

impl Iterator for TimeGridIter {
    type Item = (usize, NaiveDateTime);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next;
        let ts = self.grid.get(index)?;
        self.next += 1;
        Some((index, ts))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.grid.len.saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TimeGridIter {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn parses_frequency_aliases() {
        let minutes = |s: &str| s.parse::<Frequency>().map(Frequency::minutes).ok();
        assert_eq!(minutes("15T"), Some(15));
        assert_eq!(minutes("30min"), Some(30));
        assert_eq!(minutes("1H"), Some(60));
        assert_eq!(minutes("3h"), Some(180));
        assert_eq!(minutes("6H"), Some(360));
        assert_eq!(minutes("D"), Some(1440));
        assert_eq!(minutes("0H"), None);
        assert_eq!(minutes("5 fortnights"), None);
    }

    #[test]
    fn frequency_display_round_trips() {
        for s in ["15T", "1H", "6H", "D", "2D"] {
            let f: Frequency = s.parse().expect("valid");
            assert_eq!(f.to_string(), s);
        }
    }

    #[test]
    fn one_day_hourly_has_24_points() {
        let grid = TimeGrid::from_dates(date(2024, 1, 1), date(2024, 1, 1), Frequency::HOURLY)
            .expect("valid range");
        assert_eq!(grid.len(), 24);
        assert_eq!(grid.iter().count(), 24);
        assert_eq!(
            grid.end(),
            date(2024, 1, 1).and_hms_opt(23, 0, 0)
        );
        assert_eq!(grid.span_days(), 1);
    }

    #[test]
    fn week_at_quarter_hours() {
        let f: Frequency = "15T".parse().expect("valid");
        let grid = TimeGrid::from_dates(date(2024, 1, 1), date(2024, 1, 7), f).expect("valid");
        assert_eq!(grid.len(), 7 * 96);
        assert_eq!(grid.span_days(), 7);
    }

    #[test]
    fn explicit_range_includes_end_on_step() {
        let start = date(2024, 1, 1).and_hms_opt(0, 0, 0).expect("valid");
        let end = date(2024, 1, 1).and_hms_opt(6, 0, 0).expect("valid");
        let grid = TimeGrid::new(start, end, Frequency::HOURLY).expect("valid");
        assert_eq!(grid.len(), 7);
        let single = TimeGrid::new(start, start, Frequency::HOURLY).expect("valid");
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn reversed_range_is_rejected() {
        assert!(matches!(
            TimeGrid::from_dates(date(2024, 2, 1), date(2024, 1, 1), Frequency::HOURLY),
            Err(EngineError::InvalidTimeRange(_))
        ));
    }

    #[test]
    fn iteration_is_restartable_and_ordered() {
        let grid = TimeGrid::from_dates(date(2024, 3, 1), date(2024, 3, 2), Frequency::HOURLY)
            .expect("valid");
        let first: Vec<_> = grid.iter().collect();
        let second: Vec<_> = grid.iter().collect();
        assert_eq!(first, second);
        assert!(first.windows(2).all(|w| w[0].1 < w[1].1));
    }
}
