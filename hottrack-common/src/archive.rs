//! Date-based archive grouping
//!
//! Songs are browsed by the calendar period of their release date. Weeks
//! follow ISO-8601 numbering so every date lands in exactly one week, the
//! same way it lands in exactly one year, month and day.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Local, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::search::SongQuery;

/// Archive grouping granularity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Year,
    Month,
    Day,
    Week,
}

impl FromStr for Granularity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "year" => Ok(Granularity::Year),
            "month" => Ok(Granularity::Month),
            "day" => Ok(Granularity::Day),
            "week" => Ok(Granularity::Week),
            other => Err(Error::InvalidInput(format!("unknown archive period: {}", other))),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Granularity::Year => "year",
            Granularity::Month => "month",
            Granularity::Day => "day",
            Granularity::Week => "week",
        };
        f.write_str(name)
    }
}

/// One calendar period at some granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "period", rename_all = "lowercase")]
pub enum Period {
    Year { year: i32 },
    Month { year: i32, month: u32 },
    Day { date: NaiveDate },
    /// ISO week; `year` is the ISO week-numbering year
    Week { year: i32, week: u32 },
}

impl Period {
    /// The period of `granularity` that contains `date`
    pub fn containing(date: NaiveDate, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Year => Period::Year { year: date.year() },
            Granularity::Month => Period::Month {
                year: date.year(),
                month: date.month(),
            },
            Granularity::Day => Period::Day { date },
            Granularity::Week => {
                let iso = date.iso_week();
                Period::Week {
                    year: iso.year(),
                    week: iso.week(),
                }
            }
        }
    }

    pub fn year(year: i32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, 1, 1).map(|_| Period::Year { year })
    }

    pub fn month(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Period::Month { year, month })
    }

    pub fn day(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(|date| Period::Day { date })
    }

    /// ISO week `week` of ISO year `year`; `None` if the year has no such week
    pub fn week(year: i32, week: u32) -> Option<Self> {
        NaiveDate::from_isoywd_opt(year, week, Weekday::Mon).map(|_| Period::Week { year, week })
    }

    pub fn granularity(&self) -> Granularity {
        match self {
            Period::Year { .. } => Granularity::Year,
            Period::Month { .. } => Granularity::Month,
            Period::Day { .. } => Granularity::Day,
            Period::Week { .. } => Granularity::Week,
        }
    }

    /// Half-open date range `[start, end)` covered by this period
    ///
    /// `None` when the range would run past the last representable date;
    /// such a period contains nothing.
    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        match *self {
            Period::Year { year } => Some((first_of_month(year, 1)?, first_of_month(year + 1, 1)?)),
            Period::Month { year, month } => {
                let next = if month == 12 {
                    first_of_month(year + 1, 1)?
                } else {
                    first_of_month(year, month + 1)?
                };
                Some((first_of_month(year, month)?, next))
            }
            Period::Day { date } => Some((date, date.succ_opt()?)),
            Period::Week { year, week } => {
                let start = NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)?;
                Some((start, start.checked_add_days(Days::new(7))?))
            }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.bounds()
            .map_or(false, |(start, end)| start <= date && date < end)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Year { year } => write!(f, "{:04}", year),
            Period::Month { year, month } => write!(f, "{:04}-{:02}", year, month),
            Period::Day { date } => write!(f, "{}", date.format("%Y-%m-%d")),
            Period::Week { year, week } => write!(f, "{:04}-W{:02}", year, week),
        }
    }
}

fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Distinct periods present among `dates`, newest first
pub fn date_list<I>(dates: I, granularity: Granularity) -> Vec<Period>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let mut periods: Vec<Period> = dates
        .into_iter()
        .map(|d| Period::containing(d, granularity))
        .collect();
    // Periods of one granularity order chronologically
    periods.sort_unstable_by(|a, b| b.cmp(a));
    periods.dedup();
    periods
}

/// Query scoped to the songs released within `period`
pub fn list_for_period(period: Period) -> SongQuery {
    SongQuery::new().with_period(period)
}

/// Resolves "today" for the today archive
///
/// A `fake-today` override is honored only in debug mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct TodayResolver {
    pub debug: bool,
}

impl TodayResolver {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }

    pub fn today_or_override(&self, override_date: Option<&str>) -> NaiveDate {
        self.resolve_at(override_date, Local::now().date_naive())
    }

    /// Same as [`Self::today_or_override`] with an explicit current date
    pub fn resolve_at(&self, override_date: Option<&str>, today: NaiveDate) -> NaiveDate {
        if !self.debug {
            return today;
        }
        match override_date.and_then(parse_loose_date) {
            Some(date) => date,
            None => {
                if let Some(raw) = override_date {
                    tracing::debug!("Ignoring malformed fake-today value {:?}", raw);
                }
                today
            }
        }
    }
}

/// Parse `YYYY-M-D` with unpadded non-negative components
fn parse_loose_date(raw: &str) -> Option<NaiveDate> {
    let mut parts = raw.split('-');
    let year = parse_component(parts.next()?)?;
    let month = parse_component(parts.next()?)?;
    let day = parse_component(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)
}

fn parse_component(part: &str) -> Option<u32> {
    let part = part.trim();
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}
