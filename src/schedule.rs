use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Days, Local, Months, NaiveTime};
use serde::{Deserialize, Serialize};

/// How often a care track recurs.
///
/// `None` disables the track entirely: it never produces a due date and its
/// needs-care check is always false.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Schedule {
    #[default]
    None,
    Daily,
    Weekly,
    Biweekly,
    Monthly,
}

impl Schedule {
    /// Computes the next due date from `from`.
    ///
    /// The reference is truncated to the start of its calendar day before the
    /// offset is added, so recurring care always lands on a day boundary no
    /// matter what time the task was completed. Monthly uses calendar month
    /// arithmetic (Jan 31 rolls to the end of February, it does not overflow).
    /// If chrono cannot produce a date, the start-of-day reference itself is
    /// returned instead.
    pub fn next_date(&self, from: DateTime<Local>) -> Option<DateTime<Local>> {
        let start = start_of_day(from);
        match self {
            Schedule::None => None,
            Schedule::Daily => Some(start.checked_add_days(Days::new(1)).unwrap_or(start)),
            Schedule::Weekly => Some(start.checked_add_days(Days::new(7)).unwrap_or(start)),
            Schedule::Biweekly => Some(start.checked_add_days(Days::new(14)).unwrap_or(start)),
            Schedule::Monthly => Some(start.checked_add_months(Months::new(1)).unwrap_or(start)),
        }
    }

    /// True when the track is enabled at all.
    pub fn is_enabled(&self) -> bool {
        *self != Schedule::None
    }

    /// The token accepted back by [`FromStr`]; also the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Schedule::None => "none",
            Schedule::Daily => "daily",
            Schedule::Weekly => "weekly",
            Schedule::Biweekly => "biweekly",
            Schedule::Monthly => "monthly",
        }
    }
}

impl FromStr for Schedule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Schedule::None),
            "daily" => Ok(Schedule::Daily),
            "weekly" => Ok(Schedule::Weekly),
            "biweekly" => Ok(Schedule::Biweekly),
            "monthly" => Ok(Schedule::Monthly),
            _ => Err(format!(
                "unknown schedule '{}'. Supported: none, daily, weekly, biweekly, monthly",
                s
            )),
        }
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Schedule::None => "None",
            Schedule::Daily => "Daily",
            Schedule::Weekly => "Weekly",
            Schedule::Biweekly => "Every 2 weeks",
            Schedule::Monthly => "Monthly",
        };
        write!(f, "{}", s)
    }
}

/// Midnight at the start of `date`'s calendar day.
///
/// Falls back to `date` unchanged if midnight does not exist in the local
/// timezone that day (DST gap).
pub fn start_of_day(date: DateTime<Local>) -> DateTime<Local> {
    date.with_time(NaiveTime::MIN).earliest().unwrap_or(date)
}

/// Calendar-day equality in the local timezone.
pub fn is_same_day(a: DateTime<Local>, b: DateTime<Local>) -> bool {
    a.date_naive() == b.date_naive()
}

/// Whole days from `now`'s calendar day to `date`'s. Negative when overdue.
pub fn days_until(date: DateTime<Local>, now: DateTime<Local>) -> i64 {
    (date.date_naive() - now.date_naive()).num_days()
}
