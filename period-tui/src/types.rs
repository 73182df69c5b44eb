use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::{Date, Month, Weekday};

const WEEKDAYS_ZH: [&str; 7] = ["日", "一", "二", "三", "四", "五", "六"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateParseError {
    #[error("expected YYYY-MM-DD, got {0:?}")]
    Format(String),
    #[error("{0:?} is not a calendar date")]
    OutOfRange(String),
}

/// A calendar day picked by the user, as carried by a day cell's date attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SelectedDate(Date);

impl SelectedDate {
    pub fn new(date: Date) -> Self {
        Self(date)
    }

    pub fn date(self) -> Date {
        self.0
    }

    /// Formats the date the way the panel title shows it, e.g. `2024年1月1日 (星期一)`.
    pub fn display_zh(self) -> String {
        format!(
            "{}年{}月{}日 ({})",
            self.0.year(),
            self.0.month() as u8,
            self.0.day(),
            weekday_zh(self.0.weekday())
        )
    }
}

impl From<Date> for SelectedDate {
    fn from(date: Date) -> Self {
        Self(date)
    }
}

impl FromStr for SelectedDate {
    type Err = DateParseError;

    /// Accepts `YYYY-MM-DD`; month and day may also be written with a single digit.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('-').collect();
        let &[year, month, day] = parts.as_slice() else {
            return Err(DateParseError::Format(s.to_string()));
        };

        let numeric = |part: &str, max_len: usize| {
            !part.is_empty() && part.len() <= max_len && part.bytes().all(|b| b.is_ascii_digit())
        };
        if !numeric(year, 4) || !numeric(month, 2) || !numeric(day, 2) {
            return Err(DateParseError::Format(s.to_string()));
        }

        let out_of_range = || DateParseError::OutOfRange(s.to_string());
        let year: i32 = year.parse().map_err(|_| out_of_range())?;
        let month: u8 = month.parse().map_err(|_| out_of_range())?;
        let day: u8 = day.parse().map_err(|_| out_of_range())?;
        let month = Month::try_from(month).map_err(|_| out_of_range())?;

        Date::from_calendar_date(year, month, day)
            .map(Self)
            .map_err(|_| out_of_range())
    }
}

impl fmt::Display for SelectedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            self.0.month() as u8,
            self.0.day()
        )
    }
}

pub fn weekday_zh(weekday: Weekday) -> String {
    format!(
        "星期{}",
        WEEKDAYS_ZH[weekday.number_days_from_sunday() as usize]
    )
}

/// Whether the current user holds a server session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Anonymous,
    Authenticated,
}

impl AuthState {
    pub fn is_authenticated(self) -> bool {
        self == AuthState::Authenticated
    }
}

/// Period info for one date, as returned by GET /period/info/.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PeriodInfo {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub is_start_possible: bool,
    #[serde(default)]
    pub end_candidate_records: Vec<CandidateRecord>,
}

/// A record the server offers for adjustment on the requested date.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CandidateRecord {
    pub id: i64,
    pub start_date: String,
    #[serde(default)]
    pub is_predicted: bool,
    #[serde(default)]
    pub current_end_date: Option<String>,
}

impl CandidateRecord {
    pub fn status_label(&self) -> &'static str {
        if self.is_predicted {
            "预测"
        } else {
            "确认"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Prediction {
    pub cycle: u32,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub calculation_note: Option<String>,
}

impl Prediction {
    pub fn contains(&self, date: Date) -> bool {
        match (
            self.start_date.parse::<SelectedDate>(),
            self.end_date.parse::<SelectedDate>(),
        ) {
            (Ok(start), Ok(end)) => start.date() <= date && date <= end.date(),
            _ => false,
        }
    }
}

/// Response of GET /period/predictions/.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PredictionInfo {
    #[serde(default)]
    pub predictions: Vec<Prediction>,
    #[serde(default)]
    pub cycle_length: Option<u32>,
    #[serde(default)]
    pub period_length: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustKind {
    Start,
    End,
    Both,
}

impl AdjustKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AdjustKind::Start => "start",
            AdjustKind::End => "end",
            AdjustKind::Both => "both",
        }
    }
}

/// Body of POST /period/adjust/.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustPeriod {
    pub record_id: i64,
    pub kind: AdjustKind,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Raw profile form values. The server owns validation, so these stay strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileForm {
    pub cycle_length: String,
    pub period_length: String,
}
