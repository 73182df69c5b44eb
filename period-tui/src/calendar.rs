use crate::types::{Prediction, SelectedDate};
use time::{Date, Duration, Month};

/// One cell of the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: Date,
    pub is_current_month: bool,
    pub is_today: bool,
}

impl DayCell {
    /// The `YYYY-MM-DD` attribute the cell is selected by.
    pub fn date_attr(&self) -> String {
        SelectedDate::new(self.date).to_string()
    }
}

/// Sunday-first weeks covering a whole month, padded with the neighbouring
/// months' days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: Month,
    pub weeks: Vec<[DayCell; 7]>,
}

impl MonthGrid {
    pub fn build(first_of_month: Date, today: Date) -> Self {
        let year = first_of_month.year();
        let month = first_of_month.month();
        let last = last_of_month(first_of_month);

        let lead = first_of_month.weekday().number_days_from_sunday() as i64;
        let week_count = (lead + last.day() as i64 + 6) / 7;
        let weeks = (0..week_count)
            .map(|week| {
                std::array::from_fn(|column| {
                    let offset = week * 7 + column as i64 - lead;
                    match first_of_month.checked_add(Duration::days(offset)) {
                        Some(date) => DayCell {
                            date,
                            is_current_month: date.month() == month && date.year() == year,
                            is_today: date == today,
                        },
                        // Padding past the supported date range.
                        None => DayCell {
                            date: if offset < 0 { Date::MIN } else { Date::MAX },
                            is_current_month: false,
                            is_today: false,
                        },
                    }
                })
            })
            .collect();

        Self { year, month, weeks }
    }

    pub fn cells(&self) -> impl Iterator<Item = &DayCell> {
        self.weeks.iter().flat_map(|week| week.iter())
    }
}

pub fn first_of_month(date: Date) -> Date {
    date.replace_day(1).unwrap_or(date)
}

pub fn last_of_month(date: Date) -> Date {
    let length = date.month().length(date.year());
    date.replace_day(length).unwrap_or(date)
}

/// Shift `date` by whole months, clamping the day to the target month's length.
pub fn add_months(date: Date, months: i32) -> Date {
    let index = date.year() * 12 + (date.month() as i32 - 1) + months;
    let year = index.div_euclid(12);
    let month_number = (index.rem_euclid(12) + 1) as u8;
    let Ok(month) = Month::try_from(month_number) else {
        return date;
    };
    let Ok(first) = Date::from_calendar_date(year, month, 1) else {
        return date;
    };
    let day = date.day().min(last_of_month(first).day());
    first.replace_day(day).unwrap_or(first)
}

/// How a day relates to the predicted cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionMark {
    Current,
    Upcoming,
}

/// Cursor, selection and decorations of the displayed month.
#[derive(Debug, Clone)]
pub struct CalendarState {
    pub today: Date,
    pub displayed: Date,
    pub cursor: Date,
    /// Day whose panel is (or was last) open; drawn as selected.
    pub selected: Option<Date>,
    pub predictions: Vec<Prediction>,
    pub grid: MonthGrid,
}

impl CalendarState {
    pub fn new(today: Date) -> Self {
        let displayed = first_of_month(today);
        Self {
            today,
            displayed,
            cursor: today,
            selected: None,
            predictions: Vec::new(),
            grid: MonthGrid::build(displayed, today),
        }
    }

    fn show_month_of(&mut self, date: Date) {
        let first = first_of_month(date);
        if first != self.displayed {
            self.displayed = first;
            self.grid = MonthGrid::build(first, self.today);
        }
    }

    /// Move the cursor by `days`, following it into neighbouring months.
    pub fn move_cursor(&mut self, days: i64) {
        if let Some(target) = self.cursor.checked_add(Duration::days(days)) {
            self.cursor = target;
            self.show_month_of(target);
        }
    }

    pub fn shift_month(&mut self, months: i32) {
        self.cursor = add_months(self.cursor, months);
        self.show_month_of(self.cursor);
    }

    pub fn jump_to(&mut self, date: Date) {
        self.cursor = date;
        self.show_month_of(date);
    }

    pub fn jump_to_today(&mut self) {
        self.jump_to(self.today);
    }

    pub fn select(&mut self, date: Date) {
        self.jump_to(date);
        self.selected = Some(date);
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn cursor_cell(&self) -> Option<&DayCell> {
        self.grid.cells().find(|cell| cell.date == self.cursor)
    }

    pub fn prediction_mark(&self, date: Date) -> Option<PredictionMark> {
        self.predictions
            .iter()
            .find(|p| p.contains(date))
            .map(|p| {
                if p.is_current {
                    PredictionMark::Current
                } else {
                    PredictionMark::Upcoming
                }
            })
    }

    pub fn month_title(&self) -> String {
        format!("{}年{}月", self.displayed.year(), self.displayed.month() as u8)
    }
}
