//! Calendar views and visible periods

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Calendar view type
///
/// FullCalendar view names (`dayGridMonth`, `timeGridWeek`, `timeGridDay`)
/// are accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarView {
    #[default]
    #[serde(alias = "dayGridMonth")]
    Month,
    #[serde(alias = "timeGridWeek")]
    Week,
    #[serde(alias = "timeGridDay")]
    Day,
}

/// Inclusive range of days shown by a view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisiblePeriod {
    pub start: NaiveDate,
    /// Last visible day (inclusive)
    pub end: NaiveDate,
}

impl VisiblePeriod {
    /// Period of `view` containing `reference`
    ///
    /// Weeks start on Monday.
    pub fn for_view(view: CalendarView, reference: NaiveDate) -> Self {
        match view {
            CalendarView::Month => Self::month_of(reference),
            CalendarView::Week => {
                let offset = u64::from(reference.weekday().num_days_from_monday());
                let start = reference - Days::new(offset);
                Self {
                    start,
                    end: start + Days::new(6),
                }
            }
            CalendarView::Day => Self {
                start: reference,
                end: reference,
            },
        }
    }

    /// Whole calendar month containing `reference`
    pub fn month_of(reference: NaiveDate) -> Self {
        let start = first_of_month(reference);
        Self {
            start,
            end: first_of_next_month(reference).pred_opt().unwrap_or(start),
        }
    }

    /// Day after the last visible day (exclusive end)
    pub fn end_exclusive(&self) -> NaiveDate {
        self.end.succ_opt().unwrap_or(self.end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every visible day, in order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn first_of_next_month(date: NaiveDate) -> NaiveDate {
    let first = first_of_month(date);
    first.checked_add_months(Months::new(1)).unwrap_or(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_month_period() {
        let p = VisiblePeriod::for_view(CalendarView::Month, d("2024-02-14"));
        assert_eq!(p.start, d("2024-02-01"));
        assert_eq!(p.end, d("2024-02-29"));
        assert_eq!(p.end_exclusive(), d("2024-03-01"));
        assert_eq!(p.days().count(), 29);
    }

    #[test]
    fn test_week_period_starts_monday() {
        // 2024-03-07 is a Thursday
        let p = VisiblePeriod::for_view(CalendarView::Week, d("2024-03-07"));
        assert_eq!(p.start, d("2024-03-04"));
        assert_eq!(p.end, d("2024-03-10"));

        // Sunday belongs to the week that started the Monday before
        let p = VisiblePeriod::for_view(CalendarView::Week, d("2024-03-10"));
        assert_eq!(p.start, d("2024-03-04"));
    }

    #[test]
    fn test_day_period() {
        let p = VisiblePeriod::for_view(CalendarView::Day, d("2024-03-04"));
        assert_eq!(p.start, p.end);
        assert_eq!(p.days().collect::<Vec<_>>(), vec![d("2024-03-04")]);
    }

    #[test]
    fn test_december_rolls_into_next_year() {
        assert_eq!(first_of_next_month(d("2024-12-31")), d("2025-01-01"));
    }

    #[test]
    fn test_view_aliases() {
        let v: CalendarView = serde_json::from_str("\"timeGridWeek\"").unwrap();
        assert_eq!(v, CalendarView::Week);
        let v: CalendarView = serde_json::from_str("\"day\"").unwrap();
        assert_eq!(v, CalendarView::Day);
    }
}
