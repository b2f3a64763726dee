//! Schedule expander
//!
//! A menu schedule is classified from the columns it fills:
//!
//! | day_of_week | valid_from / valid_until | kind |
//! |-------------|--------------------------|------|
//! | set | any | recurrent (weekly, optionally bounded by the dates) |
//! | - | equal | ponctuel (single day) |
//! | - | different, one may be missing | plage (date range) |
//! | - | both missing | permanent |
//!
//! `start_time` + `end_time` make a kind timed ("heures"), none of them
//! makes it all-day. Missing range bounds are taken from the visible period,
//! so the same schedule renders differently in month, week and day views.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::Serialize;
use serde_json::json;
use shared::CalendarEvent;
use shared::models::{Menu, MenuSchedule, MenuWithSchedules, weekday};
use thiserror::Error;

use super::time::normalize_time;
use super::view::{CalendarView, VisiblePeriod, first_of_month, first_of_next_month};
use crate::utils::time::{DATE_FORMAT, try_parse_time};

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Classified menu schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleKind {
    RecurrentTimed {
        weekday: Weekday,
        start: NaiveTime,
        end: NaiveTime,
        valid_from: Option<NaiveDate>,
        valid_until: Option<NaiveDate>,
    },
    RecurrentAllDay {
        weekday: Weekday,
        valid_from: Option<NaiveDate>,
        valid_until: Option<NaiveDate>,
    },
    PunctualTimed {
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    },
    PunctualAllDay {
        date: NaiveDate,
    },
    RangeTimed {
        from: Option<NaiveDate>,
        until: Option<NaiveDate>,
        start: NaiveTime,
        end: NaiveTime,
    },
    RangeAllDay {
        from: Option<NaiveDate>,
        until: Option<NaiveDate>,
    },
    Permanent,
}

impl ScheduleKind {
    /// Label shown by the dashboard legend
    pub fn label(&self) -> &'static str {
        match self {
            Self::RecurrentTimed { .. } => "recurrent-heures",
            Self::RecurrentAllDay { .. } => "recurrent-all-day",
            Self::PunctualTimed { .. } => "ponctuel-heures",
            Self::PunctualAllDay { .. } => "ponctuel-all-day",
            Self::RangeTimed { .. } => "plage-heures",
            Self::RangeAllDay { .. } => "plage-all-day",
            Self::Permanent => "permanent",
        }
    }
}

/// Why a schedule could not be classified
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassificationError {
    #[error("day_of_week {day} is outside 1..=7")]
    InvalidDayOfWeek { day: i64 },

    #[error("start_time and end_time must be set together")]
    IncompleteTimeRange,

    #[error("invalid time of day: {value}")]
    InvalidTime { value: String },

    #[error("end_time {end} is not after start_time {start}")]
    EmptyTimeRange { start: String, end: String },

    #[error("invalid date: {value}")]
    InvalidDate { value: String },

    #[error("valid_from {from} is after valid_until {until}")]
    ReversedDateRange { from: String, until: String },
}

/// A schedule left out of the calendar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedSchedule {
    pub menu_id: i64,
    pub schedule_id: i64,
    pub error: ClassificationError,
}

/// Events of one or more menus plus the schedules that produced none
#[derive(Debug, Clone, Default, Serialize)]
pub struct MenuExpansion {
    pub events: Vec<CalendarEvent>,
    pub rejected: Vec<RejectedSchedule>,
}

impl MenuExpansion {
    fn extend(&mut self, other: MenuExpansion) {
        self.events.extend(other.events);
        self.rejected.extend(other.rejected);
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_optional_date(value: &Option<String>) -> Result<Option<NaiveDate>, ClassificationError> {
    non_empty(value)
        .map(|s| {
            NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| ClassificationError::InvalidDate {
                value: s.to_string(),
            })
        })
        .transpose()
}

fn parse_times(
    schedule: &MenuSchedule,
) -> Result<Option<(NaiveTime, NaiveTime)>, ClassificationError> {
    let parse = |s: &str| {
        try_parse_time(s).ok_or_else(|| ClassificationError::InvalidTime {
            value: s.to_string(),
        })
    };
    match (non_empty(&schedule.start_time), non_empty(&schedule.end_time)) {
        (None, None) => Ok(None),
        (Some(start), Some(end)) => {
            let (s, e) = (parse(start)?, parse(end)?);
            if e <= s {
                return Err(ClassificationError::EmptyTimeRange {
                    start: start.to_string(),
                    end: end.to_string(),
                });
            }
            Ok(Some((s, e)))
        }
        _ => Err(ClassificationError::IncompleteTimeRange),
    }
}

/// Classify a schedule into exactly one kind
pub fn classify(schedule: &MenuSchedule) -> Result<ScheduleKind, ClassificationError> {
    let times = parse_times(schedule)?;
    let from = parse_optional_date(&schedule.valid_from)?;
    let until = parse_optional_date(&schedule.valid_until)?;

    if let (Some(f), Some(u)) = (from, until)
        && f > u
    {
        return Err(ClassificationError::ReversedDateRange {
            from: f.format(DATE_FORMAT).to_string(),
            until: u.format(DATE_FORMAT).to_string(),
        });
    }

    if let Some(day) = schedule.day_of_week {
        let weekday =
            weekday::from_iso(day).ok_or(ClassificationError::InvalidDayOfWeek { day })?;
        return Ok(match times {
            Some((start, end)) => ScheduleKind::RecurrentTimed {
                weekday,
                start,
                end,
                valid_from: from,
                valid_until: until,
            },
            None => ScheduleKind::RecurrentAllDay {
                weekday,
                valid_from: from,
                valid_until: until,
            },
        });
    }

    Ok(match (from, until, times) {
        (None, None, _) => ScheduleKind::Permanent,
        (Some(f), Some(u), Some((start, end))) if f == u => ScheduleKind::PunctualTimed {
            date: f,
            start,
            end,
        },
        (Some(f), Some(u), None) if f == u => ScheduleKind::PunctualAllDay { date: f },
        (from, until, Some((start, end))) => ScheduleKind::RangeTimed {
            from,
            until,
            start,
            end,
        },
        (from, until, None) => ScheduleKind::RangeAllDay { from, until },
    })
}

/// Deterministic color of the menu at `index`
pub fn menu_color(index: usize) -> String {
    format!("hsl({}, 70%, 50%)", index * 60)
}

struct EventFactory<'a> {
    menu: &'a Menu,
    color: String,
}

impl EventFactory<'_> {
    fn props(&self, schedule: Option<&MenuSchedule>, kind: &str) -> serde_json::Value {
        json!({
            "menuId": self.menu.id,
            "scheduleId": schedule.map(|s| s.id),
            "kind": kind,
            "description": self.menu.description,
            "isActive": self.menu.is_active,
            "isPublic": self.menu.is_public,
            "startTime": schedule.and_then(|s| s.start_time.as_deref()).map(normalize_time),
            "endTime": schedule.and_then(|s| s.end_time.as_deref()).map(normalize_time),
        })
    }

    fn all_day(
        &self,
        id: String,
        start: NaiveDate,
        end_exclusive: NaiveDate,
        props: serde_json::Value,
    ) -> CalendarEvent {
        CalendarEvent {
            id,
            title: self.menu.name.clone(),
            start: start.format(DATE_FORMAT).to_string(),
            end: end_exclusive.format(DATE_FORMAT).to_string(),
            all_day: true,
            color: self.color.clone(),
            extended_props: props,
        }
    }

    fn timed(
        &self,
        id: String,
        start: NaiveDateTime,
        end: NaiveDateTime,
        props: serde_json::Value,
    ) -> CalendarEvent {
        CalendarEvent {
            id,
            title: self.menu.name.clone(),
            start: start.format(DATETIME_FORMAT).to_string(),
            end: end.format(DATETIME_FORMAT).to_string(),
            all_day: false,
            color: self.color.clone(),
            extended_props: props,
        }
    }
}

fn next_day(date: NaiveDate) -> NaiveDate {
    date.succ_opt().unwrap_or(date)
}

/// Expand one menu into calendar events for `view` around `reference`
///
/// A menu without schedules is permanent and renders as one all-day event
/// over the reference month, whatever the view.
pub fn expand_menu(
    menu: &Menu,
    schedules: &[MenuSchedule],
    index: usize,
    view: CalendarView,
    reference: NaiveDate,
) -> MenuExpansion {
    let factory = EventFactory {
        menu,
        color: menu_color(index),
    };
    let mut expansion = MenuExpansion::default();

    if schedules.is_empty() {
        expansion.events.push(factory.all_day(
            format!("menu-{}-permanent", menu.id),
            first_of_month(reference),
            first_of_next_month(reference),
            factory.props(None, ScheduleKind::Permanent.label()),
        ));
        return expansion;
    }

    let period = VisiblePeriod::for_view(view, reference);

    for schedule in schedules {
        let kind = match classify(schedule) {
            Ok(kind) => kind,
            Err(error) => {
                tracing::warn!(
                    menu_id = menu.id,
                    schedule_id = schedule.id,
                    %error,
                    "Menu schedule skipped"
                );
                expansion.rejected.push(RejectedSchedule {
                    menu_id: menu.id,
                    schedule_id: schedule.id,
                    error,
                });
                continue;
            }
        };
        let props = factory.props(Some(schedule), kind.label());
        let base_id = format!("menu-{}-{}", menu.id, schedule.id);

        match kind {
            ScheduleKind::RecurrentTimed {
                weekday,
                valid_from,
                valid_until,
                ..
            }
            | ScheduleKind::RecurrentAllDay {
                weekday,
                valid_from,
                valid_until,
            } => {
                let days = period.days().filter(|d| {
                    d.weekday() == weekday
                        && valid_from.is_none_or(|f| *d >= f)
                        && valid_until.is_none_or(|u| *d <= u)
                });
                for day in days {
                    let id = format!("{base_id}-{}", day.format(DATE_FORMAT));
                    let event = match kind {
                        // Block rendering in month view
                        ScheduleKind::RecurrentTimed { start, end, .. }
                            if view != CalendarView::Month =>
                        {
                            factory.timed(id, day.and_time(start), day.and_time(end), props.clone())
                        }
                        _ => factory.all_day(id, day, next_day(day), props.clone()),
                    };
                    expansion.events.push(event);
                }
            }
            ScheduleKind::PunctualTimed { date, start, end } => {
                expansion.events.push(factory.timed(
                    base_id,
                    date.and_time(start),
                    date.and_time(end),
                    props,
                ));
            }
            ScheduleKind::PunctualAllDay { date } => {
                expansion
                    .events
                    .push(factory.all_day(base_id, date, next_day(date), props));
            }
            ScheduleKind::RangeTimed {
                from,
                until,
                start,
                end,
            } => {
                let from = from.unwrap_or(period.start);
                let until = until.unwrap_or(period.end);
                expansion.events.push(factory.timed(
                    base_id,
                    from.and_time(start),
                    until.and_time(end),
                    props,
                ));
            }
            ScheduleKind::RangeAllDay { from, until } => {
                let from = from.unwrap_or(period.start);
                let until = until.unwrap_or(period.end);
                expansion
                    .events
                    .push(factory.all_day(base_id, from, next_day(until), props));
            }
            ScheduleKind::Permanent => {
                expansion.events.push(factory.all_day(
                    base_id,
                    period.start,
                    period.end_exclusive(),
                    props,
                ));
            }
        }
    }

    expansion
}

/// Expand every menu, coloring each by its position
pub fn expand_menus(
    menus: &[MenuWithSchedules],
    view: CalendarView,
    reference: NaiveDate,
) -> MenuExpansion {
    menus
        .iter()
        .enumerate()
        .fold(MenuExpansion::default(), |mut acc, (index, m)| {
            acc.extend(expand_menu(&m.menu, &m.schedules, index, view, reference));
            acc
        })
}
