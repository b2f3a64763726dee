//! Menu calendar
//!
//! Turns menu schedules into displayable calendar events for the month,
//! week and day views of the dashboard.
//!
//! - [`time`] - time-of-day normalization
//! - [`view`] - calendar views and their visible period
//! - [`expander`] - schedule classification and expansion

pub mod expander;
pub mod time;
pub mod view;

pub use expander::{
    ClassificationError, MenuExpansion, RejectedSchedule, ScheduleKind, classify, expand_menu,
    expand_menus, menu_color,
};
pub use view::{CalendarView, VisiblePeriod};
