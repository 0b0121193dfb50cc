//! Recurrence expansion engine (RFC 5545).
//!
//! Expands an iCalendar dataset into a concrete, time-ordered list of
//! occurrences inside a half-open window `[begin, end)`:
//!
//! - [`TimeResolver`] infers the zone of each component and normalises every
//!   time-shaped input to a zoned instant;
//! - [`ComponentTiming`] derives a canonical `(start, end)` pair under the
//!   ambiguous input rules of RFC 5545;
//! - [`Schedule`] combines RRULE, RDATE, EXDATE, and RECURRENCE-ID overrides
//!   into one recurrence set;
//! - [`expand`] walks the schedule inside a window, DST-stable;
//! - [`scan`] orchestrates the above across a calendar and returns sorted
//!   [`Occurrence`] views.
//!
//! The engine is synchronous and stateless between calls. Messy input data
//! degrades with a `tracing` warning instead of failing the scan; only
//! call-shape errors surface as [`ExpandError`].
//!
//! ```
//! use chrono::NaiveDate;
//! use koyomi_expand::{TimeRange, scan_events};
//! use koyomi_ical::{Calendar, Component, DateTime, Property};
//!
//! let calendar = Calendar::new().with_component(
//!     Component::event()
//!         .with_property(Property::text("UID", "standup"))
//!         .with_property(Property::datetime("DTSTART", DateTime::utc(2026, 1, 5, 9, 0, 0)))
//!         .with_property(Property::datetime("DTEND", DateTime::utc(2026, 1, 5, 9, 15, 0)))
//!         .with_property(Property::text("RRULE", "FREQ=DAILY;BYDAY=MO,TU,WE,TH,FR")),
//! );
//!
//! let window = TimeRange::dates(
//!     NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
//!     NaiveDate::from_ymd_opt(2026, 1, 12).unwrap(),
//! );
//! let occurrences = scan_events(&calendar, window).unwrap();
//! assert_eq!(occurrences.len(), 5);
//! ```

mod error;
mod expander;
mod occurrence;
mod scan;
mod schedule;
mod timing;
mod timezone;

pub use error::{ExpandError, ExpandResult};
pub use expander::{TimeRange, expand};
pub use occurrence::Occurrence;
pub use scan::{scan, scan_events};
pub use schedule::{DEFAULT_MAX_INSTANCES, Schedule};
pub use timing::ComponentTiming;
pub use timezone::{Instant, TimeResolver, TimeValue, epoch_in, local_to_instant};
