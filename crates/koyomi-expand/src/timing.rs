//! Canonical timing derivation for a single component.
//!
//! RFC 5545 leaves the `(start, end)` pair of a component ambiguous: DTEND
//! may be missing, DTSTART may be missing, tasks carry DUE instead, DURATION
//! is an alternative to DTEND, and all-day components use bare dates. This
//! module collapses those shapes into one canonical, zoned pair plus
//! classification flags.

use chrono::{Days, NaiveTime, TimeDelta};
use koyomi_ical::{Calendar, Component, ComponentKind, Property};

use crate::timezone::{Instant, TimeResolver, epoch_in, local_to_instant};

const SECONDS_PER_DAY: i64 = 86_400;

/// Canonical timing and classification for one component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentTiming {
    /// Canonical start, always present and zoned.
    pub start_time: Instant,
    /// Canonical end, always present and zoned; never before the start.
    pub end_time: Instant,
    /// Whole-calendar-day event (bare-date DTSTART, or midnight-to-midnight).
    pub is_all_day: bool,
    /// Ends strictly after the start of the next calendar day of the start.
    pub is_multi_day: bool,
    /// Start and end coincide at second precision (deadline-only).
    pub is_single_timestamp: bool,
}

impl ComponentTiming {
    /// ## Summary
    /// Derives canonical timing for a component.
    ///
    /// Duration defaults: an explicit DURATION property wins; an Event whose
    /// DTSTART is a bare date with no DTEND/DURATION/DUE spans one day;
    /// everything else defaults to zero seconds.
    ///
    /// Start, first match wins: DTSTART; DUE minus the duration (or DUE
    /// itself when the duration is zero); the epoch sentinel.
    ///
    /// End, first match wins: DUE (a task carrying both DUE and DURATION is
    /// invalid per RFC 5545, but real-world data contains it and DUE wins);
    /// DTEND; the all-day date-space path (start date plus whole days, at
    /// midnight); DTSTART plus the duration; the epoch plus the duration.
    ///
    /// Never fails: unreadable inputs degrade to the epoch in the component
    /// zone.
    pub fn derive(
        component: &Component,
        calendar: Option<&Calendar>,
        resolver: &mut TimeResolver,
    ) -> Self {
        let zone = resolver.component_zone(component, calendar);
        let is_event = component.kind == Some(ComponentKind::Event);

        let dtstart = component.dtstart();
        let dtend = component.dtend();
        let due = component.due();
        let duration = component.duration();

        let explicit_seconds = duration
            .and_then(Property::as_duration)
            .map(|d| d.to_seconds().max(0));
        let start_is_date = dtstart.is_some_and(|p| p.as_date().is_some());
        let guessed_seconds = if is_event
            && start_is_date
            && dtend.is_none()
            && due.is_none()
            && duration.is_none()
        {
            SECONDS_PER_DAY
        } else {
            0
        };
        let duration_seconds = explicit_seconds.unwrap_or(guessed_seconds);

        let start_time = if let Some(prop) = dtstart {
            resolver.to_instant(prop.into(), zone)
        } else if let Some(prop) = due {
            let due_time = resolver.to_instant(prop.into(), zone);
            if duration_seconds > 0 {
                due_time - TimeDelta::seconds(duration_seconds)
            } else {
                due_time
            }
        } else {
            epoch_in(zone)
        };

        let end_time = if let Some(prop) = due {
            resolver.to_instant(prop.into(), zone)
        } else if let Some(prop) = dtend {
            resolver.to_instant(prop.into(), zone)
        } else if is_event && start_is_date {
            // Date-space arithmetic: whole days, then midnight in the zone.
            // Safe across DST transitions where a day is not 86400 seconds.
            let whole_days = u64::try_from(duration_seconds / SECONDS_PER_DAY).unwrap_or(0);
            let end_date = start_time
                .date_naive()
                .checked_add_days(Days::new(whole_days))
                .unwrap_or_else(|| start_time.date_naive());
            local_to_instant(zone, end_date.and_time(NaiveTime::MIN))
        } else if dtstart.is_some() {
            start_time + TimeDelta::seconds(duration_seconds)
        } else {
            epoch_in(zone) + TimeDelta::seconds(duration_seconds)
        };

        let at_midnight =
            |instant: &Instant| instant.naive_local().time() == NaiveTime::MIN;
        let is_all_day = is_event && (start_is_date || (at_midnight(&start_time) && at_midnight(&end_time)));

        let next_day_start = local_to_instant(
            start_time.timezone(),
            start_time
                .date_naive()
                .checked_add_days(Days::new(1))
                .unwrap_or_else(|| start_time.date_naive())
                .and_time(NaiveTime::MIN),
        );
        let is_multi_day = end_time > next_day_start;

        let is_single_timestamp = start_time.timestamp() == end_time.timestamp();

        Self {
            start_time,
            end_time,
            is_all_day,
            is_multi_day,
            is_single_timestamp,
        }
    }

    /// The base duration in integer seconds.
    #[must_use]
    pub fn duration_seconds(&self) -> i64 {
        (self.end_time - self.start_time).num_seconds()
    }

    /// The date-space span in whole days (meaningful for all-day components).
    #[must_use]
    pub fn date_span_days(&self) -> i64 {
        (self.end_time.date_naive() - self.start_time.date_naive()).num_days()
    }
}
