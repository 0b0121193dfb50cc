//! Recurrence schedule assembly.
//!
//! A schedule combines a component's canonical timing with its RRULE, RDATE,
//! EXDATE, and RECURRENCE-ID override properties into one value the expander
//! walks. Rule strings stay opaque here; they are parsed by the enumerator at
//! expansion time.

use chrono::NaiveDateTime;
use chrono_tz::Tz;
use koyomi_ical::{Calendar, Component};

use crate::timing::ComponentTiming;
use crate::timezone::{Instant, TimeResolver};

/// Maximum number of instances to enumerate per rule (safety limit).
///
/// This prevents runaway enumeration from rules with no COUNT/UNTIL and a
/// distant window end.
pub const DEFAULT_MAX_INSTANCES: u16 = 10_000;

/// The logical set of times a component materialises at.
#[derive(Debug, Clone)]
pub struct Schedule {
    /// Wall-clock fields of the base start, interpreted in `zone`.
    ///
    /// Anchoring on the wall clock (not the absolute instant) keeps
    /// recurring local times stable across DST transitions.
    pub base_local: NaiveDateTime,
    /// The component zone every generated wall clock is interpreted in.
    pub zone: Tz,
    /// Base duration in integer seconds.
    pub duration_seconds: i64,
    /// Date-space span for all-day components; `None` selects absolute
    /// seconds arithmetic for the end instant.
    pub date_span_days: Option<i64>,
    /// Recurrence rules, verbatim RFC 5545 strings.
    pub rules: Vec<String>,
    /// Positive recurrence times (RDATE).
    pub rdates: Vec<Instant>,
    /// Excluded times: EXDATEs plus sibling override RECURRENCE-IDs.
    pub exdates: Vec<Instant>,
    /// Instance safety cap handed to the enumerator.
    pub max_instances: u16,
}

impl Schedule {
    /// Creates a one-instant schedule from canonical timing.
    #[must_use]
    pub fn new(timing: &ComponentTiming, zone: Tz) -> Self {
        Self {
            base_local: timing.start_time.naive_local(),
            zone,
            duration_seconds: timing.duration_seconds(),
            date_span_days: timing.is_all_day.then(|| timing.date_span_days()),
            rules: Vec::new(),
            rdates: Vec::new(),
            exdates: Vec::new(),
            max_instances: DEFAULT_MAX_INSTANCES,
        }
    }

    /// Adds a recurrence rule string.
    #[must_use]
    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rules.push(rule.into());
        self
    }

    /// Adds a positive recurrence time.
    #[must_use]
    pub fn with_rdate(mut self, rdate: Instant) -> Self {
        self.rdates.push(rdate);
        self
    }

    /// Adds an excluded time.
    #[must_use]
    pub fn with_exdate(mut self, exdate: Instant) -> Self {
        self.exdates.push(exdate);
        self
    }

    /// Sets the instance safety cap.
    #[must_use]
    pub fn with_max_instances(mut self, max: u16) -> Self {
        self.max_instances = max;
        self
    }

    /// ## Summary
    /// Builds the schedule for a component.
    ///
    /// `siblings` are the other components of the calendar sharing this
    /// component's UID; each sibling's RECURRENCE-ID suppresses the matching
    /// instance of this component's expansion (the override is expanded as a
    /// component of its own).
    ///
    /// A component whose own RECURRENCE-ID is set is a one-off: its schedule
    /// is exactly its own start, regardless of any recurrence properties, and
    /// it is not suppressed by its own RECURRENCE-ID.
    pub fn for_component(
        component: &Component,
        calendar: Option<&Calendar>,
        siblings: &[&Component],
        resolver: &mut TimeResolver,
    ) -> Self {
        let timing = ComponentTiming::derive(component, calendar, resolver);
        let zone = resolver.component_zone(component, calendar);
        let mut schedule = Schedule::new(&timing, zone);

        if component.recurrence_id().is_some() {
            return schedule;
        }

        for prop in component.rrules() {
            let rule = prop.as_text().unwrap_or(&prop.raw_value).trim();
            if !rule.is_empty() {
                schedule.rules.push(rule.to_string());
            }
        }

        for prop in component.rdates() {
            schedule.rdates.push(resolver.to_instant(prop.into(), zone));
        }

        for prop in component.exdates() {
            schedule.exdates.push(resolver.to_instant(prop.into(), zone));
        }

        for sibling in siblings {
            if let Some(rid) = sibling.recurrence_id() {
                schedule.exdates.push(resolver.to_instant(rid.into(), zone));
            }
        }

        schedule
    }
}
