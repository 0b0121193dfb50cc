//! Schedule expansion inside a window.
//!
//! The RRULE enumeration itself is delegated to the `rrule` crate; this
//! module anchors it on the component zone, re-interprets every produced wall
//! clock in that zone (DST-stable), applies exclusions and the window filter,
//! and materialises `(start, end)` pairs.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime as ChronoDateTime, Days, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use rrule::{RRule, Tz as RRuleTz, Unvalidated};

use crate::schedule::Schedule;
use crate::timezone::{Instant, local_to_instant};

/// A half-open UTC window `[begin, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub begin: ChronoDateTime<Utc>,
    pub end: ChronoDateTime<Utc>,
}

impl TimeRange {
    /// Creates a window from two UTC instants.
    #[must_use]
    pub const fn instants(begin: ChronoDateTime<Utc>, end: ChronoDateTime<Utc>) -> Self {
        Self { begin, end }
    }

    /// Creates a window from two dates, each projected to midnight UTC.
    #[must_use]
    pub fn dates(begin: NaiveDate, end: NaiveDate) -> Self {
        Self {
            begin: Utc.from_utc_datetime(&begin.and_time(NaiveTime::MIN)),
            end: Utc.from_utc_datetime(&end.and_time(NaiveTime::MIN)),
        }
    }

    /// Returns whether the window covers nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.begin >= self.end
    }
}

/// ## Summary
/// Expands a schedule within the window, in ascending order.
///
/// The base start is always part of the candidate set; each rule contributes
/// its enumeration, RDATEs are added independently, and the union is
/// de-duplicated at second precision. Excluded times are dropped at second
/// precision, then the half-open window filter applies.
///
/// Malformed rule strings are dropped individually with a warning; the other
/// rules still apply.
#[must_use]
pub fn expand(schedule: &Schedule, range: TimeRange) -> Vec<(Instant, Instant)> {
    if range.is_empty() {
        return Vec::new();
    }

    // Keyed by epoch second: de-duplication and ascending order in one place
    let mut starts: BTreeMap<i64, Instant> = BTreeMap::new();

    let base = local_to_instant(schedule.zone, schedule.base_local);
    starts.insert(base.timestamp(), base);

    let enumerator_zone = RRuleTz::Tz(schedule.zone);
    let dt_start = base.with_timezone(&enumerator_zone);
    // One second of slack below the window start: the exact half-open filter
    // happens later, and an occurrence landing exactly on the window start
    // must survive the enumerator's bound.
    let lower_bound = (range.begin - TimeDelta::seconds(1)).with_timezone(&enumerator_zone);
    let upper_bound = range.end.with_timezone(&enumerator_zone);

    for rule in &schedule.rules {
        let unvalidated = match rule.parse::<RRule<Unvalidated>>() {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::warn!(rule, %err, "dropping malformed recurrence rule");
                continue;
            }
        };
        let rule_set = match unvalidated.build(dt_start) {
            Ok(set) => set,
            Err(err) => {
                tracing::warn!(rule, %err, "dropping recurrence rule rejected by the enumerator");
                continue;
            }
        };

        // Bound the enumeration on both sides: without the lower bound, a
        // rule whose DTSTART lies far before the window spends the whole
        // instance cap on pre-window occurrences.
        let result = rule_set
            .after(lower_bound)
            .before(upper_bound)
            .all(schedule.max_instances);
        if result.limited {
            tracing::warn!(
                rule,
                cap = schedule.max_instances,
                "instance cap reached, expansion truncated"
            );
        }
        for produced in result.dates {
            // Re-interpret the produced wall clock in the component zone so a
            // 09:00 local rule stays at 09:00 local across DST transitions.
            let instant = local_to_instant(schedule.zone, produced.naive_local());
            starts.entry(instant.timestamp()).or_insert(instant);
        }
    }

    for rdate in &schedule.rdates {
        starts.entry(rdate.timestamp()).or_insert(*rdate);
    }

    let excluded: HashSet<i64> = schedule.exdates.iter().map(Instant::timestamp).collect();
    let begin_ts = range.begin.timestamp();
    let end_ts = range.end.timestamp();

    starts
        .into_iter()
        .filter(|(ts, _)| !excluded.contains(ts))
        .filter(|(ts, _)| *ts >= begin_ts && *ts < end_ts)
        .map(|(_, start)| (start, end_of(schedule, start)))
        .collect()
}

/// Materialises the end instant for one occurrence start.
fn end_of(schedule: &Schedule, start: Instant) -> Instant {
    match schedule.date_span_days {
        // All-day: preserve the calendar-date delta, never 86400-second
        // arithmetic past a DST boundary
        Some(days) => {
            let end_date = u64::try_from(days)
                .ok()
                .and_then(|days| start.date_naive().checked_add_days(Days::new(days)))
                .unwrap_or_else(|| start.date_naive());
            local_to_instant(start.timezone(), end_date.and_time(NaiveTime::MIN))
        }
        None => start + TimeDelta::seconds(schedule.duration_seconds),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Offset, Timelike};
    use chrono_tz::Tz;
    use koyomi_ical::{Component, Date, DateTime, Parameter, Property};

    use crate::timezone::TimeResolver;

    fn schedule_for(component: &Component) -> Schedule {
        let mut resolver = TimeResolver::new();
        Schedule::for_component(component, None, &[], &mut resolver)
    }

    fn utc_range(b: (i32, u32, u32), e: (i32, u32, u32)) -> TimeRange {
        TimeRange::dates(
            NaiveDate::from_ymd_opt(b.0, b.1, b.2).unwrap(),
            NaiveDate::from_ymd_opt(e.0, e.1, e.2).unwrap(),
        )
    }

    fn berlin_daily_event() -> Component {
        Component::event()
            .with_property(
                Property::datetime("DTSTART", DateTime::floating(2018, 3, 20, 9, 0, 0))
                    .with_param(Parameter::tzid("Europe/Berlin")),
            )
            .with_property(
                Property::datetime("DTEND", DateTime::floating(2018, 3, 20, 10, 0, 0))
                    .with_param(Parameter::tzid("Europe/Berlin")),
            )
            .with_property(Property::text("RRULE", "FREQ=DAILY"))
    }

    #[test]
    fn test_empty_window_yields_nothing() {
        let event = berlin_daily_event();
        let schedule = schedule_for(&event);
        let range = utc_range((2018, 3, 25), (2018, 3, 25));
        assert!(expand(&schedule, range).is_empty());

        let inverted = utc_range((2018, 3, 26), (2018, 3, 25));
        assert!(expand(&schedule, inverted).is_empty());
    }

    #[test]
    fn test_schedule_without_rules_yields_base_start_only() {
        let event = Component::event()
            .with_property(Property::datetime(
                "DTSTART",
                DateTime::utc(2018, 3, 20, 9, 0, 0),
            ))
            .with_property(Property::datetime(
                "DTEND",
                DateTime::utc(2018, 3, 20, 10, 0, 0),
            ));
        let schedule = schedule_for(&event);
        let pairs = expand(&schedule, utc_range((2018, 1, 1), (2019, 1, 1)));

        assert_eq!(pairs.len(), 1);
        assert_eq!(
            pairs[0].0.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2018, 3, 20, 9, 0, 0).unwrap()
        );
        assert_eq!((pairs[0].1 - pairs[0].0).num_seconds(), 3600);
    }

    #[test]
    fn test_daily_rule_preserves_wall_clock_across_dst() {
        // Europe/Berlin springs forward on 2018-03-25
        let event = berlin_daily_event();
        let schedule = schedule_for(&event);
        let pairs = expand(&schedule, utc_range((2018, 3, 23), (2018, 3, 28)));

        assert_eq!(pairs.len(), 5);
        for (start, end) in &pairs {
            assert_eq!(start.naive_local().hour(), 9, "start = {start}");
            assert_eq!((*end - *start).num_seconds(), 3600);
        }
    }

    #[test]
    fn test_exdate_removed_at_second_precision() {
        let event = berlin_daily_event().with_property(
            Property::datetime("EXDATE", DateTime::floating(2018, 3, 24, 9, 0, 0))
                .with_param(Parameter::tzid("Europe/Berlin")),
        );
        let schedule = schedule_for(&event);
        let pairs = expand(&schedule, utc_range((2018, 3, 23), (2018, 3, 28)));

        assert_eq!(pairs.len(), 4);
        assert!(
            pairs
                .iter()
                .all(|(start, _)| start.date_naive() != NaiveDate::from_ymd_opt(2018, 3, 24).unwrap())
        );
    }

    #[test]
    fn test_rdate_added_and_deduplicated() {
        let event = Component::event()
            .with_property(Property::datetime(
                "DTSTART",
                DateTime::utc(2018, 3, 20, 9, 0, 0),
            ))
            .with_property(Property::datetime(
                "DTEND",
                DateTime::utc(2018, 3, 20, 10, 0, 0),
            ))
            // One genuinely new time, one duplicating the base start
            .with_property(Property::datetime(
                "RDATE",
                DateTime::utc(2018, 3, 22, 9, 0, 0),
            ))
            .with_property(Property::datetime(
                "RDATE",
                DateTime::utc(2018, 3, 20, 9, 0, 0),
            ));
        let schedule = schedule_for(&event);
        let pairs = expand(&schedule, utc_range((2018, 1, 1), (2019, 1, 1)));

        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn test_malformed_rule_dropped_others_apply() {
        let event = Component::event()
            .with_property(Property::datetime(
                "DTSTART",
                DateTime::utc(2018, 3, 20, 9, 0, 0),
            ))
            .with_property(Property::datetime(
                "DTEND",
                DateTime::utc(2018, 3, 20, 10, 0, 0),
            ))
            .with_property(Property::text("RRULE", "FREQ=BOGUS"))
            .with_property(Property::text("RRULE", "FREQ=DAILY;COUNT=3"));
        let schedule = schedule_for(&event);
        let pairs = expand(&schedule, utc_range((2018, 1, 1), (2019, 1, 1)));

        assert_eq!(pairs.len(), 3);
    }

    #[test]
    fn test_all_day_yearly_keeps_date_span() {
        let event = Component::event()
            .with_property(Property::date("DTSTART", Date::new(2018, 7, 4)))
            .with_property(Property::text("RRULE", "FREQ=YEARLY"));
        let schedule = schedule_for(&event);
        let pairs = expand(&schedule, utc_range((2020, 1, 1), (2026, 1, 1)));

        assert_eq!(pairs.len(), 6);
        for (start, end) in &pairs {
            assert_eq!(start.naive_local().time(), NaiveTime::MIN);
            assert_eq!(end.naive_local().time(), NaiveTime::MIN);
            assert_eq!((end.date_naive() - start.date_naive()).num_days(), 1);
            assert_eq!(start.date_naive().month(), 7);
            assert_eq!(start.date_naive().day(), 4);
        }
    }

    #[test]
    fn test_window_is_half_open() {
        let event = berlin_daily_event();
        let schedule = schedule_for(&event);
        // Berlin 09:00 CET is 08:00 UTC; a window ending exactly there
        // excludes that instance
        let range = TimeRange::instants(
            Utc.with_ymd_and_hms(2018, 3, 22, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2018, 3, 23, 8, 0, 0).unwrap(),
        );
        let pairs = expand(&schedule, range);

        assert_eq!(pairs.len(), 1);
        assert_eq!(
            pairs[0].0.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2018, 3, 22, 8, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_instance_cap_limits_enumeration() {
        let event = Component::event()
            .with_property(Property::datetime(
                "DTSTART",
                DateTime::utc(2018, 1, 1, 0, 0, 0),
            ))
            .with_property(Property::text("RRULE", "FREQ=SECONDLY"));
        let mut schedule = schedule_for(&event);
        schedule = schedule.with_max_instances(50);
        let pairs = expand(&schedule, utc_range((2018, 1, 1), (2019, 1, 1)));

        assert_eq!(pairs.len(), 50);
    }

    #[test]
    fn test_distant_dtstart_still_yields_window_instances() {
        // More daily steps between DTSTART and the window than the instance
        // cap allows; the lower bound must keep the cap for in-window work
        let event = Component::event()
            .with_property(Property::datetime(
                "DTSTART",
                DateTime::utc(1990, 1, 1, 9, 0, 0),
            ))
            .with_property(Property::datetime(
                "DTEND",
                DateTime::utc(1990, 1, 1, 10, 0, 0),
            ))
            .with_property(Property::text("RRULE", "FREQ=DAILY"));
        let schedule = schedule_for(&event);
        assert!(schedule.max_instances < 13_000); // steps from 1990 to 2026

        let pairs = expand(&schedule, utc_range((2026, 1, 1), (2026, 1, 8)));

        assert_eq!(pairs.len(), 7);
        for (start, _) in &pairs {
            assert_eq!(start.naive_local().hour(), 9);
        }
    }

    #[test]
    fn test_kathmandu_offset() {
        let event = Component::event()
            .with_property(
                Property::datetime("DTSTART", DateTime::floating(2025, 1, 6, 9, 0, 0))
                    .with_param(Parameter::tzid("Asia/Kathmandu")),
            )
            .with_property(
                Property::datetime("DTEND", DateTime::floating(2025, 1, 6, 11, 0, 0))
                    .with_param(Parameter::tzid("Asia/Kathmandu")),
            )
            .with_property(Property::text("RRULE", "FREQ=DAILY;BYDAY=MO,FR;COUNT=10"));
        let schedule = schedule_for(&event);
        let pairs = expand(&schedule, utc_range((2025, 1, 1), (2026, 1, 1)));

        assert_eq!(pairs.len(), 10);
        for (start, end) in &pairs {
            assert_eq!(start.timezone(), Tz::Asia__Kathmandu);
            assert_eq!(start.offset().fix().local_minus_utc(), 20_700);
            assert_eq!(start.naive_local().hour(), 9);
            assert_eq!(end.naive_local().hour(), 11);
        }
    }
}
