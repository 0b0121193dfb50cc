//! Top-level calendar scan.

use koyomi_ical::{Calendar, Component, ComponentKind};

use crate::error::{ExpandError, ExpandResult};
use crate::expander::{TimeRange, expand};
use crate::occurrence::Occurrence;
use crate::schedule::Schedule;
use crate::timezone::TimeResolver;

/// ## Summary
/// Expands a calendar into occurrences inside the window, ascending by
/// `(start_time, end_time)`.
///
/// `kinds` selects which component kinds to expand, drawn from Event, Todo,
/// Journal, and FreeBusy; duplicates are ignored. Components sharing a UID
/// are treated as one recurrence set: a sibling's RECURRENCE-ID suppresses
/// the matching parent instance, and the override itself is emitted as an
/// occurrence of its own component.
///
/// An empty or inverted window yields an empty result.
///
/// ## Errors
/// Returns `ExpandError::InvalidKind` if a requested kind cannot be
/// expanded. Data-level problems never fail the scan; they degrade per
/// component with a warning.
pub fn scan<'a>(
    calendar: &'a Calendar,
    range: TimeRange,
    kinds: &[ComponentKind],
) -> ExpandResult<Vec<Occurrence<'a>>> {
    for kind in kinds {
        if !kind.is_scannable() {
            return Err(ExpandError::InvalidKind(*kind));
        }
    }

    let mut resolver = TimeResolver::new();
    let mut occurrences = Vec::new();
    let mut seen_kinds: Vec<ComponentKind> = Vec::new();

    for kind in kinds {
        if seen_kinds.contains(kind) {
            continue;
        }
        seen_kinds.push(*kind);

        for component in calendar.components_of_kind(*kind) {
            let siblings = siblings_of(calendar, component);
            let schedule =
                Schedule::for_component(component, Some(calendar), &siblings, &mut resolver);

            for (start, end) in expand(&schedule, range) {
                occurrences.push(Occurrence::new(Some(calendar), component, start, end));
            }
        }
    }

    occurrences.sort();
    Ok(occurrences)
}

/// Expands only the events of a calendar (the default kind set).
///
/// ## Errors
/// Infallible in practice; kept fallible for signature parity with [`scan`].
pub fn scan_events<'a>(
    calendar: &'a Calendar,
    range: TimeRange,
) -> ExpandResult<Vec<Occurrence<'a>>> {
    scan(calendar, range, &[ComponentKind::Event])
}

/// Returns the other components of the calendar sharing this component's UID.
fn siblings_of<'a>(calendar: &'a Calendar, component: &Component) -> Vec<&'a Component> {
    let Some(uid) = component.uid() else {
        return Vec::new();
    };
    calendar
        .components
        .iter()
        .filter(|c| !std::ptr::eq(*c, component) && c.uid() == Some(uid))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use koyomi_ical::{DateTime, Property};

    fn range(begin: (i32, u32, u32), end: (i32, u32, u32)) -> TimeRange {
        TimeRange::dates(
            NaiveDate::from_ymd_opt(begin.0, begin.1, begin.2).unwrap(),
            NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
        )
    }

    fn daily_event(uid: &str) -> Component {
        Component::event()
            .with_property(Property::text("UID", uid))
            .with_property(Property::datetime(
                "DTSTART",
                DateTime::utc(2026, 1, 5, 9, 0, 0),
            ))
            .with_property(Property::datetime(
                "DTEND",
                DateTime::utc(2026, 1, 5, 10, 0, 0),
            ))
            .with_property(Property::text("RRULE", "FREQ=DAILY;COUNT=5"))
    }

    #[test]
    fn test_scan_rejects_unknown_kind() {
        let calendar = Calendar::new();
        let result = scan(
            &calendar,
            range((2026, 1, 1), (2026, 2, 1)),
            &[ComponentKind::Timezone],
        );
        assert!(matches!(result, Err(ExpandError::InvalidKind(_))));
    }

    #[test]
    fn test_scan_empty_window_is_empty_but_ok() {
        let calendar = Calendar::new().with_component(daily_event("e1"));
        let occurrences = scan_events(&calendar, range((2026, 2, 1), (2026, 1, 1)))
            .expect("inverted window must not fail");
        assert!(occurrences.is_empty());
    }

    #[test]
    fn test_scan_merges_and_sorts_components() {
        let mut other = daily_event("e2");
        // Shift the second event half an hour later
        other.properties.retain(|p| p.name != "DTSTART");
        other.add_property(Property::datetime(
            "DTSTART",
            DateTime::utc(2026, 1, 5, 9, 30, 0),
        ));

        let calendar = Calendar::new()
            .with_component(daily_event("e1"))
            .with_component(other);
        let occurrences =
            scan_events(&calendar, range((2026, 1, 1), (2026, 2, 1))).expect("scan succeeds");

        assert_eq!(occurrences.len(), 10);
        for pair in occurrences.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn test_scan_is_idempotent() {
        let calendar = Calendar::new().with_component(daily_event("e1"));
        let first = scan_events(&calendar, range((2026, 1, 1), (2026, 2, 1))).unwrap();
        let second = scan_events(&calendar, range((2026, 1, 1), (2026, 2, 1))).unwrap();

        assert_eq!(first.len(), second.len());
        assert!(first.iter().zip(&second).all(|(a, b)| a == b));
    }

    #[test]
    fn test_scan_duplicate_kinds_do_not_duplicate_output() {
        let calendar = Calendar::new().with_component(daily_event("e1"));
        let occurrences = scan(
            &calendar,
            range((2026, 1, 1), (2026, 2, 1)),
            &[ComponentKind::Event, ComponentKind::Event],
        )
        .unwrap();
        assert_eq!(occurrences.len(), 5);
    }

    #[test]
    fn test_scan_todos_and_events_together() {
        let todo = Component::todo()
            .with_property(Property::text("UID", "t1"))
            .with_property(Property::datetime("DUE", DateTime::utc(2026, 1, 7, 12, 0, 0)));
        let calendar = Calendar::new()
            .with_component(daily_event("e1"))
            .with_component(todo);

        let occurrences = scan(
            &calendar,
            range((2026, 1, 1), (2026, 2, 1)),
            &[ComponentKind::Event, ComponentKind::Todo],
        )
        .unwrap();

        assert_eq!(occurrences.len(), 6);
        let deadline = occurrences
            .iter()
            .find(|o| o.uid() == Some("t1"))
            .expect("todo occurrence present");
        assert_eq!(deadline.start_time(), deadline.end_time());
    }
}
