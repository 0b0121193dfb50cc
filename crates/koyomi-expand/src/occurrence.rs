//! The immutable per-instance view.

use std::cmp::Ordering;

use koyomi_ical::{Calendar, Component, Property};

use crate::timezone::Instant;

/// One concrete instance of a component at a specific start/end.
///
/// Borrows its base component (and optionally its calendar) rather than
/// copying them; an occurrence must not outlive the calendar it was scanned
/// from. Every read that is not timing-related is forwarded to the base
/// component. The type offers no mutation surface: writes to an occurrence
/// are rejected at compile time.
#[derive(Debug, Clone, Copy)]
pub struct Occurrence<'a> {
    calendar: Option<&'a Calendar>,
    component: &'a Component,
    start_time: Instant,
    end_time: Instant,
}

impl<'a> Occurrence<'a> {
    /// Creates an occurrence bound to a component.
    #[must_use]
    pub fn new(
        calendar: Option<&'a Calendar>,
        component: &'a Component,
        start_time: Instant,
        end_time: Instant,
    ) -> Self {
        Self {
            calendar,
            component,
            start_time,
            end_time,
        }
    }

    /// The zoned start of this instance.
    #[must_use]
    pub fn start_time(&self) -> Instant {
        self.start_time
    }

    /// The zoned end of this instance.
    #[must_use]
    pub fn end_time(&self) -> Instant {
        self.end_time
    }

    /// The base component this instance was expanded from.
    #[must_use]
    pub fn component(&self) -> &'a Component {
        self.component
    }

    /// The enclosing calendar, if one was supplied.
    #[must_use]
    pub fn calendar(&self) -> Option<&'a Calendar> {
        self.calendar
    }

    /// Forwarded: the UID of the base component.
    #[must_use]
    pub fn uid(&self) -> Option<&'a str> {
        self.component.uid()
    }

    /// Forwarded: the SUMMARY of the base component.
    #[must_use]
    pub fn summary(&self) -> Option<&'a str> {
        self.component.summary()
    }

    /// Forwarded: the DESCRIPTION of the base component.
    #[must_use]
    pub fn description(&self) -> Option<&'a str> {
        self.component.description()
    }

    /// Forwarded: the LOCATION of the base component.
    #[must_use]
    pub fn location(&self) -> Option<&'a str> {
        self.component.get_property("LOCATION")?.as_text()
    }

    /// Forwarded: the STATUS of the base component.
    #[must_use]
    pub fn status(&self) -> Option<&'a str> {
        self.component.get_property("STATUS")?.as_text()
    }

    /// Forwarded: the CONTACT entries of the base component.
    #[must_use]
    pub fn contacts(&self) -> Vec<&'a str> {
        self.properties("CONTACT")
            .iter()
            .filter_map(|p| p.as_text())
            .collect()
    }

    /// Forwarded: the CATEGORIES entries of the base component.
    #[must_use]
    pub fn categories(&self) -> Vec<&'a str> {
        self.properties("CATEGORIES")
            .iter()
            .filter_map(|p| p.as_text())
            .collect()
    }

    /// Generic forwarded read for any property name, including X- extensions.
    ///
    /// Returns `None` for a name the base component does not carry.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&'a Property> {
        self.component.get_property(name)
    }

    /// Generic forwarded read for a multi-valued property name.
    ///
    /// Returns an empty sequence for a name the base component does not
    /// carry.
    #[must_use]
    pub fn properties(&self, name: &str) -> Vec<&'a Property> {
        self.component.get_properties(name)
    }

    fn sort_key(&self) -> (i64, i64) {
        (self.start_time.timestamp(), self.end_time.timestamp())
    }
}

impl PartialEq for Occurrence<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}

impl Eq for Occurrence<'_> {}

impl PartialOrd for Occurrence<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Occurrence<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}
