//! iCalendar property values (RFC 5545 §3.3).

use super::{Date, DateTime, Duration};

/// A parsed property value.
///
/// Recurrence rules deliberately stay as `Text`: the expansion engine hands
/// the rule string to the RRULE enumerator verbatim and never interprets it.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// TEXT value.
    Text(String),
    /// INTEGER value.
    Integer(i32),
    /// DATE value.
    Date(Date),
    /// DATE-TIME value.
    DateTime(DateTime),
    /// DURATION value.
    Duration(Duration),
    /// A value the model does not interpret (preserved raw).
    Unknown(String),
}

impl Value {
    /// Returns the text content if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the date if this is a date value.
    #[must_use]
    pub fn as_date(&self) -> Option<Date> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Returns the date-time if this is a date-time value.
    #[must_use]
    pub fn as_datetime(&self) -> Option<&DateTime> {
        match self {
            Value::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    /// Returns the duration if this is a duration value.
    #[must_use]
    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            Value::Duration(d) => Some(*d),
            _ => None,
        }
    }
}
