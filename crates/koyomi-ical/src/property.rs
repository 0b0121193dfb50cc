//! iCalendar property type (RFC 5545 §3.1, §3.8).

use super::{Date, DateTime, Duration, Parameter, Value};

/// A calendar property.
///
/// Holds the parsed value along with the original raw value string.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Property name (normalized to uppercase).
    pub name: String,
    /// Parameters in order of appearance.
    pub params: Vec<Parameter>,
    /// Parsed value.
    pub value: Value,
    /// Original raw value string.
    pub raw_value: String,
}

impl Property {
    /// Creates a property with a text value.
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        let value_str = value.into();
        Self {
            name: name.into().to_ascii_uppercase(),
            params: Vec::new(),
            value: Value::Text(value_str.clone()),
            raw_value: value_str,
        }
    }

    /// Creates a property with an integer value.
    #[must_use]
    pub fn integer(name: impl Into<String>, value: i32) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            params: Vec::new(),
            value: Value::Integer(value),
            raw_value: value.to_string(),
        }
    }

    /// Creates a property with a date value.
    #[must_use]
    pub fn date(name: impl Into<String>, date: Date) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            params: Vec::new(),
            value: Value::Date(date),
            raw_value: date.to_string(),
        }
    }

    /// Creates a property with a date-time value.
    #[must_use]
    pub fn datetime(name: impl Into<String>, dt: DateTime) -> Self {
        let raw = dt.to_string();
        Self {
            name: name.into().to_ascii_uppercase(),
            params: Vec::new(),
            value: Value::DateTime(dt),
            raw_value: raw,
        }
    }

    /// Creates a property with a duration value.
    #[must_use]
    pub fn duration(name: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            params: Vec::new(),
            value: Value::Duration(duration),
            raw_value: duration.to_string(),
        }
    }

    /// Adds a parameter, builder-style.
    #[must_use]
    pub fn with_param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    /// Returns the parameter with the given name.
    #[must_use]
    pub fn get_param(&self, name: &str) -> Option<&Parameter> {
        let name_upper = name.to_ascii_uppercase();
        self.params.iter().find(|p| p.name == name_upper)
    }

    /// Returns the value of a parameter.
    #[must_use]
    pub fn get_param_value(&self, name: &str) -> Option<&str> {
        self.get_param(name)?.value()
    }

    /// Returns whether this property has a parameter with the given name.
    #[must_use]
    pub fn has_param(&self, name: &str) -> bool {
        self.get_param(name).is_some()
    }

    /// Returns the TZID parameter if present.
    #[must_use]
    pub fn tzid(&self) -> Option<&str> {
        self.get_param_value("TZID")
    }

    /// Returns the text content if the value is text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        self.value.as_text()
    }

    /// Returns the date if the value is a date.
    #[must_use]
    pub fn as_date(&self) -> Option<Date> {
        self.value.as_date()
    }

    /// Returns the date-time if the value is a date-time.
    #[must_use]
    pub fn as_datetime(&self) -> Option<&DateTime> {
        self.value.as_datetime()
    }

    /// Returns the duration if the value is a duration.
    #[must_use]
    pub fn as_duration(&self) -> Option<Duration> {
        self.value.as_duration()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_property() {
        let p = Property::text("summary", "Standup");
        assert_eq!(p.name, "SUMMARY");
        assert_eq!(p.as_text(), Some("Standup"));
        assert_eq!(p.raw_value, "Standup");
    }

    #[test]
    fn datetime_property_raw_value() {
        let p = Property::datetime("DTSTART", DateTime::utc(2026, 1, 1, 10, 0, 0));
        assert_eq!(p.raw_value, "20260101T100000Z");
        assert!(p.as_datetime().is_some());
        assert_eq!(p.as_text(), None);
    }

    #[test]
    fn tzid_parameter_lookup() {
        let p = Property::datetime("DTSTART", DateTime::floating(2026, 1, 1, 9, 0, 0))
            .with_param(Parameter::tzid("Europe/Berlin"));
        assert_eq!(p.tzid(), Some("Europe/Berlin"));
        assert!(p.has_param("tzid"));
        assert!(!p.has_param("VALUE"));
    }

    #[test]
    fn duration_property() {
        let d = Duration::parse("PT1H").unwrap();
        let p = Property::duration("DURATION", d);
        assert_eq!(p.as_duration(), Some(d));
        assert_eq!(p.raw_value, "PT1H");
    }
}
