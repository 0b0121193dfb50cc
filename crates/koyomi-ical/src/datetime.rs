//! iCalendar date and date-time value types (RFC 5545 §3.3.4, §3.3.5).

/// A calendar date without a time component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Date {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl Date {
    /// Creates a new date.
    #[must_use]
    pub const fn new(year: u16, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }
}

impl std::fmt::Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}{:02}{:02}", self.year, self.month, self.day)
    }
}

/// The three forms an RFC 5545 date-time can take.
///
/// A `Zoned` form carries the TZID embedded in the value itself; a TZID may
/// also arrive as a property parameter, which takes precedence during
/// resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateTimeForm {
    /// Absolute time, `Z` suffix (form 2 of §3.3.5).
    Utc,
    /// Floating local time with no zone association (form 1).
    Floating,
    /// Local time in a named zone (form 3).
    Zoned { tzid: String },
}

/// An iCalendar date-time value.
///
/// Wall-clock fields plus the form that tells the resolver how to interpret
/// them. Arithmetic and zone conversion are not done here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub form: DateTimeForm,
}

impl DateTime {
    /// Creates a UTC date-time.
    #[must_use]
    pub const fn utc(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            form: DateTimeForm::Utc,
        }
    }

    /// Creates a floating date-time.
    #[must_use]
    pub const fn floating(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            form: DateTimeForm::Floating,
        }
    }

    /// Creates a zoned date-time with an embedded TZID.
    #[must_use]
    pub fn zoned(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        tzid: impl Into<String>,
    ) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            form: DateTimeForm::Zoned { tzid: tzid.into() },
        }
    }

    /// Returns the date part.
    #[must_use]
    pub const fn date(&self) -> Date {
        Date {
            year: self.year,
            month: self.month,
            day: self.day,
        }
    }
}

impl std::fmt::Display for DateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}{:02}{:02}T{:02}{:02}{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )?;
        if self.form == DateTimeForm::Utc {
            write!(f, "Z")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_date() {
        assert_eq!(Date::new(2018, 7, 4).to_string(), "20180704");
    }

    #[test]
    fn display_utc_datetime() {
        let dt = DateTime::utc(2026, 1, 1, 10, 0, 0);
        assert_eq!(dt.to_string(), "20260101T100000Z");
    }

    #[test]
    fn display_floating_datetime() {
        let dt = DateTime::floating(2026, 1, 1, 10, 30, 5);
        assert_eq!(dt.to_string(), "20260101T103005");
    }

    #[test]
    fn zoned_datetime_keeps_tzid() {
        let dt = DateTime::zoned(2026, 1, 1, 10, 0, 0, "Europe/Berlin");
        assert_eq!(
            dt.form,
            DateTimeForm::Zoned {
                tzid: "Europe/Berlin".to_string()
            }
        );
        // No Z suffix for zoned values
        assert_eq!(dt.to_string(), "20260101T100000");
    }
}
