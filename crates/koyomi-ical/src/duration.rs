//! iCalendar duration value type (RFC 5545 §3.3.6).

use crate::ModelError;

/// An RFC 5545 duration.
///
/// The grammar only combines weeks-or-days with a time part; months and years
/// do not occur, so a duration always collapses to an exact number of
/// seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Duration {
    pub negative: bool,
    pub weeks: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl Duration {
    /// Parses an RFC 5545 duration string such as `P15DT5H0M20S` or `-PT30M`.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidDuration` if the string does not follow the
    /// dur-value grammar.
    pub fn parse(input: &str) -> Result<Self, ModelError> {
        let s = input.trim();
        let (negative, rest) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        let rest = rest
            .strip_prefix('P')
            .ok_or_else(|| ModelError::InvalidDuration(input.to_string()))?;

        let mut duration = Duration {
            negative,
            ..Duration::default()
        };

        let mut in_time = false;
        let mut number = String::new();
        let mut saw_field = false;

        for ch in rest.chars() {
            match ch {
                'T' if !in_time && number.is_empty() => in_time = true,
                '0'..='9' => number.push(ch),
                'W' | 'D' | 'H' | 'M' | 'S' => {
                    let value: u32 = number
                        .parse()
                        .map_err(|_| ModelError::InvalidDuration(input.to_string()))?;
                    number.clear();
                    saw_field = true;
                    match (ch, in_time) {
                        ('W', false) => duration.weeks = value,
                        ('D', false) => duration.days = value,
                        ('H', true) => duration.hours = value,
                        ('M', true) => duration.minutes = value,
                        ('S', true) => duration.seconds = value,
                        _ => return Err(ModelError::InvalidDuration(input.to_string())),
                    }
                }
                _ => return Err(ModelError::InvalidDuration(input.to_string())),
            }
        }

        if !saw_field || !number.is_empty() {
            return Err(ModelError::InvalidDuration(input.to_string()));
        }

        Ok(duration)
    }

    /// Collapses the duration to signed seconds.
    #[must_use]
    pub fn to_seconds(self) -> i64 {
        let total = i64::from(self.weeks) * 7 * 86_400
            + i64::from(self.days) * 86_400
            + i64::from(self.hours) * 3_600
            + i64::from(self.minutes) * 60
            + i64::from(self.seconds);
        if self.negative { -total } else { total }
    }
}

impl std::fmt::Display for Duration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.negative {
            write!(f, "-")?;
        }
        write!(f, "P")?;
        if self.weeks > 0 {
            return write!(f, "{}W", self.weeks);
        }
        if self.days > 0 {
            write!(f, "{}D", self.days)?;
        }
        if self.hours > 0 || self.minutes > 0 || self.seconds > 0 || self.days == 0 {
            write!(f, "T")?;
            if self.hours > 0 {
                write!(f, "{}H", self.hours)?;
            }
            if self.minutes > 0 {
                write!(f, "{}M", self.minutes)?;
            }
            if self.seconds > 0 || (self.hours == 0 && self.minutes == 0) {
                write!(f, "{}S", self.seconds)?;
            }
        }
        Ok(())
    }
}

impl std::str::FromStr for Duration {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
