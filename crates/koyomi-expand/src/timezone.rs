//! Timezone resolution and instant conversion for iCalendar date-times.
//!
//! Every time-shaped input is normalised to an [`Instant`]: a wall-clock
//! moment in an identified zone. Inputs that cannot be interpreted degrade to
//! the UNIX epoch in the applicable zone; nothing in this module returns an
//! error to the caller.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{
    DateTime as ChronoDateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime,
    Offset, TimeDelta, TimeZone, Utc,
};
use chrono_tz::Tz;
use koyomi_ical::{Calendar, Component, DateTimeForm, Property, Value};

/// A point in time carrying an explicit zone.
pub type Instant = ChronoDateTime<Tz>;

/// Returns the UNIX epoch sentinel projected into a zone.
#[must_use]
pub fn epoch_in(zone: Tz) -> Instant {
    ChronoDateTime::<Utc>::UNIX_EPOCH.with_timezone(&zone)
}

/// ## Summary
/// Converts a wall-clock datetime to an instant in the given zone.
///
/// Handles DST gaps (non-existent times) and folds (ambiguous times)
/// according to RFC 5545 semantics: folds take the first occurrence, gaps
/// shift forward one hour and retry. A wall clock that still cannot be
/// placed degrades to the epoch in the zone.
#[must_use]
pub fn local_to_instant(zone: Tz, local: NaiveDateTime) -> Instant {
    match zone.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt,
        // DST fold: time occurs twice
        // RFC 5545 §3.3.5 specifies using the first occurrence (before DST shift)
        LocalResult::Ambiguous(dt1, _dt2) => dt1,
        LocalResult::None => {
            // DST gap: shift forward by one hour and retry
            let shifted = local + TimeDelta::hours(1);
            match zone.from_local_datetime(&shifted) {
                LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt,
                LocalResult::None => {
                    tracing::warn!(%local, zone = zone.name(), "unresolvable wall clock, degrading to epoch");
                    epoch_in(zone)
                }
            }
        }
    }
}

/// A time-shaped input accepted by [`TimeResolver::to_instant`].
#[derive(Debug, Clone, Copy)]
pub enum TimeValue<'a> {
    /// An iCalendar date or date-time property (TZID parameter honoured).
    Ical(&'a Property),
    /// An already-zoned instant.
    Zoned(Instant),
    /// A fixed-offset datetime; offset zero reads as floating by default.
    Fixed(ChronoDateTime<FixedOffset>),
    /// A naive date.
    Date(NaiveDate),
    /// Seconds since the UNIX epoch.
    UnixSeconds(i64),
}

impl<'a> From<&'a Property> for TimeValue<'a> {
    fn from(prop: &'a Property) -> Self {
        TimeValue::Ical(prop)
    }
}

impl From<Instant> for TimeValue<'_> {
    fn from(instant: Instant) -> Self {
        TimeValue::Zoned(instant)
    }
}

impl From<ChronoDateTime<FixedOffset>> for TimeValue<'_> {
    fn from(dt: ChronoDateTime<FixedOffset>) -> Self {
        TimeValue::Fixed(dt)
    }
}

impl From<NaiveDate> for TimeValue<'_> {
    fn from(date: NaiveDate) -> Self {
        TimeValue::Date(date)
    }
}

impl From<i64> for TimeValue<'_> {
    fn from(seconds: i64) -> Self {
        TimeValue::UnixSeconds(seconds)
    }
}

/// Resolver for timezone identifiers and time-shaped values.
///
/// Maintains a cache of resolved zones and a lazily-detected system zone so
/// repeated lookups during a scan stay cheap.
pub struct TimeResolver {
    /// Cache of resolved IANA timezones by TZID.
    cache: HashMap<String, Tz>,
    /// Lazily detected system zone.
    system: Option<Tz>,
    /// Whether offset-zero datetimes read as floating wall clock.
    ///
    /// Common encoders emit offset zero when they mean "wall clock", so the
    /// default is `true`; disabling it restores a strict UTC reading.
    floating_zero_offset: bool,
}

impl TimeResolver {
    /// Creates a new resolver with the default options.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            system: None,
            floating_zero_offset: true,
        }
    }

    /// Sets whether offset-zero datetimes are read as floating wall clock.
    #[must_use]
    pub fn with_floating_zero_offset(mut self, enabled: bool) -> Self {
        self.floating_zero_offset = enabled;
        self
    }

    /// ## Summary
    /// Resolves a timezone identifier, degrading to UTC.
    ///
    /// Unknown identifiers are logged and replaced with UTC; this never
    /// fails.
    ///
    /// ## Side Effects
    /// Caches successful resolutions to avoid repeated parsing.
    pub fn ensure_zone(&mut self, tzid: &str) -> Tz {
        match self.try_zone(tzid) {
            Some(tz) => tz,
            None => {
                tracing::warn!(tzid, "unknown timezone, falling back to UTC");
                Tz::UTC
            }
        }
    }

    /// Resolves a timezone identifier, returning `None` if unknown.
    pub fn try_zone(&mut self, tzid: &str) -> Option<Tz> {
        if let Some(tz) = self.cache.get(tzid) {
            return Some(*tz);
        }

        let normalized = normalize_tzid(tzid);
        let tz = Tz::from_str(&normalized).ok()?;

        self.cache.insert(tzid.to_string(), tz);
        Some(tz)
    }

    /// ## Summary
    /// Detects the zone the process is running in.
    ///
    /// Consults the `TZ` environment variable first, then the platform zone
    /// database links (`/etc/timezone`, `/etc/localtime`) via
    /// `iana-time-zone`, then falls back to UTC.
    pub fn system_zone(&mut self) -> Tz {
        if let Some(tz) = self.system {
            return tz;
        }

        let detected = std::env::var("TZ")
            .ok()
            .and_then(|name| Tz::from_str(name.trim().trim_start_matches(':')).ok())
            .or_else(|| {
                iana_time_zone::get_timezone()
                    .ok()
                    .and_then(|name| Tz::from_str(&name).ok())
            })
            .unwrap_or(Tz::UTC);

        self.system = Some(detected);
        detected
    }

    /// ## Summary
    /// Determines the effective zone of a component.
    ///
    /// Layered sources, first match wins:
    /// 1. explicit TZID parameter on DTEND, DTSTART, DUE (in that order);
    /// 2. a zone already attached to one of those values (embedded TZID or
    ///    the UTC marker);
    /// 3. the first valid TZID advertised by a VTIMEZONE of the enclosing
    ///    calendar;
    /// 4. the detected system zone;
    /// 5. UTC.
    pub fn component_zone(&mut self, component: &Component, calendar: Option<&Calendar>) -> Tz {
        let anchors = [component.dtend(), component.dtstart(), component.due()];

        for prop in anchors.iter().flatten() {
            if let Some(tzid) = prop.tzid() {
                return self.ensure_zone(tzid);
            }
        }

        for prop in anchors.iter().flatten() {
            match prop.as_datetime().map(|dt| &dt.form) {
                Some(DateTimeForm::Zoned { tzid }) => return self.ensure_zone(tzid),
                Some(DateTimeForm::Utc) => return Tz::UTC,
                _ => {}
            }
        }

        if let Some(calendar) = calendar {
            for tzid in calendar.tzids() {
                if let Some(tz) = self.try_zone(tzid) {
                    return tz;
                }
            }
        }

        self.system_zone()
    }

    /// ## Summary
    /// Normalises any time-shaped input to an instant.
    ///
    /// Rules, in priority order:
    /// 1. an iCalendar value carrying an explicit TZID is interpreted in that
    ///    zone;
    /// 2. an already-zoned input is returned unchanged if its zone equals the
    ///    target, otherwise converted preserving the absolute instant;
    /// 3. a floating datetime is interpreted as wall clock in the target zone
    ///    (not UTC-preserving);
    /// 4. a date becomes midnight in the target zone;
    /// 5. an integer counts seconds since the UNIX epoch;
    /// 6. anything unusable degrades to the epoch in the target zone.
    ///
    /// This never fails.
    pub fn to_instant(&mut self, value: TimeValue<'_>, target: Tz) -> Instant {
        match value {
            TimeValue::Ical(prop) => self.ical_to_instant(prop, target),
            TimeValue::Zoned(instant) => {
                if instant.timezone() == target {
                    instant
                } else {
                    instant.with_timezone(&target)
                }
            }
            TimeValue::Fixed(dt) => {
                if dt.offset().fix().local_minus_utc() == 0 && self.floating_zero_offset {
                    local_to_instant(target, dt.naive_local())
                } else {
                    dt.with_timezone(&target)
                }
            }
            TimeValue::Date(date) => local_to_instant(target, date.and_time(NaiveTime::MIN)),
            TimeValue::UnixSeconds(seconds) => match ChronoDateTime::from_timestamp(seconds, 0) {
                Some(dt) => dt.with_timezone(&target),
                None => {
                    tracing::warn!(seconds, "timestamp out of range, degrading to epoch");
                    epoch_in(target)
                }
            },
        }
    }

    fn ical_to_instant(&mut self, prop: &Property, target: Tz) -> Instant {
        match &prop.value {
            Value::DateTime(dt) => {
                let Some(local) = ical_wall_clock(dt) else {
                    tracing::warn!(property = %prop.name, raw = %prop.raw_value, "unreadable date-time, degrading to epoch");
                    return epoch_in(target);
                };

                if let Some(tzid) = prop.tzid() {
                    let zone = self.ensure_zone(tzid);
                    return local_to_instant(zone, local);
                }

                match &dt.form {
                    DateTimeForm::Zoned { tzid } => {
                        let zone = self.ensure_zone(tzid);
                        local_to_instant(zone, local)
                    }
                    DateTimeForm::Utc => Utc.from_utc_datetime(&local).with_timezone(&target),
                    DateTimeForm::Floating => local_to_instant(target, local),
                }
            }
            Value::Date(date) => {
                let Some(date) = NaiveDate::from_ymd_opt(
                    i32::from(date.year),
                    u32::from(date.month),
                    u32::from(date.day),
                ) else {
                    tracing::warn!(property = %prop.name, raw = %prop.raw_value, "unreadable date, degrading to epoch");
                    return epoch_in(target);
                };
                let zone = match prop.tzid() {
                    Some(tzid) => self.ensure_zone(tzid),
                    None => target,
                };
                local_to_instant(zone, date.and_time(NaiveTime::MIN))
            }
            _ => {
                tracing::warn!(property = %prop.name, raw = %prop.raw_value, "time-shaped property has unusable value, degrading to epoch");
                epoch_in(target)
            }
        }
    }
}

impl Default for TimeResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Converts an iCalendar date-time's fields to a `NaiveDateTime`.
fn ical_wall_clock(dt: &koyomi_ical::DateTime) -> Option<NaiveDateTime> {
    let date = NaiveDate::from_ymd_opt(
        i32::from(dt.year),
        u32::from(dt.month),
        u32::from(dt.day),
    )?;
    let time = NaiveTime::from_hms_opt(
        u32::from(dt.hour),
        u32::from(dt.minute),
        u32::from(dt.second),
    )?;
    Some(NaiveDateTime::new(date, time))
}

/// Normalizes common CalDAV/iCalendar timezone identifiers to IANA names.
///
/// Many calendar clients quote TZID values, emit multi-valued parameters, or
/// use vendor and Windows zone names that need to be mapped before the IANA
/// lookup.
fn normalize_tzid(tzid: &str) -> String {
    // A multi-valued TZID flattens to its first element
    let first = tzid.split(',').next().unwrap_or(tzid).trim();
    let unquoted = first.trim_matches('"');

    // Strip common vendor prefixes
    let stripped = unquoted
        .strip_prefix("/mozilla.org/")
        .or_else(|| unquoted.strip_prefix("/softwarestudio.org/"))
        .unwrap_or(unquoted);

    // Map Windows timezone names (common in Outlook exports)
    let mapped = match stripped {
        "Eastern Standard Time" => "America/New_York",
        "Pacific Standard Time" => "America/Los_Angeles",
        "Central Standard Time" => "America/Chicago",
        "Mountain Standard Time" => "America/Denver",
        "GMT Standard Time" => "Europe/London",
        "W. Europe Standard Time" => "Europe/Berlin",
        other => other,
    };

    mapped.to_string()
}
