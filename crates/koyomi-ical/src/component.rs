//! iCalendar component and calendar types (RFC 5545 §3.4-3.6).

use super::Property;

/// Component kind for iCalendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// VEVENT component.
    Event,
    /// VTODO component.
    Todo,
    /// VJOURNAL component.
    Journal,
    /// VFREEBUSY component.
    FreeBusy,
    /// VTIMEZONE component.
    Timezone,
    /// Unknown/X-component.
    Unknown,
}

impl ComponentKind {
    /// Returns the string name for this component kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Event => "VEVENT",
            Self::Todo => "VTODO",
            Self::Journal => "VJOURNAL",
            Self::FreeBusy => "VFREEBUSY",
            Self::Timezone => "VTIMEZONE",
            Self::Unknown => "X-UNKNOWN",
        }
    }

    /// Parses a component kind from a string (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "VEVENT" => Self::Event,
            "VTODO" => Self::Todo,
            "VJOURNAL" => Self::Journal,
            "VFREEBUSY" => Self::FreeBusy,
            "VTIMEZONE" => Self::Timezone,
            _ => Self::Unknown,
        }
    }

    /// Returns whether this kind can be expanded into occurrences.
    #[must_use]
    pub const fn is_scannable(self) -> bool {
        matches!(
            self,
            Self::Event | Self::Todo | Self::Journal | Self::FreeBusy
        )
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An iCalendar component.
///
/// A plain data holder: properties in order of appearance, with typed
/// accessors for the fields the expansion engine consumes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Component {
    /// Component kind.
    pub kind: Option<ComponentKind>,
    /// Original component name (preserved for X-components).
    pub name: String,
    /// Properties in order of appearance.
    pub properties: Vec<Property>,
}

impl Component {
    /// Creates a new component with the given kind.
    #[must_use]
    pub fn new(kind: ComponentKind) -> Self {
        Self {
            kind: Some(kind),
            name: kind.as_str().to_string(),
            properties: Vec::new(),
        }
    }

    /// Creates a VEVENT component.
    #[must_use]
    pub fn event() -> Self {
        Self::new(ComponentKind::Event)
    }

    /// Creates a VTODO component.
    #[must_use]
    pub fn todo() -> Self {
        Self::new(ComponentKind::Todo)
    }

    /// Creates a VJOURNAL component.
    #[must_use]
    pub fn journal() -> Self {
        Self::new(ComponentKind::Journal)
    }

    /// Creates a VFREEBUSY component.
    #[must_use]
    pub fn freebusy() -> Self {
        Self::new(ComponentKind::FreeBusy)
    }

    /// Creates a VTIMEZONE component.
    #[must_use]
    pub fn timezone() -> Self {
        Self::new(ComponentKind::Timezone)
    }

    /// Adds a property to this component.
    pub fn add_property(&mut self, prop: Property) {
        self.properties.push(prop);
    }

    /// Adds a property, builder-style.
    #[must_use]
    pub fn with_property(mut self, prop: Property) -> Self {
        self.properties.push(prop);
        self
    }

    /// Returns the first property with the given name.
    #[must_use]
    pub fn get_property(&self, name: &str) -> Option<&Property> {
        let name_upper = name.to_ascii_uppercase();
        self.properties.iter().find(|p| p.name == name_upper)
    }

    /// Returns all properties with the given name.
    #[must_use]
    pub fn get_properties(&self, name: &str) -> Vec<&Property> {
        let name_upper = name.to_ascii_uppercase();
        self.properties
            .iter()
            .filter(|p| p.name == name_upper)
            .collect()
    }

    /// Returns the UID property value if present.
    #[must_use]
    pub fn uid(&self) -> Option<&str> {
        self.get_property("UID")?.as_text()
    }

    /// Returns the SUMMARY property value if present.
    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.get_property("SUMMARY")?.as_text()
    }

    /// Returns the DESCRIPTION property value if present.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.get_property("DESCRIPTION")?.as_text()
    }

    /// Returns the DTSTART property if present.
    #[must_use]
    pub fn dtstart(&self) -> Option<&Property> {
        self.get_property("DTSTART")
    }

    /// Returns the DTEND property if present.
    #[must_use]
    pub fn dtend(&self) -> Option<&Property> {
        self.get_property("DTEND")
    }

    /// Returns the DUE property if present.
    #[must_use]
    pub fn due(&self) -> Option<&Property> {
        self.get_property("DUE")
    }

    /// Returns the DURATION property if present.
    #[must_use]
    pub fn duration(&self) -> Option<&Property> {
        self.get_property("DURATION")
    }

    /// Returns the RECURRENCE-ID property if present.
    #[must_use]
    pub fn recurrence_id(&self) -> Option<&Property> {
        self.get_property("RECURRENCE-ID")
    }

    /// Returns all RRULE properties.
    #[must_use]
    pub fn rrules(&self) -> Vec<&Property> {
        self.get_properties("RRULE")
    }

    /// Returns all RDATE properties.
    #[must_use]
    pub fn rdates(&self) -> Vec<&Property> {
        self.get_properties("RDATE")
    }

    /// Returns all EXDATE properties.
    #[must_use]
    pub fn exdates(&self) -> Vec<&Property> {
        self.get_properties("EXDATE")
    }

    /// Returns the TZID property value (meaningful on VTIMEZONE components).
    #[must_use]
    pub fn tzid(&self) -> Option<&str> {
        self.get_property("TZID")?.as_text()
    }
}

/// A calendar: an unordered collection of components, some of which may be
/// VTIMEZONE definitions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Calendar {
    /// All components, including VTIMEZONEs.
    pub components: Vec<Component>,
}

impl Calendar {
    /// Creates an empty calendar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a component.
    pub fn add_component(&mut self, component: Component) {
        self.components.push(component);
    }

    /// Adds a component, builder-style.
    #[must_use]
    pub fn with_component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    /// Returns components of a specific kind.
    #[must_use]
    pub fn components_of_kind(&self, kind: ComponentKind) -> Vec<&Component> {
        self.components
            .iter()
            .filter(|c| c.kind == Some(kind))
            .collect()
    }

    /// Returns all VEVENT components.
    #[must_use]
    pub fn events(&self) -> Vec<&Component> {
        self.components_of_kind(ComponentKind::Event)
    }

    /// Returns all VTODO components.
    #[must_use]
    pub fn todos(&self) -> Vec<&Component> {
        self.components_of_kind(ComponentKind::Todo)
    }

    /// Returns all VJOURNAL components.
    #[must_use]
    pub fn journals(&self) -> Vec<&Component> {
        self.components_of_kind(ComponentKind::Journal)
    }

    /// Returns all VFREEBUSY components.
    #[must_use]
    pub fn freebusy(&self) -> Vec<&Component> {
        self.components_of_kind(ComponentKind::FreeBusy)
    }

    /// Returns all VTIMEZONE components.
    #[must_use]
    pub fn timezones(&self) -> Vec<&Component> {
        self.components_of_kind(ComponentKind::Timezone)
    }

    /// Returns the TZID strings advertised by embedded VTIMEZONE components.
    #[must_use]
    pub fn tzids(&self) -> Vec<&str> {
        self.timezones().iter().filter_map(|c| c.tzid()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DateTime;

    #[test]
    fn component_kind_parse() {
        assert_eq!(ComponentKind::parse("VEVENT"), ComponentKind::Event);
        assert_eq!(ComponentKind::parse("vtodo"), ComponentKind::Todo);
        assert_eq!(ComponentKind::parse("X-CUSTOM"), ComponentKind::Unknown);
    }

    #[test]
    fn component_kind_scannable() {
        assert!(ComponentKind::Event.is_scannable());
        assert!(ComponentKind::FreeBusy.is_scannable());
        assert!(!ComponentKind::Timezone.is_scannable());
        assert!(!ComponentKind::Unknown.is_scannable());
    }

    #[test]
    fn component_properties() {
        let mut event = Component::event();
        event.add_property(Property::text("UID", "test-uid-123"));
        event.add_property(Property::text("SUMMARY", "Test Event"));

        assert_eq!(event.uid(), Some("test-uid-123"));
        assert_eq!(event.summary(), Some("Test Event"));
        assert!(event.dtstart().is_none());
    }

    #[test]
    fn multi_valued_lookup() {
        let event = Component::event()
            .with_property(Property::text("RRULE", "FREQ=DAILY"))
            .with_property(Property::text("RRULE", "FREQ=YEARLY"));
        assert_eq!(event.rrules().len(), 2);
        assert!(event.rdates().is_empty());
    }

    #[test]
    fn calendar_filters_by_kind() {
        let calendar = Calendar::new()
            .with_component(
                Component::event().with_property(Property::text("UID", "event1")),
            )
            .with_component(Component::todo().with_property(Property::text("UID", "todo1")))
            .with_component(
                Component::timezone().with_property(Property::text("TZID", "Europe/Berlin")),
            );

        assert_eq!(calendar.events().len(), 1);
        assert_eq!(calendar.todos().len(), 1);
        assert_eq!(calendar.tzids(), vec!["Europe/Berlin"]);
    }

    #[test]
    fn recurrence_id_lookup() {
        let event = Component::event().with_property(Property::datetime(
            "RECURRENCE-ID",
            DateTime::utc(2026, 1, 8, 9, 0, 0),
        ));
        assert!(event.recurrence_id().is_some());
    }
}
