//! Figure-type registry.

/// Insertion point for the ordinal inside a prefix template.
pub const ORDINAL_PLACEHOLDER: &str = "{}";

/// A registered figure type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FigureType {
    /// Type name, also the block name that produces it.
    pub name: String,
    /// Prefix template such as `Figure {}.`, or empty for unnumbered captions.
    pub prefix: String,
}

/// Ordered mapping from figure type name to prefix template.
///
/// `get` returns `None` for an unregistered type and `Some("")` for a type
/// whose captions are bound but never numbered. Only types with a non-empty
/// template receive ids and prefixes.
///
/// # Example
///
/// ```
/// use rw_captions::FigureTypes;
///
/// let types = FigureTypes::default();
/// assert_eq!(types.get("figure-caption"), Some("Figure {}."));
/// assert_eq!(types.get("caption"), Some(""));
/// assert_eq!(types.get("listing"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FigureTypes {
    types: Vec<FigureType>,
}

impl FigureTypes {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { types: Vec::new() }
    }

    /// Register a type, returning the registry.
    #[must_use]
    pub fn with_type(mut self, name: impl Into<String>, prefix: impl Into<String>) -> Self {
        self.insert(name, prefix);
        self
    }

    /// Register a type, replacing the template of an existing one.
    pub fn insert(&mut self, name: impl Into<String>, prefix: impl Into<String>) {
        let name = name.into();
        let prefix = prefix.into();
        if let Some(existing) = self.types.iter_mut().find(|t| t.name == name) {
            existing.prefix = prefix;
        } else {
            self.types.push(FigureType { name, prefix });
        }
    }

    /// Prefix template for a type.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.types
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.prefix.as_str())
    }

    /// Whether the type is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered types in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &FigureType> {
        self.types.iter()
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether no type is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for FigureTypes {
    fn default() -> Self {
        Self::new()
            .with_type("caption", "")
            .with_type("figure-caption", "Figure {}.")
            .with_type("table-caption", "Table {}.")
    }
}

impl FromIterator<FigureType> for FigureTypes {
    fn from_iter<I: IntoIterator<Item = FigureType>>(iter: I) -> Self {
        let mut types = Self::new();
        for figure_type in iter {
            types.insert(figure_type.name, figure_type.prefix);
        }
        types
    }
}

/// Substitute the ordinal into a prefix template.
///
/// Only the first `{}` is replaced.
#[must_use]
pub fn format_prefix(template: &str, ordinal: &str) -> String {
    template.replacen(ORDINAL_PLACEHOLDER, ordinal, 1)
}

/// Whether `value` is usable as an HTML identifier-like type name.
#[must_use]
pub fn is_type_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_types() {
        let types = FigureTypes::default();
        let names: Vec<_> = types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["caption", "figure-caption", "table-caption"]);
        assert_eq!(types.get("table-caption"), Some("Table {}."));
    }

    #[test]
    fn test_insert_replaces_template() {
        let types = FigureTypes::new()
            .with_type("figure", "Fig. {}")
            .with_type("figure", "Figure {}:");
        assert_eq!(types.len(), 1);
        assert_eq!(types.get("figure"), Some("Figure {}:"));
    }

    #[test]
    fn test_from_iterator() {
        let types: FigureTypes = vec![FigureType {
            name: "listing".to_owned(),
            prefix: "Listing {}".to_owned(),
        }]
        .into_iter()
        .collect();
        assert!(types.contains("listing"));
        assert!(!types.is_empty());
    }

    #[test]
    fn test_format_prefix() {
        assert_eq!(format_prefix("Figure {}.", "2.1"), "Figure 2.1.");
        assert_eq!(format_prefix("{} / {}", "3"), "3 / {}");
        assert_eq!(format_prefix("Static", "3"), "Static");
    }

    #[test]
    fn test_is_type_identifier() {
        assert!(is_type_identifier("figure-caption"));
        assert!(is_type_identifier("t_1"));
        assert!(!is_type_identifier(""));
        assert!(!is_type_identifier("1figure"));
        assert!(!is_type_identifier("fig caption"));
    }
}
