//! Logical attribute name to host property name mapping.

/// Lookup table applied to every attribute before it reaches the host.
///
/// The default table maps `class` to `className`, the property a DOM host
/// exposes for the class list. Names without an entry pass through as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeAliases {
    entries: Vec<(String, String)>,
}

impl Default for AttributeAliases {
    fn default() -> Self {
        Self::empty().with_alias("class", "className")
    }
}

impl AttributeAliases {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adds or replaces the mapping for `logical`.
    pub fn with_alias(mut self, logical: impl Into<String>, host: impl Into<String>) -> Self {
        let logical = logical.into();
        let host = host.into();
        match self.entries.iter_mut().find(|(name, _)| *name == logical) {
            Some((_, slot)) => *slot = host,
            None => self.entries.push((logical, host)),
        }
        self
    }

    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.entries
            .iter()
            .find(|(logical, _)| logical == name)
            .map_or(name, |(_, host)| host.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
