//! Builder configuration.

use crate::AttributeAliases;

/// Tag used when a block or descriptor does not name one.
pub const DEFAULT_TAG: &str = "div";

/// Construction and expansion knobs shared by every node a builder creates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderConfig {
    pub default_tag: String,
    pub aliases: AttributeAliases,
    /// When set, any invalid descriptor branch fails the whole expansion
    /// before a single node is created. Otherwise invalid branches are
    /// reported and skipped.
    pub atomic: bool,
    /// Deepest descriptor nesting accepted; `None` leaves it unbounded.
    pub max_depth: Option<usize>,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            default_tag: DEFAULT_TAG.to_owned(),
            aliases: AttributeAliases::default(),
            atomic: false,
            max_depth: None,
        }
    }
}

impl BuilderConfig {
    pub fn atomic() -> Self {
        Self {
            atomic: true,
            ..Self::default()
        }
    }

    /// Picks the tag to create: `tag` unless it is absent or blank.
    pub fn resolve_tag<'a>(&'a self, tag: Option<&'a str>) -> &'a str {
        match tag {
            Some(tag) if !tag.trim().is_empty() => tag,
            _ => &self.default_tag,
        }
    }
}
