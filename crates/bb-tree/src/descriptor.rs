//! JSON node descriptors and their resolution into typed form.
//!
//! A descriptor is either one object `{tag, attr, text, children}` or an
//! array of them. Resolution walks the JSON value once, turning every
//! well-formed object into a [`NodeDescriptor`] and recording a
//! [`DescriptorIssue`] for every branch with the wrong shape. Strings are
//! parsed as JSON wherever a descriptor is expected, so `children` may itself
//! be serialized JSON.

use crate::BuilderConfig;
use bb_core::BlockError;
use bb_core::BlockResult;
use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error as _;
use serde_json::Map;
use serde_json::Value;

/// Ordered attribute name/value pairs.
pub type AttributeMap = Vec<(String, String)>;

/// Typed form of one descriptor object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeDescriptor {
    pub tag: Option<String>,
    pub attr: AttributeMap,
    pub text: Option<String>,
    pub children: Vec<NodeDescriptor>,
}

impl NodeDescriptor {
    /// Nesting depth of this node, counting itself.
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(NodeDescriptor::depth)
            .max()
            .unwrap_or(0)
    }

    /// Total number of nodes in this subtree.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(NodeDescriptor::node_count)
            .sum::<usize>()
    }
}

/// Deserializes strictly: any branch with the wrong shape is an error.
impl<'de> Deserialize<'de> for NodeDescriptor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let Value::Object(object) = &value else {
            return Err(D::Error::custom(
                "invalid tree descriptor: expected an object",
            ));
        };

        let config = BuilderConfig::default();
        let mut resolver = Resolver::new(&config);
        let node = resolver
            .object(object, "$", 1)
            .map_err(D::Error::custom)?;
        match resolver.issues.first() {
            Some(issue) => Err(D::Error::custom(issue)),
            None => Ok(node),
        }
    }
}

/// A descriptor branch that could not be turned into nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorIssue {
    /// Location in the descriptor, e.g. `$[1].children`.
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for DescriptorIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid tree descriptor at {}: {}", self.path, self.message)
    }
}

/// Parses descriptor JSON text into a value.
///
/// Nesting is not capped here; `BuilderConfig::max_depth` is the only depth
/// limit, so text and value descriptors accept the same trees.
pub fn parse_descriptor(json: &str) -> BlockResult<Value> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    deserializer.disable_recursion_limit();
    let value = Value::deserialize(&mut deserializer).map_err(malformed_json)?;
    deserializer.end().map_err(malformed_json)?;
    Ok(value)
}

fn malformed_json(error: serde_json::Error) -> BlockError {
    BlockError::new(
        "descriptor.malformed_json",
        format!("descriptor is not valid JSON: {error}"),
    )
}

/// Walks descriptor values, collecting typed nodes and shape issues.
pub(crate) struct Resolver<'a> {
    config: &'a BuilderConfig,
    pub(crate) issues: Vec<DescriptorIssue>,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(config: &'a BuilderConfig) -> Self {
        Self {
            config,
            issues: Vec::new(),
        }
    }

    /// Resolves a value that may still be JSON text.
    pub(crate) fn value(
        &mut self,
        value: &Value,
        path: &str,
        depth: usize,
    ) -> BlockResult<Vec<NodeDescriptor>> {
        match value {
            Value::String(json) => {
                let parsed = parse_descriptor(json)?;
                self.parsed(&parsed, path, depth)
            }
            other => self.parsed(other, path, depth),
        }
    }

    /// Resolves an already-parsed value; strings here are scalars, not JSON.
    pub(crate) fn parsed(
        &mut self,
        value: &Value,
        path: &str,
        depth: usize,
    ) -> BlockResult<Vec<NodeDescriptor>> {
        match value {
            Value::Array(items) => {
                let mut nodes = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    let item_path = format!("{path}[{index}]");
                    match item {
                        Value::Object(object) => nodes.push(self.object(object, &item_path, depth)?),
                        other => self.issue(
                            item_path,
                            format!("expected an object, found {}", kind_of(other)),
                        ),
                    }
                }
                Ok(nodes)
            }
            Value::Object(object) => Ok(vec![self.object(object, path, depth)?]),
            other => {
                self.issue(
                    path.to_owned(),
                    format!("expected an object or an array, found {}", kind_of(other)),
                );
                Ok(Vec::new())
            }
        }
    }

    pub(crate) fn object(
        &mut self,
        object: &Map<String, Value>,
        path: &str,
        depth: usize,
    ) -> BlockResult<NodeDescriptor> {
        if let Some(max_depth) = self.config.max_depth {
            if depth > max_depth {
                return Err(BlockError::new(
                    "descriptor.too_deep",
                    format!("descriptor at {path} nests deeper than {max_depth} levels"),
                ));
            }
        }

        let tag = match object.get("tag") {
            None | Some(Value::Null) => None,
            Some(Value::String(tag)) => Some(tag.clone()),
            Some(other) => {
                self.issue(
                    format!("{path}.tag"),
                    format!("expected a string, found {}", kind_of(other)),
                );
                None
            }
        };

        let text = match object.get("text") {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) => Some(text.clone()),
            Some(Value::Bool(false)) => None,
            Some(Value::Number(number)) if number.as_f64() == Some(0.0) => None,
            Some(scalar @ (Value::Number(_) | Value::Bool(_))) => Some(scalar.to_string()),
            Some(other) => {
                self.issue(
                    format!("{path}.text"),
                    format!("expected a string, found {}", kind_of(other)),
                );
                None
            }
        };

        let attr = match object.get("attr") {
            None | Some(Value::Null) => AttributeMap::new(),
            Some(Value::Object(entries)) => self.attributes(entries, path),
            Some(other) => {
                self.issue(
                    format!("{path}.attr"),
                    format!("expected an object, found {}", kind_of(other)),
                );
                AttributeMap::new()
            }
        };

        let children = match object.get("children") {
            None => Vec::new(),
            Some(children) => self.value(children, &format!("{path}.children"), depth + 1)?,
        };

        Ok(NodeDescriptor {
            tag,
            attr,
            text,
            children,
        })
    }

    fn attributes(&mut self, entries: &Map<String, Value>, path: &str) -> AttributeMap {
        let mut attr = AttributeMap::with_capacity(entries.len());
        for (name, value) in entries {
            let value = match value {
                Value::String(value) => value.clone(),
                Value::Null => {
                    self.issue(
                        format!("{path}.attr.{name}"),
                        "attribute value is null".to_owned(),
                    );
                    continue;
                }
                other => other.to_string(),
            };
            attr.push((name.clone(), value));
        }
        attr
    }

    fn issue(&mut self, path: String, message: String) {
        tracing::warn!(%path, reason = %message, "invalid tree descriptor");
        self.issues.push(DescriptorIssue { path, message });
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
