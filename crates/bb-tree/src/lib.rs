//! Declarative element-tree construction over a host document.
//!
//! [`TreeBuilder`] wraps a single host element. Trees are put together either
//! fluently, by creating builders from [`BlockSpec`]s and linking them with
//! [`TreeBuilder::child`] and [`TreeBuilder::parent`], or from a JSON
//! descriptor:
//!
//! ```
//! use bb_dom::ArenaDocument;
//! use bb_tree::BlockSpec;
//! use bb_tree::TreeBuilder;
//!
//! # fn main() -> bb_core::BlockResult<()> {
//! let mut doc = ArenaDocument::new();
//! let list = TreeBuilder::new(&mut doc, BlockSpec::new("ul").attr("class", "menu"))?;
//! list.children_from_json(&mut doc, r#"[{"tag":"li","text":"Home"},{"tag":"li","text":"About"}]"#)?;
//!
//! assert_eq!(
//!     doc.outline(*list.element()),
//!     "<ul className=\"menu\"><li>Home</li><li>About</li></ul>"
//! );
//! # Ok(())
//! # }
//! ```

mod aliases;
mod builder;
mod config;
mod descriptor;
mod expand;

pub use aliases::AttributeAliases;
pub use builder::Attachment;
pub use builder::BlockSpec;
pub use builder::TreeBuilder;
pub use config::BuilderConfig;
pub use config::DEFAULT_TAG;
pub use descriptor::AttributeMap;
pub use descriptor::DescriptorIssue;
pub use descriptor::NodeDescriptor;
pub use descriptor::parse_descriptor;
pub use expand::ExpansionReport;
