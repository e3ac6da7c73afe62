//! The `TreeBuilder` wrapper and its construction input.

use crate::AttributeMap;
use crate::BuilderConfig;
use crate::ExpansionReport;
use crate::NodeDescriptor;
use crate::expand;
use bb_core::BlockResult;
use bb_dom::HostDocument;
use serde_json::Value;
use std::rc::Rc;

/// Construction input for one element: tag, attributes, text.
///
/// Every field is optional. A missing or blank tag becomes the configured
/// default tag, and blank text creates no text node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockSpec {
    pub tag: Option<String>,
    pub attributes: AttributeMap,
    pub text: Option<String>,
}

impl BlockSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            ..Self::default()
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

impl From<&NodeDescriptor> for BlockSpec {
    fn from(descriptor: &NodeDescriptor) -> Self {
        Self {
            tag: descriptor.tag.clone(),
            attributes: descriptor.attr.clone(),
            text: descriptor.text.clone(),
        }
    }
}

/// Something a builder can link to: a raw host handle or another builder.
#[derive(Debug)]
pub enum Attachment<'a, H> {
    NativeHandle(H),
    WrappedNode(&'a TreeBuilder<H>),
}

impl<H> Attachment<'_, H> {
    pub fn handle(&self) -> &H {
        match self {
            Self::NativeHandle(handle) => handle,
            Self::WrappedNode(builder) => builder.element(),
        }
    }
}

impl<'a, H> From<&'a TreeBuilder<H>> for Attachment<'a, H> {
    fn from(builder: &'a TreeBuilder<H>) -> Self {
        Self::WrappedNode(builder)
    }
}

/// Wraps exactly one host element, created at construction and never
/// replaced.
///
/// The builder does not own the host tree. Every operation that mutates it
/// borrows the document for the duration of the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeBuilder<H> {
    element: H,
    tag: String,
    config: Rc<BuilderConfig>,
}

impl<H> TreeBuilder<H> {
    pub fn element(&self) -> &H {
        &self.element
    }

    pub fn into_element(self) -> H {
        self.element
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl<H: Clone> TreeBuilder<H> {
    pub fn new<D>(doc: &mut D, spec: BlockSpec) -> BlockResult<Self>
    where
        D: HostDocument<Handle = H>,
    {
        Self::with_config(doc, spec, BuilderConfig::default())
    }

    /// Creates the element, assigns attributes through the alias table, then
    /// appends the text node when `spec.text` is not blank.
    pub fn with_config<D>(
        doc: &mut D,
        spec: BlockSpec,
        config: impl Into<Rc<BuilderConfig>>,
    ) -> BlockResult<Self>
    where
        D: HostDocument<Handle = H>,
    {
        let config = config.into();
        let tag = config.resolve_tag(spec.tag.as_deref()).to_owned();
        let element = doc.create_element(&tag)?;

        for (name, value) in &spec.attributes {
            doc.set_property(&element, config.aliases.resolve(name), value)?;
        }

        if let Some(text) = spec.text.as_deref().filter(|text| !text.trim().is_empty()) {
            let node = doc.create_text_node(text)?;
            doc.append_child(&element, &node)?;
        }

        Ok(Self {
            element,
            tag,
            config,
        })
    }

    /// Appends `target` as the last child of this element.
    pub fn child<'a, D>(
        &self,
        doc: &mut D,
        target: impl Into<Attachment<'a, H>>,
    ) -> BlockResult<&Self>
    where
        D: HostDocument<Handle = H>,
        H: 'a,
    {
        let target = target.into();
        doc.append_child(&self.element, target.handle())?;
        Ok(self)
    }

    /// Appends this element as the last child of `target`.
    pub fn parent<'a, D>(
        &self,
        doc: &mut D,
        target: impl Into<Attachment<'a, H>>,
    ) -> BlockResult<&Self>
    where
        D: HostDocument<Handle = H>,
        H: 'a,
    {
        let target = target.into();
        doc.append_child(target.handle(), &self.element)?;
        Ok(self)
    }

    /// Alias for [`TreeBuilder::parent`].
    pub fn attach_to<'a, D>(
        &self,
        doc: &mut D,
        target: impl Into<Attachment<'a, H>>,
    ) -> BlockResult<&Self>
    where
        D: HostDocument<Handle = H>,
        H: 'a,
    {
        self.parent(doc, target)
    }

    pub fn detach<D>(&self, doc: &mut D) -> BlockResult<&Self>
    where
        D: HostDocument<Handle = H>,
    {
        doc.detach(&self.element)?;
        Ok(self)
    }

    /// Parses `json` and expands it under this element.
    ///
    /// Malformed JSON is returned as `descriptor.malformed_json`. Branches
    /// with the wrong shape are skipped and listed in the report, unless the
    /// builder is configured as atomic.
    pub fn children_from_json<D>(&self, doc: &mut D, json: &str) -> BlockResult<ExpansionReport>
    where
        D: HostDocument<Handle = H>,
    {
        expand::from_json(doc, &self.config, json, &self.element)
    }

    /// Like [`TreeBuilder::children_from_json`], attaching under `parent`
    /// instead of this element.
    pub fn children_from_json_under<'a, D>(
        &self,
        doc: &mut D,
        json: &str,
        parent: impl Into<Attachment<'a, H>>,
    ) -> BlockResult<ExpansionReport>
    where
        D: HostDocument<Handle = H>,
        H: 'a,
    {
        let parent = parent.into();
        expand::from_json(doc, &self.config, json, parent.handle())
    }

    /// Expands an already-parsed descriptor. A `Value::String` is treated as
    /// JSON text, the same way [`TreeBuilder::children_from_json`] treats
    /// its input.
    pub fn children_from_value<D>(
        &self,
        doc: &mut D,
        descriptor: &Value,
    ) -> BlockResult<ExpansionReport>
    where
        D: HostDocument<Handle = H>,
    {
        expand::from_value(doc, &self.config, descriptor, &self.element)
    }

    pub fn children_from_value_under<'a, D>(
        &self,
        doc: &mut D,
        descriptor: &Value,
        parent: impl Into<Attachment<'a, H>>,
    ) -> BlockResult<ExpansionReport>
    where
        D: HostDocument<Handle = H>,
        H: 'a,
    {
        let parent = parent.into();
        expand::from_value(doc, &self.config, descriptor, parent.handle())
    }

    /// Builds typed descriptors under this element.
    pub fn children_from_descriptors<D>(
        &self,
        doc: &mut D,
        descriptors: &[NodeDescriptor],
    ) -> BlockResult<ExpansionReport>
    where
        D: HostDocument<Handle = H>,
    {
        expand::from_descriptors(doc, &self.config, descriptors, &self.element)
    }
}
