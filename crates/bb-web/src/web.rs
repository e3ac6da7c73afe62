use bb_core::BlockError;
use bb_core::BlockResult;
use bb_dom::HostDocument;
use wasm_bindgen::JsValue;
use web_sys::Document;
use web_sys::Node;

/// Live browser document.
#[derive(Debug, Clone)]
pub struct WebDocument {
    document: Document,
}

impl WebDocument {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// Uses `window.document`.
    pub fn from_window() -> BlockResult<Self> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| BlockError::new("dom.host", "window.document is unavailable"))?;
        Ok(Self::new(document))
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn body(&self) -> Option<Node> {
        self.document.body().map(Node::from)
    }
}

impl HostDocument for WebDocument {
    type Handle = Node;

    fn create_element(&mut self, tag: &str) -> BlockResult<Node> {
        self.document
            .create_element(tag)
            .map(Node::from)
            .map_err(|error| host_error(&format!("createElement({tag:?})"), error))
    }

    fn create_text_node(&mut self, text: &str) -> BlockResult<Node> {
        Ok(Node::from(self.document.create_text_node(text)))
    }

    fn set_property(&mut self, element: &Node, name: &str, value: &str) -> BlockResult<()> {
        let target: &JsValue = element.as_ref();
        js_sys::Reflect::set(
            target,
            &JsValue::from_str(name),
            &JsValue::from_str(value),
        )
        .map_err(|error| host_error(&format!("set property `{name}`"), error))?;
        Ok(())
    }

    fn append_child(&mut self, parent: &Node, child: &Node) -> BlockResult<()> {
        parent
            .append_child(child)
            .map_err(|error| host_error("appendChild", error))?;
        Ok(())
    }

    fn detach(&mut self, node: &Node) -> BlockResult<()> {
        if let Some(parent) = node.parent_node() {
            parent
                .remove_child(node)
                .map_err(|error| host_error("removeChild", error))?;
        }
        Ok(())
    }
}

fn host_error(operation: &str, error: JsValue) -> BlockError {
    BlockError::new("dom.host", format!("{operation} failed: {error:?}"))
}
