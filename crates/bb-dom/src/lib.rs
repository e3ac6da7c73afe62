//! Host document capability and the in-memory arena document.
//!
//! Tree construction never touches a concrete DOM directly. Everything it
//! needs from the host goes through [`HostDocument`]: create an element,
//! create a text node, assign a property, append a child, detach a node.
//! [`ArenaDocument`] is the in-process implementation; the browser one lives
//! in `bb-web`.

mod arena;

pub use arena::ArenaDocument;
pub use arena::NodeKind;

use bb_core::BlockResult;

/// ID used to address nodes in the DOM arena.
pub type NodeId = u64;

/// Mutation primitives a host platform exposes for tree construction.
///
/// Handles are owned by the host tree. Callers hold clones of them and pass
/// them back; the host decides what an unknown or misplaced handle means and
/// reports it as a [`bb_core::BlockError`].
pub trait HostDocument {
    type Handle: Clone;

    fn create_element(&mut self, tag: &str) -> BlockResult<Self::Handle>;

    fn create_text_node(&mut self, text: &str) -> BlockResult<Self::Handle>;

    /// Assigns `value` to the host property `name` on an element.
    ///
    /// `name` is already the host property name; logical attribute aliasing
    /// happens before this call.
    fn set_property(
        &mut self,
        element: &Self::Handle,
        name: &str,
        value: &str,
    ) -> BlockResult<()>;

    /// Appends `child` as the last child of `parent`, moving it out of its
    /// previous parent if it had one.
    fn append_child(&mut self, parent: &Self::Handle, child: &Self::Handle) -> BlockResult<()>;

    /// Removes `node` from its parent. Nodes without a parent are left alone.
    fn detach(&mut self, node: &Self::Handle) -> BlockResult<()>;
}
