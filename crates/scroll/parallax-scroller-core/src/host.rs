//! Host environment contract.
//!
//! The core never touches a document directly. Adapters (the wasm crate, test
//! doubles) implement [`ScrollHost`] and pass it into each [`crate::Session`] call.

use crate::element::SourceNode;

/// Everything the session reads from or writes to the page.
pub trait ScrollHost {
    /// Opaque reference to one animated node.
    type Handle;

    /// Current viewport height in pixels.
    fn viewport_height(&self) -> f64;

    /// Current vertical scroll offset in pixels.
    fn scroll_offset(&self) -> f64;

    /// Total scrollable height of the document in pixels.
    fn scroll_extent(&self) -> f64;

    /// Visible height of the scrolling element, excluding scrollbars.
    fn client_height(&self) -> f64 {
        self.viewport_height()
    }

    /// Nodes carrying `designation_attribute`, in document order.
    fn discover(&self, designation_attribute: &str) -> Vec<SourceNode<Self::Handle>>;

    /// Write one inline style property.
    fn set_style(&mut self, handle: &Self::Handle, property: &str, value: &str);

    /// Size the document so the page can scroll through every keyframe; `None` removes the override.
    fn set_document_height(&mut self, height: Option<f64>);

    /// Pin the root container in place before the first build.
    fn prepare_root(&mut self) {}
}
