use std::sync::Arc;

use crate::buffer::Buffer;
use crate::range::Selection;

/// Reports the viewer's current selection.
pub trait SelectionProvider {
	/// Returns the current selection (a caret when empty).
	fn selection(&self) -> Selection;
}

/// The text widget the engine completes in.
///
/// The engine reads popup and focus state to decide between the context
/// information shortcut, the reload path and ordinary completion.
pub trait TextViewer: SelectionProvider + Send + Sync {
	/// Returns the document shown by the viewer.
	fn document(&self) -> Arc<dyn Buffer>;

	/// Returns true while the proposal popup is showing proposals.
	fn proposal_popup_showing(&self) -> bool {
		false
	}

	/// Returns true while a context information popup is showing.
	fn context_information_showing(&self) -> bool {
		false
	}

	/// Returns true if the viewer's window has focus.
	fn has_focus(&self) -> bool {
		true
	}
}
