//! The file being completed in, as the engine sees it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use assist_engine::InformationHeuristic;
use assist_primitives::{
	Buffer, DEFAULT_PARTITION, InvocationContext, PartitionId, RopeBuffer, Selection, SelectionProvider, TextViewer,
};
use parking_lot::Mutex;
use ropey::Rope;


/// Partition of text inside a double-quoted string literal.
pub const STRING_PARTITION: &str = "string";

/// Returns [`STRING_PARTITION`] when an odd number of unescaped quotes
/// precede `offset` on its line.
pub fn partition(rope: &Rope, offset: usize) -> PartitionId {
	let offset = offset.min(rope.len_chars());
	let line_start = rope.line_to_char(rope.char_to_line(offset));
	let mut inside = false;
	let mut escaped = false;
	for c in rope.slice(line_start..offset).chars() {
		match c {
			'\\' if inside => {
				escaped = !escaped;
				continue;
			}
			'"' if !escaped => inside = !inside,
			_ => {}
		}
		escaped = false;
	}
	PartitionId::from(if inside { STRING_PARTITION } else { DEFAULT_PARTITION })
}

/// Headless viewer over a loaded file.
///
/// There is no window: the viewer always has focus, and the popup is
/// "showing" between the first computation and the end of the session.
pub struct FileViewer {
	buffer: Arc<RopeBuffer>,
	selection: Mutex<Selection>,
	popup: AtomicBool,
}

impl FileViewer {
	pub fn new(text: &str, caret: usize) -> Self {
		Self {
			buffer: Arc::new(RopeBuffer::new(text).with_partitioner(partition)),
			selection: Mutex::new(Selection::caret(caret)),
			popup: AtomicBool::new(false),
		}
	}

	pub fn caret(&self) -> usize {
		self.selection.lock().offset
	}

	pub fn set_popup(&self, showing: bool) {
		self.popup.store(showing, Ordering::Release);
	}
}

impl SelectionProvider for FileViewer {
	fn selection(&self) -> Selection {
		*self.selection.lock()
	}
}

impl TextViewer for FileViewer {
	fn document(&self) -> Arc<dyn Buffer> {
		self.buffer.clone()
	}

	fn proposal_popup_showing(&self) -> bool {
		self.popup.load(Ordering::Acquire)
	}
}

/// Prefers context information right after an opening parenthesis or an
/// argument separator.
#[derive(Debug, Default, Clone, Copy)]
pub struct AfterCallOpen;

impl InformationHeuristic for AfterCallOpen {
	fn prefers_context_information(&self, context: &InvocationContext) -> bool {
		let Ok(before) = context.text_before(64) else {
			return false;
		};
		matches!(before.trim_end().chars().next_back(), Some('(' | ','))
	}
}
