use std::sync::Arc;

use unicode_segmentation::UnicodeSegmentation;

use crate::buffer::{Buffer, BufferError, PartitionId};
use crate::range::{CharIdx, CharLen, Selection};

/// How far back [`InvocationContext::identifier_prefix`] looks.
const MAX_PREFIX_SCAN: CharLen = 256;

/// Everything a computer knows about one invocation.
///
/// Built by the engine per distinct `(viewer, offset)` and reused across
/// repeated invocations only while the selection stays where it was when
/// the context was built.
#[derive(Clone)]
pub struct InvocationContext {
	buffer: Arc<dyn Buffer>,
	offset: CharIdx,
	selection: Selection,
	partition: PartitionId,
	session_counter: u64,
	modification_stamp: u64,
}

impl InvocationContext {
	/// Captures the invocation state of `buffer` at `offset`.
	pub fn new(buffer: Arc<dyn Buffer>, offset: CharIdx, selection: Selection, session_counter: u64) -> Self {
		let partition = buffer.partition_at(offset);
		let modification_stamp = buffer.modification_stamp();
		Self {
			buffer,
			offset,
			selection,
			partition,
			session_counter,
			modification_stamp,
		}
	}

	/// The buffer being completed in.
	pub fn buffer(&self) -> &Arc<dyn Buffer> {
		&self.buffer
	}

	/// The invocation offset.
	pub fn offset(&self) -> CharIdx {
		self.offset
	}

	/// The selection at creation time.
	pub fn selection(&self) -> Selection {
		self.selection
	}

	/// The partition at the invocation offset.
	pub fn partition(&self) -> &PartitionId {
		&self.partition
	}

	/// The session this context belongs to.
	pub fn session_counter(&self) -> u64 {
		self.session_counter
	}

	/// The buffer's modification stamp at creation time.
	pub fn modification_stamp(&self) -> u64 {
		self.modification_stamp
	}

	/// Returns true if the context can be reused for an invocation at
	/// `offset` with the viewer showing `selection`.
	pub fn is_reusable(&self, offset: CharIdx, selection: Selection) -> bool {
		self.offset == offset && self.selection == selection
	}

	/// Returns up to `len` characters ending at the invocation offset.
	pub fn text_before(&self, len: CharLen) -> Result<String, BufferError> {
		let start = self.offset.saturating_sub(len);
		self.buffer.get(start, self.offset - start)
	}

	/// Returns the identifier fragment immediately before the offset.
	///
	/// Identifier boundaries follow Unicode word segmentation, so `foo_bar`
	/// is a single fragment. Returns an empty string when the offset does not
	/// follow an identifier.
	pub fn identifier_prefix(&self) -> Result<String, BufferError> {
		let text = self.text_before(MAX_PREFIX_SCAN)?;
		let Some(last) = text.split_word_bounds().next_back() else {
			return Ok(String::new());
		};
		if last.chars().all(|c| c.is_alphanumeric() || c == '_') {
			Ok(last.to_string())
		} else {
			Ok(String::new())
		}
	}
}

impl std::fmt::Debug for InvocationContext {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("InvocationContext")
			.field("offset", &self.offset)
			.field("selection", &self.selection)
			.field("partition", &self.partition)
			.field("session_counter", &self.session_counter)
			.field("modification_stamp", &self.modification_stamp)
			.finish_non_exhaustive()
	}
}
