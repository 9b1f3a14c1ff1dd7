//! Rope-backed [`Buffer`] for hosts and tests.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use ropey::Rope;

use crate::buffer::{Buffer, BufferError, PartitionId, default_partition};
use crate::range::{CharIdx, CharLen};

/// Maps a character offset to the partition containing it.
pub type Partitioner = Box<dyn Fn(&Rope, CharIdx) -> PartitionId + Send + Sync>;

/// A [`Buffer`] over a [`Rope`], editable through a shared reference.
///
/// Every successful edit bumps the modification stamp.
pub struct RopeBuffer {
	text: RwLock<Rope>,
	stamp: AtomicU64,
	partitioner: Option<Partitioner>,
}

impl RopeBuffer {
	/// Creates a buffer holding `text`.
	pub fn new(text: &str) -> Self {
		Self {
			text: RwLock::new(Rope::from_str(text)),
			stamp: AtomicU64::new(0),
			partitioner: None,
		}
	}

	/// Installs a partitioner used by [`Buffer::partition_at`].
	pub fn with_partitioner<F>(mut self, partitioner: F) -> Self
	where
		F: Fn(&Rope, CharIdx) -> PartitionId + Send + Sync + 'static,
	{
		self.partitioner = Some(Box::new(partitioner));
		self
	}

	/// Returns the whole buffer as a string.
	pub fn text(&self) -> String {
		self.text.read().to_string()
	}

	/// Inserts `text` at `offset`.
	pub fn insert(&self, offset: CharIdx, text: &str) -> Result<(), BufferError> {
		let mut rope = self.text.write();
		check_range(rope.len_chars(), offset, 0)?;
		rope.insert(offset, text);
		self.stamp.fetch_add(1, Ordering::AcqRel);
		Ok(())
	}

	/// Removes `length` characters starting at `offset`.
	pub fn remove(&self, offset: CharIdx, length: CharLen) -> Result<(), BufferError> {
		let mut rope = self.text.write();
		check_range(rope.len_chars(), offset, length)?;
		rope.remove(offset..offset + length);
		self.stamp.fetch_add(1, Ordering::AcqRel);
		Ok(())
	}
}

impl std::fmt::Debug for RopeBuffer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RopeBuffer")
			.field("len_chars", &self.len_chars())
			.field("stamp", &self.modification_stamp())
			.field("partitioned", &self.partitioner.is_some())
			.finish()
	}
}

impl Buffer for RopeBuffer {
	fn len_chars(&self) -> CharLen {
		self.text.read().len_chars()
	}

	fn get(&self, offset: CharIdx, length: CharLen) -> Result<String, BufferError> {
		let rope = self.text.read();
		check_range(rope.len_chars(), offset, length)?;
		Ok(rope.slice(offset..offset + length).to_string())
	}

	fn modification_stamp(&self) -> u64 {
		self.stamp.load(Ordering::Acquire)
	}

	fn partition_at(&self, offset: CharIdx) -> PartitionId {
		match &self.partitioner {
			Some(partitioner) => {
				let rope = self.text.read();
				partitioner(&rope, offset.min(rope.len_chars()))
			}
			None => default_partition(),
		}
	}
}

fn check_range(len: CharLen, offset: CharIdx, length: CharLen) -> Result<(), BufferError> {
	let end = offset.saturating_add(length);
	if offset > len || end > len {
		return Err(BufferError::OutOfBounds { offset, end, len });
	}
	Ok(())
}
