use std::sync::Arc;

use crate::range::{CharIdx, CharLen};

/// Identifier of a document partition (content type), e.g. `"__default"` or
/// `"string"`.
pub type PartitionId = Arc<str>;

/// Partition reported by buffers that do not partition their content.
pub const DEFAULT_PARTITION: &str = "__default";

/// Returns a fresh handle to [`DEFAULT_PARTITION`].
pub fn default_partition() -> PartitionId {
	Arc::from(DEFAULT_PARTITION)
}

/// Errors raised when reading from a [`Buffer`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
	/// The requested range does not lie within the buffer.
	#[error("range {offset}..{end} out of bounds for buffer of {len} chars")]
	OutOfBounds {
		/// Requested start offset.
		offset: CharIdx,
		/// Requested end offset (exclusive).
		end: CharIdx,
		/// Buffer length in characters.
		len: CharLen,
	},
}

/// The document a completion session runs against.
///
/// Implementations are owned by the host; the engine only reads.
pub trait Buffer: Send + Sync {
	/// Returns the buffer length in characters.
	fn len_chars(&self) -> CharLen;

	/// Returns `length` characters starting at `offset`.
	fn get(&self, offset: CharIdx, length: CharLen) -> Result<String, BufferError>;

	/// Returns a value that increases every time the buffer is edited.
	fn modification_stamp(&self) -> u64;

	/// Returns the partition (content type) at `offset`.
	fn partition_at(&self, _offset: CharIdx) -> PartitionId {
		default_partition()
	}
}
