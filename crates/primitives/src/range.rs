/// A position in the buffer, measured in characters (not bytes).
///
/// This is the canonical coordinate space for offsets handed to the engine.
pub type CharIdx = usize;

/// A length or count in the buffer, measured in characters (not bytes).
///
/// Distinct from [`CharIdx`] to avoid passing an index where a length is
/// expected or vice versa.
pub type CharLen = usize;

/// The viewer's selection: a start offset and a length.
///
/// A zero-length selection is a plain caret.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Selection {
	/// Start of the selected range.
	pub offset: CharIdx,
	/// Number of selected characters.
	pub length: CharLen,
}

impl Selection {
	/// Creates a selection covering `length` characters from `offset`.
	pub const fn new(offset: CharIdx, length: CharLen) -> Self {
		Self { offset, length }
	}

	/// Creates a zero-width selection (caret) at `offset`.
	pub const fn caret(offset: CharIdx) -> Self {
		Self::new(offset, 0)
	}

	/// Returns true if nothing is selected.
	#[inline]
	pub const fn is_empty(&self) -> bool {
		self.length == 0
	}

	/// Returns the end of the selection (exclusive).
	#[inline]
	pub const fn end(&self) -> CharIdx {
		self.offset + self.length
	}
}
