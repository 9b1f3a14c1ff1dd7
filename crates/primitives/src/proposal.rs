//! Completion proposals and their ranking order.
//!
//! Proposals are ranked by relevance (higher first). Ties are broken by the
//! sorting key under root-locale collation at secondary strength (accents
//! count, case does not); keys that collate equal fall back to the raw key so
//! the order never depends on collection order alone.

use std::cmp::Ordering;
use std::sync::{Arc, LazyLock};

use icu_collator::options::{CollatorOptions, Strength};
use icu_collator::{Collator, CollatorBorrowed};

use crate::range::{CharIdx, CharLen};

/// Caseless collator shared by every sort; `None` if its data failed to load.
static COLLATOR: LazyLock<Option<CollatorBorrowed<'static>>> = LazyLock::new(|| {
	let mut options = CollatorOptions::default();
	options.strength = Some(Strength::Secondary);
	Collator::try_new(Default::default(), options)
		.inspect_err(|error| tracing::warn!(%error, "assist.proposal.collator_unavailable"))
		.ok()
});


/// Broad classification of a proposal, used by hosts for icons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ProposalKind {
	/// Identifier found in the buffer or an index.
	Identifier,
	/// Language keyword.
	Keyword,
	/// Expandable template.
	Template,
	/// File system path.
	Path,
	/// Context information (signature, parameter hint).
	Information,
	/// Anything else.
	#[default]
	Other,
}

/// Key under which the collector considers two proposals the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProposalIdentity {
	/// Same replacement text over the same range.
	Replacement {
		/// Inserted text.
		text: String,
		/// Start of the replaced range.
		start: CharIdx,
		/// Length of the replaced range.
		len: CharLen,
	},
	/// Identity chosen by the computer.
	Custom(Arc<str>),
}

/// A single completion or context-information proposal.
#[derive(Debug, Clone, PartialEq)]
pub struct Proposal {
	/// Text shown in the popup.
	pub label: String,
	/// Text inserted when the proposal is applied.
	pub replacement: String,
	/// Start of the range replaced by `replacement`.
	pub replace_start: CharIdx,
	/// Length of the range replaced by `replacement`.
	pub replace_len: CharLen,
	/// Ranking score; higher sorts first.
	pub relevance: i32,
	/// Tie-break key for proposals of equal relevance.
	pub sorting_key: String,
	/// Optional detail shown next to the label.
	pub detail: Option<String>,
	/// Proposal classification.
	pub kind: ProposalKind,
	/// Id of the computer that produced the proposal.
	pub source: Option<Arc<str>>,
	identity: Option<Arc<str>>,
}

impl Proposal {
	/// Creates a proposal inserting `label` over `replace_len` characters at
	/// `replace_start`.
	pub fn new(label: impl Into<String>, replace_start: CharIdx, replace_len: CharLen) -> Self {
		let label = label.into();
		Self {
			replacement: label.clone(),
			sorting_key: label.clone(),
			label,
			replace_start,
			replace_len,
			relevance: 0,
			detail: None,
			kind: ProposalKind::Other,
			source: None,
			identity: None,
		}
	}

	/// Sets the inserted text.
	pub fn with_replacement(mut self, replacement: impl Into<String>) -> Self {
		self.replacement = replacement.into();
		self
	}

	/// Sets the relevance.
	pub fn with_relevance(mut self, relevance: i32) -> Self {
		self.relevance = relevance;
		self
	}

	/// Sets the sorting key.
	pub fn with_sorting_key(mut self, key: impl Into<String>) -> Self {
		self.sorting_key = key.into();
		self
	}

	/// Sets the detail text.
	pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
		self.detail = Some(detail.into());
		self
	}

	/// Sets the kind.
	pub fn with_kind(mut self, kind: ProposalKind) -> Self {
		self.kind = kind;
		self
	}

	/// Sets the producing computer.
	pub fn with_source(mut self, source: Arc<str>) -> Self {
		self.source = Some(source);
		self
	}

	/// Overrides the identity used for de-duplication.
	pub fn with_identity(mut self, key: impl Into<Arc<str>>) -> Self {
		self.identity = Some(key.into());
		self
	}

	/// Returns the de-duplication key.
	pub fn identity(&self) -> ProposalIdentity {
		match &self.identity {
			Some(key) => ProposalIdentity::Custom(key.clone()),
			None => ProposalIdentity::Replacement {
				text: self.replacement.clone(),
				start: self.replace_start,
				len: self.replace_len,
			},
		}
	}
}

/// Ranking order: relevance descending, then sorting key ascending.
pub fn compare_proposals(a: &Proposal, b: &Proposal) -> Ordering {
	b.relevance
		.cmp(&a.relevance)
		.then_with(|| compare_sorting_keys(&a.sorting_key, &b.sorting_key))
}

fn compare_sorting_keys(a: &str, b: &str) -> Ordering {
	let collated = match COLLATOR.as_ref() {
		Some(collator) => collator.compare(a, b),
		None => {
			let folded_a = a.chars().flat_map(char::to_lowercase);
			let folded_b = b.chars().flat_map(char::to_lowercase);
			folded_a.cmp(folded_b)
		}
	};
	collated.then_with(|| a.cmp(b))
}

/// Sorts proposals into ranking order.
///
/// The sort is stable, so `sort(sort(p)) == sort(p)`.
pub fn sort_proposals(proposals: &mut [Proposal]) {
	if proposals.len() > 1 {
		proposals.sort_by(compare_proposals);
	}
}
