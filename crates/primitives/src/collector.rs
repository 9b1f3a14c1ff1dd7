//! Merge set for proposals produced during one computation.
//!
//! Proposals are keyed by [`ProposalIdentity`]. When two proposals share an
//! identity the one with the higher relevance is kept; on a tie the first
//! one collected stays. Insertion order of distinct entries is preserved so
//! that results are reproducible before ranking.

use rustc_hash::FxHashMap;

use crate::proposal::{Proposal, ProposalIdentity, sort_proposals};


/// De-duplicating proposal set, created fresh for every computation.
#[derive(Debug, Default)]
pub struct ProposalCollector {
	items: Vec<Proposal>,
	index: FxHashMap<ProposalIdentity, usize>,
}

impl ProposalCollector {
	/// Creates an empty collector.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a proposal.
	///
	/// Returns true if the proposal was inserted or replaced a less relevant
	/// equal entry.
	pub fn add(&mut self, proposal: Proposal) -> bool {
		let identity = proposal.identity();
		match self.index.get(&identity) {
			Some(&slot) => {
				let existing = &mut self.items[slot];
				if proposal.relevance > existing.relevance {
					tracing::trace!(
						label = %proposal.label,
						old = existing.relevance,
						new = proposal.relevance,
						"assist.collector.replace"
					);
					*existing = proposal;
					true
				} else {
					false
				}
			}
			None => {
				self.index.insert(identity, self.items.len());
				self.items.push(proposal);
				true
			}
		}
	}

	/// Adds every proposal from `proposals`.
	pub fn extend<I>(&mut self, proposals: I)
	where
		I: IntoIterator<Item = Proposal>,
	{
		for proposal in proposals {
			self.add(proposal);
		}
	}

	/// Returns the number of distinct entries.
	pub fn len(&self) -> usize {
		self.items.len()
	}

	/// Returns true if nothing was collected.
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Returns true if an entry with `identity` was collected.
	pub fn contains(&self, identity: &ProposalIdentity) -> bool {
		self.index.contains_key(identity)
	}

	/// Iterates entries in insertion order.
	pub fn iter(&self) -> std::slice::Iter<'_, Proposal> {
		self.items.iter()
	}

	/// Consumes the collector, returning entries in insertion order.
	pub fn into_vec(self) -> Vec<Proposal> {
		self.items
	}

	/// Consumes the collector, returning entries in ranking order.
	pub fn into_sorted(self) -> Vec<Proposal> {
		let mut items = self.items;
		sort_proposals(&mut items);
		items
	}
}
