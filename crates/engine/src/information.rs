//! Context-information collection and the shortcut cache.
//!
//! # Role
//!
//! Context information is a narrower proposal mode than completion (which
//! overload, which parameter). The engine can jump straight to it when the
//! [`InformationHeuristic`] says the caret is at such a site. The shortcut
//! succeeds only when collection resolves to exactly one proposal.
//!
//! # Invariants
//!
//! - Only a successful shortcut updates the [`InformationCache`]. Ambiguous
//!   or empty results leave it untouched so a genuinely ambiguous site keeps
//!   falling through to completion.
//! - Categories appearing in several groups are asked once per collection;
//!   two categories are the same when they share a computer cache.

use std::time::{Duration, Instant};

use assist_primitives::{CharIdx, InvocationContext, ProposalCollector};
use assist_registry::Category;

use crate::scan::{Scan, ScanEnd};
use crate::sequence::CategorySequence;


/// Decides whether an invocation should go to context information first.
pub trait InformationHeuristic: Send + Sync {
	/// Returns true if the caret in `context` is at a context-information
	/// site.
	fn prefers_context_information(&self, context: &InvocationContext) -> bool;
}

/// Heuristic that never takes the shortcut.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverPreferInformation;

impl InformationHeuristic for NeverPreferInformation {
	fn prefers_context_information(&self, _context: &InvocationContext) -> bool {
		false
	}
}

/// Where and when the last shortcut resolved unambiguously.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InformationCache {
	pub offset: CharIdx,
	pub at: Instant,
	pub modification_stamp: u64,
}

impl InformationCache {
	pub(crate) fn capture(context: &InvocationContext) -> Self {
		Self {
			offset: context.offset(),
			at: Instant::now(),
			modification_stamp: context.modification_stamp(),
		}
	}

	/// Returns true if the shortcut may be tried again at `context`.
	///
	/// A fresh entry suppresses the shortcut only while all of these hold:
	/// it is younger than `window`, the offset and the buffer stamp are
	/// unchanged, and the information popup is still showing.
	pub fn is_stale(&self, context: &InvocationContext, information_showing: bool, window: Duration) -> bool {
		self.is_stale_at(Instant::now(), context, information_showing, window)
	}

	pub(crate) fn is_stale_at(
		&self,
		now: Instant,
		context: &InvocationContext,
		information_showing: bool,
		window: Duration,
	) -> bool {
		now.saturating_duration_since(self.at) > window
			|| self.offset != context.offset()
			|| !information_showing
			|| self.modification_stamp != context.modification_stamp()
	}
}

/// Collects information proposals from every group of `sequence`.
pub(crate) fn collect_all(scan: &mut Scan<'_>, sequence: &CategorySequence, collector: &mut ProposalCollector) {
	for category in unique_categories(sequence) {
		if scan.information(std::slice::from_ref(category), collector, false) == ScanEnd::Cancelled {
			return;
		}
	}
}

/// Tries to resolve the information at the caret to a single proposal.
///
/// The default group is asked first; if it alone yields exactly one
/// proposal the separate groups are not consulted. Any ambiguity or
/// cancellation ends the attempt.
pub(crate) fn resolve_unambiguous(
	scan: &mut Scan<'_>,
	sequence: &CategorySequence,
	collector: &mut ProposalCollector,
) -> bool {
	let default = sequence.groups().first().map(|g| g.categories()).unwrap_or_default();
	if scan.information(default, collector, true) != ScanEnd::Completed {
		return false;
	}
	if collector.len() == 1 {
		return true;
	}

	let separate: Vec<Category> = unique_categories(sequence)
		.filter(|c| !default.iter().any(|d| d.shares_cache_with(c)))
		.cloned()
		.collect();
	scan.information(&separate, collector, true) == ScanEnd::Completed && collector.len() == 1
}

/// Categories of all groups in sequence order, each once.
///
/// Identity is the shared computer cache, not the id: an ad-hoc category may
/// reuse a registry id and still own different computers.
fn unique_categories<'a>(sequence: &'a CategorySequence) -> impl Iterator<Item = &'a Category> {
	let mut seen: Vec<&'a Category> = Vec::new();
	sequence
		.groups()
		.iter()
		.flat_map(|g| g.categories())
		.filter(move |c| {
			let category: &'a Category = *c;
			if seen.iter().any(|s| s.shares_cache_with(category)) {
				false
			} else {
				seen.push(category);
				true
			}
		})
}
