//! Categories: named, orderable groups of computers.
//!
//! # Caching
//!
//! Resolving the computers of a category for a partition filters its
//! descriptors and instantiates the matches. The result is cached per
//! partition, including the empty result, so repeated lookups in a
//! partition no descriptor supports never rescan.
//!
//! The cache is configuration data, not session state. Copies of a category
//! share it; only the flags (`included_in_default`, `enabled_as_separate`,
//! `rank`) are copied, so editing a copy never touches the original.

use std::sync::Arc;

use assist_primitives::{Computer, PartitionId};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::descriptor::ComputerDescriptor;


type Resolved = Arc<[Arc<dyn Computer>]>;

struct ComputerCache {
	descriptors: Vec<ComputerDescriptor>,
	resolved: Mutex<FxHashMap<PartitionId, Resolved>>,
	presence: Mutex<FxHashMap<PartitionId, bool>>,
	empty: Resolved,
}

impl ComputerCache {
	fn new(descriptors: Vec<ComputerDescriptor>) -> Self {
		Self {
			descriptors,
			resolved: Mutex::new(FxHashMap::default()),
			presence: Mutex::new(FxHashMap::default()),
			empty: Arc::from(Vec::new()),
		}
	}
}

/// A named group of computers with cycling flags.
#[derive(Clone)]
pub struct Category {
	id: Arc<str>,
	name: Arc<str>,
	included_in_default: bool,
	enabled_as_separate: bool,
	rank: u32,
	cache: Arc<ComputerCache>,
}

impl Category {
	/// Creates a category owning `descriptors`.
	///
	/// New categories are included in the default group and not enabled as
	/// a separate cycling entry.
	pub fn new(id: &str, name: &str, descriptors: Vec<ComputerDescriptor>) -> Self {
		Self {
			id: Arc::from(id),
			name: Arc::from(name),
			included_in_default: true,
			enabled_as_separate: false,
			rank: 0,
			cache: Arc::new(ComputerCache::new(descriptors)),
		}
	}

	/// Sets whether the category contributes to the default group.
	pub fn with_included_in_default(mut self, included: bool) -> Self {
		self.included_in_default = included;
		self
	}

	/// Sets whether the category is its own cycling entry.
	pub fn with_enabled_as_separate(mut self, enabled: bool) -> Self {
		self.enabled_as_separate = enabled;
		self
	}

	/// Sets the cycling order rank.
	pub fn with_rank(mut self, rank: u32) -> Self {
		self.rank = rank;
		self
	}

	/// Stable identifier.
	pub fn id(&self) -> &Arc<str> {
		&self.id
	}

	/// Display name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Whether the category contributes to the default group.
	pub fn is_included_in_default(&self) -> bool {
		self.included_in_default
	}

	/// Whether the category is its own cycling entry.
	pub fn is_enabled_as_separate(&self) -> bool {
		self.enabled_as_separate
	}

	/// Cycling order rank; lower ranks come first.
	pub fn rank(&self) -> u32 {
		self.rank
	}

	pub fn set_included_in_default(&mut self, included: bool) {
		self.included_in_default = included;
	}

	pub fn set_enabled_as_separate(&mut self, enabled: bool) {
		self.enabled_as_separate = enabled;
	}

	pub fn set_rank(&mut self, rank: u32) {
		self.rank = rank;
	}

	/// Owned descriptors, in declaration order.
	pub fn descriptors(&self) -> &[ComputerDescriptor] {
		&self.cache.descriptors
	}

	/// Returns true if `other` shares this category's computer cache.
	pub fn shares_cache_with(&self, other: &Category) -> bool {
		Arc::ptr_eq(&self.cache, &other.cache)
	}

	/// Returns true if any usable descriptor declares `partition`.
	///
	/// Never instantiates a computer.
	pub fn has_computers(&self, partition: &str) -> bool {
		if let Some(&present) = self.cache.presence.lock().get(partition) {
			return present;
		}
		let present = self
			.cache
			.descriptors
			.iter()
			.any(|d| d.supports(partition) && !d.is_broken());
		self.cache.presence.lock().insert(Arc::from(partition), present);
		present
	}

	/// Returns the computers applying to `partition`, in declaration order.
	///
	/// Descriptors that fail to instantiate are skipped; the rest of the
	/// category still resolves.
	pub fn resolve_computers(&self, partition: &str) -> Arc<[Arc<dyn Computer>]> {
		if let Some(hit) = self.cache.resolved.lock().get(partition) {
			return hit.clone();
		}

		let resolved = if self.cache.descriptors.iter().any(|d| d.supports(partition)) {
			let computers: Vec<_> = self
				.cache
				.descriptors
				.iter()
				.filter(|d| d.supports(partition))
				.filter_map(ComputerDescriptor::computer)
				.collect();
			tracing::debug!(
				category = %self.id,
				partition,
				count = computers.len(),
				"assist.category.resolve"
			);
			Arc::from(computers)
		} else {
			self.cache.empty.clone()
		};

		self.cache
			.resolved
			.lock()
			.entry(Arc::from(partition))
			.or_insert(resolved)
			.clone()
	}
}

impl std::fmt::Debug for Category {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Category")
			.field("id", &self.id)
			.field("name", &self.name)
			.field("included_in_default", &self.included_in_default)
			.field("enabled_as_separate", &self.enabled_as_separate)
			.field("rank", &self.rank)
			.field("descriptors", &self.cache.descriptors.len())
			.finish()
	}
}
