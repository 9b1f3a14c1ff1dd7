//! Category cycling order for one session.
//!
//! # Role
//!
//! A [`CategorySequence`] is derived when a session starts and stays fixed
//! until it ends. Position 0 is the default group: every default-included
//! category with computers for the partition, in registry order, followed by
//! the caller's ad-hoc categories that qualify the same way. Every further
//! position is a singleton group for one separately-enabled category.
//!
//! # Invariants
//!
//! - A sequence always has at least one group (the default group may be
//!   empty).
//! - Cycling is enabled only when there is more than one group.

use std::sync::Arc;

use assist_registry::Category;


/// Display name of the combined group at position 0.
pub const DEFAULT_GROUP_NAME: &str = "Default";

/// One cycling entry: a display name and the categories asked together.
#[derive(Debug, Clone)]
pub struct CategoryGroup {
	name: Arc<str>,
	categories: Vec<Category>,
}

impl CategoryGroup {
	fn new(name: &str, categories: Vec<Category>) -> Self {
		Self {
			name: Arc::from(name),
			categories,
		}
	}

	/// Name used in status and empty-list messages.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Categories in visiting order.
	pub fn categories(&self) -> &[Category] {
		&self.categories
	}

	/// Returns true if the group contains the category `id`.
	pub fn contains(&self, id: &str) -> bool {
		self.categories.iter().any(|c| &**c.id() == id)
	}

	pub fn is_empty(&self) -> bool {
		self.categories.is_empty()
	}
}

/// Ordered cycling groups for one session.
#[derive(Debug, Clone)]
pub struct CategorySequence {
	groups: Vec<CategoryGroup>,
}

impl CategorySequence {
	/// Derives the sequence for `partition`.
	///
	/// `categories` must be in registry order. `adhoc` categories join the
	/// default group after the registry ones; they never get their own
	/// cycling entry.
	pub fn build(categories: &[Category], adhoc: &[Category], partition: &str) -> Self {
		let qualifies = |c: &&Category| c.is_included_in_default() && c.has_computers(partition);
		let default: Vec<_> = categories
			.iter()
			.filter(qualifies)
			.chain(adhoc.iter().filter(qualifies))
			.cloned()
			.collect();

		let mut groups = vec![CategoryGroup::new(DEFAULT_GROUP_NAME, default)];
		groups.extend(
			categories
				.iter()
				.filter(|c| c.is_enabled_as_separate() && c.has_computers(partition))
				.map(|c| CategoryGroup::new(c.name(), vec![c.clone()])),
		);

		tracing::debug!(
			partition,
			groups = groups.len(),
			default = groups[0].categories.len(),
			"assist.sequence.build"
		);
		Self { groups }
	}

	/// Builds the one-group sequence of a session restricted to `id`.
	///
	/// The category is used even if it is neither default-included nor
	/// separately enabled. An unknown id yields an empty group.
	pub fn specific(categories: &[Category], adhoc: &[Category], id: &str) -> Self {
		let found = categories.iter().chain(adhoc).find(|c| &**c.id() == id);
		let group = match found {
			Some(category) => CategoryGroup::new(category.name(), vec![category.clone()]),
			None => {
				tracing::warn!(category = id, "assist.sequence.unknown_category");
				CategoryGroup::new(id, Vec::new())
			}
		};
		Self { groups: vec![group] }
	}

	/// Number of cycling positions.
	pub fn len(&self) -> usize {
		self.groups.len()
	}

	/// Always false: a sequence holds at least the default group.
	pub fn is_empty(&self) -> bool {
		self.groups.is_empty()
	}

	/// Returns true if the sequence has more than one group.
	pub fn is_cycling(&self) -> bool {
		self.groups.len() > 1
	}

	pub fn groups(&self) -> &[CategoryGroup] {
		&self.groups
	}

	/// Returns the group at `position`.
	pub fn group(&self, position: usize) -> Option<&CategoryGroup> {
		self.groups.get(position)
	}

	/// Display name of the group at `position`, wrapping around.
	pub fn name(&self, position: usize) -> &str {
		self.groups[position % self.groups.len()].name()
	}

	/// Display name of the group after `position`, wrapping around.
	pub fn next_name(&self, position: usize) -> &str {
		self.name(position + 1)
	}
}
