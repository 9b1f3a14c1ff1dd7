//! Category registry with atomic publication.
//!
//! # Role
//!
//! One registry exists per content type and is passed to the engine
//! explicitly. It publishes an immutable [`CategorySnapshot`]; readers load
//! the current snapshot and keep it for as long as they need a consistent
//! view (the engine keeps one for a whole session).
//!
//! # Invariants
//!
//! - Snapshots are never mutated after publication.
//! - Categories in a snapshot are ordered by rank; equal ranks keep their
//!   insertion order.
//! - Category ids are unique within a snapshot.
//! - A [`CategoryEdit`] commits only if no other commit happened since it was
//!   started (compare-and-swap on the snapshot pointer).

use std::sync::Arc;

use arc_swap::ArcSwap;
use rustc_hash::FxHashSet;

use crate::category::Category;
use crate::error::RegistryError;


/// Immutable, ordered view of the registry's categories.
#[derive(Debug, Clone)]
pub struct CategorySnapshot {
	categories: Vec<Category>,
	generation: u64,
}

impl CategorySnapshot {
	fn build(mut categories: Vec<Category>, generation: u64) -> Result<Self, RegistryError> {
		let mut seen = FxHashSet::default();
		for category in &categories {
			if !seen.insert(category.id().clone()) {
				return Err(RegistryError::DuplicateCategory(category.id().clone()));
			}
		}
		categories.sort_by_key(Category::rank);
		Ok(Self { categories, generation })
	}

	/// Categories in cycling order.
	pub fn categories(&self) -> &[Category] {
		&self.categories
	}

	/// Looks up a category by id.
	pub fn get(&self, id: &str) -> Option<&Category> {
		self.categories.iter().find(|c| &**c.id() == id)
	}

	/// Number of commits that produced this snapshot.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	/// Number of categories.
	pub fn len(&self) -> usize {
		self.categories.len()
	}

	/// Returns true if the registry has no categories.
	pub fn is_empty(&self) -> bool {
		self.categories.is_empty()
	}
}

/// Authoritative category list for one content type.
pub struct CategoryRegistry {
	content_type: Arc<str>,
	snap: ArcSwap<CategorySnapshot>,
}

impl CategoryRegistry {
	/// Creates a registry for `content_type` holding `categories`.
	pub fn new(content_type: &str, categories: Vec<Category>) -> Result<Self, RegistryError> {
		let snap = CategorySnapshot::build(categories, 0)?;
		Ok(Self {
			content_type: Arc::from(content_type),
			snap: ArcSwap::from_pointee(snap),
		})
	}

	/// Content type this registry serves.
	pub fn content_type(&self) -> &str {
		&self.content_type
	}

	/// Returns the current snapshot.
	pub fn snapshot(&self) -> Arc<CategorySnapshot> {
		self.snap.load_full()
	}

	/// Returns a copy of the category with `id`.
	pub fn get(&self, id: &str) -> Option<Category> {
		self.snap.load().get(id).cloned()
	}

	/// Starts an edit on copies of the current categories.
	pub fn edit(&self) -> CategoryEdit {
		let base = self.snap.load_full();
		let categories = base.categories.clone();
		CategoryEdit { base, categories }
	}

	/// Publishes `edit` atomically.
	///
	/// Fails with [`RegistryError::Conflict`] if another commit happened
	/// since the edit started; the caller can start a fresh edit and retry.
	pub fn commit(&self, edit: CategoryEdit) -> Result<u64, RegistryError> {
		let base = edit.base;
		let generation = base.generation + 1;
		let next = Arc::new(CategorySnapshot::build(edit.categories, generation)?);

		let prev = self.snap.compare_and_swap(&base, next);
		if !Arc::ptr_eq(&*prev, &base) {
			return Err(RegistryError::Conflict {
				base: base.generation,
				current: prev.generation,
			});
		}

		tracing::debug!(content_type = %self.content_type, generation, "assist.registry.commit");
		Ok(generation)
	}
}

impl std::fmt::Debug for CategoryRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CategoryRegistry")
			.field("content_type", &self.content_type)
			.field("snapshot", &self.snap.load())
			.finish()
	}
}

/// Pending modification of a registry, made on category copies.
///
/// Nothing is visible to readers until [`CategoryRegistry::commit`].
#[derive(Debug, Clone)]
pub struct CategoryEdit {
	base: Arc<CategorySnapshot>,
	categories: Vec<Category>,
}

impl CategoryEdit {
	/// Categories as edited so far.
	pub fn categories(&self) -> &[Category] {
		&self.categories
	}

	fn category_mut(&mut self, id: &str) -> Result<&mut Category, RegistryError> {
		self.categories
			.iter_mut()
			.find(|c| &**c.id() == id)
			.ok_or_else(|| RegistryError::UnknownCategory(id.to_string()))
	}

	/// Sets whether `id` contributes to the default group.
	pub fn set_included_in_default(&mut self, id: &str, included: bool) -> Result<(), RegistryError> {
		self.category_mut(id)?.set_included_in_default(included);
		Ok(())
	}

	/// Sets whether `id` is its own cycling entry.
	pub fn set_enabled_as_separate(&mut self, id: &str, enabled: bool) -> Result<(), RegistryError> {
		self.category_mut(id)?.set_enabled_as_separate(enabled);
		Ok(())
	}

	/// Sets the rank of `id`.
	pub fn set_rank(&mut self, id: &str, rank: u32) -> Result<(), RegistryError> {
		self.category_mut(id)?.set_rank(rank);
		Ok(())
	}

	/// Reorders categories to follow `ids`, assigning consecutive ranks.
	///
	/// Categories not named in `ids` keep their relative order after the
	/// named ones.
	pub fn reorder(&mut self, ids: &[&str]) -> Result<(), RegistryError> {
		for id in ids {
			self.category_mut(id)?;
		}
		self.categories.sort_by_key(|c| {
			ids.iter()
				.position(|id| **id == **c.id())
				.unwrap_or(ids.len())
		});
		for (rank, category) in self.categories.iter_mut().enumerate() {
			category.set_rank(rank as u32);
		}
		Ok(())
	}

	/// Adds a category.
	pub fn insert(&mut self, category: Category) -> Result<(), RegistryError> {
		if self.categories.iter().any(|c| c.id() == category.id()) {
			return Err(RegistryError::DuplicateCategory(category.id().clone()));
		}
		self.categories.push(category);
		Ok(())
	}

	/// Removes the category with `id`.
	pub fn remove(&mut self, id: &str) -> Result<Category, RegistryError> {
		let pos = self
			.categories
			.iter()
			.position(|c| &**c.id() == id)
			.ok_or_else(|| RegistryError::UnknownCategory(id.to_string()))?;
		Ok(self.categories.remove(pos))
	}
}
