use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use assist_primitives::{Computer, ComputerError, PartitionId};
use rustc_hash::FxHashSet;

/// Constructor for a computer, invoked at most once per descriptor.
pub type ComputerFactory = Arc<dyn Fn() -> Result<Arc<dyn Computer>, ComputerError> + Send + Sync>;

/// Static description of a computer: identity, supported partitions and
/// how to build it.
///
/// The computer is instantiated lazily on first use and cached for the
/// descriptor's lifetime. A failed instantiation marks the descriptor
/// broken; it is reported once and skipped afterwards.
pub struct ComputerDescriptor {
	id: Arc<str>,
	name: Arc<str>,
	partitions: FxHashSet<PartitionId>,
	factory: ComputerFactory,
	instance: OnceLock<Arc<dyn Computer>>,
	broken: AtomicBool,
}

impl ComputerDescriptor {
	/// Creates a descriptor built by `factory`.
	pub fn new<I, P>(id: &str, name: &str, partitions: I, factory: ComputerFactory) -> Self
	where
		I: IntoIterator<Item = P>,
		P: Into<PartitionId>,
	{
		Self {
			id: Arc::from(id),
			name: Arc::from(name),
			partitions: partitions.into_iter().map(Into::into).collect(),
			factory,
			instance: OnceLock::new(),
			broken: AtomicBool::new(false),
		}
	}

	/// Creates a descriptor around an already constructed computer.
	pub fn from_computer<I, P>(computer: Arc<dyn Computer>, partitions: I) -> Self
	where
		I: IntoIterator<Item = P>,
		P: Into<PartitionId>,
	{
		let id = computer.id().to_string();
		let instance = computer.clone();
		let factory: ComputerFactory = Arc::new(move || Ok(instance.clone()));
		let descriptor = Self::new(&id, &id, partitions, factory);
		let _ = descriptor.instance.set(computer);
		descriptor
	}

	/// Stable identifier.
	pub fn id(&self) -> &Arc<str> {
		&self.id
	}

	/// Display name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Declared partitions.
	pub fn partitions(&self) -> impl Iterator<Item = &PartitionId> {
		self.partitions.iter()
	}

	/// Returns true if the computer declares `partition`.
	pub fn supports(&self, partition: &str) -> bool {
		self.partitions.contains(partition)
	}

	/// Returns true once instantiation has failed.
	pub fn is_broken(&self) -> bool {
		self.broken.load(Ordering::Acquire)
	}

	/// Returns the computer, instantiating it on first use.
	///
	/// Returns `None` if instantiation fails now or failed before.
	pub fn computer(&self) -> Option<Arc<dyn Computer>> {
		if let Some(computer) = self.instance.get() {
			return Some(computer.clone());
		}
		if self.is_broken() {
			return None;
		}

		match (self.factory)() {
			Ok(computer) => Some(self.instance.get_or_init(|| computer).clone()),
			Err(error) => {
				if !self.broken.swap(true, Ordering::AcqRel) {
					tracing::warn!(computer = %self.id, %error, "assist.computer.instantiate_failed");
				}
				None
			}
		}
	}
}

impl std::fmt::Debug for ComputerDescriptor {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut partitions: Vec<_> = self.partitions.iter().map(|p| &**p).collect();
		partitions.sort_unstable();
		f.debug_struct("ComputerDescriptor")
			.field("id", &self.id)
			.field("name", &self.name)
			.field("partitions", &partitions)
			.field("instantiated", &self.instance.get().is_some())
			.field("broken", &self.is_broken())
			.finish()
	}
}
