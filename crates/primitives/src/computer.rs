//! The contract every proposal source implements.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::buffer::{BufferError, PartitionId};
use crate::collector::ProposalCollector;
use crate::context::InvocationContext;
use crate::status::Status;

/// How the engine is asking for proposals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComputeMode {
	/// All default-included categories are asked together.
	Combined,
	/// A single category is asked on its own (cycling or specific session).
	Specific,
}

/// Session details handed to [`Computer::session_started`].
#[derive(Debug, Clone)]
pub struct SessionInfo {
	/// Counter of the session being started.
	pub session_counter: u64,
	/// True if the session was triggered automatically (typing, timer).
	pub auto_activated: bool,
	/// Category the session is restricted to, if any.
	pub specific_category: Option<Arc<str>>,
	/// Partition at the caret when the session started.
	pub partition: PartitionId,
}

/// Failure of a single computer. Logged by the engine, never surfaced.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ComputerError {
	/// The computer could not produce proposals.
	#[error("{0}")]
	Failed(String),
	/// The computer could not read the buffer.
	#[error(transparent)]
	Buffer(#[from] BufferError),
	/// The computer could not be instantiated.
	#[error("instantiation failed: {0}")]
	Instantiation(String),
}

/// A pluggable proposal source for one or more partitions.
///
/// Computers are instantiated once and shared for the lifetime of the
/// registry, so all methods take `&self`.
pub trait Computer: Send + Sync {
	/// Stable identifier.
	fn id(&self) -> &str;

	/// Called the first time the computer is asked for proposals in a session.
	fn session_started(&self, _session: &SessionInfo) {}

	/// Called exactly once when a session the computer contributed to ends.
	fn session_ended(&self) {}

	/// Adds completion proposals for `context` to `collector`.
	///
	/// Cancellation is advisory: a computer should check `cancel` and return
	/// early with partial results rather than fail.
	fn compute_completion_proposals(
		&self,
		context: &InvocationContext,
		mode: ComputeMode,
		collector: &mut ProposalCollector,
		cancel: &CancellationToken,
	) -> Result<Status, ComputerError>;

	/// Adds context-information proposals for `context` to `collector`.
	fn compute_information_proposals(
		&self,
		_context: &InvocationContext,
		_collector: &mut ProposalCollector,
		_cancel: &CancellationToken,
	) -> Result<Status, ComputerError> {
		Ok(Status::ok())
	}
}
