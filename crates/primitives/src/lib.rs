#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Contract types shared between the completion engine and its collaborators.
//!
//! Everything a proposal source ("computer") sees lives here: the buffer it
//! reads, the invocation context it is handed, the collector it writes into,
//! and the status it reports back. The engine and the category registry
//! depend on this crate; computers only need this crate.

/// Buffer abstraction and partition identifiers.
pub mod buffer;
/// Proposal merge set.
pub mod collector;
/// Proposal source contract.
pub mod computer;
/// Per-invocation context handed to computers.
pub mod context;
/// Proposal data and ranking order.
pub mod proposal;
/// Character offsets and selections.
pub mod range;
/// Ropey-backed buffer implementation.
pub mod rope;
/// Computation status reported by computers.
pub mod status;
/// Host viewer surface (selection, popup state, focus).
pub mod viewer;

pub use buffer::{Buffer, BufferError, DEFAULT_PARTITION, PartitionId, default_partition};
pub use collector::ProposalCollector;
pub use computer::{ComputeMode, Computer, ComputerError, SessionInfo};
pub use context::InvocationContext;
pub use proposal::{Proposal, ProposalIdentity, ProposalKind, compare_proposals, sort_proposals};
pub use range::{CharIdx, CharLen, Selection};
pub use rope::RopeBuffer;
pub use status::{Severity, Status};
pub use tokio_util::sync::CancellationToken;
pub use viewer::{SelectionProvider, TextViewer};
