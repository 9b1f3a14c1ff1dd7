#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Content-assist session engine.
//!
//! [`CompletionEngine`] drives one viewer's completion popup: it builds the
//! category sequence when a session starts, asks the category computers for
//! proposals, cycles through separate groups on repeated invocation, offers
//! context information as a shortcut, and reruns computations on demand while
//! the popup is open.
//!
//! The engine never renders and never schedules timers of its own beyond the
//! optional deferred reload. Hosts call it from their UI loop, read the
//! [`Presentation`] hints, and feed popup lifecycle events back through the
//! `notify_*` methods.

/// Session engine and its notification surface.
pub mod engine;
/// Engine error types.
pub mod error;
/// Context-information heuristic, cache and shortcut resolution.
pub mod information;
/// Engine options loaded from TOML.
pub mod options;
/// Popup hints published after each computation.
pub mod presentation;
/// Deferred reload scheduling.
pub mod reload;
mod scan;
/// Ordered category groups for cycling.
pub mod sequence;
/// Session state machine.
pub mod session;
#[cfg(test)]
mod testing;

pub use engine::{CompletionEngine, CompletionOutcome};
pub use error::EngineError;
pub use information::{InformationCache, InformationHeuristic, NeverPreferInformation};
pub use options::EngineOptions;
pub use presentation::Presentation;
pub use reload::{DeferredReload, ReloadScheduler};
pub use sequence::{CategoryGroup, CategorySequence, DEFAULT_GROUP_NAME};
pub use session::{ActiveSession, SessionState};
