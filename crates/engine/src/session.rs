//! Completion session state machine.
//!
//! # Role
//!
//! A session runs from the first computation after the popup opened until
//! the host reports that it closed. [`SessionState`] is the explicit state:
//! `Idle`, or `Active` with the data the engine needs while the popup is up.
//!
//! # Invariants
//!
//! - The cycling position is `None` until the first iteration of a session
//!   and always indexes into the session's sequence afterwards.
//! - A suppressed iteration never moves the position (it only clamps `None`
//!   to `Some(0)`).
//! - Every computer invoked during a session is told the session started
//!   before its first invocation and that it ended exactly once.

use std::sync::Arc;

use assist_primitives::{Computer, SessionInfo};

use crate::sequence::CategorySequence;


/// Whether a completion session is running.
#[derive(Debug, Default)]
pub enum SessionState {
	#[default]
	Idle,
	Active(ActiveSession),
}

impl SessionState {
	pub fn is_active(&self) -> bool {
		matches!(self, Self::Active(_))
	}

	pub fn active(&self) -> Option<&ActiveSession> {
		match self {
			Self::Active(session) => Some(session),
			Self::Idle => None,
		}
	}

	pub fn active_mut(&mut self) -> Option<&mut ActiveSession> {
		match self {
			Self::Active(session) => Some(session),
			Self::Idle => None,
		}
	}
}

/// Data of a running session.
#[derive(Debug)]
pub struct ActiveSession {
	/// The session was triggered automatically rather than by a command.
	pub(crate) auto_request: bool,
	/// Category the session is restricted to.
	pub(crate) specific_category: Option<Arc<str>>,
	/// A silent reload computation is in progress.
	pub(crate) reload: bool,
	/// Computation source that owns the session.
	pub(crate) driver: Arc<str>,
	pub(crate) sequence: CategorySequence,
	pub(crate) iteration: Option<usize>,
	/// The next iteration keeps the current position.
	pub(crate) suppress_iteration: bool,
	pub(crate) computers: SessionComputers,
}

impl ActiveSession {
	pub(crate) fn new(
		info: SessionInfo,
		driver: Arc<str>,
		sequence: CategorySequence,
	) -> Self {
		Self {
			auto_request: info.auto_activated,
			specific_category: info.specific_category.clone(),
			reload: false,
			driver,
			sequence,
			iteration: None,
			suppress_iteration: false,
			computers: SessionComputers::new(info),
		}
	}

	pub fn is_auto_request(&self) -> bool {
		self.auto_request
	}

	pub fn specific_category(&self) -> Option<&Arc<str>> {
		self.specific_category.as_ref()
	}

	pub fn is_reload(&self) -> bool {
		self.reload
	}

	pub fn driver(&self) -> &str {
		&self.driver
	}

	pub fn sequence(&self) -> &CategorySequence {
		&self.sequence
	}

	/// Current cycling position; `None` before the first iteration.
	pub fn iteration(&self) -> Option<usize> {
		self.iteration
	}

	/// Advances the cycling position, wrapping around the sequence.
	///
	/// A pending suppression is consumed instead, leaving the position
	/// where it was.
	pub(crate) fn iterate(&mut self) {
		if self.sequence.is_empty() {
			return;
		}
		if std::mem::take(&mut self.suppress_iteration) {
			self.iteration = Some(self.iteration.unwrap_or(0));
			return;
		}
		self.iteration = Some(match self.iteration {
			None => 0,
			Some(position) => (position + 1) % self.sequence.len(),
		});
	}

	/// Steps the position back by one so that the next iteration lands where
	/// the session already was. Never goes below `None`.
	pub(crate) fn step_back(&mut self) {
		self.iteration = match self.iteration {
			None | Some(0) => None,
			Some(position) => Some(position - 1),
		};
	}
}

/// Computers invoked during one session, in first-invocation order.
pub(crate) struct SessionComputers {
	info: SessionInfo,
	started: Vec<Arc<dyn Computer>>,
}

impl SessionComputers {
	pub(crate) fn new(info: SessionInfo) -> Self {
		Self {
			info,
			started: Vec::new(),
		}
	}

	/// Notifies `computer` that the session started, unless it already was.
	pub(crate) fn ensure_started(&mut self, computer: &Arc<dyn Computer>) {
		if self.started.iter().any(|c| Arc::ptr_eq(c, computer)) {
			return;
		}
		computer.session_started(&self.info);
		self.started.push(computer.clone());
	}

	/// Number of computers told about the session.
	pub(crate) fn len(&self) -> usize {
		self.started.len()
	}

	/// Notifies every started computer that the session ended.
	pub(crate) fn end_all(self) {
		for computer in self.started {
			computer.session_ended();
		}
	}
}

impl std::fmt::Debug for SessionComputers {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let ids: Vec<_> = self.started.iter().map(|c| c.id()).collect();
		f.debug_struct("SessionComputers")
			.field("session", &self.info.session_counter)
			.field("started", &ids)
			.finish()
	}
}
