//! The completion engine.
//!
//! # Role
//!
//! [`CompletionEngine`] is driven by the host's popup framework. It starts
//! and ends sessions, steps through the category cycle, decides between the
//! context-information shortcut, a category-restricted computation and the
//! combined default computation, and returns ranked proposals.
//!
//! # Invariants
//!
//! - The engine is single-threaded: every entry point takes `&mut self` and
//!   no session state is shared.
//! - The cycling position advances exactly once per computation, except
//!   during a reload, which keeps it where it was.
//! - A stashed reload result is handed out instead of computing again, so
//!   a reload performs exactly one real computation.
//! - A deferred reload posted under another session counter never runs.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use assist_primitives::{
	CancellationToken, CharIdx, ComputeMode, InvocationContext, Proposal, ProposalCollector, SessionInfo, TextViewer,
};
use assist_registry::{Category, CategoryRegistry};

use crate::information::{self, InformationCache, InformationHeuristic, NeverPreferInformation};
use crate::options::EngineOptions;
use crate::presentation::Presentation;
use crate::reload::{DeferredReload, ReloadScheduler};
use crate::scan::{Scan, ScanEnd, StatusTracker};
use crate::sequence::CategorySequence;
use crate::session::{ActiveSession, SessionState};


/// Ranked proposals of one computation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionOutcome {
	pub proposals: Vec<Proposal>,
	/// Message of the worst status, set only when it is an error.
	pub error_message: Option<String>,
}

impl CompletionOutcome {
	fn collected(collector: ProposalCollector, status: &StatusTracker) -> Self {
		Self {
			proposals: collector.into_sorted(),
			error_message: status.error_message(),
		}
	}
}

/// Orchestrates completion sessions for one viewer.
pub struct CompletionEngine {
	registry: Arc<CategoryRegistry>,
	viewer: Arc<dyn TextViewer>,
	options: EngineOptions,
	heuristic: Box<dyn InformationHeuristic>,
	adhoc: Vec<Category>,
	state: SessionState,
	session_counter: u64,
	selection_counter: u64,
	context: Option<InvocationContext>,
	information: Option<InformationCache>,
	presentation: Presentation,
	error_message: Option<String>,
	stash: Option<CompletionOutcome>,
	scheduler: ReloadScheduler,
	requested_category: Option<Arc<str>>,
}

impl CompletionEngine {
	/// Creates an engine completing in `viewer` with the categories of
	/// `registry`.
	pub fn new(registry: Arc<CategoryRegistry>, viewer: Arc<dyn TextViewer>, options: EngineOptions) -> Self {
		Self {
			registry,
			viewer,
			options,
			heuristic: Box::new(NeverPreferInformation),
			adhoc: Vec::new(),
			state: SessionState::Idle,
			session_counter: 0,
			selection_counter: 0,
			context: None,
			information: None,
			presentation: Presentation::default(),
			error_message: None,
			stash: None,
			scheduler: ReloadScheduler::new(),
			requested_category: None,
		}
	}

	/// Replaces the heuristic deciding when to try context information first.
	pub fn with_heuristic(mut self, heuristic: impl InformationHeuristic + 'static) -> Self {
		self.heuristic = Box::new(heuristic);
		self
	}

	/// Adds a category outside the registry. It joins the default group of
	/// sessions started afterwards when it is default-included.
	pub fn with_adhoc_category(mut self, category: Category) -> Self {
		self.adhoc.push(category);
		self
	}

	pub fn options(&self) -> &EngineOptions {
		&self.options
	}

	pub fn registry(&self) -> &Arc<CategoryRegistry> {
		&self.registry
	}

	pub fn state(&self) -> &SessionState {
		&self.state
	}

	pub fn presentation(&self) -> &Presentation {
		&self.presentation
	}

	// Host notifications.

	/// The popup framework opened a session.
	pub fn notify_session_started(&mut self, auto_activated: bool) {
		if self.state.is_active() {
			tracing::debug!(session = self.session_counter, "assist.session.already_active");
			return;
		}
		let offset = self.viewer.selection().offset;
		self.start(auto_activated, offset);
	}

	/// The popup framework restarted the session on behalf of `source_id`.
	///
	/// A restart driven by another source hijacked the session and ends it.
	/// Otherwise the cycling position steps back so that the framework's
	/// re-display does not advance the cycle, and the context is rebuilt.
	pub fn notify_session_restarted(&mut self, source_id: &str) {
		let Some(active) = self.state.active_mut() else {
			return;
		};
		if active.driver() != source_id {
			tracing::debug!(
				session = self.session_counter,
				driver = active.driver(),
				source = source_id,
				"assist.session.hijacked"
			);
			self.end();
			return;
		}
		active.step_back();
		self.context = None;
		tracing::debug!(session = self.session_counter, position = ?active.iteration(), "assist.session.restart");
	}

	/// The popup closed.
	pub fn notify_session_ended(&mut self) {
		self.end();
	}

	/// The highlighted proposal in the popup changed.
	pub fn notify_selection_changed(&mut self, proposal: Option<&Proposal>) {
		if !self.state.is_active() {
			return;
		}
		self.selection_counter += 1;
		tracing::trace!(
			session = self.session_counter,
			selection = self.selection_counter,
			label = proposal.map(|p| p.label.as_str()),
			"assist.session.selection"
		);
	}

	/// Requests a session restricted to the category `id`.
	///
	/// A running session is ended; the next session started is specific.
	pub fn invoke_category(&mut self, id: &str) {
		self.end();
		self.requested_category = Some(Arc::from(id));
	}

	// Computation.

	/// Computes completion proposals at `offset`.
	pub fn compute_completion_proposals(&mut self, offset: CharIdx) -> CompletionOutcome {
		self.compute_completion_proposals_with(offset, &CancellationToken::new())
	}

	/// Computes completion proposals at `offset`, stopping early once
	/// `cancel` fires.
	pub fn compute_completion_proposals_with(&mut self, offset: CharIdx, cancel: &CancellationToken) -> CompletionOutcome {
		if !self.state.is_active() {
			self.start(false, offset);
		}
		self.error_message = None;

		if let Some(stash) = &self.stash {
			tracing::trace!(session = self.session_counter, "assist.reload.deliver");
			self.error_message = stash.error_message.clone();
			return stash.clone();
		}

		if let Some(active) = self.state.active_mut() {
			active.iterate();
		}
		let outcome = self.compute(offset, cancel);
		self.error_message = outcome.error_message.clone();
		outcome
	}

	/// Computes context information at `offset` from every group.
	///
	/// Does not start a session; outside one the sequence is derived for the
	/// call alone and no session hooks fire.
	pub fn compute_context_information(&mut self, offset: CharIdx) -> CompletionOutcome {
		self.compute_context_information_with(offset, &CancellationToken::new())
	}

	pub fn compute_context_information_with(&mut self, offset: CharIdx, cancel: &CancellationToken) -> CompletionOutcome {
		self.error_message = None;
		let context = if self.state.is_active() {
			self.context_at(offset)
		} else {
			InvocationContext::new(self.viewer.document(), offset, self.viewer.selection(), self.session_counter)
		};

		let transient;
		let (sequence, session) = match &mut self.state {
			SessionState::Active(active) => (&active.sequence, Some(&mut active.computers)),
			SessionState::Idle => {
				let snapshot = self.registry.snapshot();
				transient = CategorySequence::build(snapshot.categories(), &self.adhoc, context.partition());
				(&transient, None)
			}
		};

		let mut status = StatusTracker::default();
		let mut collector = ProposalCollector::new();
		information::collect_all(
			&mut Scan {
				context: &context,
				cancel,
				session,
				status: &mut status,
			},
			sequence,
			&mut collector,
		);

		let outcome = CompletionOutcome::collected(collector, &status);
		tracing::debug!(offset, count = outcome.proposals.len(), "assist.information.compute");
		self.error_message = outcome.error_message.clone();
		outcome
	}

	// Reload.

	/// Requests a silent refresh of the open popup.
	///
	/// The reload is posted only while the popup is showing, the selection
	/// is still where the session's context was built, at most one
	/// highlighted-proposal change happened and the viewer has focus. A
	/// reload never posts another one while it is redisplaying.
	/// Returns true if a reload was posted.
	pub fn request_reload(&mut self) -> bool {
		if !self.state.is_active() {
			return false;
		}
		if self.is_reload_in_progress() {
			tracing::trace!(session = self.session_counter, "assist.reload.reentrant");
			return false;
		}
		let popup = self.viewer.proposal_popup_showing();
		let selection = self.viewer.selection();
		let in_place = self.context.as_ref().is_some_and(|c| c.selection() == selection);
		let settled = self.selection_counter <= 1;
		let focused = self.viewer.has_focus();
		if !(popup && in_place && settled && focused) {
			tracing::trace!(popup, in_place, settled, focused, "assist.reload.skip");
			return false;
		}

		self.scheduler.post_after(self.session_counter, self.options.reload_delay());
		tracing::debug!(session = self.session_counter, "assist.reload.request");
		true
	}

	/// Waits for the next deferred reload.
	pub async fn next_deferred(&mut self) -> Option<DeferredReload> {
		self.scheduler.recv().await
	}

	/// Runs every queued reload. Returns how many were performed.
	///
	/// `redisplay` asks the popup framework to show the popup again; it is
	/// expected to re-enter [`Self::compute_completion_proposals`], which
	/// then returns the reloaded proposals without computing.
	pub fn run_deferred<F>(&mut self, mut redisplay: F) -> usize
	where
		F: FnMut(&mut CompletionEngine),
	{
		let mut ran = 0;
		while let Some(reload) = self.scheduler.try_recv() {
			if self.run_reload(reload, &mut redisplay) {
				ran += 1;
			}
		}
		ran
	}

	/// Runs `reload` unless it is stale. Returns true if it was performed.
	pub fn run_reload<F>(&mut self, reload: DeferredReload, redisplay: F) -> bool
	where
		F: FnOnce(&mut CompletionEngine),
	{
		let offset = self.context.as_ref().map(InvocationContext::offset);
		let live = !reload.is_cancelled() && reload.generation() == self.session_counter && self.state.is_active();
		let (true, Some(offset)) = (live, offset) else {
			tracing::debug!(
				generation = reload.generation(),
				session = self.session_counter,
				cancelled = reload.is_cancelled(),
				"assist.reload.discard"
			);
			return false;
		};

		let mut guard = ReloadGuard::arm(self);
		let outcome = guard.compute_completion_proposals_with(offset, &CancellationToken::new());
		tracing::debug!(
			session = guard.session_counter,
			count = outcome.proposals.len(),
			"assist.reload.computed"
		);
		guard.stash = Some(outcome);
		guard.presentation.repeated_invocation = true;
		redisplay(&mut *guard);
		true
	}

	/// Returns true while a posted reload has not run or been cancelled.
	pub fn reload_pending(&self) -> bool {
		self.scheduler.is_pending()
	}

	// Introspection.

	pub fn is_session_active(&self) -> bool {
		self.state.is_active()
	}

	/// Returns true if the running session was triggered automatically.
	pub fn is_auto_request(&self) -> bool {
		self.state.active().is_some_and(ActiveSession::is_auto_request)
	}

	/// Returns true if the running session is restricted to one category.
	pub fn is_specific_session(&self) -> bool {
		self.specific_category_id().is_some()
	}

	pub fn specific_category_id(&self) -> Option<&str> {
		self.state.active().and_then(|a| a.specific_category()).map(|id| &**id)
	}

	/// Returns true while a reload computation is running.
	pub fn is_reload_in_progress(&self) -> bool {
		self.state.active().is_some_and(ActiveSession::is_reload)
	}

	/// Cycling position of the running session; `None` before the first
	/// computation.
	pub fn iteration_position(&self) -> Option<usize> {
		self.state.active().and_then(ActiveSession::iteration)
	}

	pub fn sequence(&self) -> Option<&CategorySequence> {
		self.state.active().map(ActiveSession::sequence)
	}

	/// Name of the group the last computation used.
	pub fn current_group_name(&self) -> Option<&str> {
		let active = self.state.active()?;
		Some(active.sequence().name(active.iteration().unwrap_or(0)))
	}

	pub fn session_counter(&self) -> u64 {
		self.session_counter
	}

	pub fn selection_counter(&self) -> u64 {
		self.selection_counter
	}

	/// Error message of the last computation, if a computer reported one.
	pub fn error_message(&self) -> Option<&str> {
		self.error_message.as_deref()
	}

	/// Where the last context-information shortcut resolved, if anywhere.
	pub fn information_cache(&self) -> Option<&InformationCache> {
		self.information.as_ref()
	}

	// Internals.

	fn start(&mut self, auto_activated: bool, offset: CharIdx) {
		self.session_counter += 1;
		self.selection_counter = 0;
		self.context = None;
		self.stash = None;

		let specific_category = self.requested_category.take();
		let partition = self.viewer.document().partition_at(offset);
		let snapshot = self.registry.snapshot();
		let sequence = match &specific_category {
			Some(id) => CategorySequence::specific(snapshot.categories(), &self.adhoc, id),
			None => CategorySequence::build(snapshot.categories(), &self.adhoc, &partition),
		};

		tracing::debug!(
			session = self.session_counter,
			auto = auto_activated,
			specific = specific_category.as_deref(),
			partition = %partition,
			groups = sequence.len(),
			registry = snapshot.generation(),
			"assist.session.start"
		);

		self.presentation = Presentation::session_started(&sequence, self.options.auto_insert);
		let info = SessionInfo {
			session_counter: self.session_counter,
			auto_activated,
			specific_category,
			partition,
		};
		let driver = Arc::from(self.options.source_id.as_str());
		self.state = SessionState::Active(ActiveSession::new(info, driver, sequence));
	}

	fn end(&mut self) {
		let SessionState::Active(active) = std::mem::take(&mut self.state) else {
			return;
		};
		self.context = None;
		self.stash = None;
		self.scheduler.cancel();
		self.presentation = Presentation::default();
		tracing::debug!(
			session = self.session_counter,
			computers = active.computers.len(),
			"assist.session.end"
		);
		active.computers.end_all();
	}

	/// Returns the context for `offset`, reusing the cached one while the
	/// selection and the buffer are unchanged.
	fn context_at(&mut self, offset: CharIdx) -> InvocationContext {
		let selection = self.viewer.selection();
		let document = self.viewer.document();
		let stamp = document.modification_stamp();
		if let Some(context) = self
			.context
			.as_ref()
			.filter(|c| c.is_reusable(offset, selection) && c.modification_stamp() == stamp)
		{
			return context.clone();
		}

		let context = InvocationContext::new(document, offset, selection, self.session_counter);
		tracing::trace!(session = self.session_counter, offset, partition = %context.partition(), "assist.context.create");
		self.context = Some(context.clone());
		context
	}

	fn should_try_information(&self, context: &InvocationContext) -> bool {
		if self.viewer.proposal_popup_showing() {
			return false;
		}
		let showing = self.viewer.context_information_showing();
		let window = self.options.information_staleness();
		let stale = self
			.information
			.is_none_or(|cache| cache.is_stale(context, showing, window));
		stale && self.heuristic.prefers_context_information(context)
	}

	fn compute(&mut self, offset: CharIdx, cancel: &CancellationToken) -> CompletionOutcome {
		let context = self.context_at(offset);
		let specific = self.is_specific_session();
		if !specific && self.should_try_information(&context) {
			if let Some(outcome) = self.information_shortcut(&context, cancel) {
				return outcome;
			}
		}

		let SessionState::Active(active) = &mut self.state else {
			return CompletionOutcome::default();
		};
		let position = active.iteration.unwrap_or(0);
		let (group, mode) = match (specific, position) {
			(true, _) => (0, ComputeMode::Specific),
			(false, 0) => (0, ComputeMode::Combined),
			(false, position) => (position, ComputeMode::Specific),
		};
		self.presentation
			.show_group(&active.sequence, group, &self.options.cycle_binding, self.options.auto_insert);

		let categories = active.sequence.group(group).map(|g| g.categories()).unwrap_or_default();
		let mut status = StatusTracker::default();
		let mut collector = ProposalCollector::new();
		let end = Scan {
			context: &context,
			cancel,
			session: Some(&mut active.computers),
			status: &mut status,
		}
		.completions(categories, mode, &mut collector);

		tracing::debug!(
			session = self.session_counter,
			group = active.sequence.name(group),
			mode = ?mode,
			count = collector.len(),
			cancelled = end == ScanEnd::Cancelled,
			"assist.completion.compute"
		);
		CompletionOutcome::collected(collector, &status)
	}

	/// Tries the context-information shortcut. Returns `None` when it did not
	/// resolve to exactly one proposal.
	fn information_shortcut(&mut self, context: &InvocationContext, cancel: &CancellationToken) -> Option<CompletionOutcome> {
		let SessionState::Active(active) = &mut self.state else {
			return None;
		};
		self.presentation.show_information(&self.options.cycle_binding);

		let mut status = StatusTracker::default();
		let mut collector = ProposalCollector::new();
		let resolved = information::resolve_unambiguous(
			&mut Scan {
				context,
				cancel,
				session: Some(&mut active.computers),
				status: &mut status,
			},
			&active.sequence,
			&mut collector,
		);
		if !resolved {
			tracing::debug!(
				session = self.session_counter,
				found = collector.len(),
				"assist.information.ambiguous"
			);
			return None;
		}

		self.information = Some(InformationCache::capture(context));
		tracing::debug!(session = self.session_counter, offset = context.offset(), "assist.information.resolved");
		Some(CompletionOutcome::collected(collector, &status))
	}
}

impl std::fmt::Debug for CompletionEngine {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CompletionEngine")
			.field("content_type", &self.registry.content_type())
			.field("state", &self.state)
			.field("session_counter", &self.session_counter)
			.field("selection_counter", &self.selection_counter)
			.field("context", &self.context)
			.field("presentation", &self.presentation)
			.field("stashed", &self.stash.is_some())
			.finish_non_exhaustive()
	}
}

/// Marks a reload in progress for as long as it lives.
///
/// Dropping it clears the stash and the reload flags and restores the
/// repeated-invocation hint, whatever happened in between.
struct ReloadGuard<'a> {
	engine: &'a mut CompletionEngine,
	repeated_invocation: bool,
}

impl<'a> ReloadGuard<'a> {
	fn arm(engine: &'a mut CompletionEngine) -> Self {
		let repeated_invocation = engine.presentation.repeated_invocation;
		engine.presentation.repeated_invocation = true;
		if let Some(active) = engine.state.active_mut() {
			active.reload = true;
			active.suppress_iteration = true;
		}
		Self {
			engine,
			repeated_invocation,
		}
	}
}

impl Deref for ReloadGuard<'_> {
	type Target = CompletionEngine;

	fn deref(&self) -> &CompletionEngine {
		&*self.engine
	}
}

impl DerefMut for ReloadGuard<'_> {
	fn deref_mut(&mut self) -> &mut CompletionEngine {
		&mut *self.engine
	}
}

impl Drop for ReloadGuard<'_> {
	fn drop(&mut self) {
		self.engine.stash = None;
		if let Some(active) = self.engine.state.active_mut() {
			active.reload = false;
			active.suppress_iteration = false;
			self.engine.presentation.repeated_invocation = self.repeated_invocation;
		}
		tracing::trace!(session = self.engine.session_counter, "assist.reload.finish");
	}
}
