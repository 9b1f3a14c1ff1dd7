//! Shared fixtures for unit tests.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use assist_primitives::{
	Buffer, CancellationToken, ComputeMode, Computer, ComputerError, DEFAULT_PARTITION, InvocationContext, Proposal,
	ProposalCollector, ProposalKind, RopeBuffer, Selection, SelectionProvider, Status, TextViewer,
};
use assist_registry::{Category, ComputerDescriptor};

/// What a [`Probe`] returns after adding its proposals.
pub(crate) enum Outcome {
	Status(Status),
	Fail(&'static str),
	Panic,
}

/// Computer that adds fixed proposals and records how it was called.
pub(crate) struct Probe {
	id: &'static str,
	proposals: Vec<(&'static str, i32)>,
	information: Vec<&'static str>,
	outcome: Outcome,
	calls: Mutex<Vec<ComputeMode>>,
	information_calls: AtomicUsize,
	started: AtomicUsize,
	ended: AtomicUsize,
}

impl Probe {
	pub(crate) fn new(id: &'static str) -> Self {
		Self {
			id,
			proposals: Vec::new(),
			information: Vec::new(),
			outcome: Outcome::Status(Status::ok()),
			calls: Mutex::new(Vec::new()),
			information_calls: AtomicUsize::new(0),
			started: AtomicUsize::new(0),
			ended: AtomicUsize::new(0),
		}
	}

	pub(crate) fn proposing(mut self, proposals: &[(&'static str, i32)]) -> Self {
		self.proposals = proposals.to_vec();
		self
	}

	pub(crate) fn informing(mut self, labels: &[&'static str]) -> Self {
		self.information = labels.to_vec();
		self
	}

	pub(crate) fn with_outcome(mut self, outcome: Outcome) -> Self {
		self.outcome = outcome;
		self
	}

	pub(crate) fn calls(&self) -> Vec<ComputeMode> {
		self.calls.lock().unwrap().clone()
	}

	pub(crate) fn information_calls(&self) -> usize {
		self.information_calls.load(Ordering::SeqCst)
	}

	pub(crate) fn started(&self) -> usize {
		self.started.load(Ordering::SeqCst)
	}

	pub(crate) fn ended(&self) -> usize {
		self.ended.load(Ordering::SeqCst)
	}

	fn finish(&self) -> Result<Status, ComputerError> {
		match &self.outcome {
			Outcome::Status(status) => Ok(status.clone()),
			Outcome::Fail(message) => Err(ComputerError::Failed(message.to_string())),
			Outcome::Panic => panic!("probe {} panicked", self.id),
		}
	}
}

impl Computer for Probe {
	fn id(&self) -> &str {
		self.id
	}

	fn session_started(&self, _session: &assist_primitives::SessionInfo) {
		self.started.fetch_add(1, Ordering::SeqCst);
	}

	fn session_ended(&self) {
		self.ended.fetch_add(1, Ordering::SeqCst);
	}

	fn compute_completion_proposals(
		&self,
		context: &InvocationContext,
		mode: ComputeMode,
		collector: &mut ProposalCollector,
		_cancel: &CancellationToken,
	) -> Result<Status, ComputerError> {
		self.calls.lock().unwrap().push(mode);
		for (label, relevance) in &self.proposals {
			collector.add(
				Proposal::new(*label, context.offset(), 0)
					.with_relevance(*relevance)
					.with_source(Arc::from(self.id)),
			);
		}
		self.finish()
	}

	fn compute_information_proposals(
		&self,
		context: &InvocationContext,
		collector: &mut ProposalCollector,
		_cancel: &CancellationToken,
	) -> Result<Status, ComputerError> {
		self.information_calls.fetch_add(1, Ordering::SeqCst);
		for label in &self.information {
			collector.add(Proposal::new(*label, context.offset(), 0).with_kind(ProposalKind::Information));
		}
		self.finish()
	}
}

/// Category over `probes` for the default partition.
pub(crate) fn category(id: &str, probes: &[&Arc<Probe>]) -> Category {
	let descriptors = probes
		.iter()
		.map(|probe| ComputerDescriptor::from_computer((*probe).clone() as Arc<dyn Computer>, [DEFAULT_PARTITION]))
		.collect();
	Category::new(id, &id.to_uppercase(), descriptors)
}

/// Viewer whose state tests flip directly.
pub(crate) struct FakeViewer {
	pub(crate) buffer: Arc<RopeBuffer>,
	selection: Mutex<Selection>,
	popup: AtomicBool,
	information: AtomicBool,
	focus: AtomicBool,
}

impl FakeViewer {
	pub(crate) fn new(text: &str) -> Arc<Self> {
		let len = text.chars().count();
		Arc::new(Self {
			buffer: Arc::new(RopeBuffer::new(text)),
			selection: Mutex::new(Selection::caret(len)),
			popup: AtomicBool::new(false),
			information: AtomicBool::new(false),
			focus: AtomicBool::new(true),
		})
	}

	pub(crate) fn set_selection(&self, selection: Selection) {
		*self.selection.lock().unwrap() = selection;
	}

	pub(crate) fn set_popup(&self, showing: bool) {
		self.popup.store(showing, Ordering::SeqCst);
	}

	pub(crate) fn set_information(&self, showing: bool) {
		self.information.store(showing, Ordering::SeqCst);
	}

	pub(crate) fn set_focus(&self, focus: bool) {
		self.focus.store(focus, Ordering::SeqCst);
	}
}

impl SelectionProvider for FakeViewer {
	fn selection(&self) -> Selection {
		*self.selection.lock().unwrap()
	}
}

impl TextViewer for FakeViewer {
	fn document(&self) -> Arc<dyn Buffer> {
		self.buffer.clone()
	}

	fn proposal_popup_showing(&self) -> bool {
		self.popup.load(Ordering::SeqCst)
	}

	fn context_information_showing(&self) -> bool {
		self.information.load(Ordering::SeqCst)
	}

	fn has_focus(&self) -> bool {
		self.focus.load(Ordering::SeqCst)
	}
}

pub(crate) fn labels(proposals: &[Proposal]) -> Vec<&str> {
	proposals.iter().map(|p| p.label.as_str()).collect()
}
