//! Fixtures shared by the scenario tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use assist_engine::{CompletionEngine, EngineOptions};
use assist_primitives::{
	Buffer, CancellationToken, ComputeMode, Computer, ComputerError, DEFAULT_PARTITION, InvocationContext, Proposal,
	ProposalCollector, RopeBuffer, Selection, SelectionProvider, Status, TextViewer,
};
use assist_registry::{Category, CategoryRegistry, ComputerDescriptor};

/// How a [`Source`] finishes a computation.
#[derive(Clone)]
pub enum Finish {
	Ok,
	Throw(&'static str),
	Error(&'static str),
}

/// Computer returning a fixed list of proposals.
pub struct Source {
	id: &'static str,
	proposals: Vec<(&'static str, i32)>,
	finish: Finish,
	modes: Mutex<Vec<ComputeMode>>,
	ended: AtomicUsize,
}

impl Source {
	pub fn new(id: &'static str, proposals: &[(&'static str, i32)]) -> Arc<Self> {
		Self::finishing(id, proposals, Finish::Ok)
	}

	pub fn finishing(id: &'static str, proposals: &[(&'static str, i32)], finish: Finish) -> Arc<Self> {
		Arc::new(Self {
			id,
			proposals: proposals.to_vec(),
			finish,
			modes: Mutex::new(Vec::new()),
			ended: AtomicUsize::new(0),
		})
	}

	pub fn modes(&self) -> Vec<ComputeMode> {
		self.modes.lock().unwrap().clone()
	}

	pub fn invocations(&self) -> usize {
		self.modes.lock().unwrap().len()
	}

	pub fn ended(&self) -> usize {
		self.ended.load(Ordering::SeqCst)
	}
}

impl Computer for Source {
	fn id(&self) -> &str {
		self.id
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
		self.modes.lock().unwrap().push(mode);
		if let Finish::Throw(message) = self.finish {
			return Err(ComputerError::Failed(message.to_string()));
		}
		for (label, relevance) in &self.proposals {
			collector.add(
				Proposal::new(*label, context.offset(), 0)
					.with_relevance(*relevance)
					.with_source(Arc::from(self.id)),
			);
		}
		Ok(match self.finish {
			Finish::Error(message) => Status::error(message),
			_ => Status::ok(),
		})
	}
}

/// Viewer over a rope buffer with a movable caret.
pub struct Editor {
	pub buffer: Arc<RopeBuffer>,
	selection: Mutex<Selection>,
	popup: AtomicBool,
}

impl Editor {
	pub fn new(text: &str) -> Arc<Self> {
		Arc::new(Self {
			buffer: Arc::new(RopeBuffer::new(text)),
			selection: Mutex::new(Selection::caret(text.chars().count())),
			popup: AtomicBool::new(false),
		})
	}

	pub fn caret(&self) -> usize {
		self.selection.lock().unwrap().offset
	}

	pub fn move_to(&self, offset: usize) {
		*self.selection.lock().unwrap() = Selection::caret(offset);
	}

	pub fn show_popup(&self, showing: bool) {
		self.popup.store(showing, Ordering::SeqCst);
	}
}

impl SelectionProvider for Editor {
	fn selection(&self) -> Selection {
		*self.selection.lock().unwrap()
	}
}

impl TextViewer for Editor {
	fn document(&self) -> Arc<dyn Buffer> {
		self.buffer.clone()
	}

	fn proposal_popup_showing(&self) -> bool {
		self.popup.load(Ordering::SeqCst)
	}
}

/// Default-included category over `sources`.
pub fn default_category(id: &str, sources: &[&Arc<Source>]) -> Category {
	let descriptors = sources
		.iter()
		.map(|source| ComputerDescriptor::from_computer((*source).clone() as Arc<dyn Computer>, [DEFAULT_PARTITION]))
		.collect();
	Category::new(id, id, descriptors)
}

/// Category shown only as its own cycling group.
pub fn separate_category(id: &str, sources: &[&Arc<Source>]) -> Category {
	default_category(id, sources)
		.with_included_in_default(false)
		.with_enabled_as_separate(true)
}

pub fn engine(categories: Vec<Category>, editor: &Arc<Editor>) -> CompletionEngine {
	engine_with(categories, editor, EngineOptions::default())
}

pub fn engine_with(categories: Vec<Category>, editor: &Arc<Editor>, options: EngineOptions) -> CompletionEngine {
	let registry = CategoryRegistry::new("text", categories).unwrap();
	CompletionEngine::new(Arc::new(registry), editor.clone(), options)
}

pub fn labels(proposals: &[Proposal]) -> Vec<&str> {
	proposals.iter().map(|p| p.label.as_str()).collect()
}
