//! Built-in proposal sources.
//!
//! None of them parse: words are scraped from the buffer, keywords and
//! templates come from the configuration file.

use std::sync::Arc;

use assist_primitives::{
	CancellationToken, ComputeMode, Computer, ComputerError, InvocationContext, Proposal, ProposalCollector, ProposalKind,
	Status,
};
use assist_registry::{ComputerFactory, FactoryTable};
use rustc_hash::FxHashMap;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::{Config, Template};


const WORD_RELEVANCE: i32 = 10;
const KEYWORD_RELEVANCE: i32 = 20;
const TEMPLATE_RELEVANCE: i32 = 30;
/// How far back the templates computer looks for an open call.
const CALL_SCAN: usize = 512;

/// Factory table exposing the built-in computers under their ids.
pub fn factories(config: &Config) -> FactoryTable {
	let keywords: Arc<[String]> = config.keywords.iter().cloned().collect();
	let templates: Arc<[Template]> = config.templates.iter().cloned().collect();

	let mut table = FactoryTable::new();
	table
		.register("words", factory(|| Ok(Arc::new(WordsComputer))))
		.register(
			"keywords",
			factory(move || Ok(Arc::new(KeywordsComputer::new(keywords.clone())))),
		)
		.register(
			"templates",
			factory(move || Ok(Arc::new(TemplatesComputer::new(templates.clone())))),
		);
	table
}

fn factory<F>(build: F) -> ComputerFactory
where
	F: Fn() -> Result<Arc<dyn Computer>, ComputerError> + Send + Sync + 'static,
{
	Arc::new(build)
}

/// Range replaced by a proposal completing `prefix` at the caret.
fn prefix_range(context: &InvocationContext, prefix: &str) -> (usize, usize) {
	let len = prefix.chars().count();
	(context.offset() - len, len)
}

/// Identifiers already present in the buffer.
///
/// More frequent words rank higher; the word under the caret is skipped.
pub struct WordsComputer;

impl Computer for WordsComputer {
	fn id(&self) -> &str {
		"words"
	}

	fn compute_completion_proposals(
		&self,
		context: &InvocationContext,
		_mode: ComputeMode,
		collector: &mut ProposalCollector,
		cancel: &CancellationToken,
	) -> Result<Status, ComputerError> {
		let prefix = context.identifier_prefix()?;
		let buffer = context.buffer();
		let text = buffer.get(0, buffer.len_chars())?;
		let (start, len) = prefix_range(context, &prefix);

		let mut counts: FxHashMap<&str, i32> = FxHashMap::default();
		let mut order = Vec::new();
		let mut position = 0;
		for word in text.split_word_bounds() {
			let word_start = position;
			position += word.chars().count();
			if word_start == start || !is_identifier(word) || !word.starts_with(prefix.as_str()) || word == prefix {
				continue;
			}
			let count = counts.entry(word).or_insert(0);
			if *count == 0 {
				order.push(word);
			}
			*count += 1;
		}
		if cancel.is_cancelled() {
			return Ok(Status::cancel());
		}

		for word in order {
			let relevance = WORD_RELEVANCE + counts.get(word).copied().unwrap_or(0).min(WORD_RELEVANCE - 1);
			collector.add(
				Proposal::new(word, start, len)
					.with_relevance(relevance)
					.with_kind(ProposalKind::Identifier)
					.with_source(Arc::from(self.id())),
			);
		}
		Ok(Status::ok())
	}
}

fn is_identifier(word: &str) -> bool {
	word.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_')
		&& word.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// Configured language keywords.
pub struct KeywordsComputer {
	keywords: Arc<[String]>,
}

impl KeywordsComputer {
	pub fn new(keywords: Arc<[String]>) -> Self {
		Self { keywords }
	}
}

impl Computer for KeywordsComputer {
	fn id(&self) -> &str {
		"keywords"
	}

	fn compute_completion_proposals(
		&self,
		context: &InvocationContext,
		_mode: ComputeMode,
		collector: &mut ProposalCollector,
		_cancel: &CancellationToken,
	) -> Result<Status, ComputerError> {
		let prefix = context.identifier_prefix()?;
		let (start, len) = prefix_range(context, &prefix);
		for keyword in self.keywords.iter().filter(|k| k.starts_with(prefix.as_str())) {
			collector.add(
				Proposal::new(keyword.as_str(), start, len)
					.with_relevance(KEYWORD_RELEVANCE)
					.with_kind(ProposalKind::Keyword)
					.with_source(Arc::from(self.id())),
			);
		}
		Ok(Status::ok())
	}
}

/// Configured snippets; also offers their parameter lists as context
/// information inside a call named after a template.
pub struct TemplatesComputer {
	templates: Arc<[Template]>,
}

impl TemplatesComputer {
	pub fn new(templates: Arc<[Template]>) -> Self {
		Self { templates }
	}
}

impl Computer for TemplatesComputer {
	fn id(&self) -> &str {
		"templates"
	}

	fn compute_completion_proposals(
		&self,
		context: &InvocationContext,
		_mode: ComputeMode,
		collector: &mut ProposalCollector,
		_cancel: &CancellationToken,
	) -> Result<Status, ComputerError> {
		let prefix = context.identifier_prefix()?;
		let (start, len) = prefix_range(context, &prefix);
		for template in self.templates.iter().filter(|t| t.name.starts_with(prefix.as_str())) {
			let mut proposal = Proposal::new(template.name.as_str(), start, len)
				.with_replacement(template.expand())
				.with_relevance(TEMPLATE_RELEVANCE)
				.with_kind(ProposalKind::Template)
				.with_source(Arc::from(self.id()));
			if let Some(description) = &template.description {
				proposal = proposal.with_detail(description.as_str());
			}
			collector.add(proposal);
		}
		Ok(Status::ok())
	}

	fn compute_information_proposals(
		&self,
		context: &InvocationContext,
		collector: &mut ProposalCollector,
		_cancel: &CancellationToken,
	) -> Result<Status, ComputerError> {
		let before = context.text_before(CALL_SCAN)?;
		let Some(callee) = open_call(&before) else {
			return Ok(Status::ok());
		};
		for template in self.templates.iter().filter(|t| t.name == callee) {
			let signature = format!("{}({})", template.name, template.parameters().join(", "));
			collector.add(
				Proposal::new(signature, context.offset(), 0)
					.with_kind(ProposalKind::Information)
					.with_identity(format!("information:{}", template.name))
					.with_source(Arc::from(self.id())),
			);
		}
		Ok(Status::ok())
	}
}

/// Name of the innermost call whose argument list is still open at the end
/// of `text`.
pub(crate) fn open_call(text: &str) -> Option<&str> {
	let mut depth = 0usize;
	for (index, c) in text.char_indices().rev() {
		match c {
			')' => depth += 1,
			'(' if depth > 0 => depth -= 1,
			'(' => {
				let head = text[..index].trim_end();
				let name = head.split_word_bounds().next_back()?;
				return is_identifier(name).then_some(name);
			}
			'\n' | ';' | '{' | '}' if depth == 0 => return None,
			_ => {}
		}
	}
	None
}
