//! Drives one completion session and prints what the popup would show.

use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use assist_engine::{CompletionEngine, CompletionOutcome};
use assist_primitives::ProposalKind;

use crate::computers;
use crate::config::Config;
use crate::document::{AfterCallOpen, FileViewer};


/// Content type of every registry the CLI builds.
const CONTENT_TYPE: &str = "text";

const INFORMATION_TITLE: &str = "Context Information";

/// What to do once the file is loaded.
#[derive(Debug, Clone, Default)]
pub struct Request {
	pub category: Option<String>,
	pub invocations: usize,
	pub information: bool,
	pub reload: bool,
}

pub async fn run(config: Config, viewer: Arc<FileViewer>, request: &Request, out: &mut dyn Write) -> anyhow::Result<()> {
	let registry = config
		.manifest
		.build(CONTENT_TYPE, &computers::factories(&config))
		.context("invalid category manifest")?;
	let mut engine = CompletionEngine::new(Arc::new(registry), viewer.clone(), config.engine).with_heuristic(AfterCallOpen);
	let offset = viewer.caret();

	if request.information {
		let outcome = engine.compute_context_information(offset);
		print_outcome(out, INFORMATION_TITLE, &outcome, &engine)?;
		return Ok(());
	}

	if let Some(id) = &request.category {
		engine.invoke_category(id);
	}
	engine.notify_session_started(false);
	for _ in 0..request.invocations.max(1) {
		let outcome = engine.compute_completion_proposals(offset);
		viewer.set_popup(true);
		let title = if is_information(&outcome) {
			INFORMATION_TITLE
		} else {
			engine.current_group_name().unwrap_or_default()
		}
		.to_string();
		print_outcome(out, &title, &outcome, &engine)?;
	}

	if request.reload {
		reload(&mut engine, offset, out).await?;
	}

	engine.notify_session_ended();
	viewer.set_popup(false);
	Ok(())
}

async fn reload(engine: &mut CompletionEngine, offset: usize, out: &mut dyn Write) -> anyhow::Result<()> {
	if !engine.request_reload() {
		writeln!(out, "reload refused")?;
		return Ok(());
	}
	let Some(deferred) = engine.next_deferred().await else {
		return Ok(());
	};

	let mut shown = None;
	engine.run_reload(deferred, |engine| {
		shown = Some(engine.compute_completion_proposals(offset));
	});
	match shown {
		Some(outcome) => {
			let title = format!("{} (reloaded)", engine.current_group_name().unwrap_or_default());
			print_outcome(out, &title, &outcome, engine)
		}
		None => {
			writeln!(out, "reload discarded")?;
			Ok(())
		}
	}
}

/// Returns true if the context-information shortcut produced `outcome`.
fn is_information(outcome: &CompletionOutcome) -> bool {
	!outcome.proposals.is_empty() && outcome.proposals.iter().all(|p| p.kind == ProposalKind::Information)
}

fn print_outcome(
	out: &mut dyn Write,
	title: &str,
	outcome: &CompletionOutcome,
	engine: &CompletionEngine,
) -> anyhow::Result<()> {
	let presentation = engine.presentation();
	writeln!(out, "[{title}]")?;
	if outcome.proposals.is_empty() {
		let empty = presentation.empty_message.as_deref().unwrap_or("No proposals");
		writeln!(out, "  {empty}")?;
	}
	for proposal in &outcome.proposals {
		write!(out, "  {:<20} {:<11}", proposal.label, format!("{:?}", proposal.kind))?;
		if let Some(detail) = &proposal.detail {
			write!(out, " {detail}")?;
		}
		writeln!(out)?;
	}
	if let Some(error) = &outcome.error_message {
		writeln!(out, "  error: {error}")?;
	}
	if presentation.status_line_visible
		&& let Some(status) = &presentation.status_message
	{
		writeln!(out, "  ({status})")?;
	}
	Ok(())
}
