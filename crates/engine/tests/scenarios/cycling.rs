use assist_primitives::ComputeMode;
use pretty_assertions::assert_eq;

use crate::common::{Editor, Source, default_category, engine, labels, separate_category};

#[test]
fn four_invocations_cycle_default_then_separates_then_wrap() {
	let a = Source::new("a", &[("alpha", 10)]);
	let b = Source::new("b", &[("beta", 5)]);
	let c = Source::new("c", &[("gamma", 1)]);
	let d = Source::new("d", &[("delta", 1)]);
	let editor = Editor::new("text");
	let mut engine = engine(
		vec![
			default_category("A", &[&a]),
			default_category("B", &[&b]),
			separate_category("C", &[&c]),
			separate_category("D", &[&d]),
		],
		&editor,
	);
	let offset = editor.caret();

	engine.notify_session_started(false);
	let first = engine.compute_completion_proposals(offset);
	assert_eq!(labels(&first.proposals), vec!["alpha", "beta"]);
	assert_eq!(a.modes(), vec![ComputeMode::Combined]);
	assert_eq!(b.modes(), vec![ComputeMode::Combined]);
	assert_eq!(engine.presentation().status_message.as_deref(), Some("Press Ctrl+Space to show C"));

	let second = engine.compute_completion_proposals(offset);
	assert_eq!(labels(&second.proposals), vec!["gamma"]);
	assert_eq!(c.modes(), vec![ComputeMode::Specific]);
	assert_eq!(engine.current_group_name(), Some("C"));
	assert_eq!(engine.presentation().status_message.as_deref(), Some("Press Ctrl+Space to show D"));

	let third = engine.compute_completion_proposals(offset);
	assert_eq!(labels(&third.proposals), vec!["delta"]);
	assert_eq!(engine.presentation().status_message.as_deref(), Some("Press Ctrl+Space to show Default"));

	let fourth = engine.compute_completion_proposals(offset);
	assert_eq!(labels(&fourth.proposals), vec!["alpha", "beta"]);
	assert_eq!(engine.iteration_position(), Some(0));
	assert_eq!(a.invocations(), 2);
	assert_eq!(c.invocations(), 1);
	assert_eq!(d.invocations(), 1);

	engine.notify_session_ended();
	for source in [&a, &b, &c, &d] {
		assert_eq!(source.ended(), 1);
	}
}

#[test]
fn specific_session_never_invokes_other_categories() {
	let a = Source::new("a", &[("alpha", 1)]);
	let c = Source::new("c", &[("gamma", 1)]);
	let x = Source::new("x", &[("xray", 1)]);
	let editor = Editor::new("text");
	let mut engine = engine(
		vec![
			default_category("A", &[&a]),
			separate_category("C", &[&c]),
			default_category("X", &[&x])
				.with_included_in_default(false)
				.with_enabled_as_separate(false),
		],
		&editor,
	);

	engine.invoke_category("X");
	engine.notify_session_started(false);
	assert!(engine.is_specific_session());
	assert_eq!(engine.specific_category_id(), Some("X"));

	for _ in 0..5 {
		let outcome = engine.compute_completion_proposals(editor.caret());
		assert_eq!(labels(&outcome.proposals), vec!["xray"]);
	}
	assert_eq!(x.modes(), vec![ComputeMode::Specific; 5]);
	assert_eq!(a.invocations(), 0);
	assert_eq!(c.invocations(), 0);

	engine.notify_session_ended();
	engine.compute_completion_proposals(editor.caret());
	assert!(!engine.is_specific_session());
	assert_eq!(a.invocations(), 1);
}

#[test]
fn restart_by_same_driver_redisplays_current_group() {
	let a = Source::new("a", &[("alpha", 1)]);
	let c = Source::new("c", &[("gamma", 1)]);
	let editor = Editor::new("text");
	let mut engine = engine(vec![default_category("A", &[&a]), separate_category("C", &[&c])], &editor);
	let offset = editor.caret();

	engine.compute_completion_proposals(offset);
	engine.compute_completion_proposals(offset);
	assert_eq!(engine.current_group_name(), Some("C"));

	engine.notify_session_restarted("completion");
	let again = engine.compute_completion_proposals(offset);
	assert_eq!(labels(&again.proposals), vec!["gamma"]);
	assert_eq!(engine.current_group_name(), Some("C"));
}

#[test]
fn empty_group_reports_its_name() {
	let a = Source::new("a", &[]);
	let editor = Editor::new("text");
	let mut engine = engine(vec![default_category("A", &[&a])], &editor);

	let outcome = engine.compute_completion_proposals(editor.caret());
	assert!(outcome.proposals.is_empty());
	assert_eq!(outcome.error_message, None);
	assert_eq!(engine.presentation().empty_message.as_deref(), Some("No Default proposals"));
	assert_eq!(engine.presentation().status_message, None);
}
