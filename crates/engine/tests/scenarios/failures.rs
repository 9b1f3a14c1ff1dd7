use pretty_assertions::assert_eq;

use crate::common::{Editor, Finish, Source, default_category, engine, labels};

#[test]
fn thrown_failure_is_swallowed() {
	let b = Source::finishing("b", &[("lost", 9)], Finish::Throw("index corrupted"));
	let c = Source::new("c", &[("one", 2), ("two", 1)]);
	let editor = Editor::new("x");
	let mut engine = engine(vec![default_category("BC", &[&b, &c])], &editor);

	let outcome = engine.compute_completion_proposals(editor.caret());
	assert_eq!(labels(&outcome.proposals), vec!["one", "two"]);
	assert_eq!(outcome.error_message, None);
	assert_eq!(engine.error_message(), None);
	assert_eq!(b.invocations(), 1);
}

#[test]
fn returned_error_status_is_surfaced() {
	let b = Source::finishing("b", &[], Finish::Error("index corrupted"));
	let c = Source::new("c", &[("one", 2), ("two", 1)]);
	let editor = Editor::new("x");
	let mut engine = engine(vec![default_category("BC", &[&b, &c])], &editor);

	let outcome = engine.compute_completion_proposals(editor.caret());
	assert_eq!(labels(&outcome.proposals), vec!["one", "two"]);
	assert_eq!(outcome.error_message.as_deref(), Some("index corrupted"));
	assert_eq!(engine.error_message(), Some("index corrupted"));
}

#[test]
fn error_message_is_cleared_by_the_next_clean_computation() {
	let b = Source::finishing("b", &[], Finish::Error("offline"));
	let c = Source::new("c", &[("one", 1)]);
	let editor = Editor::new("x");
	let mut engine = engine(
		vec![
			default_category("B", &[&b]),
			crate::common::separate_category("C", &[&c]),
		],
		&editor,
	);

	engine.compute_completion_proposals(editor.caret());
	assert_eq!(engine.error_message(), Some("offline"));
	engine.compute_completion_proposals(editor.caret());
	assert_eq!(engine.error_message(), None);
}

#[test]
fn buffer_edit_between_invocations_rebuilds_context() {
	let a = Source::new("a", &[("word", 1)]);
	let editor = Editor::new("wo");
	let mut engine = engine(vec![default_category("A", &[&a])], &editor);

	let before = engine.compute_completion_proposals(2);
	assert_eq!(before.proposals[0].replace_start, 2);

	editor.buffer.insert(2, "r").unwrap();
	editor.move_to(3);
	let after = engine.compute_completion_proposals(3);
	assert_eq!(after.proposals[0].replace_start, 3);
}
