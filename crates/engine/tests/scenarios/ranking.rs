use std::collections::BTreeSet;

use assist_primitives::{Proposal, sort_proposals};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::common::{Editor, Source, default_category, engine, labels};

#[test]
fn equal_proposals_keep_the_higher_relevance() {
	let a = Source::new("a", &[("foo", 10), ("foo", 5)]);
	let editor = Editor::new("f");
	let mut engine = engine(vec![default_category("A", &[&a])], &editor);

	let outcome = engine.compute_completion_proposals(editor.caret());
	assert_eq!(outcome.proposals.len(), 1);
	assert_eq!(outcome.proposals[0].label, "foo");
	assert_eq!(outcome.proposals[0].relevance, 10);
}

#[test]
fn equal_proposals_from_two_computers_merge() {
	let a = Source::new("a", &[("foo", 3), ("bar", 1)]);
	let b = Source::new("b", &[("foo", 7)]);
	let editor = Editor::new("f");
	let mut engine = engine(vec![default_category("A", &[&a]), default_category("B", &[&b])], &editor);

	let outcome = engine.compute_completion_proposals(editor.caret());
	assert_eq!(labels(&outcome.proposals), vec!["foo", "bar"]);
	assert_eq!(outcome.proposals[0].relevance, 7);
	assert_eq!(outcome.proposals[0].source.as_deref(), Some("b"));
}

#[test]
fn recomputing_yields_the_same_set() {
	let a = Source::new("a", &[("one", 1), ("two", 2), ("one", 4)]);
	let b = Source::new("b", &[("two", 2), ("three", 2)]);
	let editor = Editor::new("t");
	let mut engine = engine(vec![default_category("A", &[&a]), default_category("B", &[&b])], &editor);
	let offset = editor.caret();

	let first = engine.compute_completion_proposals(offset);
	let second = engine.compute_completion_proposals(offset);
	let set = |proposals: &[Proposal]| {
		proposals
			.iter()
			.map(|p| (p.label.clone(), p.relevance))
			.collect::<BTreeSet<_>>()
	};
	assert_eq!(set(&first.proposals), set(&second.proposals));
	assert_eq!(first.proposals.len(), 3);
	assert_eq!(first, second);
}

#[test]
fn relevance_ties_break_on_caseless_key() {
	let a = Source::new("a", &[("beta", 1), ("Alpha", 1), ("alpha", 1), ("Gamma", 2)]);
	let editor = Editor::new("x");
	let mut engine = engine(vec![default_category("A", &[&a])], &editor);

	let outcome = engine.compute_completion_proposals(editor.caret());
	assert_eq!(labels(&outcome.proposals), vec!["Gamma", "Alpha", "alpha", "beta"]);
}

fn proposal() -> impl Strategy<Value = Proposal> {
	("[a-cA-C]{1,3}", -3i32..3).prop_map(|(label, relevance)| Proposal::new(label, 0, 0).with_relevance(relevance))
}

proptest! {
	#[test]
	fn sorting_is_idempotent(mut proposals in prop::collection::vec(proposal(), 0..24)) {
		sort_proposals(&mut proposals);
		let once = proposals.clone();
		sort_proposals(&mut proposals);
		prop_assert_eq!(once, proposals);
	}

	#[test]
	fn sorting_ignores_input_order(proposals in prop::collection::vec(proposal(), 0..24)) {
		let mut forward = proposals.clone();
		let mut backward: Vec<_> = proposals.into_iter().rev().collect();
		sort_proposals(&mut forward);
		sort_proposals(&mut backward);
		let key = |p: &Proposal| (p.relevance, p.sorting_key.clone());
		prop_assert_eq!(forward.iter().map(key).collect::<Vec<_>>(), backward.iter().map(key).collect::<Vec<_>>());
	}
}
