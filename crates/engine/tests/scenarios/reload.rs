use std::time::Duration;

use assist_engine::{CompletionEngine, EngineOptions, ReloadScheduler};
use pretty_assertions::assert_eq;

use crate::common::{Editor, Source, default_category, engine, engine_with, labels, separate_category};

fn cycled_once(options: EngineOptions) -> (CompletionEngine, std::sync::Arc<Editor>, std::sync::Arc<Source>) {
	let a = Source::new("a", &[("alpha", 1)]);
	let c = Source::new("c", &[("gamma", 1)]);
	let editor = Editor::new("text");
	let mut engine = engine_with(
		vec![default_category("A", &[&a]), separate_category("C", &[&c])],
		&editor,
		options,
	);
	engine.compute_completion_proposals(editor.caret());
	engine.compute_completion_proposals(editor.caret());
	assert_eq!(engine.iteration_position(), Some(1));
	editor.show_popup(true);
	(engine, editor, c)
}

#[test]
fn reload_keeps_cycling_position() {
	let (mut engine, editor, c) = cycled_once(EngineOptions::default());
	let before = engine.iteration_position();

	assert!(engine.request_reload());
	let offset = editor.caret();
	let mut shown = Vec::new();
	let ran = engine.run_deferred(|engine| {
		assert!(engine.is_reload_in_progress());
		let outcome = engine.compute_completion_proposals(offset);
		shown.extend(labels(&outcome.proposals).into_iter().map(String::from));
	});

	assert_eq!(ran, 1);
	assert_eq!(shown, vec!["gamma"]);
	assert_eq!(engine.iteration_position(), before);
	assert_eq!(c.invocations(), 2);
	assert!(!engine.is_reload_in_progress());

	let next = engine.compute_completion_proposals(offset);
	assert_eq!(labels(&next.proposals), vec!["alpha"]);
}

#[test]
fn reload_is_refused_after_the_caret_moved() {
	let (mut engine, editor, _c) = cycled_once(EngineOptions::default());
	editor.move_to(1);
	assert!(!engine.request_reload());
	assert!(!engine.reload_pending());
}

#[test]
fn reload_from_an_earlier_session_is_discarded() {
	let (mut engine, editor, c) = cycled_once(EngineOptions::default());
	let stale = engine.session_counter();

	let mut scheduler = ReloadScheduler::new();
	scheduler.post(stale);
	let reload = scheduler.try_recv().unwrap();

	engine.notify_session_ended();
	engine.compute_completion_proposals(editor.caret());
	assert_eq!(engine.session_counter(), stale + 1);

	let invocations = c.invocations();
	let ran = engine.run_reload(reload, |_| panic!("stale reload must not redisplay"));
	assert!(!ran);
	assert_eq!(c.invocations(), invocations);
	assert_eq!(engine.iteration_position(), Some(0));
}

#[tokio::test(start_paused = true)]
async fn delayed_reload_arrives_after_the_delay() {
	let options = EngineOptions {
		reload_delay_ms: 40,
		..EngineOptions::default()
	};
	let (mut engine, editor, c) = cycled_once(options);

	assert!(engine.request_reload());
	assert!(engine.request_reload());
	let started = tokio::time::Instant::now();
	let reload = engine.next_deferred().await.unwrap();
	assert!(started.elapsed() >= Duration::from_millis(40));
	assert!(!engine.reload_pending());

	let offset = editor.caret();
	assert!(engine.run_reload(reload, |engine| {
		engine.compute_completion_proposals(offset);
	}));
	assert_eq!(c.invocations(), 2);
	assert_eq!(engine.iteration_position(), Some(1));
}
