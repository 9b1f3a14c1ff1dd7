#![cfg_attr(test, allow(unused_crate_dependencies))]
//! `assist` binary.
//!
//! Loads a file, places the caret, and runs content-assist sessions against
//! the built-in computers, printing each popup the engine would show.

mod cli;
mod computers;
mod config;
mod document;
mod run;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use config::Config;
use document::FileViewer;
use run::Request;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	setup_tracing(cli.verbose);

	let config = Config::load(cli.config.as_deref())?;
	let location = cli.file_location();
	let text = std::fs::read_to_string(&location.path)
		.with_context(|| format!("failed to read {}", location.path.display()))?;
	let caret = location.offset_in(&text);
	tracing::info!(path = %location.path.display(), caret, "assist.cli.open");

	let request = Request {
		category: cli.category,
		invocations: cli.invocations,
		information: cli.information,
		reload: cli.reload,
	};
	let viewer = Arc::new(FileViewer::new(&text, caret));
	let mut stdout = std::io::stdout().lock();
	run::run(config, viewer, &request, &mut stdout).await
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(verbose)
		.init();
}
