//! Visiting categories and their computers for one computation.
//!
//! Cancellation is checked before every category and every computer. A
//! computer reporting a cancel status stops the scan as well. Failures and
//! panics of a single computer are logged and skipped; the scan carries on
//! with the next computer.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Instant;

use assist_primitives::{
	CancellationToken, ComputeMode, Computer, ComputerError, InvocationContext, ProposalCollector, Status,
};
use assist_registry::Category;

use crate::session::SessionComputers;


/// Why a scan stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScanEnd {
	/// Every computer was asked.
	Completed,
	/// The host or a computer cancelled.
	Cancelled,
	/// More proposals accumulated than the caller allowed.
	Ambiguous,
}

/// Worst status reported during one computation.
///
/// On equal severity the first reported status is kept.
#[derive(Debug, Default)]
pub(crate) struct StatusTracker {
	worst: Option<Status>,
}

impl StatusTracker {
	pub(crate) fn record(&mut self, status: Status) {
		if status.is_ok() || status.is_cancel() {
			return;
		}
		if self.worst.as_ref().is_some_and(|w| w.severity >= status.severity) {
			return;
		}
		self.worst = Some(status);
	}

	#[cfg(test)]
	pub(crate) fn worst(&self) -> Option<&Status> {
		self.worst.as_ref()
	}

	/// Message of the worst status, if it is an error.
	pub(crate) fn error_message(&self) -> Option<String> {
		self.worst
			.as_ref()
			.filter(|s| s.severity == assist_primitives::Severity::Error)
			.map(|s| s.message.clone())
	}
}

pub(crate) struct Scan<'a> {
	pub(crate) context: &'a InvocationContext,
	pub(crate) cancel: &'a CancellationToken,
	pub(crate) session: Option<&'a mut SessionComputers>,
	pub(crate) status: &'a mut StatusTracker,
}

impl Scan<'_> {
	/// Asks every computer of `categories` for completion proposals.
	pub(crate) fn completions(
		&mut self,
		categories: &[Category],
		mode: ComputeMode,
		collector: &mut ProposalCollector,
	) -> ScanEnd {
		self.visit(categories, collector, None, |computer, context, collector, cancel| {
			computer.compute_completion_proposals(context, mode, collector, cancel)
		})
	}

	/// Asks every computer of `categories` for context information.
	///
	/// With `stop_when_ambiguous` the scan ends as soon as the collector
	/// holds more than one proposal.
	pub(crate) fn information(
		&mut self,
		categories: &[Category],
		collector: &mut ProposalCollector,
		stop_when_ambiguous: bool,
	) -> ScanEnd {
		let limit = stop_when_ambiguous.then_some(1);
		self.visit(categories, collector, limit, |computer, context, collector, cancel| {
			computer.compute_information_proposals(context, collector, cancel)
		})
	}

	fn visit<F>(
		&mut self,
		categories: &[Category],
		collector: &mut ProposalCollector,
		limit: Option<usize>,
		call: F,
	) -> ScanEnd
	where
		F: Fn(&dyn Computer, &InvocationContext, &mut ProposalCollector, &CancellationToken) -> Result<Status, ComputerError>,
	{
		let context = self.context;
		let cancel = self.cancel;
		let partition = context.partition();
		for category in categories {
			if cancel.is_cancelled() {
				return ScanEnd::Cancelled;
			}
			let computers = category.resolve_computers(partition);
			for computer in computers.iter() {
				if cancel.is_cancelled() {
					return ScanEnd::Cancelled;
				}
				if let Some(session) = self.session.as_deref_mut() {
					session.ensure_started(computer);
				}

				let started = Instant::now();
				let result = catch_unwind(AssertUnwindSafe(|| call(&**computer, context, collector, cancel)));
				tracing::trace!(
					category = %category.id(),
					computer = computer.id(),
					elapsed = ?started.elapsed(),
					collected = collector.len(),
					"assist.computer.compute"
				);

				match result {
					Ok(Ok(status)) if status.is_cancel() => {
						tracing::debug!(computer = computer.id(), "assist.scan.cancelled");
						return ScanEnd::Cancelled;
					}
					Ok(Ok(status)) => self.status.record(status.with_source(Arc::from(computer.id()))),
					Ok(Err(error)) => {
						tracing::warn!(category = %category.id(), computer = computer.id(), %error, "assist.computer.failed");
					}
					Err(panic) => {
						let message = panic
							.downcast_ref::<&str>()
							.copied()
							.or_else(|| panic.downcast_ref::<String>().map(String::as_str))
							.unwrap_or("non-string panic payload");
						tracing::error!(
							category = %category.id(),
							computer = computer.id(),
							message,
							"assist.computer.panicked"
						);
					}
				}

				if limit.is_some_and(|limit| collector.len() > limit) {
					return ScanEnd::Ambiguous;
				}
			}
		}
		ScanEnd::Completed
	}
}
