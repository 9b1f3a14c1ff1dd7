//! Deferred, single-shot reload queue.
//!
//! # Role
//!
//! A reload is never computed inline: the engine posts it here and the host
//! runs it on a later turn of its event loop, after the popup has settled.
//! Posting cancels the previously posted reload, which is what debounces
//! rapid selection changes.
//!
//! # Invariants
//!
//! - At most one posted reload is live; every earlier one has its token
//!   cancelled.
//! - A reload carries the session counter it was posted under. The engine
//!   discards it if the counter moved on by the time it runs.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;


/// A queued reload request.
#[derive(Debug, Clone)]
pub struct DeferredReload {
	ticket: u64,
	generation: u64,
	cancel: CancellationToken,
}

impl DeferredReload {
	/// Session counter the reload was posted under.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	/// Returns true if a later post or an explicit cancel superseded it.
	pub fn is_cancelled(&self) -> bool {
		self.cancel.is_cancelled()
	}
}

/// Single-shot, cancellable queue of deferred reloads.
#[derive(Debug)]
pub struct ReloadScheduler {
	tx: mpsc::UnboundedSender<DeferredReload>,
	rx: mpsc::UnboundedReceiver<DeferredReload>,
	next_ticket: u64,
	in_flight: Option<InFlightReload>,
}

#[derive(Debug)]
struct InFlightReload {
	ticket: u64,
	cancel: CancellationToken,
}

impl Default for ReloadScheduler {
	fn default() -> Self {
		Self::new()
	}
}

impl ReloadScheduler {
	pub fn new() -> Self {
		let (tx, rx) = mpsc::unbounded_channel();
		Self {
			tx,
			rx,
			next_ticket: 0,
			in_flight: None,
		}
	}

	/// Queues a reload for `generation`, cancelling the previous one.
	pub fn post(&mut self, generation: u64) {
		let reload = self.arm(generation);
		tracing::trace!(generation, "assist.reload.post");
		let _ = self.tx.send(reload);
	}

	/// Queues a reload for `generation` once `delay` has elapsed, cancelling
	/// the previous one.
	///
	/// The wait runs on the ambient tokio runtime. Without one the reload is
	/// queued immediately.
	pub fn post_after(&mut self, generation: u64, delay: Duration) {
		if delay.is_zero() {
			self.post(generation);
			return;
		}
		let Ok(handle) = tokio::runtime::Handle::try_current() else {
			tracing::debug!(generation, "assist.reload.no_runtime");
			self.post(generation);
			return;
		};

		let reload = self.arm(generation);
		let tx = self.tx.clone();
		let cancel = reload.cancel.clone();
		tracing::trace!(generation, delay_ms = delay.as_millis() as u64, "assist.reload.post");
		handle.spawn(async move {
			tokio::select! {
				_ = cancel.cancelled() => {}
				_ = sleep(delay) => {
					let _ = tx.send(reload);
				}
			}
		});
	}

	/// Cancels the posted reload, if any.
	pub fn cancel(&mut self) {
		if let Some(in_flight) = self.in_flight.take() {
			in_flight.cancel.cancel();
		}
	}

	/// Returns true while a posted reload has not been cancelled.
	pub fn is_pending(&self) -> bool {
		self.in_flight.as_ref().is_some_and(|f| !f.cancel.is_cancelled())
	}

	/// Takes the next queued reload without waiting.
	pub fn try_recv(&mut self) -> Option<DeferredReload> {
		let reload = self.rx.try_recv().ok()?;
		self.settle(&reload);
		Some(reload)
	}

	/// Waits for the next queued reload.
	pub async fn recv(&mut self) -> Option<DeferredReload> {
		let reload = self.rx.recv().await?;
		self.settle(&reload);
		Some(reload)
	}

	fn settle(&mut self, reload: &DeferredReload) {
		if self.in_flight.as_ref().is_some_and(|f| f.ticket == reload.ticket) {
			self.in_flight = None;
		}
	}

	fn arm(&mut self, generation: u64) -> DeferredReload {
		self.cancel();
		self.next_ticket = self.next_ticket.wrapping_add(1);
		let ticket = self.next_ticket;
		let cancel = CancellationToken::new();
		self.in_flight = Some(InFlightReload {
			ticket,
			cancel: cancel.clone(),
		});
		DeferredReload {
			ticket,
			generation,
			cancel,
		}
	}
}
