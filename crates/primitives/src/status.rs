use std::sync::Arc;

/// Severity of a [`Status`], ordered from least to most severe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
	/// Nothing to report.
	#[default]
	Ok,
	/// Informational message.
	Info,
	/// Something degraded but proposals are still meaningful.
	Warning,
	/// The computer failed to produce what it should have.
	Error,
	/// The computation was cancelled; the scan stops.
	Cancel,
}

impl Severity {
	pub(crate) const fn as_str(self) -> &'static str {
		match self {
			Self::Ok => "ok",
			Self::Info => "info",
			Self::Warning => "warning",
			Self::Error => "error",
			Self::Cancel => "cancel",
		}
	}
}

impl std::fmt::Display for Severity {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Outcome reported by a computer for one computation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
	/// How bad it is.
	pub severity: Severity,
	/// Human-readable message, empty for [`Severity::Ok`].
	pub message: String,
	/// Id of the computer that reported the status, filled in by the engine.
	pub source: Option<Arc<str>>,
}

impl Status {
	/// Creates a status with the given severity and message.
	pub fn new(severity: Severity, message: impl Into<String>) -> Self {
		Self {
			severity,
			message: message.into(),
			source: None,
		}
	}

	/// The OK status.
	pub fn ok() -> Self {
		Self::default()
	}

	/// An informational status.
	pub fn info(message: impl Into<String>) -> Self {
		Self::new(Severity::Info, message)
	}

	/// A warning status.
	pub fn warning(message: impl Into<String>) -> Self {
		Self::new(Severity::Warning, message)
	}

	/// An error status; its message is surfaced to the user.
	pub fn error(message: impl Into<String>) -> Self {
		Self::new(Severity::Error, message)
	}

	/// A cancellation status.
	pub fn cancel() -> Self {
		Self::new(Severity::Cancel, "")
	}

	/// Tags the status with the reporting computer.
	pub fn with_source(mut self, source: Arc<str>) -> Self {
		self.source = Some(source);
		self
	}

	/// Returns true for [`Severity::Ok`].
	pub fn is_ok(&self) -> bool {
		self.severity == Severity::Ok
	}

	/// Returns true for [`Severity::Cancel`].
	pub fn is_cancel(&self) -> bool {
		self.severity == Severity::Cancel
	}
}
