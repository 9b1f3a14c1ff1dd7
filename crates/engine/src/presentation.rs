use crate::sequence::CategorySequence;

/// Popup hints the host reads after every engine call.
///
/// The engine never renders; these flags tell the popup framework how to
/// behave for the proposals just returned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Presentation {
	/// Treat the next invocation as a cycling gesture, not a new session.
	pub repeated_invocation: bool,
	/// Keep the popup open when no proposals were found.
	pub show_empty_list: bool,
	/// Insert a lone proposal without showing the popup.
	pub auto_insert: bool,
	pub status_line_visible: bool,
	pub status_message: Option<String>,
	/// Shown in place of an empty list.
	pub empty_message: Option<String>,
}

impl Presentation {
	pub(crate) fn session_started(sequence: &CategorySequence, auto_insert: bool) -> Self {
		let cycling = sequence.is_cycling();
		Self {
			repeated_invocation: cycling,
			show_empty_list: cycling,
			auto_insert,
			status_line_visible: cycling,
			status_message: None,
			empty_message: None,
		}
	}

	/// Describes the group at `position` being shown.
	pub(crate) fn show_group(&mut self, sequence: &CategorySequence, position: usize, binding: &str, auto_insert: bool) {
		let cycling = sequence.is_cycling();
		self.repeated_invocation = cycling;
		self.show_empty_list = cycling;
		self.status_line_visible = cycling;
		self.auto_insert = auto_insert;
		self.status_message = cycling.then(|| cycle_message(binding, sequence.next_name(position)));
		self.empty_message = Some(empty_message(sequence.name(position)));
	}

	/// Describes the context-information shortcut being shown.
	pub(crate) fn show_information(&mut self, binding: &str) {
		self.repeated_invocation = true;
		self.show_empty_list = true;
		self.auto_insert = true;
		self.status_line_visible = true;
		self.status_message = Some(cycle_message(binding, "proposals"));
	}
}

fn cycle_message(binding: &str, next: &str) -> String {
	format!("Press {binding} to show {next}")
}

fn empty_message(group: &str) -> String {
	format!("No {group} proposals")
}
