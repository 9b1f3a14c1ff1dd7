use std::path::PathBuf;

use clap::Parser;


/// A file path with an optional caret position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLocation {
	pub path: PathBuf,
	/// Line number (0-indexed). None means end of file.
	pub line: Option<usize>,
	/// Column in characters (0-indexed). None means end of line.
	pub column: Option<usize>,
}

impl FileLocation {
	/// Parses `path`, `path:line` or `path:line:col`.
	///
	/// Line and column in input are 1-indexed, converted to 0-indexed.
	pub fn parse(s: &str) -> Self {
		Self::parse_colon_format(s).unwrap_or_else(|| Self {
			path: PathBuf::from(s),
			line: None,
			column: None,
		})
	}

	/// Skips a leading drive letter when searching for colons.
	fn parse_colon_format(s: &str) -> Option<Self> {
		let search_start = if s.len() > 2 && s.as_bytes().get(1) == Some(&b':') { 2 } else { 0 };

		let suffix = &s[search_start..];
		let last_colon = search_start + suffix.rfind(':')?;
		let after_last = &s[last_colon + 1..];
		let last = after_last.parse::<usize>().ok()?;

		if let Some(second) = s[search_start..last_colon].rfind(':') {
			let second = search_start + second;
			if let Ok(line) = s[second + 1..last_colon].parse::<usize>()
				&& line > 0
			{
				return Some(Self {
					path: PathBuf::from(&s[..second]),
					line: Some(line - 1),
					column: Some(last.saturating_sub(1)),
				});
			}
		}

		(last > 0).then(|| Self {
			path: PathBuf::from(&s[..last_colon]),
			line: Some(last - 1),
			column: None,
		})
	}

	/// Resolves the location to a character offset in `text`, clamping
	/// past-the-end lines and columns.
	pub fn offset_in(&self, text: &str) -> usize {
		let Some(line) = self.line else {
			return text.chars().count();
		};

		let mut offset = 0;
		let mut lines = text.split_inclusive('\n');
		for _ in 0..line {
			match lines.next() {
				Some(skipped) => offset += skipped.chars().count(),
				None => return offset,
			}
		}
		let current = lines.next().unwrap_or_default();
		let width = current.trim_end_matches(['\n', '\r']).chars().count();
		offset + self.column.map_or(width, |column| column.min(width))
	}
}

#[derive(Parser, Debug)]
#[command(name = "assist")]
#[command(about = "Runs content-assist sessions against a file")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// File to complete in. Supports path:line and path:line:col formats;
	/// without a position the caret is placed at the end of the file.
	pub file: String,

	/// Configuration file with engine options, categories, keywords and
	/// templates (built-in configuration if omitted)
	#[arg(short, long, value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Restrict the session to one category
	#[arg(long, value_name = "ID")]
	pub category: Option<String>,

	/// Number of completion invocations; each one past the first cycles to
	/// the next category group
	#[arg(short = 'n', long, default_value_t = 1)]
	pub invocations: usize,

	/// Compute context information instead of completions
	#[arg(short, long)]
	pub information: bool,

	/// Request a reload of the last popup and print the reloaded proposals
	#[arg(long)]
	pub reload: bool,

	/// Verbose logging
	#[arg(short, long)]
	pub verbose: bool,
}

impl Cli {
	pub fn file_location(&self) -> FileLocation {
		FileLocation::parse(&self.file)
	}
}
