/// One line of interactive input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
	Search(String),
	More,
	/// 1-based result position as printed.
	Expand(usize),
	/// 1-based result position as printed.
	Summary(usize),
	/// Blocks until every request in flight has settled.
	Wait,
	Help,
	Quit,
}
impl Command {
	/// Parses one input line. Blank lines yield `None`.
	pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
		let line = line.trim();

		if line.is_empty() {
			return Ok(None);
		}

		let (word, rest) = match line.split_once(char::is_whitespace) {
			Some((word, rest)) => (word, rest.trim()),
			None => (line, ""),
		};
		let command = match word.to_ascii_lowercase().as_str() {
			"search" | "s" => Self::Search(rest.to_string()),
			"more" | "m" => Self::More,
			"expand" | "e" => Self::Expand(position(word, rest)?),
			"summary" => Self::Summary(position(word, rest)?),
			"wait" | "w" => Self::Wait,
			"help" | "h" | "?" => Self::Help,
			"quit" | "q" | "exit" => Self::Quit,
			_ => return Err(CommandError::Unknown { word: word.to_string() }),
		};

		Ok(Some(command))
	}
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
	#[error("Unknown command `{word}`. Type `help` for the list of commands.")]
	Unknown { word: String },
	#[error("`{command}` expects a result number starting at 1, got `{raw}`.")]
	InvalidPosition { command: String, raw: String },
}

pub const HELP: &str = "\
Commands:
  search <text>   Run a new search (alias: s)
  more            Load the next page of results (alias: m)
  expand <n>      Show or hide details for result n (alias: e)
  summary <n>     Fetch the summary for result n again after a failure
  wait            Wait for requests in flight (alias: w)
  help            Show this list
  quit            Exit (alias: q)";

fn position(command: &str, raw: &str) -> Result<usize, CommandError> {
	match raw.parse::<usize>() {
		Ok(n) if n > 0 => Ok(n),
		_ => Err(CommandError::InvalidPosition {
			command: command.to_string(),
			raw: raw.to_string(),
		}),
	}
}
