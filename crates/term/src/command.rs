//! Line commands read from stdin.

use std::str::FromStr;

use scribe_primitives::{Field, UnknownField};
use thiserror::Error;

pub const HELP: &str = "\
commands:
  set <title|subhead|description> <text>   edit a field
  click <element-id>                       click an element on the page
  back | forward                           traverse history
  show                                     redraw the page
  status                                   print the save status
  help                                     this text
  quit                                     save and exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
	Set { field: Field, value: String },
	Click(String),
	Back,
	Forward,
	Show,
	Status,
	Help,
	Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
	#[error("empty command")]
	Empty,
	#[error("unknown command `{0}`, try `help`")]
	Unknown(String),
	#[error("usage: {0}")]
	Usage(&'static str),
	#[error(transparent)]
	Field(#[from] UnknownField),
}

impl FromStr for Command {
	type Err = CommandError;

	fn from_str(line: &str) -> Result<Self, Self::Err> {
		let line = line.trim_start();
		let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

		match verb {
			"" => Err(CommandError::Empty),
			"set" => {
				let rest = rest.trim_start();
				let (name, value) = rest.split_once(' ').unwrap_or((rest, ""));
				if name.is_empty() {
					return Err(CommandError::Usage("set <field> <text>"));
				}
				Ok(Command::Set {
					field: name.parse()?,
					value: value.to_string(),
				})
			}
			"click" => match rest.trim() {
				"" => Err(CommandError::Usage("click <element-id>")),
				id => Ok(Command::Click(id.trim_start_matches('#').to_string())),
			},
			"back" => Ok(Command::Back),
			"forward" => Ok(Command::Forward),
			"show" => Ok(Command::Show),
			"status" => Ok(Command::Status),
			"help" | "?" => Ok(Command::Help),
			"quit" | "exit" => Ok(Command::Quit),
			other => Err(CommandError::Unknown(other.to_string())),
		}
	}
}
