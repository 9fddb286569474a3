//! Lines typed at the scan station
//!
//! Anything not starting with `:` is a scan. Commands edit the optional
//! fields or control the session.

use atems_core::{Condition, Error, Result};

/// Prefix that marks a line as a command
pub const COMMAND_PREFIX: char = ':';

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StationCommand {
    /// Scanned or typed value
    Scan(String),
    /// Submit the form now
    Submit,
    /// Clear every field
    Clear,
    /// Set the username by hand
    User(String),
    /// Set or clear the job ID
    Job(String),
    /// Set or clear the condition
    Condition(Option<Condition>),
    /// Show the current fields
    Show,
    /// Show the command list
    Help,
    /// Leave the scan loop
    Quit,
}

/// Command list shown by `:help`
pub const HELP: &str = "\
Scan a tool, then a badge. Commands:
  :submit              submit the form now
  :clear               clear every field
  :user <name>         set the username
  :job [id]            set or clear the job ID
  :condition [value]   Good, Fair, Damaged, or blank to clear
  :show                show the current fields
  :quit                leave";

impl StationCommand {
    /// Parse one input line
    ///
    /// # Errors
    ///
    /// Returns a validation error for unknown commands, a missing username,
    /// or an unknown condition.
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let Some(body) = line.strip_prefix(COMMAND_PREFIX) else {
            return Ok(Self::Scan(line.to_string()));
        };

        let (name, argument) = body
            .split_once(char::is_whitespace)
            .map_or((body, ""), |(name, rest)| (name, rest.trim()));

        match name.to_ascii_lowercase().as_str() {
            "submit" | "s" => Ok(Self::Submit),
            "clear" | "c" => Ok(Self::Clear),
            "user" | "u" if argument.is_empty() => {
                Err(Error::validation("username", "Username must not be empty"))
            }
            "user" | "u" => Ok(Self::User(argument.to_string())),
            "job" | "j" => Ok(Self::Job(argument.to_string())),
            "condition" => Condition::parse_optional(argument).map(Self::Condition),
            "show" => Ok(Self::Show),
            "help" | "h" | "?" => Ok(Self::Help),
            "quit" | "q" | "exit" => Ok(Self::Quit),
            other => Err(Error::validation(
                "command",
                format!("Unknown command :{other}, type :help"),
            )),
        }
    }
}
