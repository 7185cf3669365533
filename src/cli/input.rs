use std::str::FromStr;

use crate::dashboard::{AppPath, Control};

pub const USAGE: &str =
    "commands: show <category:name> | list | reset | interval <secs> | select <n> | help | quit";

/// One line typed on stdin while the dashboard runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    Show(AppPath),
    List,
    Control(Control),
    Help,
    Quit,
}

impl FromStr for InputCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err(USAGE.to_string());
        };
        let argument = words.next();
        if words.next().is_some() {
            return Err(format!("too many arguments to '{}'", verb));
        }

        match (verb, argument) {
            ("show" | "s", Some(path)) => path
                .parse()
                .map(InputCommand::Show)
                .map_err(|e| e.to_string()),
            ("list" | "ls", None) => Ok(InputCommand::List),
            ("reset" | "r", None) => Ok(InputCommand::Control(Control::Reset)),
            ("interval" | "i", Some(seconds)) => seconds
                .parse::<u64>()
                .map(|s| InputCommand::Control(Control::SetInterval(s)))
                .map_err(|_| format!("interval expects whole seconds, got '{}'", seconds)),
            ("select" | "go", Some(index)) => index
                .parse::<usize>()
                .map(|i| InputCommand::Control(Control::Select(i)))
                .map_err(|_| format!("select expects an entry number, got '{}'", index)),
            ("help" | "?", None) => Ok(InputCommand::Help),
            ("quit" | "q" | "exit", None) => Ok(InputCommand::Quit),
            _ => Err(USAGE.to_string()),
        }
    }
}
