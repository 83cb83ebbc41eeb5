use std::fmt;
use std::str::FromStr;

use exam_core::model::{AnswerChoice, OptionKey};

/// One line typed at the exam prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Answer(OptionKey),
    Skip,
    Next,
    Previous,
    Submit,
    Time,
    Restart,
    Help,
    Quit,
}

impl Command {
    pub const HELP: &'static str = "\
Commands:
  <letter>      choose an option (e.g. a, B)
  answer <key>  choose any option, including keys like AA or N
  skip | s      clear the answer for this question
  next | n      go to the next question
  prev | p      go to the previous question
  submit        finish the exam and show results
  time | t      show the remaining time
  restart | r   start a new exam with a fresh draw
  help | h      show this help
  quit | q      leave";

    /// The answer this command records, if any.
    #[must_use]
    pub fn answer(&self) -> Option<AnswerChoice> {
        match self {
            Command::Answer(key) => Some(AnswerChoice::Option(key.clone())),
            Command::Skip => Some(AnswerChoice::Skipped),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCommandError(String);

impl fmt::Display for ParseCommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown command `{}` (type `help`)", self.0)
    }
}

impl std::error::Error for ParseCommandError {}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if let Some((word, key)) = raw.split_once(char::is_whitespace) {
            if matches!(word.to_ascii_lowercase().as_str(), "answer" | "ans") {
                return OptionKey::parse(key)
                    .map(Command::Answer)
                    .map_err(|_| ParseCommandError(raw.to_owned()));
            }
            return Err(ParseCommandError(raw.to_owned()));
        }
        let command = match raw.to_ascii_lowercase().as_str() {
            "skip" | "s" | "pass" => Command::Skip,
            "next" | "n" => Command::Next,
            "prev" | "previous" | "p" => Command::Previous,
            "submit" => Command::Submit,
            "time" | "t" => Command::Time,
            "restart" | "r" => Command::Restart,
            "help" | "h" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            key if key.len() == 1 && key.chars().all(|c| c.is_ascii_alphabetic()) => {
                OptionKey::parse(key)
                    .map(Command::Answer)
                    .map_err(|_| ParseCommandError(raw.to_owned()))?
            }
            _ => return Err(ParseCommandError(raw.to_owned())),
        };
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_become_answers() {
        let cmd: Command = " b ".parse().unwrap();
        assert_eq!(cmd, Command::Answer(OptionKey::parse("B").unwrap()));
        assert_eq!(
            cmd.answer(),
            Some(AnswerChoice::Option(OptionKey::parse("B").unwrap()))
        );
    }

    #[test]
    fn navigation_words_and_shortcuts() {
        assert_eq!("next".parse::<Command>().unwrap(), Command::Next);
        assert_eq!("P".parse::<Command>().unwrap(), Command::Previous);
        assert_eq!("submit".parse::<Command>().unwrap(), Command::Submit);
        assert_eq!("q".parse::<Command>().unwrap(), Command::Quit);
    }

    #[test]
    fn skip_is_checked_before_letters() {
        let cmd: Command = "s".parse().unwrap();
        assert_eq!(cmd, Command::Skip);
        assert_eq!(cmd.answer(), Some(AnswerChoice::Skipped));
    }

    #[test]
    fn answer_keyword_reaches_any_key() {
        let key = |raw: &str| Command::Answer(OptionKey::parse(raw).unwrap());
        assert_eq!("answer n".parse::<Command>().unwrap(), key("N"));
        assert_eq!("ANSWER  aa".parse::<Command>().unwrap(), key("AA"));
        assert_eq!("ans q".parse::<Command>().unwrap(), key("Q"));
        assert!("answer skip".parse::<Command>().is_err());
        assert!("go next".parse::<Command>().is_err());
    }

    #[test]
    fn unknown_input_is_rejected() {
        assert!("".parse::<Command>().is_err());
        assert!("answer".parse::<Command>().is_err());
        assert!("7".parse::<Command>().is_err());
    }
}
