use std::time::Duration;

use humantime::parse_duration;
use toaster::{Notification, NotificationKind, Slot};

#[derive(Debug, PartialEq, Eq)]
pub enum Line {
    Notify(Notification),
    Close(Slot),
    Position(String),
    Timer(Duration),
    Show,
    Help,
    Quit,
    Blank,
}

pub const HELP: &str = "\
commands:
  <success|error|info|default> <message>   queue a toast
  close <1|2|3>                            dismiss a slot
  position <name>                          move the container
  timer <duration>                         countdown for the next toasts
  show                                     print the current state
  quit                                     exit";

/// Parses one stdin line. Any leading word that is not a command is read as
/// a toast type, unknown types falling back to `default`.
pub fn parse_line(line: &str) -> Result<Line, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(Line::Blank);
    }
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()));

    match word {
        "quit" | "exit" => Ok(Line::Quit),
        "show" => Ok(Line::Show),
        "help" | "?" => Ok(Line::Help),
        "close" => rest.parse::<Slot>().map(Line::Close),
        "position" if !rest.is_empty() => Ok(Line::Position(rest.to_string())),
        "position" => Err("position needs a value".to_string()),
        "timer" => {
            let rest = rest.trim();
            rest.parse::<u64>()
                .map(Duration::from_millis)
                .or_else(|_| parse_duration(rest))
                .map(Line::Timer)
                .map_err(|err| format!("invalid timer {rest:?}: {err}"))
        }
        kind if rest.is_empty() => Err(format!("{kind}: missing message")),
        kind => Ok(Line::Notify(Notification::new(
            NotificationKind::parse_lossy(kind),
            rest,
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::{Line, parse_line};
    use std::time::Duration;
    use toaster::{Notification, NotificationKind, Slot};

    #[test]
    fn known_and_unknown_kinds_queue_toasts() {
        assert_eq!(
            parse_line("success Saved it"),
            Ok(Line::Notify(Notification::success("Saved it")))
        );
        assert_eq!(
            parse_line("warning  Disk low"),
            Ok(Line::Notify(Notification::new(
                NotificationKind::Default,
                "Disk low"
            )))
        );
        assert!(parse_line("error").is_err());
    }

    #[test]
    fn commands_parse_their_arguments() {
        assert_eq!(parse_line("close 2"), Ok(Line::Close(Slot::Second)));
        assert!(parse_line("close 4").is_err());
        assert_eq!(parse_line("timer 1500"), Ok(Line::Timer(Duration::from_millis(1_500))));
        assert_eq!(parse_line("timer 2s"), Ok(Line::Timer(Duration::from_secs(2))));
        assert_eq!(
            parse_line("position middle"),
            Ok(Line::Position("middle".to_string()))
        );
        assert_eq!(parse_line("   "), Ok(Line::Blank));
        assert_eq!(parse_line("quit"), Ok(Line::Quit));
    }
}
