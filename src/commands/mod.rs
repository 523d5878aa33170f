//! Terminal front end: each input line is one user intent.

use crate::coordinator::Coordinator;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Connect,
    CreateRoom,
    Refresh,
    /// by room id
    Switch(String),
    /// by 1-based position in the printed list
    SwitchTo(usize),
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  connect             negotiate the viewer session
  create              create a room, then refresh
  refresh | ls        list rooms
  switch <id|n>       move the session to a room (needs a session)
  help
  quit";

/// `None` for blank lines, `Err` with a message for anything unrecognised
pub fn parse(line: &str) -> Option<Result<Intent, String>> {
    let mut words = line.split_whitespace();
    let cmd = words.next()?;
    let arg = words.next();

    let intent = match (cmd.to_ascii_lowercase().as_str(), arg) {
        ("connect", None) => Ok(Intent::Connect),
        ("create", None) => Ok(Intent::CreateRoom),
        ("refresh" | "ls", None) => Ok(Intent::Refresh),
        ("switch", Some(target)) => Ok(match target.parse::<usize>() {
            Ok(n) => Intent::SwitchTo(n),
            Err(_) => Intent::Switch(target.to_string()),
        }),
        ("switch", None) => Err("usage: switch <room-id | list-number>".to_string()),
        ("help" | "?", _) => Ok(Intent::Help),
        ("quit" | "exit", _) => Ok(Intent::Quit),
        (other, _) => Err(format!("unknown command: {other} (try `help`)")),
    };
    Some(intent)
}

/// Starts the intent on its own task so a slow connect never blocks a refresh.
/// Results reach the user through coordinator events.
pub fn dispatch(coordinator: &Arc<Coordinator>, intent: Intent) {
    let coordinator = coordinator.clone();
    debug!("dispatch {:?}", intent);
    match intent {
        Intent::Connect => {
            tokio::spawn(async move {
                let _ = coordinator.connect().await;
            });
        }
        Intent::CreateRoom => {
            tokio::spawn(async move {
                let _ = coordinator.create_room().await;
            });
        }
        Intent::Refresh => {
            tokio::spawn(async move {
                let _ = coordinator.refresh().await;
            });
        }
        Intent::Switch(room_id) => {
            if let Err(e) = coordinator.switch(&room_id) {
                println!("{e}");
            }
        }
        Intent::SwitchTo(n) => {
            if let Err(e) = coordinator.switch_to_position(n) {
                println!("{e}");
            }
        }
        Intent::Help => println!("{HELP}"),
        Intent::Quit => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_intents() {
        assert_eq!(parse("connect"), Some(Ok(Intent::Connect)));
        assert_eq!(parse("  create "), Some(Ok(Intent::CreateRoom)));
        assert_eq!(parse("ls"), Some(Ok(Intent::Refresh)));
        assert_eq!(parse("REFRESH"), Some(Ok(Intent::Refresh)));
        assert_eq!(parse("quit"), Some(Ok(Intent::Quit)));
    }

    #[test]
    fn switch_by_number_or_id() {
        assert_eq!(parse("switch 2"), Some(Ok(Intent::SwitchTo(2))));
        assert_eq!(
            parse("switch 6f1c-room"),
            Some(Ok(Intent::Switch("6f1c-room".into())))
        );
        assert!(matches!(parse("switch"), Some(Err(_))));
    }

    #[test]
    fn blank_and_unknown() {
        assert_eq!(parse("   "), None);
        assert!(matches!(parse("dance"), Some(Err(m)) if m.contains("dance")));
    }
}
