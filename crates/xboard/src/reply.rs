//! Engine reply formatting.

use std::fmt;

/// One `feature` negotiation item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feature {
    /// `feature <name>=<0|1>`
    Flag(&'static str, bool),
    /// `feature <name>="<value>"`
    Text(&'static str, String),
    /// `feature done=<0|1>` bracketing the feature list.
    Done(bool),
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feature::Flag(name, value) => write!(f, "{}={}", name, u8::from(*value)),
            Feature::Text(name, value) => write!(f, "{}=\"{}\"", name, value),
            Feature::Done(value) => write!(f, "done={}", u8::from(*value)),
        }
    }
}

/// Lines the engine sends back to the GUI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Feature negotiation, e.g. `feature ping=1`.
    Feature(Feature),
    /// `pong <n>`, answering `ping <n>`.
    Pong(i64),
    /// The engine's move in coordinate notation: `move e2e4`.
    Move(String),
    /// The engine gives up the game.
    Resign,
    /// A controller move was rejected: `Illegal move (<reason>): <move>`.
    IllegalMove { reason: String, mov: String },
    /// A command failed: `Error (<kind>): <command>`.
    Error { kind: String, command: String },
    /// A free-form diagnostic comment, prefixed `#` so GUIs ignore it.
    Comment(String),
}

impl Reply {
    /// The exact protocol line for this reply, without the newline.
    pub fn to_line(&self) -> String {
        match self {
            Reply::Feature(feature) => format!("feature {}", feature),
            Reply::Pong(n) => format!("pong {}", n),
            Reply::Move(coord) => format!("move {}", coord),
            Reply::Resign => "resign".to_string(),
            Reply::IllegalMove { reason, mov } => {
                format!("Illegal move ({}): {}", reason, mov)
            }
            Reply::Error { kind, command } => format!("Error ({}): {}", kind, command),
            Reply::Comment(text) => format!("# {}", text),
        }
    }
}

/// The feature set this engine announces, bracketed by `done=0`/`done=1`.
pub fn feature_set(engine_name: &str) -> Vec<Reply> {
    let mut replies = vec![Reply::Feature(Feature::Done(false))];

    for feature in [
        Feature::Flag("ping", true),
        Feature::Flag("setboard", true),
        Feature::Flag("playother", false),
        Feature::Flag("san", false),
        Feature::Flag("usermove", true),
        Feature::Flag("time", true),
        Feature::Flag("draw", true),
        Feature::Flag("sigint", false),
        Feature::Flag("sigterm", false),
        Feature::Flag("reuse", false),
        Feature::Flag("analyze", false),
        Feature::Text("myname", engine_name.to_string()),
        Feature::Flag("colors", false),
    ] {
        replies.push(Reply::Feature(feature));
    }

    replies.push(Reply::Feature(Feature::Done(true)));
    replies
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_and_resign_lines() {
        assert_eq!(Reply::Move("e2e4".to_string()).to_line(), "move e2e4");
        assert_eq!(Reply::Resign.to_line(), "resign");
    }

    #[test]
    fn pong_echoes_the_number() {
        assert_eq!(Reply::Pong(42).to_line(), "pong 42");
    }

    #[test]
    fn error_line_format() {
        let reply = Reply::Error {
            kind: "unknown command".to_string(),
            command: "frobnicate".to_string(),
        };
        assert_eq!(reply.to_line(), "Error (unknown command): frobnicate");
    }

    #[test]
    fn illegal_move_line_format() {
        let reply = Reply::IllegalMove {
            reason: "e3 empty".to_string(),
            mov: "e3e4".to_string(),
        };
        assert_eq!(reply.to_line(), "Illegal move (e3 empty): e3e4");
    }

    #[test]
    fn feature_lines() {
        assert_eq!(
            Reply::Feature(Feature::Flag("ping", true)).to_line(),
            "feature ping=1"
        );
        assert_eq!(
            Reply::Feature(Feature::Text("myname", "Gambit".to_string())).to_line(),
            "feature myname=\"Gambit\""
        );
        assert_eq!(Reply::Feature(Feature::Done(true)).to_line(), "feature done=1");
    }

    #[test]
    fn feature_set_is_bracketed_by_done() {
        let features = feature_set("Gambit");
        assert_eq!(features.first().unwrap().to_line(), "feature done=0");
        assert_eq!(features.last().unwrap().to_line(), "feature done=1");
        assert!(features
            .iter()
            .any(|r| r.to_line() == "feature usermove=1"));
        assert!(features
            .iter()
            .any(|r| r.to_line() == "feature myname=\"Gambit\""));
    }

    #[test]
    fn comments_are_prefixed() {
        assert_eq!(Reply::Comment("book miss".to_string()).to_line(), "# book miss");
    }
}
