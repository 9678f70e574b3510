//! GUI command parsing.

use crate::ProtocolError;

/// Commands a CECP GUI sends to the engine.
///
/// Commands the engine deliberately ignores (time controls, pondering
/// toggles) still parse so the loop can acknowledge and move on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Enter xboard mode; the engine answers with its feature set.
    Xboard,
    /// Protocol version announcement.
    Protover(u32),
    /// The GUI accepted a feature.
    Accepted(String),
    /// The GUI rejected a feature.
    Rejected(String),
    /// Reset to the starting position and clear engine state.
    New,
    /// Exit the process.
    Quit,
    /// Toggle random play (inert).
    Random,
    /// Stop replying to moves; just track the position.
    Force,
    /// Leave force mode and move for the side to play.
    Go,
    /// Time control setup (parsed, unused).
    Level {
        moves_per_control: u32,
        base: String,
        increment: u32,
    },
    /// The opponent played a move in coordinate notation.
    Usermove(String),
    /// Engine clock in centiseconds (stored, unused).
    Time(i64),
    /// Opponent clock in centiseconds (stored, unused).
    Otim(i64),
    /// Liveness probe; the engine echoes `pong <n>`.
    Ping(i64),
    /// Game over notification; the engine stops replying to moves.
    Result { result: String, comment: String },
    /// Install a position from FEN.
    Setboard(String),
    /// Pondering on (inert).
    Hard,
    /// Pondering off (inert).
    Easy,
    /// Enable thinking output.
    Post,
    /// Disable thinking output.
    NoPost,
    /// Opponent name announcement.
    Name(String),
    /// The opponent is another engine.
    Computer,
    /// Anything unrecognized, kept verbatim for the error reply.
    Unknown(String),
}

impl Command {
    /// Parses one input line.
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let line = line.trim();
        let mut tokens = line.split_whitespace();
        let keyword = tokens.next().unwrap_or("");

        match keyword {
            "xboard" => Ok(Command::Xboard),
            "protover" => Ok(Command::Protover(parse_arg(tokens.next(), "protover")?)),
            "accepted" => Ok(Command::Accepted(required(tokens.next(), "accepted")?)),
            "rejected" => Ok(Command::Rejected(required(tokens.next(), "rejected")?)),
            "new" => Ok(Command::New),
            "quit" => Ok(Command::Quit),
            "random" => Ok(Command::Random),
            "force" => Ok(Command::Force),
            "go" => Ok(Command::Go),
            "level" => {
                let moves_per_control = parse_arg(tokens.next(), "level")?;
                let base = required(tokens.next(), "level")?;
                let increment = parse_arg(tokens.next(), "level")?;
                Ok(Command::Level {
                    moves_per_control,
                    base,
                    increment,
                })
            }
            "usermove" => Ok(Command::Usermove(required(tokens.next(), "usermove")?)),
            "time" => Ok(Command::Time(parse_arg(tokens.next(), "time")?)),
            "otim" => Ok(Command::Otim(parse_arg(tokens.next(), "otim")?)),
            "ping" => Ok(Command::Ping(parse_arg(tokens.next(), "ping")?)),
            "result" => {
                let result = required(tokens.next(), "result")?;
                let rest: Vec<&str> = tokens.collect();
                let comment = rest
                    .join(" ")
                    .trim_start_matches('{')
                    .trim_end_matches('}')
                    .to_string();
                Ok(Command::Result { result, comment })
            }
            "setboard" => {
                let fen = line
                    .strip_prefix("setboard")
                    .map(str::trim)
                    .unwrap_or_default();
                if fen.is_empty() {
                    return Err(ProtocolError::MissingArgument("setboard"));
                }
                Ok(Command::Setboard(fen.to_string()))
            }
            "hard" => Ok(Command::Hard),
            "easy" => Ok(Command::Easy),
            "post" => Ok(Command::Post),
            "nopost" => Ok(Command::NoPost),
            "name" => Ok(Command::Name(required(tokens.next(), "name")?)),
            "computer" => Ok(Command::Computer),
            _ => Ok(Command::Unknown(line.to_string())),
        }
    }
}

fn required(token: Option<&str>, command: &'static str) -> Result<String, ProtocolError> {
    token
        .map(str::to_string)
        .ok_or(ProtocolError::MissingArgument(command))
}

fn parse_arg<T: std::str::FromStr>(
    token: Option<&str>,
    command: &'static str,
) -> Result<T, ProtocolError> {
    let token = token.ok_or(ProtocolError::MissingArgument(command))?;
    token
        .parse()
        .map_err(|_| ProtocolError::BadArgument(command, token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_keywords() {
        assert_eq!(Command::parse("xboard\n").unwrap(), Command::Xboard);
        assert_eq!(Command::parse("new").unwrap(), Command::New);
        assert_eq!(Command::parse("force").unwrap(), Command::Force);
        assert_eq!(Command::parse("go").unwrap(), Command::Go);
        assert_eq!(Command::parse("quit").unwrap(), Command::Quit);
        assert_eq!(Command::parse("hard").unwrap(), Command::Hard);
        assert_eq!(Command::parse("nopost").unwrap(), Command::NoPost);
        assert_eq!(Command::parse("computer").unwrap(), Command::Computer);
    }

    #[test]
    fn parses_protover() {
        assert_eq!(Command::parse("protover 2").unwrap(), Command::Protover(2));
        assert!(matches!(
            Command::parse("protover"),
            Err(ProtocolError::MissingArgument("protover"))
        ));
        assert!(matches!(
            Command::parse("protover two"),
            Err(ProtocolError::BadArgument("protover", _))
        ));
    }

    #[test]
    fn parses_usermove() {
        assert_eq!(
            Command::parse("usermove e2e4").unwrap(),
            Command::Usermove("e2e4".to_string())
        );
        assert_eq!(
            Command::parse("usermove e7e8q").unwrap(),
            Command::Usermove("e7e8q".to_string())
        );
        assert!(Command::parse("usermove").is_err());
    }

    #[test]
    fn parses_ping_and_clocks() {
        assert_eq!(Command::parse("ping 17").unwrap(), Command::Ping(17));
        assert_eq!(Command::parse("time 30000").unwrap(), Command::Time(30000));
        assert_eq!(Command::parse("otim -5").unwrap(), Command::Otim(-5));
    }

    #[test]
    fn parses_setboard_with_the_whole_fen() {
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        assert_eq!(
            Command::parse(&format!("setboard {}", fen)).unwrap(),
            Command::Setboard(fen.to_string())
        );
        assert!(Command::parse("setboard").is_err());
    }

    #[test]
    fn parses_level() {
        assert_eq!(
            Command::parse("level 40 5 0").unwrap(),
            Command::Level {
                moves_per_control: 40,
                base: "5".to_string(),
                increment: 0
            }
        );
        assert_eq!(
            Command::parse("level 0 2:30 12").unwrap(),
            Command::Level {
                moves_per_control: 0,
                base: "2:30".to_string(),
                increment: 12
            }
        );
    }

    #[test]
    fn parses_result_with_comment() {
        assert_eq!(
            Command::parse("result 1-0 {White mates}").unwrap(),
            Command::Result {
                result: "1-0".to_string(),
                comment: "White mates".to_string()
            }
        );
    }

    #[test]
    fn parses_feature_responses() {
        assert_eq!(
            Command::parse("accepted setboard").unwrap(),
            Command::Accepted("setboard".to_string())
        );
        assert_eq!(
            Command::parse("rejected san").unwrap(),
            Command::Rejected("san".to_string())
        );
    }

    #[test]
    fn unknown_commands_are_preserved() {
        assert_eq!(
            Command::parse("analyze deeply").unwrap(),
            Command::Unknown("analyze deeply".to_string())
        );
    }
}
