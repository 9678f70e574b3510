//! FEN (Forsyth-Edwards Notation) parsing and validation.

use thiserror::Error;

/// Errors produced while parsing a FEN string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("expected 6 fields, got {0}")]
    FieldCount(usize),

    #[error("bad piece placement: {0}")]
    Placement(String),

    #[error("bad side to move: '{0}'")]
    SideToMove(String),

    #[error("bad castling availability: '{0}'")]
    Castling(String),

    #[error("bad en passant target: '{0}'")]
    EnPassant(String),

    #[error("bad halfmove clock: '{0}'")]
    HalfmoveClock(String),

    #[error("bad fullmove number: '{0}'")]
    FullmoveNumber(String),
}

/// The six validated fields of a FEN string.
///
/// This type holds the raw textual fields; the engine turns them into its
/// board representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fen {
    /// Piece placement, rank 8 first, e.g. `"rnbqkbnr/pppppppp/8/..."`.
    pub placement: String,
    /// Side to move, `'w'` or `'b'`.
    pub side_to_move: char,
    /// Castling availability, e.g. `"KQkq"` or `"-"`.
    pub castling: String,
    /// En passant target square, e.g. `"e3"` or `"-"`.
    pub en_passant: String,
    /// Plies since the last capture or pawn move.
    pub halfmove_clock: u32,
    /// Move counter, starting at 1, incremented after black moves.
    pub fullmove_number: u32,
}

impl Fen {
    /// The standard starting position.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses and validates a FEN string.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();

        if fields.len() != 6 {
            return Err(FenError::FieldCount(fields.len()));
        }

        Self::check_placement(fields[0])?;

        let side_to_move = match fields[1] {
            "w" => 'w',
            "b" => 'b',
            other => return Err(FenError::SideToMove(other.to_string())),
        };

        Self::check_castling(fields[2])?;
        Self::check_en_passant(fields[3])?;

        let halfmove_clock = fields[4]
            .parse::<u32>()
            .map_err(|_| FenError::HalfmoveClock(fields[4].to_string()))?;

        let fullmove_number = fields[5]
            .parse::<u32>()
            .map_err(|_| FenError::FullmoveNumber(fields[5].to_string()))?;

        Ok(Fen {
            placement: fields[0].to_string(),
            side_to_move,
            castling: fields[2].to_string(),
            en_passant: fields[3].to_string(),
            halfmove_clock,
            fullmove_number,
        })
    }

    fn check_placement(placement: &str) -> Result<(), FenError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::Placement(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        for (i, rank) in ranks.iter().enumerate() {
            let mut squares = 0u32;
            for c in rank.chars() {
                if let Some(d) = c.to_digit(10) {
                    squares += d;
                } else if "pnbrqkPNBRQK".contains(c) {
                    squares += 1;
                } else {
                    return Err(FenError::Placement(format!(
                        "invalid character '{}' in rank {}",
                        c,
                        8 - i
                    )));
                }
            }
            if squares != 8 {
                return Err(FenError::Placement(format!(
                    "rank {} covers {} squares",
                    8 - i,
                    squares
                )));
            }
        }

        Ok(())
    }

    fn check_castling(castling: &str) -> Result<(), FenError> {
        if castling == "-" {
            return Ok(());
        }

        if castling.is_empty() || castling.chars().any(|c| !"KQkq".contains(c)) {
            return Err(FenError::Castling(castling.to_string()));
        }

        Ok(())
    }

    fn check_en_passant(ep: &str) -> Result<(), FenError> {
        if ep == "-" {
            return Ok(());
        }

        let bytes = ep.as_bytes();
        let valid = bytes.len() == 2
            && (b'a'..=b'h').contains(&bytes[0])
            && (bytes[1] == b'3' || bytes[1] == b'6');

        if !valid {
            return Err(FenError::EnPassant(ep.to_string()));
        }

        Ok(())
    }
}

impl std::fmt::Display for Fen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            self.placement,
            self.side_to_move,
            self.castling,
            self.en_passant,
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_startpos() {
        let fen = Fen::parse(Fen::STARTPOS).unwrap();
        assert_eq!(fen.side_to_move, 'w');
        assert_eq!(fen.castling, "KQkq");
        assert_eq!(fen.en_passant, "-");
        assert_eq!(fen.halfmove_clock, 0);
        assert_eq!(fen.fullmove_number, 1);
    }

    #[test]
    fn display_round_trip() {
        let input = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
        let fen = Fen::parse(input).unwrap();
        assert_eq!(fen.to_string(), input);
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert_eq!(Fen::parse("only three fields"), Err(FenError::FieldCount(3)));
    }

    #[test]
    fn rejects_bad_side() {
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 x - - 0 1"),
            Err(FenError::SideToMove(_))
        ));
    }

    #[test]
    fn rejects_short_rank() {
        assert!(matches!(
            Fen::parse("rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::Placement(_))
        ));
    }

    #[test]
    fn rejects_bad_castling() {
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w KX - 0 1"),
            Err(FenError::Castling(_))
        ));
    }

    #[test]
    fn rejects_bad_en_passant() {
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w - e4 0 1"),
            Err(FenError::EnPassant(_))
        ));
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w - x6 0 1"),
            Err(FenError::EnPassant(_))
        ));
    }

    #[test]
    fn rejects_bad_counters() {
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w - - x 1"),
            Err(FenError::HalfmoveClock(_))
        ));
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w - - 0 x"),
            Err(FenError::FullmoveNumber(_))
        ));
    }

    #[test]
    fn accepts_en_passant_targets() {
        assert!(Fen::parse("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1").is_ok());
        assert!(Fen::parse("rnbqkbnr/pppp1ppp/8/4p3/8/8/PPPPPPPP/RNBQKBNR w KQkq e6 0 2").is_ok());
    }
}
