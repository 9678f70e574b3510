//! The engine proper: board, book, protocol flags, and command dispatch.

use gambit_book::Book;
use gambit_core::{Color, Move, MoveFlags, Piece, Rank, Square};
use gambit_engine::{best_move, generate_moves, Board};
use xboard::{feature_set, Command, Reply};

/// What the protocol loop should do after a command is handled.
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    /// Keep reading commands.
    Continue,
    /// Exit cleanly.
    Quit,
    /// Terminate with a diagnostic; the session cannot proceed.
    Fatal(String),
}

/// All engine state: the game, the opening book, and the protocol flags.
pub struct Engine {
    name: &'static str,
    board: Board,
    book: Book,
    force: bool,
    post: bool,
    hard: bool,
    random: bool,
    computer: bool,
    opponent: Option<String>,
    time_left: i64,
    opponent_time_left: i64,
}

impl Engine {
    pub fn new(name: &'static str, book: Book) -> Self {
        Engine {
            name,
            board: Board::startpos(),
            book,
            force: false,
            post: false,
            hard: true,
            random: false,
            computer: false,
            opponent: None,
            time_left: -1,
            opponent_time_left: -1,
        }
    }

    /// The current position, mainly for tests.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns true while the engine only tracks moves without replying.
    pub fn in_force_mode(&self) -> bool {
        self.force
    }

    /// Returns true when the GUI asked for pondering ("hard"). The engine
    /// never ponders; the flag is bookkeeping only.
    pub fn pondering_requested(&self) -> bool {
        self.hard
    }

    /// Returns true after the "random" toggle has been flipped an odd
    /// number of times. Play stays deterministic either way.
    pub fn random_requested(&self) -> bool {
        self.random
    }

    /// Returns true once the GUI declared the opponent to be a machine.
    pub fn opponent_is_computer(&self) -> bool {
        self.computer
    }

    /// The opponent's announced name, if any.
    pub fn opponent_name(&self) -> Option<&str> {
        self.opponent.as_deref()
    }

    /// The last reported (own, opponent) clocks in centiseconds, -1 when
    /// unknown. Search ignores them; the budget is fixed.
    pub fn clocks(&self) -> (i64, i64) {
        (self.time_left, self.opponent_time_left)
    }

    /// Back to the starting position with cleared game flags.
    fn reset(&mut self) {
        self.board = Board::startpos();
        self.force = false;
        self.random = false;
        self.computer = false;
        self.time_left = -1;
        self.opponent_time_left = -1;
    }

    /// Handles one command, returning the replies to emit and what to do
    /// next. Every command variant is matched; unimplemented ones answer
    /// with an error line rather than silence so GUIs can tell.
    pub fn handle(&mut self, command: Command) -> (Vec<Reply>, Action) {
        match command {
            Command::Xboard => (feature_set(self.name), Action::Continue),
            Command::Protover(version) => {
                if version < 2 {
                    return (
                        Vec::new(),
                        Action::Fatal(format!("unsupported protocol version {}", version)),
                    );
                }
                (Vec::new(), Action::Continue)
            }
            Command::Accepted(_) => (Vec::new(), Action::Continue),
            Command::Rejected(feature) => (
                Vec::new(),
                Action::Fatal(format!("cannot continue without '{}' support", feature)),
            ),
            Command::New => {
                self.reset();
                (Vec::new(), Action::Continue)
            }
            Command::Quit => (Vec::new(), Action::Quit),
            Command::Random => {
                self.random = !self.random;
                (Vec::new(), Action::Continue)
            }
            Command::Force => {
                self.force = true;
                (Vec::new(), Action::Continue)
            }
            Command::Go => {
                self.force = false;
                (self.send_move(), Action::Continue)
            }
            Command::Level { .. } => (Vec::new(), Action::Continue),
            Command::Usermove(coord) => (self.handle_usermove(&coord), Action::Continue),
            Command::Time(centis) => {
                self.time_left = centis;
                (Vec::new(), Action::Continue)
            }
            Command::Otim(centis) => {
                self.opponent_time_left = centis;
                (Vec::new(), Action::Continue)
            }
            Command::Ping(n) => (vec![Reply::Pong(n)], Action::Continue),
            Command::Result { .. } => {
                self.force = true;
                (Vec::new(), Action::Continue)
            }
            Command::Setboard(fen) => match Board::from_fen(&fen) {
                Ok(board) => {
                    self.board = board;
                    (Vec::new(), Action::Continue)
                }
                Err(e) => (
                    vec![Reply::Error {
                        kind: format!("bad FEN, {}", e),
                        command: fen,
                    }],
                    Action::Continue,
                ),
            },
            Command::Hard => {
                self.hard = true;
                (Vec::new(), Action::Continue)
            }
            Command::Easy => {
                self.hard = false;
                (Vec::new(), Action::Continue)
            }
            Command::Post => {
                self.post = true;
                (Vec::new(), Action::Continue)
            }
            Command::NoPost => {
                self.post = false;
                (Vec::new(), Action::Continue)
            }
            Command::Name(name) => {
                self.opponent = Some(name);
                (Vec::new(), Action::Continue)
            }
            Command::Computer => {
                self.computer = true;
                (Vec::new(), Action::Continue)
            }
            Command::Unknown(line) => (
                vec![Reply::Error {
                    kind: "unknown command".to_string(),
                    command: line,
                }],
                Action::Continue,
            ),
        }
    }

    fn handle_usermove(&mut self, coord: &str) -> Vec<Reply> {
        let m = match self.interpret_move(coord) {
            Ok(m) => m,
            Err(reason) => {
                return vec![Reply::IllegalMove {
                    reason,
                    mov: coord.to_string(),
                }]
            }
        };

        self.board.apply_move(m);

        if self.force {
            Vec::new()
        } else {
            self.send_move()
        }
    }

    /// Picks a move for the side to play, applies it, and reports it.
    /// The book is consulted first; the search runs on a miss.
    fn send_move(&mut self) -> Vec<Reply> {
        let mut replies = Vec::new();

        let m = match self.book.probe(&self.board) {
            Some(m) => {
                if self.post {
                    replies.push(Reply::Comment(format!("book move {}", m)));
                }
                m
            }
            None => match best_move(&self.board) {
                Some(m) => m,
                None => {
                    replies.push(Reply::Resign);
                    return replies;
                }
            },
        };

        self.board.apply_move(m);
        replies.push(Reply::Move(m.to_coord()));
        replies
    }

    /// Interprets a coordinate move string against the current position.
    ///
    /// The origin must hold a piece of the side to move and the destination
    /// must not; the moving piece, capture, castling, double-push,
    /// en-passant, and promotion properties are inferred from the board, and
    /// the result must match a generated legal move.
    fn interpret_move(&self, coord: &str) -> Result<Move, String> {
        if coord.len() != 4 && coord.len() != 5 {
            return Err("malformed coordinates".to_string());
        }

        let from =
            Square::from_coord(&coord[0..2]).ok_or_else(|| "malformed coordinates".to_string())?;
        let to =
            Square::from_coord(&coord[2..4]).ok_or_else(|| "malformed coordinates".to_string())?;

        let us = self.board.side_to_move();
        let them = us.opposite();

        if !self.board.occupancy(us).contains(from) {
            return Err(format!("{} empty", from));
        }
        if self.board.occupancy(us).contains(to) {
            return Err(format!("{} occupied by own piece", to));
        }

        let piece = Piece::ALL
            .into_iter()
            .find(|p| self.board.pieces_of(us, *p).contains(from))
            .expect("occupancy and piece sets agree");

        let mut flags = MoveFlags::NONE;
        let mut capture = None;
        if self.board.occupancy(them).contains(to) {
            flags |= MoveFlags::CAPTURE;
            capture = Piece::ALL
                .into_iter()
                .find(|p| self.board.pieces_of(them, *p).contains(to));
        }

        let (king_home, kingside_target, queenside_target) = match us {
            Color::White => (Square::E1, Square::G1, Square::C1),
            Color::Black => (Square::E8, Square::G8, Square::C8),
        };

        if piece == Piece::King && from == king_home && to == kingside_target {
            flags |= MoveFlags::KING_CASTLE;
        } else if piece == Piece::King && from == king_home && to == queenside_target {
            flags |= MoveFlags::QUEEN_CASTLE;
        } else if piece == Piece::Pawn {
            let (start_rank, double_rank) = match us {
                Color::White => (Rank::R2, Rank::R4),
                Color::Black => (Rank::R7, Rank::R5),
            };
            if from.rank() == start_rank && to.rank() == double_rank {
                flags |= MoveFlags::DOUBLE_PUSH;
            } else if !flags.contains(MoveFlags::CAPTURE) && self.board.en_passant() == Some(to) {
                flags |= MoveFlags::EN_PASSANT;
            }
        }

        let promotion = match coord.as_bytes().get(4) {
            Some(&c) => {
                let target = match c.to_ascii_lowercase() {
                    b'n' => Piece::Knight,
                    b'b' => Piece::Bishop,
                    b'r' => Piece::Rook,
                    b'q' => Piece::Queen,
                    _ => return Err("bad promotion piece".to_string()),
                };
                flags |= MoveFlags::PROMOTION;
                Some(target)
            }
            None => None,
        };

        let m = Move {
            flags,
            from,
            to,
            piece,
            capture,
            promotion,
        };

        if !generate_moves(&self.board).as_slice().contains(&m) {
            return Err("not legal in this position".to_string());
        }

        Ok(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> Engine {
        Engine::new("Gambit", Book::empty())
    }

    fn engine_with_fen(fen: &str) -> Engine {
        let mut e = engine();
        let (replies, action) = e.handle(Command::Setboard(fen.to_string()));
        assert!(replies.is_empty());
        assert_eq!(action, Action::Continue);
        e
    }

    #[test]
    fn ping_answers_pong() {
        let mut e = engine();
        let (replies, action) = e.handle(Command::Ping(7));
        assert_eq!(replies, vec![Reply::Pong(7)]);
        assert_eq!(action, Action::Continue);
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut e = engine();
        assert_eq!(e.handle(Command::Quit).1, Action::Quit);
    }

    #[test]
    fn xboard_negotiates_features() {
        let mut e = engine();
        let (replies, _) = e.handle(Command::Xboard);
        assert_eq!(replies.first().unwrap().to_line(), "feature done=0");
        assert_eq!(replies.last().unwrap().to_line(), "feature done=1");
    }

    #[test]
    fn old_protocol_versions_are_fatal() {
        let mut e = engine();
        assert!(matches!(e.handle(Command::Protover(1)).1, Action::Fatal(_)));
        assert_eq!(e.handle(Command::Protover(2)).1, Action::Continue);
    }

    #[test]
    fn new_resets_board_and_flags() {
        let mut e = engine();
        e.handle(Command::Force);
        e.handle(Command::Setboard("4k3/8/8/8/8/8/8/4K3 w - - 0 1".to_string()));
        e.handle(Command::New);
        assert!(!e.in_force_mode());
        assert_eq!(e.board().to_fen(), Board::startpos().to_fen());
    }

    #[test]
    fn force_mode_tracks_moves_silently() {
        let mut e = engine();
        e.handle(Command::Force);
        let (replies, _) = e.handle(Command::Usermove("e2e4".to_string()));
        assert!(replies.is_empty());
        assert_eq!(e.board().side_to_move(), Color::Black);

        let (replies, _) = e.handle(Command::Usermove("e7e5".to_string()));
        assert!(replies.is_empty());
        assert_eq!(e.board().side_to_move(), Color::White);
    }

    #[test]
    fn usermove_replies_with_a_move_when_not_forced() {
        // A sparse position keeps the reply search quick.
        let mut e = engine_with_fen("4k3/8/8/8/8/8/3PP3/4K3 b - - 0 1");
        let (replies, _) = e.handle(Command::Usermove("e8d7".to_string()));
        assert_eq!(replies.len(), 1);
        assert!(replies[0].to_line().starts_with("move "));
        // Both the user's move and the engine's reply were applied.
        assert_eq!(e.board().side_to_move(), Color::Black);
    }

    #[test]
    fn illegal_moves_are_rejected_with_reasons() {
        let mut e = engine();
        e.handle(Command::Force);

        let (replies, _) = e.handle(Command::Usermove("e3e4".to_string()));
        assert_eq!(replies[0].to_line(), "Illegal move (e3 empty): e3e4");

        let (replies, _) = e.handle(Command::Usermove("e1e2".to_string()));
        assert_eq!(
            replies[0].to_line(),
            "Illegal move (e2 occupied by own piece): e1e2"
        );

        let (replies, _) = e.handle(Command::Usermove("b1d2".to_string()));
        assert_eq!(
            replies[0].to_line(),
            "Illegal move (d2 occupied by own piece): b1d2"
        );

        let (replies, _) = e.handle(Command::Usermove("a2a5".to_string()));
        assert_eq!(
            replies[0].to_line(),
            "Illegal move (not legal in this position): a2a5"
        );

        let (replies, _) = e.handle(Command::Usermove("e2e9".to_string()));
        assert_eq!(
            replies[0].to_line(),
            "Illegal move (malformed coordinates): e2e9"
        );
    }

    #[test]
    fn moving_into_check_is_rejected() {
        let mut e = engine_with_fen("4r2k/8/8/8/8/8/8/4K3 w - - 0 1");
        e.handle(Command::Force);
        let (replies, _) = e.handle(Command::Usermove("e1e2".to_string()));
        assert_eq!(
            replies[0].to_line(),
            "Illegal move (not legal in this position): e1e2"
        );
    }

    #[test]
    fn castling_usermove_is_understood() {
        let mut e = engine_with_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1");
        e.handle(Command::Force);
        let (replies, _) = e.handle(Command::Usermove("e1g1".to_string()));
        assert!(replies.is_empty());
        assert_eq!(
            e.board().piece_at(Square::F1),
            Some((Piece::Rook, Color::White))
        );
    }

    #[test]
    fn promotion_usermove_is_understood() {
        let mut e = engine_with_fen("8/P7/8/8/8/8/8/4K2k w - - 0 1");
        e.handle(Command::Force);
        let (replies, _) = e.handle(Command::Usermove("a7a8q".to_string()));
        assert!(replies.is_empty());
        assert_eq!(
            e.board().piece_at(Square::A8),
            Some((Piece::Queen, Color::White))
        );
    }

    #[test]
    fn en_passant_usermove_is_understood() {
        let mut e =
            engine_with_fen("rnbqkbnr/pppp1ppp/8/4pP2/8/8/PPPPP1PP/RNBQKBNR w KQkq e6 0 3");
        e.handle(Command::Force);
        let (replies, _) = e.handle(Command::Usermove("f5e6".to_string()));
        assert!(replies.is_empty());
        assert_eq!(e.board().piece_at(Square::from_coord("e5").unwrap()), None);
    }

    #[test]
    fn go_resigns_with_no_legal_moves() {
        // Black is checkmated; "go" must produce a resignation.
        let mut e = engine_with_fen("R6k/8/6K1/8/8/8/8/8 b - - 0 1");
        let (replies, _) = e.handle(Command::Go);
        assert_eq!(replies, vec![Reply::Resign]);
    }

    #[test]
    fn book_moves_bypass_the_search() {
        // Build a one-entry book binding the start position to d2d4.
        let start = Board::startpos();
        let key = gambit_book::polyglot_key(&start);
        let d2 = Square::from_coord("d2").unwrap();
        let d4 = Square::from_coord("d4").unwrap();
        let packed: u16 = u16::from(d4.file().index())
            | u16::from(d4.rank().index()) << 3
            | u16::from(d2.file().index()) << 6
            | u16::from(d2.rank().index()) << 9;

        let mut bytes = Vec::new();
        bytes.extend_from_slice(&key.to_be_bytes());
        bytes.extend_from_slice(&packed.to_be_bytes());
        bytes.extend_from_slice(&[0u8; 4]);

        let mut e = Engine::new("Gambit", Book::from_bytes(&bytes));
        let (replies, _) = e.handle(Command::Go);
        assert_eq!(replies, vec![Reply::Move("d2d4".to_string())]);
    }

    #[test]
    fn unknown_commands_get_error_lines() {
        let mut e = engine();
        let (replies, _) = e.handle(Command::Unknown("analyze".to_string()));
        assert_eq!(replies[0].to_line(), "Error (unknown command): analyze");
    }

    #[test]
    fn bad_setboard_reports_and_continues() {
        let mut e = engine();
        let (replies, action) = e.handle(Command::Setboard("not a fen".to_string()));
        assert_eq!(action, Action::Continue);
        assert!(replies[0].to_line().starts_with("Error (bad FEN"));
        // The previous position is untouched.
        assert_eq!(e.board().to_fen(), Board::startpos().to_fen());
    }

    #[test]
    fn inert_commands_update_bookkeeping_only() {
        let mut e = engine();

        assert!(e.pondering_requested());
        e.handle(Command::Easy);
        assert!(!e.pondering_requested());
        e.handle(Command::Hard);
        assert!(e.pondering_requested());

        assert!(!e.random_requested());
        e.handle(Command::Random);
        assert!(e.random_requested());

        e.handle(Command::Time(30000));
        e.handle(Command::Otim(29000));
        assert_eq!(e.clocks(), (30000, 29000));

        e.handle(Command::Name("toolkit".to_string()));
        e.handle(Command::Computer);
        assert_eq!(e.opponent_name(), Some("toolkit"));
        assert!(e.opponent_is_computer());

        // Level parses and is deliberately ignored.
        let (replies, action) = e.handle(Command::Level {
            moves_per_control: 40,
            base: "5".to_string(),
            increment: 0,
        });
        assert!(replies.is_empty());
        assert_eq!(action, Action::Continue);
    }

    #[test]
    fn result_enters_force_mode() {
        let mut e = engine();
        e.handle(Command::Result {
            result: "1-0".to_string(),
            comment: "White mates".to_string(),
        });
        assert!(e.in_force_mode());
    }
}
