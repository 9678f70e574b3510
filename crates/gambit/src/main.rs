//! Gambit, an xboard chess engine.
//!
//! The process is a single blocking loop: read a protocol command, dispatch
//! it to the engine, emit the replies. The opening book is loaded before the
//! loop starts; a missing or unreadable book is fatal.

mod engine;

use engine::{Action, Engine};
use gambit_book::Book;
use xboard::{ProtocolError, Reply};

const ENGINE_NAME: &str = "Gambit";
const DEFAULT_BOOK_PATH: &str = "book.bin";

fn main() {
    let book_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_BOOK_PATH.to_string());

    let book = match Book::open(&book_path) {
        Ok(book) => book,
        Err(e) => {
            eprintln!("{}: opening book '{}': {}", ENGINE_NAME, book_path, e);
            std::process::exit(1);
        }
    };

    let mut io = xboard::stdio();
    let mut engine = Engine::new(ENGINE_NAME, book);

    loop {
        let command = match io.read_command() {
            Ok(command) => command,
            Err(ProtocolError::Eof) => break,
            Err(ProtocolError::Io(e)) => {
                eprintln!("{}: input: {}", ENGINE_NAME, e);
                break;
            }
            Err(ProtocolError::MissingArgument(command)) => {
                report(&mut io, "missing argument", command);
                continue;
            }
            Err(ProtocolError::BadArgument(command, argument)) => {
                report(&mut io, &format!("bad argument '{}'", argument), command);
                continue;
            }
        };

        let (replies, action) = engine.handle(command);
        for reply in &replies {
            if io.send(reply).is_err() {
                return;
            }
        }

        match action {
            Action::Continue => {}
            Action::Quit => break,
            Action::Fatal(message) => {
                eprintln!("{}: {}", ENGINE_NAME, message);
                std::process::exit(1);
            }
        }
    }
}

fn report<R: std::io::BufRead, W: std::io::Write>(
    io: &mut xboard::XboardIo<R, W>,
    kind: &str,
    command: &str,
) {
    let reply = Reply::Error {
        kind: kind.to_string(),
        command: command.to_string(),
    };
    // A failed write here means the GUI is gone; the next read will EOF.
    let _ = io.send(&reply);
}
