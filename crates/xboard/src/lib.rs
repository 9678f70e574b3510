//! CECP (xboard) protocol support.
//!
//! The protocol is line-oriented text over stdio: the GUI sends commands
//! such as `new`, `usermove e2e4`, or `setboard <FEN>`, and the engine
//! answers with lines such as `move e7e5`, `pong 3`, or the `feature`
//! negotiation. This crate provides:
//!
//! - [`Command`]: parsed GUI commands
//! - [`Reply`]: engine replies with their exact line formats
//! - [`XboardIo`]: a thin reader/writer wrapper for the blocking loop

mod command;
mod reply;

pub use command::Command;
pub use reply::{feature_set, Feature, Reply};

use std::io::{BufRead, Write};
use thiserror::Error;

/// Errors raised while reading or parsing protocol input.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("missing argument for '{0}'")]
    MissingArgument(&'static str),
    #[error("bad argument for '{0}': {1}")]
    BadArgument(&'static str, String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("end of input")]
    Eof,
}

/// Blocking line-based I/O for the protocol loop.
pub struct XboardIo<R: BufRead, W: Write> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> XboardIo<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        XboardIo { reader, writer }
    }

    /// Reads and parses the next command line. Blank lines are skipped.
    pub fn read_command(&mut self) -> Result<Command, ProtocolError> {
        loop {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Err(ProtocolError::Eof);
            }
            if line.trim().is_empty() {
                continue;
            }
            return Command::parse(&line);
        }
    }

    /// Writes a reply line and flushes immediately so the GUI sees it.
    pub fn send(&mut self, reply: &Reply) -> Result<(), ProtocolError> {
        writeln!(self.writer, "{}", reply.to_line())?;
        self.writer.flush()?;
        Ok(())
    }
}

/// An [`XboardIo`] over stdin and stdout.
pub fn stdio() -> XboardIo<std::io::BufReader<std::io::Stdin>, std::io::Stdout> {
    XboardIo::new(std::io::BufReader::new(std::io::stdin()), std::io::stdout())
}
