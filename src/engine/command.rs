use std::convert::TryFrom;
use std::io;
use std::io::Write;
use std::os::unix::net::UnixStream;

use thiserror::Error;

use tracing::trace;
use tracing::warn;

/// Messages from the engine handle to its reactor thread, one byte each
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command {
    Quit,
    Start,
    Stop,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown command byte {0}")]
    Unknown(u8),
    #[error("unable to send {0:?} command: {1}")]
    Io(Command, #[source] io::Error),
}

impl From<Command> for u8 {
    fn from(command: Command) -> u8 {
        match command {
            Command::Quit => 0,
            Command::Start => 1,
            Command::Stop => 2,
        }
    }
}

impl TryFrom<u8> for Command {
    type Error = CommandError;

    fn try_from(byte: u8) -> Result<Command, CommandError> {
        match byte {
            0 => Ok(Command::Quit),
            1 => Ok(Command::Start),
            2 => Ok(Command::Stop),
            b => Err(CommandError::Unknown(b)),
        }
    }
}

impl Command {
    /// Write this command to the control channel.
    ///
    /// Interrupted writes are retried.  Nothing is acknowledged, and a write that made no
    /// progress is only logged.
    pub fn send(self, mut control: &UnixStream) -> Result<(), CommandError> {
        let byte = [u8::from(self)];

        loop {
            match control.write(&byte) {
                Ok(1) => {
                    trace!("sent {:?} command", self);
                    return Ok(());
                }
                Ok(n) => {
                    warn!("could not send {:?} command: wrote {} bytes", self, n);
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(CommandError::Io(self, e)),
            }
        }
    }
}
