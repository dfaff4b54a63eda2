use std::{fmt, io};

pub mod prediction_slot;
pub mod repl;

#[derive(Debug)]
pub enum ReplError {
    Console(io::Error),
}

impl fmt::Display for ReplError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ReplError::Console(err) => write!(f, "Console error: {}", err),
        }
    }
}

impl From<io::Error> for ReplError {
    fn from(error: io::Error) -> Self {
        ReplError::Console(error)
    }
}
