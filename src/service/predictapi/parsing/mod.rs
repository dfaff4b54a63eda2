use std::fmt;

pub mod health;
pub mod prediction;

#[derive(Debug)]
pub enum ParsingError {
    InvalidType(String),
}

impl fmt::Display for ParsingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParsingError::InvalidType(field) => write!(f, "Missing or invalid field '{}'", field),
        }
    }
}
