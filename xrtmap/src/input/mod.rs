//! Control-channel input decoding.
//!
//! The control channel carries one `<lat> <lon>` pair per line. Reads arrive
//! as raw chunks; [`LineAssembler`] turns them into complete lines and
//! [`decode_line`] parses each line into a [`Coordinate`].

mod assembler;

pub use assembler::LineAssembler;

use std::fmt;

use thiserror::Error;

/// A decoded latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.latitude, self.longitude)
    }
}

/// A control line that could not be decoded. Never fatal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    /// The line did not contain exactly two fields.
    #[error("format error: expected 2 fields, found {found}; use <lat> <lon>")]
    WrongTokenCount { found: usize },

    /// A field was not a finite decimal number.
    #[error("format error: '{token}' is not a number; use <lat> <lon>")]
    InvalidNumber { token: String },
}

/// Parse a line of the form `<lat> <lon>`.
///
/// Fields are separated by any whitespace and parsed with Rust's
/// locale-independent float parser. Non-finite values are rejected since
/// they cannot be projected.
pub fn decode_line(line: &str) -> Result<Coordinate, InputError> {
    let mut fields = line.split_whitespace();
    let (Some(lat), Some(lon), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(InputError::WrongTokenCount {
            found: line.split_whitespace().count(),
        });
    };

    Ok(Coordinate::new(parse_field(lat)?, parse_field(lon)?))
}

fn parse_field(token: &str) -> Result<f64, InputError> {
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(InputError::InvalidNumber {
            token: token.to_string(),
        }),
    }
}
