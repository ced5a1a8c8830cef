use arrayvec::CapacityError;
use std::{io, num};

quick_error! {
    #[derive(Debug)]
    pub enum ParseError {
        Lexer(err: LexError) {
            from()
            description("Lexer error")
            display("Could not parse due to an error in the lexer: {}", err)
            cause(err)
        }
        UnexpectedResponse {
            description("Unexpected response")
            display("Line is not a +CGPSINFO response")
        }
    }
}

quick_error! {
    #[derive(Debug)]
    pub enum LexError {
        Io(err: io::Error) {
            from()
            description("I/O error")
            display("Encountered I/O error while lexing: {}", err)
            cause(err)
        }
        ArrayOverflow(err: CapacityError<u8>, capacity: usize) {
            description("Token too long")
            display("Tried to push more than {} characters into the buffer: {}", capacity, err)
            cause(err)
        }
    }
}

// Quick error can't handle from for tuples
impl From<(CapacityError<u8>, usize)> for LexError {
    fn from((e, cap): (CapacityError<u8>, usize)) -> Self {
        LexError::ArrayOverflow(e, cap)
    }
}

quick_error! {
    #[derive(Debug, PartialEq)]
    pub enum CoordinateParseError {
        MissingDecimalPoint {
            description("Missing decimal point")
            display("Coordinate has no decimal point")
        }
        InvalidInput(msg: &'static str) {
            description("Invalid input")
            display("Invalid input: {}", msg)
        }
        Degrees(err: num::ParseFloatError) {
            description("Invalid degrees")
            display("Could not parse degrees: {}", err)
            cause(err)
        }
        DecimalMin(err: num::ParseFloatError) {
            description("Invalid decimal minutes")
            display("Could not parse decimal minutes: {}", err)
            cause(err)
        }
    }
}

quick_error! {
    #[derive(Debug, PartialEq)]
    pub enum ConfigError {
        InvalidBounds(smallest_ms: u32, default_ms: u32) {
            description("Invalid refresh period bounds")
            display("Smallest refresh period {} ms exceeds default {} ms", smallest_ms, default_ms)
        }
    }
}
