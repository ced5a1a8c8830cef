//! This module provides a parser for the `+CGPSINFO` response of SIMCom style
//! cellular/GPS modems.
//!
//! A response looks like
//!
//! ```text
//! +CGPSINFO: 4300.471406,N,08932.266537,W,200323,183805.0,79.2,0.0,0.0
//! ```
//!
//! with the fields latitude, N/S, longitude, E/W, date (`DDMMYY`), UTC time
//! (`HHMMSS.f`), altitude, speed and course. Speed and course are ignored.

use arrayvec::ArrayVec;
use std::str::{self, FromStr};
use std::{io, iter};

use crate::datetime::DateTime;
use crate::err::{CoordinateParseError, LexError, ParseError};
use crate::lexer::{self, Token, TokenKind, Tokenizer};
use crate::point::GeoPoint;

pub const CGPSINFO_PREFIX: &[u8] = b"+CGPSINFO: ";

/// Returned by [`nmea_coordinate_or_sentinel`] for fields that cannot be
/// converted. Its magnitude is outside every valid coordinate range.
pub const INVALID_COORDINATE: f64 = 99999.99;

/// Number of whole-minute digits in front of the decimal point.
const MINUTES_SPLIT: usize = 2;
const YEAR_OFFSET: u32 = 2000;

/// The cardinal directions.
#[derive(Debug, PartialEq)]
enum CardDir {
    North,
    South,
    East,
    West,
}

impl CardDir {
    fn from_field(field: &str) -> Option<Self> {
        match field {
            "N" => Some(CardDir::North),
            "S" => Some(CardDir::South),
            "E" => Some(CardDir::East),
            "W" => Some(CardDir::West),
            _ => None,
        }
    }
}

/// The parser for modem output that extracts `+CGPSINFO` responses.
///
/// Fields inside a response are converted leniently: integer sub-fields use
/// their leading digits or become 0 (saturating on overflow), a missing or
/// malformed altitude becomes 0.0 and unparsable coordinates become
/// [`INVALID_COORDINATE`]. Fields longer than the tokenizer's buffer are
/// truncated. Validation of the resulting [`GeoPoint`] rejects whatever makes
/// no sense.
pub struct CgpsParser<R: io::Read> {
    lexer: iter::Peekable<Tokenizer<R>>,
}

impl<R: io::Read> CgpsParser<R> {
    /// Create a new parser that parses `input`.
    pub fn new(input: R) -> Result<Self, io::Error> {
        Ok(CgpsParser {
            lexer: Tokenizer::new(input)?.peekable(),
        })
    }

    /// Read one line.
    ///
    /// Returns `Ok(None)` at the end of the input and
    /// `ParseError::UnexpectedResponse` if the line is not a `+CGPSINFO`
    /// response. The rest of the line is consumed in either case.
    pub fn read_response(&mut self) -> Result<Option<GeoPoint>, ParseError> {
        if self.lexer.peek().is_none() {
            return Ok(None);
        }

        match self.parse_line() {
            Ok(pt) => {
                self.skip_line()?;
                trace!("Parsed point: {}", pt);
                Ok(Some(pt))
            }
            Err(e) => {
                self.skip_line()?;
                Err(e)
            }
        }
    }

    fn parse_line(&mut self) -> Result<GeoPoint, ParseError> {
        match accept!(self, Prefix, p)? {
            Some(ref p) if &p[..] == CGPSINFO_PREFIX => (),
            _ => return Err(ParseError::UnexpectedResponse),
        }

        // Parse latitude
        let lat = self.next_field()?;
        let lat = nmea_coordinate_or_sentinel(field_str(&lat));
        let lat = match CardDir::from_field(field_str(&self.next_field()?)) {
            Some(CardDir::South) => -lat,
            _ => lat,
        };

        // Parse longitude
        let long = self.next_field()?;
        let long = nmea_coordinate_or_sentinel(field_str(&long));
        let long = match CardDir::from_field(field_str(&self.next_field()?)) {
            Some(CardDir::West) => -long,
            _ => long,
        };

        // Parse date, DDMMYY
        let date = self.next_field()?;
        let date = field_str(&date);
        let day = lenient_u32(sub_field(date, 0, Some(2)));
        let month = lenient_u32(sub_field(date, 2, Some(4)));
        let year = lenient_u32(sub_field(date, 4, None)).saturating_add(YEAR_OFFSET);

        // Parse utc, HHMMSS with the fraction of seconds dropped
        let time = self.next_field()?;
        let time = field_str(&time).split('.').next().unwrap_or("");
        let hour = lenient_u32(sub_field(time, 0, Some(2)));
        let minute = lenient_u32(sub_field(time, 2, Some(4)));
        let second = lenient_u32(sub_field(time, 4, None));

        let altitude = lenient_f64(field_str(&self.next_field()?));

        let datetime = DateTime::new(year, month, day, hour, minute, second);
        Ok(GeoPoint::with_altitude(datetime, lat, long, altitude))
    }

    /// Consume the next field and its trailing comma. Fields missing at the
    /// end of the line are returned as empty.
    fn next_field(&mut self) -> Result<ArrayVec<[u8; lexer::FIELD_LENGTH]>, ParseError> {
        match accept!(self, Field, f)? {
            Some(f) => {
                accept!(self, CommaSeparator)?;
                Ok(f)
            }
            None => Ok(ArrayVec::new()),
        }
    }

    /// Skips and consumes all tokens up to and including the next line
    /// ending. Only I/O errors are reported.
    fn skip_line(&mut self) -> Result<(), ParseError> {
        loop {
            match self.lexer.next() {
                None => return Ok(()),
                Some(Ok(ref t)) if t.is_line_ending() => return Ok(()),
                Some(Err(LexError::Io(e))) => return Err(LexError::Io(e).into()),
                Some(_) => (),
            }
        }
    }
}

impl<R: io::Read> Iterator for CgpsParser<R> {
    type Item = Result<GeoPoint, ParseError>;

    /// Yields every `+CGPSINFO` response, skipping all other lines.
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.read_response() {
                Ok(Some(pt)) => return Some(Ok(pt)),
                Ok(None) => return None,
                Err(ParseError::UnexpectedResponse) => (),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Convert an NMEA coordinate field `DDDMM.MMMMM` to decimal degrees.
///
/// The last two digits in front of the decimal point and everything after
/// it are minutes, everything before them are degrees. An empty degree part
/// counts as 0. The hemisphere is not part of the field, so the result is
/// not signed by it.
pub fn parse_nmea_coordinate(field: &str) -> Result<f64, CoordinateParseError> {
    let field = field.trim();
    let decimal_pos = field
        .find('.')
        .ok_or(CoordinateParseError::MissingDecimalPoint)?;

    // This check is needed to ensure we don't panic
    if decimal_pos < MINUTES_SPLIT {
        return Err(CoordinateParseError::InvalidInput(
            "fewer than two digits in front of the decimal point",
        ));
    }
    let split = decimal_pos - MINUTES_SPLIT;
    let (deg, min) = match (field.get(..split), field.get(split..)) {
        (Some(deg), Some(min)) => (deg, min),
        _ => {
            return Err(CoordinateParseError::InvalidInput(
                "minutes do not start on a character boundary",
            ))
        }
    };

    let degrees = if deg.is_empty() {
        0.0
    } else {
        f64::from_str(deg).map_err(CoordinateParseError::Degrees)?
    };
    let minutes = f64::from_str(min).map_err(CoordinateParseError::DecimalMin)?;

    let dec_deg = degrees + minutes / 60.0;
    if !dec_deg.is_finite() {
        return Err(CoordinateParseError::InvalidInput("coordinate is not finite"));
    }
    Ok(dec_deg)
}

/// Like [`parse_nmea_coordinate`], but returns [`INVALID_COORDINATE`] instead
/// of an error.
pub fn nmea_coordinate_or_sentinel(field: &str) -> f64 {
    match parse_nmea_coordinate(field) {
        Ok(v) => v,
        Err(e) => {
            debug!("Could not parse coordinate {:?}: {}", field, e);
            INVALID_COORDINATE
        }
    }
}

/// Fields that are not valid UTF-8 are treated as empty.
#[inline]
fn field_str(field: &[u8]) -> &str {
    str::from_utf8(field).unwrap_or("")
}

/// Substring by byte offsets, clamped to the length of `s`. Offsets that do
/// not fall on character boundaries yield an empty string.
fn sub_field(s: &str, start: usize, end: Option<usize>) -> &str {
    let end = end.map_or(s.len(), |e| e.min(s.len()));
    let start = start.min(end);
    s.get(start..end).unwrap_or("")
}

/// Leading decimal digits of `s`, or 0 if there are none. Digit runs too
/// large for a `u32` saturate, so the resulting date is rejected.
fn lenient_u32(s: &str) -> u32 {
    let s = s.trim_start();
    let end = s.bytes().position(|b| !b.is_ascii_digit()).unwrap_or(s.len());
    if end == 0 {
        return 0;
    }
    s[..end].parse().unwrap_or(u32::MAX)
}

/// Longest prefix of `s` that reads as a decimal number with an optional
/// exponent, or 0.0. Values that overflow to infinity become 0.0 as well.
fn lenient_f64(s: &str) -> f64 {
    let s = s.trim();
    let bytes = s.as_bytes();
    let mut end = 0;
    if end < bytes.len() && (bytes[end] == b'-' || bytes[end] == b'+') {
        end += 1;
    }
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'-' || bytes[exp_end] == b'+') {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }
    match s[..end].parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const EPS: f64 = 1e-6;
    const SAMPLE: &str = "+CGPSINFO: 4300.471406,N,08932.266537,W,200323,183805.0,79.2,0.0,0.0";

    fn parse(line: &str) -> Result<Option<GeoPoint>, ParseError> {
        CgpsParser::new(line.as_bytes()).unwrap().read_response()
    }

    #[test]
    fn test_parse_coordinate() {
        let lat = parse_nmea_coordinate("4300.471406").unwrap();
        assert!((lat - 43.00785677).abs() < EPS);
        let long = parse_nmea_coordinate("08932.266537").unwrap();
        assert!((long - 89.53777562).abs() < EPS);
    }

    #[test]
    fn test_parse_coordinate_without_degrees() {
        assert!((parse_nmea_coordinate("30.0").unwrap() - 0.5).abs() < EPS);
    }

    #[rstest]
    #[case("4300")]
    #[case("")]
    #[case("N")]
    #[case("0.5")]
    #[case(".5")]
    #[case("4x00.5")]
    #[case("43ab.5")]
    #[case("é0.5")]
    fn test_coordinate_sentinel(#[case] field: &str) {
        assert_eq!(nmea_coordinate_or_sentinel(field), INVALID_COORDINATE);
    }

    #[test]
    fn test_coordinate_errors() {
        assert_matches!(
            parse_nmea_coordinate("4300"),
            Err(CoordinateParseError::MissingDecimalPoint)
        );
        assert_matches!(
            parse_nmea_coordinate("5.0"),
            Err(CoordinateParseError::InvalidInput(_))
        );
        assert_matches!(
            parse_nmea_coordinate("4x00.5"),
            Err(CoordinateParseError::Degrees(_))
        );
        assert_matches!(
            parse_nmea_coordinate("43ab.5"),
            Err(CoordinateParseError::DecimalMin(_))
        );
    }

    #[test]
    fn test_parse_response() {
        let pt = parse(SAMPLE).unwrap().unwrap();
        assert!(pt.is_valid());
        assert!((pt.latitude() - 43.00785677).abs() < EPS);
        assert!((pt.longitude() + 89.53777562).abs() < EPS);
        let dt = pt.datetime();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2023, 3, 20));
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (18, 38, 5));
        assert!((pt.altitude() - 79.2).abs() < EPS);
    }

    #[test]
    fn test_hemispheres() {
        let pt = parse("+CGPSINFO: 3352.128,S,15112.558,E,010124,000000.0,10.0")
            .unwrap()
            .unwrap();
        assert!(pt.latitude() < 0.0);
        assert!(pt.longitude() > 0.0);

        // only S negates the latitude and only W the longitude
        let pt = parse("+CGPSINFO: 3352.128,W,15112.558,S,010124,000000.0,10.0")
            .unwrap()
            .unwrap();
        assert!(pt.latitude() > 0.0);
        assert!(pt.longitude() > 0.0);
    }

    #[test]
    fn test_wide_fraction_of_seconds() {
        let pt = parse("+CGPSINFO: 4300.471406,N,08932.266537,W,200323,183805.00,79.2,0.0,0.0")
            .unwrap()
            .unwrap();
        assert!((pt.altitude() - 79.2).abs() < EPS);
        assert_eq!(pt.datetime().second(), 5);
    }

    #[test]
    fn test_no_fix() {
        let pt = parse("+CGPSINFO: ,,,,,,,,\r\n").unwrap().unwrap();
        assert!(!pt.is_valid());
        assert_eq!(pt.latitude(), INVALID_COORDINATE);
        assert_eq!(pt.longitude(), INVALID_COORDINATE);
        assert_eq!(pt.altitude(), 0.0);
    }

    #[test]
    fn test_truncated_response() {
        let pt = parse("+CGPSINFO: 4300.471406,N,08932.266537,W")
            .unwrap()
            .unwrap();
        assert!(!pt.is_valid());
        assert!(!pt.datetime().is_valid());
        assert!((pt.latitude() - 43.00785677).abs() < EPS);
        assert_eq!(pt.altitude(), 0.0);
    }

    #[test]
    fn test_lenient_fields() {
        let pt = parse("+CGPSINFO: 4300.471406,N,08932.266537,W,2a0323,18x805,high")
            .unwrap()
            .unwrap();
        assert_eq!(pt.datetime().day(), 2);
        assert_eq!(pt.datetime().minute(), 0);
        assert_eq!(pt.altitude(), 0.0);
    }

    #[test]
    fn test_unexpected_response() {
        assert_matches!(parse("OK"), Err(ParseError::UnexpectedResponse));
        assert_matches!(parse("+CGPSINFO:4300.47,N"), Err(ParseError::UnexpectedResponse));
        assert_matches!(parse(" +CGPSINFO: 4300.47,N"), Err(ParseError::UnexpectedResponse));
        assert_matches!(parse(""), Ok(None));
    }

    #[test]
    fn test_oversized_coordinate() {
        let line = format!("+CGPSINFO: {},N,08932.266537,W,200323,183805.0\nOK", "1".repeat(100));
        let mut parser = CgpsParser::new(line.as_bytes()).unwrap();
        let pt = parser.read_response().unwrap().unwrap();
        assert!(!pt.is_valid());
        assert_eq!(pt.latitude(), INVALID_COORDINATE);
        assert!((pt.longitude() + 89.53777562).abs() < EPS);
        assert_matches!(parser.read_response(), Err(ParseError::UnexpectedResponse));
        assert_matches!(parser.read_response(), Ok(None));
    }

    #[test]
    fn test_oversized_altitude() {
        let line = format!(
            "+CGPSINFO: 4300.471406,N,08932.266537,W,200323,183805.0,79.2{},0.0,0.0",
            "0".repeat(40)
        );
        let pt = parse(&line).unwrap().unwrap();
        assert!(pt.is_valid());
        assert!((pt.latitude() - 43.00785677).abs() < EPS);
        assert!((pt.longitude() + 89.53777562).abs() < EPS);
        assert!((pt.altitude() - 79.2).abs() < EPS);
    }

    #[test]
    fn test_overlong_date_is_invalid() {
        let pt = parse("+CGPSINFO: 4300.471406,N,08932.266537,W,200399999999999,183805.0,79.2")
            .unwrap()
            .unwrap();
        assert!(!pt.is_valid());
        assert!(!pt.datetime().is_valid());
        assert_eq!(pt.datetime().year(), u32::MAX);
    }

    #[test]
    fn test_iterate_modem_output() {
        let output = format!(
            "AT+CGPSINFO\r\n{}\r\n\r\nOK\r\n+CGPSINFO: ,,,,,,,,\r\n{}",
            SAMPLE, SAMPLE
        );
        let points: Vec<_> = CgpsParser::new(output.as_bytes())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(points.len(), 3);
        assert!(points[0].is_valid());
        assert!(!points[1].is_valid());
        assert_eq!(points[0], points[2]);
    }

    #[test]
    fn test_lenient_numbers() {
        assert_eq!(lenient_u32("18"), 18);
        assert_eq!(lenient_u32("7x"), 7);
        assert_eq!(lenient_u32("x7"), 0);
        assert_eq!(lenient_u32(""), 0);
        assert_eq!(lenient_f64("-12.5m"), -12.5);
        assert_eq!(lenient_f64("nan"), 0.0);
        assert_eq!(lenient_f64("."), 0.0);
        assert_eq!(lenient_u32("99999999999"), u32::MAX);
        assert_eq!(lenient_f64("1.5e2"), 150.0);
        assert_eq!(lenient_f64("-2E-1m"), -0.2);
        assert_eq!(lenient_f64("3e"), 3.0);
        assert_eq!(lenient_f64("4e+x"), 4.0);
        assert_eq!(lenient_f64("1e999"), 0.0);
        assert_eq!(sub_field("2", 0, Some(2)), "2");
        assert_eq!(sub_field("2", 2, Some(4)), "");
        assert_eq!(sub_field("200323", 4, None), "23");
    }
}
