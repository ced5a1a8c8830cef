//! Parses `+CGPSINFO` responses of cellular/GPS modems into validated
//! [`GeoPoint`]s and derives distance, velocity and a recommended GPS
//! refresh period between two of them.
//!
//! ```
//! use gpsinfo::{GeoPoint, MotionCalculator, RefreshConfig};
//!
//! let a = GeoPoint::from_response_line(
//!     "+CGPSINFO: 4300.471406,N,08932.266537,W,200323,183805.0,79.2,0.0,0.0",
//! );
//! let b = GeoPoint::from_response_line(
//!     "+CGPSINFO: 4300.481406,N,08932.266537,W,200323,183815.0,79.4,0.0,0.0",
//! );
//! assert!(a.is_valid() && b.is_valid());
//!
//! let report = MotionCalculator::new(RefreshConfig::default()).calculate(&a, &b);
//! assert!(report.is_valid());
//! assert_eq!(report.time_diff_seconds(), 10.0);
//! ```

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
extern crate arrayvec;
extern crate chrono;
#[macro_use]
extern crate log;
#[macro_use]
extern crate quick_error;

pub mod config;
pub mod datetime;
pub mod err;
pub mod geo;
#[macro_use]
mod macros;
mod lexer;
pub mod motion;
pub mod parser;
pub mod point;

pub use config::RefreshConfig;
pub use datetime::DateTime;
pub use err::{ConfigError, CoordinateParseError, LexError, ParseError};
pub use motion::{MotionCalculator, MotionReport};
pub use parser::{nmea_coordinate_or_sentinel, parse_nmea_coordinate, CgpsParser};
pub use point::GeoPoint;
