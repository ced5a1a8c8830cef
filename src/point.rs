//! A single GPS fix.

use std::fmt;

use crate::datetime::DateTime;
use crate::err::{LexError, ParseError};
use crate::geo::{haversine, EARTH_RADIUS_IN_MILES};
use crate::parser::CgpsParser;

pub const ABS_MAX_LAT: f64 = 90.0;
pub const ABS_MAX_LONG: f64 = 180.0;

/// A position with timestamp and altitude.
///
/// Points are immutable apart from [`GeoPoint::copy_from`]; every
/// constructor except `default()` validates before returning, so
/// [`GeoPoint::is_valid`] always reflects the current fields.
/// `GeoPoint::default()` is the all-zero, invalid point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoPoint {
    datetime: DateTime,
    /// Latitude in decimal degrees, negative on the southern hemisphere.
    latitude: f64,
    /// Longitude in decimal degrees, negative on the western hemisphere.
    longitude: f64,
    altitude: f64,
    is_valid: bool,
}

impl GeoPoint {
    pub fn new(datetime: DateTime, latitude: f64, longitude: f64) -> Self {
        GeoPoint::with_altitude(datetime, latitude, longitude, 0.0)
    }

    pub fn with_altitude(datetime: DateTime, latitude: f64, longitude: f64, altitude: f64) -> Self {
        let mut pt = GeoPoint {
            datetime,
            latitude,
            longitude,
            altitude,
            is_valid: false,
        };
        pt.validate();
        pt
    }

    /// Parses a single `+CGPSINFO: ` response line.
    ///
    /// Anything that is not such a response yields `GeoPoint::default()`.
    /// Malformed fields inside a response are coerced as described in
    /// [`CgpsParser`], and the resulting point is validated.
    pub fn from_response_line(line: &str) -> GeoPoint {
        let result = CgpsParser::new(line.as_bytes())
            .map_err(|e| ParseError::from(LexError::from(e)))
            .and_then(|mut parser| parser.read_response());

        match result {
            Ok(Some(pt)) => pt,
            Ok(None) => GeoPoint::default(),
            Err(e) => {
                debug!("Rejecting modem response {:?}: {}", line, e);
                GeoPoint::default()
            }
        }
    }

    /// Recomputes and returns the validity flag.
    ///
    /// A point is valid if its timestamp is valid and latitude and longitude
    /// lie within `[-90, 90]` and `[-180, 180]`. NaN is out of range.
    pub fn validate(&mut self) -> bool {
        self.is_valid = self.datetime.is_valid()
            && (-ABS_MAX_LAT..=ABS_MAX_LAT).contains(&self.latitude)
            && (-ABS_MAX_LONG..=ABS_MAX_LONG).contains(&self.longitude);
        self.is_valid
    }

    /// Overwrites all fields with the ones of `other` and revalidates.
    pub fn copy_from(&mut self, other: &GeoPoint) -> bool {
        self.datetime = other.datetime;
        self.latitude = other.latitude;
        self.longitude = other.longitude;
        self.altitude = other.altitude;
        self.validate()
    }

    /// Great-circle distance to `other`, regardless of validity.
    pub fn distance_in_miles(&self, other: &GeoPoint) -> f64 {
        haversine(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
            EARTH_RADIUS_IN_MILES,
        )
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn datetime(&self) -> &DateTime {
        &self.datetime
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn altitude(&self) -> f64 {
        self.altitude
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid {
            return f.write_str("Invalid GPS Point");
        }
        write!(
            f,
            "Date/Time: {}, Latitude: {:.6}, Longitude: {:.6}, Altitude: {:.6}",
            self.datetime, self.latitude, self.longitude, self.altitude
        )
    }
}
