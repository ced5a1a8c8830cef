//! Unit conversions and great-circle geometry shared by points and the
//! motion calculator.

/// Mean radius of the earth in statute miles.
pub const EARTH_RADIUS_IN_MILES: f64 = 3958.8;
pub const FEET_PER_MILE: f64 = 5280.0;
pub const SECONDS_PER_HOUR: f64 = 3600.0;

#[inline]
pub fn convert_degrees_to_radians(deg: f64) -> f64 {
    deg.to_radians()
}

#[inline]
pub fn convert_miles_to_feet(miles: f64) -> f64 {
    miles * FEET_PER_MILE
}

/// Great-circle distance between two positions given in decimal degrees.
///
/// The result is in the unit of `radius`. The intermediate haversine term is
/// clamped to `[0, 1]` so rounding near antipodal points cannot produce NaN.
pub fn haversine(lat1: f64, lng1: f64, lat2: f64, lng2: f64, radius: f64) -> f64 {
    let lat_delta = convert_degrees_to_radians(lat2 - lat1);
    let lng_delta = convert_degrees_to_radians(lng2 - lng1);

    let lat1_rad = convert_degrees_to_radians(lat1);
    let lat2_rad = convert_degrees_to_radians(lat2);

    let a = (lat_delta / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (lng_delta / 2.0).sin().powi(2);
    let a = a.clamp(0.0, 1.0);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    radius * c
}
