//! Distance, velocity and sampling recommendations between two fixes.

use std::fmt;

use crate::config::RefreshConfig;
use crate::geo::{convert_miles_to_feet, haversine, EARTH_RADIUS_IN_MILES, SECONDS_PER_HOUR};
use crate::point::GeoPoint;

/// Desired distance between two consecutive samples (50 yards).
pub const SAMPLE_SPACING_FEET: f64 = 150.0;

/// Motion between two points.
///
/// All metrics are zero unless both points were valid. The recommended
/// refresh period is always set and always lies within the bounds of the
/// [`RefreshConfig`] it was computed with.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionReport {
    is_valid: bool,
    distance_feet: f64,
    distance_miles: f64,
    time_diff_seconds: f64,
    time_diff_hours: f64,
    velocity_feet_per_second: f64,
    velocity_miles_per_hour: f64,
    recommended_refresh_period_ms: f64,
}

impl MotionReport {
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn distance_feet(&self) -> f64 {
        self.distance_feet
    }

    pub fn distance_miles(&self) -> f64 {
        self.distance_miles
    }

    /// Elapsed time between the two points, never negative.
    pub fn time_diff_seconds(&self) -> f64 {
        self.time_diff_seconds
    }

    pub fn time_diff_hours(&self) -> f64 {
        self.time_diff_hours
    }

    pub fn velocity_feet_per_second(&self) -> f64 {
        self.velocity_feet_per_second
    }

    pub fn velocity_miles_per_hour(&self) -> f64 {
        self.velocity_miles_per_hour
    }

    pub fn recommended_refresh_period_ms(&self) -> f64 {
        self.recommended_refresh_period_ms
    }
}

impl fmt::Display for MotionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid {
            return write!(
                f,
                "Invalid motion, recommended refresh period: {:.0} ms",
                self.recommended_refresh_period_ms
            );
        }
        write!(
            f,
            "Distance: {:.1} ft ({:.4} mi), Time: {:.0} s, Velocity: {:.2} ft/s ({:.2} mph), \
             recommended refresh period: {:.0} ms",
            self.distance_feet,
            self.distance_miles,
            self.time_diff_seconds,
            self.velocity_feet_per_second,
            self.velocity_miles_per_hour,
            self.recommended_refresh_period_ms
        )
    }
}

/// Computes [`MotionReport`]s with a fixed set of refresh period bounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct MotionCalculator {
    config: RefreshConfig,
}

impl MotionCalculator {
    pub fn new(config: RefreshConfig) -> Self {
        MotionCalculator { config }
    }

    pub fn config(&self) -> &RefreshConfig {
        &self.config
    }

    /// Motion from `first` to `second`.
    ///
    /// The time difference is the absolute elapsed time, so the order of the
    /// points does not matter.
    pub fn calculate(&self, first: &GeoPoint, second: &GeoPoint) -> MotionReport {
        let mut report = MotionReport::default();

        if first.is_valid() && second.is_valid() {
            report.distance_miles = haversine(
                first.latitude(),
                first.longitude(),
                second.latitude(),
                second.longitude(),
                EARTH_RADIUS_IN_MILES,
            );
            report.distance_feet = convert_miles_to_feet(report.distance_miles);

            report.time_diff_seconds =
                first.datetime().diff_in_seconds(second.datetime()).abs() as f64;
            report.time_diff_hours = report.time_diff_seconds / SECONDS_PER_HOUR;

            report.velocity_feet_per_second = if report.time_diff_seconds == 0.0 {
                0.0
            } else {
                report.distance_feet / report.time_diff_seconds
            };
            report.velocity_miles_per_hour = if report.time_diff_hours == 0.0 {
                0.0
            } else {
                report.distance_miles / report.time_diff_hours
            };

            report.is_valid = true;
        } else {
            debug!("Skipping motion calculation for invalid points");
        }

        report.recommended_refresh_period_ms =
            self.recommend_refresh_period(report.velocity_feet_per_second);
        report
    }

    /// Refresh period in milliseconds that yields one sample every
    /// [`SAMPLE_SPACING_FEET`] at `velocity_fps`, clamped to the configured
    /// bounds. A velocity of zero yields the default period.
    pub fn recommend_refresh_period(&self, velocity_fps: f64) -> f64 {
        let smallest = f64::from(self.config.smallest_ms());
        let default = f64::from(self.config.default_ms());

        let mut period = if velocity_fps == 0.0 || velocity_fps.is_nan() {
            default
        } else {
            1000.0 * SAMPLE_SPACING_FEET / velocity_fps
        };

        if period < smallest {
            period = smallest;
        }
        if period > default {
            period = default;
        }
        period
    }
}
