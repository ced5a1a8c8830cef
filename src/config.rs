//! Bounds for the recommended GPS refresh period.

use crate::err::ConfigError;

/// Refresh period used when nothing better can be recommended, and the
/// longest period ever recommended.
pub const GPS_REFRESH_PERIOD_DEFAULT_MS: u32 = 30_000;
/// Shortest refresh period ever recommended.
pub const GPS_REFRESH_PERIOD_SMALLEST_MS: u32 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshConfig {
    default_ms: u32,
    smallest_ms: u32,
}

impl RefreshConfig {
    /// Fails if `smallest_ms` is larger than `default_ms`.
    pub fn new(default_ms: u32, smallest_ms: u32) -> Result<Self, ConfigError> {
        if smallest_ms > default_ms {
            return Err(ConfigError::InvalidBounds(smallest_ms, default_ms));
        }
        Ok(RefreshConfig {
            default_ms,
            smallest_ms,
        })
    }

    pub fn default_ms(&self) -> u32 {
        self.default_ms
    }

    pub fn smallest_ms(&self) -> u32 {
        self.smallest_ms
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        RefreshConfig {
            default_ms: GPS_REFRESH_PERIOD_DEFAULT_MS,
            smallest_ms: GPS_REFRESH_PERIOD_SMALLEST_MS,
        }
    }
}
