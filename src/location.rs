//! Geolocation provider contract.
//!
//! Supplies GPS coordinates for location sharing, or fails when permission
//! is denied or positioning is unsupported. Failures are opaque upstream
//! errors; the caller falls back to asking the user for an address.

use async_trait::async_trait;

use crate::error::Result;
use crate::request::Location;

/// Supplies the device's current position.
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    /// Get the current position as [`Location::Coordinates`].
    ///
    /// # Errors
    /// Returns an `Upstream` error when access is denied or positioning is
    /// unavailable.
    async fn current_position(&self) -> Result<Location>;
}

/// Provider that always reports a fixed position, for wiring and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition {
    pub latitude: f64,
    pub longitude: f64,
}

#[async_trait]
impl GeolocationProvider for FixedPosition {
    async fn current_position(&self) -> Result<Location> {
        Ok(Location::Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        })
    }
}

/// Provider that always fails, mimicking a denied permission prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionUnavailable;

#[async_trait]
impl GeolocationProvider for PositionUnavailable {
    async fn current_position(&self) -> Result<Location> {
        Err(anyhow::anyhow!("Location access denied").into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HelplineError;

    #[tokio::test]
    async fn fixed_position_yields_coordinates() {
        let provider = FixedPosition {
            latitude: 51.5072,
            longitude: -0.1276,
        };
        let location = provider.current_position().await.unwrap();
        assert_eq!(
            location,
            Location::Coordinates {
                latitude: 51.5072,
                longitude: -0.1276
            }
        );
    }

    #[tokio::test]
    async fn unavailable_position_is_an_upstream_failure() {
        let result = PositionUnavailable.current_position().await;
        assert!(matches!(result, Err(HelplineError::Upstream(_))));
    }
}
