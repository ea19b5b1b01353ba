use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};
use dotenvy::dotenv;

use crate::geofence::Geofence;
use crate::model::geo::GeoPoint;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub api_prefix: String,
    pub store_path: String,
    pub log_dir: String,

    // Geofence
    pub geofence_enabled: bool,
    pub geofence_lat: f64,
    pub geofence_lng: f64,
    pub geofence_radius_meters: f64,

    // Rate limiting, 0 disables
    pub rate_register_per_min: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:8080".to_string(),
            api_prefix: "/api".to_string(),
            store_path: "data/timeclock.json".to_string(),
            log_dir: "logs".to_string(),
            geofence_enabled: true,
            geofence_lat: -27.623424,
            geofence_lng: -48.5359616,
            geofence_radius_meters: 1000.0,
            rate_register_per_min: 30,
        }
    }
}

/// Reads `key`, falling back to `default` when unset.
fn var_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        let defaults = Config::default();

        let config = Self {
            server_addr: var_or("SERVER_ADDR", defaults.server_addr)?,
            api_prefix: var_or("API_PREFIX", defaults.api_prefix)?,
            store_path: var_or("STORE_PATH", defaults.store_path)?,
            log_dir: var_or("LOG_DIR", defaults.log_dir)?,

            geofence_enabled: var_or("GEOFENCE_ENABLED", defaults.geofence_enabled)?,
            geofence_lat: var_or("GEOFENCE_LAT", defaults.geofence_lat)?,
            geofence_lng: var_or("GEOFENCE_LNG", defaults.geofence_lng)?,
            geofence_radius_meters: var_or(
                "GEOFENCE_RADIUS_METERS",
                defaults.geofence_radius_meters,
            )?,

            rate_register_per_min: var_or("RATE_REGISTER_PER_MIN", defaults.rate_register_per_min)?,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.geofence_enabled {
            anyhow::ensure!(
                GeoPoint::new(self.geofence_lat, self.geofence_lng).is_valid(),
                "GEOFENCE_LAT/GEOFENCE_LNG are not a valid position"
            );
            anyhow::ensure!(
                self.geofence_radius_meters.is_finite() && self.geofence_radius_meters >= 0.0,
                "GEOFENCE_RADIUS_METERS must be a non-negative number"
            );
        }
        Ok(())
    }

    /// The configured gate, `None` when the geofence is switched off.
    pub fn geofence(&self) -> Option<Geofence> {
        self.geofence_enabled.then(|| {
            Geofence::new(
                GeoPoint::new(self.geofence_lat, self.geofence_lng),
                self.geofence_radius_meters,
            )
        })
    }
}
