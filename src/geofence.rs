use std::future::Future;

use crate::error::TimeClockError;
use crate::model::geo::GeoPoint;

/// Mean Earth radius in meters
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance in meters (haversine).
pub fn distance_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METERS * h.sqrt().atan2((1.0 - h).sqrt())
}

pub fn check_within_radius(reported: GeoPoint, reference: GeoPoint, radius_meters: f64) -> bool {
    distance_meters(reported, reference) <= radius_meters
}

/// Circular permitted area around the workplace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geofence {
    pub reference: GeoPoint,
    pub radius_meters: f64,
}

impl Geofence {
    pub fn new(reference: GeoPoint, radius_meters: f64) -> Self {
        Self {
            reference,
            radius_meters,
        }
    }

    /// Distance to the reference point when inside, `OutOfRange` otherwise.
    pub fn check(&self, reported: GeoPoint) -> Result<f64, TimeClockError> {
        let distance = distance_meters(reported, self.reference);
        if distance <= self.radius_meters {
            Ok(distance)
        } else {
            Err(TimeClockError::OutOfRange {
                distance,
                radius: self.radius_meters,
            })
        }
    }
}

/// Source of the device position. Resolves once; no timeout, no retry.
pub trait LocationProvider {
    fn current_position(&self) -> impl Future<Output = Result<GeoPoint, TimeClockError>>;
}

/// Position the client acquired itself and sent along with the request.
/// `None` means the browser denied or does not support geolocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportedPosition(pub Option<GeoPoint>);

impl LocationProvider for ReportedPosition {
    fn current_position(&self) -> impl Future<Output = Result<GeoPoint, TimeClockError>> {
        let result = match self.0 {
            Some(point) if point.is_valid() => Ok(point),
            Some(_) => Err(TimeClockError::validation(
                "A posição informada não é uma latitude/longitude válida",
            )),
            None => Err(TimeClockError::LocationUnavailable),
        };
        std::future::ready(result)
    }
}
