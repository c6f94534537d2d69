pub mod class_api;
pub mod kakao;
pub mod notify;
pub mod opencage;

use async_trait::async_trait;
use classmap_core::{
    entities::MapPoint,
    gateways::geocode::{GeoCodingGateway, GeocodeError},
};

/// Used if no geocoding gateway has been configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeocoding;

#[async_trait(?Send)]
impl GeoCodingGateway for NoGeocoding {
    async fn resolve_address(&self, address: &str) -> Result<MapPoint, GeocodeError> {
        log::debug!("Cannot resolve '{address}' because no geocoding gateway was configured");
        Err(GeocodeError::Unavailable)
    }
}

fn coordinate_from_lat_lng_deg(lat: f64, lng: f64) -> Result<MapPoint, GeocodeError> {
    MapPoint::try_from_lat_lng_deg(lat, lng)
        .ok_or_else(|| GeocodeError::InvalidCoordinate(format!("{lat},{lng}")))
}

fn non_empty_address(address: &str) -> Result<&str, GeocodeError> {
    let address = address.trim();
    if address.is_empty() {
        return Err(GeocodeError::EmptyAddress);
    }
    Ok(address)
}
