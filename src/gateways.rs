use crate::config::{self, GeocodingGateway};
use anyhow::Result;
use async_trait::async_trait;
use classmap_core::{
    entities::MapPoint,
    gateways::geocode::{GeoCodingGateway, GeocodeError},
};
use classmap_gateways::{class_api::ClassApi, kakao::Kakao, opencage::OpenCage, NoGeocoding};
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub fn class_api(cfg: &config::Api) -> Result<ClassApi> {
    log::debug!("Use class API at {}", cfg.url);
    ClassApi::new(cfg.url.clone(), cfg.timeout.unwrap_or(DEFAULT_TIMEOUT))
}

pub fn geocoding_gateway(cfg: &config::Geocoding) -> Result<Geocoder> {
    let gw = match &cfg.gateway {
        Some(GeocodingGateway::Kakao { api_url, api_key }) => {
            log::info!("Use Kakao geocoding gateway");
            let api_url = api_url
                .clone()
                .unwrap_or_else(|| classmap_gateways::kakao::DEFAULT_API_URL.to_owned());
            let timeout = cfg.timeout.unwrap_or(DEFAULT_TIMEOUT);
            Geocoder::Kakao(Kakao::new(api_url, api_key.clone(), timeout)?)
        }
        Some(GeocodingGateway::OpenCage { api_key }) => {
            log::info!("Use OpenCage geocoding gateway");
            let timeout = cfg.timeout.unwrap_or(DEFAULT_TIMEOUT);
            Geocoder::OpenCage(OpenCage::new(api_key.clone(), timeout))
        }
        None => {
            log::warn!("No geocoding gateway was configured: addresses cannot be resolved");
            Geocoder::None(NoGeocoding)
        }
    };
    Ok(gw)
}

#[derive(Debug)]
pub enum Geocoder {
    Kakao(Kakao),
    OpenCage(OpenCage),
    None(NoGeocoding),
}

#[async_trait(?Send)]
impl GeoCodingGateway for Geocoder {
    async fn resolve_address(&self, address: &str) -> Result<MapPoint, GeocodeError> {
        match self {
            Self::Kakao(gw) => gw.resolve_address(address).await,
            Self::OpenCage(gw) => gw.resolve_address(address).await,
            Self::None(gw) => gw.resolve_address(address).await,
        }
    }
}
