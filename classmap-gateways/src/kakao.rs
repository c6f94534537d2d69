use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use classmap_core::{
    entities::MapPoint,
    gateways::geocode::{GeoCodingGateway, GeocodeError},
};
use serde::Deserialize;

use crate::{coordinate_from_lat_lng_deg, non_empty_address};

pub const DEFAULT_API_URL: &str = "https://dapi.kakao.com/v2/local/search/address.json";

/// Address search of the Kakao Local REST API.
#[derive(Debug, Clone)]
pub struct Kakao {
    api_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl Kakao {
    pub fn new(api_url: String, api_key: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_url,
            api_key,
            client,
        })
    }

    fn auth_header_value(&self) -> String {
        format!("KakaoAK {}", self.api_key)
    }
}

#[derive(Debug, Deserialize)]
struct AddressSearchResponse {
    documents: Vec<Document>,
}

#[derive(Debug, Deserialize)]
struct Document {
    /// Longitude
    x: String,
    /// Latitude
    y: String,
}

#[derive(Debug, Deserialize, thiserror::Error)]
#[error("{message}")]
struct JsonError {
    message: String,
}

fn first_coordinate(
    address: &str,
    response: AddressSearchResponse,
) -> Result<MapPoint, GeocodeError> {
    let Some(Document { x, y }) = response.documents.into_iter().next() else {
        return Err(GeocodeError::NotFound(address.to_owned()));
    };
    let lat = y
        .parse::<f64>()
        .map_err(|_| GeocodeError::InvalidCoordinate(y.clone()))?;
    let lng = x
        .parse::<f64>()
        .map_err(|_| GeocodeError::InvalidCoordinate(x.clone()))?;
    coordinate_from_lat_lng_deg(lat, lng)
}

#[async_trait(?Send)]
impl GeoCodingGateway for Kakao {
    async fn resolve_address(&self, address: &str) -> Result<MapPoint, GeocodeError> {
        let address = non_empty_address(address)?;
        let response = self
            .client
            .get(&self.api_url)
            .query(&[("query", address)])
            .header("Authorization", self.auth_header_value())
            .send()
            .await
            .map_err(anyhow::Error::from)?;
        if !response.status().is_success() {
            let status = response.status();
            let err = response
                .json::<JsonError>()
                .await
                .map(|err| anyhow!("{status}: {err}"))
                .unwrap_or_else(|_| anyhow!("{status}"));
            return Err(err.into());
        }
        let response = response
            .json::<AddressSearchResponse>()
            .await
            .map_err(anyhow::Error::from)?;
        let pos = first_coordinate(address, response)?;
        log::debug!("Resolved address location '{address}': {pos}");
        Ok(pos)
    }
}
