use std::{future::Future, time::Duration};

use anyhow::anyhow;
use async_trait::async_trait;
use classmap_core::{
    entities::MapPoint,
    gateways::geocode::{GeoCodingGateway, GeocodeError},
};
use geocoding::{Forward, Opencage, Point};

use crate::{coordinate_from_lat_lng_deg, non_empty_address};

/// Forward geocoding with OpenCage.
#[derive(Debug, Clone)]
pub struct OpenCage {
    api_key: String,
    timeout: Duration,
}

impl OpenCage {
    pub const fn new(api_key: String, timeout: Duration) -> Self {
        Self { api_key, timeout }
    }
}

async fn within<T, F>(timeout: Duration, lookup: F) -> Result<T, GeocodeError>
where
    F: Future<Output = Result<T, GeocodeError>>,
{
    tokio::time::timeout(timeout, lookup)
        .await
        .map_err(|_| anyhow!("No response within {timeout:?}"))?
}

fn first_point(address: &str, points: &[Point<f64>]) -> Result<MapPoint, GeocodeError> {
    let point = points
        .first()
        .ok_or_else(|| GeocodeError::NotFound(address.to_owned()))?;
    coordinate_from_lat_lng_deg(point.y(), point.x())
}

#[async_trait(?Send)]
impl GeoCodingGateway for OpenCage {
    async fn resolve_address(&self, address: &str) -> Result<MapPoint, GeocodeError> {
        let address = non_empty_address(address)?.to_owned();
        let api_key = self.api_key.clone();
        let query = address.clone();
        // The geocoding client is blocking
        let lookup = async move {
            let points: Vec<Point<f64>> =
                tokio::task::spawn_blocking(move || Opencage::new(api_key).forward(&query))
                    .await
                    .map_err(|err| anyhow!("Geocoding task failed: {err}"))?
                    .map_err(|err| anyhow!("{err}"))?;
            Ok::<_, GeocodeError>(points)
        };
        // The blocking request itself keeps running after a timeout.
        let points = within(self.timeout, lookup).await?;
        let pos = first_point(&address, &points)?;
        log::debug!("Resolved address location '{address}': {pos}");
        Ok(pos)
    }
}
