use async_trait::async_trait;
use thiserror::Error;

use crate::entities::MapPoint;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("The address '{0}' could not be resolved")]
    NotFound(String),
    #[error("The address is empty")]
    EmptyAddress,
    #[error("No geocoding gateway available")]
    Unavailable,
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[async_trait(?Send)]
pub trait GeoCodingGateway {
    async fn resolve_address(&self, address: &str) -> Result<MapPoint, GeocodeError>;
}
