use async_trait::async_trait;
use thiserror::Error;

use crate::entities::{BoundingBox, ClassId, ClassSummary, NearbyClass};

#[derive(Debug, Error)]
pub enum SummaryFetchError {
    #[error("The server rejected the request: {0}")]
    Api(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[async_trait(?Send)]
pub trait ClassSummaryGateway {
    async fn class_summary(&self, id: ClassId) -> Result<ClassSummary, SummaryFetchError>;
}

#[async_trait(?Send)]
pub trait NearbyClassesGateway {
    async fn nearby_classes(
        &self,
        bounds: &BoundingBox,
    ) -> Result<Vec<NearbyClass>, SummaryFetchError>;
}
