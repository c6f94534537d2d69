use std::time::Duration;

use async_trait::async_trait;
use classmap_boundary as json;
use classmap_core::{
    entities::{BoundingBox, ClassId, ClassSummary, NearbyClass},
    gateways::classes::{ClassSummaryGateway, NearbyClassesGateway, SummaryFetchError},
};
use serde::de::DeserializeOwned;

/// Client of the class marketplace API.
#[derive(Debug, Clone)]
pub struct ClassApi {
    url: String,
    client: reqwest::Client,
}

impl ClassApi {
    pub fn new(url: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let url = url.trim_end_matches('/').to_owned();
        Ok(Self { url, client })
    }

    fn class_summary_request(&self, id: ClassId) -> reqwest::RequestBuilder {
        let url = format!("{}/class_additional_data/{id}", self.url);
        self.client.get(url)
    }

    fn nearby_classes_request(&self, bounds: &BoundingBox) -> reqwest::RequestBuilder {
        let url = format!("{}/nearby_class_list", self.url);
        self.client
            .get(url)
            .query(&json::MapBounds::from(*bounds))
    }
}

async fn into_data<T>(request: reqwest::RequestBuilder) -> Result<T, SummaryFetchError>
where
    T: DeserializeOwned,
{
    let response = request.send().await.map_err(anyhow::Error::from)?;
    // The API reports failures in the envelope, regardless of the HTTP status.
    let envelope = response
        .json::<json::ApiResponse<T>>()
        .await
        .map_err(anyhow::Error::from)?;
    envelope
        .into_result()
        .map_err(|err| SummaryFetchError::Api(err.message))
}

#[async_trait(?Send)]
impl ClassSummaryGateway for ClassApi {
    async fn class_summary(&self, id: ClassId) -> Result<ClassSummary, SummaryFetchError> {
        let data: json::ClassAdditionalData = into_data(self.class_summary_request(id)).await?;
        Ok(data.into())
    }
}

#[async_trait(?Send)]
impl NearbyClassesGateway for ClassApi {
    async fn nearby_classes(
        &self,
        bounds: &BoundingBox,
    ) -> Result<Vec<NearbyClass>, SummaryFetchError> {
        let classes: Vec<json::NearbyClass> =
            into_data(self.nearby_classes_request(bounds)).await?;
        log::debug!("Found {} classes nearby", classes.len());
        Ok(classes.into_iter().map(Into::into).collect())
    }
}
