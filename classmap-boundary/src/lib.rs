use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(feature = "entity-conversions")]
mod conv;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Envelope of every response of the class marketplace API.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ApiResponse<T> {
    pub status: ResponseStatus,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct Error {
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn into_result(self) -> Result<T, Error> {
        let Self {
            status,
            data,
            message,
        } = self;
        match (status, data) {
            (ResponseStatus::Success, Some(data)) => Ok(data),
            (ResponseStatus::Success, None) => Err(Error {
                message: message.unwrap_or_else(|| "Missing response data".to_owned()),
            }),
            (ResponseStatus::Error, _) => Err(Error {
                message: message.unwrap_or_else(|| "Unknown server error".to_owned()),
            }),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Bounding box as expected by the `nearby_class_list` endpoint.
#[rustfmt::skip]
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MapBounds {
    pub min_lat : f64,
    pub max_lat : f64,
    pub min_lng : f64,
    pub max_lng : f64,
}

/// A class with its free-text address, as listed for the map.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ClassLocation {
    pub class_id: i64,
    pub location: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ClassAdditionalData {
    pub class_name: String,
    pub class_description: String,
}

#[rustfmt::skip]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NearbyClass {
    pub class_id        : i64,
    pub class_name      : String,
    pub description     : String,
    pub location        : String,
    #[serde(default)]
    pub cost            : Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude        : Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude       : Option<f64>,
    #[serde(default)]
    pub target_students : Vec<String>,
    #[serde(default)]
    pub curriculums     : Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content         : Option<String>,
}
