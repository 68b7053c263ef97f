//! Service index returned by `GET /`.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}
