//! Director manifest and deployed product documents.
//!
//! Pure decoding only. Fetching lives in
//! `crate::application::services::director`.

use serde::Deserialize;

use crate::domain::error::ApiError;

/// Director address and client secret decoded from the manifest returned by
/// `GET /api/v0/deployed/director/manifest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorManifest {
    director_address: String,
    ops_manager_client_secret: String,
}

// Only the fields needed to reach the director are decoded; everything else
// in the document is ignored.
#[derive(Deserialize)]
struct RawManifest {
    jobs: Vec<Job>,
}

#[derive(Deserialize)]
struct Job {
    properties: JobProperties,
}

#[derive(Deserialize)]
struct JobProperties {
    director: DirectorProperties,
    uaa: UaaProperties,
}

#[derive(Deserialize)]
struct DirectorProperties {
    address: String,
}

#[derive(Deserialize)]
struct UaaProperties {
    clients: UaaClients,
}

#[derive(Deserialize)]
struct UaaClients {
    ops_manager: UaaClient,
}

#[derive(Deserialize)]
struct UaaClient {
    secret: String,
}

impl DirectorManifest {
    /// Decode a manifest body, reading the first job.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] if the body is not a manifest document
    /// and [`ApiError::NoJobs`] if it decodes but carries no jobs.
    pub fn from_json(body: &[u8]) -> Result<Self, ApiError> {
        let raw: RawManifest = serde_json::from_slice(body).map_err(|source| ApiError::Decode {
            what: "director manifest",
            source,
        })?;
        let job = raw.jobs.into_iter().next().ok_or(ApiError::NoJobs)?;
        Ok(Self {
            director_address: job.properties.director.address,
            ops_manager_client_secret: job.properties.uaa.clients.ops_manager.secret,
        })
    }

    #[must_use]
    pub fn director_address(&self) -> &str {
        &self.director_address
    }

    #[must_use]
    pub fn ops_manager_client_secret(&self) -> &str {
        &self.ops_manager_client_secret
    }
}

/// One entry of `GET /api/v0/deployed/products`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeployedProduct {
    #[serde(default)]
    pub installation_name: String,
    pub guid: String,
    #[serde(rename = "type")]
    pub product_type: String,
}

/// Decode the deployed products list.
///
/// # Errors
///
/// Returns [`ApiError::Decode`] if the body is not a product list.
pub fn decode_products(body: &[u8]) -> Result<Vec<DeployedProduct>, ApiError> {
    serde_json::from_slice(body).map_err(|source| ApiError::Decode {
        what: "deployed products",
        source,
    })
}

/// Return the GUID of the first product whose type is `name`.
///
/// # Errors
///
/// Returns [`ApiError::ProductNotFound`] when no product matches.
pub fn find_product_guid<'a>(
    products: &'a [DeployedProduct],
    name: &str,
) -> Result<&'a str, ApiError> {
    products
        .iter()
        .find(|p| p.product_type == name)
        .map(|p| p.guid.as_str())
        .ok_or_else(|| ApiError::ProductNotFound(name.to_string()))
}
