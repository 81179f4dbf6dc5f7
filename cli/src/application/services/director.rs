//! Application service — director manifest and deployed product lookups.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through the injected [`RequestService`].

use anyhow::{Context, Result};

use crate::application::ports::{ApiResponse, Method, RequestService};
use crate::domain::error::ApiError;
use crate::domain::manifest::{DirectorManifest, decode_products, find_product_guid};

pub const DIRECTOR_MANIFEST_PATH: &str = "/api/v0/deployed/director/manifest";
pub const DEPLOYED_PRODUCTS_PATH: &str = "/api/v0/deployed/products";

/// Fetch and decode the director manifest.
///
/// # Errors
///
/// Returns an error if the request fails, returns a non-success status, or
/// the body is not a manifest with at least one job.
pub async fn fetch_director_manifest(api: &impl RequestService) -> Result<DirectorManifest> {
    let response = get(api, DIRECTOR_MANIFEST_PATH)
        .await
        .context("failed to get director manifest")?;
    let manifest =
        DirectorManifest::from_json(&response.body).context("failed to get director manifest")?;
    Ok(manifest)
}

/// Resolve the GUID of the first deployed product whose type is `name`.
///
/// # Errors
///
/// Returns an error if the request fails, the body is not a product list, or
/// no product matches `name`.
pub async fn resolve_product_guid(api: &impl RequestService, name: &str) -> Result<String> {
    let response = get(api, DEPLOYED_PRODUCTS_PATH)
        .await
        .context("failed to get deployed products")?;
    let products = decode_products(&response.body).context("failed to get deployed products")?;
    let guid = find_product_guid(&products, name)?;
    Ok(guid.to_string())
}

async fn get(api: &impl RequestService, path: &str) -> Result<ApiResponse> {
    tracing::debug!(path, "requesting");
    let response = api.invoke(path, Method::Get).await?;
    if !(200..300).contains(&response.status) {
        return Err(ApiError::Status {
            path: path.to_string(),
            status: response.status,
            body: String::from_utf8_lossy(&response.body).into_owned(),
        }
        .into());
    }
    Ok(response)
}
