//! Tests for the director manifest and deployed product lookups.

#![allow(clippy::expect_used)]

use execute_on_opsman::application::services::director::{
    DEPLOYED_PRODUCTS_PATH, DIRECTOR_MANIFEST_PATH, fetch_director_manifest, resolve_product_guid,
};
use execute_on_opsman::domain::ApiError;

use crate::fakes::FakeOpsManager;

#[tokio::test]
async fn test_fetch_director_manifest_extracts_address_and_secret() {
    let api = FakeOpsManager::healthy();

    let manifest = fetch_director_manifest(&api).await.expect("manifest");

    assert_eq!(manifest.director_address(), "10.0.4.2");
    assert_eq!(manifest.ops_manager_client_secret(), "opsman_secret");
    assert_eq!(api.call_count(), 1);
}

#[tokio::test]
async fn test_fetch_director_manifest_malformed_body() {
    let api = FakeOpsManager::new().with(DIRECTOR_MANIFEST_PATH, 200, "not json");

    let err = fetch_director_manifest(&api).await.expect_err("decode");

    assert_eq!(err.to_string(), "failed to get director manifest");
    assert!(matches!(
        err.downcast_ref::<ApiError>(),
        Some(ApiError::Decode { what: "director manifest", .. })
    ));
}

#[tokio::test]
async fn test_resolve_product_guid_returns_matching_guid() {
    let api = FakeOpsManager::healthy();

    let guid = resolve_product_guid(&api, "cf").await.expect("guid");

    assert_eq!(guid, "cf-guid");
    assert_eq!(api.calls()[0].0, DEPLOYED_PRODUCTS_PATH);
}

#[tokio::test]
async fn test_resolve_product_guid_first_match_wins() {
    let api = FakeOpsManager::new().with(
        DEPLOYED_PRODUCTS_PATH,
        200,
        r#"[
            {"installation_name": "cf-a", "guid": "cf-a", "type": "cf"},
            {"installation_name": "cf-b", "guid": "cf-b", "type": "cf"}
        ]"#,
    );

    let guid = resolve_product_guid(&api, "cf").await.expect("guid");

    assert_eq!(guid, "cf-a");
}

#[tokio::test]
async fn test_resolve_product_guid_empty_list() {
    let api = FakeOpsManager::new().with(DEPLOYED_PRODUCTS_PATH, 200, "[]");

    let err = resolve_product_guid(&api, "cf").await.expect_err("not found");

    assert_eq!(err.to_string(), "could not find product: cf");
}

#[tokio::test]
async fn test_resolve_product_guid_malformed_body() {
    let api = FakeOpsManager::new().with(DEPLOYED_PRODUCTS_PATH, 200, r#"{"guid": "x"}"#);

    let err = resolve_product_guid(&api, "cf").await.expect_err("decode");

    assert_eq!(err.to_string(), "failed to get deployed products");
}
