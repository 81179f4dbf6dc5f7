//! Property-based tests for command assembly and product lookup.
//!
//! Uses `proptest` to verify invariants across many random inputs.

#![allow(clippy::expect_used)]

use proptest::prelude::*;

use execute_on_opsman::domain::{
    DeployedProduct, DirectorManifest, build_bosh_command, find_product_guid,
};

fn manifest(address: &str, secret: &str) -> DirectorManifest {
    let body = serde_json::json!({
        "jobs": [{
            "properties": {
                "director": {"address": address},
                "uaa": {"clients": {"ops_manager": {"secret": secret}}}
            }
        }]
    });
    DirectorManifest::from_json(body.to_string().as_bytes()).expect("manifest")
}

fn product_strategy() -> impl Strategy<Value = DeployedProduct> {
    ("[a-z]{1,3}", "[a-z0-9-]{1,12}").prop_map(|(product_type, guid)| DeployedProduct {
        installation_name: guid.clone(),
        guid,
        product_type,
    })
}

// ============================================================================
// DirectorManifest decoding
// ============================================================================

proptest! {
    /// Address and secret come back exactly as nested in the document.
    #[test]
    fn prop_manifest_extracts_nested_values(
        address in "[0-9.]{1,15}",
        secret in "[A-Za-z0-9_]{0,40}",
    ) {
        let m = manifest(&address, &secret);
        prop_assert_eq!(m.director_address(), address.as_str());
        prop_assert_eq!(m.ops_manager_client_secret(), secret.as_str());
    }
}

// ============================================================================
// build_bosh_command() property tests
// ============================================================================

proptest! {
    /// Identical inputs always produce identical specs.
    #[test]
    fn prop_build_is_deterministic(
        guid in proptest::option::of("[a-z0-9-]{1,20}"),
        raw in ".{0,60}",
    ) {
        let m = manifest("10.0.4.2", "opsman_secret");
        let first = build_bosh_command("h", "/key", &m, guid.as_deref(), &raw);
        let second = build_bosh_command("h", "/key", &m, guid.as_deref(), &raw);
        prop_assert_eq!(first, second);
    }

    /// Dropping the GUID removes exactly the deployment flag.
    #[test]
    fn prop_guid_only_controls_deployment_flag(
        guid in "[a-z0-9-]{1,20}",
        raw in "[a-z -]{1,40}",
    ) {
        let m = manifest("10.0.4.2", "opsman_secret");
        let with = build_bosh_command("h", "/key", &m, Some(&guid), &raw);
        let without = build_bosh_command("h", "/key", &m, None, &raw);

        prop_assert_eq!(with.argv.len(), without.argv.len() + 1);
        let deployment = format!("-d /var/tempest/workspaces/default/deployments/{guid}.yml");
        let filtered: Vec<String> = with.argv.iter().filter(|t| **t != deployment).cloned().collect();
        prop_assert_eq!(filtered, without.argv);
        prop_assert_eq!(with.environment, without.environment);
    }

    /// The raw command is always the final, unmodified token.
    #[test]
    fn prop_raw_command_is_last_token(raw in ".{0,80}") {
        let m = manifest("10.0.4.2", "opsman_secret");
        let spec = build_bosh_command("h", "/key", &m, None, &raw);
        prop_assert_eq!(spec.argv.last(), Some(&raw));
        prop_assert!(spec.command_line().ends_with(&raw));
    }

    /// The secret is always wrapped in double quotes.
    #[test]
    fn prop_secret_is_quoted(secret in "[A-Za-z0-9_]{1,40}") {
        let m = manifest("10.0.4.2", &secret);
        let spec = build_bosh_command("h", "/key", &m, None, "vms");
        let expected = format!("BOSH_CLIENT_SECRET=\"{secret}\"");
        prop_assert!(spec.environment.contains(&expected));
    }
}

// ============================================================================
// find_product_guid() property tests
// ============================================================================

proptest! {
    /// The returned GUID belongs to the first product of the requested type.
    #[test]
    fn prop_first_match_wins(
        products in proptest::collection::vec(product_strategy(), 0..12),
        name in "[a-z]{1,3}",
    ) {
        let expected = products.iter().find(|p| p.product_type == name).map(|p| p.guid.as_str());
        match find_product_guid(&products, &name) {
            Ok(guid) => prop_assert_eq!(Some(guid), expected),
            Err(e) => {
                prop_assert!(expected.is_none());
                prop_assert_eq!(e.to_string(), format!("could not find product: {name}"));
            }
        }
    }
}
