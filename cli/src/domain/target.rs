//! Ops Manager target parsing.

use url::Url;

use crate::domain::error::ValidationError;

/// Parse the `--target` value into the API base URL.
///
/// A bare hostname is treated as `https://<hostname>`.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidTarget`] if the value is not a URL with
/// a host.
pub fn parse_target(raw: &str) -> Result<Url, ValidationError> {
    let raw = raw.trim();
    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    };
    let url = Url::parse(&candidate).map_err(|e| ValidationError::InvalidTarget {
        target: raw.to_string(),
        reason: e.to_string(),
    })?;
    if url.host_str().is_none_or(str::is_empty) {
        return Err(ValidationError::InvalidTarget {
            target: raw.to_string(),
            reason: "missing host".to_string(),
        });
    }
    Ok(url)
}

/// Host of the Ops Manager VM, without any port.
#[must_use]
pub fn ssh_host(target: &Url) -> String {
    target.host_str().unwrap_or_default().to_string()
}
