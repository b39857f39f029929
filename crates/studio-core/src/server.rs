// crates/studio-core/src/server.rs
// ============================================================================
// Module: Studio Server Resolution
// Description: Mapping between symbolic server names and endpoint URLs.
// Purpose: Keep the public name-to-URL contract in one pure function.
// Dependencies: url
// ============================================================================

//! ## Overview
//! Studio deployments are addressed by a short name. The production service
//! answers at the bare domain and every other deployment at a subdomain:
//!
//! | name | URL |
//! |---|---|
//! | `""`, `"saas"` | `https://edgefirst.studio` |
//! | `"test"` | `https://test.edgefirst.studio` |
//! | any other `name` | `https://{name}.edgefirst.studio` |
//!
//! [`resolve_server_url`] is total and never touches the network.

// ============================================================================
// SECTION: Imports
// ============================================================================

use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Base domain of every Studio deployment.
pub const STUDIO_DOMAIN: &str = "edgefirst.studio";

/// Name of the production deployment.
pub const SAAS_SERVER: &str = "saas";

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Resolves a symbolic server name to its endpoint URL.
#[must_use]
pub fn resolve_server_url(name: &str) -> String {
    match name {
        "" | SAAS_SERVER => format!("https://{STUDIO_DOMAIN}"),
        other => format!("https://{other}.{STUDIO_DOMAIN}"),
    }
}

/// Returns the symbolic server name for an endpoint URL.
///
/// The production URL maps to `"saas"` and Studio subdomains map to their
/// leading label. URLs outside the Studio domain yield their host, or the
/// input unchanged when it does not parse.
#[must_use]
pub fn server_name(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return url.to_string();
    };
    let Some(host) = parsed.host_str() else {
        return url.to_string();
    };
    if host == STUDIO_DOMAIN {
        return SAAS_SERVER.to_string();
    }
    host.strip_suffix(STUDIO_DOMAIN)
        .and_then(|rest| rest.strip_suffix('.'))
        .filter(|name| !name.is_empty())
        .map_or_else(|| host.to_string(), str::to_string)
}
