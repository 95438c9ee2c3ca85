//! HTTP client helper with native-tls support.

use std::time::Duration;
use ureq::Agent;
use ureq::tls::{RootCerts, TlsConfig, TlsProvider};

/// Global timeout for all HTTP operations (30 seconds).
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum size of a downloaded script archive (20 MB).
pub const MAX_DOWNLOAD_SIZE: u64 = 20 * 1024 * 1024;

/// Hosts that serve repository archives. Anything else is rejected.
const ALLOWED_HOSTS: &[&str] = &["github.com", "codeload.github.com"];

/// Validate that a URL is safe to download scripts from.
///
/// Enforces the HTTPS scheme and the [`ALLOWED_HOSTS`] allowlist.
pub fn validate_download_url(url: &str) -> Result<(), String> {
    let parsed = url::Url::parse(url).map_err(|e| format!("Invalid URL '{}': {}", url, e))?;

    match parsed.scheme() {
        "https" => {}
        scheme => {
            return Err(format!(
                "Insecure URL scheme '{}' rejected; only HTTPS is allowed. URL: {}",
                scheme, url
            ));
        }
    }

    let host = parsed.host_str().unwrap_or("");
    if !ALLOWED_HOSTS.contains(&host) {
        return Err(format!(
            "URL host '{}' is not in the allowed list for script downloads. \
             Allowed hosts: {}. URL: {}",
            host,
            ALLOWED_HOSTS.join(", "),
            url
        ));
    }

    Ok(())
}

/// Create a new HTTP agent configured with native-tls and a global timeout.
pub fn agent() -> Agent {
    let tls_config = TlsConfig::builder()
        .provider(TlsProvider::NativeTls)
        .root_certs(RootCerts::PlatformVerifier)
        .build();

    Agent::config_builder()
        .tls_config(tls_config)
        .timeout_global(Some(HTTP_TIMEOUT))
        .build()
        .into()
}

/// Download `url` and return its bytes, capped at [`MAX_DOWNLOAD_SIZE`].
pub fn download_file(url: &str) -> Result<Vec<u8>, String> {
    validate_download_url(url)?;
    log::debug!("GET {url}");

    let bytes = agent()
        .get(url)
        .header("User-Agent", "cockpitpp-installer")
        .call()
        .map_err(|e| {
            format!(
                "Failed to download '{}': {}. Check your internet connection and try again.",
                url, e
            )
        })?
        .into_body()
        .with_config()
        .limit(MAX_DOWNLOAD_SIZE)
        .read_to_vec()
        .map_err(|e| {
            format!(
                "Failed to read downloaded content from '{}': {}. \
                 The response may have been truncated or the connection dropped.",
                url, e
            )
        })?;

    Ok(bytes)
}
