//! HTTP client construction and address handling shared by the Consul and
//! Docker collaborators.

use std::path::Path;
use url::Url;

use crate::error::{AppError, AppResult};
use jkworkers_types::ConfigError;

const CLIENT_CERT_FILE: &str = "cert.pem";
const CLIENT_KEY_FILE: &str = "key.pem";
const CA_CERT_FILE: &str = "ca.pem";

/// Turn a configured address into a base URL ending in `/`.
///
/// Accepts `host:port`, `tcp://host:port` (Docker style) and explicit
/// `http(s)://` URLs. `tcp://` and bare addresses become `https` when
/// `secure` is set. Unix sockets are rejected; the engine must listen on TCP.
pub fn base_url(address: &str, secure: bool) -> AppResult<Url> {
    let scheme = if secure { "https" } else { "http" };
    let address = address.trim();

    let raw = match address.split_once("://") {
        None => format!("{}://{}", scheme, address),
        Some(("tcp", rest)) => format!("{}://{}", scheme, rest),
        Some(("http" | "https", _)) => address.to_string(),
        Some(("unix", _)) => {
            return Err(AppError::UnsupportedAddress {
                address: address.to_string(),
                reason: "unix sockets are not supported, expose the endpoint on tcp".to_string(),
            })
        }
        Some((other, _)) => {
            return Err(AppError::UnsupportedAddress {
                address: address.to_string(),
                reason: format!("unknown scheme '{}'", other),
            })
        }
    };

    let mut url = Url::parse(&raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Build an HTTP client, optionally presenting the client certificate found
/// in `tls_cert_dir` and trusting its CA.
///
/// No request timeout is set: registry fetches block until they return and
/// the event subscription is a long-lived stream.
pub fn build_http_client(tls_cert_dir: Option<&Path>) -> AppResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder().tcp_nodelay(true);

    if let Some(dir) = tls_cert_dir {
        let cert = read_pem(&dir.join(CLIENT_CERT_FILE))?;
        let key = read_pem(&dir.join(CLIENT_KEY_FILE))?;
        let ca = read_pem(&dir.join(CA_CERT_FILE))?;

        let mut identity_pem = key;
        identity_pem.push(b'\n');
        identity_pem.extend_from_slice(&cert);

        let identity = reqwest::Identity::from_pem(&identity_pem)?;
        let ca = reqwest::Certificate::from_pem(&ca)?;
        builder = builder.use_rustls_tls().identity(identity).add_root_certificate(ca);
        tracing::info!("🔐 TLS client certificate loaded from {}", dir.display());
    }

    Ok(builder.build()?)
}

fn read_pem(path: &Path) -> Result<Vec<u8>, ConfigError> {
    std::fs::read(path).map_err(|e| {
        tracing::error!("❌ TLS file {} unreadable: {}", path.display(), e);
        ConfigError::TlsMaterial { path: path.display().to_string(), message: e.to_string() }
    })
}
