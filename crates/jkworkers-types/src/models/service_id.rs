//! Structured service id codec.
//!
//! Backend instances register as `host:key:trailing`, where `key` is itself
//! `prefix_name_port[_...]`, e.g. `dude-server:tomcat_dude-server_8217:8009`.
//! The middle field is the worker name written to the proxy config.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ServiceIdError;

/// A parsed service id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ServiceId {
    /// Host the worker connects to
    pub host: String,
    /// Worker name, used verbatim in the rendered config
    pub key: String,
    /// Third underscore token of `key`; not checked to be numeric
    pub port: String,
    /// Last field; kept but unused when rendering
    pub trailing: String,
}

impl ServiceId {
    pub fn parse(id: &str) -> Result<Self, ServiceIdError> {
        let fields: Vec<&str> = id.split(':').collect();
        let [host, key, trailing] = fields.as_slice() else {
            return Err(ServiceIdError::MalformedId {
                id: id.to_string(),
                reason: format!("expected 3 colon-separated fields, found {}", fields.len()),
            });
        };

        let Some(port) = key.split('_').nth(2) else {
            return Err(ServiceIdError::MalformedId {
                id: id.to_string(),
                reason: format!(
                    "expected at least 3 underscore-separated tokens in '{}', found {}",
                    key,
                    key.split('_').count()
                ),
            });
        };

        Ok(Self {
            host: (*host).to_string(),
            key: (*key).to_string(),
            port: port.to_string(),
            trailing: (*trailing).to_string(),
        })
    }
}

impl FromStr for ServiceId {
    type Err = ServiceIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.host, self.key, self.trailing)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reference_id() {
        let id = ServiceId::parse("dude-server:tomcat_dude-server_8217:8009").unwrap();
        assert_eq!(id.host, "dude-server");
        assert_eq!(id.key, "tomcat_dude-server_8217");
        assert_eq!(id.port, "8217");
        assert_eq!(id.trailing, "8009");
        assert_eq!(id.to_string(), "dude-server:tomcat_dude-server_8217:8009");
    }

    #[test]
    fn test_port_is_third_token_even_with_extra_tokens() {
        let id: ServiceId = "h1:svc_app_100_blue:1".parse().unwrap();
        assert_eq!(id.port, "100");
        assert_eq!(id.key, "svc_app_100_blue");
    }

    #[test]
    fn test_port_is_opaque() {
        let id = ServiceId::parse("h1:svc_app_http:1").unwrap();
        assert_eq!(id.port, "http");
    }

    #[test]
    fn test_rejects_wrong_field_count() {
        for raw in ["h1:svc_app_100", "h1:svc_app_100:1:extra", "", "plain"] {
            let err = ServiceId::parse(raw).unwrap_err();
            let ServiceIdError::MalformedId { id, reason } = err;
            assert_eq!(id, raw);
            assert!(reason.contains("colon-separated"), "{raw}: {reason}");
        }
    }

    #[test]
    fn test_rejects_short_key() {
        for raw in ["h1:svc_app:1", "h1::1", "h1:svc:1"] {
            let err = ServiceId::parse(raw).unwrap_err();
            let ServiceIdError::MalformedId { reason, .. } = err;
            assert!(reason.contains("underscore-separated"), "{raw}: {reason}");
        }
    }
}
