//! Docker engine lifecycle events.
//!
//! `GET /events` keeps the response open and writes one JSON object per line
//! for every event. Only container events are requested.

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use chrono::{DateTime, Utc};
use futures::{Stream, StreamExt};
use serde::Deserialize;
use std::fmt::Display;
use url::Url;

use super::collaborators::{EventSource, EventStream};
use super::http::{base_url, build_http_client};
use crate::error::AppResult;
use jkworkers_types::{DockerConfig, EventSourceError, LifecycleEvent};

const EVENTS_PATH: &str = "events";
const CONTAINER_FILTER: &str = r#"{"type":["container"]}"#;
const MAX_LINE_BYTES: usize = 1024 * 1024;

#[derive(Debug, Deserialize)]
struct EventActor {
    #[serde(rename = "ID", default)]
    id: Option<String>,
}

/// Wire shape of one event line. Older engines send `status`/`id`, newer
/// ones only `Action`/`Actor.ID`.
#[derive(Debug, Deserialize)]
struct EventMessage {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "Type", default)]
    kind: Option<String>,
    #[serde(rename = "Action", default)]
    action: Option<String>,
    #[serde(rename = "Actor", default)]
    actor: Option<EventActor>,
    #[serde(default)]
    time: Option<i64>,
}

impl EventMessage {
    fn into_event(self) -> Option<LifecycleEvent> {
        if self.kind.as_deref().is_some_and(|k| k != "container") {
            return None;
        }
        let status = self.status.or(self.action)?;
        let container_id = self.id.or(self.actor.and_then(|a| a.id)).unwrap_or_default();
        let time = self.time.and_then(|t| DateTime::<Utc>::from_timestamp(t, 0));
        Some(LifecycleEvent { status, container_id, time })
    }
}

/// Decode one line of the event stream.
///
/// Blank lines, non-container events and undecodable lines yield `None`;
/// the latter are logged.
pub fn decode_event_line(line: &str) -> Option<LifecycleEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str::<EventMessage>(line) {
        Ok(msg) => msg.into_event(),
        Err(e) => {
            tracing::warn!("⚠️ Undecodable docker event skipped: {} | {}", e, line);
            None
        }
    }
}

/// Split a chunked byte stream into lines and decode each into an event.
///
/// Chunk boundaries need not align with lines. A transport error ends the
/// stream after yielding it.
pub fn decode_event_stream<S, E>(mut chunks: S) -> EventStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + Unpin + 'static,
    E: Display + Send + 'static,
{
    Box::pin(async_stream::stream! {
        let mut buffer = BytesMut::new();

        while let Some(chunk) = chunks.next().await {
            let chunk = match chunk {
                Ok(c) => c,
                Err(e) => {
                    yield Err(EventSourceError::Stream { message: e.to_string() });
                    buffer.clear();
                    break;
                }
            };
            buffer.extend_from_slice(&chunk);

            while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
                let line = buffer.split_to(pos + 1);
                match std::str::from_utf8(&line) {
                    Ok(text) => {
                        if let Some(event) = decode_event_line(text) {
                            yield Ok(event);
                        }
                    }
                    Err(e) => tracing::warn!("⚠️ Docker event line is not UTF-8: {}", e),
                }
            }

            if buffer.len() > MAX_LINE_BYTES {
                tracing::error!("❌ Docker event line exceeded {} bytes, discarding", MAX_LINE_BYTES);
                buffer.clear();
            }
        }

        if let Ok(text) = std::str::from_utf8(&buffer) {
            if let Some(event) = decode_event_line(text) {
                yield Ok(event);
            }
        }
    })
}

/// Subscribes to a Docker engine's event feed.
pub struct DockerEvents {
    client: reqwest::Client,
    events_url: Url,
    address: String,
}

impl DockerEvents {
    pub fn new(config: &DockerConfig) -> AppResult<Self> {
        let client = build_http_client(config.tls_cert_path.as_deref())?;
        Self::with_client(&config.address, config.tls_enabled(), client)
    }

    pub fn with_client(address: &str, secure: bool, client: reqwest::Client) -> AppResult<Self> {
        let events_url = base_url(address, secure)?.join(EVENTS_PATH)?;
        Ok(Self { client, events_url, address: address.to_string() })
    }
}

#[async_trait]
impl EventSource for DockerEvents {
    async fn subscribe(&self) -> Result<EventStream, EventSourceError> {
        tracing::info!("👂 Subscribing to docker events at {}", self.events_url);

        let resp = self
            .client
            .get(self.events_url.clone())
            .query(&[("filters", CONTAINER_FILTER)])
            .send()
            .await
            .map_err(|e| EventSourceError::Connect {
                address: self.address.clone(),
                message: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(EventSourceError::Connect {
                address: self.address.clone(),
                message: format!("HTTP {}: {}", status, body.trim()),
            });
        }

        Ok(decode_event_stream(Box::pin(resp.bytes_stream())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    #[test]
    fn test_decode_legacy_fields() {
        let event = decode_event_line(
            r#"{"status":"start","id":"4f2c1a9b8e7d","from":"tomcat:8","Type":"container","Action":"start","time":1700000000}"#,
        )
        .unwrap();
        assert_eq!(event.status, "start");
        assert_eq!(event.container_id, "4f2c1a9b8e7d");
        assert_eq!(event.time.unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_decode_action_only_fields() {
        let event = decode_event_line(
            r#"{"Type":"container","Action":"die","Actor":{"ID":"abc123","Attributes":{"exitCode":"137"}}}"#,
        )
        .unwrap();
        assert_eq!(event.status, "die");
        assert_eq!(event.container_id, "abc123");
        assert!(event.time.is_none());
    }

    #[test]
    fn test_decode_skips_noise() {
        assert!(decode_event_line("").is_none());
        assert!(decode_event_line("   ").is_none());
        assert!(decode_event_line("not json").is_none());
        assert!(decode_event_line(r#"{"Type":"network","Action":"connect"}"#).is_none());
    }

    #[tokio::test]
    async fn test_stream_reassembles_split_lines() {
        let chunks: Vec<Result<Bytes, String>> = vec![
            Ok(Bytes::from_static(b"{\"status\":\"start\",\"id\":\"c1\"}\n{\"status\":\"d")),
            Ok(Bytes::from_static(b"ie\",\"id\":\"c2\"}\n\n")),
            Ok(Bytes::from_static(b"{\"status\":\"kill\",\"id\":\"c3\"}")),
        ];
        let events: Vec<_> = decode_event_stream(stream::iter(chunks)).collect().await;

        let statuses: Vec<String> =
            events.into_iter().map(|e| e.unwrap().status).collect();
        assert_eq!(statuses, vec!["start", "die", "kill"]);
    }

    #[tokio::test]
    async fn test_stream_error_ends_stream() {
        let chunks: Vec<Result<Bytes, String>> = vec![
            Ok(Bytes::from_static(b"{\"status\":\"stop\",\"id\":\"c1\"}\n")),
            Err("connection reset".to_string()),
            Ok(Bytes::from_static(b"{\"status\":\"start\",\"id\":\"c2\"}\n")),
        ];
        let events: Vec<_> = decode_event_stream(stream::iter(chunks)).collect().await;

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].as_ref().unwrap().status, "stop");
        assert!(matches!(events[1], Err(EventSourceError::Stream { .. })));
    }
}
