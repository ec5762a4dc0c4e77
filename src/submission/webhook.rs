//! Webhook delivery port.
//!
//! Submissions are forwarded to a single configured listener as JSON. The
//! outgoing body is the client payload wrapped with a `_meta` envelope and
//! the public URL of the stored summary, so the listener never has to call
//! back to learn where the document went.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::error::PlacaError;

/// Wire value identifying this service in the `_meta` envelope.
pub const META_SOURCE: &str = "nameplate-label-creator";

/// Request metadata forwarded alongside the payload.
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    pub user_agent: String,
    pub referer: String,
}

/// Delivers a submission to the configured listener.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, payload: &Value) -> Result<(), PlacaError>;
}

/// Wrap a submission payload with the `_meta` envelope and summary URL.
///
/// A non-object payload is replaced by an empty object so the envelope shape
/// stays stable for the listener.
pub fn envelope(payload: Value, meta: &RequestMeta, summary_url: &str) -> Value {
    let mut map = match payload {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };
    map.insert(
        "summary_url".to_string(),
        Value::String(summary_url.to_string()),
    );
    map.insert(
        "_meta".to_string(),
        json!({
            "source": META_SOURCE,
            "received_at": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            "user_agent": meta.user_agent,
            "referer": meta.referer,
        }),
    );
    Value::Object(map)
}

/// One-shot HTTP POST delivery. No retries: a failed delivery is reported to
/// the caller and the stored summary is left in place.
pub struct HttpWebhook {
    client: reqwest::Client,
    url: String,
}

impl HttpWebhook {
    pub fn new(url: &str) -> Result<Self, PlacaError> {
        let client = reqwest::Client::builder()
            .user_agent("placa/0.1")
            .build()
            .map_err(|e| PlacaError::Server(format!("HTTP client error: {e}")))?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl Notifier for HttpWebhook {
    async fn notify(&self, payload: &Value) -> Result<(), PlacaError> {
        let response = self
            .client
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .map_err(|e| PlacaError::WebhookUnreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlacaError::WebhookRejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_envelope_preserves_payload_fields() {
        let payload = json!({"referenceId": "REF-9", "savedTemplates": []});
        let meta = RequestMeta {
            user_agent: "secret-agent/2".to_string(),
            referer: "https://labels.example.com/".to_string(),
        };
        let wrapped = envelope(payload, &meta, "https://cdn.example.com/s/1.pdf");

        assert_eq!(wrapped["referenceId"], "REF-9");
        assert_eq!(wrapped["summary_url"], "https://cdn.example.com/s/1.pdf");
        assert_eq!(wrapped["_meta"]["source"], "nameplate-label-creator");
        assert_eq!(wrapped["_meta"]["user_agent"], "secret-agent/2");
        assert_eq!(wrapped["_meta"]["referer"], "https://labels.example.com/");
    }

    #[test]
    fn test_envelope_replaces_non_object_payload() {
        let wrapped = envelope(json!([1, 2, 3]), &RequestMeta::default(), "https://x/y.pdf");
        let map = wrapped.as_object().unwrap();
        assert_eq!(map.len(), 2);
        assert!(map.contains_key("summary_url"));
        assert!(map.contains_key("_meta"));
    }

    #[test]
    fn test_envelope_timestamp_is_rfc3339() {
        let wrapped = envelope(json!({}), &RequestMeta::default(), "https://x/y.pdf");
        let stamp = wrapped["_meta"]["received_at"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(stamp).is_ok(), "bad timestamp: {stamp}");
        assert!(stamp.ends_with('Z'));
    }
}
