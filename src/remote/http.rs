//! HTTP remote store.
//!
//! Every endpoint answers with an envelope:
//!
//! ```text
//! { "code": 200, "message": "ok", "data": ... }
//! ```
//!
//! `code != 200` is a failure even when the HTTP status is 200. The server
//! marks top-level items with parent id `"1"`; this module translates that
//! to and from `None`.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::core::config::ResolvedConfig;
use crate::core::menu::{MenuItem, MenuItemType, MenuPatch, REMOTE_ROOT_ID};
use crate::remote::store::{RemoteError, RemoteStore};

const SUCCESS_CODE: i64 = 200;

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Deserialize, Debug)]
struct Envelope<T> {
    code: i64,
    #[serde(default)]
    message: Option<String>,
    data: Option<T>,
}

/// Menu row as listed by the server. Ids may arrive as numbers.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct WireMenuItem {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    #[serde(default, deserialize_with = "optional_string_or_number")]
    parent_id: Option<String>,
    name: String,
    #[serde(rename = "type")]
    kind: MenuItemType,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct CreateBody<'a> {
    id: &'a str,
    name: &'a str,
    parent_id: &'a str,
    project_id: &'a str,
    #[serde(rename = "type")]
    kind: MenuItemType,
    data: &'a serde_json::Value,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct UpdateBody<'a> {
    id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a serde_json::Value>,
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("expected id, got {other}"))),
    }
}

fn optional_string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(s) => Ok(Some(s)),
        serde_json::Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(serde::de::Error::custom(format!("expected id, got {other}"))),
    }
}

// ============================================================================
// Translation Layer
// ============================================================================

fn is_remote_root(parent_id: &str) -> bool {
    parent_id.is_empty() || parent_id == REMOTE_ROOT_ID || parent_id == "0"
}

fn from_wire(wire: WireMenuItem) -> MenuItem {
    MenuItem {
        id: wire.id,
        parent_id: wire.parent_id.filter(|p| !is_remote_root(p)),
        name: wire.name,
        kind: wire.kind,
        data: wire.data,
    }
}

fn to_wire_parent(parent_id: Option<&str>) -> &str {
    parent_id.unwrap_or(REMOTE_ROOT_ID)
}

// ============================================================================
// Store Implementation
// ============================================================================

pub struct HttpRemoteStore {
    base_url: String,
    token: Option<String>,
    project_id: String,
    client: reqwest::Client,
}

impl HttpRemoteStore {
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        project_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::Config(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            project_id: project_id.into(),
            client,
        })
    }

    pub fn from_config(config: &ResolvedConfig) -> Result<Self, RemoteError> {
        Self::new(
            config.base_url.clone(),
            config.token.clone(),
            config.project_id.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends `request` and unwraps the response envelope.
    async fn call<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Option<T>, RemoteError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let status = response.status();
        debug!("Remote response status: {}", status);

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Remote API error: {} - {}", status, message);
            return Err(RemoteError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;
        let envelope: Envelope<T> =
            serde_json::from_str(&body).map_err(|e| RemoteError::Parse(e.to_string()))?;

        if envelope.code != SUCCESS_CODE {
            let message = envelope
                .message
                .unwrap_or_else(|| "operation failed".to_string());
            warn!("Remote rejected request: {} - {}", envelope.code, message);
            return Err(RemoteError::Rejected {
                code: envelope.code,
                message,
            });
        }
        Ok(envelope.data)
    }

    async fn post_ack<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), RemoteError> {
        let request = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body);
        self.call::<serde_json::Value>(request).await.map(|_| ())
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    fn name(&self) -> &str {
        "http"
    }

    async fn list_all(&self) -> Result<Vec<MenuItem>, RemoteError> {
        let request = self.client.get(format!("{}/api/menu/all", self.base_url));
        let rows: Vec<WireMenuItem> = self.call(request).await?.unwrap_or_default();
        info!("Fetched {} menu items from {}", rows.len(), self.base_url);
        Ok(rows.into_iter().map(from_wire).collect())
    }

    async fn create(&self, item: &MenuItem) -> Result<(), RemoteError> {
        let body = CreateBody {
            id: &item.id,
            name: &item.name,
            parent_id: to_wire_parent(item.parent_id.as_deref()),
            project_id: &self.project_id,
            kind: item.kind,
            data: &item.data,
        };
        debug!("Remote create {}", item.id);
        self.post_ack("/api/menu/create", &body).await
    }

    async fn update(&self, patch: &MenuPatch) -> Result<(), RemoteError> {
        let body = UpdateBody {
            id: &patch.id,
            name: patch.name.as_deref(),
            parent_id: None,
            data: patch.data.as_ref(),
        };
        debug!("Remote update {}", patch.id);
        self.post_ack("/api/menu/update", &body).await
    }

    async fn reparent(&self, id: &str, parent_id: Option<&str>) -> Result<(), RemoteError> {
        let body = UpdateBody {
            id,
            name: None,
            parent_id: Some(to_wire_parent(parent_id)),
            data: None,
        };
        debug!("Remote reparent {} -> {:?}", id, parent_id);
        self.post_ack("/api/menu/update", &body).await
    }

    async fn delete(&self, id: &str) -> Result<(), RemoteError> {
        debug!("Remote delete {}", id);
        let request = self
            .client
            .post(format!("{}/api/menu/delete/{}", self.base_url, id));
        self.call::<serde_json::Value>(request).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_item_accepts_numeric_ids_and_root_parent() {
        let json = r#"[
            {"id": 1234567890123456, "parentId": 1, "name": "Users", "type": "apiDetailFolder"},
            {"id": "42", "parentId": "1234567890123456", "name": "List", "type": "apiDetail", "data": {"method": "GET"}},
            {"id": "43", "name": "Loose", "type": "doc"}
        ]"#;
        let rows: Vec<WireMenuItem> = serde_json::from_str(json).unwrap();
        let items: Vec<MenuItem> = rows.into_iter().map(from_wire).collect();

        assert_eq!(items[0].id, "1234567890123456");
        assert!(items[0].is_top_level());
        assert_eq!(items[1].parent_id.as_deref(), Some("1234567890123456"));
        assert_eq!(items[1].data["method"], "GET");
        assert!(items[2].is_top_level());
    }

    #[test]
    fn test_create_body_uses_remote_root() {
        let item = MenuItem::new("a", "A", MenuItemType::HttpRequest);
        let body = CreateBody {
            id: &item.id,
            name: &item.name,
            parent_id: to_wire_parent(item.parent_id.as_deref()),
            project_id: "7",
            kind: item.kind,
            data: &item.data,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["parentId"], "1");
        assert_eq!(json["projectId"], "7");
        assert_eq!(json["type"], "httpRequest");
    }

    #[test]
    fn test_update_body_skips_absent_fields() {
        let body = UpdateBody {
            id: "a",
            name: Some("Renamed"),
            parent_id: None,
            data: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "id": "a", "name": "Renamed" }));
    }

    #[test]
    fn test_envelope_without_data() {
        let envelope: Envelope<serde_json::Value> =
            serde_json::from_str(r#"{"code": 500, "message": "boom"}"#).unwrap();
        assert_eq!(envelope.code, 500);
        assert!(envelope.data.is_none());
    }
}
