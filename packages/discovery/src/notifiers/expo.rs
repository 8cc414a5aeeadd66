//! Expo push notification delivery.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{DiscoveryError, Result};
use crate::traits::{DiscoveryNotice, Notifier};

const EXPO_PUSH_URL: &str = "https://exp.host/--/api/v2/push/send";

/// Sends "results ready" pushes through the Expo push API.
///
/// Device push tokens are registered per owner; an owner without a
/// registered token is skipped (that is a normal state, not an error).
pub struct ExpoNotifier {
    client: reqwest::Client,
    access_token: Option<String>,
    push_tokens: RwLock<HashMap<Uuid, String>>,
}

#[derive(Debug, Serialize)]
struct ExpoMessage {
    to: String,
    title: String,
    body: String,
    data: serde_json::Value,
    sound: String,
}

#[derive(Debug, Deserialize)]
struct ExpoResponse {
    data: Vec<ExpoTicket>,
}

#[derive(Debug, Deserialize)]
struct ExpoTicket {
    status: String,
    #[serde(default)]
    message: Option<String>,
}

impl ExpoNotifier {
    /// Create a new notifier. The access token raises Expo rate limits and
    /// is optional.
    pub fn new(access_token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            access_token,
            push_tokens: RwLock::new(HashMap::new()),
        }
    }

    /// Register (or replace) the push token for an owner's device.
    pub fn register_token(&self, owner_id: Uuid, push_token: impl Into<String>) {
        self.push_tokens
            .write()
            .unwrap()
            .insert(owner_id, push_token.into());
    }
}

#[async_trait]
impl Notifier for ExpoNotifier {
    async fn notify(&self, owner_id: Uuid, notice: &DiscoveryNotice) -> Result<()> {
        let Some(push_token) = self.push_tokens.read().unwrap().get(&owner_id).cloned() else {
            info!(%owner_id, "No push token registered, skipping notification");
            return Ok(());
        };

        let message = ExpoMessage {
            to: push_token,
            title: "Gift ideas ready".to_string(),
            body: format!(
                "Found {} products for \"{}\"",
                notice.result_count, notice.category
            ),
            data: serde_json::json!({
                "category": notice.category,
                "resultCount": notice.result_count,
            }),
            sound: "default".to_string(),
        };

        let mut request = self.client.post(EXPO_PUSH_URL).json(&message);
        if let Some(token) = &self.access_token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request
            .send()
            .await
            .map_err(|e| DiscoveryError::Notify(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DiscoveryError::Notify(format!(
                "Expo push API error {}: {}",
                status, body
            )));
        }

        let expo_response: ExpoResponse = response
            .json()
            .await
            .map_err(|e| DiscoveryError::Notify(e.to_string()))?;

        for ticket in &expo_response.data {
            if ticket.status == "error" {
                return Err(DiscoveryError::Notify(format!(
                    "Expo ticket error: {}",
                    ticket.message.as_deref().unwrap_or("unspecified")
                )));
            }
        }

        info!(%owner_id, "Expo notification sent");
        Ok(())
    }
}

/// No-op notifier for environments without push configured.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, owner_id: Uuid, notice: &DiscoveryNotice) -> Result<()> {
        warn!(
            %owner_id,
            category = %notice.category,
            result_count = notice.result_count,
            "NoopNotifier: notification dropped (no push service configured)"
        );
        Ok(())
    }
}
