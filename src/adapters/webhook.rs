use crate::domain::contact::ContactRecord;
use crate::domain::model::WebhookReply;
use crate::domain::ports::{ConfigProvider, RecordSink};
use crate::utils::error::{IntakeError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 15;

/// Posts contact records as JSON to the CRM webhook.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: Client,
    url: String,
    timeout: Duration,
    headers: Vec<(String, String)>,
}

impl WebhookClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            headers: Vec::new(),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(config.webhook_url())
            .with_timeout(Duration::from_secs(config.timeout_seconds()))
            .with_headers(config.headers())
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = headers;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RecordSink for WebhookClient {
    async fn send(&self, record: &ContactRecord) -> Result<WebhookReply> {
        tracing::debug!("📡 POST {} (rut {})", self.url, record.rut);

        let mut request = self.client.post(&self.url).json(record);
        for (key, value) in &self.headers {
            request = request.header(key, value);
        }
        request = request.timeout(self.timeout);

        let response = request.send().await.map_err(|e| {
            tracing::warn!("Webhook request failed: {}", e);
            IntakeError::connection(e.to_string())
        })?;

        let status = response.status();
        tracing::debug!("📡 Webhook response status: {}", status);
        if !status.is_success() {
            return Err(IntakeError::connection(format!(
                "webhook answered with HTTP {}",
                status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| IntakeError::connection(e.to_string()))?;
        let reply: WebhookReply = serde_json::from_str(&body).map_err(|e| {
            tracing::warn!("Webhook reply is not valid JSON: {}", e);
            IntakeError::connection(format!("unparseable webhook reply: {}", e))
        })?;

        if reply.is_ok() {
            Ok(reply)
        } else {
            tracing::warn!(
                "Webhook rejected record with status '{}': {:?}",
                reply.status,
                reply.message
            );
            Err(IntakeError::WebhookRejected {
                status: reply.status,
                message: reply.message,
            })
        }
    }
}
