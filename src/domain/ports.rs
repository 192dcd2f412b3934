use crate::domain::contact::ContactRecord;
use crate::domain::model::WebhookReply;
use crate::domain::rut::Strictness;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Settings the intake form needs, whatever their source.
pub trait ConfigProvider: Send + Sync {
    fn webhook_url(&self) -> &str;
    fn business_unit(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
    fn strictness(&self) -> Strictness;
    fn headers(&self) -> Vec<(String, String)>;
}

/// Where validated records go.
///
/// Implementations return the parsed reply only when the remote side accepted
/// the record; rejections and transport failures are errors.
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn send(&self, record: &ContactRecord) -> Result<WebhookReply>;
}
