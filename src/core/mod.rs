pub mod intake;

pub use crate::domain::contact::{ContactDraft, ContactRecord, Direccion, FormErrors};
pub use crate::domain::model::{SubmissionReceipt, WebhookReply};
pub use crate::domain::ports::{ConfigProvider, RecordSink};
pub use crate::utils::error::Result;
