pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::webhook::WebhookClient;
pub use crate::config::toml_config::IntakeConfig;
pub use crate::core::intake::{FormState, IntakeForm};
pub use crate::domain::contact::{ContactDraft, ContactRecord, Direccion, FormErrors};
pub use crate::domain::rut::{Rut, RutError, Strictness};
pub use crate::utils::error::{IntakeError, Result};
