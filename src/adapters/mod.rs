// Adapters layer: concrete implementations of the domain ports.

pub mod webhook;

pub use webhook::WebhookClient;
