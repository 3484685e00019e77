// Data models: inbound webhook payloads and outbound acknowledgements

pub mod webhook;

pub use webhook::{
    BatchAck, BatchPayload, EventResult, OrderSnapshot, ProductSample, SingleAck, WebhookAck,
    WebhookEvent, WebhookPayload,
};
