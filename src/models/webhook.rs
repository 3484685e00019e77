use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder for missing entity or action types.
pub const UNKNOWN: &str = "unknown";
/// Placeholder for any other missing field.
pub const NOT_AVAILABLE: &str = "N/A";

/// One event notification from the shop. Every field is optional and may hold
/// any JSON type; the receiver never rejects an event for its shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_type: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hook_name: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_summary: Option<Value>,
}

impl WebhookEvent {
    /// Build an event from any JSON value. Non-objects yield an event with
    /// every field absent.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(_) => serde_json::from_value(value.clone()).unwrap_or_default(),
            _ => Self::default(),
        }
    }

    pub fn entity_type_label(&self) -> String {
        render_label(self.entity_type.as_ref(), UNKNOWN)
    }

    pub fn action_type_label(&self) -> String {
        render_label(self.action_type.as_ref(), UNKNOWN)
    }

    pub fn event_id_label(&self) -> String {
        render_label(self.event_id.as_ref(), NOT_AVAILABLE)
    }

    pub fn entity_id_label(&self) -> String {
        render_label(self.entity_id.as_ref(), NOT_AVAILABLE)
    }

    pub fn entity_name_label(&self) -> String {
        render_label(self.entity_name.as_ref(), NOT_AVAILABLE)
    }

    pub fn hook_name_label(&self) -> String {
        render_label(self.hook_name.as_ref(), NOT_AVAILABLE)
    }

    /// Payload body to display: `data`, falling back to `after_data`.
    pub fn payload_data(&self) -> Option<&Value> {
        self.data
            .as_ref()
            .filter(|v| is_truthy(v))
            .or_else(|| self.after_data.as_ref().filter(|v| is_truthy(v)))
    }

    pub fn context_data(&self) -> Option<&Value> {
        self.context.as_ref().filter(|v| is_truthy(v))
    }

    pub fn change_summary_label(&self) -> Option<String> {
        self.change_summary
            .as_ref()
            .map(|v| render_label(Some(v), NOT_AVAILABLE))
    }

    /// Order sub-collection counts, only for `order` events carrying `after_data`.
    pub fn order_snapshot(&self) -> Option<OrderSnapshot> {
        if self.entity_type_label() != "order" {
            return None;
        }
        let data = self.after_data.as_ref().filter(|v| is_truthy(v))?;

        let details = array_field(data, "order_details");
        let sample = details.first().map(|product| ProductSample {
            name: render_label(product.get("product_name"), NOT_AVAILABLE),
            quantity: render_label(product.get("product_quantity"), NOT_AVAILABLE),
            price: render_label(product.get("total_price_tax_excl"), NOT_AVAILABLE),
        });

        Some(OrderSnapshot {
            details: details.len(),
            history: array_field(data, "order_history").len(),
            payments: array_field(data, "order_payments").len(),
            messages: array_field(data, "messages").len(),
            sample,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderSnapshot {
    pub details: usize,
    pub history: usize,
    pub payments: usize,
    pub messages: usize,
    pub sample: Option<ProductSample>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductSample {
    pub name: String,
    pub quantity: String,
    pub price: String,
}

/// Several events delivered under one `batch_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchPayload {
    pub batch_id: Option<Value>,
    pub events: Vec<WebhookEvent>,
    pub timestamp: Option<Value>,
}

impl BatchPayload {
    pub fn batch_id_label(&self) -> String {
        render_label(self.batch_id.as_ref(), UNKNOWN)
    }

    pub fn timestamp_label(&self) -> String {
        render_label(self.timestamp.as_ref(), NOT_AVAILABLE)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WebhookPayload {
    Batch(BatchPayload),
    Single(WebhookEvent),
}

impl WebhookPayload {
    /// A document is a batch iff it carries both `batch_id` and `events`.
    pub fn classify(value: &Value) -> Self {
        let object = match value.as_object() {
            Some(object) if object.contains_key("batch_id") && object.contains_key("events") => {
                object
            }
            _ => return WebhookPayload::Single(WebhookEvent::from_value(value)),
        };

        let events = object
            .get("events")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(WebhookEvent::from_value).collect())
            .unwrap_or_default();

        WebhookPayload::Batch(BatchPayload {
            batch_id: object.get("batch_id").cloned().filter(|v| !v.is_null()),
            events,
            timestamp: object.get("timestamp").cloned().filter(|v| !v.is_null()),
        })
    }

    #[cfg(test)]
    pub fn is_batch(&self) -> bool {
        matches!(self, WebhookPayload::Batch(_))
    }
}

/// Acknowledgement for a single event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SingleAck {
    pub status: String,
    pub message: String,
    pub event_id: Value,
    pub received_at: String,
}

/// Per-event result inside a batch acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventResult {
    pub success: bool,
}

/// Acknowledgement for a batch delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchAck {
    pub status: String,
    pub message: String,
    pub batch_id: Value,
    pub events_processed: usize,
    pub received_at: String,
    pub results: Vec<EventResult>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum WebhookAck {
    Single(SingleAck),
    Batch(BatchAck),
}

/// Render a JSON value for display: strings raw, other values as compact
/// JSON, absent or null as the placeholder.
pub fn render_label(value: Option<&Value>, placeholder: &str) -> String {
    match value {
        None | Some(Value::Null) => placeholder.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Empty containers, empty strings, zero, false and null count as "no data".
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn array_field<'a>(data: &'a Value, key: &str) -> &'a [Value] {
    data.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
