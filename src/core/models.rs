use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Top-level Events API envelope, discriminated by its `type` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    UrlVerification {
        #[serde(default, deserialize_with = "lenient_challenge")]
        challenge: String,
    },
    EventCallback {
        #[serde(default, deserialize_with = "lenient_message")]
        event: Option<Message>,
    },
    #[serde(other)]
    Unknown,
}

/// The inner `event` of an `event_callback`.
///
/// Slack reuses field names with other shapes across event types
/// (`channel_created` sends `channel` as an object, `team_join` sends `user`
/// as an object), so every field is optional and a value of the wrong type
/// reads as absent instead of failing the whole payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Message {
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub channel: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub user: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ts: Option<String>,
    #[serde(default, deserialize_with = "lenient_array")]
    pub files: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient_array")]
    pub attachments: Option<Vec<Value>>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_array<'de, D>(deserializer: D) -> Result<Option<Vec<Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(items),
        _ => None,
    })
}

fn lenient_challenge<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

// A non-object `event` is treated the same as a missing one.
fn lenient_message<'de, D>(deserializer: D) -> Result<Option<Message>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

impl Message {
    pub fn has_attachments(&self) -> bool {
        let non_empty = |items: &Option<Vec<Value>>| items.as_ref().is_some_and(|v| !v.is_empty());
        non_empty(&self.files) || non_empty(&self.attachments)
    }
}

/// Body posted to the workflow endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardRequest {
    pub slack_event_text: String,
    pub slack_channel_id: String,
    pub slack_files: Vec<Value>,
    pub slack_attachments: Vec<Value>,
}

/// Body posted to `chat.postMessage`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AckRequest {
    pub channel: String,
    pub text: String,
}
