use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MAX_MESSAGE_LEN: usize = 1000;

/// A message inside an active chat. Never mutated once stored.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Message {
    pub chat_id: String,
    /// Sort key: creation time first so messages read back in order.
    pub message_id: String,
    pub sender_id: String,
    pub sender_username: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(chat_id: &str, sender_id: &str, sender_username: &str, text: &str) -> Self {
        // v7 ids are monotonic within a process, so the key stays strictly
        // ordered even for messages created in the same millisecond.
        let id = Uuid::now_v7();
        let created_at = id
            .get_timestamp()
            .and_then(|ts| {
                let (secs, nanos) = ts.to_unix();
                DateTime::from_timestamp(secs as i64, nanos)
            })
            .unwrap_or_else(Utc::now);
        Message {
            chat_id: chat_id.to_string(),
            message_id: message_sort_key(created_at, &id.to_string()),
            sender_id: sender_id.to_string(),
            sender_username: sender_username.to_string(),
            text: text.to_string(),
            created_at,
        }
    }
}

pub fn message_sort_key(created_at: DateTime<Utc>, suffix: &str) -> String {
    format!(
        "{}#{}",
        created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        suffix
    )
}
