pub mod message;
pub mod requests;
pub mod responses;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Lifecycle of a chat between two players.
///
/// A chat starts `Pending` when the requester creates it. Only the receiver can
/// move it forward, once, to `Active` or `Declined`. Neither state leads back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatStatus {
    Pending,
    Active,
    Declined,
}

impl ChatStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatStatus::Pending => "pending",
            ChatStatus::Active => "active",
            ChatStatus::Declined => "declined",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ChatStatus::Pending)
    }

    /// The transition table. Returns the next state or why the action is refused.
    pub fn apply(
        self,
        action: ChatAction,
        actor_id: &str,
        chat: &Chat,
    ) -> Result<ChatStatus, ChatTransitionError> {
        if !chat.has_participant(actor_id) {
            return Err(ChatTransitionError::NotParticipant);
        }
        if chat.requester_id == actor_id {
            return Err(ChatTransitionError::RequesterCannotRespond);
        }
        if self.is_terminal() {
            return Err(ChatTransitionError::InvalidTransition { from: self, action });
        }
        match action {
            ChatAction::Accept => Ok(ChatStatus::Active),
            ChatAction::Decline => Ok(ChatStatus::Declined),
        }
    }
}

impl fmt::Display for ChatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatAction {
    Accept,
    Decline,
}

impl fmt::Display for ChatAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatAction::Accept => f.write_str("accept"),
            ChatAction::Decline => f.write_str("decline"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChatTransitionError {
    NotParticipant,
    RequesterCannotRespond,
    InvalidTransition { from: ChatStatus, action: ChatAction },
}

impl fmt::Display for ChatTransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatTransitionError::NotParticipant => {
                write!(f, "You are not a participant in this chat")
            }
            ChatTransitionError::RequesterCannotRespond => {
                write!(f, "Only the receiver can respond to a chat request")
            }
            ChatTransitionError::InvalidTransition { from, action } => {
                write!(f, "Cannot {} a chat request that is already {}", action, from)
            }
        }
    }
}

impl std::error::Error for ChatTransitionError {}

/// Deterministic chat id for a pair of players: both ids sorted and joined
/// with `_`, so either side computes the same key.
pub fn chat_id_for(a: &str, b: &str) -> String {
    if a <= b {
        format!("{}_{}", a, b)
    } else {
        format!("{}_{}", b, a)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Chat {
    pub chat_id: String,
    pub participants: [String; 2],
    pub requester_id: String,
    pub status: ChatStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_message: Option<String>,
    pub last_message_by: Option<String>,
    pub last_message_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_read: HashMap<String, DateTime<Utc>>,
}

impl Chat {
    pub fn new_request(requester_id: &str, receiver_id: &str) -> Self {
        let now = Utc::now();
        let mut participants = [requester_id.to_string(), receiver_id.to_string()];
        participants.sort();

        Chat {
            chat_id: chat_id_for(requester_id, receiver_id),
            participants,
            requester_id: requester_id.to_string(),
            status: ChatStatus::Pending,
            created_at: now,
            updated_at: now,
            last_message: None,
            last_message_by: None,
            last_message_at: None,
            last_read: HashMap::new(),
        }
    }

    pub fn has_participant(&self, user_id: &str) -> bool {
        self.participants.iter().any(|p| p == user_id)
    }

    pub fn other_participant(&self, user_id: &str) -> Option<&str> {
        if !self.has_participant(user_id) {
            return None;
        }
        self.participants
            .iter()
            .find(|p| p.as_str() != user_id)
            .map(String::as_str)
    }

    pub fn receiver_id(&self) -> Option<&str> {
        self.other_participant(&self.requester_id)
    }

    /// A chat is unread for `user_id` when the latest message came from the
    /// other participant after the user's last read marker.
    pub fn is_unread_for(&self, user_id: &str) -> bool {
        let (Some(last_message_at), Some(last_message_by)) =
            (self.last_message_at, self.last_message_by.as_deref())
        else {
            return false;
        };
        if last_message_by == user_id {
            return false;
        }
        match self.last_read.get(user_id) {
            Some(read_at) => *read_at < last_message_at,
            None => true,
        }
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_message_at.unwrap_or(self.updated_at)
    }
}
