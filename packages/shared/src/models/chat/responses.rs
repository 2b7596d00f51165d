use serde::{Deserialize, Serialize};

use super::Chat;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChatSummary {
    #[serde(flatten)]
    pub chat: Chat,
    pub other_participant_id: String,
    pub unread: bool,
}

impl ChatSummary {
    pub fn for_user(chat: Chat, user_id: &str) -> Self {
        let other_participant_id = chat.other_participant(user_id).unwrap_or_default().to_string();
        let unread = chat.is_unread_for(user_id);
        ChatSummary {
            chat,
            other_participant_id,
            unread,
        }
    }
}
