//! Chat entities as delivered by the server.
//!
//! Field names follow the server's camelCase JSON so the same types are used
//! on the wire and in the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    /// Member user ids in server order.
    pub members: Vec<String>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub from: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn is_group_message(&self) -> bool {
        self.group_id.is_some()
    }

    /// Returns the other participant of a private message as seen by `me`.
    ///
    /// `None` for group messages and for malformed outgoing messages that
    /// carry no recipient.
    pub fn peer_of(&self, me: &str) -> Option<&str> {
        if self.is_group_message() {
            return None;
        }

        if self.from == me {
            self.to.as_deref()
        } else {
            Some(self.from.as_str())
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn decodes_user_from_camel_case_json() {
        let user: User = serde_json::from_str(
            r#"{"id":"s1","username":"alice","joinedAt":"2024-05-01T10:00:00.000Z"}"#,
        )
        .expect("user should decode");

        assert_eq!(user.id, "s1");
        assert_eq!(user.username, "alice");
    }

    #[test]
    fn decodes_group_without_messages_field() {
        let group: Group = serde_json::from_str(
            r#"{"id":"g1","name":"ops","createdBy":"s1","createdAt":"2024-05-01T10:00:00Z","members":["s1","s2"]}"#,
        )
        .expect("group should decode");

        assert_eq!(group.members, vec!["s1", "s2"]);
        assert!(group.messages.is_empty());
    }

    #[test]
    fn decodes_group_message_without_recipient() {
        let message: Message = serde_json::from_str(
            r#"{"id":"m1","from":"s1","groupId":"g1","content":"hi","timestamp":"2024-05-01T10:00:00Z"}"#,
        )
        .expect("message should decode");

        assert!(message.is_group_message());
        assert_eq!(message.to, None);
    }

    #[test]
    fn peer_of_private_message_depends_on_direction() {
        let incoming = private_message("m1", "bob", "alice", "hi");
        let outgoing = private_message("m2", "alice", "bob", "hey");

        assert_eq!(incoming.peer_of("alice"), Some("bob"));
        assert_eq!(outgoing.peer_of("alice"), Some("bob"));
    }

    #[test]
    fn peer_of_group_message_is_none() {
        let message = group_message("m1", "bob", "g1", "hi");

        assert_eq!(message.peer_of("alice"), None);
    }
}
