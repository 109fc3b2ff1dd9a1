//! Conversation list rendering logic.
//!
//! Handles visual formatting of messages including:
//! - Sender grouping (consecutive messages from one sender show the name once)
//! - Date separators between messages from different days
//! - Distinct styling for the current user's messages

use chrono::{DateTime, Local, NaiveDate, Utc};
use ratatui::{
    layout::Alignment,
    text::{Line, Span},
    widgets::ListItem,
};

use crate::domain::{chat_store::ChatStore, model::Message};

use super::styles::Palette;

pub const EMPTY_CONVERSATION_TEXT: &str = "No messages yet. Start the conversation!";

const UNKNOWN_SENDER: &str = "Unknown";

/// Represents a visual element in the conversation list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageListElement {
    /// Date separator line (e.g., "--- 14 Feb 2026 ---").
    DateSeparator(String),
    Message {
        time: String,
        /// Shown only on the first message of a run from the same sender.
        sender: Option<String>,
        own: bool,
        content: String,
    },
}

/// Builds a list of visual elements from messages in arrival order.
pub fn build_message_list_elements(
    messages: &[Message],
    store: &ChatStore,
) -> Vec<MessageListElement> {
    let me = store.current_user().map(|user| user.id.as_str());
    let mut elements = Vec::new();
    let mut prev_date: Option<NaiveDate> = None;
    let mut prev_sender: Option<&str> = None;

    for message in messages {
        let local = to_local(message.timestamp);
        let msg_date = local.date_naive();

        if prev_date != Some(msg_date) {
            elements.push(MessageListElement::DateSeparator(format_date(msg_date)));
            prev_sender = None;
        }

        let sender = if prev_sender == Some(message.from.as_str()) {
            None
        } else {
            Some(sender_name(store, &message.from).to_owned())
        };

        elements.push(MessageListElement::Message {
            time: local.format("%H:%M").to_string(),
            sender,
            own: me == Some(message.from.as_str()),
            content: message.content.clone(),
        });

        prev_date = Some(msg_date);
        prev_sender = Some(message.from.as_str());
    }

    elements
}

/// Resolves a user id to a display name through the roster.
pub fn sender_name<'a>(store: &'a ChatStore, user_id: &str) -> &'a str {
    if let Some(user) = store.user(user_id) {
        return &user.username;
    }

    match store.current_user() {
        Some(me) if me.id == user_id => &me.username,
        _ => UNKNOWN_SENDER,
    }
}

/// Converts a list element to a ListItem for ratatui rendering.
pub fn element_to_list_item(element: &MessageListElement, palette: &Palette) -> ListItem<'static> {
    match element {
        MessageListElement::DateSeparator(date) => {
            let line = Line::from(Span::styled(
                format!("--- {date} ---"),
                palette.muted_style(),
            ))
            .alignment(Alignment::Center);
            ListItem::new(line)
        }
        MessageListElement::Message {
            time,
            sender,
            own,
            content,
        } => message_item(time, sender.as_deref(), *own, content, palette),
    }
}

fn message_item(
    time: &str,
    sender: Option<&str>,
    own: bool,
    content: &str,
    palette: &Palette,
) -> ListItem<'static> {
    let indent = "      ";
    let mut lines = Vec::new();

    if let Some(name) = sender {
        let sender_style = if own {
            palette.own_sender_style()
        } else {
            palette.sender_style()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{time:>5} "), palette.message_time_style()),
            Span::styled(name.to_owned(), sender_style),
        ]));
    }

    for (index, text_line) in content.lines().enumerate() {
        let prefix = if sender.is_none() && index == 0 {
            Span::styled(format!("{time:>5} "), palette.message_time_style())
        } else {
            Span::raw(indent)
        };
        lines.push(Line::from(vec![
            prefix,
            Span::styled(text_line.to_owned(), palette.message_text_style()),
        ]));
    }

    ListItem::new(lines)
}

fn to_local(timestamp: DateTime<Utc>) -> DateTime<Local> {
    timestamp.with_timezone(&Local)
}

fn format_date(date: NaiveDate) -> String {
    date.format("%-d %b %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::fixtures::*;

    fn store_with_roster() -> ChatStore {
        let mut store = ChatStore::default();
        store.set_current_user(user("s1", "alice"));
        store.set_users(vec![user("s1", "alice"), user("s2", "bob")]);
        store
    }

    fn senders(elements: &[MessageListElement]) -> Vec<Option<&str>> {
        elements
            .iter()
            .filter_map(|element| match element {
                MessageListElement::Message { sender, .. } => Some(sender.as_deref()),
                MessageListElement::DateSeparator(_) => None,
            })
            .collect()
    }

    #[test]
    fn first_message_gets_a_date_separator() {
        let store = store_with_roster();
        let messages = vec![private_message("m1", "s2", "s1", "hi")];

        let elements = build_message_list_elements(&messages, &store);

        assert_eq!(elements.len(), 2);
        assert!(matches!(elements[0], MessageListElement::DateSeparator(_)));
    }

    #[test]
    fn consecutive_messages_from_one_sender_show_the_name_once() {
        let store = store_with_roster();
        let messages = vec![
            private_message("m1", "s2", "s1", "one"),
            private_message("m2", "s2", "s1", "two"),
            private_message("m3", "s1", "s2", "three"),
        ];

        let elements = build_message_list_elements(&messages, &store);

        assert_eq!(senders(&elements), vec![Some("bob"), None, Some("alice")]);
    }

    #[test]
    fn date_change_inserts_separator_and_repeats_sender() {
        let store = store_with_roster();
        let mut next_day = private_message("m2", "s2", "s1", "later");
        next_day.timestamp = at(3 * 86_400);
        let messages = vec![private_message("m1", "s2", "s1", "earlier"), next_day];

        let elements = build_message_list_elements(&messages, &store);

        assert_eq!(elements.len(), 4);
        assert!(matches!(elements[2], MessageListElement::DateSeparator(_)));
        assert_eq!(senders(&elements), vec![Some("bob"), Some("bob")]);
    }

    #[test]
    fn own_messages_are_flagged() {
        let store = store_with_roster();
        let messages = vec![private_message("m1", "s1", "s2", "mine")];

        let elements = build_message_list_elements(&messages, &store);

        assert!(matches!(
            &elements[1],
            MessageListElement::Message { own: true, .. }
        ));
    }

    #[test]
    fn unknown_sender_falls_back_to_placeholder() {
        let store = store_with_roster();

        assert_eq!(sender_name(&store, "gone"), UNKNOWN_SENDER);
        assert_eq!(sender_name(&store, "s2"), "bob");
    }

    #[test]
    fn format_date_produces_day_month_year() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 14).expect("valid date");

        assert_eq!(format_date(date), "14 Feb 2026");
    }
}
