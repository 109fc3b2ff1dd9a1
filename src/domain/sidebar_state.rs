use super::{chat_store::ChatStore, text_input_state::TextInputState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarEntry {
    User { id: String, username: String },
    Group { id: String, name: String },
}

impl SidebarEntry {
    pub fn id(&self) -> &str {
        match self {
            Self::User { id, .. } | Self::Group { id, .. } => id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::User { username, .. } => username,
            Self::Group { name, .. } => name,
        }
    }
}

/// Lists other users, then groups, both filtered by a case-insensitive
/// substring of the search term.
pub fn build_entries(store: &ChatStore, search_term: &str) -> Vec<SidebarEntry> {
    let needle = search_term.to_lowercase();
    let matches = |label: &str| label.to_lowercase().contains(&needle);

    let users = store
        .other_users()
        .filter(|user| matches(&user.username))
        .map(|user| SidebarEntry::User {
            id: user.id.clone(),
            username: user.username.clone(),
        });

    let groups = store
        .groups()
        .iter()
        .filter(|group| matches(&group.name))
        .map(|group| SidebarEntry::Group {
            id: group.id.clone(),
            name: group.name.clone(),
        });

    users.chain(groups).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SidebarState {
    search: TextInputState,
    entries: Vec<SidebarEntry>,
    selected_index: Option<usize>,
}

impl SidebarState {
    pub fn search(&self) -> &TextInputState {
        &self.search
    }

    pub fn search_mut(&mut self) -> &mut TextInputState {
        &mut self.search
    }

    pub fn entries(&self) -> &[SidebarEntry] {
        &self.entries
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    pub fn selected_entry(&self) -> Option<&SidebarEntry> {
        self.selected_index.and_then(|index| self.entries.get(index))
    }

    /// Rebuilds the visible entries, keeping the selection on the same id.
    pub fn refresh(&mut self, store: &ChatStore) {
        let previous = self.selected_entry().map(|entry| entry.id().to_owned());
        self.entries = build_entries(store, self.search.text());
        self.selected_index = resolve_selection_index(&self.entries, previous.as_deref());
    }

    pub fn select_next(&mut self) {
        let Some(index) = self.selected_index else {
            return;
        };

        let last_index = self.entries.len().saturating_sub(1);
        self.selected_index = Some(index.saturating_add(1).min(last_index));
    }

    pub fn select_previous(&mut self) {
        let Some(index) = self.selected_index else {
            return;
        };

        self.selected_index = Some(index.saturating_sub(1));
    }
}

fn resolve_selection_index(entries: &[SidebarEntry], previous_id: Option<&str>) -> Option<usize> {
    if entries.is_empty() {
        return None;
    }

    previous_id
        .and_then(|id| entries.iter().position(|entry| entry.id() == id))
        .or(Some(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::fixtures::{group, user};

    fn store() -> ChatStore {
        let mut store = ChatStore::default();
        store.set_current_user(user("s1", "alice"));
        store.set_users(vec![
            user("s1", "alice"),
            user("s2", "Bob"),
            user("s3", "carol"),
        ]);
        store.set_groups(vec![group("g1", "Backend", &["s1", "s2"])]);
        store
    }

    fn labels(entries: &[SidebarEntry]) -> Vec<&str> {
        entries.iter().map(SidebarEntry::label).collect()
    }

    #[test]
    fn lists_other_users_before_groups() {
        let entries = build_entries(&store(), "");

        assert_eq!(labels(&entries), vec!["Bob", "carol", "Backend"]);
    }

    #[test]
    fn search_is_case_insensitive_over_users_and_groups() {
        let entries = build_entries(&store(), "B");

        assert_eq!(labels(&entries), vec!["Bob", "Backend"]);
    }

    #[test]
    fn refresh_selects_first_entry_then_tracks_it_by_id() {
        let mut sidebar = SidebarState::default();
        let mut store = store();
        sidebar.refresh(&store);
        sidebar.select_next();
        assert_eq!(sidebar.selected_entry().map(SidebarEntry::id), Some("s3"));

        store.set_users(vec![user("s1", "alice"), user("s3", "carol")]);
        sidebar.refresh(&store);

        assert_eq!(sidebar.selected_entry().map(SidebarEntry::id), Some("s3"));
        assert_eq!(sidebar.selected_index(), Some(0));
    }

    #[test]
    fn selection_moves_within_bounds() {
        let mut sidebar = SidebarState::default();
        sidebar.refresh(&store());

        for _ in 0..5 {
            sidebar.select_next();
        }
        assert_eq!(sidebar.selected_index(), Some(2));

        for _ in 0..5 {
            sidebar.select_previous();
        }
        assert_eq!(sidebar.selected_index(), Some(0));
    }

    #[test]
    fn empty_result_clears_selection() {
        let mut sidebar = SidebarState::default();
        for ch in "zzz".chars() {
            sidebar.search_mut().insert_char(ch);
        }

        sidebar.refresh(&store());

        assert!(sidebar.entries().is_empty());
        assert_eq!(sidebar.selected_entry(), None);
    }
}
