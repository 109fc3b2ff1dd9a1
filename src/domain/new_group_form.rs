use thiserror::Error;

use super::text_input_state::TextInputState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NewGroupError {
    #[error("Please enter a group name")]
    EmptyName,
    #[error("Please select at least one user")]
    NoMembers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NewGroupFocus {
    #[default]
    Name,
    Members,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGroupRequest {
    pub name: String,
    pub members: Vec<String>,
}

/// State of the "create group" dialog.
///
/// `candidates` is captured from the roster when the dialog opens; the
/// current user is never a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewGroupForm {
    name: TextInputState,
    candidates: Vec<(String, String)>,
    selected: Vec<String>,
    cursor: usize,
    focus: NewGroupFocus,
    error: Option<String>,
}

impl NewGroupForm {
    /// `candidates` are `(user id, username)` pairs.
    pub fn new(candidates: Vec<(String, String)>) -> Self {
        Self {
            candidates,
            ..Self::default()
        }
    }

    pub fn name(&self) -> &TextInputState {
        &self.name
    }

    pub fn name_mut(&mut self) -> &mut TextInputState {
        &mut self.name
    }

    pub fn candidates(&self) -> &[(String, String)] {
        &self.candidates
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn focus(&self) -> NewGroupFocus {
        self.focus
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_selected(&self, user_id: &str) -> bool {
        self.selected.iter().any(|id| id == user_id)
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            NewGroupFocus::Name => NewGroupFocus::Members,
            NewGroupFocus::Members => NewGroupFocus::Name,
        };
    }

    pub fn cursor_down(&mut self) {
        let last = self.candidates.len().saturating_sub(1);
        self.cursor = (self.cursor + 1).min(last);
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Selects or deselects the candidate under the cursor.
    pub fn toggle_under_cursor(&mut self) {
        let Some((user_id, _)) = self.candidates.get(self.cursor) else {
            return;
        };

        if let Some(position) = self.selected.iter().position(|id| id == user_id) {
            self.selected.remove(position);
        } else {
            self.selected.push(user_id.clone());
        }
    }

    pub fn submit(&mut self) -> Result<NewGroupRequest, NewGroupError> {
        let result = self.validate();
        self.error = result.as_ref().err().map(ToString::to_string);
        result
    }

    fn validate(&self) -> Result<NewGroupRequest, NewGroupError> {
        let name = self.name.text().trim();
        if name.is_empty() {
            return Err(NewGroupError::EmptyName);
        }

        if self.selected.is_empty() {
            return Err(NewGroupError::NoMembers);
        }

        Ok(NewGroupRequest {
            name: name.to_owned(),
            members: self.selected.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> NewGroupForm {
        NewGroupForm::new(vec![
            ("s2".to_owned(), "bob".to_owned()),
            ("s3".to_owned(), "carol".to_owned()),
        ])
    }

    fn named(mut form: NewGroupForm, name: &str) -> NewGroupForm {
        for ch in name.chars() {
            form.name_mut().insert_char(ch);
        }
        form
    }

    #[test]
    fn rejects_blank_name() {
        let mut form = named(form(), "  ");

        assert_eq!(form.submit(), Err(NewGroupError::EmptyName));
        assert_eq!(form.error(), Some("Please enter a group name"));
    }

    #[test]
    fn rejects_missing_members() {
        let mut form = named(form(), "ops");

        assert_eq!(form.submit(), Err(NewGroupError::NoMembers));
        assert_eq!(form.error(), Some("Please select at least one user"));
    }

    #[test]
    fn toggling_twice_deselects() {
        let mut form = form();

        form.toggle_under_cursor();
        assert!(form.is_selected("s2"));
        form.toggle_under_cursor();
        assert!(!form.is_selected("s2"));
    }

    #[test]
    fn submit_returns_members_in_selection_order() {
        let mut form = named(form(), " ops ");
        form.cursor_down();
        form.toggle_under_cursor();
        form.cursor_up();
        form.toggle_under_cursor();

        let request = form.submit().expect("form should be valid");

        assert_eq!(request.name, "ops");
        assert_eq!(request.members, vec!["s3", "s2"]);
        assert_eq!(form.error(), None);
    }

    #[test]
    fn cursor_is_clamped_to_candidates() {
        let mut form = form();

        form.cursor_down();
        form.cursor_down();
        form.cursor_down();

        assert_eq!(form.cursor(), 1);
    }

    #[test]
    fn toggle_without_candidates_is_noop() {
        let mut form = NewGroupForm::new(Vec::new());
        for ch in "ops".chars() {
            form.name_mut().insert_char(ch);
        }

        form.toggle_under_cursor();

        assert_eq!(form.submit(), Err(NewGroupError::NoMembers));
    }
}
