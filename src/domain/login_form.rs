use thiserror::Error;

use super::text_input_state::TextInputState;

pub const MIN_USERNAME_CHARS: usize = 3;

pub const CONNECT_FAILED_MESSAGE: &str = "Failed to connect to chat server. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UsernameError {
    #[error("Please enter a username")]
    Empty,
    #[error("Username must be at least 3 characters")]
    TooShort,
}

/// Checks a raw username and returns the trimmed form to register.
pub fn validate_username(raw: &str) -> Result<String, UsernameError> {
    let username = raw.trim();
    if username.is_empty() {
        return Err(UsernameError::Empty);
    }

    if username.chars().count() < MIN_USERNAME_CHARS {
        return Err(UsernameError::TooShort);
    }

    Ok(username.to_owned())
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoginFormState {
    input: TextInputState,
    error: Option<String>,
    pending_username: Option<String>,
}

impl LoginFormState {
    pub fn input(&self) -> &TextInputState {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut TextInputState {
        &mut self.input
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_joining(&self) -> bool {
        self.pending_username.is_some()
    }

    /// Validates the field; on success the form waits for the connection.
    pub fn submit(&mut self) -> Result<String, UsernameError> {
        match validate_username(self.input.text()) {
            Ok(username) => {
                self.error = None;
                self.pending_username = Some(username.clone());
                Ok(username)
            }
            Err(error) => {
                self.error = Some(error.to_string());
                Err(error)
            }
        }
    }

    pub fn fail_join(&mut self, message: impl Into<String>) {
        self.pending_username = None;
        self.error = Some(message.into());
    }

    /// Returns the username that was waiting for the connection.
    pub fn finish_join(&mut self) -> Option<String> {
        self.pending_username.take()
    }
}
