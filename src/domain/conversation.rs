/// Builds the bucket key for a private conversation between two users.
///
/// The key does not depend on argument order.
pub fn conversation_key(a: &str, b: &str) -> String {
    if a <= b {
        format!("{a}-{b}")
    } else {
        format!("{b}-{a}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActiveChat {
    #[default]
    None,
    Private(String),
    Group(String),
}

impl ActiveChat {
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::None)
    }
}
