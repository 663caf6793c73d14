use crate::navigator::SecretReference;

/// How an interactive session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Cancelled,
    Chosen(SecretReference),
}

/// One-line feedback shown under the listing until the next action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum StatusMessage {
    AtStoreRoot,
    CannotOpen(String),
    Error(String),
}

impl StatusMessage {
    pub(super) fn text(&self) -> String {
        match self {
            StatusMessage::AtStoreRoot => "Already at the store root".to_string(),
            StatusMessage::CannotOpen(name) => format!("Cannot open {}", name),
            StatusMessage::Error(msg) => msg.clone(),
        }
    }
}
