/// Errors returned when building or editing an assistant.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AssistantError {
    #[error("unknown assistant kind {0:?}")]
    UnknownKind(String),
    #[error("no handle at index {0}")]
    HandleIndex(usize),
    #[error("{kind} assistant takes at most {max} handles")]
    TooManyHandles { kind: &'static str, max: usize },
}
