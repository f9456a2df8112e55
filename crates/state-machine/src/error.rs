//! Errors reported by the state-machine framework.

/// Failures surfaced while building or driving a [`StateMachine`](crate::StateMachine).
///
/// Dispatching to a tag without a handler is not represented here: the
/// builder refuses to produce such a machine.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StateMachineError {
    #[error("state machine `{machine}` has no handler for {tag}")]
    MissingHandler { machine: &'static str, tag: String },

    #[error("state machine `{machine}` registered {tag} twice")]
    DuplicateHandler { machine: &'static str, tag: String },

    #[error("entity {entity} has no `{machine}` state component")]
    ComponentMissing { machine: &'static str, entity: String },

    #[error("state machine `{machine}` is already attached to a store")]
    AlreadyAttached { machine: &'static str },
}

impl StateMachineError {
    /// Static identifier for the variant, stable across message changes.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingHandler { .. } => "STATE_MISSING_HANDLER",
            Self::DuplicateHandler { .. } => "STATE_DUPLICATE_HANDLER",
            Self::ComponentMissing { .. } => "STATE_COMPONENT_MISSING",
            Self::AlreadyAttached { .. } => "STATE_ALREADY_ATTACHED",
        }
    }
}
