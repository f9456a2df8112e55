use game_core::{ErrorSeverity, GameError, InventoryError};
use ui_engine::UiError;

/// Failures while building the game's windows.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum WindowError {
    #[error(transparent)]
    Ui(#[from] UiError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error("no actor is selected")]
    NoSelectedActor,
}

impl GameError for WindowError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Ui(err) if err.is_stale_id() => ErrorSeverity::Validation,
            Self::Ui(_) => ErrorSeverity::Internal,
            Self::Inventory(err) => err.severity(),
            Self::NoSelectedActor => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Ui(err) => err.code(),
            Self::Inventory(err) => err.error_code(),
            Self::NoSelectedActor => "WINDOW_NO_SELECTED_ACTOR",
        }
    }
}
