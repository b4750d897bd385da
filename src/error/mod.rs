use crate::editor::ValidationError;
use crate::export::ExportError;
use crate::render::RenderError;
use crate::scene::LoadError;
use crate::search::SearchError;
use crate::state::StateError;
use crate::storage::DeliveryError;
use thiserror::Error;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_errors_keep_their_user_facing_text() {
        let err: AppError = ValidationError::InvalidSelection.into();
        assert_eq!(
            err.to_string(),
            "No image selected or image data is invalid. Please go back and select an image."
        );
        let err: AppError = SearchError::NoResults.into();
        assert_eq!(
            err.to_string(),
            "No images found for your search. Try different keywords."
        );
    }
}
