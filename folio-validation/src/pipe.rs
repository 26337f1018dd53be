// Validation pipe for request bodies

use crate::{DtoError, DtoRegistry, SealedDto, ValidationErrors};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipeError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Dto(#[from] DtoError),

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),
}

impl PipeError {
    /// HTTP status a controller should answer with. Registry errors are
    /// programming errors and map to 500.
    pub fn status_code(&self) -> u16 {
        match self {
            PipeError::Json(_) | PipeError::Validation(_) => 400,
            PipeError::Dto(DtoError::InvalidInput { .. }) => 400,
            PipeError::Dto(_) => 500,
        }
    }
}

/// Turns raw request bodies into validated, sealed DTOs.
pub struct ValidationPipe;

impl ValidationPipe {
    /// Parse `body` as JSON, construct `identity` and validate it for `group`.
    pub fn parse(
        registry: &DtoRegistry,
        identity: &str,
        body: &[u8],
        group: Option<&str>,
    ) -> Result<SealedDto, PipeError> {
        let raw: serde_json::Value = serde_json::from_slice(body)?;
        let (dto, report) = registry.construct_validated(identity, &raw, group)?;

        report.into_result().map_err(PipeError::Validation)?;
        Ok(dto)
    }

    /// JSON payload for a 400 response.
    pub fn error_response(errors: &ValidationErrors) -> serde_json::Value {
        let mut body = errors.to_json();
        body["statusCode"] = serde_json::json!(400);
        body["message"] = serde_json::json!("Validation failed");
        body
    }
}

/// Validate a sealed DTO against a registry for a group, returning early
/// with [`PipeError::Validation`] on failure.
#[macro_export]
macro_rules! validate {
    ($registry:expr, $dto:expr, $group:expr) => {{
        $registry
            .validate(&$dto, $group)
            .map_err($crate::PipeError::from)?
            .into_result()
            .map_err($crate::PipeError::Validation)?
    }};
}
