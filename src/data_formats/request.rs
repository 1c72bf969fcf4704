use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::errors::{FieldErrors, RequestError};

// ----------------- Article Request -----------------
#[derive(Deserialize, Serialize, Debug, Default, Clone, Validate)]
pub struct ArticleModel {
    #[serde(default)]
    #[garde(custom(required))]
    pub title: String,
    #[serde(default)]
    #[garde(custom(required))]
    pub content: String,
}

// ----------------- Comment Request -----------------
#[derive(Deserialize, Serialize, Debug, Default, Clone, Validate)]
pub struct CommentModel {
    #[serde(default)]
    #[garde(skip)]
    pub title: String,
    #[serde(default)]
    #[garde(custom(required))]
    pub content: String,
}

/// Runs the model's field rules and turns a failed report into a 400.
pub fn check<T: Validate<Context = ()>>(model: &T) -> Result<(), RequestError> {
    model.validate().map_err(|report| {
        let errors = FieldErrors::from(report);
        tracing::warn!(%errors, "rejected payload");
        RequestError::Validation(errors)
    })
}

fn required(value: &str, _: &()) -> garde::Result {
    if value.trim().is_empty() {
        return Err(garde::Error::new("value is required"));
    }
    Ok(())
}
