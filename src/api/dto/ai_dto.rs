//! AI proxy DTOs.

use serde::Deserialize;
use utoipa::IntoParams;

pub use crate::upstream::{AnalyzeRequest, ChatRequest};

/// Query parameters for `GET /ai/wisdom`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WisdomParams {
    /// Theme to generate wisdom about; defaults to `"life"`.
    #[serde(default)]
    pub theme: Option<String>,
}

impl WisdomParams {
    /// Returns the theme, falling back to `"life"` when absent or empty.
    #[must_use]
    pub fn theme_or_default(&self) -> &str {
        self.theme.as_deref().filter(|t| !t.is_empty()).unwrap_or("life")
    }
}
