//! # Error Handling for Relationship Introspection
//!
//! All fallible operations in this crate return [`PanelError`]. The error:
//! - maps to an HTTP status code so controllers can return it directly
//! - renders a sanitized JSON body through Axum's `IntoResponse`
//! - logs internal details through `tracing` instead of sending them to users
//!
//! A relation that simply does not exist on the root model is *not* an error:
//! [`Relationships::relation_instance`](crate::Relationships::relation_instance)
//! returns `Ok(None)` and callers treat the field as a plain column.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use crudpanel::{PanelError, Relationships};
//!
//! async fn store(
//!     State(panel): State<Arc<CrudPanel>>,
//!     Json(input): Json<Map<String, Value>>,
//! ) -> Result<Json<Map<String, Value>>, PanelError> {
//!     let data = panel.belongs_to_names_to_foreign_keys(input)?;
//!     Ok(Json(data))
//! }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

/// Errors raised while resolving relations or interpreting field declarations
#[derive(Debug)]
pub enum PanelError {
    /// A dotted entity path could not be parsed (empty, `a..b`, trailing dot)
    InvalidPath {
        /// The offending path as written
        path: String,
        /// What is wrong with it
        reason: String,
    },

    /// A model class was reached that has no registered schema
    UnknownModel {
        /// Class (or table) name that was looked up
        class: String,
    },

    /// An intermediate or terminal path segment is not a relation on the model reached so far
    UnknownRelation {
        /// Class of the model the segment was looked up on
        model: String,
        /// The segment that did not name a relation
        relation: String,
    },

    /// Field declarations could not be loaded
    Config {
        /// User-facing message
        message: String,
        /// Underlying error details (logged, not sent to user)
        internal: Option<String>,
    },
}

impl PanelError {
    /// Create an invalid path error
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an unknown model error
    pub fn unknown_model(class: impl Into<String>) -> Self {
        Self::UnknownModel {
            class: class.into(),
        }
    }

    /// Create an unknown relation error
    pub fn unknown_relation(model: impl Into<String>, relation: impl Into<String>) -> Self {
        Self::UnknownRelation {
            model: model.into(),
            relation: relation.into(),
        }
    }

    /// HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidPath { .. } => StatusCode::BAD_REQUEST,
            Self::UnknownRelation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::UnknownModel { .. } | Self::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// User-facing error message (sanitized)
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidPath { path, reason } => format!("Invalid entity path '{path}': {reason}"),
            Self::UnknownRelation { model, relation } => {
                format!("'{relation}' is not a relation of {model}")
            }
            // Class names stay server-side
            Self::UnknownModel { .. } => "Model is not registered".to_string(),
            Self::Config { message, .. } => message.clone(),
        }
    }

    /// Log internal error details (not sent to user)
    fn log_internal(&self) {
        match self {
            Self::UnknownModel { class } => {
                tracing::error!(model = %class, "Relation points at an unregistered model");
            }
            Self::Config {
                internal: Some(details),
                ..
            } => {
                tracing::error!(details = %details, "Field configuration error");
            }
            _ => {
                tracing::debug!(
                    error = %self.user_message(),
                    status = %self.status_code(),
                    "Panel error"
                );
            }
        }
    }
}

/// Error response sent to users (sanitized)
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for PanelError {
    fn into_response(self) -> Response {
        self.log_internal();

        let status = self.status_code();
        let response = ErrorResponse {
            error: self.user_message(),
        };

        (status, Json(response)).into_response()
    }
}

impl fmt::Display for PanelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownModel { class } => write!(f, "Model '{class}' is not registered"),
            _ => write!(f, "{}", self.user_message()),
        }
    }
}

impl std::error::Error for PanelError {}

impl From<serde_json::Error> for PanelError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config {
            message: "Invalid field configuration".to_string(),
            internal: Some(err.to_string()),
        }
    }
}
