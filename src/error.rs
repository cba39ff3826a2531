use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// Failures of the booking workflows.
///
/// Handlers never turn these into transport status codes; `post_funcs!`
/// renders every variant as `{success: false, message}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Doctor Not Available")]
    DoctorUnavailable,
    #[error("Slot Not Available")]
    SlotConflict,
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0} Not Found")]
    NotFound(&'static str),
    #[error("{0}")]
    ValidationFailed(String),
    #[error("{0}")]
    InternalFailure(String),
}

impl AppError {
    pub fn unauthorized() -> Self {
        AppError::Unauthorized("Unauthorized Action".to_string())
    }

    pub fn invalid<S: ToString>(msg: S) -> Self {
        AppError::ValidationFailed(msg.to_string())
    }

    /// For inserts guarded by a unique key: a duplicate row reads as
    /// `ValidationFailed(msg)`, anything else converts as usual.
    pub fn on_duplicate(msg: &'static str) -> impl FnOnce(diesel::result::Error) -> AppError {
        move |err| match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                AppError::invalid(msg)
            }
            err => err.into(),
        }
    }
}

impl From<diesel::result::Error> for AppError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            DieselError::NotFound => AppError::NotFound("Record"),
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                AppError::invalid("Record already exists")
            }
            err => AppError::InternalFailure(format!("DB error: {}", err)),
        }
    }
}

impl From<r2d2::Error> for AppError {
    fn from(err: r2d2::Error) -> Self {
        AppError::InternalFailure(format!("DB connection error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InternalFailure(format!("Malformed stored document: {}", err))
    }
}
