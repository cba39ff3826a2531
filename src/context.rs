use actix_web::web;

use crate::{config::Config, error::AppError};

/// Who is acting, as resolved from the login token.
#[derive(Clone, Debug, PartialEq)]
pub enum Identity {
    Patient(String),
    Doctor(String),
    Admin(String),
}

/// Per-request state handed to every workflow call: the verified identity and
/// the shared configuration.
#[derive(Clone)]
pub struct RequestContext {
    pub identity: Identity,
    pub config: web::Data<Config>,
}

impl RequestContext {
    pub fn new(identity: Identity, config: web::Data<Config>) -> Self {
        Self { identity, config }
    }

    pub fn patient_id(&self) -> Result<&str, AppError> {
        match &self.identity {
            Identity::Patient(uid) => Ok(uid),
            _ => Err(AppError::unauthorized()),
        }
    }

    pub fn doctor_id(&self) -> Result<&str, AppError> {
        match &self.identity {
            Identity::Doctor(did) => Ok(did),
            _ => Err(AppError::unauthorized()),
        }
    }
}
