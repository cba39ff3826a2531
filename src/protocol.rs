use actix_web::{error::InternalError, web, HttpResponse};
use serde::Serialize;

#[derive(Default, Serialize)]
pub struct SimpleResponse {
    pub success: bool,
    pub message: String,
}

impl SimpleResponse {
    pub fn ok<S: ToString>(message: S) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }
}

#[macro_export]
macro_rules! impl_err_response {
    ( $( $type:ty),+ $(,)? ) => {
        $(
            impl $type {
                pub fn err<S: ToString>(err: S) -> Self {
                    Self {
                        success: false,
                        message: err.to_string(),
                        ..Default::default()
                    }
                }
            }
        )+
    };
}

impl_err_response! {
    SimpleResponse,
}

/// Malformed bodies answer with the usual `{success: false, message}` and a 200,
/// like every other failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = format!("Invalid request body: {}", err);
        log::warn!("{}", message);
        InternalError::from_response(err, HttpResponse::Ok().json(SimpleResponse::err(message)))
            .into()
    })
}
