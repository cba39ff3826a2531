use serde::Deserialize;

use crate::models::address::Address;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LogoutRequest {
    pub login_token: String,
}

#[derive(Deserialize)]
pub struct ViewInfoRequest {
    pub login_token: String,
}

#[derive(Deserialize)]
pub struct ModifyInfoRequest {
    pub login_token: String,
    pub fees: Option<i32>,
    pub address: Option<Address>,
    pub available: Option<bool>,
}

#[derive(Deserialize)]
pub struct ModifyPasswordRequest {
    pub login_token: String,
    pub password_old: String,
    pub password_new: String,
}

#[derive(Deserialize)]
pub struct ChangeAvailabilityRequest {
    pub login_token: String,
}

#[derive(Deserialize)]
pub struct SearchAppointRequest {
    pub login_token: String,
}

#[derive(Deserialize)]
pub struct FinishAppointRequest {
    pub login_token: String,
    pub appointment_id: String,
}

#[derive(Deserialize)]
pub struct CancelAppointRequest {
    pub login_token: String,
    pub appointment_id: String,
}

#[derive(Deserialize)]
pub struct DashboardRequest {
    pub login_token: String,
}
