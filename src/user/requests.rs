use serde::Deserialize;

use crate::models::address::Address;

#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

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
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    pub address: Option<Address>,
    #[serde(default)]
    pub dob: String,
    #[serde(default)]
    pub gender: String,
    pub image: Option<String>,
}

#[derive(Deserialize)]
pub struct ModifyPasswordRequest {
    pub login_token: String,
    pub password_old: String,
    pub password_new: String,
}

#[derive(Deserialize)]
pub struct SearchDoctorRequest {
    pub speciality: Option<String>,
}

#[derive(Deserialize)]
pub struct AppointRequest {
    pub login_token: String,
    pub doc_id: String,
    pub slot_date: String,
    pub slot_time: String,
}

#[derive(Deserialize)]
pub struct SearchAppointRequest {
    pub login_token: String,
}

#[derive(Deserialize)]
pub struct CancelAppointRequest {
    pub login_token: String,
    pub appointment_id: String,
}

#[derive(Deserialize)]
pub struct PayAppointRequest {
    pub login_token: String,
    pub appointment_id: String,
}

#[derive(Deserialize)]
pub struct VerifyPaymentRequest {
    pub login_token: String,
    pub appointment_id: String,
    pub session_id: String,
}
