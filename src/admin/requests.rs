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
pub struct AddDoctorRequest {
    pub login_token: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub speciality: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub about: String,
    pub fees: Option<i32>,
    pub address: Option<Address>,
}

#[derive(Deserialize)]
pub struct SearchDoctorRequest {
    pub login_token: String,
}

#[derive(Deserialize)]
pub struct ChangeAvailabilityRequest {
    pub login_token: String,
    pub doc_id: String,
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
pub struct DashboardRequest {
    pub login_token: String,
}
