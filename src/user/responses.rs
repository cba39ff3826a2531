use serde::Serialize;

use crate::models::{appointments::AppointmentItem, users::UserProfile};

#[derive(Default, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub login_token: String,
}

#[derive(Default, Serialize)]
pub struct ViewInfoResponse {
    pub success: bool,
    pub message: String,
    pub user_data: UserProfile,
}

#[derive(Default, Serialize)]
pub struct SearchDoctorItem {
    pub did: String,
    pub name: String,
    pub image: String,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    pub available: bool,
    pub fees: i32,
    pub address: crate::models::address::Address,
}

#[derive(Default, Serialize)]
pub struct SearchDoctorResponse {
    pub success: bool,
    pub message: String,
    pub doctors: Vec<SearchDoctorItem>,
}

#[derive(Default, Serialize)]
pub struct AppointResponse {
    pub success: bool,
    pub message: String,
    pub appointment_id: String,
}

#[derive(Default, Serialize)]
pub struct SearchAppointResponse {
    pub success: bool,
    pub message: String,
    pub appointments: Vec<AppointmentItem>,
}

#[derive(Default, Serialize)]
pub struct PayAppointResponse {
    pub success: bool,
    pub message: String,
    pub session_id: String,
    pub session_url: String,
}

crate::impl_err_response! {
    LoginResponse,
    ViewInfoResponse,
    SearchDoctorResponse,
    AppointResponse,
    SearchAppointResponse,
    PayAppointResponse,
}
