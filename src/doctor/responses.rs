use serde::Serialize;

use crate::{
    booking::dashboard::DoctorDashboard,
    models::{appointments::AppointmentItem, doctors::DoctorProfile},
};

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
    pub profile_data: DoctorProfile,
}

#[derive(Default, Serialize)]
pub struct ChangeAvailabilityResponse {
    pub success: bool,
    pub message: String,
    pub available: bool,
}

#[derive(Default, Serialize)]
pub struct SearchAppointResponse {
    pub success: bool,
    pub message: String,
    pub appointments: Vec<AppointmentItem>,
}

#[derive(Default, Serialize)]
pub struct DashboardResponse {
    pub success: bool,
    pub message: String,
    pub dash_data: DoctorDashboard,
}

crate::impl_err_response! {
    LoginResponse,
    ViewInfoResponse,
    ChangeAvailabilityResponse,
    SearchAppointResponse,
    DashboardResponse,
}
