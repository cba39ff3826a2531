use serde::Serialize;

use crate::{
    booking::dashboard::AdminDashboard,
    models::{appointments::AppointmentItem, doctors::DoctorProfile},
};

#[derive(Default, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub login_token: String,
}

#[derive(Default, Serialize)]
pub struct AddDoctorResponse {
    pub success: bool,
    pub message: String,
    pub doc_id: String,
}

#[derive(Default, Serialize)]
pub struct SearchDoctorResponse {
    pub success: bool,
    pub message: String,
    pub doctors: Vec<DoctorProfile>,
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
    pub dash_data: AdminDashboard,
}

crate::impl_err_response! {
    LoginResponse,
    AddDoctorResponse,
    SearchDoctorResponse,
    ChangeAvailabilityResponse,
    SearchAppointResponse,
    DashboardResponse,
}
