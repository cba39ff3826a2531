use crate::{
    error::AppError,
    models::{doctors::DoctorProfile, users::UserProfile},
    schema::appointments,
};
use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Queryable, Clone, Debug)]
pub struct Appointment {
    pub aid: String,
    pub seq: u64,
    pub user_id: String,
    pub doc_id: String,
    pub slot_date: String,
    pub slot_time: String,
    pub user_data: String,
    pub doc_data: String,
    pub amount: i32,
    pub created_at: NaiveDateTime,
    pub cancelled: bool,
    pub payment: bool,
    pub is_completed: bool,
}

#[derive(Insertable)]
#[table_name = "appointments"]
pub struct NewAppointment {
    pub aid: String,
    pub user_id: String,
    pub doc_id: String,
    pub slot_date: String,
    pub slot_time: String,
    pub user_data: String,
    pub doc_data: String,
    pub amount: i32,
    pub created_at: NaiveDateTime,
}

/// Appointment as returned to clients, with both snapshots expanded.
///
/// `user_data` and `doc_data` show the profiles as they were at booking time.
#[derive(Default, Serialize)]
pub struct AppointmentItem {
    pub aid: String,
    pub user_id: String,
    pub doc_id: String,
    pub slot_date: String,
    pub slot_time: String,
    pub user_data: UserProfile,
    pub doc_data: DoctorProfile,
    pub amount: i32,
    pub date: String,
    pub cancelled: bool,
    pub payment: bool,
    pub is_completed: bool,
}

impl Appointment {
    pub fn to_item(&self) -> Result<AppointmentItem, AppError> {
        Ok(AppointmentItem {
            aid: self.aid.clone(),
            user_id: self.user_id.clone(),
            doc_id: self.doc_id.clone(),
            slot_date: self.slot_date.clone(),
            slot_time: self.slot_time.clone(),
            user_data: serde_json::from_str(&self.user_data)?,
            doc_data: serde_json::from_str(&self.doc_data)?,
            amount: self.amount,
            date: crate::utils::format_time_str(&self.created_at),
            cancelled: self.cancelled,
            payment: self.payment,
            is_completed: self.is_completed,
        })
    }
}

pub fn to_items(appointments: &[Appointment]) -> Result<Vec<AppointmentItem>, AppError> {
    appointments.iter().map(Appointment::to_item).collect()
}
