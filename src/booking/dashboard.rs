use diesel::prelude::*;
use serde::Serialize;

use crate::{
    error::AppError,
    models::appointments::{to_items, Appointment, AppointmentItem},
};

pub const LATEST_COUNT: usize = 5;

#[derive(Default, Serialize)]
pub struct DoctorDashboard {
    pub earnings: i64,
    pub appointments: usize,
    pub patients: usize,
    pub latest_appointments: Vec<AppointmentItem>,
}

#[derive(Default, Serialize)]
pub struct AdminDashboard {
    pub doctors: i64,
    pub appointments: i64,
    pub patients: i64,
    pub latest_appointments: Vec<AppointmentItem>,
}

/// Sum of `amount` over completed appointments.
///
/// Being paid does not count on its own: only completion earns.
pub fn earnings(appointments: &[Appointment]) -> i64 {
    appointments
        .iter()
        .filter(|appo| appo.is_completed)
        .map(|appo| i64::from(appo.amount))
        .sum()
}

/// Distinct patient ids, in order of first appearance.
pub fn distinct_patients(appointments: &[Appointment]) -> Vec<&str> {
    let mut patients: Vec<&str> = Vec::new();
    for appo in appointments {
        if !patients.contains(&appo.user_id.as_str()) {
            patients.push(&appo.user_id);
        }
    }
    patients
}

/// The last `LATEST_COUNT` appointments of a booking-ordered list, newest first.
pub fn latest(appointments: &[Appointment]) -> Vec<&Appointment> {
    appointments.iter().rev().take(LATEST_COUNT).collect()
}

fn latest_items(appointments: &[Appointment]) -> Result<Vec<AppointmentItem>, AppError> {
    latest(appointments)
        .into_iter()
        .map(Appointment::to_item)
        .collect()
}

/// `appointments` must be one doctor's appointments in booking order.
pub fn doctor_dashboard(appointments: &[Appointment]) -> Result<DoctorDashboard, AppError> {
    Ok(DoctorDashboard {
        earnings: earnings(appointments),
        appointments: appointments.len(),
        patients: distinct_patients(appointments).len(),
        latest_appointments: latest_items(appointments)?,
    })
}

pub fn admin_dashboard(conn: &MysqlConnection) -> Result<AdminDashboard, AppError> {
    use crate::schema::{appointments, doctors, users};

    let doctors = doctors::table.count().get_result::<i64>(conn)?;
    let patients = users::table.count().get_result::<i64>(conn)?;
    let total = appointments::table.count().get_result::<i64>(conn)?;
    let latest = appointments::table
        .order(appointments::seq.desc())
        .limit(LATEST_COUNT as i64)
        .load::<Appointment>(conn)?;

    Ok(AdminDashboard {
        doctors,
        appointments: total,
        patients,
        latest_appointments: to_items(&latest)?,
    })
}
