use crate::{
    error::AppError,
    models::{address::Address, slots::SlotMap},
    schema::doctors,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Queryable, Insertable)]
#[table_name = "doctors"]
pub struct DoctorData {
    pub did: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub image: String,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    pub available: bool,
    pub fees: i32,
    pub address: String,
    pub created_at: NaiveDateTime,
    pub slots_booked: String,
}

#[derive(AsChangeset, Default)]
#[table_name = "doctors"]
pub struct UpdateDoctor {
    pub fees: Option<i32>,
    pub address: Option<String>,
    pub available: Option<bool>,
}

/// Doctor profile without the credential and the slot map. This is what gets
/// copied into an appointment at booking time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DoctorProfile {
    pub did: String,
    pub name: String,
    pub email: String,
    pub image: String,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    pub available: bool,
    pub fees: i32,
    pub address: Address,
    pub created_at: String,
}

impl DoctorData {
    pub fn profile(&self) -> Result<DoctorProfile, AppError> {
        Ok(DoctorProfile {
            did: self.did.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            image: self.image.clone(),
            speciality: self.speciality.clone(),
            degree: self.degree.clone(),
            experience: self.experience.clone(),
            about: self.about.clone(),
            available: self.available,
            fees: self.fees,
            address: Address::from_json(&self.address)?,
            created_at: crate::utils::format_time_str(&self.created_at),
        })
    }

    pub fn slot_map(&self) -> Result<SlotMap, AppError> {
        SlotMap::from_json(&self.slots_booked)
    }
}
