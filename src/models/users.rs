use crate::{error::AppError, models::address::Address, schema::users};
use serde::{Deserialize, Serialize};

#[derive(Queryable, Insertable, Identifiable)]
#[primary_key(uid)]
#[table_name = "users"]
pub struct UserData {
    pub uid: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub image: String,
    pub phone: String,
    pub address: String,
    pub gender: String,
    pub dob: String,
}

#[derive(AsChangeset, Default)]
#[table_name = "users"]
pub struct UpdateUser {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub gender: Option<String>,
    pub dob: Option<String>,
    pub image: Option<String>,
}

/// Patient profile without the credential. Also embedded in every appointment
/// as the booking-time snapshot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub uid: String,
    pub name: String,
    pub email: String,
    pub image: String,
    pub phone: String,
    pub address: Address,
    pub gender: String,
    pub dob: String,
}

impl UserData {
    pub fn profile(&self) -> Result<UserProfile, AppError> {
        Ok(UserProfile {
            uid: self.uid.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            image: self.image.clone(),
            phone: self.phone.clone(),
            address: Address::from_json(&self.address)?,
            gender: self.gender.clone(),
            dob: self.dob.clone(),
        })
    }
}

pub const DEFAULT_PHONE: &str = "000000000";
pub const NOT_SELECTED: &str = "Not Selected";
