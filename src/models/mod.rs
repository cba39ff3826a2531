pub mod address;
pub mod appointments;
pub mod doctors;
pub mod slots;
pub mod users;

pub mod admin_logins;
pub mod doctor_logins;
pub mod user_logins;
