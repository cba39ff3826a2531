#[macro_export]
macro_rules! post_funcs {
    ( $( ( $func_name:ident, $url:expr, $request:ty, $response:ty ) ),+ $(,)? ) => {
        $(
            paste::paste! {
                #[post($url)]
                async fn $func_name(
                    pool: web::Data<$crate::DbPool>,
                    config: web::Data<$crate::config::Config>,
                    info: web::Json<$request>
                ) -> impl Responder {
                    let response = match [<$func_name _impl>](pool, config, info).await {
                        Ok(response) => response,
                        Err(err) => {
                            log::warn!("{} failed: {:#}", stringify!($func_name), err);
                            <$response>::err(err.to_string())
                        }
                    };
                    HttpResponse::Ok().json(response)
                }
            }
        )+
    };
}

use anyhow::bail;
use blake2::{Blake2b, Digest};
use chrono::{NaiveDate, NaiveDateTime};

use crate::error::AppError;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Salted bcrypt hash. The salt and cost travel inside the returned string.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|err| AppError::InternalFailure(format!("Failed to hash password: {}", err)))
}

pub fn verify_password(password: &str, hashed: &str) -> Result<bool, AppError> {
    bcrypt::verify(password, hashed)
        .map_err(|err| AppError::InternalFailure(format!("Failed to verify password: {}", err)))
}

pub fn generate_login_token(id: &str, role: &str) -> String {
    let nonce = uuid::Uuid::new_v4();
    format!(
        "{:x}",
        Blake2b::digest(format!("{}:{}:{}", role, id, nonce).as_bytes())
    )
}

/// Owner of a stored login `(id, login_time)`, unless it is missing or older
/// than `expire_secs`.
pub fn check_login(
    login: Option<(String, NaiveDateTime)>,
    now: NaiveDateTime,
    expire_secs: i64,
) -> anyhow::Result<String> {
    match login {
        Some((id, login_time)) => {
            if now.signed_duration_since(login_time).num_seconds() <= expire_secs {
                Ok(id)
            } else {
                bail!("Login has expired");
            }
        }
        None => bail!("Not Authorized Login Again"),
    }
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub fn assert_not_empty(value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::invalid("Missing Details"));
    }
    Ok(())
}

pub fn assert_email(email: &str) -> Result<(), AppError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
                && domain.split('.').count() >= 2
                && domain.split('.').all(|part| !part.is_empty())
        }
        None => false,
    };
    if !valid {
        return Err(AppError::invalid("Enter a valid email"));
    }
    Ok(())
}

pub fn assert_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::invalid("Enter a strong password"));
    }
    Ok(())
}

pub fn assert_slot(slot_date: &str, slot_time: &str) -> Result<(), AppError> {
    NaiveDate::parse_from_str(slot_date, "%Y-%m-%d")
        .map_err(|_| AppError::invalid("Wrong format on 'slot_date'"))?;
    if slot_time.trim().is_empty() {
        return Err(AppError::invalid("Missing 'slot_time'"));
    }
    Ok(())
}

pub fn format_time_str(time: &NaiveDateTime) -> String {
    const TIME_FMT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    format!("{}+00:00", time.format(TIME_FMT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_format() {
        assert!(assert_email("patient@example.com").is_ok());
        assert!(assert_email("first.last@mail.example.org").is_ok());

        for bad in &["", "patient", "@example.com", "patient@", "patient@example", "a b@c.d", "a@b@c.d", "a@.com"] {
            assert!(assert_email(bad).is_err(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn password_needs_eight_chars() {
        assert!(assert_password("1234567").is_err());
        assert!(assert_password("12345678").is_ok());
    }

    #[test]
    fn slot_date_must_be_a_calendar_date() {
        assert!(assert_slot("2024-05-01", "10:00").is_ok());
        assert!(assert_slot("2024-02-30", "10:00").is_err());
        assert!(assert_slot("1_5_2024", "10:00").is_err());
        assert!(assert_slot("2024-05-01", "  ").is_err());
    }

    #[test]
    fn tokens_are_unique_per_login() {
        let a = generate_login_token("doc-1", "doctor");
        let b = generate_login_token("doc-1", "doctor");
        assert_eq!(a.len(), 128);
        assert_ne!(a, b);
    }

    #[test]
    fn password_hash_is_salted() {
        let a = hash_password("qwerty123").unwrap();
        let b = hash_password("qwerty123").unwrap();
        assert_ne!(a, b);
        assert!(a.len() <= 255);

        assert!(verify_password("qwerty123", &a).unwrap());
        assert!(verify_password("qwerty123", &b).unwrap());
        assert!(!verify_password("qwerty124", &a).unwrap());
    }

    #[test]
    fn malformed_stored_hash_is_an_error() {
        assert!(verify_password("qwerty123", "not-a-hash").is_err());
    }

    #[test]
    fn login_lifetime() {
        let login_time = NaiveDate::from_ymd(2024, 5, 1).and_hms(10, 0, 0);
        let login = || Some(("user-a".to_string(), login_time));

        let fresh = login_time + chrono::Duration::seconds(3600);
        assert_eq!(check_login(login(), fresh, 3600).unwrap(), "user-a");

        let stale = login_time + chrono::Duration::seconds(3601);
        assert_eq!(
            check_login(login(), stale, 3600).unwrap_err().to_string(),
            "Login has expired"
        );
        assert_eq!(
            check_login(None, fresh, 3600).unwrap_err().to_string(),
            "Not Authorized Login Again"
        );
    }

    #[test]
    fn time_format() {
        let time = NaiveDate::from_ymd(2024, 5, 1).and_hms(10, 0, 0);
        assert_eq!(format_time_str(&time), "2024-05-01T10:00:00+00:00");
    }
}
