use diesel::prelude::*;

use crate::error::AppError;

pub fn assert_user(conn: &MysqlConnection, uid: &str) -> Result<(), AppError> {
    use crate::schema::users;

    let res = users::table
        .filter(users::uid.eq(uid))
        .count()
        .get_result::<i64>(conn)?;

    if res == 0 {
        return Err(AppError::NotFound("User"));
    }

    Ok(())
}

pub fn assert_doctor(conn: &MysqlConnection, did: &str) -> Result<(), AppError> {
    use crate::schema::doctors;

    let res = doctors::table
        .filter(doctors::did.eq(did))
        .count()
        .get_result::<i64>(conn)?;

    if res == 0 {
        return Err(AppError::NotFound("Doctor"));
    }

    Ok(())
}

pub fn assert_user_email_free(conn: &MysqlConnection, email: &str) -> Result<(), AppError> {
    use crate::schema::users;

    let res = users::table
        .filter(users::email.eq(email))
        .count()
        .get_result::<i64>(conn)?;

    if res > 0 {
        return Err(AppError::invalid("User already exists"));
    }

    Ok(())
}

pub fn assert_doctor_email_free(conn: &MysqlConnection, email: &str) -> Result<(), AppError> {
    use crate::schema::doctors;

    let res = doctors::table
        .filter(doctors::email.eq(email))
        .count()
        .get_result::<i64>(conn)?;

    if res > 0 {
        return Err(AppError::invalid("Doctor already exists"));
    }

    Ok(())
}
