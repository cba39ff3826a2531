mod requests;
mod responses;
mod utils;

use crate::{
    booking,
    config::Config,
    database::{self, assert},
    error::AppError,
    models::{
        address::Address,
        appointments,
        doctors::DoctorData,
        user_logins::UserLoginData,
        users::{UpdateUser, UserData, DEFAULT_PHONE, NOT_SELECTED},
    },
    payment,
    protocol::SimpleResponse,
    DbPool,
};
use actix_web::{post, web, HttpResponse, Responder};
use chrono::Utc;
use diesel::{mysql::Mysql, prelude::*};

use self::{
    requests::*,
    responses::*,
    utils::{get_uid_from_token, user_context},
};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(register)
        .service(login)
        .service(logout)
        .service(view_info)
        .service(modify_info)
        .service(modify_password)
        .service(search_doctor)
        .service(appoint)
        .service(search_appoint)
        .service(cancel_appoint)
        .service(pay_appoint)
        .service(verify_payment);
}

crate::post_funcs! {
    (register, "/register", RegisterRequest, SimpleResponse),
    (login, "/login", LoginRequest, LoginResponse),
    (logout, "/logout", LogoutRequest, SimpleResponse),
    (view_info, "/view_info", ViewInfoRequest, ViewInfoResponse),
    (modify_info, "/modify_info", ModifyInfoRequest, SimpleResponse),
    (modify_password, "/modify_password", ModifyPasswordRequest, SimpleResponse),
    (search_doctor, "/search_doctor", SearchDoctorRequest, SearchDoctorResponse),
    (appoint, "/appoint", AppointRequest, AppointResponse),
    (search_appoint, "/search_appoint", SearchAppointRequest, SearchAppointResponse),
    (cancel_appoint, "/cancel_appoint", CancelAppointRequest, SimpleResponse),
    (pay_appoint, "/pay_appoint", PayAppointRequest, PayAppointResponse),
    (verify_payment, "/verify_payment", VerifyPaymentRequest, SimpleResponse),
}

async fn register_impl(
    pool: web::Data<DbPool>,
    _config: web::Data<Config>,
    info: web::Json<RegisterRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::users;

    let info = info.into_inner();
    if info.name.trim().is_empty() || info.email.is_empty() || info.password.is_empty() {
        return Err(AppError::invalid("Missing Details").into());
    }
    crate::utils::assert_email(&info.email)?;
    crate::utils::assert_password(&info.password)?;

    database::run(&pool, move |conn| {
        conn.transaction(|| {
            assert::assert_user_email_free(conn, &info.email)?;

            let data = UserData {
                uid: crate::utils::new_id(),
                name: info.name,
                email: info.email,
                password: crate::utils::hash_password(&info.password)?,
                image: String::new(),
                phone: DEFAULT_PHONE.to_string(),
                address: Address::default().to_json()?,
                gender: NOT_SELECTED.to_string(),
                dob: NOT_SELECTED.to_string(),
            };
            diesel::insert_into(users::table)
                .values(&data)
                .execute(conn)
                .map_err(AppError::on_duplicate("User already exists"))?;

            log::info!("User {} registered", data.uid);
            Ok(())
        })
    })
    .await?;

    Ok(SimpleResponse::ok("Registered"))
}

async fn login_impl(
    pool: web::Data<DbPool>,
    _config: web::Data<Config>,
    info: web::Json<LoginRequest>,
) -> anyhow::Result<LoginResponse> {
    use crate::schema::{user_logins, users};

    let info = info.into_inner();
    let login_token = database::run(&pool, move |conn| {
        let user = users::table
            .filter(users::email.eq(&info.email))
            .get_result::<UserData>(conn)
            .optional()?
            .ok_or_else(|| AppError::invalid("User does not exist"))?;
        if !crate::utils::verify_password(&info.password, &user.password)? {
            return Err(AppError::invalid("Invalid Credentials"));
        }

        let login_token = crate::utils::generate_login_token(&user.uid, "user");
        let token_data = UserLoginData {
            token: login_token.clone(),
            uid: user.uid,
            login_time: Utc::now().naive_utc(),
        };
        diesel::insert_into(user_logins::table)
            .values(token_data)
            .execute(conn)?;

        Ok(login_token)
    })
    .await?;

    Ok(LoginResponse {
        success: true,
        message: "".to_string(),
        login_token,
    })
}

async fn logout_impl(
    pool: web::Data<DbPool>,
    _config: web::Data<Config>,
    info: web::Json<LogoutRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::user_logins;

    let info = info.into_inner();
    database::run(&pool, move |conn| {
        diesel::delete(user_logins::table.filter(user_logins::token.eq(info.login_token)))
            .execute(conn)?;
        Ok(())
    })
    .await?;

    Ok(SimpleResponse::ok("Logged Out"))
}

async fn view_info_impl(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    info: web::Json<ViewInfoRequest>,
) -> anyhow::Result<ViewInfoResponse> {
    use crate::schema::users;

    let info = info.into_inner();
    let uid = get_uid_from_token(info.login_token, &pool, &config).await?;

    let user_data = database::run(&pool, move |conn| {
        let user = users::table
            .filter(users::uid.eq(&uid))
            .get_result::<UserData>(conn)
            .optional()?
            .ok_or(AppError::NotFound("User"))?;
        user.profile()
    })
    .await?;

    Ok(ViewInfoResponse {
        success: true,
        message: "".to_string(),
        user_data,
    })
}

async fn modify_info_impl(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    info: web::Json<ModifyInfoRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::users;

    let info = info.into_inner();
    let uid = get_uid_from_token(info.login_token, &pool, &config).await?;

    for field in &[&info.name, &info.phone, &info.dob, &info.gender] {
        if field.trim().is_empty() {
            return Err(AppError::invalid("Data Missing").into());
        }
    }

    let data = UpdateUser {
        name: Some(info.name),
        phone: Some(info.phone),
        address: info.address.map(|addr| addr.to_json()).transpose()?,
        gender: Some(info.gender),
        dob: Some(info.dob),
        image: info.image,
    };

    database::run(&pool, move |conn| {
        assert::assert_user(conn, &uid)?;
        diesel::update(users::table.filter(users::uid.eq(&uid)))
            .set(&data)
            .execute(conn)?;
        Ok(())
    })
    .await?;

    Ok(SimpleResponse::ok("Profile Updated"))
}

async fn modify_password_impl(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    info: web::Json<ModifyPasswordRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::users;

    let info = info.into_inner();
    let uid = get_uid_from_token(info.login_token.clone(), &pool, &config).await?;
    crate::utils::assert_password(&info.password_new)?;

    database::run(&pool, move |conn| {
        conn.transaction(|| {
            let stored = users::table
                .filter(users::uid.eq(&uid))
                .select(users::password)
                .for_update()
                .get_result::<String>(conn)?;
            if !crate::utils::verify_password(&info.password_old, &stored)? {
                return Err(AppError::invalid("Wrong password"));
            }

            diesel::update(users::table.filter(users::uid.eq(&uid)))
                .set(users::password.eq(crate::utils::hash_password(&info.password_new)?))
                .execute(conn)?;

            Ok(())
        })
    })
    .await?;

    Ok(SimpleResponse::ok("Password Updated"))
}

async fn search_doctor_impl(
    pool: web::Data<DbPool>,
    _config: web::Data<Config>,
    info: web::Json<SearchDoctorRequest>,
) -> anyhow::Result<SearchDoctorResponse> {
    use crate::schema::doctors;

    let info = info.into_inner();
    let docs = database::run(&pool, move |conn| {
        let mut query: doctors::BoxedQuery<Mysql> =
            doctors::table.order(doctors::name.asc()).into_boxed();
        if let Some(speciality) = info.speciality {
            query = query.filter(doctors::speciality.eq(speciality));
        }
        Ok(query.load::<DoctorData>(conn)?)
    })
    .await?;

    let doctors = docs
        .into_iter()
        .map(|data| -> Result<SearchDoctorItem, AppError> {
            Ok(SearchDoctorItem {
                address: Address::from_json(&data.address)?,
                did: data.did,
                name: data.name,
                image: data.image,
                speciality: data.speciality,
                degree: data.degree,
                experience: data.experience,
                about: data.about,
                available: data.available,
                fees: data.fees,
            })
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    Ok(SearchDoctorResponse {
        success: true,
        message: "".to_string(),
        doctors,
    })
}

async fn appoint_impl(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    info: web::Json<AppointRequest>,
) -> anyhow::Result<AppointResponse> {
    let info = info.into_inner();
    let ctx = user_context(info.login_token.clone(), &pool, &config).await?;

    let appointment = database::run(&pool, move |conn| {
        booking::book_appointment(conn, &ctx, &info.doc_id, &info.slot_date, &info.slot_time)
    })
    .await?;

    Ok(AppointResponse {
        success: true,
        message: "Appointment Booked".to_string(),
        appointment_id: appointment.aid,
    })
}

async fn search_appoint_impl(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    info: web::Json<SearchAppointRequest>,
) -> anyhow::Result<SearchAppointResponse> {
    let info = info.into_inner();
    let ctx = user_context(info.login_token, &pool, &config).await?;

    let appos =
        database::run(&pool, move |conn| booking::list_appointments(conn, &ctx.identity)).await?;

    Ok(SearchAppointResponse {
        success: true,
        message: "".to_string(),
        appointments: appointments::to_items(&appos)?,
    })
}

async fn cancel_appoint_impl(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    info: web::Json<CancelAppointRequest>,
) -> anyhow::Result<SimpleResponse> {
    let info = info.into_inner();
    let ctx = user_context(info.login_token.clone(), &pool, &config).await?;

    database::run(&pool, move |conn| {
        booking::cancel_appointment(conn, &ctx, &info.appointment_id)
    })
    .await?;

    Ok(SimpleResponse::ok("Appointment Cancelled"))
}

async fn pay_appoint_impl(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    info: web::Json<PayAppointRequest>,
) -> anyhow::Result<PayAppointResponse> {
    let info = info.into_inner();
    let ctx = user_context(info.login_token.clone(), &pool, &config).await?;

    let lookup = ctx.clone();
    let appointment = database::run(&pool, move |conn| {
        booking::payable_appointment(conn, &lookup, &info.appointment_id)
    })
    .await?;
    booking::ensure_unpaid(&appointment)?;

    let session = payment::create_checkout_session(&ctx.config, &appointment).await?;
    log::info!(
        "Checkout session {} opened for appointment {}",
        session.id,
        appointment.aid
    );

    Ok(PayAppointResponse {
        success: true,
        message: "".to_string(),
        session_id: session.id,
        session_url: session.url.unwrap_or_default(),
    })
}

async fn verify_payment_impl(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    info: web::Json<VerifyPaymentRequest>,
) -> anyhow::Result<SimpleResponse> {
    let info = info.into_inner();
    let ctx = user_context(info.login_token, &pool, &config).await?;

    let aid = info.appointment_id.clone();
    let appointment =
        database::run(&pool, move |conn| booking::payable_appointment(conn, &ctx, &aid)).await?;
    if appointment.payment {
        return Ok(SimpleResponse::ok("Payment Successful"));
    }

    let session = payment::retrieve_checkout_session(&config, &info.session_id).await?;
    if !session.is_paid_for(&appointment.aid) {
        return Err(AppError::invalid("Payment Failed").into());
    }

    database::run(&pool, move |conn| booking::mark_paid(conn, &appointment.aid)).await?;

    Ok(SimpleResponse::ok("Payment Successful"))
}
