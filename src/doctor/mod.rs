mod requests;
mod responses;
mod utils;

use crate::{
    booking::{self, dashboard::doctor_dashboard},
    config::Config,
    database::{self, assert},
    error::AppError,
    models::{
        appointments,
        doctor_logins::DoctorLoginData,
        doctors::{DoctorData, UpdateDoctor},
    },
    protocol::SimpleResponse,
    DbPool,
};
use actix_web::{post, web, HttpResponse, Responder};
use chrono::Utc;
use diesel::prelude::*;

use self::{
    requests::*,
    responses::*,
    utils::{doctor_context, get_did_from_token},
};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(login)
        .service(logout)
        .service(view_info)
        .service(modify_info)
        .service(modify_password)
        .service(change_availability)
        .service(search_appoint)
        .service(finish_appoint)
        .service(cancel_appoint)
        .service(dashboard);
}

crate::post_funcs! {
    (login, "/login", LoginRequest, LoginResponse),
    (logout, "/logout", LogoutRequest, SimpleResponse),
    (view_info, "/view_info", ViewInfoRequest, ViewInfoResponse),
    (modify_info, "/modify_info", ModifyInfoRequest, SimpleResponse),
    (modify_password, "/modify_password", ModifyPasswordRequest, SimpleResponse),
    (change_availability, "/change_availability", ChangeAvailabilityRequest, ChangeAvailabilityResponse),
    (search_appoint, "/search_appoint", SearchAppointRequest, SearchAppointResponse),
    (finish_appoint, "/finish_appoint", FinishAppointRequest, SimpleResponse),
    (cancel_appoint, "/cancel_appoint", CancelAppointRequest, SimpleResponse),
    (dashboard, "/dashboard", DashboardRequest, DashboardResponse),
}

async fn login_impl(
    pool: web::Data<DbPool>,
    _config: web::Data<Config>,
    info: web::Json<LoginRequest>,
) -> anyhow::Result<LoginResponse> {
    use crate::schema::{doctor_logins, doctors};

    let info = info.into_inner();
    let login_token = database::run(&pool, move |conn| {
        let doctor = doctors::table
            .filter(doctors::email.eq(&info.email))
            .get_result::<DoctorData>(conn)
            .optional()?
            .ok_or_else(|| AppError::invalid("Invalid Credentials"))?;
        if !crate::utils::verify_password(&info.password, &doctor.password)? {
            return Err(AppError::invalid("Invalid Credentials"));
        }

        let login_token = crate::utils::generate_login_token(&doctor.did, "doctor");
        let token_data = DoctorLoginData {
            token: login_token.clone(),
            did: doctor.did,
            login_time: Utc::now().naive_utc(),
        };
        diesel::insert_into(doctor_logins::table)
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
    use crate::schema::doctor_logins;

    let info = info.into_inner();
    database::run(&pool, move |conn| {
        diesel::delete(doctor_logins::table.filter(doctor_logins::token.eq(info.login_token)))
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
    use crate::schema::doctors;

    let info = info.into_inner();
    let did = get_did_from_token(info.login_token, &pool, &config).await?;

    let profile_data = database::run(&pool, move |conn| {
        doctors::table
            .filter(doctors::did.eq(&did))
            .get_result::<DoctorData>(conn)?
            .profile()
    })
    .await?;

    Ok(ViewInfoResponse {
        success: true,
        message: "".to_string(),
        profile_data,
    })
}

async fn modify_info_impl(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    info: web::Json<ModifyInfoRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::doctors;

    let info = info.into_inner();
    let did = get_did_from_token(info.login_token, &pool, &config).await?;

    if let Some(fees) = info.fees {
        if fees < 0 {
            return Err(AppError::invalid("Fees must not be negative").into());
        }
    }
    let data = UpdateDoctor {
        fees: info.fees,
        address: info.address.map(|addr| addr.to_json()).transpose()?,
        available: info.available,
    };
    if data.fees.is_none() && data.address.is_none() && data.available.is_none() {
        return Ok(SimpleResponse::ok("Profile Updated"));
    }

    database::run(&pool, move |conn| {
        assert::assert_doctor(conn, &did)?;
        diesel::update(doctors::table.filter(doctors::did.eq(&did)))
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
    use crate::schema::doctors;

    let info = info.into_inner();
    let did = get_did_from_token(info.login_token.clone(), &pool, &config).await?;
    crate::utils::assert_password(&info.password_new)?;

    database::run(&pool, move |conn| {
        conn.transaction(|| {
            let stored = doctors::table
                .filter(doctors::did.eq(&did))
                .select(doctors::password)
                .for_update()
                .get_result::<String>(conn)?;
            if !crate::utils::verify_password(&info.password_old, &stored)? {
                return Err(AppError::invalid("Wrong password"));
            }

            diesel::update(doctors::table.filter(doctors::did.eq(&did)))
                .set(doctors::password.eq(crate::utils::hash_password(&info.password_new)?))
                .execute(conn)?;

            Ok(())
        })
    })
    .await?;

    Ok(SimpleResponse::ok("Password Updated"))
}

async fn change_availability_impl(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    info: web::Json<ChangeAvailabilityRequest>,
) -> anyhow::Result<ChangeAvailabilityResponse> {
    let info = info.into_inner();
    let did = get_did_from_token(info.login_token, &pool, &config).await?;

    let available =
        database::run(&pool, move |conn| booking::change_availability(conn, &did)).await?;

    Ok(ChangeAvailabilityResponse {
        success: true,
        message: "Availability Changed".to_string(),
        available,
    })
}

async fn search_appoint_impl(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    info: web::Json<SearchAppointRequest>,
) -> anyhow::Result<SearchAppointResponse> {
    let info = info.into_inner();
    let ctx = doctor_context(info.login_token, &pool, &config).await?;

    let appos =
        database::run(&pool, move |conn| booking::list_appointments(conn, &ctx.identity)).await?;

    Ok(SearchAppointResponse {
        success: true,
        message: "".to_string(),
        appointments: appointments::to_items(&appos)?,
    })
}

async fn finish_appoint_impl(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    info: web::Json<FinishAppointRequest>,
) -> anyhow::Result<SimpleResponse> {
    let info = info.into_inner();
    let ctx = doctor_context(info.login_token.clone(), &pool, &config).await?;

    database::run(&pool, move |conn| {
        booking::complete_appointment(conn, &ctx, &info.appointment_id)
    })
    .await?;

    Ok(SimpleResponse::ok("Appointment Completed"))
}

async fn cancel_appoint_impl(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    info: web::Json<CancelAppointRequest>,
) -> anyhow::Result<SimpleResponse> {
    let info = info.into_inner();
    let ctx = doctor_context(info.login_token.clone(), &pool, &config).await?;

    database::run(&pool, move |conn| {
        booking::cancel_appointment(conn, &ctx, &info.appointment_id)
    })
    .await?;

    Ok(SimpleResponse::ok("Appointment Cancelled"))
}

async fn dashboard_impl(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    info: web::Json<DashboardRequest>,
) -> anyhow::Result<DashboardResponse> {
    let info = info.into_inner();
    let ctx = doctor_context(info.login_token, &pool, &config).await?;

    let dash_data = database::run(&pool, move |conn| {
        let appos = booking::list_appointments(conn, &ctx.identity)?;
        doctor_dashboard(&appos)
    })
    .await?;

    Ok(DashboardResponse {
        success: true,
        message: "".to_string(),
        dash_data,
    })
}
