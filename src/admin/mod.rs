mod requests;
mod responses;
mod utils;

use crate::{
    booking::{self, dashboard::admin_dashboard},
    config::Config,
    database::{self, assert},
    error::AppError,
    models::{
        admin_logins::AdminLoginData, appointments, doctors::DoctorData, slots::SlotMap,
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
    utils::{admin_context, get_aid_from_token},
};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(login)
        .service(logout)
        .service(add_doctor)
        .service(search_doctor)
        .service(change_availability)
        .service(search_appoint)
        .service(cancel_appoint)
        .service(dashboard);
}

crate::post_funcs! {
    (login, "/login", LoginRequest, LoginResponse),
    (logout, "/logout", LogoutRequest, SimpleResponse),
    (add_doctor, "/add_doctor", AddDoctorRequest, AddDoctorResponse),
    (search_doctor, "/search_doctor", SearchDoctorRequest, SearchDoctorResponse),
    (change_availability, "/change_availability", ChangeAvailabilityRequest, ChangeAvailabilityResponse),
    (search_appoint, "/search_appoint", SearchAppointRequest, SearchAppointResponse),
    (cancel_appoint, "/cancel_appoint", CancelAppointRequest, SimpleResponse),
    (dashboard, "/dashboard", DashboardRequest, DashboardResponse),
}

async fn login_impl(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    info: web::Json<LoginRequest>,
) -> anyhow::Result<LoginResponse> {
    use crate::schema::admin_logins;

    let info = info.into_inner();
    if info.email != config.admin_email || info.password != config.admin_password {
        return Err(AppError::invalid("Invalid Credentials").into());
    }

    let login_token = crate::utils::generate_login_token(&info.email, "admin");
    let token_data = AdminLoginData {
        token: login_token.clone(),
        aid: info.email,
        login_time: Utc::now().naive_utc(),
    };
    database::run(&pool, move |conn| {
        diesel::insert_into(admin_logins::table)
            .values(token_data)
            .execute(conn)?;
        Ok(())
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
    use crate::schema::admin_logins;

    let info = info.into_inner();
    database::run(&pool, move |conn| {
        diesel::delete(admin_logins::table.filter(admin_logins::token.eq(info.login_token)))
            .execute(conn)?;
        Ok(())
    })
    .await?;

    Ok(SimpleResponse::ok("Logged Out"))
}

async fn add_doctor_impl(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    info: web::Json<AddDoctorRequest>,
) -> anyhow::Result<AddDoctorResponse> {
    use crate::schema::doctors;

    let info = info.into_inner();
    get_aid_from_token(info.login_token.clone(), &pool, &config).await?;

    for field in &[
        &info.name,
        &info.email,
        &info.password,
        &info.speciality,
        &info.degree,
        &info.experience,
        &info.about,
    ] {
        crate::utils::assert_not_empty(field)?;
    }
    let (fees, address) = match (info.fees, &info.address) {
        (Some(fees), Some(address)) => (fees, address.to_json()?),
        _ => return Err(AppError::invalid("Missing Details").into()),
    };
    if fees < 0 {
        return Err(AppError::invalid("Fees must not be negative").into());
    }
    crate::utils::assert_email(&info.email)?;
    crate::utils::assert_password(&info.password)?;

    let doc_id = database::run(&pool, move |conn| {
        conn.transaction(|| {
            assert::assert_doctor_email_free(conn, &info.email)?;

            let data = DoctorData {
                did: crate::utils::new_id(),
                name: info.name,
                email: info.email,
                password: crate::utils::hash_password(&info.password)?,
                image: info.image,
                speciality: info.speciality,
                degree: info.degree,
                experience: info.experience,
                about: info.about,
                available: true,
                fees,
                address,
                created_at: Utc::now().naive_utc(),
                slots_booked: SlotMap::new().to_json()?,
            };
            diesel::insert_into(doctors::table)
                .values(&data)
                .execute(conn)
                .map_err(AppError::on_duplicate("Doctor already exists"))?;

            log::info!("Doctor {} added", data.did);
            Ok(data.did)
        })
    })
    .await?;

    Ok(AddDoctorResponse {
        success: true,
        message: "Doctor Added".to_string(),
        doc_id,
    })
}

async fn search_doctor_impl(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    info: web::Json<SearchDoctorRequest>,
) -> anyhow::Result<SearchDoctorResponse> {
    use crate::schema::doctors;

    let info = info.into_inner();
    get_aid_from_token(info.login_token, &pool, &config).await?;

    let doctors = database::run(&pool, move |conn| {
        doctors::table
            .order(doctors::created_at.asc())
            .load::<DoctorData>(conn)?
            .iter()
            .map(DoctorData::profile)
            .collect()
    })
    .await?;

    Ok(SearchDoctorResponse {
        success: true,
        message: "".to_string(),
        doctors,
    })
}

async fn change_availability_impl(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    info: web::Json<ChangeAvailabilityRequest>,
) -> anyhow::Result<ChangeAvailabilityResponse> {
    let info = info.into_inner();
    get_aid_from_token(info.login_token.clone(), &pool, &config).await?;

    let available = database::run(&pool, move |conn| {
        booking::change_availability(conn, &info.doc_id)
    })
    .await?;

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
    let ctx = admin_context(info.login_token, &pool, &config).await?;

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
    let ctx = admin_context(info.login_token.clone(), &pool, &config).await?;

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
    get_aid_from_token(info.login_token, &pool, &config).await?;

    let dash_data = database::run(&pool, admin_dashboard).await?;

    Ok(DashboardResponse {
        success: true,
        message: "".to_string(),
        dash_data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use diesel::r2d2::ConnectionManager;
    use std::time::Duration;

    fn unreachable_pool() -> DbPool {
        r2d2::Pool::builder()
            .min_idle(Some(0))
            .connection_timeout(Duration::from_millis(100))
            .build_unchecked(ConnectionManager::<MysqlConnection>::new(
                "mysql://nobody@127.0.0.1:1/none",
            ))
    }

    async fn post_json(body: serde_json::Value, path: &str) -> serde_json::Value {
        let mut app = test::init_service(
            App::new()
                .data(unreachable_pool())
                .data(crate::booking::tests::test_config().get_ref().clone())
                .app_data(crate::protocol::json_config())
                .service(web::scope("/admin").configure(config)),
        )
        .await;
        let req = test::TestRequest::post()
            .uri(path)
            .set_json(&body)
            .to_request();
        let res = test::call_service(&mut app, req).await;
        assert!(res.status().is_success());
        test::read_body_json(res).await
    }

    #[actix_rt::test]
    async fn login_rejects_wrong_credentials() {
        let body = post_json(
            serde_json::json!({"email": "admin@docbook.dev", "password": "guess"}),
            "/admin/login",
        )
        .await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Invalid Credentials");
    }

    #[actix_rt::test]
    async fn unknown_token_is_refused_when_the_store_is_down() {
        let body = post_json(
            serde_json::json!({"login_token": "nope"}),
            "/admin/dashboard",
        )
        .await;
        assert_eq!(body["success"], false);
    }
}
