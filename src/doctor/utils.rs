use actix_web::web;
use chrono::Utc;
use diesel::prelude::*;

use crate::{
    config::Config,
    context::{Identity, RequestContext},
    database,
    models::doctor_logins::DoctorLoginData,
    DbPool,
};

pub async fn get_did_from_token(
    token: String,
    pool: &web::Data<DbPool>,
    config: &web::Data<Config>,
) -> anyhow::Result<String> {
    use crate::schema::doctor_logins;

    let data = database::run(pool, move |conn| {
        Ok(doctor_logins::table
            .filter(doctor_logins::token.eq(token))
            .order(doctor_logins::login_time.desc())
            .limit(1)
            .get_result::<DoctorLoginData>(conn)
            .optional()?)
    })
    .await?;

    crate::utils::check_login(
        data.map(|data| (data.did, data.login_time)),
        Utc::now().naive_utc(),
        config.login_expire_secs,
    )
}

pub async fn doctor_context(
    token: String,
    pool: &web::Data<DbPool>,
    config: &web::Data<Config>,
) -> anyhow::Result<RequestContext> {
    let did = get_did_from_token(token, pool, config).await?;
    Ok(RequestContext::new(Identity::Doctor(did), config.clone()))
}
