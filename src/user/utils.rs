use actix_web::web;
use chrono::Utc;
use diesel::prelude::*;

use crate::{
    config::Config,
    context::{Identity, RequestContext},
    database,
    models::user_logins::UserLoginData,
    DbPool,
};

pub async fn get_uid_from_token(
    token: String,
    pool: &web::Data<DbPool>,
    config: &web::Data<Config>,
) -> anyhow::Result<String> {
    use crate::schema::user_logins;

    let data = database::run(pool, move |conn| {
        Ok(user_logins::table
            .filter(user_logins::token.eq(token))
            .order(user_logins::login_time.desc())
            .limit(1)
            .get_result::<UserLoginData>(conn)
            .optional()?)
    })
    .await?;

    crate::utils::check_login(
        data.map(|data| (data.uid, data.login_time)),
        Utc::now().naive_utc(),
        config.login_expire_secs,
    )
}

pub async fn user_context(
    token: String,
    pool: &web::Data<DbPool>,
    config: &web::Data<Config>,
) -> anyhow::Result<RequestContext> {
    let uid = get_uid_from_token(token, pool, config).await?;
    Ok(RequestContext::new(Identity::Patient(uid), config.clone()))
}
