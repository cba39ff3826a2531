use actix_web::web;
use chrono::Utc;
use diesel::prelude::*;

use crate::{
    config::Config,
    context::{Identity, RequestContext},
    database,
    models::admin_logins::AdminLoginData,
    DbPool,
};

pub async fn get_aid_from_token(
    token: String,
    pool: &web::Data<DbPool>,
    config: &web::Data<Config>,
) -> anyhow::Result<String> {
    use crate::schema::admin_logins;

    let data = database::run(pool, move |conn| {
        Ok(admin_logins::table
            .filter(admin_logins::token.eq(token))
            .order(admin_logins::login_time.desc())
            .limit(1)
            .get_result::<AdminLoginData>(conn)
            .optional()?)
    })
    .await?;

    // A token issued before the admin email was reconfigured is void.
    crate::utils::check_login(
        data.filter(|data| data.aid == config.admin_email)
            .map(|data| (data.aid, data.login_time)),
        Utc::now().naive_utc(),
        config.login_expire_secs,
    )
}

pub async fn admin_context(
    token: String,
    pool: &web::Data<DbPool>,
    config: &web::Data<Config>,
) -> anyhow::Result<RequestContext> {
    let aid = get_aid_from_token(token, pool, config).await?;
    Ok(RequestContext::new(Identity::Admin(aid), config.clone()))
}
