pub mod assert;

use crate::{error::AppError, DbPool};
use actix_web::{error::BlockingError, web};
use diesel::{r2d2::ConnectionManager, MysqlConnection};
use r2d2::PooledConnection;

pub fn get_db_conn(
    pool: &web::Data<DbPool>,
) -> Result<PooledConnection<ConnectionManager<MysqlConnection>>, AppError> {
    Ok(pool.get()?)
}

/// Runs `f` with a pooled connection on the blocking thread pool.
pub async fn run<F, T>(pool: &web::Data<DbPool>, f: F) -> Result<T, AppError>
where
    F: FnOnce(&MysqlConnection) -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    let conn = get_db_conn(pool)?;
    web::block(move || f(&conn)).await.map_err(|err| match err {
        BlockingError::Error(err) => err,
        BlockingError::Canceled => AppError::InternalFailure("DB task canceled".to_string()),
    })
}
