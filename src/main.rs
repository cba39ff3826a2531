#[macro_use]
extern crate diesel;

mod admin;
mod booking;
mod config;
mod context;
mod database;
mod doctor;
mod error;
mod models;
mod payment;
mod protocol;
mod schema;
mod user;
mod utils;

use actix_web::{middleware, web, App, HttpServer};
use diesel::{r2d2::ConnectionManager, MysqlConnection};
use env_logger::Env;

use crate::config::Config;

pub type DbPool = r2d2::Pool<ConnectionManager<MysqlConnection>>;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::from_env().expect("Failed to load configuration");
    if config.stripe_key.is_none() {
        log::warn!("STRIPE_KEY not set, online payment is disabled");
    }

    let manager = ConnectionManager::<MysqlConnection>::new(config.database_url.as_str());
    let pool = r2d2::Pool::builder()
        .build(manager)
        .expect("Failed to create pool");

    let bind = config.bind.clone();
    log::info!("Listening on {}", bind);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .data(pool.clone())
            .data(config.clone())
            .app_data(protocol::json_config())
            // patient
            .service(
                web::scope("/user")
                    .configure(user::config),
            )
            // doctor
            .service(
                web::scope("/doctor")
                    .configure(doctor::config),
            )
            // administrator
            .service(
                web::scope("/admin")
                    .configure(admin::config),
            )
    })
    .bind(bind)?
    .run()
    .await
}
