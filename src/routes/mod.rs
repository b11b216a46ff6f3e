pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::web;

use crate::auth::AuthMiddleware;
use crate::error::AppError;

/// Registers every route under `/api`.
///
/// Expects `web::Data<SqlitePool>` and `web::Data<Config>` on the app.
pub fn config(cfg: &mut web::ServiceConfig) {
    // Unparseable bodies answer 400 with the usual `{"message"}` shape.
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| AppError::Validation(format!("Invalid JSON body: {}", err)).into());

    cfg.app_data(json_config).service(
        web::scope("/api")
            .service(health::health)
            .service(auth::register)
            .service(auth::login)
            .service(
                web::scope("/tasks")
                    .wrap(AuthMiddleware)
                    .service(tasks::get_tasks)
                    .service(tasks::create_task)
                    .service(tasks::update_task)
                    .service(tasks::delete_task),
            ),
    );
}
