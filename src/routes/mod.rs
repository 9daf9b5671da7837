pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::{web, HttpResponse};

use crate::auth::AuthMiddleware;
use crate::error::AppError;

/// Registers every route. Application state (`web::Data<AppState>`) is added
/// by the caller.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .service(health::health)
        .service(auth::signup)
        .service(auth::token)
        .service(
            web::scope("/tasks")
                .wrap(AuthMiddleware)
                .service(tasks::get_tasks)
                .service(tasks::create_task)
                .service(tasks::get_task)
                .service(tasks::update_task)
                .service(tasks::delete_task)
                .default_service(web::to(no_route)),
        )
        .default_service(web::to(no_route));
}

/// Fallback for unmatched paths and methods, so even those answer with a JSON
/// error body. Inside `/tasks` it runs after the auth check.
async fn no_route() -> Result<HttpResponse, AppError> {
    Err(AppError::RouteNotFound)
}

/// Bodies that do not match the expected schema are a 422, not a 400.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::UnprocessableEntity(err.to_string()).into())
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| AppError::UnprocessableEntity(err.to_string()).into())
}
