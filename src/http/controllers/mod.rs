use actix_web::web;

use super::util;

pub mod customers;
pub mod payments;
pub mod users;

pub fn configure(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(web::JsonConfig::default().error_handler(util::json_error_handler))
    .app_data(web::QueryConfig::default().error_handler(util::query_error_handler))
    .service(
      web::scope("/user")
        .service(
          web::resource("/signup")
            .route(web::post().to(users::signup))
            .default_service(web::to(util::method_not_allowed)),
        )
        .service(
          web::resource("/login")
            .route(web::post().to(users::login))
            .default_service(web::to(util::method_not_allowed)),
        )
        .service(
          web::resource("/token/refresh")
            .route(web::post().to(users::refresh))
            .default_service(web::to(util::method_not_allowed)),
        )
        .service(
          web::resource("/profile")
            .route(web::get().to(users::profile))
            .route(web::patch().to(users::update_profile))
            .route(web::delete().to(users::delete_profile))
            .default_service(web::to(util::method_not_allowed_for)),
        ),
    )
    .service(
      web::scope("/dashboard")
        .service(
          web::resource("/customer")
            .route(web::get().to(customers::list))
            .route(web::post().to(customers::create))
            .default_service(web::to(util::method_not_allowed_for)),
        )
        .service(
          web::resource("/customer/{customer_id}")
            .route(web::get().to(customers::retrieve))
            .route(web::put().to(customers::replace))
            .route(web::patch().to(customers::update))
            .route(web::delete().to(customers::delete))
            .default_service(web::to(util::method_not_allowed_for)),
        )
        .service(
          web::resource("/customer/{customer_id}/payment")
            .route(web::get().to(customers::payments))
            .default_service(web::to(util::method_not_allowed_for)),
        )
        .service(
          web::resource("/payment")
            .route(web::get().to(payments::list))
            .route(web::post().to(payments::create))
            .default_service(web::to(util::method_not_allowed_for)),
        )
        .service(
          web::resource("/payment/{payment_ref}")
            .route(web::get().to(payments::retrieve))
            .default_service(web::to(util::method_not_allowed_for)),
        ),
    );
}

#[cfg(test)]
mod tests;
