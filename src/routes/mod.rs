use actix_web::web;

use crate::middleware::auth::AuthMiddleware;

pub mod account;
pub mod sos;
pub mod trip;

/// Route table shared by the server binary and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(|| async { "OK" }))
        .route("/get_sos", web::post().to(sos::get_sos))
        .service(
            web::scope("/plan_trip")
                .wrap(AuthMiddleware)
                .route("", web::post().to(trip::plan_trip)),
        )
        .service(
            web::scope("/api")
                // Public routes
                .service(
                    web::scope("/auth")
                        .route("/signup", web::post().to(account::signup))
                        .route("/signin", web::post().to(account::signin))
                        .service(
                            web::scope("")
                                .wrap(AuthMiddleware)
                                .route("/session", web::get().to(account::user_session)),
                        ),
                )
                .route("/get_sos", web::post().to(sos::get_sos))
                // Protected routes
                .service(
                    web::scope("")
                        .wrap(AuthMiddleware)
                        .route("/account", web::put().to(account::update_profile))
                        .route("/plan_trip", web::post().to(trip::plan_trip))
                        .route("/trips", web::get().to(trip::list_trips)),
                ),
        );
}
