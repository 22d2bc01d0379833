//! HTTP handlers and route configuration.

mod assist;
mod auth;
mod comments;
mod health;
mod images;
mod posts;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me))
                    .route("/author-name", web::put().to(auth::rename_author)),
            )
            // Post routes ("/mine" before "/{id}")
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list_published))
                    .route("", web::post().to(posts::create))
                    .route("/mine", web::get().to(posts::list_mine))
                    .route("/{id}", web::get().to(posts::read))
                    .route("/{id}/edit", web::get().to(posts::edit_view))
                    .route("/{id}", web::put().to(posts::update))
                    .route("/{id}", web::delete().to(posts::delete))
                    .route("/{id}/like", web::post().to(posts::toggle_like))
                    .route("/{id}/favorite", web::post().to(posts::toggle_favorite))
                    .route("/{id}/images", web::post().to(images::upload))
                    .route(
                        "/{id}/images/{image_id:.*}",
                        web::delete().to(images::delete),
                    )
                    .route("/{id}/comments", web::get().to(comments::list))
                    .route("/{id}/comments", web::post().to(comments::add)),
            )
            .route("/comments/{id}", web::delete().to(comments::delete))
            // The assist endpoint keeps its own error contract,
            // including an explicit 405 for non-POST methods.
            .service(
                web::resource("/assist")
                    .route(web::post().to(assist::assist))
                    .default_service(web::route().to(assist::method_not_allowed)),
            ),
    );
}
