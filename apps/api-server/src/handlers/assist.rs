//! AI-assist endpoint: a quota-gated proxy in front of the text
//! generation service. Keeps its own `{error, details?}` error contract
//! instead of the RFC 7807 envelope.

use actix_web::{HttpResponse, web};

use fable_core::ports::{DailyQuota, TextGenerator};
use fable_shared::dto::{AssistErrorResponse, AssistRequest, AssistResponse};

use crate::middleware::auth::Identity;
use crate::state::AppState;

fn assist_error(error: impl Into<String>, details: Option<String>) -> AssistErrorResponse {
    AssistErrorResponse {
        error: error.into(),
        details,
    }
}

/// POST /api/assist
pub async fn assist(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<AssistRequest>,
) -> HttpResponse {
    let prompt = body.into_inner().prompt;
    if prompt.trim().is_empty() {
        return HttpResponse::BadRequest().json(assist_error("Prompt is required", None));
    }

    // Quota is consumed before the call and never refunded.
    let decision = match state.quota.consume(identity.user_id).await {
        Ok(d) => d,
        Err(e) => {
            tracing::error!("Quota backend error: {}", e);
            return HttpResponse::InternalServerError()
                .json(assist_error("Assist temporarily unavailable", None));
        }
    };
    if !decision.allowed {
        return HttpResponse::TooManyRequests().json(assist_error(
            "Daily assist limit reached",
            Some(format!("{} of {} calls used", decision.used, decision.limit)),
        ));
    }

    let Some(generator) = &state.generator else {
        return HttpResponse::InternalServerError()
            .json(assist_error("AI assist is not configured", None));
    };

    // One attempt; failures surface directly with no retry.
    match generator.generate(&prompt).await {
        Ok(content) => HttpResponse::Ok().json(AssistResponse { content }),
        Err(e) => {
            tracing::error!("Text generation failed: {}", e);
            HttpResponse::InternalServerError()
                .json(assist_error("Generation failed", Some(e.to_string())))
        }
    }
}

/// Any non-POST method on /api/assist.
pub async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().json(assist_error("Method not allowed", None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::configure_routes;
    use crate::state::AppState;
    use actix_web::{App, test};
    use fable_core::ports::{TokenService, UserRepository};

    async fn seeded_token(state: &AppState) -> String {
        let user = fable_core::domain::User::new(
            "writer@example.com".to_string(),
            "hash".to_string(),
            Some("Writer".to_string()),
        );
        let user = state.users.save(user).await.unwrap();
        state
            .token_service
            .generate_token(user.id, &user.email, &user.author_name)
            .unwrap()
    }

    #[actix_web::test]
    async fn non_post_methods_get_405() {
        let state = AppState::for_tests();
        let token_service = state.token_service.clone();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .app_data(web::Data::new(token_service))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/assist").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 405);
    }

    #[actix_web::test]
    async fn quota_exhaustion_returns_429() {
        // Test state carries a limit of 5 and no generator, so each
        // allowed call fails with the unconfigured error but still
        // consumes quota.
        let state = AppState::for_tests();
        let token_service = state.token_service.clone();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .app_data(web::Data::new(token_service))
                .configure(configure_routes),
        )
        .await;

        let token = seeded_token(&state).await;

        for _ in 0..5 {
            let req = test::TestRequest::post()
                .uri("/api/assist")
                .insert_header(("Authorization", format!("Bearer {}", token)))
                .set_json(serde_json::json!({ "prompt": "continue the scene" }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), 500);
        }

        let req = test::TestRequest::post()
            .uri("/api/assist")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .set_json(serde_json::json!({ "prompt": "continue the scene" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 429);

        let body: AssistErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, "Daily assist limit reached");
        assert!(body.details.is_some());
    }

    #[actix_web::test]
    async fn anonymous_callers_are_rejected() {
        let state = AppState::for_tests();
        let token_service = state.token_service.clone();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .app_data(web::Data::new(token_service))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/assist")
            .set_json(serde_json::json!({ "prompt": "hello" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }
}
