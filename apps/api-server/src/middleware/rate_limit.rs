//! Rate limiting middleware.

use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use fable_shared::ErrorResponse;
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::sync::Arc;

use fable_core::ports::RateLimiter;

/// Rate limiting middleware factory.
pub struct RateLimitMiddleware {
    limiter: Arc<dyn RateLimiter>,
}

impl RateLimitMiddleware {
    pub fn new(limiter: Arc<dyn RateLimiter>) -> Self {
        Self { limiter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimitMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService {
            service,
            limiter: self.limiter.clone(),
        }))
    }
}

pub struct RateLimitMiddlewareService<S> {
    service: S,
    limiter: Arc<dyn RateLimiter>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let limiter = self.limiter.clone();

        // Limit by client IP
        let key = req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or("unknown")
            .to_string();

        // The in-memory limiter never awaits, so the blocking check
        // resolves immediately.
        let check_result = futures::executor::block_on(limiter.check(&key));

        match check_result {
            Ok(result) if !result.allowed => {
                tracing::warn!("Rate limit exceeded for key: {}", key);

                let error = ErrorResponse::too_many_requests(format!(
                    "Rate limit exceeded. Try again in {} seconds.",
                    result.reset_after.as_secs()
                ));

                let response = HttpResponse::TooManyRequests()
                    .insert_header(("X-RateLimit-Remaining", "0"))
                    .insert_header(("Retry-After", result.reset_after.as_secs().to_string()))
                    .json(error);

                let (http_req, _payload) = req.into_parts();
                let srv_response = ServiceResponse::new(http_req, response);

                Box::pin(async move { Ok(srv_response.map_into_right_body()) })
            }
            other => {
                // Allowed or backend error (fail open)
                if other.is_err() {
                    tracing::error!("Rate limiter error, failing open");
                }

                let fut = self.service.call(req);
                Box::pin(async move {
                    let res = fut.await?;
                    Ok(res.map_into_left_body())
                })
            }
        }
    }
}
