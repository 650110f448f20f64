use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error, HttpMessage, ResponseError,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::sync::Arc;

use crate::auth::extractors::AuthenticatedUser;
use crate::auth::token::TokenService;
use crate::error::AppError;

/// Rejects requests without a valid token and records the caller for downstream handlers.
///
/// The `Authorization` header carries the raw token. A `Bearer ` prefix is stripped when
/// present. Rejections are answered here with a 401 envelope; the wrapped service is not
/// called.
pub struct AuthMiddleware {
    tokens: Arc<TokenService>,
}

impl AuthMiddleware {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            tokens: self.tokens.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    tokens: Arc<TokenService>,
}

impl<S> AuthMiddlewareService<S> {
    fn authenticate(&self, req: &ServiceRequest) -> Result<AuthenticatedUser, AppError> {
        let missing = || AppError::Unauthorized("Authorization token is required".into());

        let value = req.headers().get(header::AUTHORIZATION).ok_or_else(missing)?;
        // present but not text: nothing that could verify
        let value = value
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid token".into()))?
            .trim_start();
        let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
        if token.is_empty() {
            return Err(missing());
        }

        let id = self.tokens.verify(token)?;
        Ok(AuthenticatedUser { id })
    }
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match self.authenticate(&req) {
            Ok(user) => {
                req.extensions_mut().insert(user);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(err) => {
                log::debug!("rejecting {} {}: {}", req.method(), req.path(), err);
                let response = req
                    .into_response(err.error_response())
                    .map_into_right_body::<B>();
                Box::pin(ready(Ok(response)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, web, App, HttpResponse};

    const SECRET: &[u8] = b"middleware_test_secret";

    async fn whoami(user: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().body(user.id.to_string())
    }

    fn tokens() -> Arc<TokenService> {
        Arc::new(TokenService::new(SECRET))
    }

    #[actix_rt::test]
    async fn test_missing_header_is_rejected() {
        let app = test::init_service(
            App::new().service(
                web::resource("/me")
                    .wrap(AuthMiddleware::new(tokens()))
                    .to(whoami),
            ),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/me").to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Authorization token is required");
        assert_eq!(body["status"], 401);
    }

    #[actix_rt::test]
    async fn test_invalid_token_is_rejected() {
        let app = test::init_service(
            App::new().service(
                web::resource("/me")
                    .wrap(AuthMiddleware::new(tokens()))
                    .to(whoami),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header((header::AUTHORIZATION, "garbage"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Invalid token");
    }

    #[actix_rt::test]
    async fn test_non_text_header_is_an_invalid_token() {
        let app = test::init_service(
            App::new().service(
                web::resource("/me")
                    .wrap(AuthMiddleware::new(tokens()))
                    .to(whoami),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header((
                header::AUTHORIZATION,
                header::HeaderValue::from_bytes(b"tok\xffen").unwrap(),
            ))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Invalid token");
    }

    #[actix_rt::test]
    async fn test_blank_header_counts_as_missing() {
        let app = test::init_service(
            App::new().service(
                web::resource("/me")
                    .wrap(AuthMiddleware::new(tokens()))
                    .to(whoami),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header((header::AUTHORIZATION, "Bearer "))
            .to_request();
        let resp = test::call_service(&app, req).await;

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Authorization token is required");
    }

    #[actix_rt::test]
    async fn test_valid_token_reaches_handler() {
        let tokens = tokens();
        let token = tokens.issue(17).unwrap();
        let app = test::init_service(
            App::new().service(
                web::resource("/me")
                    .wrap(AuthMiddleware::new(tokens.clone()))
                    .to(whoami),
            ),
        )
        .await;

        for header_value in [token.clone(), format!("Bearer {}", token)] {
            let req = test::TestRequest::get()
                .uri("/me")
                .insert_header((header::AUTHORIZATION, header_value))
                .to_request();
            let body = test::call_and_read_body(&app, req).await;
            assert_eq!(body, "17");
        }
    }
}
