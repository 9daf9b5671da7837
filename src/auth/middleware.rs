use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;

use crate::auth::extractors::AuthenticatedUserId;
use crate::auth::gate::API_KEY_HEADER;
use crate::error::AppError;
use crate::state::AppState;

/// Runs the authorization gate in front of every route it wraps and stores
/// the resolved user id in the request extensions.
///
/// A refused request is answered here with the error response; the wrapped
/// service never sees it.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
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
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let outcome = authorize(&req).await;
            match outcome {
                Ok(user_id) => {
                    req.extensions_mut().insert(AuthenticatedUserId(user_id));
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(error) => Ok(req.error_response(error).map_into_right_body()),
            }
        })
    }
}

async fn authorize(req: &ServiceRequest) -> Result<i64, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::InternalServerError("AppState is not registered".into()))?;

    let authorization = header_value(req, header::AUTHORIZATION.as_str());
    let api_key = header_value(req, API_KEY_HEADER);

    let user_id = state.gate.authorize(authorization, api_key).await?;
    Ok(user_id)
}

/// A header that is absent or not valid UTF-8 counts as missing.
fn header_value<'a>(req: &'a ServiceRequest, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|value| value.to_str().ok())
}
