//! Session middleware authenticating bearer access tokens.
//!
//! Wraps a route scope and short-circuits with the domain error response
//! when the `Authorization` header is absent, malformed, or fails
//! verification. On success the resolved identity lands in the request
//! extensions, where handlers pick it up via [`AuthenticatedIdentity`].

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{FromRequest, HttpMessage, HttpRequest, ResponseError};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::domain::ports::SessionAuth;
use crate::domain::{Error, Identity};

/// Extract the bearer credential from an `Authorization` header value.
///
/// Any other scheme is treated as an absent token, matching the behaviour
/// of the authenticate port for `None`.
fn bearer_token(req: &ServiceRequest) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    value
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_owned())
}

/// Session middleware factory holding the authenticate port.
#[derive(Clone)]
pub struct SessionGuard {
    auth: Arc<dyn SessionAuth>,
}

impl SessionGuard {
    pub fn new(auth: Arc<dyn SessionAuth>) -> Self {
        Self { auth }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = SessionGuardMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionGuardMiddleware {
            service: Rc::new(service),
            auth: Arc::clone(&self.auth),
        }))
    }
}

/// Service wrapper produced by [`SessionGuard`].
pub struct SessionGuardMiddleware<S> {
    service: Rc<S>,
    auth: Arc<dyn SessionAuth>,
}

impl<S, B> Service<ServiceRequest> for SessionGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let auth = Arc::clone(&self.auth);
        let token = bearer_token(&req);
        Box::pin(async move {
            match auth.authenticate(token).await {
                Ok(identity) => {
                    req.extensions_mut().insert(AuthenticatedIdentity(identity));
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(error) => {
                    let (req, _) = req.into_parts();
                    let res = error.error_response().map_into_right_body();
                    Ok(ServiceResponse::new(req, res))
                }
            }
        })
    }
}

/// Identity resolved by [`SessionGuard`], extractable in handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity(pub Identity);

impl FromRequest for AuthenticatedIdentity {
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let found = req.extensions().get::<Self>().cloned();
        Box::pin(async move {
            found.ok_or_else(|| {
                Error::unauthorized("No token, authorization denied").into()
            })
        })
    }
}
