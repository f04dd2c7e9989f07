//! Refresh middleware rotating access tokens from the refresh cookie.
//!
//! Reads the `refreshToken` cookie, validates it through the refresh port
//! and, on success, attaches the identity to the request and sets the newly
//! minted access token as an httpOnly `accessToken` cookie on the response.
//! The refresh token itself is never reissued here.

use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{HttpMessage, ResponseError};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::domain::ports::RefreshAuth;
use crate::domain::Error;

use super::session_guard::AuthenticatedIdentity;

const REFRESH_COOKIE: &str = "refreshToken";
const ACCESS_COOKIE: &str = "accessToken";

/// Refresh middleware factory holding the refresh port.
#[derive(Clone)]
pub struct RefreshGuard {
    auth: Arc<dyn RefreshAuth>,
    secure_cookies: bool,
}

impl RefreshGuard {
    pub fn new(auth: Arc<dyn RefreshAuth>, secure_cookies: bool) -> Self {
        Self {
            auth,
            secure_cookies,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RefreshGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RefreshGuardMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RefreshGuardMiddleware {
            service: Rc::new(service),
            auth: Arc::clone(&self.auth),
            secure_cookies: self.secure_cookies,
        }))
    }
}

/// Service wrapper produced by [`RefreshGuard`].
pub struct RefreshGuardMiddleware<S> {
    service: Rc<S>,
    auth: Arc<dyn RefreshAuth>,
    secure_cookies: bool,
}

impl<S, B> Service<ServiceRequest> for RefreshGuardMiddleware<S>
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
        let secure = self.secure_cookies;
        let credential = req
            .cookie(REFRESH_COOKIE)
            .map(|cookie| cookie.value().to_owned());
        Box::pin(async move {
            match auth.refresh(credential).await {
                Ok(grant) => {
                    let cookie = Cookie::build(ACCESS_COOKIE, grant.access_token)
                        .http_only(true)
                        .same_site(SameSite::Lax)
                        .secure(secure)
                        .path("/")
                        .finish();
                    req.extensions_mut()
                        .insert(AuthenticatedIdentity(grant.identity));
                    let mut res = service.call(req).await?.map_into_left_body();
                    res.response_mut()
                        .add_cookie(&cookie)
                        .map_err(|error| Error::internal(error.to_string()))?;
                    Ok(res)
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
