/*!
 * 基于角色的访问控制中间件
 *
 * 必须在 RequireJWT 之后使用。用户拥有任一要求的角色即放行，否则返回 403。
 *
 * ```rust,ignore
 * web::scope("/users")
 *     .wrap(RequireRole::new_any(RoleName::admin_roles()))
 *     .wrap(RequireJWT)
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::{errors::ScoalaError, models::users::entities::User};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireRole {
    required_roles: Vec<String>,
}

impl RequireRole {
    /// 需要任一角色
    pub fn new_any(roles: &[&str]) -> Self {
        Self {
            required_roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            required_roles: self.required_roles.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    required_roles: Vec<String>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let required_roles = self.required_roles.clone();

        Box::pin(async move {
            let user = req.extensions().get::<User>().cloned();

            match user {
                Some(user) => {
                    let has_permission = user.has_any_role(required_roles.as_slice());

                    if has_permission {
                        let res = srv.call(req).await?.map_into_left_body();
                        Ok(res)
                    } else {
                        info!(
                            "Access denied for user {} (roles: {:?}). Required roles: {:?}",
                            user.id,
                            user.role_names(),
                            required_roles
                        );
                        Ok(req.into_response(
                            create_error_response(ScoalaError::authorization("Access denied"))
                                .map_into_right_body(),
                        ))
                    }
                }
                None => {
                    info!(
                        "Role check failed: no user found in request. Make sure RequireJWT middleware is applied first."
                    );
                    Ok(req.into_response(
                        create_error_response(ScoalaError::authentication(
                            "Authentication required",
                        ))
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}
