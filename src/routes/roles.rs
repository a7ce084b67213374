use actix_web::{HttpResponse, Result as ActixResult, web};

use crate::middlewares;
use crate::models::roles::{entities::RoleName, requests::RoleRequest};
use crate::services::RoleService;

pub async fn list_roles(roles: web::Data<RoleService>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(roles.get_all().await?))
}

pub async fn get_role(
    roles: web::Data<RoleService>,
    role_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(roles.get_one_by_id(&role_id).await?))
}

pub async fn get_role_by_name(
    roles: web::Data<RoleService>,
    name: web::Path<String>,
) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(roles.get_one_by_name(&name).await?))
}

pub async fn create_role(
    roles: web::Data<RoleService>,
    request: web::Json<RoleRequest>,
) -> ActixResult<HttpResponse> {
    let role = roles.add(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(role))
}

pub async fn update_role(
    roles: web::Data<RoleService>,
    role_id: web::Path<String>,
    request: web::Json<RoleRequest>,
) -> ActixResult<HttpResponse> {
    let role = roles.update(&role_id, request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(role))
}

pub async fn delete_role(
    roles: web::Data<RoleService>,
    role_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    roles.delete(&role_id).await?;
    Ok(HttpResponse::Ok().finish())
}

pub fn configure_role_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/roles")
            .wrap(middlewares::RequireRole::new_any(RoleName::admin_roles()))
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_roles))
            .route("", web::post().to(create_role))
            .route("/name/{name}", web::get().to(get_role_by_name))
            .route("/{id}", web::get().to(get_role))
            .route("/{id}", web::patch().to(update_role))
            .route("/{id}", web::delete().to(delete_role)),
    );
}
