use actix_web::{HttpResponse, Result as ActixResult, web};

use crate::middlewares;
use crate::models::roles::entities::RoleName;
use crate::models::users::requests::{AddRoleRequest, UserListParams, UserRequest};
use crate::services::UserService;
use crate::utils::validate::non_blank;

pub async fn list_users(
    users: web::Data<UserService>,
    query: web::Query<UserListParams>,
) -> ActixResult<HttpResponse> {
    let list = match non_blank(query.role.as_deref()) {
        Some(role) => users.get_all_by_role(role).await?,
        None => users.get_all().await?,
    };
    Ok(HttpResponse::Ok().json(list))
}

pub async fn create_user(
    users: web::Data<UserService>,
    user_data: web::Json<UserRequest>,
) -> ActixResult<HttpResponse> {
    let user = users.add(user_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(user))
}

pub async fn get_user(
    users: web::Data<UserService>,
    user_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(users.get_one_by_id(&user_id).await?))
}

pub async fn get_user_by_username(
    users: web::Data<UserService>,
    username: web::Path<String>,
) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(users.get_one_by_username(&username).await?))
}

pub async fn update_user(
    users: web::Data<UserService>,
    user_id: web::Path<String>,
    update_data: web::Json<UserRequest>,
) -> ActixResult<HttpResponse> {
    let user = users.update(&user_id, update_data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(user))
}

pub async fn delete_user(
    users: web::Data<UserService>,
    user_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    users.delete(&user_id).await?;
    Ok(HttpResponse::Ok().finish())
}

pub async fn add_role_to_user(
    users: web::Data<UserService>,
    user_id: web::Path<String>,
    request: web::Json<AddRoleRequest>,
) -> ActixResult<HttpResponse> {
    let user = users
        .add_role_to_user(&user_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(user))
}

// 配置路由
pub fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .wrap(middlewares::RequireRole::new_any(RoleName::admin_roles()))
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_users))
            .route("", web::post().to(create_user))
            .route("/username/{username}", web::get().to(get_user_by_username))
            .route("/{id}", web::get().to(get_user))
            .route("/{id}", web::patch().to(update_user))
            .route("/{id}", web::delete().to(delete_user))
            .route("/{id}/roles", web::post().to(add_role_to_user)),
    );
}
