pub mod auth;

pub mod users;

pub mod roles;

pub mod lectures;

pub mod lecture_materials;

use actix_web::web;
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::config::AppConfig;
use crate::services::{AuthService, LectureMaterialService, LectureService, RoleService, UserService};
use crate::storage::Storage;
use crate::utils::{json_error_handler, path_error_handler, query_error_handler};

pub use auth::{AuthRateLimits, configure_auth_routes};
pub use lecture_materials::configure_lecture_material_routes;
pub use lectures::configure_lecture_routes;
pub use roles::configure_role_routes;
pub use users::configure_user_routes;

/// 组装应用：共享数据、请求解析错误处理器与全部路由
///
/// 服务与限流器在此创建一次，返回的闭包可被每个 worker 克隆使用。
pub fn configure_app(
    storage: Arc<dyn Storage>,
    cache: Arc<dyn ObjectCache>,
) -> impl Fn(&mut web::ServiceConfig) + Clone + Send + 'static {
    let users = web::Data::new(UserService::new(storage.clone(), cache.clone()));
    let roles = web::Data::new(RoleService::new(storage.clone(), cache.clone()));
    let lectures = web::Data::new(LectureService::new(storage.clone()));
    let materials = web::Data::new(LectureMaterialService::new(storage.clone()));
    let auth = web::Data::new(AuthService::new(storage.clone()));
    let storage = web::Data::new(storage);
    let cache = web::Data::new(cache);
    let limits = AuthRateLimits::default();
    let max_payload_size = AppConfig::get().server.limits.max_payload_size;

    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(
            web::JsonConfig::default()
                .limit(max_payload_size)
                .error_handler(json_error_handler),
        ) // JSON 解析错误统一为 400
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .app_data(storage.clone())
        .app_data(cache.clone())
        .app_data(users.clone())
        .app_data(roles.clone())
        .app_data(lectures.clone())
        .app_data(materials.clone())
        .app_data(auth.clone());

        configure_auth_routes(cfg, &limits);
        configure_user_routes(cfg);
        configure_role_routes(cfg);
        configure_lecture_routes(cfg);
        configure_lecture_material_routes(cfg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::roles::entities::RoleName;
    use crate::models::users::requests::UserRequest;
    use crate::testing::{TestContext, test_context};
    use crate::utils::jwt::JwtUtils;
    use actix_web::{
        App,
        http::{StatusCode, header},
        middleware::NormalizePath,
        test,
    };
    use serde_json::{Value, json};

    macro_rules! init_app {
        ($ctx:expr) => {
            test::init_service(
                App::new()
                    .wrap(NormalizePath::trim())
                    .configure(configure_app($ctx.storage.clone(), $ctx.cache.clone())),
            )
            .await
        };
    }

    // 创建用户并签发 access token
    async fn token_for(ctx: &TestContext, username: &str, roles: &[&str]) -> (String, String) {
        let user = ctx
            .users
            .add(UserRequest {
                name: Some(username.to_string()),
                username: Some(username.to_string()),
                password: Some("Secret123".to_string()),
                roles: Some(roles.iter().map(|r| r.to_string()).collect()),
            })
            .await
            .unwrap();
        let token = JwtUtils::generate_access_token(&user.id, &user.role_names()).unwrap();
        (user.id, format!("Bearer {token}"))
    }

    #[actix_web::test]
    async fn test_create_material_without_document_is_bad_request() {
        let ctx = test_context().await;
        let (_, teacher) = token_for(&ctx, "teacher", &[RoleName::TEACHER]).await;
        let app = init_app!(ctx);

        for body in [json!({ "document": null }), json!({}), json!({ "document": "  " })] {
            let req = test::TestRequest::post()
                .uri("/lecture-materials")
                .insert_header((header::AUTHORIZATION, teacher.clone()))
                .set_json(body)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["code"], "E401");
            assert_eq!(body["error"], "Lecture Material Invalid Document");
        }
    }

    #[actix_web::test]
    async fn test_create_then_fetch_material() {
        let ctx = test_context().await;
        let (_, teacher) = token_for(&ctx, "teacher", &[RoleName::TEACHER]).await;
        let app = init_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/lecture-materials")
            .insert_header((header::AUTHORIZATION, teacher.clone()))
            .set_json(json!({ "document": "Document_1.pdf" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(resp).await;
        let id = created["id"].as_str().unwrap().to_string();
        assert!(!id.is_empty());

        // 结尾斜杠被规范化
        let req = test::TestRequest::get()
            .uri(&format!("/lecture-materials/{id}/"))
            .insert_header((header::AUTHORIZATION, teacher.clone()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let fetched: Value = test::read_body_json(resp).await;
        assert_eq!(fetched["document"], "Document_1.pdf");

        let req = test::TestRequest::get()
            .uri("/lecture-materials")
            .insert_header((header::AUTHORIZATION, teacher))
            .to_request();
        let list: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(list.as_array().map(Vec::len), Some(1));
    }

    #[actix_web::test]
    async fn test_patch_material_with_null_lecture_detaches_it() {
        let ctx = test_context().await;
        let (_, teacher) = token_for(&ctx, "teacher", &[RoleName::TEACHER]).await;
        let app = init_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/lectures")
            .insert_header((header::AUTHORIZATION, teacher.clone()))
            .set_json(json!({ "title": "Physics" }))
            .to_request();
        let lecture: Value = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::post()
            .uri("/lecture-materials")
            .insert_header((header::AUTHORIZATION, teacher.clone()))
            .set_json(json!({ "document": "a.pdf", "lecture_id": lecture["id"] }))
            .to_request();
        let material: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(material["lecture_id"], lecture["id"]);
        let uri = format!("/lecture-materials/{}", material["id"].as_str().unwrap());

        // 缺失 lecture_id 保留原关联
        let req = test::TestRequest::patch()
            .uri(&uri)
            .insert_header((header::AUTHORIZATION, teacher.clone()))
            .set_json(json!({ "document": "b.pdf" }))
            .to_request();
        let kept: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(kept["lecture_id"], lecture["id"]);

        let req = test::TestRequest::patch()
            .uri(&uri)
            .insert_header((header::AUTHORIZATION, teacher))
            .set_json(json!({ "document": "b.pdf", "lecture_id": null }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let detached: Value = test::read_body_json(resp).await;
        assert_eq!(detached["lecture_id"], Value::Null);
    }

    #[actix_web::test]
    async fn test_list_users_by_unknown_role_is_empty() {
        let ctx = test_context().await;
        let (_, admin) = token_for(&ctx, "root", &[RoleName::ADMIN]).await;
        let app = init_app!(ctx);

        let req = test::TestRequest::get()
            .uri("/users?role=ROLE_NOBODY")
            .insert_header((header::AUTHORIZATION, admin))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!([]));
    }

    #[actix_web::test]
    async fn test_builtin_roles_cannot_be_changed() {
        let ctx = test_context().await;
        let (_, admin) = token_for(&ctx, "root", &[RoleName::ADMIN]).await;
        let admin_role = ctx.roles.get_one_by_name(RoleName::ADMIN).await.unwrap();
        let app = init_app!(ctx);

        let req = test::TestRequest::patch()
            .uri(&format!("/roles/{}", admin_role.id))
            .insert_header((header::AUTHORIZATION, admin.clone()))
            .set_json(json!({ "name": "ROLE_X" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "E203");

        // 管理员仍可访问
        let req = test::TestRequest::get()
            .uri("/roles")
            .insert_header((header::AUTHORIZATION, admin))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_missing_entities_are_not_found() {
        let ctx = test_context().await;
        let (_, admin) = token_for(&ctx, "root", &[RoleName::ADMIN]).await;
        let app = init_app!(ctx);

        for (uri, code) in [
            ("/lecture-materials/missing", "E400"),
            ("/lectures/missing", "E300"),
            ("/users/missing", "E100"),
            ("/roles/missing", "E200"),
        ] {
            let req = test::TestRequest::get()
                .uri(uri)
                .insert_header((header::AUTHORIZATION, admin.clone()))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["code"], code);
        }
    }

    #[actix_web::test]
    async fn test_update_rejects_username_change() {
        let ctx = test_context().await;
        let (_, admin) = token_for(&ctx, "root", &[RoleName::ADMIN]).await;
        let (student_id, _) = token_for(&ctx, "ana", &[RoleName::STUDENT]).await;
        let app = init_app!(ctx);

        let req = test::TestRequest::patch()
            .uri(&format!("/users/{student_id}"))
            .insert_header((header::AUTHORIZATION, admin.clone()))
            .set_json(json!({
                "name": "Ana",
                "username": "someone-else",
                "password": "Secret123",
                "roles": [RoleName::STUDENT],
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "E106");

        let req = test::TestRequest::get()
            .uri(&format!("/users/{student_id}"))
            .insert_header((header::AUTHORIZATION, admin))
            .to_request();
        let user: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(user["username"], "ana");
        assert!(user.get("password_hash").is_none());
    }

    #[actix_web::test]
    async fn test_access_control() {
        let ctx = test_context().await;
        let (_, student) = token_for(&ctx, "ana", &[RoleName::STUDENT]).await;
        let app = init_app!(ctx);

        let req = test::TestRequest::get().uri("/lectures").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/lectures")
            .insert_header((header::AUTHORIZATION, "Bearer not-a-token"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/lectures")
            .insert_header((header::AUTHORIZATION, student.clone()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri("/lectures")
            .insert_header((header::AUTHORIZATION, student.clone()))
            .set_json(json!({ "title": "Algebra" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::get()
            .uri("/users")
            .insert_header((header::AUTHORIZATION, student))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_malformed_json_is_bad_request() {
        let ctx = test_context().await;
        let (_, teacher) = token_for(&ctx, "teacher", &[RoleName::TEACHER]).await;
        let app = init_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/lectures")
            .insert_header((header::AUTHORIZATION, teacher))
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{ not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "E010");
    }

    #[actix_web::test]
    async fn test_register_login_me_refresh() {
        let ctx = test_context().await;
        let app = init_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(json!({ "name": "Ana", "username": "ana", "password": "Secret123" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let user: Value = test::read_body_json(resp).await;
        assert_eq!(user["roles"][0]["name"], RoleName::STUDENT);

        let req = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(json!({ "name": "Ana", "username": "ana", "password": "Secret123" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "username": "ana", "password": "Secret123" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let refresh_cookie = resp
            .response()
            .cookies()
            .find(|c| c.name() == "refresh_token")
            .map(|c| c.into_owned())
            .unwrap();
        let login: Value = test::read_body_json(resp).await;
        let access_token = login["access_token"].as_str().unwrap().to_string();

        let req = test::TestRequest::get()
            .uri("/auth/me")
            .insert_header((header::AUTHORIZATION, format!("Bearer {access_token}")))
            .to_request();
        let me: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(me["username"], "ana");

        let req = test::TestRequest::post()
            .uri("/auth/refresh")
            .cookie(refresh_cookie)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::post().uri("/auth/refresh").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "username": "ana", "password": "wrong" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_cached_principal_refreshed_after_update() {
        let ctx = test_context().await;
        let (_, admin) = token_for(&ctx, "root", &[RoleName::ADMIN]).await;
        let (teacher_id, teacher) = token_for(&ctx, "teacher", &[RoleName::TEACHER]).await;
        let app = init_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/lectures")
            .insert_header((header::AUTHORIZATION, teacher.clone()))
            .set_json(json!({ "title": "Algebra" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        // 管理员撤销教师角色后，同一令牌立即失去写权限
        let req = test::TestRequest::patch()
            .uri(&format!("/users/{teacher_id}"))
            .insert_header((header::AUTHORIZATION, admin))
            .set_json(json!({
                "name": "teacher",
                "password": "Secret123",
                "roles": [RoleName::STUDENT],
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri("/lectures")
            .insert_header((header::AUTHORIZATION, teacher))
            .set_json(json!({ "title": "Geometry" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}
