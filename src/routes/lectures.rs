use actix_web::{HttpResponse, Result as ActixResult, guard, web};

use crate::middlewares;
use crate::models::lectures::requests::LectureRequest;
use crate::models::roles::entities::RoleName;
use crate::services::LectureService;

pub async fn list_lectures(lectures: web::Data<LectureService>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(lectures.get_all().await?))
}

pub async fn get_lecture(
    lectures: web::Data<LectureService>,
    lecture_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(lectures.get_one_by_id(&lecture_id).await?))
}

pub async fn list_lecture_materials(
    lectures: web::Data<LectureService>,
    lecture_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(lectures.get_materials(&lecture_id).await?))
}

pub async fn create_lecture(
    lectures: web::Data<LectureService>,
    request: web::Json<LectureRequest>,
) -> ActixResult<HttpResponse> {
    let lecture = lectures.add(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(lecture))
}

pub async fn update_lecture(
    lectures: web::Data<LectureService>,
    lecture_id: web::Path<String>,
    request: web::Json<LectureRequest>,
) -> ActixResult<HttpResponse> {
    let lecture = lectures.update(&lecture_id, request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(lecture))
}

pub async fn delete_lecture(
    lectures: web::Data<LectureService>,
    lecture_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    lectures.delete(&lecture_id).await?;
    Ok(HttpResponse::Ok().finish())
}

// 配置路由
pub fn configure_lecture_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/lectures")
            .wrap(middlewares::RequireJWT)
            // 写操作需要教师或管理员角色
            .service(
                web::scope("")
                    .guard(
                        guard::Any(guard::Post())
                            .or(guard::Patch())
                            .or(guard::Delete()),
                    )
                    .wrap(middlewares::RequireRole::new_any(RoleName::staff_roles()))
                    .route("", web::post().to(create_lecture))
                    .route("/{id}", web::patch().to(update_lecture))
                    .route("/{id}", web::delete().to(delete_lecture)),
            )
            .route("", web::get().to(list_lectures))
            .route("/{id}", web::get().to(get_lecture))
            .route(
                "/{id}/lecture-materials",
                web::get().to(list_lecture_materials),
            ),
    );
}
