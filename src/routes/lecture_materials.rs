use actix_web::{HttpResponse, Result as ActixResult, guard, web};

use crate::middlewares;
use crate::models::lecture_materials::requests::LectureMaterialRequest;
use crate::models::roles::entities::RoleName;
use crate::services::LectureMaterialService;

pub async fn list_materials(
    materials: web::Data<LectureMaterialService>,
) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(materials.get_all().await?))
}

pub async fn get_material(
    materials: web::Data<LectureMaterialService>,
    material_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(materials.get_one_by_id(&material_id).await?))
}

pub async fn create_material(
    materials: web::Data<LectureMaterialService>,
    request: web::Json<LectureMaterialRequest>,
) -> ActixResult<HttpResponse> {
    let material = materials.add(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(material))
}

pub async fn update_material(
    materials: web::Data<LectureMaterialService>,
    material_id: web::Path<String>,
    request: web::Json<LectureMaterialRequest>,
) -> ActixResult<HttpResponse> {
    let material = materials
        .update(&material_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(material))
}

pub async fn delete_material(
    materials: web::Data<LectureMaterialService>,
    material_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    materials.delete(&material_id).await?;
    Ok(HttpResponse::Ok().finish())
}

pub fn configure_lecture_material_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/lecture-materials")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .guard(
                        guard::Any(guard::Post())
                            .or(guard::Patch())
                            .or(guard::Delete()),
                    )
                    .wrap(middlewares::RequireRole::new_any(RoleName::staff_roles()))
                    .route("", web::post().to(create_material))
                    .route("/{id}", web::patch().to(update_material))
                    .route("/{id}", web::delete().to(delete_material)),
            )
            .route("", web::get().to(list_materials))
            .route("/{id}", web::get().to(get_material)),
    );
}
