use super::SeaOrmStorage;
use crate::entity::lecture_materials::{ActiveModel, Column, Entity as LectureMaterials};
use crate::errors::{Result, ScoalaError};
use crate::models::lecture_materials::{
    entities::LectureMaterial, requests::NewLectureMaterial,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建课程资料
    pub async fn create_lecture_material_impl(
        &self,
        req: NewLectureMaterial,
    ) -> Result<LectureMaterial> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            document: Set(req.document),
            lecture_id: Set(req.lecture_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ScoalaError::database_operation(format!("创建课程资料失败: {e}")))?;

        Ok(result.into_lecture_material())
    }

    /// 通过 ID 获取课程资料
    pub async fn get_lecture_material_by_id_impl(
        &self,
        id: &str,
    ) -> Result<Option<LectureMaterial>> {
        let result = LectureMaterials::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| ScoalaError::database_operation(format!("查询课程资料失败: {e}")))?;

        Ok(result.map(|m| m.into_lecture_material()))
    }

    /// 列出全部课程资料
    pub async fn list_lecture_materials_impl(&self) -> Result<Vec<LectureMaterial>> {
        let materials = LectureMaterials::find()
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                ScoalaError::database_operation(format!("查询课程资料列表失败: {e}"))
            })?;

        Ok(materials
            .into_iter()
            .map(|m| m.into_lecture_material())
            .collect())
    }

    /// 列出某课程下的资料
    pub async fn list_lecture_materials_by_lecture_impl(
        &self,
        lecture_id: &str,
    ) -> Result<Vec<LectureMaterial>> {
        let materials = LectureMaterials::find()
            .filter(Column::LectureId.eq(lecture_id))
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                ScoalaError::database_operation(format!("查询课程资料列表失败: {e}"))
            })?;

        Ok(materials
            .into_iter()
            .map(|m| m.into_lecture_material())
            .collect())
    }

    /// 更新课程资料
    pub async fn update_lecture_material_impl(
        &self,
        id: &str,
        req: NewLectureMaterial,
    ) -> Result<Option<LectureMaterial>> {
        if self.get_lecture_material_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(id.to_string()),
            document: Set(req.document),
            lecture_id: Set(req.lecture_id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| ScoalaError::database_operation(format!("更新课程资料失败: {e}")))?;

        Ok(Some(result.into_lecture_material()))
    }

    /// 删除课程资料
    pub async fn delete_lecture_material_impl(&self, id: &str) -> Result<bool> {
        let result = LectureMaterials::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .map_err(|e| ScoalaError::database_operation(format!("删除课程资料失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
