use super::SeaOrmStorage;
use crate::entity::lecture_materials::{Column as MaterialColumn, Entity as LectureMaterials};
use crate::entity::lectures::{ActiveModel, Column, Entity as Lectures};
use crate::errors::{Result, ScoalaError};
use crate::models::lectures::{entities::Lecture, requests::NewLecture};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
    sea_query::Expr,
};

impl SeaOrmStorage {
    /// 创建课程
    pub async fn create_lecture_impl(&self, req: NewLecture) -> Result<Lecture> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            title: Set(req.title),
            description: Set(req.description),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ScoalaError::database_operation(format!("创建课程失败: {e}")))?;

        Ok(result.into_lecture())
    }

    /// 通过 ID 获取课程
    pub async fn get_lecture_by_id_impl(&self, id: &str) -> Result<Option<Lecture>> {
        let result = Lectures::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| ScoalaError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_lecture()))
    }

    /// 列出全部课程
    pub async fn list_lectures_impl(&self) -> Result<Vec<Lecture>> {
        let lectures = Lectures::find()
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ScoalaError::database_operation(format!("查询课程列表失败: {e}")))?;

        Ok(lectures.into_iter().map(|m| m.into_lecture()).collect())
    }

    /// 更新课程
    pub async fn update_lecture_impl(&self, id: &str, req: NewLecture) -> Result<Option<Lecture>> {
        if self.get_lecture_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(id.to_string()),
            title: Set(req.title),
            description: Set(req.description),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| ScoalaError::database_operation(format!("更新课程失败: {e}")))?;

        Ok(Some(result.into_lecture()))
    }

    /// 删除课程，其资料解除关联
    pub async fn delete_lecture_impl(&self, id: &str) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ScoalaError::database_operation(format!("开启事务失败: {e}")))?;

        LectureMaterials::update_many()
            .col_expr(MaterialColumn::LectureId, Expr::value(None::<String>))
            .filter(MaterialColumn::LectureId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| ScoalaError::database_operation(format!("解除课程资料关联失败: {e}")))?;

        let result = Lectures::delete_by_id(id.to_string())
            .exec(&txn)
            .await
            .map_err(|e| ScoalaError::database_operation(format!("删除课程失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| ScoalaError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
