use std::sync::Arc;
use tracing::info;

use crate::errors::{Result, ScoalaError};
use crate::models::lecture_materials::{
    entities::LectureMaterial,
    requests::{LectureMaterialRequest, NewLectureMaterial},
};
use crate::storage::Storage;
use crate::utils::validate::non_blank;

pub struct LectureMaterialService {
    storage: Arc<dyn Storage>,
}

impl LectureMaterialService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn get_all(&self) -> Result<Vec<LectureMaterial>> {
        self.storage.list_lecture_materials().await
    }

    pub async fn get_one_by_id(&self, id: &str) -> Result<LectureMaterial> {
        self.storage
            .get_lecture_material_by_id(id)
            .await?
            .ok_or_else(|| {
                ScoalaError::lecture_material_not_found(
                    "Method getOneById: Lecture material not found.",
                )
            })
    }

    pub async fn add(&self, request: LectureMaterialRequest) -> Result<LectureMaterial> {
        let document = Self::validated_document("add", request.document.as_deref())?;
        let lecture_id = self.checked_lecture_id("add", request.lecture_id.flatten()).await?;

        let material = self
            .storage
            .create_lecture_material(NewLectureMaterial {
                document: document.to_string(),
                lecture_id,
            })
            .await?;

        info!("Lecture material {} created", material.id);
        Ok(material)
    }

    /// 更新资料，未提供 lecture_id 时保留原关联，显式 null 时解除关联
    pub async fn update(&self, id: &str, request: LectureMaterialRequest) -> Result<LectureMaterial> {
        let existing = self
            .storage
            .get_lecture_material_by_id(id)
            .await?
            .ok_or_else(|| {
                ScoalaError::lecture_material_not_found(
                    "Method update: Lecture material not found.",
                )
            })?;
        let document = Self::validated_document("update", request.document.as_deref())?;
        let lecture_id = match request.lecture_id {
            Some(Some(lecture_id)) => self.checked_lecture_id("update", Some(lecture_id)).await?,
            Some(None) => None,
            None => existing.lecture_id,
        };

        self.storage
            .update_lecture_material(
                id,
                NewLectureMaterial {
                    document: document.to_string(),
                    lecture_id,
                },
            )
            .await?
            .ok_or_else(|| {
                ScoalaError::lecture_material_not_found("Method update: Lecture material not found.")
            })
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        if !self.storage.delete_lecture_material(id).await? {
            return Err(ScoalaError::lecture_material_not_found(
                "Method delete: Lecture material not found.",
            ));
        }
        info!("Lecture material {} deleted", id);
        Ok(())
    }

    fn validated_document<'a>(operation: &str, document: Option<&'a str>) -> Result<&'a str> {
        non_blank(document).ok_or_else(|| {
            ScoalaError::lecture_material_invalid_document(format!(
                "Method {operation}: Document field can't be empty."
            ))
        })
    }

    // 关联的课程必须存在
    async fn checked_lecture_id(
        &self,
        operation: &str,
        lecture_id: Option<String>,
    ) -> Result<Option<String>> {
        let Some(lecture_id) = lecture_id else {
            return Ok(None);
        };
        match self.storage.get_lecture_by_id(&lecture_id).await? {
            Some(lecture) => Ok(Some(lecture.id)),
            None => Err(ScoalaError::lecture_not_found(format!(
                "Method {operation}: Lecture {lecture_id} not found."
            ))),
        }
    }
}
