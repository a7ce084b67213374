use std::sync::Arc;
use tracing::info;

use crate::errors::{Result, ScoalaError};
use crate::models::lecture_materials::entities::LectureMaterial;
use crate::models::lectures::{
    entities::Lecture,
    requests::{LectureRequest, NewLecture},
};
use crate::storage::Storage;
use crate::utils::validate::non_blank;

pub struct LectureService {
    storage: Arc<dyn Storage>,
}

impl LectureService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn get_all(&self) -> Result<Vec<Lecture>> {
        self.storage.list_lectures().await
    }

    pub async fn get_one_by_id(&self, id: &str) -> Result<Lecture> {
        self.storage
            .get_lecture_by_id(id)
            .await?
            .ok_or_else(|| ScoalaError::lecture_not_found("Method getOneById: Lecture not found."))
    }

    pub async fn add(&self, request: LectureRequest) -> Result<Lecture> {
        let title = non_blank(request.title.as_deref()).ok_or_else(|| {
            ScoalaError::lecture_invalid_title("Method add: Title field can't be empty.")
        })?;

        let lecture = self
            .storage
            .create_lecture(NewLecture {
                title: title.to_string(),
                description: request.description.flatten(),
            })
            .await?;

        info!("Lecture {} created", lecture.id);
        Ok(lecture)
    }

    /// 更新课程，未提供 description 时保留原值，显式 null 时清空
    pub async fn update(&self, id: &str, request: LectureRequest) -> Result<Lecture> {
        let existing = self.storage.get_lecture_by_id(id).await?.ok_or_else(|| {
            ScoalaError::lecture_not_found("Method update: Lecture not found.")
        })?;
        let title = non_blank(request.title.as_deref()).ok_or_else(|| {
            ScoalaError::lecture_invalid_title("Method update: Title field can't be empty.")
        })?;

        self.storage
            .update_lecture(
                id,
                NewLecture {
                    title: title.to_string(),
                    description: request.description.unwrap_or(existing.description),
                },
            )
            .await?
            .ok_or_else(|| ScoalaError::lecture_not_found("Method update: Lecture not found."))
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        if !self.storage.delete_lecture(id).await? {
            return Err(ScoalaError::lecture_not_found(
                "Method delete: Lecture not found.",
            ));
        }
        info!("Lecture {} deleted", id);
        Ok(())
    }

    // 课程下的全部资料
    pub async fn get_materials(&self, id: &str) -> Result<Vec<LectureMaterial>> {
        let lecture = self.get_one_by_id(id).await?;
        self.storage
            .list_lecture_materials_by_lecture(&lecture.id)
            .await
    }
}
