use serde::{Deserialize, Serialize};

// 课程资料实体
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LectureMaterial {
    pub id: String,
    pub document: String,
    pub lecture_id: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
