use serde::Deserialize;

use crate::models::common::deserialize_nullable;

// 课程资料创建/更新请求
// lecture_id: 缺失保留原关联，null 解除关联
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LectureMaterialRequest {
    pub document: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub lecture_id: Option<Option<String>>,
}

// 课程资料数据（用于存储层，已校验）
#[derive(Debug, Clone)]
pub struct NewLectureMaterial {
    pub document: String,
    pub lecture_id: Option<String>,
}
