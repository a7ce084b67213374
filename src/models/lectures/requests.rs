use serde::Deserialize;

use crate::models::common::deserialize_nullable;

// 课程创建/更新请求
// description: 缺失保留原值，null 清空
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LectureRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub description: Option<Option<String>>,
}

// 课程数据（用于存储层，已校验）
#[derive(Debug, Clone)]
pub struct NewLecture {
    pub title: String,
    pub description: Option<String>,
}
