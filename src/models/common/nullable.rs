use serde::{Deserialize, Deserializer};

/// 区分字段缺失与显式 null
///
/// 与 `#[serde(default)]` 搭配：缺失为 `None`，`null` 为 `Some(None)`，有值为 `Some(Some(v))`。
pub fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "deserialize_nullable")]
        field: Option<Option<String>>,
    }

    #[test]
    fn test_missing_null_and_value_are_distinct() {
        let missing: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.field, None);

        let null: Patch = serde_json::from_str(r#"{"field": null}"#).unwrap();
        assert_eq!(null.field, Some(None));

        let value: Patch = serde_json::from_str(r#"{"field": "x"}"#).unwrap();
        assert_eq!(value.field, Some(Some("x".to_string())));
    }
}
