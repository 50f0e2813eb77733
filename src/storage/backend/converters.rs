use crate::storage::UrlRecord;
use migration::entities::url_record;

/// 将 Sea-ORM Model 转换为 UrlRecord
pub fn model_to_record(model: url_record::Model) -> UrlRecord {
    UrlRecord {
        code: model.code,
        url: model.url,
        created_at: model.created_at,
        updated_at: model.updated_at,
        last_accessed: model.last_accessed,
        clicks: model.clicks.max(0) as u64,
    }
}

/// 将 UrlRecord 转换为 ActiveModel（用于插入）
pub fn record_to_active_model(record: &UrlRecord) -> url_record::ActiveModel {
    use sea_orm::ActiveValue::Set;

    url_record::ActiveModel {
        code: Set(record.code.clone()),
        url: Set(record.url.clone()),
        created_at: Set(record.created_at),
        updated_at: Set(record.updated_at),
        last_accessed: Set(record.last_accessed),
        clicks: Set(i64::try_from(record.clicks).unwrap_or(i64::MAX)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::ActiveValue;

    fn create_test_model() -> url_record::Model {
        url_record::Model {
            code: "ABC123".to_string(),
            url: "https://example.com".to_string(),
            created_at: Utc::now(),
            updated_at: None,
            last_accessed: Some(Utc::now()),
            clicks: 42,
        }
    }

    #[test]
    fn test_model_to_record_basic() {
        let model = create_test_model();
        let expected_last_accessed = model.last_accessed;

        let record = model_to_record(model);

        assert_eq!(record.code, "ABC123");
        assert_eq!(record.url, "https://example.com");
        assert_eq!(record.clicks, 42);
        assert_eq!(record.last_accessed, expected_last_accessed);
        assert!(record.updated_at.is_none());
    }

    #[test]
    fn test_model_to_record_negative_clicks() {
        let mut model = create_test_model();
        model.clicks = -10; // 负数应该被转换为 0

        assert_eq!(model_to_record(model).clicks, 0);
    }

    #[test]
    fn test_record_to_active_model_sets_all_columns() {
        let mut record = UrlRecord::new("XYZ789", "https://target.com", Utc::now());
        record.clicks = 100;

        let active_model = record_to_active_model(&record);

        assert!(matches!(active_model.code, ActiveValue::Set(ref c) if c == "XYZ789"));
        assert!(matches!(active_model.url, ActiveValue::Set(ref u) if u == "https://target.com"));
        assert!(matches!(active_model.updated_at, ActiveValue::Set(None)));
        assert!(matches!(active_model.clicks, ActiveValue::Set(100)));
    }
}
