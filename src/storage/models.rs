use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single short-code mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRecord {
    pub code: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_accessed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub clicks: u64,
}

impl UrlRecord {
    /// Fresh record: no clicks, never updated or accessed
    pub fn new(code: impl Into<String>, url: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            code: code.into(),
            url: url.into(),
            created_at,
            updated_at: None,
            last_accessed: None,
            clicks: 0,
        }
    }
}

/// Changes applied by an update; `None` fields are left untouched
#[derive(Debug, Clone)]
pub struct RecordPatch {
    pub url: Option<String>,
    pub code: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl RecordPatch {
    /// The new code, if it actually differs from `current`
    pub fn rename_target(&self, current: &str) -> Option<&str> {
        self.code.as_deref().filter(|c| *c != current)
    }

    pub fn apply_to(&self, record: &mut UrlRecord) {
        if let Some(ref url) = self.url {
            record.url = url.clone();
        }
        if let Some(ref code) = self.code {
            record.code = code.clone();
        }
        record.updated_at = Some(self.updated_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_optional_fields_default() {
        let json = r#"{"code":"ABC","url":"https://example.org","created_at":"2026-01-01T00:00:00Z"}"#;
        let record: UrlRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.clicks, 0);
        assert!(record.updated_at.is_none());
        assert!(record.last_accessed.is_none());
    }

    #[test]
    fn test_missing_created_at_is_rejected() {
        let json = r#"{"code":"ABC","url":"https://example.org"}"#;
        assert!(serde_json::from_str::<UrlRecord>(json).is_err());
    }

    #[test]
    fn test_patch_keeps_untouched_fields() {
        let created = Utc::now();
        let mut record = UrlRecord::new("OLD", "https://a.example", created);
        record.clicks = 7;

        let patch = RecordPatch {
            url: None,
            code: Some("NEW".to_string()),
            updated_at: Utc::now(),
        };
        assert_eq!(patch.rename_target("OLD"), Some("NEW"));
        patch.apply_to(&mut record);

        assert_eq!(record.code, "NEW");
        assert_eq!(record.url, "https://a.example");
        assert_eq!(record.clicks, 7);
        assert_eq!(record.created_at, created);
        assert!(record.updated_at.is_some());
    }

    #[test]
    fn test_rename_to_same_code_is_not_a_rename() {
        let patch = RecordPatch {
            url: Some("https://b.example".to_string()),
            code: Some("SAME".to_string()),
            updated_at: Utc::now(),
        };
        assert_eq!(patch.rename_target("SAME"), None);
    }
}
