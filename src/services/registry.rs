//! Short-code registry
//!
//! Owns code generation, uniqueness and CRUD semantics over an injected
//! [`Storage`]. Transport concerns (auth, wire format) live in `api` and
//! call in here; nothing in this module knows about HTTP.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, trace, warn};

use super::code_generator::CodeGenerator;
use crate::config::RegistryConfig;
use crate::errors::{Result, TinylinkError};
use crate::storage::{RecordPatch, Storage, UrlRecord};
use crate::utils::{NULL_SENTINEL, build_short_url, is_favicon_request, is_reserved_code};

/// A freshly created record and its public URL
#[derive(Debug, Clone)]
pub struct CreatedLink {
    pub record: UrlRecord,
    pub short_url: String,
}

/// Every live record, oldest first
#[derive(Debug, Clone)]
pub struct LinkListing {
    pub records: Vec<UrlRecord>,
    pub total: usize,
}

/// Outcome of resolving a visited path segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Target URL; the click has already been persisted
    Redirect(String),
    /// Favicon request, answered without touching the store
    NoContent,
    /// A reserved route word, never a short code
    Reserved,
}

pub struct Registry {
    storage: Arc<dyn Storage>,
    generator: CodeGenerator,
    base_url: String,
    default_url: String,
    /// First path segment of the admin API, never usable as a code
    admin_segment: Option<String>,
}

impl Registry {
    pub fn new(storage: Arc<dyn Storage>, config: &RegistryConfig) -> Self {
        Self {
            storage,
            generator: CodeGenerator::new(config.code_length, config.max_generation_attempts),
            base_url: config.base_url.clone(),
            default_url: config.default_url.clone(),
            admin_segment: None,
        }
    }

    /// Reserve the segment the admin API is mounted under
    pub fn with_admin_prefix(mut self, admin_prefix: &str) -> Self {
        self.admin_segment = admin_prefix
            .split('/')
            .find(|segment| !segment.is_empty())
            .map(str::to_string);
        self
    }

    /// Canonical reserved words plus the admin segment
    pub fn is_reserved(&self, code: &str) -> bool {
        is_reserved_code(code)
            || self
                .admin_segment
                .as_deref()
                .is_some_and(|segment| segment.eq_ignore_ascii_case(code))
    }

    pub fn default_url(&self) -> &str {
        &self.default_url
    }

    pub fn short_url(&self, code: &str) -> String {
        build_short_url(&self.base_url, code)
    }

    // ============ Create ============

    /// Register `url` under `custom_code`, or under a generated code
    pub async fn create(&self, url: &str, custom_code: Option<&str>) -> Result<CreatedLink> {
        let url = url.trim();
        if url.is_empty() {
            return Err(TinylinkError::bad_request("A target URL is required"));
        }

        let record = match custom_code {
            Some(code) => self.create_with_code(url, code).await?,
            None => self.create_with_generated_code(url).await?,
        };

        info!("Registry: created '{}' -> '{}'", record.code, record.url);
        Ok(CreatedLink {
            short_url: self.short_url(&record.code),
            record,
        })
    }

    async fn create_with_code(&self, url: &str, code: &str) -> Result<UrlRecord> {
        let code = self.validate_custom_code(code)?;
        let record = UrlRecord::new(code, url, Utc::now());
        self.storage.insert(record.clone()).await?;
        Ok(record)
    }

    async fn create_with_generated_code(&self, url: &str) -> Result<UrlRecord> {
        for attempt in 1..=self.generator.max_attempts() {
            let candidate = self.generator.draw();

            // 短码长度可配置，极短时可能撞上保留字
            if self.is_reserved(&candidate) || self.storage.contains(&candidate).await? {
                trace!("Generated code '{}' is taken (attempt {})", candidate, attempt);
                continue;
            }

            let record = UrlRecord::new(candidate, url, Utc::now());
            match self.storage.insert(record.clone()).await {
                Ok(()) => return Ok(record),
                Err(TinylinkError::CodeConflict(_)) => {
                    // 并发请求抢先占用了同一个码，按碰撞处理
                    debug!("Generated code '{}' lost an insert race", record.code);
                }
                Err(e) => return Err(e),
            }
        }

        warn!(
            "Registry: no free code after {} attempts",
            self.generator.max_attempts()
        );
        Err(TinylinkError::generation_exhausted(format!(
            "No free {}-character code found after {} attempts",
            self.generator.length(),
            self.generator.max_attempts()
        )))
    }

    // ============ Redirect ============

    /// Resolve a visited code and count the click before answering
    pub async fn redirect_lookup(&self, code: &str) -> Result<Lookup> {
        if code.is_empty() || code == NULL_SENTINEL {
            return Err(TinylinkError::bad_request("No short code given"));
        }
        if is_favicon_request(code) {
            return Ok(Lookup::NoContent);
        }
        if self.is_reserved(code) {
            return Ok(Lookup::Reserved);
        }

        let record = self.storage.record_click(code, Utc::now()).await?;
        debug!(
            "Registry: '{}' -> '{}' (clicks: {})",
            record.code, record.url, record.clicks
        );
        Ok(Lookup::Redirect(record.url))
    }

    // ============ Read ============

    pub async fn get_all(&self) -> Result<LinkListing> {
        let records = self.storage.load_all().await?;
        Ok(LinkListing {
            total: records.len(),
            records,
        })
    }

    pub async fn get_one(&self, code: &str) -> Result<UrlRecord> {
        self.storage
            .get(code)
            .await?
            .ok_or_else(|| TinylinkError::not_found(format!("Link '{}' not found", code)))
    }

    // ============ Update / Delete ============

    /// Change the target and/or rename the code; other fields survive
    pub async fn update(
        &self,
        code: &str,
        new_url: Option<&str>,
        new_code: Option<&str>,
    ) -> Result<UrlRecord> {
        // Unknown codes win over malformed input
        self.get_one(code).await?;

        let new_code = match new_code {
            Some(candidate) if candidate.trim() == code => None,
            Some(candidate) => Some(self.validate_custom_code(candidate)?.to_string()),
            None => None,
        };

        let new_url = match new_url.map(str::trim) {
            Some("") => return Err(TinylinkError::bad_request("Target URL cannot be empty")),
            other => other.map(str::to_string),
        };

        let patch = RecordPatch {
            url: new_url,
            code: new_code,
            updated_at: Utc::now(),
        };
        let record = self.storage.update(code, patch).await?;

        info!("Registry: updated '{}' (now '{}')", code, record.code);
        Ok(record)
    }

    pub async fn delete(&self, code: &str) -> Result<UrlRecord> {
        let record = self.storage.remove(code).await?;
        info!("Registry: deleted '{}'", code);
        Ok(record)
    }

    /// Trim a caller-chosen code and reject empty or reserved ones
    fn validate_custom_code<'a>(&self, code: &'a str) -> Result<&'a str> {
        let code = code.trim();
        if code.is_empty() {
            return Err(TinylinkError::bad_request("Short code cannot be empty"));
        }
        if self.is_reserved(code) {
            return Err(TinylinkError::reserved_code(format!(
                "Short code '{}' is reserved",
                code
            )));
        }
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::FileStorage;
    use tempfile::TempDir;

    fn registry_in(dir: &TempDir) -> Registry {
        let storage = FileStorage::new(dir.path().join("urls.json")).unwrap();
        Registry::new(Arc::new(storage), &RegistryConfig::default())
    }

    #[test]
    fn test_validate_custom_code() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);

        assert_eq!(registry.validate_custom_code("  MyLink ").unwrap(), "MyLink");
        assert!(matches!(
            registry.validate_custom_code("   "),
            Err(TinylinkError::BadRequest(_))
        ));
        assert!(matches!(
            registry.validate_custom_code("Admin"),
            Err(TinylinkError::ReservedCode(_))
        ));
    }

    #[tokio::test]
    async fn test_admin_prefix_segment_is_reserved() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir).with_admin_prefix("/manage/");

        assert!(registry.is_reserved("Manage"));
        assert!(!registry.is_reserved("manager"));
        assert!(matches!(
            registry.create("https://example.org", Some("manage")).await,
            Err(TinylinkError::ReservedCode(_))
        ));
        assert_eq!(
            registry.redirect_lookup("MANAGE").await.unwrap(),
            Lookup::Reserved
        );

        registry.create("https://example.org", Some("keep")).await.unwrap();
        assert!(matches!(
            registry.update("keep", None, Some("manage")).await,
            Err(TinylinkError::ReservedCode(_))
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_url() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);

        let err = registry.create("  ", None).await.unwrap_err();
        assert!(matches!(err, TinylinkError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_short_url_uses_base_url() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);

        let created = registry
            .create("https://example.org", Some("docs"))
            .await
            .unwrap();
        assert_eq!(created.short_url, "http://localhost:8080/docs");
    }

    #[tokio::test]
    async fn test_redirect_sentinels() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);

        assert!(matches!(
            registry.redirect_lookup("null").await,
            Err(TinylinkError::BadRequest(_))
        ));
        assert!(matches!(
            registry.redirect_lookup("").await,
            Err(TinylinkError::BadRequest(_))
        ));
        assert_eq!(
            registry.redirect_lookup("favicon.ico").await.unwrap(),
            Lookup::NoContent
        );
        assert_eq!(
            registry.redirect_lookup("API").await.unwrap(),
            Lookup::Reserved
        );
    }

    #[tokio::test]
    async fn test_update_to_same_code_is_not_a_conflict() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);
        registry.create("https://a.example", Some("SAME")).await.unwrap();

        let updated = registry
            .update("SAME", Some("https://b.example"), Some("SAME"))
            .await
            .unwrap();
        assert_eq!(updated.code, "SAME");
        assert_eq!(updated.url, "https://b.example");
    }

    #[tokio::test]
    async fn test_update_unknown_code_wins_over_bad_input() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);

        let err = registry.update("MISSING", Some(""), Some("admin")).await;
        assert!(matches!(err, Err(TinylinkError::NotFound(_))));
    }
}
