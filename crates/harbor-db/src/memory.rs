//! In-memory store implementations for testing
//!
//! These stand in for Postgres in unit and HTTP tests. Outages and a failing
//! second ingestion write can be simulated with the toggles below.

use crate::db::{RequirementStore, ResultStore};
use async_trait::async_trait;
use chrono::Utc;
use harbor_core::models::{
    ComplianceResult, NewComplianceResult, NewUpload, Requirement, ResultWithUpload, Upload,
};
use harbor_core::AppError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    uploads: HashMap<Uuid, Upload>,
    results: HashMap<Uuid, (u64, ComplianceResult)>,
    requirements: Vec<Requirement>,
}

/// Shared in-memory uploads, results and requirements
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
    sequence: Arc<AtomicU64>,
    unavailable: Arc<AtomicBool>,
    fail_result_insert: Arc<AtomicBool>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail as if the database were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make `create_result` fail while `create_upload` keeps working.
    pub fn fail_result_inserts(&self, fail: bool) {
        self.fail_result_insert.store(fail, Ordering::SeqCst);
    }

    pub fn upload_count(&self) -> usize {
        self.tables.lock().unwrap().uploads.len()
    }

    pub fn result_count(&self) -> usize {
        self.tables.lock().unwrap().results.len()
    }

    pub fn get_upload(&self, id: Uuid) -> Option<Upload> {
        self.tables.lock().unwrap().uploads.get(&id).cloned()
    }

    /// Insert a result row directly, bypassing ingestion.
    pub fn insert_result(&self, result: ComplianceResult) {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        self.tables
            .lock()
            .unwrap()
            .results
            .insert(result.id, (seq, result));
    }

    /// Drop an upload row without touching its result, leaving an orphan.
    pub fn remove_upload_row(&self, id: Uuid) {
        self.tables.lock().unwrap().uploads.remove(&id);
    }

    fn check_available(&self) -> Result<(), AppError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(AppError::StoreUnavailable(
                "in-memory store marked unavailable".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    fn join(tables: &Tables, result: &ComplianceResult) -> ResultWithUpload {
        ResultWithUpload {
            result: result.clone(),
            upload: result
                .upload_id
                .and_then(|id| tables.uploads.get(&id).cloned()),
        }
    }
}

#[async_trait]
impl ResultStore for InMemoryStore {
    async fn create_upload(&self, upload: NewUpload) -> Result<Upload, AppError> {
        self.check_available()?;
        let upload = Upload {
            id: Uuid::new_v4(),
            stored_name: upload.stored_name,
            original_name: upload.original_name,
            file_path: upload.file_path,
            size: upload.size,
            mime_type: upload.mime_type,
            uploaded_at: Utc::now(),
        };
        self.tables
            .lock()
            .unwrap()
            .uploads
            .insert(upload.id, upload.clone());
        Ok(upload)
    }

    async fn create_result(
        &self,
        result: NewComplianceResult,
    ) -> Result<ComplianceResult, AppError> {
        self.check_available()?;
        if self.fail_result_insert.load(Ordering::SeqCst) {
            return Err(AppError::Internal("result insert failed".to_string()));
        }
        let now = Utc::now();
        let result = ComplianceResult {
            id: Uuid::new_v4(),
            upload_id: Some(result.upload_id),
            configured: false,
            issues_detected: result.issues_detected,
            report_path: None,
            created_at: now,
            updated_at: now,
        };
        self.insert_result(result.clone());
        Ok(result)
    }

    async fn list_results(&self) -> Result<Vec<ResultWithUpload>, AppError> {
        self.check_available()?;
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<&(u64, ComplianceResult)> = tables.results.values().collect();
        rows.sort_by(|a, b| (b.1.created_at, b.0).cmp(&(a.1.created_at, a.0)));
        Ok(rows
            .into_iter()
            .map(|(_, result)| Self::join(&tables, result))
            .collect())
    }

    async fn get_result(&self, id: Uuid) -> Result<Option<ResultWithUpload>, AppError> {
        self.check_available()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .results
            .get(&id)
            .map(|(_, result)| Self::join(&tables, result)))
    }

    async fn delete_upload(&self, id: Uuid) -> Result<bool, AppError> {
        self.check_available()?;
        let mut tables = self.tables.lock().unwrap();
        let removed = tables.uploads.remove(&id).is_some();
        if removed {
            // ON DELETE CASCADE
            tables
                .results
                .retain(|_, (_, result)| result.upload_id != Some(id));
        }
        Ok(removed)
    }

    async fn delete_result(&self, id: Uuid) -> Result<bool, AppError> {
        self.check_available()?;
        Ok(self.tables.lock().unwrap().results.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check_available()
    }
}

#[async_trait]
impl RequirementStore for InMemoryStore {
    async fn list_requirements(&self) -> Result<Vec<Requirement>, AppError> {
        self.check_available()?;
        Ok(self.tables.lock().unwrap().requirements.clone())
    }

    async fn get_requirement(&self, id: Uuid) -> Result<Option<Requirement>, AppError> {
        self.check_available()?;
        Ok(self
            .tables
            .lock()
            .unwrap()
            .requirements
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn create_requirement(&self, description: &str) -> Result<Requirement, AppError> {
        self.check_available()?;
        let requirement = Requirement {
            id: Uuid::new_v4(),
            description: description.to_string(),
            created_at: Utc::now(),
        };
        self.tables
            .lock()
            .unwrap()
            .requirements
            .push(requirement.clone());
        Ok(requirement)
    }

    async fn count_requirements(&self) -> Result<i64, AppError> {
        self.check_available()?;
        Ok(self.tables.lock().unwrap().requirements.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed_default_requirements;
    use harbor_core::models::DEFAULT_REQUIREMENTS;

    fn new_upload(name: &str) -> NewUpload {
        NewUpload {
            stored_name: format!("file-1-1-{}", name),
            original_name: name.to_string(),
            file_path: format!("file-1-1-{}", name),
            size: 3,
            mime_type: "text/plain".to_string(),
        }
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let store = InMemoryStore::new();
        for name in ["a.txt", "b.txt", "c.txt"] {
            let upload = store.create_upload(new_upload(name)).await.unwrap();
            store
                .create_result(NewComplianceResult {
                    upload_id: upload.id,
                    issues_detected: 1,
                })
                .await
                .unwrap();
        }

        let names: Vec<String> = store
            .list_results()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.upload.unwrap().original_name)
            .collect();
        assert_eq!(names, vec!["c.txt", "b.txt", "a.txt"]);
    }

    #[tokio::test]
    async fn test_missing_upload_joins_as_none() {
        let store = InMemoryStore::new();
        let upload = store.create_upload(new_upload("x.txt")).await.unwrap();
        let result = store
            .create_result(NewComplianceResult {
                upload_id: upload.id,
                issues_detected: 0,
            })
            .await
            .unwrap();

        store.remove_upload_row(upload.id);
        let row = store.get_result(result.id).await.unwrap().unwrap();
        assert!(row.upload.is_none());
    }

    #[tokio::test]
    async fn test_deleting_upload_cascades() {
        let store = InMemoryStore::new();
        let upload = store.create_upload(new_upload("y.txt")).await.unwrap();
        let result = store
            .create_result(NewComplianceResult {
                upload_id: upload.id,
                issues_detected: 0,
            })
            .await
            .unwrap();

        assert!(store.delete_upload(upload.id).await.unwrap());
        assert!(store.get_result(result.id).await.unwrap().is_none());
        assert!(!store.delete_result(result.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_unavailable_store() {
        let store = InMemoryStore::new();
        store.set_unavailable(true);
        let err = store.list_results().await.unwrap_err();
        assert!(err.is_connectivity());
        assert!(store.ping().await.is_err());
    }

    #[tokio::test]
    async fn test_seed_only_when_empty() {
        let store = InMemoryStore::new();
        assert_eq!(
            seed_default_requirements(&store).await.unwrap(),
            DEFAULT_REQUIREMENTS.len()
        );
        assert_eq!(seed_default_requirements(&store).await.unwrap(), 0);

        let listed = store.list_requirements().await.unwrap();
        assert_eq!(listed.len(), DEFAULT_REQUIREMENTS.len());
        assert_eq!(listed[0].description, DEFAULT_REQUIREMENTS[0]);
    }
}
