use std::sync::Arc;

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use models::{file, post, BaseStatus};

use super::dto::{DownloadedFile, GetFileResponse, UploadFile};
use super::naming;
use crate::errors::ServiceError;
use crate::storage::FileStorage;

/// File operations over a post; bytes go to `storage`, rows to the given connection.
#[derive(Clone)]
pub struct FileService {
    storage: Arc<dyn FileStorage>,
    max_upload_bytes: usize,
}

impl FileService {
    pub fn new(storage: Arc<dyn FileStorage>, max_upload_bytes: usize) -> Self {
        Self { storage, max_upload_bytes }
    }

    pub fn max_upload_bytes(&self) -> usize { self.max_upload_bytes }

    fn check_part(&self, part: &UploadFile) -> Result<(), ServiceError> {
        if part.bytes.is_empty() {
            return Err(ServiceError::BadRequest(format!("file {:?} is empty", part.file_name)));
        }
        if part.bytes.len() > self.max_upload_bytes {
            return Err(ServiceError::PayloadTooLarge(format!(
                "file {:?} exceeds {} bytes",
                part.file_name, self.max_upload_bytes
            )));
        }
        Ok(())
    }

    /// Store every part and insert its row. Bytes written before a failure are removed again.
    #[instrument(skip(self, db, files), fields(post_id = %post_id, count = files.len()))]
    pub async fn upload_files<C: ConnectionTrait>(
        &self,
        db: &C,
        post_id: Uuid,
        files: &[UploadFile],
    ) -> Result<Vec<file::Model>, ServiceError> {
        for part in files {
            self.check_part(part)?;
        }

        let mut written: Vec<String> = Vec::with_capacity(files.len());
        let mut out = Vec::with_capacity(files.len());
        for part in files {
            match self.store_one(db, post_id, part, &mut written).await {
                Ok(saved) => out.push(saved),
                Err(e) => {
                    self.remove_stored(&written).await;
                    return Err(e);
                }
            }
        }
        info!(post_id = %post_id, count = out.len(), "files_uploaded");
        Ok(out)
    }

    async fn store_one<C: ConnectionTrait>(
        &self,
        db: &C,
        post_id: Uuid,
        part: &UploadFile,
        written: &mut Vec<String>,
    ) -> Result<file::Model, ServiceError> {
        let original_name = naming::sanitize_original_name(&part.file_name);
        let stored_name = naming::stored_name(&original_name);
        let content_type = naming::resolve_content_type(&original_name, part.content_type.as_deref());

        self.storage.put(&stored_name, &part.bytes).await?;
        written.push(stored_name.clone());

        let row = file::create(
            db,
            file::NewFile {
                post_id,
                original_name: &original_name,
                stored_name: &stored_name,
                content_type: &content_type,
                size_bytes: part.bytes.len() as i64,
            },
        )
        .await?;
        Ok(row)
    }

    /// Active files of a post.
    pub async fn get_files<C: ConnectionTrait>(&self, db: &C, post_id: Uuid) -> Result<Vec<GetFileResponse>, ServiceError> {
        let rows = file::find_active_by_post(db, post_id).await?;
        Ok(rows.into_iter().map(GetFileResponse::from).collect())
    }

    /// Content of one file; only the owner of the parent post may read it.
    #[instrument(skip(self, db), fields(member_id = %member_id, file_id = %file_id))]
    pub async fn download<C: ConnectionTrait>(
        &self,
        db: &C,
        member_id: Uuid,
        file_id: Uuid,
    ) -> Result<DownloadedFile, ServiceError> {
        let (found, parent) = file::Entity::find_by_id(file_id)
            .find_also_related(post::Entity)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("file"))?;
        let parent = parent.ok_or_else(|| ServiceError::not_found("post"))?;
        if !parent.is_owned_by(member_id) {
            return Err(ServiceError::not_owner("file"));
        }
        if !found.status.is_active() || !parent.status.is_active() {
            return Err(ServiceError::inactive("file"));
        }
        let bytes = self.storage.get(&found.stored_name).await?;
        Ok(DownloadedFile { meta: found.into(), bytes })
    }

    pub async fn soft_delete_files<C: ConnectionTrait>(&self, db: &C, post_id: Uuid) -> Result<u64, ServiceError> {
        Ok(file::set_status_by_post(db, post_id, BaseStatus::Inactive).await?)
    }

    pub async fn update_file_active<C: ConnectionTrait>(&self, db: &C, post_id: Uuid) -> Result<u64, ServiceError> {
        Ok(file::set_status_by_post(db, post_id, BaseStatus::Active).await?)
    }

    /// Delete the rows of a post's files and return their stored names; the
    /// caller removes the bytes with [`FileService::remove_stored`] once the
    /// surrounding transaction commits.
    pub async fn hard_delete_files<C: ConnectionTrait>(&self, db: &C, post_id: Uuid) -> Result<Vec<String>, ServiceError> {
        let rows = file::Entity::find()
            .filter(file::Column::PostId.eq(post_id))
            .all(db)
            .await?;
        file::delete_by_post(db, post_id).await?;
        Ok(rows.into_iter().map(|f| f.stored_name).collect())
    }

    /// Best-effort removal of stored bytes.
    pub async fn remove_stored(&self, stored_names: &[String]) {
        for name in stored_names {
            if let Err(e) = self.storage.remove(name).await {
                warn!(stored_name = %name, error = %e, "stored_file_remove_failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;
    use crate::storage::MemoryFileStorage;
    use chrono::{NaiveDate, Utc};
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase};

    fn service(storage: Arc<MemoryFileStorage>, max: usize) -> FileService {
        FileService::new(storage, max)
    }

    fn part(name: &str, bytes: &[u8]) -> UploadFile {
        UploadFile { file_name: name.into(), content_type: None, bytes: bytes.to_vec() }
    }

    fn file_row(post_id: Uuid, stored_name: &str, status: BaseStatus) -> file::Model {
        file::Model {
            id: Uuid::new_v4(),
            post_id,
            original_name: "beach.png".into(),
            stored_name: stored_name.into(),
            content_type: "image/png".into(),
            size_bytes: 3,
            status,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn post_row(member_id: Uuid, status: BaseStatus) -> post::Model {
        let day = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        post::Model {
            id: Uuid::new_v4(),
            member_id,
            title: "summer".into(),
            begin_at: day,
            finish_at: day,
            status,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn empty_part_is_bad_request_and_nothing_stored() {
        let storage = Arc::new(MemoryFileStorage::default());
        let svc = service(storage.clone(), 16);
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let err = svc
            .upload_files(&db, Uuid::new_v4(), &[part("a.png", b"abc"), part("b.png", b"")])
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::BadRequest);
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn oversized_part_is_payload_too_large() {
        let storage = Arc::new(MemoryFileStorage::default());
        let svc = service(storage.clone(), 4);
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let err = svc.upload_files(&db, Uuid::new_v4(), &[part("a.png", b"too big")]).await.unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::PayloadTooLarge);
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn failed_insert_removes_written_bytes() {
        let storage = Arc::new(MemoryFileStorage::default());
        let svc = service(storage.clone(), 16);
        let post_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![file_row(post_id, "ok.png", BaseStatus::Active)]])
            .append_query_errors([DbErr::Custom("insert failed".into())])
            .into_connection();
        let err = svc
            .upload_files(&db, post_id, &[part("a.png", b"abc"), part("b.png", b"def")])
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::InternalServerError);
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn download_checks_owner_and_status() {
        let storage = Arc::new(MemoryFileStorage::default());
        storage.put("x.png", b"png").await.unwrap();
        let svc = service(storage, 16);
        let owner = Uuid::new_v4();

        let active_post = post_row(owner, BaseStatus::Active);
        let active_file = file_row(active_post.id, "x.png", BaseStatus::Active);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![(active_file.clone(), active_post.clone())]])
            .append_query_results([vec![(active_file.clone(), active_post.clone())]])
            .into_connection();
        let got = svc.download(&db, owner, active_file.id).await.unwrap();
        assert_eq!(got.bytes, b"png");
        assert_eq!(got.meta.url, format!("/api/files/{}", active_file.id));
        let err = svc.download(&db, Uuid::new_v4(), active_file.id).await.unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::BadRequest);

        let removed_file = file_row(active_post.id, "x.png", BaseStatus::Inactive);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![(removed_file.clone(), active_post)]])
            .into_connection();
        let err = svc.download(&db, owner, removed_file.id).await.unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::MethodNotAllowed);
    }

    #[tokio::test]
    async fn remove_stored_tolerates_missing_bytes() {
        let storage = Arc::new(MemoryFileStorage::default());
        storage.put("keep.png", b"1").await.unwrap();
        storage.put("gone.png", b"2").await.unwrap();
        let svc = service(storage.clone(), 16);
        svc.remove_stored(&["gone.png".to_string(), "never.png".to_string()]).await;
        assert!(storage.contains("keep.png").await);
        assert!(!storage.contains("gone.png").await);
    }

    #[tokio::test]
    async fn parameterised_content_type_is_stored_as_its_essence() -> Result<(), anyhow::Error> {
        let Some(db) = crate::test_support::get_db().await else { return Ok(()) };
        let member = crate::test_support::seed_member(&db).await;
        let day = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let owned = post::create(&db, member.id, "summer", day, day).await?;
        let storage = Arc::new(MemoryFileStorage::default());
        let svc = service(storage.clone(), 16);

        let declared = format!("text/plain; charset=utf-8; x-note=\"{}\"", "a".repeat(140));
        let upload = UploadFile { file_name: "notes.txt".into(), content_type: Some(declared), bytes: b"hi".to_vec() };
        let rows = svc.upload_files(&db, owned.id, &[upload]).await?;
        assert_eq!(rows[0].content_type, "text/plain");
        assert_eq!(svc.get_files(&db, owned.id).await?[0].content_type, "text/plain");
        assert_eq!(storage.len().await, 1);
        Ok(())
    }
}
