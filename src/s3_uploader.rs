use crate::config::S3Config;
use crate::image::S3ObjectRef;
use async_trait::async_trait;
use aws_sdk_s3::config::Builder as S3ConfigBuilder;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart, ObjectCannedAcl};
use aws_sdk_s3::Client as S3Client;
use aws_types::SdkConfig;
use chrono::Utc;
use futures::future::try_join_all;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tracing::{debug, info, instrument, warn};

#[cfg(test)]
use mockall::automock;

/// S3 refuses multipart uploads with more parts than this
const MAX_PARTS: u64 = 10_000;

/// Errors that can occur while uploading
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Invalid file format '{extension}' for {path}")]
    InvalidFormat { path: PathBuf, extension: String },

    #[error("Path has no usable file name: {0}")]
    InvalidPath(PathBuf),

    #[error("File {path} needs {parts} parts, more than S3 allows")]
    FileTooLarge { path: PathBuf, parts: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Service(#[from] aws_sdk_s3::Error),

    #[error("No upload ID in multipart upload response")]
    MissingUploadId,
}

/// How the bytes reached the bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transfer {
    SinglePart,
    Multipart { parts: u64 },
    /// An object with the target key was already present; nothing was sent
    AlreadyExists,
}

/// What the store reports after writing an object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub e_tag: Option<String>,
    /// Object URL, as returned by `CompleteMultipartUpload`
    pub location: Option<String>,
    pub transfer: Transfer,
}

/// Object reference merged with the transfer result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub object: S3ObjectRef,
    pub e_tag: Option<String>,
    pub location: Option<String>,
    pub transfer: Transfer,
}

/// Remote object store the uploader writes to
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Whether `key` is present. Any error counts as absent.
    async fn exists(&self, key: &str) -> bool;

    /// Stream the file at `path` to `key`
    async fn put_file(&self, key: &str, path: &Path) -> Result<StoredObject, StorageError>;
}

/// `ObjectStore` backed by the AWS S3 SDK
#[derive(Clone)]
pub struct S3Store {
    client: S3Client,
    bucket: String,
    acl: Option<ObjectCannedAcl>,
    multipart_threshold_bytes: u64,
    part_size_bytes: u64,
    part_concurrency: usize,
}

impl S3Store {
    /// Create a store from a loaded AWS SDK configuration
    pub fn new(sdk_config: &SdkConfig, config: &S3Config) -> Self {
        let mut s3_config_builder = S3ConfigBuilder::from(sdk_config);

        // Configure custom endpoint for MinIO/LocalStack
        if let Some(ref endpoint_url) = config.endpoint_url {
            s3_config_builder = s3_config_builder.endpoint_url(endpoint_url);
        }

        // Force path-style access for MinIO compatibility
        if config.force_path_style {
            s3_config_builder = s3_config_builder.force_path_style(true);
        }

        let client = S3Client::from_conf(s3_config_builder.build());

        Self::from_client(client, config)
    }

    pub fn from_client(client: S3Client, config: &S3Config) -> Self {
        Self {
            client,
            bucket: config.bucket.clone(),
            acl: config.canned_acl(),
            multipart_threshold_bytes: config.multipart_threshold_bytes as u64,
            part_size_bytes: config.part_size_bytes as u64,
            part_concurrency: config.part_concurrency,
        }
    }

    /// Simple single-part upload for small files
    async fn simple_upload(&self, key: &str, path: &Path) -> Result<StoredObject, StorageError> {
        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| StorageError::Io(std::io::Error::other(e)))?;

        let output = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .content_type(get_content_type(path))
            .set_acl(self.acl.clone())
            .send()
            .await
            .map_err(aws_sdk_s3::Error::from)?;

        Ok(StoredObject {
            e_tag: output.e_tag().map(String::from),
            location: None,
            transfer: Transfer::SinglePart,
        })
    }

    /// Multipart upload for large files, aborted on any failure
    async fn multipart_upload(
        &self,
        key: &str,
        path: &Path,
        size: u64,
    ) -> Result<StoredObject, StorageError> {
        let parts = part_ranges(size, self.part_size_bytes);
        if parts.len() as u64 > MAX_PARTS {
            return Err(StorageError::FileTooLarge {
                path: path.to_path_buf(),
                parts: parts.len() as u64,
            });
        }

        let create_response = self
            .client
            .create_multipart_upload()
            .bucket(&self.bucket)
            .key(key)
            .content_type(get_content_type(path))
            .set_acl(self.acl.clone())
            .send()
            .await
            .map_err(aws_sdk_s3::Error::from)?;

        let upload_id = create_response
            .upload_id()
            .ok_or(StorageError::MissingUploadId)?
            .to_string();

        match self.upload_parts(key, path, &upload_id, &parts).await {
            Ok(completed_parts) => {
                let completed_upload = CompletedMultipartUpload::builder()
                    .set_parts(Some(completed_parts))
                    .build();

                let output = self
                    .client
                    .complete_multipart_upload()
                    .bucket(&self.bucket)
                    .key(key)
                    .upload_id(&upload_id)
                    .multipart_upload(completed_upload)
                    .send()
                    .await
                    .map_err(aws_sdk_s3::Error::from)?;

                Ok(StoredObject {
                    e_tag: output.e_tag().map(String::from),
                    location: output.location().map(String::from),
                    transfer: Transfer::Multipart {
                        parts: parts.len() as u64,
                    },
                })
            }
            Err(e) => {
                if let Err(abort_error) = self
                    .client
                    .abort_multipart_upload()
                    .bucket(&self.bucket)
                    .key(key)
                    .upload_id(&upload_id)
                    .send()
                    .await
                {
                    warn!(
                        s3_key = %key,
                        error = %aws_sdk_s3::Error::from(abort_error),
                        "Failed to abort multipart upload"
                    );
                } else {
                    warn!(s3_key = %key, error = %e, "Multipart upload aborted");
                }
                Err(e)
            }
        }
    }

    /// Upload every part, at most `part_concurrency` at a time, in part order
    async fn upload_parts(
        &self,
        key: &str,
        path: &Path,
        upload_id: &str,
        parts: &[PartRange],
    ) -> Result<Vec<CompletedPart>, StorageError> {
        let total = parts.len();

        stream::iter(parts.iter().copied())
            .map(|part| async move {
                let chunk = read_part(path, part.offset, part.length).await?;

                let upload_part_response = self
                    .client
                    .upload_part()
                    .bucket(&self.bucket)
                    .key(key)
                    .upload_id(upload_id)
                    .part_number(part.number)
                    .body(ByteStream::from(chunk))
                    .send()
                    .await
                    .map_err(aws_sdk_s3::Error::from)?;

                debug!(
                    s3_key = %key,
                    part = part.number,
                    parts = total,
                    bytes = part.length,
                    "upload-part"
                );

                Ok::<_, StorageError>(
                    CompletedPart::builder()
                        .part_number(part.number)
                        .set_e_tag(upload_part_response.e_tag().map(String::from))
                        .build(),
                )
            })
            .buffered(self.part_concurrency)
            .try_collect()
            .await
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn exists(&self, key: &str) -> bool {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => true,
            Err(e) => {
                debug!(s3_key = %key, error = %aws_sdk_s3::Error::from(e), "Object not found");
                false
            }
        }
    }

    async fn put_file(&self, key: &str, path: &Path) -> Result<StoredObject, StorageError> {
        let size = tokio::fs::metadata(path).await?.len();

        if size > self.multipart_threshold_bytes {
            self.multipart_upload(key, path, size).await
        } else {
            self.simple_upload(key, path).await
        }
    }
}

/// S3 uploader for analysis images
pub struct S3Uploader<S = S3Store> {
    store: S,
    bucket: String,
    folder: String,
    allowed_extensions: Vec<String>,
}

impl S3Uploader<S3Store> {
    /// Create a new S3 uploader
    pub fn new(sdk_config: &SdkConfig, config: &S3Config) -> Self {
        let uploader = Self::with_store(S3Store::new(sdk_config, config), config);

        info!(
            bucket = %config.bucket,
            folder = %config.folder,
            "S3 uploader initialized"
        );

        uploader
    }
}

impl<S: ObjectStore> S3Uploader<S> {
    pub fn with_store(store: S, config: &S3Config) -> Self {
        Self {
            store,
            bucket: config.bucket.clone(),
            folder: config.folder.clone(),
            allowed_extensions: config.allowed_extensions.clone(),
        }
    }

    /// Upload a local image into `folder` (or the configured default folder)
    ///
    /// The key is `<folder><unix millis>-<file name>`. If an object with that
    /// key already exists nothing is transferred. Because the key embeds the
    /// current time, that only happens on a same-millisecond collision.
    #[instrument(skip(self), fields(bucket = %self.bucket))]
    pub async fn upload(
        &self,
        path: &Path,
        folder: Option<&str>,
    ) -> Result<UploadReceipt, StorageError> {
        let folder = folder.unwrap_or(&self.folder);
        let s3_key = object_key(
            path,
            folder,
            Utc::now().timestamp_millis(),
            &self.allowed_extensions,
        )?;
        let object = S3ObjectRef::new(&self.bucket, &s3_key);

        if self.store.exists(&s3_key).await {
            debug!(s3_key = %s3_key, "file-already-exists");
            return Ok(UploadReceipt {
                object,
                e_tag: None,
                location: None,
                transfer: Transfer::AlreadyExists,
            });
        }

        debug!(s3_key = %s3_key, "Uploading image to S3");

        let stored = self.store.put_file(&s3_key, path).await?;

        info!(s3_key = %s3_key, transfer = ?stored.transfer, "Image uploaded successfully");

        Ok(UploadReceipt {
            object,
            e_tag: stored.e_tag,
            location: stored.location,
            transfer: stored.transfer,
        })
    }

    /// Upload several images, all of them in flight at once
    ///
    /// `result[i]` belongs to `paths[i]`. The first failure fails the batch.
    #[instrument(skip(self, paths), fields(count = paths.len()))]
    pub async fn upload_multiple<P: AsRef<Path> + Sync>(
        &self,
        paths: &[P],
        folder: Option<&str>,
    ) -> Result<Vec<UploadReceipt>, StorageError> {
        try_join_all(paths.iter().map(|path| self.upload(path.as_ref(), folder))).await
    }

    /// Check if an object exists; never fails
    pub async fn exists(&self, s3_key: &str) -> bool {
        self.store.exists(s3_key).await
    }

    /// Get the bucket name
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Get the default upload folder
    pub fn default_folder(&self) -> &str {
        &self.folder
    }
}

/// Build the object key for `path` and check its extension
///
/// Format: `{folder}{timestamp_millis}-{file_name}`
pub fn object_key(
    path: &Path,
    folder: &str,
    timestamp_millis: i64,
    allowed_extensions: &[String],
) -> Result<String, StorageError> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| StorageError::InvalidPath(path.to_path_buf()))?;

    // Text after the last dot, so `.jpg` counts as a jpg file
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .unwrap_or_default()
        .to_lowercase();

    if !allowed_extensions
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(&extension))
    {
        return Err(StorageError::InvalidFormat {
            path: path.to_path_buf(),
            extension,
        });
    }

    Ok(format!("{}{}-{}", folder, timestamp_millis, file_name))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PartRange {
    number: i32,
    offset: u64,
    length: usize,
}

/// Split `size` bytes into parts of `part_size` (the last one may be shorter)
fn part_ranges(size: u64, part_size: u64) -> Vec<PartRange> {
    let part_size = part_size.max(1);
    let mut parts = Vec::new();
    let mut offset = 0;
    let mut number = 1;

    while offset < size {
        let length = part_size.min(size - offset);
        parts.push(PartRange {
            number,
            offset,
            length: length as usize,
        });
        offset += length;
        number += 1;
    }

    parts
}

async fn read_part(path: &Path, offset: u64, length: usize) -> Result<Vec<u8>, StorageError> {
    let mut file = File::open(path).await?;
    file.seek(SeekFrom::Start(offset)).await?;

    let mut buffer = vec![0u8; length];
    file.read_exact(&mut buffer).await?;
    Ok(buffer)
}

/// Get content type from the file extension
fn get_content_type(path: &Path) -> String {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();

    match extension.to_lowercase().as_str() {
        "jpeg" | "jpg" => "image/jpeg".to_string(),
        "png" => "image/png".to_string(),
        _ => "application/octet-stream".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use std::time::Duration;

    fn test_config() -> S3Config {
        let mut config = S3Config::new("test-bucket");
        config.folder = "faces/".to_string();
        config
    }

    fn stored(transfer: Transfer) -> StoredObject {
        StoredObject {
            e_tag: Some("\"etag\"".to_string()),
            location: None,
            transfer,
        }
    }

    /// Store that finishes each upload after a per-file delay
    struct DelayedStore {
        delays_ms: HashMap<String, u64>,
        failing: Option<String>,
    }

    #[async_trait]
    impl ObjectStore for DelayedStore {
        async fn exists(&self, _key: &str) -> bool {
            false
        }

        async fn put_file(&self, _key: &str, path: &Path) -> Result<StoredObject, StorageError> {
            let name = path.file_name().unwrap().to_str().unwrap().to_string();
            let delay = self.delays_ms.get(&name).copied().unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(delay)).await;

            if self.failing.as_deref() == Some(name.as_str()) {
                return Err(StorageError::Io(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "connection reset",
                )));
            }

            Ok(stored(Transfer::SinglePart))
        }
    }

    #[test]
    fn test_object_key_format() {
        let allowed = S3Config::new("b").allowed_extensions;
        let key = object_key(Path::new("/tmp/images/cat.jpg"), "faces/", 1700000000123, &allowed)
            .unwrap();

        assert_eq!(key, "faces/1700000000123-cat.jpg");
    }

    #[test]
    fn test_object_key_extension_case_insensitive() {
        let allowed = S3Config::new("b").allowed_extensions;

        assert!(object_key(Path::new("CAT.JPG"), "", 1, &allowed).is_ok());
        assert!(object_key(Path::new("dog.Png"), "", 1, &allowed).is_ok());
        assert!(object_key(Path::new("x.jpeg"), "", 1, &allowed).is_ok());
    }

    #[test]
    fn test_object_key_uses_text_after_last_dot() {
        let allowed = S3Config::new("b").allowed_extensions;

        assert_eq!(
            object_key(Path::new("shots/.jpg"), "f/", 7, &allowed).unwrap(),
            "f/7-.jpg"
        );
        assert!(object_key(Path::new("archive.tar.PNG"), "", 1, &allowed).is_ok());
        assert!(object_key(Path::new("photo.jpg.txt"), "", 1, &allowed).is_err());
    }

    #[test]
    fn test_object_key_rejects_invalid_format() {
        let allowed = S3Config::new("b").allowed_extensions;

        let err = object_key(Path::new("anim.gif"), "", 1, &allowed).unwrap_err();
        assert!(matches!(err, StorageError::InvalidFormat { ref extension, .. } if extension == "gif"));

        assert!(matches!(
            object_key(Path::new("README"), "", 1, &allowed),
            Err(StorageError::InvalidFormat { .. })
        ));
        assert!(matches!(
            object_key(Path::new("/"), "", 1, &allowed),
            Err(StorageError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_part_ranges() {
        let parts = part_ranges(25, 10);

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], PartRange { number: 1, offset: 0, length: 10 });
        assert_eq!(parts[2], PartRange { number: 3, offset: 20, length: 5 });
        assert!(part_ranges(0, 10).is_empty());
        assert_eq!(part_ranges(20, 10).len(), 2);
    }

    #[test]
    fn test_get_content_type() {
        assert_eq!(get_content_type(Path::new("a.jpeg")), "image/jpeg");
        assert_eq!(get_content_type(Path::new("a.JPG")), "image/jpeg");
        assert_eq!(get_content_type(Path::new("a.png")), "image/png");
        assert_eq!(get_content_type(Path::new("a.bin")), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_read_part() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"0123456789abcdef").unwrap();

        let chunk = read_part(file.path(), 10, 6).await.unwrap();
        assert_eq!(chunk, b"abcdef");

        assert!(read_part(file.path(), 12, 10).await.is_err());
    }

    #[tokio::test]
    async fn test_upload_returns_configured_bucket() {
        let mut store = MockObjectStore::new();
        store.expect_exists().times(1).return_const(false);
        store
            .expect_put_file()
            .withf(|key, path| key.starts_with("faces/") && key.ends_with("-lake.jpg") && path.ends_with("lake.jpg"))
            .times(1)
            .returning(|_, _| Ok(stored(Transfer::SinglePart)));

        let uploader = S3Uploader::with_store(store, &test_config());
        let receipt = uploader.upload(Path::new("images/lake.jpg"), None).await.unwrap();

        assert_eq!(receipt.object.bucket, "test-bucket");
        assert!(receipt.object.key.ends_with("-lake.jpg"));
        assert_eq!(receipt.e_tag.as_deref(), Some("\"etag\""));
        assert_eq!(receipt.transfer, Transfer::SinglePart);
    }

    #[tokio::test]
    async fn test_upload_uses_explicit_folder() {
        let mut store = MockObjectStore::new();
        store.expect_exists().return_const(false);
        store
            .expect_put_file()
            .withf(|key, _| key.starts_with("other/"))
            .returning(|_, _| Ok(stored(Transfer::SinglePart)));

        let uploader = S3Uploader::with_store(store, &test_config());
        let receipt = uploader.upload(Path::new("run.png"), Some("other/")).await.unwrap();

        assert!(receipt.object.key.starts_with("other/"));
    }

    #[tokio::test]
    async fn test_upload_skips_existing_object() {
        let mut store = MockObjectStore::new();
        store.expect_exists().times(1).return_const(true);
        store.expect_put_file().never();

        let uploader = S3Uploader::with_store(store, &test_config());
        let receipt = uploader.upload(Path::new("lake.jpg"), None).await.unwrap();

        assert_eq!(receipt.transfer, Transfer::AlreadyExists);
        assert_eq!(receipt.object.bucket, "test-bucket");
        assert!(receipt.e_tag.is_none());
    }

    #[tokio::test]
    async fn test_upload_invalid_format_makes_no_calls() {
        let mut store = MockObjectStore::new();
        store.expect_exists().never();
        store.expect_put_file().never();

        let uploader = S3Uploader::with_store(store, &test_config());
        let result = uploader.upload(Path::new("notes.txt"), None).await;

        assert!(matches!(result, Err(StorageError::InvalidFormat { .. })));
    }

    #[tokio::test]
    async fn test_upload_propagates_store_error() {
        let mut store = MockObjectStore::new();
        store.expect_exists().return_const(false);
        store.expect_put_file().returning(|_, _| {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no such file",
            )))
        });

        let uploader = S3Uploader::with_store(store, &test_config());
        let result = uploader.upload(Path::new("missing.jpg"), None).await;

        assert!(matches!(result, Err(StorageError::Io(_))));
    }

    #[tokio::test]
    async fn test_upload_multiple_preserves_input_order() {
        // Earlier files finish last
        let store = DelayedStore {
            delays_ms: HashMap::from([
                ("a.jpg".to_string(), 60),
                ("b.png".to_string(), 30),
                ("c.jpeg".to_string(), 0),
            ]),
            failing: None,
        };

        let uploader = S3Uploader::with_store(store, &test_config());
        let paths = ["in/a.jpg", "in/b.png", "in/c.jpeg"];
        let receipts = uploader.upload_multiple(&paths, None).await.unwrap();

        assert_eq!(receipts.len(), 3);
        assert!(receipts[0].object.key.ends_with("-a.jpg"));
        assert!(receipts[1].object.key.ends_with("-b.png"));
        assert!(receipts[2].object.key.ends_with("-c.jpeg"));
        assert!(receipts.iter().all(|r| r.object.bucket == "test-bucket"));
    }

    #[tokio::test]
    async fn test_upload_multiple_fails_whole_batch() {
        let store = DelayedStore {
            delays_ms: HashMap::from([("slow.jpg".to_string(), 50)]),
            failing: Some("bad.jpg".to_string()),
        };

        let uploader = S3Uploader::with_store(store, &test_config());
        let paths = vec![
            PathBuf::from("ok.jpg"),
            PathBuf::from("bad.jpg"),
            PathBuf::from("slow.jpg"),
        ];
        let result = uploader.upload_multiple(&paths, None).await;

        assert!(matches!(result, Err(StorageError::Io(_))));
    }

    #[tokio::test]
    async fn test_upload_multiple_rejects_invalid_member() {
        let store = DelayedStore {
            delays_ms: HashMap::new(),
            failing: None,
        };

        let uploader = S3Uploader::with_store(store, &test_config());
        let result = uploader.upload_multiple(&["a.jpg", "b.bmp"], None).await;

        assert!(matches!(result, Err(StorageError::InvalidFormat { .. })));
    }

    #[tokio::test]
    async fn test_upload_multiple_empty() {
        let store = MockObjectStore::new();
        let uploader = S3Uploader::with_store(store, &test_config());
        let paths: Vec<PathBuf> = Vec::new();

        assert!(uploader.upload_multiple(&paths, None).await.unwrap().is_empty());
    }

    /// Store whose uploads only finish once `gate` sees every caller
    struct GatedStore {
        gate: tokio::sync::Barrier,
    }

    #[async_trait]
    impl ObjectStore for GatedStore {
        async fn exists(&self, _key: &str) -> bool {
            false
        }

        async fn put_file(&self, _key: &str, _path: &Path) -> Result<StoredObject, StorageError> {
            self.gate.wait().await;
            Ok(stored(Transfer::SinglePart))
        }
    }

    #[tokio::test]
    async fn test_upload_multiple_issues_every_upload_at_once() {
        let count = 11;
        let store = GatedStore {
            gate: tokio::sync::Barrier::new(count),
        };

        let uploader = S3Uploader::with_store(store, &test_config());
        let paths: Vec<PathBuf> = (0..count)
            .map(|i| PathBuf::from(format!("img-{}.jpg", i)))
            .collect();

        let receipts = tokio::time::timeout(
            Duration::from_secs(3),
            uploader.upload_multiple(&paths, None),
        )
        .await
        .expect("uploads were not all in flight together")
        .unwrap();

        assert_eq!(receipts.len(), count);
        assert!(receipts[10].object.key.ends_with("-img-10.jpg"));
    }

    #[tokio::test]
    async fn test_exists_delegates_to_store() {
        let mut store = MockObjectStore::new();
        store
            .expect_exists()
            .withf(|key| key == "definitely-absent-key")
            .return_const(false);

        let uploader = S3Uploader::with_store(store, &test_config());
        assert!(!uploader.exists("definitely-absent-key").await);
    }
}
