//! Upload-then-analyze facade.

use crate::config::Config;
use crate::error::Result;
use crate::image::{ImagePaths, ImageSource, S3ObjectRef};
use crate::rekognition::{AnalysisService, RekognitionClient, RekognitionService};
use crate::s3_uploader::{ObjectStore, S3Store, S3Uploader, UploadReceipt};
use aws_config::BehaviorVersion;
use aws_sdk_rekognition::operation::compare_faces::CompareFacesOutput;
use aws_sdk_rekognition::operation::detect_faces::DetectFacesOutput;
use aws_sdk_rekognition::operation::detect_labels::DetectLabelsOutput;
use aws_sdk_rekognition::operation::detect_moderation_labels::DetectModerationLabelsOutput;
use aws_sdk_rekognition::operation::index_faces::IndexFacesOutput;
use aws_sdk_rekognition::operation::search_faces_by_image::SearchFacesByImageOutput;
use aws_types::SdkConfig;
use std::path::Path;
use tracing::{info, instrument};

/// Result of [`IaiRekognition::upload_to_s3`], shaped like its input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Uploaded {
    Single(UploadReceipt),
    Multiple(Vec<UploadReceipt>),
}

impl Uploaded {
    /// Uploaded objects in input order
    pub fn objects(&self) -> Vec<&S3ObjectRef> {
        match self {
            Uploaded::Single(receipt) => vec![&receipt.object],
            Uploaded::Multiple(receipts) => receipts.iter().map(|r| &r.object).collect(),
        }
    }
}

/// S3 uploads composed with Rekognition analysis
pub struct IaiRekognition<S = S3Store, A = RekognitionService> {
    uploader: S3Uploader<S>,
    analyzer: RekognitionClient<A>,
}

impl IaiRekognition {
    /// Build both AWS clients from one validated configuration
    pub async fn connect(config: &Config) -> Result<Self> {
        config.validate()?;

        let sdk_config = load_sdk_config(config).await;
        let client = Self::from_parts(
            S3Uploader::new(&sdk_config, &config.s3),
            RekognitionClient::new(&sdk_config),
        );

        info!(
            region = %config.aws.region,
            bucket = %config.s3.bucket,
            "IAI Rekognition client ready"
        );

        Ok(client)
    }
}

impl<S: ObjectStore, A: AnalysisService> IaiRekognition<S, A> {
    pub fn from_parts(uploader: S3Uploader<S>, analyzer: RekognitionClient<A>) -> Self {
        Self { uploader, analyzer }
    }

    pub fn uploader(&self) -> &S3Uploader<S> {
        &self.uploader
    }

    pub fn analyzer(&self) -> &RekognitionClient<A> {
        &self.analyzer
    }

    /// Upload one image or a batch of images into `folder`
    pub async fn upload_to_s3(
        &self,
        image_paths: impl Into<ImagePaths>,
        folder: Option<&str>,
    ) -> Result<Uploaded> {
        let uploaded = match image_paths.into() {
            ImagePaths::Single(path) => Uploaded::Single(self.uploader.upload(&path, folder).await?),
            ImagePaths::Multiple(paths) => {
                Uploaded::Multiple(self.uploader.upload_multiple(&paths, folder).await?)
            }
        };
        Ok(uploaded)
    }

    /// Detects instances of real-world labels within an uploaded image
    pub async fn detect_labels(&self, object: &S3ObjectRef) -> Result<DetectLabelsOutput> {
        Ok(self.analyzer.detect_labels(object, None).await?)
    }

    /// Detects faces within an uploaded image
    pub async fn detect_faces(&self, object: &S3ObjectRef) -> Result<DetectFacesOutput> {
        Ok(self.analyzer.detect_faces(object).await?)
    }

    /// Compares the face in `source` with each face detected in `target`
    pub async fn compare_faces(
        &self,
        source: &S3ObjectRef,
        target: &S3ObjectRef,
        similarity_threshold: Option<f32>,
    ) -> Result<CompareFacesOutput> {
        Ok(self
            .analyzer
            .compare_faces(source, target, similarity_threshold)
            .await?)
    }

    /// Detects explicit or suggestive adult content in an uploaded image
    pub async fn detect_moderation_labels(
        &self,
        object: &S3ObjectRef,
        min_confidence: Option<f32>,
    ) -> Result<DetectModerationLabelsOutput> {
        Ok(self
            .analyzer
            .detect_moderation_labels(object, min_confidence)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn detect_labels_in_file(&self, path: &Path) -> Result<DetectLabelsOutput> {
        let receipt = self.uploader.upload(path, None).await?;
        self.detect_labels(&receipt.object).await
    }

    #[instrument(skip(self))]
    pub async fn detect_faces_in_file(&self, path: &Path) -> Result<DetectFacesOutput> {
        let receipt = self.uploader.upload(path, None).await?;
        self.detect_faces(&receipt.object).await
    }

    #[instrument(skip(self))]
    pub async fn detect_moderation_labels_in_file(
        &self,
        path: &Path,
        min_confidence: Option<f32>,
    ) -> Result<DetectModerationLabelsOutput> {
        let receipt = self.uploader.upload(path, None).await?;
        self.detect_moderation_labels(&receipt.object, min_confidence)
            .await
    }

    /// Upload both images concurrently, then compare them
    #[instrument(skip(self))]
    pub async fn compare_face_files(
        &self,
        source: &Path,
        target: &Path,
        similarity_threshold: Option<f32>,
    ) -> Result<CompareFacesOutput> {
        let receipts = self.uploader.upload_multiple(&[source, target], None).await?;
        let (source, target) = (&receipts[0].object, &receipts[1].object);

        self.compare_faces(source, target, similarity_threshold)
            .await
    }

    /// Upload an image and index its faces into `collection_id`
    #[instrument(skip(self))]
    pub async fn index_faces_from_file(
        &self,
        collection_id: &str,
        path: &Path,
    ) -> Result<IndexFacesOutput> {
        let receipt = self.uploader.upload(path, None).await?;
        Ok(self
            .analyzer
            .index_faces(collection_id, ImageSource::S3(receipt.object))
            .await?)
    }

    /// Upload an image and search `collection_id` for its largest face
    #[instrument(skip(self))]
    pub async fn search_faces_by_image_file(
        &self,
        collection_id: &str,
        path: &Path,
        face_match_threshold: Option<f32>,
    ) -> Result<SearchFacesByImageOutput> {
        let receipt = self.uploader.upload(path, None).await?;
        Ok(self
            .analyzer
            .search_faces_by_image(
                collection_id,
                ImageSource::S3(receipt.object),
                face_match_threshold,
            )
            .await?)
    }
}

/// Load the shared AWS SDK configuration
pub async fn load_sdk_config(config: &Config) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(aws_config::Region::new(config.aws.region.clone()));

    if let Some(credentials) = config.aws.static_credentials() {
        loader = loader.credentials_provider(credentials);
    }

    loader.load().await
}
