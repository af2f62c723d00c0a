//! IAI Rekognition
//!
//! Thin client for uploading images to S3 and analyzing them with Amazon
//! Rekognition. Images are uploaded under a timestamped key, and the
//! returned object reference is fed straight into the analysis calls.
//!
//! ## Features
//!
//! - **S3 Uploads**: single or concurrent multi-file uploads that keep input
//!   order, multipart transfer for large files, optional canned ACL
//! - **Image Analysis**: labels, faces, face comparison, moderation labels
//! - **Face Collections**: create, delete, index, list and search faces
//!
//! ## Architecture
//!
//! ```text
//!  Local files            S3 Bucket               Rekognition
//! ┌──────────────┐       ┌──────────────┐        ┌──────────────┐
//! │ Facade       │──────▶│ {folder}/    │───────▶│ Labels/Faces │
//! │              │       │  {ts}-{name} │ S3 ref │ Collections  │
//! └──────────────┘       └──────────────┘        └──────────────┘
//!        │                      ▲                       ▲
//!        ▼                      │                       │
//! ┌──────────────┐              │                ┌──────────────┐
//! │ S3           │──────────────┘                │ Rekognition  │
//! │ Uploader     │                               │ Client       │
//! └──────────────┘                               └──────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use iai_rekognition::{Config, IaiRekognition};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), iai_rekognition::Error> {
//!     let config = Config::for_bucket("my-images").with_region("eu-west-1");
//!     let client = IaiRekognition::connect(&config).await?;
//!
//!     let labels = client.detect_labels_in_file(Path::new("run.jpg")).await?;
//!     for label in labels.labels() {
//!         println!("{:?} {:?}", label.name(), label.confidence());
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod facade;
pub mod image;
pub mod rekognition;
pub mod s3_uploader;
pub mod telemetry;

pub use config::{AwsConfig, Config, ConfigError, S3Config, ServiceConfig};
pub use error::{Error, Result};
pub use facade::{load_sdk_config, IaiRekognition, Uploaded};
pub use image::{ImagePaths, ImageSource, S3ObjectRef};
pub use rekognition::{
    AnalysisError, AnalysisRequest, AnalysisResponse, AnalysisService, RekognitionClient,
    RekognitionService,
};
pub use s3_uploader::{
    object_key, ObjectStore, S3Store, S3Uploader, StorageError, StoredObject, Transfer,
    UploadReceipt,
};
pub use telemetry::init_tracing;
