//! Image descriptors shared by the uploader and the analysis client.

use aws_sdk_rekognition::primitives::Blob;
use aws_sdk_rekognition::types::{Image, S3Object};
use std::fmt;
use std::path::PathBuf;

/// Bucket + key pair identifying a stored object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct S3ObjectRef {
    pub bucket: String,
    pub key: String,
}

impl S3ObjectRef {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for S3ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

/// Image handed to an analysis operation
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// Object previously uploaded to S3
    S3(S3ObjectRef),
    /// Raw image bytes (JPEG or PNG)
    Bytes(Vec<u8>),
}

impl From<S3ObjectRef> for ImageSource {
    fn from(object: S3ObjectRef) -> Self {
        ImageSource::S3(object)
    }
}

impl From<&S3ObjectRef> for ImageSource {
    fn from(object: &S3ObjectRef) -> Self {
        ImageSource::S3(object.clone())
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        ImageSource::Bytes(bytes)
    }
}

impl From<ImageSource> for Image {
    fn from(source: ImageSource) -> Self {
        match source {
            ImageSource::S3(object) => Image::builder()
                .s3_object(
                    S3Object::builder()
                        .bucket(object.bucket)
                        .name(object.key)
                        .build(),
                )
                .build(),
            ImageSource::Bytes(bytes) => Image::builder().bytes(Blob::new(bytes)).build(),
        }
    }
}

/// One local image or a batch of them
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagePaths {
    Single(PathBuf),
    Multiple(Vec<PathBuf>),
}

impl From<PathBuf> for ImagePaths {
    fn from(path: PathBuf) -> Self {
        ImagePaths::Single(path)
    }
}

impl From<&str> for ImagePaths {
    fn from(path: &str) -> Self {
        ImagePaths::Single(PathBuf::from(path))
    }
}

impl From<Vec<PathBuf>> for ImagePaths {
    fn from(paths: Vec<PathBuf>) -> Self {
        ImagePaths::Multiple(paths)
    }
}
