//! Client configuration.
//!
//! A single immutable [`Config`] value is built once (in code or via
//! [`Config::load`]) and handed to the client constructors. Nothing here is
//! process-global.

use aws_credential_types::Credentials;
use aws_sdk_s3::types::ObjectCannedAcl;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Smallest part size S3 accepts for every part except the last one.
pub const MIN_PART_SIZE_BYTES: usize = 5 * 1024 * 1024;

/// Errors that can occur during configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to load configuration: {0}")]
    LoadError(String),
}

/// Main configuration for the S3 + Rekognition client
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Service-level settings (logging)
    #[serde(default)]
    pub service: ServiceConfig,
    /// AWS credentials and region
    #[serde(default)]
    pub aws: AwsConfig,
    /// S3 upload configuration
    pub s3: S3Config,
}

/// Service-level configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// AWS credentials and region.
///
/// When both keys are absent the default AWS provider chain is used.
#[derive(Clone, Deserialize)]
pub struct AwsConfig {
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    #[serde(default = "default_region")]
    pub region: String,
}

/// S3 storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct S3Config {
    /// Bucket receiving uploaded images
    pub bucket: String,
    /// Key prefix used when no folder is passed to an upload
    #[serde(default = "default_folder")]
    pub folder: String,
    /// Canned ACL attached to uploaded objects (e.g. `public-read`)
    pub acl: Option<String>,
    /// Custom endpoint URL (for MinIO, LocalStack, etc.)
    pub endpoint_url: Option<String>,
    /// Force path-style access (required for MinIO)
    #[serde(default)]
    pub force_path_style: bool,
    /// Multipart upload threshold in bytes (10MB default)
    #[serde(default = "default_multipart_threshold")]
    pub multipart_threshold_bytes: usize,
    /// Part size for multipart uploads in bytes (10MB default)
    #[serde(default = "default_part_size")]
    pub part_size_bytes: usize,
    /// Parts of a single multipart upload sent in parallel
    #[serde(default = "default_part_concurrency")]
    pub part_concurrency: usize,
    /// Accepted file extensions, compared case-insensitively
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_folder() -> String {
    "rekognition-folder/".to_string()
}

fn default_multipart_threshold() -> usize {
    10 * 1024 * 1024 // 10MB
}

fn default_part_size() -> usize {
    10 * 1024 * 1024 // 10MB
}

fn default_part_concurrency() -> usize {
    10
}

fn default_allowed_extensions() -> Vec<String> {
    vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()]
}

impl Config {
    /// Configuration for `bucket` with every other setting at its default
    pub fn for_bucket(bucket: impl Into<String>) -> Self {
        Self {
            service: ServiceConfig::default(),
            aws: AwsConfig::default(),
            s3: S3Config::new(bucket),
        }
    }

    /// Use static credentials instead of the default provider chain
    pub fn with_credentials(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        self.aws.access_key_id = Some(access_key_id.into());
        self.aws.secret_access_key = Some(secret_access_key.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.aws.region = region.into();
        self
    }

    /// Load configuration from config files and environment
    pub fn load() -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            .set_default("service.log_level", "info")
            .map_err(|e| ConfigError::LoadError(e.to_string()))?
            // Add config file if present
            .add_source(config::File::with_name("config/rekognition").required(false))
            .add_source(config::File::with_name("/etc/iai-rekognition/config").required(false))
            // Override with environment variables
            // REKOGNITION__S3__BUCKET -> s3.bucket
            .add_source(
                config::Environment::with_prefix("REKOGNITION")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("s3.allowed_extensions")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ConfigError::LoadError(e.to_string()))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| ConfigError::LoadError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.s3.bucket.trim().is_empty() {
            return Err(ConfigError::MissingRequired("s3.bucket".to_string()));
        }

        if self.aws.region.trim().is_empty() {
            return Err(ConfigError::MissingRequired("aws.region".to_string()));
        }

        if self.aws.access_key_id.is_some() != self.aws.secret_access_key.is_some() {
            return Err(ConfigError::InvalidValue {
                key: "aws.secret_access_key".to_string(),
                message: "access key id and secret access key must be set together".to_string(),
            });
        }

        if let Some(acl) = &self.s3.acl {
            if !ObjectCannedAcl::values().contains(&acl.as_str()) {
                return Err(ConfigError::InvalidValue {
                    key: "s3.acl".to_string(),
                    message: format!("unknown canned ACL '{}'", acl),
                });
            }
        }

        if self.s3.part_concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                key: "s3.part_concurrency".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        if self.s3.part_size_bytes < MIN_PART_SIZE_BYTES {
            return Err(ConfigError::InvalidValue {
                key: "s3.part_size_bytes".to_string(),
                message: format!("must be at least {} bytes", MIN_PART_SIZE_BYTES),
            });
        }

        if self.s3.allowed_extensions.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "s3.allowed_extensions".to_string(),
                message: "at least one extension is required".to_string(),
            });
        }

        Ok(())
    }
}

impl AwsConfig {
    /// Static credentials, if both keys are configured
    pub fn static_credentials(&self) -> Option<Credentials> {
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(access_key_id), Some(secret_access_key)) => Some(Credentials::new(
                access_key_id,
                secret_access_key,
                None,
                None,
                "iai-rekognition",
            )),
            _ => None,
        }
    }
}

impl S3Config {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            folder: default_folder(),
            acl: None,
            endpoint_url: None,
            force_path_style: false,
            multipart_threshold_bytes: default_multipart_threshold(),
            part_size_bytes: default_part_size(),
            part_concurrency: default_part_concurrency(),
            allowed_extensions: default_allowed_extensions(),
        }
    }

    /// Parsed canned ACL for uploads
    pub fn canned_acl(&self) -> Option<ObjectCannedAcl> {
        self.acl.as_deref().map(ObjectCannedAcl::from)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            access_key_id: None,
            secret_access_key: None,
            region: default_region(),
        }
    }
}

impl fmt::Debug for AwsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsConfig")
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "<redacted>"),
            )
            .field("region", &self.region)
            .finish()
    }
}
