//! Rekognition analysis client.
//!
//! Every public operation builds an [`AnalysisRequest`] and passes it through
//! the single [`AnalysisService::invoke`] primitive. Responses are the SDK
//! output structs, returned unmodified; remote errors are never retried.

use crate::image::ImageSource;
use async_trait::async_trait;
use aws_sdk_rekognition::operation::compare_faces::CompareFacesOutput;
use aws_sdk_rekognition::operation::create_collection::CreateCollectionOutput;
use aws_sdk_rekognition::operation::delete_collection::DeleteCollectionOutput;
use aws_sdk_rekognition::operation::detect_faces::DetectFacesOutput;
use aws_sdk_rekognition::operation::detect_labels::DetectLabelsOutput;
use aws_sdk_rekognition::operation::detect_moderation_labels::DetectModerationLabelsOutput;
use aws_sdk_rekognition::operation::index_faces::IndexFacesOutput;
use aws_sdk_rekognition::operation::list_collections::ListCollectionsOutput;
use aws_sdk_rekognition::operation::list_faces::ListFacesOutput;
use aws_sdk_rekognition::operation::search_faces::SearchFacesOutput;
use aws_sdk_rekognition::operation::search_faces_by_image::SearchFacesByImageOutput;
use aws_sdk_rekognition::Client as RekognitionSdkClient;
use aws_types::SdkConfig;
use thiserror::Error;
use tracing::{debug, info, instrument};

#[cfg(test)]
use mockall::automock;

/// Labels returned by `detect_labels`
pub const MAX_LABELS: i32 = 123;
/// Upper bound for `list_faces`, `list_collections` and face searches
pub const MAX_RESULTS: i32 = 4096;
pub const DEFAULT_MIN_CONFIDENCE: f32 = 50.0;
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 90.0;
pub const DEFAULT_FACE_MATCH_THRESHOLD: f32 = 90.0;

/// Errors that can occur during analysis calls
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Service(#[from] aws_sdk_rekognition::Error),

    #[error("Unexpected {received} response to {operation}")]
    UnexpectedResponse {
        operation: &'static str,
        received: &'static str,
    },
}

/// Parameters of one remote Rekognition operation
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisRequest {
    DetectLabels {
        image: ImageSource,
        max_labels: i32,
        min_confidence: f32,
    },
    DetectFaces {
        image: ImageSource,
    },
    CompareFaces {
        source: ImageSource,
        target: ImageSource,
        similarity_threshold: f32,
    },
    DetectModerationLabels {
        image: ImageSource,
        min_confidence: f32,
    },
    CreateCollection {
        collection_id: String,
    },
    DeleteCollection {
        collection_id: String,
    },
    ListCollections {
        max_results: i32,
    },
    IndexFaces {
        collection_id: String,
        image: ImageSource,
    },
    ListFaces {
        collection_id: String,
        max_results: i32,
    },
    SearchFaces {
        collection_id: String,
        face_id: String,
        face_match_threshold: f32,
        max_faces: i32,
    },
    SearchFacesByImage {
        collection_id: String,
        image: ImageSource,
        face_match_threshold: f32,
        max_faces: i32,
    },
}

impl AnalysisRequest {
    /// Remote operation name
    pub fn operation_name(&self) -> &'static str {
        match self {
            AnalysisRequest::DetectLabels { .. } => "detectLabels",
            AnalysisRequest::DetectFaces { .. } => "detectFaces",
            AnalysisRequest::CompareFaces { .. } => "compareFaces",
            AnalysisRequest::DetectModerationLabels { .. } => "detectModerationLabels",
            AnalysisRequest::CreateCollection { .. } => "createCollection",
            AnalysisRequest::DeleteCollection { .. } => "deleteCollection",
            AnalysisRequest::ListCollections { .. } => "listCollections",
            AnalysisRequest::IndexFaces { .. } => "indexFaces",
            AnalysisRequest::ListFaces { .. } => "listFaces",
            AnalysisRequest::SearchFaces { .. } => "searchFaces",
            AnalysisRequest::SearchFacesByImage { .. } => "searchFacesByImage",
        }
    }
}

/// Raw SDK output of one remote operation
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisResponse {
    DetectLabels(DetectLabelsOutput),
    DetectFaces(DetectFacesOutput),
    CompareFaces(CompareFacesOutput),
    DetectModerationLabels(DetectModerationLabelsOutput),
    CreateCollection(CreateCollectionOutput),
    DeleteCollection(DeleteCollectionOutput),
    ListCollections(ListCollectionsOutput),
    IndexFaces(IndexFacesOutput),
    ListFaces(ListFacesOutput),
    SearchFaces(SearchFacesOutput),
    SearchFacesByImage(SearchFacesByImageOutput),
}

impl AnalysisResponse {
    pub fn operation_name(&self) -> &'static str {
        match self {
            AnalysisResponse::DetectLabels(_) => "detectLabels",
            AnalysisResponse::DetectFaces(_) => "detectFaces",
            AnalysisResponse::CompareFaces(_) => "compareFaces",
            AnalysisResponse::DetectModerationLabels(_) => "detectModerationLabels",
            AnalysisResponse::CreateCollection(_) => "createCollection",
            AnalysisResponse::DeleteCollection(_) => "deleteCollection",
            AnalysisResponse::ListCollections(_) => "listCollections",
            AnalysisResponse::IndexFaces(_) => "indexFaces",
            AnalysisResponse::ListFaces(_) => "listFaces",
            AnalysisResponse::SearchFaces(_) => "searchFaces",
            AnalysisResponse::SearchFacesByImage(_) => "searchFacesByImage",
        }
    }
}

/// Remote image-analysis service
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Forward `request` to the service and return its raw response
    async fn invoke(&self, request: AnalysisRequest) -> Result<AnalysisResponse, AnalysisError>;
}

/// `AnalysisService` backed by the AWS Rekognition SDK
#[derive(Clone)]
pub struct RekognitionService {
    client: RekognitionSdkClient,
}

impl RekognitionService {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self::from_client(RekognitionSdkClient::new(sdk_config))
    }

    pub fn from_client(client: RekognitionSdkClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AnalysisService for RekognitionService {
    #[instrument(skip_all, fields(operation = request.operation_name()))]
    async fn invoke(&self, request: AnalysisRequest) -> Result<AnalysisResponse, AnalysisError> {
        use aws_sdk_rekognition::Error as SdkError;

        let response = match request {
            AnalysisRequest::DetectLabels {
                image,
                max_labels,
                min_confidence,
            } => AnalysisResponse::DetectLabels(
                self.client
                    .detect_labels()
                    .image(image.into())
                    .max_labels(max_labels)
                    .min_confidence(min_confidence)
                    .send()
                    .await
                    .map_err(SdkError::from)?,
            ),
            AnalysisRequest::DetectFaces { image } => AnalysisResponse::DetectFaces(
                self.client
                    .detect_faces()
                    .image(image.into())
                    .send()
                    .await
                    .map_err(SdkError::from)?,
            ),
            AnalysisRequest::CompareFaces {
                source,
                target,
                similarity_threshold,
            } => AnalysisResponse::CompareFaces(
                self.client
                    .compare_faces()
                    .source_image(source.into())
                    .target_image(target.into())
                    .similarity_threshold(similarity_threshold)
                    .send()
                    .await
                    .map_err(SdkError::from)?,
            ),
            AnalysisRequest::DetectModerationLabels {
                image,
                min_confidence,
            } => AnalysisResponse::DetectModerationLabels(
                self.client
                    .detect_moderation_labels()
                    .image(image.into())
                    .min_confidence(min_confidence)
                    .send()
                    .await
                    .map_err(SdkError::from)?,
            ),
            AnalysisRequest::CreateCollection { collection_id } => {
                AnalysisResponse::CreateCollection(
                    self.client
                        .create_collection()
                        .collection_id(collection_id)
                        .send()
                        .await
                        .map_err(SdkError::from)?,
                )
            }
            AnalysisRequest::DeleteCollection { collection_id } => {
                AnalysisResponse::DeleteCollection(
                    self.client
                        .delete_collection()
                        .collection_id(collection_id)
                        .send()
                        .await
                        .map_err(SdkError::from)?,
                )
            }
            AnalysisRequest::ListCollections { max_results } => AnalysisResponse::ListCollections(
                self.client
                    .list_collections()
                    .max_results(max_results)
                    .send()
                    .await
                    .map_err(SdkError::from)?,
            ),
            AnalysisRequest::IndexFaces {
                collection_id,
                image,
            } => AnalysisResponse::IndexFaces(
                self.client
                    .index_faces()
                    .collection_id(collection_id)
                    .image(image.into())
                    .send()
                    .await
                    .map_err(SdkError::from)?,
            ),
            AnalysisRequest::ListFaces {
                collection_id,
                max_results,
            } => AnalysisResponse::ListFaces(
                self.client
                    .list_faces()
                    .collection_id(collection_id)
                    .max_results(max_results)
                    .send()
                    .await
                    .map_err(SdkError::from)?,
            ),
            AnalysisRequest::SearchFaces {
                collection_id,
                face_id,
                face_match_threshold,
                max_faces,
            } => AnalysisResponse::SearchFaces(
                self.client
                    .search_faces()
                    .collection_id(collection_id)
                    .face_id(face_id)
                    .face_match_threshold(face_match_threshold)
                    .max_faces(max_faces)
                    .send()
                    .await
                    .map_err(SdkError::from)?,
            ),
            AnalysisRequest::SearchFacesByImage {
                collection_id,
                image,
                face_match_threshold,
                max_faces,
            } => AnalysisResponse::SearchFacesByImage(
                self.client
                    .search_faces_by_image()
                    .collection_id(collection_id)
                    .image(image.into())
                    .face_match_threshold(face_match_threshold)
                    .max_faces(max_faces)
                    .send()
                    .await
                    .map_err(SdkError::from)?,
            ),
        };

        debug!("Rekognition call completed");
        Ok(response)
    }
}

/// Typed front end over an [`AnalysisService`]
pub struct RekognitionClient<A = RekognitionService> {
    service: A,
}

impl RekognitionClient<RekognitionService> {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        info!("Rekognition client initialized");
        Self::with_service(RekognitionService::new(sdk_config))
    }
}

impl<A: AnalysisService> RekognitionClient<A> {
    pub fn with_service(service: A) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &A {
        &self.service
    }

    /// Detects instances of real-world labels within an image
    pub async fn detect_labels(
        &self,
        image: impl Into<ImageSource>,
        min_confidence: Option<f32>,
    ) -> Result<DetectLabelsOutput, AnalysisError> {
        let request = AnalysisRequest::DetectLabels {
            image: image.into(),
            max_labels: MAX_LABELS,
            min_confidence: min_confidence.unwrap_or(DEFAULT_MIN_CONFIDENCE),
        };

        match self.service.invoke(request).await? {
            AnalysisResponse::DetectLabels(output) => Ok(output),
            other => Err(unexpected("detectLabels", &other)),
        }
    }

    /// Detects faces within an image
    pub async fn detect_faces(
        &self,
        image: impl Into<ImageSource>,
    ) -> Result<DetectFacesOutput, AnalysisError> {
        let request = AnalysisRequest::DetectFaces {
            image: image.into(),
        };

        match self.service.invoke(request).await? {
            AnalysisResponse::DetectFaces(output) => Ok(output),
            other => Err(unexpected("detectFaces", &other)),
        }
    }

    /// Compares the largest face in `source` with every face in `target`
    pub async fn compare_faces(
        &self,
        source: impl Into<ImageSource>,
        target: impl Into<ImageSource>,
        similarity_threshold: Option<f32>,
    ) -> Result<CompareFacesOutput, AnalysisError> {
        let request = AnalysisRequest::CompareFaces {
            source: source.into(),
            target: target.into(),
            similarity_threshold: similarity_threshold.unwrap_or(DEFAULT_SIMILARITY_THRESHOLD),
        };

        match self.service.invoke(request).await? {
            AnalysisResponse::CompareFaces(output) => Ok(output),
            other => Err(unexpected("compareFaces", &other)),
        }
    }

    /// Detects explicit or suggestive adult content
    pub async fn detect_moderation_labels(
        &self,
        image: impl Into<ImageSource>,
        min_confidence: Option<f32>,
    ) -> Result<DetectModerationLabelsOutput, AnalysisError> {
        let request = AnalysisRequest::DetectModerationLabels {
            image: image.into(),
            min_confidence: min_confidence.unwrap_or(DEFAULT_MIN_CONFIDENCE),
        };

        match self.service.invoke(request).await? {
            AnalysisResponse::DetectModerationLabels(output) => Ok(output),
            other => Err(unexpected("detectModerationLabels", &other)),
        }
    }

    pub async fn create_collection(
        &self,
        collection_id: &str,
    ) -> Result<CreateCollectionOutput, AnalysisError> {
        let request = AnalysisRequest::CreateCollection {
            collection_id: collection_id.to_string(),
        };

        match self.service.invoke(request).await? {
            AnalysisResponse::CreateCollection(output) => Ok(output),
            other => Err(unexpected("createCollection", &other)),
        }
    }

    pub async fn delete_collection(
        &self,
        collection_id: &str,
    ) -> Result<DeleteCollectionOutput, AnalysisError> {
        let request = AnalysisRequest::DeleteCollection {
            collection_id: collection_id.to_string(),
        };

        match self.service.invoke(request).await? {
            AnalysisResponse::DeleteCollection(output) => Ok(output),
            other => Err(unexpected("deleteCollection", &other)),
        }
    }

    pub async fn list_collections(&self) -> Result<ListCollectionsOutput, AnalysisError> {
        let request = AnalysisRequest::ListCollections {
            max_results: MAX_RESULTS,
        };

        match self.service.invoke(request).await? {
            AnalysisResponse::ListCollections(output) => Ok(output),
            other => Err(unexpected("listCollections", &other)),
        }
    }

    /// Detects faces in the image and adds them to the collection
    pub async fn index_faces(
        &self,
        collection_id: &str,
        image: impl Into<ImageSource>,
    ) -> Result<IndexFacesOutput, AnalysisError> {
        let request = AnalysisRequest::IndexFaces {
            collection_id: collection_id.to_string(),
            image: image.into(),
        };

        match self.service.invoke(request).await? {
            AnalysisResponse::IndexFaces(output) => Ok(output),
            other => Err(unexpected("indexFaces", &other)),
        }
    }

    /// Metadata of the faces indexed in the collection
    pub async fn list_faces(&self, collection_id: &str) -> Result<ListFacesOutput, AnalysisError> {
        let request = AnalysisRequest::ListFaces {
            collection_id: collection_id.to_string(),
            max_results: MAX_RESULTS,
        };

        match self.service.invoke(request).await? {
            AnalysisResponse::ListFaces(output) => Ok(output),
            other => Err(unexpected("listFaces", &other)),
        }
    }

    /// Searches the collection for faces matching an indexed face
    pub async fn search_faces_by_face_id(
        &self,
        collection_id: &str,
        face_id: &str,
        face_match_threshold: Option<f32>,
    ) -> Result<SearchFacesOutput, AnalysisError> {
        let request = AnalysisRequest::SearchFaces {
            collection_id: collection_id.to_string(),
            face_id: face_id.to_string(),
            face_match_threshold: face_match_threshold.unwrap_or(DEFAULT_FACE_MATCH_THRESHOLD),
            max_faces: MAX_RESULTS,
        };

        match self.service.invoke(request).await? {
            AnalysisResponse::SearchFaces(output) => Ok(output),
            other => Err(unexpected("searchFaces", &other)),
        }
    }

    /// Detects the largest face in the image, then searches the collection for it
    pub async fn search_faces_by_image(
        &self,
        collection_id: &str,
        image: impl Into<ImageSource>,
        face_match_threshold: Option<f32>,
    ) -> Result<SearchFacesByImageOutput, AnalysisError> {
        let request = AnalysisRequest::SearchFacesByImage {
            collection_id: collection_id.to_string(),
            image: image.into(),
            face_match_threshold: face_match_threshold.unwrap_or(DEFAULT_FACE_MATCH_THRESHOLD),
            max_faces: MAX_RESULTS,
        };

        match self.service.invoke(request).await? {
            AnalysisResponse::SearchFacesByImage(output) => Ok(output),
            other => Err(unexpected("searchFacesByImage", &other)),
        }
    }
}

fn unexpected(operation: &'static str, response: &AnalysisResponse) -> AnalysisError {
    AnalysisError::UnexpectedResponse {
        operation,
        received: response.operation_name(),
    }
}
