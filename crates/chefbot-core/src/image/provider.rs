//! ImageProvider trait definition.

use chefbot_types::image::{GeneratedImage, ImageError, ImageRequest};

/// Trait for image-generation backends (Stability AI, test fakes).
///
/// Uses native async fn in traits (RPITIT) for `generate`. Wrap an
/// implementation in [`super::box_provider::BoxImageProvider`] to share it
/// behind dynamic dispatch.
pub trait ImageProvider: Send + Sync {
    /// Human-readable provider name (e.g., "stability").
    fn name(&self) -> &str;

    /// Generate one image and store it on the local filesystem.
    ///
    /// The returned file belongs to the caller, who is responsible for
    /// deleting it.
    fn generate(
        &self,
        request: &ImageRequest,
    ) -> impl std::future::Future<Output = Result<GeneratedImage, ImageError>> + Send;
}
