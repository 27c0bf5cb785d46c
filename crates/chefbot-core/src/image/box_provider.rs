//! BoxImageProvider -- object-safe dynamic dispatch wrapper for ImageProvider.
//!
//! 1. Define an object-safe `ImageProviderDyn` trait with boxed futures
//! 2. Blanket-impl `ImageProviderDyn` for all `T: ImageProvider`
//! 3. `BoxImageProvider` wraps `Box<dyn ImageProviderDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use chefbot_types::image::{GeneratedImage, ImageError, ImageRequest};

use super::provider::ImageProvider;

/// Object-safe version of [`ImageProvider`] with boxed futures.
pub trait ImageProviderDyn: Send + Sync {
    fn name(&self) -> &str;

    fn generate_boxed<'a>(
        &'a self,
        request: &'a ImageRequest,
    ) -> Pin<Box<dyn Future<Output = Result<GeneratedImage, ImageError>> + Send + 'a>>;
}

impl<T: ImageProvider> ImageProviderDyn for T {
    fn name(&self) -> &str {
        ImageProvider::name(self)
    }

    fn generate_boxed<'a>(
        &'a self,
        request: &'a ImageRequest,
    ) -> Pin<Box<dyn Future<Output = Result<GeneratedImage, ImageError>> + Send + 'a>> {
        Box::pin(self.generate(request))
    }
}

/// Type-erased image provider.
///
/// Since `ImageProvider` uses RPITIT, it cannot be used as a trait object
/// directly. `BoxImageProvider` provides equivalent methods that delegate to
/// the inner `ImageProviderDyn` trait object.
pub struct BoxImageProvider {
    inner: Box<dyn ImageProviderDyn + Send + Sync>,
}

impl BoxImageProvider {
    /// Wrap a concrete `ImageProvider` in a type-erased box.
    pub fn new<T: ImageProvider + 'static>(provider: T) -> Self {
        Self {
            inner: Box::new(provider),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Generate one image.
    pub async fn generate(&self, request: &ImageRequest) -> Result<GeneratedImage, ImageError> {
        self.inner.generate_boxed(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct FixedImage;

    impl ImageProvider for FixedImage {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn generate(&self, request: &ImageRequest) -> Result<GeneratedImage, ImageError> {
            Ok(GeneratedImage {
                path: PathBuf::from(format!("/tmp/{}.png", request.prompt)),
            })
        }
    }

    #[tokio::test]
    async fn boxed_provider_delegates() {
        let boxed = BoxImageProvider::new(FixedImage);
        assert_eq!(boxed.name(), "fixed");
        let image = boxed.generate(&ImageRequest::new("locro")).await.unwrap();
        assert_eq!(image.path, PathBuf::from("/tmp/locro.png"));
    }
}
