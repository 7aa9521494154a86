mod google;
pub mod prompts;

use async_trait::async_trait;

use crate::error::Result;

pub use google::GeminiClient;

/// A hosted model that answers a single prompt
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send `prompt` to `model` and return the text of its reply
    ///
    /// Failures are reported as [`crate::error::Error::ExternalService`].
    async fn invoke(&self, prompt: &str, model: &str) -> Result<String>;

    /// Get the provider name
    fn name(&self) -> &'static str;
}
