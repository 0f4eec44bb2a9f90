use async_trait::async_trait;

use crate::clients::gemini_client;
use crate::clients::gemini_client::{Content, Part};

#[async_trait]
pub trait GeminiClient: Send + Sync {
    async fn generate(
        &self,
        contents: Vec<Content>,
    ) -> Result<Vec<Part>, Box<dyn std::error::Error + Send + Sync>>;
}

pub struct GeminiService {
    api_key: String,
    model: String,
}

impl GeminiService {
    pub fn new(api_key: String, model: String) -> Self {
        Self { api_key, model }
    }

    async fn generate_internal(
        &self,
        contents: Vec<Content>,
    ) -> Result<Vec<Part>, Box<dyn std::error::Error + Send + Sync>> {
        gemini_client::generate_content(contents, &self.api_key, &self.model).await
    }
}

#[async_trait]
impl GeminiClient for GeminiService {
    async fn generate(
        &self,
        contents: Vec<Content>,
    ) -> Result<Vec<Part>, Box<dyn std::error::Error + Send + Sync>> {
        self.generate_internal(contents).await
    }
}
