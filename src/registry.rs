//! Model discovery against the inference server

use log::{debug, trace, error};

use crate::config::ChatbotConfig;
use crate::error::Error;
use crate::providers::ollama::{scoped_client, TagsResponse};
use crate::request::ModelDescriptor;

/// Lists the models the server currently has loaded.
/// Holds no state besides its configuration; every call re-queries.
#[derive(Debug, Clone)]
pub struct ModelRegistry
{   config: ChatbotConfig
}

impl ModelRegistry
{   pub fn new(config: ChatbotConfig) -> Self
    {   debug!("Creating ModelRegistry for {}", config.endpoint.base_url);
        ModelRegistry { config }
    }

    /// Names in the order the server returns them.
    /// Any failure is a `DiscoveryError`; no partial lists.
    pub async fn list_models(&self)
      -> Result<Vec<ModelDescriptor>, Error>
    {   let url = self.config.endpoint.tags_url();
        debug!("Handling list_models: GET {}", url);

        let client = scoped_client(&self.config)
          .map_err(|e| Error::discovery(e.message))?;

        let response = client
          .get(&url)
          .send()
          .await
          .map_err(|e| {
            error!("Failed to fetch models: {}", e);
            Error::discovery(format!("Failed to reach {}: {}", url, e))
          })?;

        let status = response.status();
        trace!("Tags response status: {}", status);

        if status != reqwest::StatusCode::OK
        {   let error_text = response.text().await
              .unwrap_or_else(|_|
                "Unknown error".to_string()
              );
            error!("Failed to get models: {} {}", status, error_text);
            return Err(Error::discovery(format!(
              "Discovery returned status {}: {}",
              status.as_u16(), error_text
            )));
        }

        let body = response.text().await
          .map_err(|e| {
            error!("Failed to read tags body: {}", e);
            Error::discovery(format!("Failed to read body: {}", e))
          })?;
        trace!("Tags body: {}", body);

        let tags: TagsResponse = serde_json::from_str(&body)
          .map_err(|e| {
            error!("Parse error: {}", e);
            Error::discovery(format!("Malformed model list: {}", e))
          })?;

        let models = tags.into_descriptors()
          .ok_or_else(|| {
            error!("Model entry with empty name");
            Error::discovery("Model entry with empty name")
          })?;

        debug!("Retrieved {} models", models.len());
        Ok(models)
    }
}
