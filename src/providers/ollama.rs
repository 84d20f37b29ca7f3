use serde::{Deserialize, Serialize};
use log::{debug, error};

use crate::config::ChatbotConfig;
use crate::request::{GenerationRequest, ModelDescriptor};

// ===== Discovery Types =====

#[derive(Debug, Clone, Deserialize)]
pub struct TagsResponse
{   pub models: Vec<TagEntry>
}

/// Only `name` is required; the server sends more
#[derive(Debug, Clone, Deserialize)]
pub struct TagEntry
{   pub name: String
}

impl TagsResponse
{   /// Names in server order; `None` when an entry has an empty name
    pub fn into_descriptors(self) -> Option<Vec<ModelDescriptor>>
    {   self.models
          .into_iter()
          .map(|m| {
            if m.name.is_empty()
            {   None
            } else
            {   Some(ModelDescriptor::new(m.name))
            }
          })
          .collect()
    }
}

// ===== Generation Types =====

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateOptions
{   pub temperature: f32
}

/// Body of the generation POST
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateBody
{   pub model: String
  , pub prompt: String
  , pub stream: bool
  , pub options: GenerateOptions
}

impl GenerateBody
{   /// `prompt` must already be wrapped
    pub fn new(
      request: &GenerationRequest
    , prompt: String
    , config: &ChatbotConfig
    ) -> Self
    {   GenerateBody
        {   model: request.model_name.clone()
          , prompt
          , stream: request.stream
          , options: GenerateOptions
            {   temperature: request.temperature
                  .unwrap_or(config.default_temperature)
            }
        }
    }
}

/// One line of a streamed generation body
#[derive(Debug, Clone, Deserialize)]
pub struct StreamChunk
{   #[serde(default)]
    pub response: String
  , #[serde(default)]
    pub done: bool
  , #[serde(default)]
    pub error: Option<String>
}

// ===== Transport =====

/// A client scoped to one call; dropping it releases its connections
pub fn scoped_client(
  config: &ChatbotConfig
) -> Result<reqwest::Client, crate::error::Error>
{   debug!("Building scoped client, ceiling {:?}", config.timeout());
    reqwest::Client::builder()
      .timeout(config.timeout())
      .build()
      .map_err(|e| {
        error!("Failed to build HTTP client: {}", e);
        crate::error::Error::http(e.to_string())
      })
}
