//! Configuration for the inference server endpoints and request limits

use std::time::Duration;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_TAGS_PATH: &str = "/api/tags";
pub const DEFAULT_GENERATE_PATH: &str = "/api/generate";

/// 2000 seconds: a safety ceiling, not a tuning knob
pub const DEFAULT_TIMEOUT_MS: u64 = 2_000_000;
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Where the inference server lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig
{   /// Scheme, host and port, no trailing slash
    pub base_url: String
  , /// Discovery path
    pub tags_path: String
  , /// Generation path
    pub generate_path: String
}

impl EndpointConfig
{   pub fn tags_url(&self) -> String
    {   join_url(&self.base_url, &self.tags_path)
    }

    pub fn generate_url(&self) -> String
    {   join_url(&self.base_url, &self.generate_path)
    }
}

impl Default for EndpointConfig
{   fn default() -> Self
    {   EndpointConfig
        {   base_url: DEFAULT_BASE_URL.to_string()
          , tags_path: DEFAULT_TAGS_PATH.to_string()
          , generate_path: DEFAULT_GENERATE_PATH.to_string()
        }
    }
}

/// Chatbot configuration, handed to every component at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatbotConfig
{   /// Inference server endpoints
    pub endpoint: EndpointConfig
  , /// Upper bound on one exchange, in milliseconds
    pub timeout_ms: u64
  , /// Used when a request leaves temperature unset
    pub default_temperature: f32
}

impl ChatbotConfig
{   /// Point both endpoints at another server
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self
    {   self.endpoint.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self
    {   self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn timeout(&self) -> Duration
    {   Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ChatbotConfig
{   fn default() -> Self
    {   ChatbotConfig
        {   endpoint: EndpointConfig::default()
          , timeout_ms: DEFAULT_TIMEOUT_MS
          , default_temperature: DEFAULT_TEMPERATURE
        }
    }
}

fn join_url(base: &str, path: &str) -> String
{   format!(
      "{}/{}",
      base.trim_end_matches('/'),
      path.trim_start_matches('/')
    )
}
