//! Request and result types shared by the registry, gateway and backend

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, ErrorKind};

/// One model reported by the inference server
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelDescriptor
{   pub name: String
}

impl ModelDescriptor
{   pub fn new(name: impl Into<String>) -> Self
    {   ModelDescriptor { name: name.into() }
    }
}

/// A single prompt for a single model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest
{   /// Must name a loaded model; the server rejects unknown names
    pub model_name: String
  , /// Caller text, wrapped in the instruction template before sending
    pub prompt: String
  , /// Ask the server for incremental chunks
    pub stream: bool
  , /// Sampling temperature; config default when unset
    pub temperature: Option<f32>
}

impl GenerationRequest
{   pub fn new(
      model_name: impl Into<String>
    , prompt: impl Into<String>
    ) -> Self
    {   GenerationRequest
        {   model_name: model_name.into()
          , prompt: prompt.into()
          , stream: false
          , temperature: None
        }
    }

    pub fn with_stream(mut self, stream: bool) -> Self
    {   self.stream = stream;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self
    {   self.temperature = Some(temperature);
        self
    }
}

/// Outcome of exactly one generation request.
///
/// `raw` is the server's JSON body untouched; `text` is a convenience
/// copy of its `response` field (empty when the field is absent).
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationResult
{   Success
    {   text: String
      , raw: Value
    }
  , Failure
    {   kind: ErrorKind
      , message: String
    }
}

impl GenerationResult
{   pub fn success(raw: Value) -> Self
    {   let text = raw.get("response")
          .and_then(Value::as_str)
          .unwrap_or_default()
          .to_string();
        GenerationResult::Success { text, raw }
    }

    pub fn is_success(&self) -> bool
    {   matches!(self, GenerationResult::Success { .. })
    }

    pub fn text(&self) -> Option<&str>
    {   match self
        {   GenerationResult::Success { text, .. } => Some(text)
          , GenerationResult::Failure { .. } => None
        }
    }

    pub fn raw(&self) -> Option<&Value>
    {   match self
        {   GenerationResult::Success { raw, .. } => Some(raw)
          , GenerationResult::Failure { .. } => None
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind>
    {   match self
        {   GenerationResult::Success { .. } => None
          , GenerationResult::Failure { kind, .. } => Some(*kind)
        }
    }

    /// Success text or failure message, whichever is present
    pub fn message(&self) -> &str
    {   match self
        {   GenerationResult::Success { text, .. } => text
          , GenerationResult::Failure { message, .. } => message
        }
    }
}

impl From<Error> for GenerationResult
{   fn from(e: Error) -> Self
    {   GenerationResult::Failure
        {   kind: e.kind
          , message: e.message
        }
    }
}

impl From<Result<Value, Error>> for GenerationResult
{   fn from(result: Result<Value, Error>) -> Self
    {   match result
        {   Ok(raw) => GenerationResult::success(raw)
          , Err(e) => e.into()
        }
    }
}
