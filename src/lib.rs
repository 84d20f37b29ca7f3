pub mod error;
pub mod config;
pub mod prompt;
pub mod providers;
pub mod request;
pub mod registry;
pub mod gateway;
pub mod client;

pub use client::ChatbotBackend;
pub use config::{ChatbotConfig, EndpointConfig};
pub use error::{Error, ErrorKind};
pub use gateway::{FragmentStream, GenerationGateway};
pub use registry::ModelRegistry;
pub use request::{GenerationRequest, GenerationResult, ModelDescriptor};

/*

async client for a locally running inference server (Ollama style
/api/tags + /api/generate). two operations for whatever UI sits on
top: list the loaded models, and ask one model one question.

ollama-chatbot/
├── Cargo.toml
├── src/
│   ├── lib.rs          # Re-exports and backend channel types
│   ├── error.rs        # ErrorKind + cloneable Error
│   ├── config.rs       # Endpoints, timeout ceiling, default temperature
│   ├── prompt.rs       # Versioned instruction template
│   ├── request.rs      # GenerationRequest / GenerationResult
│   ├── providers/
│   │   ├── mod.rs
│   │   └── ollama.rs   # Wire types + scoped HTTP client
│   ├── registry.rs     # ModelRegistry (discovery)
│   ├── gateway.rs      # GenerationGateway (one-shot + stream)
│   ├── client.rs       # ChatbotBackend task front-end
│   └── main.rs         # Ask-once binary
└── tests/

*/

/// CHATBOT BACKEND INTERFACE:

// ===== ListModels =====

pub type ListModelsReply
  = Result<Vec<crate::ModelDescriptor>, crate::error::Error>;
pub type ListModelsReplySender
  = tokio::sync::mpsc::UnboundedSender<ListModelsReply>;

pub struct ListModelsArgs
{   pub reply: ListModelsReplySender
}

// ===== Generate =====

pub type GenerateReply = crate::GenerationResult;
pub type GenerateReplySender
  = tokio::sync::mpsc::UnboundedSender<GenerateReply>;

pub struct GenerateArgs
{   pub request: crate::GenerationRequest
  , pub reply: GenerateReplySender
}

// ===== KillProcess =====

pub type KillProcessReply = Result<(), crate::error::Error>;
pub type KillProcessReplySender
  = tokio::sync::mpsc::UnboundedSender<KillProcessReply>;

pub struct KillProcessArgs
{   pub reply: KillProcessReplySender
}

// ===== ChatbotHand (sender side) =====

pub struct ChatbotHand
{   pub list_models_tx
      : tokio::sync::mpsc::UnboundedSender<ListModelsArgs>
  , pub generate_tx
      : tokio::sync::mpsc::UnboundedSender<GenerateArgs>
  , pub kill_process_tx
      : tokio::sync::mpsc::UnboundedSender<KillProcessArgs>
}

// ===== ChatbotFoot (receiver side) =====

pub struct ChatbotFoot
{   pub list_models_rx
      : tokio::sync::mpsc::UnboundedReceiver<ListModelsArgs>
  , pub generate_rx
      : tokio::sync::mpsc::UnboundedReceiver<GenerateArgs>
  , pub kill_process_rx
      : tokio::sync::mpsc::UnboundedReceiver<KillProcessArgs>
}
