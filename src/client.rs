use tokio::sync::mpsc;
use log::{debug, error, info};
use crate::ChatbotFoot;

/// Backend state: the two components, both stateless
pub struct ChatbotBackendState
{   pub registry: crate::ModelRegistry
  , pub gateway: crate::GenerationGateway
}

impl ChatbotBackendState
{   pub fn new(config: crate::ChatbotConfig) -> Self
    {   debug!("Initializing ChatbotBackendState");
        ChatbotBackendState
        {   registry: crate::ModelRegistry::new(config.clone())
          , gateway: crate::GenerationGateway::new(config)
        }
    }
}

/// Public API for the chatbot backend - owns the task
pub struct ChatbotBackend
{   hand: crate::ChatbotHand
  , _task_handle: tokio::task::JoinHandle<()>
}

impl ChatbotBackend
{   /// Create and spawn a new backend.
    /// Returns immediately - spawns background task
    pub fn new(config: crate::ChatbotConfig) -> Self
    {   debug!("Creating ChatbotBackend with task ownership");

        let (list_models_tx, list_models_rx)
          = mpsc::unbounded_channel();
        let (generate_tx, generate_rx)
          = mpsc::unbounded_channel();
        let (kill_process_tx, kill_process_rx)
          = mpsc::unbounded_channel();

        let hand = crate::ChatbotHand
        {   list_models_tx
          , generate_tx
          , kill_process_tx
        };

        let foot = crate::ChatbotFoot
        {   list_models_rx
          , generate_rx
          , kill_process_rx
        };

        let _task_handle = tokio::spawn(async move {
          run_backend_loop(foot, config).await
        });

        ChatbotBackend
        {   hand
          , _task_handle
        }
    }

    /// List models - returns almost immediately
    pub async fn list_models(
      &self
    ) -> Result<
        mpsc::UnboundedReceiver<crate::ListModelsReply>,
        crate::error::Error
      >
    {   debug!("list_models queuing command");
        let (reply_tx, reply_rx)
          = mpsc::unbounded_channel();

        let cmd = crate::ListModelsArgs
        {   reply: reply_tx
        };

        self.hand.list_models_tx
          .send(cmd)
          .map_err(|_| disconnected())?;

        Ok(reply_rx)
    }

    /// Generate - returns almost immediately
    pub async fn generate(
      &self
    , request: crate::GenerationRequest
    ) -> Result<
        mpsc::UnboundedReceiver<crate::GenerateReply>,
        crate::error::Error
      >
    {   debug!(
          "generate queuing command for model: {}",
          request.model_name
        );
        let (reply_tx, reply_rx)
          = mpsc::unbounded_channel();

        let cmd = crate::GenerateArgs
        {   request
          , reply: reply_tx
        };

        self.hand.generate_tx
          .send(cmd)
          .map_err(|_| disconnected())?;

        Ok(reply_rx)
    }

    /// Gracefully shutdown the backend.
    /// Requests already running finish on their own tasks.
    pub async fn shutdown(self)
      -> Result<(), crate::error::Error>
    {   debug!("Shutting down ChatbotBackend");
        let (reply_tx, mut reply_rx)
          = mpsc::unbounded_channel();

        let cmd = crate::KillProcessArgs
        {   reply: reply_tx
        };

        self.hand.kill_process_tx
          .send(cmd)
          .map_err(|_| {
            error!("Backend channel already closed");
            crate::error::Error::http("Backend already shutdown")
          })?;

        // Wait for shutdown confirmation
        if let Some(result) = reply_rx.recv().await
        {   debug!("Backend shutdown confirmed");
            result
        } else
        {   error!("Backend shutdown timeout");
            Err(crate::error::Error::timeout())
        }
    }
}

fn disconnected() -> crate::error::Error
{   error!("Backend channel closed");
    crate::error::Error::http("Backend disconnected")
}

/// Main backend event loop
///
/// tokio::select! is ONLY for fast queueing. Each arm spawns
/// the work with its own reply channel and returns.
async fn run_backend_loop(
  foot: crate::ChatbotFoot
, config: crate::ChatbotConfig
)
{   debug!("Starting ChatbotBackend event loop");
    let state = ChatbotBackendState::new(config);
    let ChatbotFoot
    {   mut list_models_rx
      , mut generate_rx
      , mut kill_process_rx
    } = foot;

    loop
    { tokio::select!
      { Some(cmd) = list_models_rx.recv() => {
          debug!("Received ListModels");
          let registry = state.registry.clone();
          tokio::spawn(async move {
            let result = registry.list_models().await;
            let _ = cmd.reply.send(result);
          });
        }
      , Some(cmd) = generate_rx.recv() => {
          debug!(
            "Received Generate for model: {}",
            cmd.request.model_name
          );
          let gateway = state.gateway.clone();
          tokio::spawn(async move {
            let result = gateway.generate(cmd.request).await;
            let _ = cmd.reply.send(result);
          });
        }
      , Some(cmd) = kill_process_rx.recv() => {
          debug!("Received KillProcess");
          let _ = cmd.reply.send(Ok(()));
          info!("ChatbotBackend shutting down");
          break;
        }
      , else => {
          info!("All backend channels closed");
          break;
        }
      }
    }
}
