use clap::Parser;
use log::{debug, error};
use ollama_chatbot::{
  ChatbotConfig, GenerationGateway, GenerationRequest,
  GenerationResult, ModelRegistry,
};

/// List the loaded models, then ask one of them one question
#[derive(Parser)]
#[command(author, version, about)]
struct Cli
{   /// Model to ask
    #[arg(default_value = "mistral")]
    model: String
  , /// Question text; words are joined with spaces
    #[arg(trailing_var_arg = true, default_value = "Hello")]
    prompt: Vec<String>
  , /// Inference server address
    #[arg(long, default_value = ollama_chatbot::config::DEFAULT_BASE_URL)]
    base_url: String
}

#[tokio::main]
async fn main()
{   env_logger::init();
    let cli = Cli::parse();
    let prompt = cli.prompt.join(" ");

    let config = ChatbotConfig::default().with_base_url(cli.base_url);

    match ModelRegistry::new(config.clone()).list_models().await
    {   Ok(models) => {
          println!("Available models:");
          for m in models
          {   println!("  - {}", m.name);
          }
        }
      , Err(e) => {
          error!("{}", e);
          println!("no models available");
        }
    }

    debug!("Asking {}: {}", cli.model, prompt);
    let gateway = GenerationGateway::new(config);
    match gateway.generate(GenerationRequest::new(cli.model, prompt)).await
    {   GenerationResult::Success { text, .. } => {
          println!("{}", text);
        }
      , GenerationResult::Failure { kind, message } => {
          eprintln!("{}: {}", kind, message);
          std::process::exit(1);
        }
    }
}
