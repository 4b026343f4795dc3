//! `fugubot ask` — One-shot question mode.
//!
//! Runs the same pipeline the gateway serves, but prints the reply to
//! stdout as it streams in. Useful for smoke-testing a deployment.

use std::io::Write;
use std::sync::Arc;

use fugubot_chat::{ChatPipeline, TopicFilter};
use fugubot_config::AppConfig;
use fugubot_core::{ChatOutcome, ChatRequest, CompletionBackend, IncomingMessage};
use fugubot_providers::OpenRouterBackend;

pub async fn run(question: String) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let Some(backend) = OpenRouterBackend::from_config(&config) else {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    OPENROUTER_API_KEY=sk-or-v1-...   (recommended)");
        eprintln!("    FUGUBOT_API_KEY=sk-...");
        eprintln!();
        eprintln!("  Or add api_key to {}", AppConfig::config_path().display());
        eprintln!("  Get an OpenRouter key at: https://openrouter.ai/keys");
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    };

    let corpus = Arc::new(fugubot_knowledge::load_corpus(&config.knowledge));
    let pipeline = ChatPipeline::new(
        Some(Arc::new(backend) as Arc<dyn CompletionBackend>),
        corpus,
        TopicFilter::new(config.filter.clone()),
        config.model.clone(),
        config.temperature,
    );

    let request = ChatRequest {
        messages: vec![IncomingMessage {
            role: "user".into(),
            content: Some(question),
            ..Default::default()
        }],
        ..Default::default()
    };

    match pipeline.process(request).await? {
        ChatOutcome::Rejected { message } => println!("{message}"),
        ChatOutcome::Streaming { mut deltas } => {
            let mut stdout = std::io::stdout();
            while let Some(item) = deltas.recv().await {
                match item {
                    Ok(delta) => {
                        print!("{delta}");
                        stdout.flush()?;
                    }
                    Err(e) => {
                        eprintln!();
                        eprintln!("  [Error] {e}");
                        break;
                    }
                }
            }
            println!();
        }
    }

    Ok(())
}
