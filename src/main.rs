use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use neuromentor_core::config::{Config, ProviderKind};
use neuromentor_core::mentor::Mentor;
use neuromentor_core::mood::analyze_mood;
use neuromentor_core::vault::EnvVaultProvider;
use neuromentor_core::vision::VisionError;
use neuromentor_llm::any::AnyProvider;
use neuromentor_llm::ollama::OllamaProvider;
use neuromentor_llm::openai::OpenAiProvider;

const ASK_FALLBACK: &str =
    "Sorry, I couldn't answer that from your document right now. Please try again in a moment.";
const SUMMARY_FALLBACK: &str =
    "Sorry, I couldn't summarize your document right now. Please try again in a moment.";
const IMAGE_FALLBACK: &str = "Sorry, I couldn't analyze that image right now. Please try again in a moment.";

/// Mental-wellness companion with document question answering.
#[derive(Parser, Debug)]
#[command(name = "neuromentor", version, about)]
struct Cli {
    /// Config file (default: $NEUROMENTOR_CONFIG or config/default.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Answer a question about one or more documents
    Ask {
        /// Document to read; repeat to merge several
        #[arg(short, long = "file", required = true)]
        files: Vec<PathBuf>,

        /// Number of document sections given to the model (at least 1)
        #[arg(long)]
        top_k: Option<NonZeroUsize>,

        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Summarize one or more documents
    Summarize {
        #[arg(short, long = "file", required = true)]
        files: Vec<PathBuf>,
    },
    /// Describe the emotional atmosphere of a jpg, jpeg or png image
    Image {
        #[arg(short, long = "file")]
        file: PathBuf,
    },
    /// Talk to the wellness companion
    Chat {
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
    /// Print whether a message is on topic for wellness chat
    Classify {
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
    /// Guess the mood of a piece of text
    Mood {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Answer a question from live web search results
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_subscriber();

    let cli = Cli::parse();

    // mood needs neither config nor a model
    if let Command::Mood { text } = &cli.command {
        println!("{}", analyze_mood(&text.join(" ")));
        return Ok(());
    }

    let config_path = resolve_config_path(cli.config.as_deref());
    let mut config = Config::load(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;
    config.resolve_secrets(&EnvVaultProvider).await?;

    let provider = create_provider(&config)?;
    health_check(&provider).await;
    tracing::info!(
        provider = %config.llm.provider,
        model = %config.llm.model,
        "{} ready",
        config.assistant.name
    );

    let mentor = Mentor::from_config(Arc::new(provider), &config);
    run(&mentor, cli.command).await
}

async fn run(mentor: &Mentor<AnyProvider>, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Ask {
            files,
            top_k,
            question,
        } => {
            let question = non_empty(&question, "question")?;
            let document = mentor.load_files(files.as_slice()).await?;
            let answer = match top_k {
                Some(k) => mentor.ask_document_top(&document, &question, k).await,
                None => mentor.ask_document(&document, &question).await,
            };
            match answer {
                Ok(answer) => println!("{answer}"),
                Err(e) => {
                    tracing::error!("document answer failed: {e:#}");
                    println!("{ASK_FALLBACK}");
                }
            }
        }
        Command::Summarize { files } => {
            let document = mentor.load_files(files.as_slice()).await?;
            match mentor.summarize_document(&document).await {
                Ok(summary) => println!("{summary}"),
                Err(e) => {
                    tracing::error!("document summary failed: {e:#}");
                    println!("{SUMMARY_FALLBACK}");
                }
            }
        }
        Command::Image { file } => match mentor.analyze_image(&file).await {
            Ok(analysis) => println!("{analysis}"),
            Err(VisionError::Load(e)) => return Err(e.into()),
            Err(e) => {
                tracing::error!("image analysis failed: {e:#}");
                println!("{IMAGE_FALLBACK}");
            }
        },
        Command::Chat { message } => {
            let message = non_empty(&message, "message")?;
            println!("{}", mentor.chat(&message).await);
        }
        Command::Classify { message } => {
            let message = non_empty(&message, "message")?;
            println!("{}", mentor.classify(&message).await);
        }
        Command::Mood { text } => println!("{}", analyze_mood(&text.join(" "))),
        Command::Search { query } => {
            let query = non_empty(&query, "question")?;
            let Some(result) = mentor.web_answer(&query).await else {
                bail!("web search is not configured, set SERPER_API_KEY or NEUROMENTOR_SERPER_API_KEY");
            };
            println!("{}", result.answer);
            if !result.references.is_empty() {
                println!("\nReferences:");
                for (i, link) in result.references.iter().enumerate() {
                    println!("{}. {link}", i + 1);
                }
            }
        }
    }
    Ok(())
}

fn non_empty(words: &[String], what: &str) -> anyhow::Result<String> {
    let joined = words.join(" ");
    if joined.trim().is_empty() {
        bail!("please enter a valid {what}");
    }
    Ok(joined)
}

fn create_provider(config: &Config) -> anyhow::Result<AnyProvider> {
    match config.llm.provider {
        ProviderKind::Ollama => {
            let mut provider = OllamaProvider::new(
                &config.llm.base_url,
                config.llm.model.clone(),
                config.llm.embedding_model.clone(),
            );
            if let Some(ref vm) = config.llm.vision_model {
                provider = provider.with_vision_model(vm.clone());
            }
            Ok(AnyProvider::Ollama(provider))
        }
        ProviderKind::OpenAi => {
            let api_key = config
                .secrets
                .llm_api_key
                .as_ref()
                .context("NEUROMENTOR_LLM_API_KEY or GOOGLE_API_KEY not found in vault")?
                .expose()
                .to_owned();
            let mut provider = OpenAiProvider::new(
                api_key,
                config.llm.base_url.clone(),
                config.llm.model.clone(),
                config.llm.max_tokens,
                Some(config.llm.embedding_model.clone()),
            )
            .with_temperature(config.llm.temperature);
            if let Some(ref vm) = config.llm.vision_model {
                provider = provider.with_vision_model(vm.clone());
            }
            Ok(AnyProvider::OpenAi(provider))
        }
    }
}

async fn health_check(provider: &AnyProvider) {
    match provider.health_check().await {
        Ok(()) => tracing::info!("{} health check passed", provider_name(provider)),
        Err(e) => tracing::warn!("{} health check failed: {e:#}", provider_name(provider)),
    }
}

fn provider_name(provider: &AnyProvider) -> &str {
    neuromentor_llm::LlmProvider::name(provider)
}

fn resolve_config_path(flag: Option<&Path>) -> PathBuf {
    if let Some(path) = flag {
        return path.to_path_buf();
    }
    if let Ok(path) = std::env::var("NEUROMENTOR_CONFIG") {
        return PathBuf::from(path);
    }
    PathBuf::from("config/default.toml")
}

fn init_subscriber() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
