use std::sync::Arc;

use anyhow::Context;

use talent_scout::channels::CliChannel;
use talent_scout::config::ScreeningConfig;
use talent_scout::llm::create_generator;
use talent_scout::screening::routes::serve;
use talent_scout::screening::{Session, SessionRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = ScreeningConfig::from_env().context("reading configuration")?;
    let generator = Arc::new(create_generator(&config.llm).context("creating LLM provider")?);

    let mode = std::env::args().nth(1).unwrap_or_else(|| "cli".to_string());

    eprintln!("🧭 TalentScout v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.llm.model);
    eprintln!(
        "   LLM: {}",
        if config.llm.api_key.is_some() {
            config.llm.api_url.as_str()
        } else {
            "offline (fallback text)"
        }
    );

    match mode.as_str() {
        "serve" => {
            let registry = Arc::new(SessionRegistry::new(
                generator,
                config.default_country_code.clone(),
            ));
            eprintln!("   API: http://0.0.0.0:{}/api/sessions\n", config.port);
            serve(config.port, registry)
                .await
                .with_context(|| format!("serving on port {}", config.port))?;
        }
        "cli" => {
            eprintln!("   Type your answers and press Enter. /quit to exit.\n");
            let session = Session::new(generator, config.default_country_code.clone());
            CliChannel::new(session).run().await?;
        }
        other => {
            anyhow::bail!("unknown mode `{other}` (expected `cli` or `serve`)");
        }
    }

    Ok(())
}
