//! Lingosync command line entry point
//!
//! Loads the configuration, selects the provider and translates a sources
//! file into one or more target languages.

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lingosync::cli::{Args, Commands};
use lingosync::config::Config;
use lingosync::language::{Language, Provider};
use lingosync::translate::Translator;
use lingosync::workflow::{parse_languages, Workflow};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(args.verbose)?;
    info!("Starting lingosync");

    let mut config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if std::path::Path::new("lingosync.toml").exists() {
                info!("Found lingosync.toml in current directory, loading...");
                Config::from_file("lingosync.toml")?
            } else {
                Config::default()
            }
        }
    };

    match args.command {
        Commands::Translate { input, from, to, provider, output } => {
            if let Some(provider) = provider {
                config.translator.provider = provider.parse::<Provider>()?;
            }
            let source_language: Language = from.parse()?;
            let target_languages = parse_languages(&to)?;

            let translator = Translator::from_config(&config.translator)?;
            info!("Using {}", translator.provider());

            let workflow = Workflow::new(translator);
            let translations = workflow
                .translate_file(&input, source_language, &target_languages, output.as_ref())
                .await?;
            info!("Translated {} entries", translations.len());
        }

        Commands::Languages => {
            println!(
                "{:<24} {:<8} {:<10} {:<10} {:<10}",
                "Language", "Tag", "Microsoft", "DeepL", "DeepL tgt"
            );
            println!("{}", "-".repeat(66));
            for language in Language::all() {
                println!(
                    "{:<24} {:<8} {:<10} {:<10} {:<10}",
                    language.name(),
                    language.code(),
                    language.locale(Provider::Microsoft),
                    language.locale(Provider::DeepL),
                    language.target_locale(Provider::DeepL),
                );
            }
        }

        Commands::InitConfig { output } => {
            Config::default().save_to_file(&output)?;
            println!("Wrote default configuration to {}", output.display());
        }
    }

    Ok(())
}

fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = std::env::current_dir()?.join(".lingosync").join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Daily rotation; the guard must outlive the program
    let file_appender = rolling::daily(&log_dir, "lingosync.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);
    std::mem::forget(guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    // Console goes to stderr so translations printed to stdout stay clean JSON
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
