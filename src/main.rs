use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{ArgAction, Parser};

use flipbook_translator::core::{
    print_error_message, print_info_message, read_document, restore_document,
    translate_document, write_document,
};
use flipbook_translator::env::{core::LogLevel, core::NoColor, generate_env_docs, EnvVar};
use flipbook_translator::translation::{
    load_translation_config, ConfigManager, FilePreferenceStore, IgnoreReason, LanguageChange,
    LocalDictionary, MemoryPreferenceStore, PreferenceStore, RemoteTranslationClient,
    TranslationConfig, TranslationCoordinator,
};

#[derive(Parser, Debug)]
#[command(name = "flipbook-translate", version)]
#[command(about = "Switch the language of an HTML flipbook page", long_about = None)]
struct Cli {
    /// HTML document to translate, or - to read stdin
    #[arg(value_name = "INPUT", required_unless_present = "print_env_docs")]
    input: Option<String>,

    /// Target language code (fr, en, es, de, it, zh)
    #[arg(short, long, value_name = "LANG", required_unless_present_any = ["restore", "print_env_docs"])]
    lang: Option<String>,

    /// Where to write the result, - for stdout
    #[arg(short, long, value_name = "FILE", default_value = "-")]
    output: String,

    /// Configuration file (TOML or JSON)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Dictionary file, tried in the order given
    #[arg(short, long = "dictionary", value_name = "FILE")]
    dictionary: Vec<String>,

    /// Translation endpoint; the first is primary, the rest are fallbacks
    #[arg(short, long = "endpoint", value_name = "URL")]
    endpoint: Vec<String>,

    /// Language the document is currently written in
    #[arg(short, long, value_name = "LANG")]
    source: Option<String>,

    /// Re-apply the language stored by a previous run instead of --lang
    #[arg(long, conflicts_with = "lang")]
    restore: bool,

    /// Do not read or write the stored language preference
    #[arg(long)]
    no_persist: bool,

    /// Charset of the input document (detected from <meta> when omitted)
    #[arg(short = 'E', long, value_name = "CHARSET")]
    encoding: Option<String>,

    /// Print the supported environment variables and exit
    #[arg(long)]
    print_env_docs: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        tracing::Level::ERROR
    } else {
        match cli.verbose {
            0 => LogLevel::get()
                .ok()
                .and_then(|level| level.parse().ok())
                .unwrap_or(tracing::Level::WARN),
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_ansi(!NoColor::get_or_default(false))
        .with_target(false)
        .init();
}

fn build_config(cli: &Cli) -> Result<TranslationConfig, String> {
    let mut config = match &cli.config {
        Some(path) => ConfigManager::from_path(path)
            .map_err(|e| e.to_string())?
            .into_config(),
        None => load_translation_config(),
    };

    if !cli.dictionary.is_empty() {
        config.dictionary_paths = cli.dictionary.clone();
    }
    if let Some((primary, fallbacks)) = cli.endpoint.split_first() {
        config.primary_endpoint = primary.clone();
        config.fallback_endpoints = fallbacks.to_vec();
    }
    if let Some(source) = &cli.source {
        config.default_language = source.clone();
    }

    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn build_coordinator(cli: &Cli, config: &TranslationConfig) -> Result<TranslationCoordinator, String> {
    let dictionary = Arc::new(LocalDictionary::load(&config.dictionary_paths()));
    let client = RemoteTranslationClient::from_config(config).map_err(|e| e.to_string())?;
    let preferences: Box<dyn PreferenceStore> = if cli.no_persist {
        Box::new(MemoryPreferenceStore::new())
    } else {
        Box::new(FilePreferenceStore::new(config.preferences_path()))
    };

    TranslationCoordinator::new(config, dictionary, client, preferences).map_err(|e| e.to_string())
}

fn describe(change: &LanguageChange) -> String {
    match change {
        LanguageChange::Completed(report) => format!(
            "Translated {} elements {} -> {} ({} cached, {} dictionary, {} remote, {} fallback, {} unchanged)",
            report.units,
            report.source,
            report.target,
            report.from_cache,
            report.from_dictionary,
            report.from_remote,
            report.from_fallback,
            report.unchanged
        ),
        LanguageChange::Ignored(IgnoreReason::SameLanguage) => {
            "Document already uses the requested language".to_string()
        }
        LanguageChange::Ignored(IgnoreReason::NoStoredPreference) => {
            "No stored language preference to restore".to_string()
        }
        LanguageChange::Ignored(reason) => format!("Nothing translated: {:?}", reason),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    if cli.print_env_docs {
        print!("{}", generate_env_docs());
        return;
    }

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            print_error_message(&format!("Invalid configuration: {e}"));
            process::exit(1);
        }
    };

    let coordinator = match build_coordinator(&cli, &config) {
        Ok(coordinator) => coordinator,
        Err(e) => {
            print_error_message(&e);
            process::exit(1);
        }
    };

    let input = cli.input.as_deref().unwrap_or("-");
    let data = match read_document(input) {
        Ok(data) => data,
        Err(e) => {
            print_error_message(&e.to_string());
            process::exit(1);
        }
    };

    let encoding = cli.encoding.as_deref();
    let result = match &cli.lang {
        Some(lang) => translate_document(&coordinator, &data, encoding, lang).await,
        None => restore_document(&coordinator, &data, encoding).await,
    };

    let (output, change) = match result {
        Ok(result) => result,
        Err(e) => {
            print_error_message(&e.to_string());
            process::exit(1);
        }
    };

    if change == LanguageChange::Ignored(IgnoreReason::Unsupported) {
        let supported: Vec<&str> = coordinator
            .supported_languages()
            .iter()
            .map(|language| language.as_str())
            .collect();
        let message = match &cli.lang {
            Some(lang) => format!("Unsupported language '{}'", lang),
            None => match coordinator.stored_language() {
                Some(stored) => format!("Stored language '{}' is no longer supported", stored),
                None => "Stored language is no longer supported".to_string(),
            },
        };
        print_error_message(&format!("{}, expected one of: {}", message, supported.join(", ")));
        process::exit(1);
    }

    if let Err(e) = write_document(&cli.output, &output) {
        print_error_message(&e.to_string());
        process::exit(1);
    }

    if !cli.quiet {
        print_info_message(&describe(&change));
    }
}
