//! untika CLI - document to text conversion through Apache Tika

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use untika::convert::{ConvertOptions, ConverterConfig, DocumentConverter, TikaConverter};
use untika::service::{ServiceConfig, Timeout, DEFAULT_URL};
use untika::{launch_tika, to_json, IdHashKey, JsonFormat, LanguageCheck, LaunchOptions};

#[derive(Parser)]
#[command(name = "untika")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Convert documents to plain text and JSON through Apache Tika", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert files to text and JSON in an output directory
    Convert {
        /// Input files
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        #[command(flatten)]
        settings: Settings,
    },

    /// Convert a file to plain text
    Text {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        settings: Settings,
    },

    /// Convert a file to JSON
    Json {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        settings: Settings,
    },

    /// Show document information
    Info {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        settings: Settings,
    },

    /// Start a Tika server in Docker
    Launch {
        /// Remove an existing container first
        #[arg(long)]
        delete_existing: bool,

        /// Seconds to wait for the server to come up
        #[arg(long, value_name = "SECS", default_value = "15")]
        settle: u64,

        /// Return as soon as the container is started
        #[arg(long, conflicts_with = "settle")]
        no_wait: bool,
    },

    /// Show version information
    Version,
}

/// Settings shared by all converting commands.
#[derive(Args)]
struct Settings {
    /// Tika server URL
    #[arg(long, env = "TIKA_URL", default_value = DEFAULT_URL)]
    url: String,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", default_value = "10")]
    timeout: u64,

    /// Separate connect timeout in seconds (timeout then limits the read)
    #[arg(long, value_name = "SECS")]
    connect_timeout: Option<u64>,

    /// Drop lines that look like numeric table rows
    #[arg(long)]
    remove_numeric_tables: bool,

    /// Expected ISO 639-1 language (repeatable)
    #[arg(long = "language", value_name = "CODE")]
    languages: Vec<String>,

    /// Extra metadata entry (repeatable)
    #[arg(long = "meta", value_name = "KEY=VALUE", value_parser = parse_meta)]
    meta: Vec<(String, String)>,

    /// Attribute hashed into the document id (repeatable)
    #[arg(long = "hash-key", value_name = "KEY", value_parser = parse_hash_key)]
    hash_keys: Vec<IdHashKey>,
}

impl Settings {
    fn converter_config(&self) -> ConverterConfig {
        let timeout = match self.connect_timeout {
            Some(connect) => Timeout::Split {
                connect: Duration::from_secs(connect),
                read: Duration::from_secs(self.timeout),
            },
            None => Timeout::Total(Duration::from_secs(self.timeout)),
        };

        let mut config = ConverterConfig::new()
            .with_service(
                ServiceConfig::new()
                    .with_url(self.url.as_str())
                    .with_timeout(timeout),
            )
            .with_remove_numeric_tables(self.remove_numeric_tables)
            .with_valid_languages(self.languages.iter().cloned());

        if !self.hash_keys.is_empty() {
            config = config.with_id_hash_keys(self.hash_keys.clone());
        }
        config
    }

    fn convert_options(&self) -> ConvertOptions {
        self.meta
            .iter()
            .fold(ConvertOptions::new(), |options, (key, value)| {
                options.with_meta_entry(key.as_str(), value.as_str())
            })
    }

    fn connect(&self) -> Result<TikaConverter, Box<dyn std::error::Error>> {
        log::debug!("connecting to {}", self.url);
        Ok(TikaConverter::connect(self.converter_config())?)
    }
}

fn parse_meta(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}

fn parse_hash_key(s: &str) -> Result<IdHashKey, String> {
    s.parse()
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            inputs,
            output,
            settings,
        } => cmd_convert(&inputs, output.as_deref(), &settings),
        Commands::Text {
            input,
            output,
            settings,
        } => cmd_text(&input, output.as_deref(), &settings),
        Commands::Json {
            input,
            output,
            compact,
            settings,
        } => cmd_json(&input, output.as_deref(), compact, &settings),
        Commands::Info { input, settings } => cmd_info(&input, &settings),
        Commands::Launch {
            delete_existing,
            settle,
            no_wait,
        } => cmd_launch(delete_existing, settle, no_wait),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_convert(
    inputs: &[PathBuf],
    output: Option<&Path>,
    settings: &Settings,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("untika_output"));
    fs::create_dir_all(&output_dir)?;

    let converter = settings.connect()?;
    let options = settings.convert_options();

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut written = Vec::new();
    let mut failed = 0;
    for input in inputs {
        pb.set_message(input.display().to_string());

        match converter.convert(input, &options) {
            Ok(result) => {
                let stem = input.file_stem().unwrap_or_default().to_string_lossy();
                let text_name = format!("{}.txt", stem);
                let json_name = format!("{}.json", stem);
                fs::write(output_dir.join(&text_name), &result.content)?;
                fs::write(
                    output_dir.join(&json_name),
                    to_json(&result, JsonFormat::Pretty)?,
                )?;
                written.push(text_name);
                written.push(json_name);
            }
            Err(e) => {
                failed += 1;
                pb.suspend(|| eprintln!("{} {}: {}", "Failed".red(), input.display(), e));
            }
        }
        pb.inc(1);
    }

    pb.finish_with_message("Done!");

    println!(
        "\n{} {}",
        "Output files in".green().bold(),
        output_dir.display()
    );
    for (i, name) in written.iter().enumerate() {
        let branch = if i + 1 == written.len() { "└─" } else { "├─" };
        println!("  {} {}", branch.dimmed(), name);
    }

    if failed > 0 {
        return Err(format!("{} of {} files failed", failed, inputs.len()).into());
    }
    Ok(())
}

fn cmd_text(
    input: &Path,
    output: Option<&Path>,
    settings: &Settings,
) -> Result<(), Box<dyn std::error::Error>> {
    let converter = settings.connect()?;
    let result = converter.convert(input, &settings.convert_options())?;

    if let Some(path) = output {
        fs::write(path, &result.content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", result.content);
    }

    Ok(())
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    settings: &Settings,
) -> Result<(), Box<dyn std::error::Error>> {
    let converter = settings.connect()?;
    let result = converter.convert(input, &settings.convert_options())?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = to_json(&result, format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_info(input: &Path, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let converter = settings.connect()?;
    let result = converter.convert(input, &settings.convert_options())?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Id".bold(), result.id);
    println!("{}: {}", "Pages".bold(), result.page_count);

    let language = match &result.language {
        LanguageCheck::Skipped => "not checked".to_string(),
        LanguageCheck::Valid { detected } => detected.clone(),
        LanguageCheck::Mismatch { detected } => format!(
            "{} {}",
            detected.as_deref().unwrap_or("unknown"),
            "(unexpected)".yellow()
        ),
    };
    println!("{}: {}", "Language".bold(), language);

    if !result.metadata.is_empty() {
        println!();
        println!("{}", "Metadata".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        for (key, value) in &result.metadata {
            println!("{}: {}", key.bold(), value);
        }
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let words = result.content.split_whitespace().count();
    println!("{}: {}", "Words".bold(), words);
    println!("{}: {}", "Characters".bold(), result.content.chars().count());

    Ok(())
}

fn cmd_launch(
    delete_existing: bool,
    settle: u64,
    no_wait: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let settle_time = if no_wait {
        Duration::ZERO
    } else {
        Duration::from_secs(settle)
    };
    let options = LaunchOptions::new()
        .with_delete_existing(delete_existing)
        .with_settle_time(settle_time);

    let spinner = ProgressBar::new_spinner();
    spinner.set_message("Starting Tika container...");
    spinner.enable_steady_tick(Duration::from_millis(120));

    let started = launch_tika(&options);
    spinner.finish_and_clear();

    if started {
        println!("{} Tika is listening on {}", "Ready:".green().bold(), DEFAULT_URL);
        Ok(())
    } else {
        Err("could not start the Tika container (is Docker installed and running?)".into())
    }
}

fn cmd_version() {
    println!("{} {}", "untika".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Document to text conversion through Apache Tika");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/untika".dimmed());
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_meta() {
        assert_eq!(
            parse_meta("source=upload").unwrap(),
            ("source".to_string(), "upload".to_string())
        );
        assert_eq!(parse_meta("k=a=b").unwrap().1, "a=b");
        assert!(parse_meta("novalue").is_err());
        assert!(parse_meta("=x").is_err());
    }

    #[test]
    fn test_settings_mapping() {
        let cli = Cli::parse_from([
            "untika",
            "text",
            "a.pdf",
            "--url",
            "http://tika:9998",
            "--connect-timeout",
            "2",
            "--timeout",
            "30",
            "--language",
            "en",
            "--language",
            "de",
            "--meta",
            "owner=ops",
            "--hash-key",
            "meta",
        ]);
        let Commands::Text { settings, .. } = cli.command else {
            panic!("expected text command");
        };

        let config = settings.converter_config();
        assert_eq!(config.service.url, "http://tika:9998");
        assert_eq!(
            config.service.timeout,
            Timeout::Split {
                connect: Duration::from_secs(2),
                read: Duration::from_secs(30),
            }
        );
        assert_eq!(config.valid_languages, vec!["en", "de"]);
        assert_eq!(config.id_hash_keys, vec![IdHashKey::Meta]);

        let options = settings.convert_options();
        assert_eq!(options.meta.unwrap()["owner"], "ops");
    }

    #[test]
    fn test_default_hash_keys_kept() {
        let cli = Cli::parse_from(["untika", "json", "a.pdf", "--url", "http://x:1"]);
        let Commands::Json { settings, .. } = cli.command else {
            panic!("expected json command");
        };
        assert_eq!(
            settings.converter_config().id_hash_keys,
            vec![IdHashKey::Content]
        );
    }
}
