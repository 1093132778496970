//! rapidlink CLI
//!
//! Computes rapid-upload links for local files and converts links between
//! client formats. Nothing is uploaded; the links only work for content the
//! cloud service already stores.

mod config;
mod progress;

use anyhow::Context;
use clap::{Parser, Subcommand};
use console::style;
use std::path::PathBuf;

use config::Config;
use progress::{HashingProgress, format_bytes};
use rapidlink_core::{ConversionPipeline, EncodedLink, LinkFormat};

/// rapidlink - compute and convert rapid-upload links
#[derive(Parser)]
#[command(name = "rapidlink")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file path (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute links for a file, or every file below a directory
    Create {
        /// File or directory to hash
        #[arg(required = true)]
        path: PathBuf,

        /// Link formats to produce (see `rapidlink formats`)
        #[arg(value_name = "FORMAT")]
        formats: Vec<LinkFormat>,
    },

    /// Convert a link into other formats
    Convert {
        /// Link to convert (short standard links cannot be converted)
        #[arg(required = true)]
        link: String,

        /// Link formats to produce (see `rapidlink formats`)
        #[arg(value_name = "FORMAT")]
        formats: Vec<LinkFormat>,
    },

    /// List supported link formats
    Formats,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load_or_default()?,
    };

    // Validate configuration
    config.validate()?;

    // Initialize logging; stdout is reserved for links
    tracing_subscriber::fmt()
        .with_env_filter(if cli.verbose {
            "debug"
        } else {
            config.logging.level.as_str()
        })
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Create { path, formats } => {
            let targets = targets_or_default(formats, &config);
            create_links(path, &targets, &config)?;
        }
        Commands::Convert { link, formats } => {
            let targets = targets_or_default(formats, &config);
            convert_link(&link, &targets, &config)?;
        }
        Commands::Formats => {
            list_formats();
        }
    }

    Ok(())
}

/// Formats named on the command line, or the configured defaults if none
fn targets_or_default(formats: Vec<LinkFormat>, config: &Config) -> Vec<LinkFormat> {
    if formats.is_empty() {
        config.output.default_targets.clone()
    } else {
        formats
    }
}

/// Hash files and print their links
fn create_links(path: PathBuf, targets: &[LinkFormat], config: &Config) -> anyhow::Result<()> {
    let pipeline = ConversionPipeline::new().read_buffer_size(config.hashing.read_buffer_size);
    let mut progress = HashingProgress::new(config.hashing.progress_threshold);

    let results = pipeline
        .from_path_with_progress(&path, targets, &mut progress)
        .with_context(|| format!("Failed to create links for {}", path.display()))?;

    if results.is_empty() {
        tracing::warn!("No files found under {}", path.display());
        return Ok(());
    }

    for (i, result) in results.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!(
            "{} ({})",
            style(result.path.display()).bold(),
            format_bytes(result.identity.length())
        );
        print_links(&result.links, config.output.show_labels);
    }

    Ok(())
}

/// Decode a link and print it in the requested formats
fn convert_link(link: &str, targets: &[LinkFormat], config: &Config) -> anyhow::Result<()> {
    let links = ConversionPipeline::new().from_link(normalize_link(link), targets)?;
    print_links(&links, config.output.show_labels);
    Ok(())
}

/// Strip whitespace and line endings picked up by copy-paste
fn normalize_link(link: &str) -> &str {
    link.trim()
}

fn print_links(links: &[EncodedLink], show_labels: bool) {
    for entry in links {
        if show_labels {
            println!("{}: {}", style(entry.format.label()).cyan(), entry.link);
        } else {
            println!("{}", entry.link);
        }
    }
}

/// Print the supported formats
fn list_formats() {
    println!("Supported link formats:");
    println!();

    for format in LinkFormat::ALL {
        let direction = if format.is_decodable() {
            "create, convert"
        } else {
            "create only"
        };
        println!(
            "  {:<24} {:<36} {}",
            style(format.id()).bold(),
            format.label(),
            direction
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO: &str = "5D41402ABC4B2A76B9719D911017C592";

    #[test]
    fn test_targets_default_when_none_given() {
        let mut config = Config::default();
        config.output.default_targets = vec![LinkFormat::ClientStyleA, LinkFormat::EncodedURI];

        assert_eq!(
            targets_or_default(Vec::new(), &config),
            vec![LinkFormat::ClientStyleA, LinkFormat::EncodedURI]
        );
    }

    #[test]
    fn test_targets_given_override_default() {
        let config = Config::default();
        let given = vec![LinkFormat::StandardShort, LinkFormat::StandardShort];

        assert_eq!(targets_or_default(given.clone(), &config), given);
    }

    #[test]
    fn test_normalize_link() {
        assert_eq!(normalize_link("  abc \t"), "abc");
        assert_eq!(normalize_link("abc\r\n"), "abc");
        assert_eq!(normalize_link("a b"), "a b");
        assert_eq!(normalize_link(" \n"), "");
    }

    #[test]
    fn test_pasted_link_converts() {
        let pasted = format!("  {HELLO}#{HELLO}#5#a.txt\r\n");
        let links = ConversionPipeline::new()
            .from_link(normalize_link(&pasted), &[LinkFormat::StandardShort])
            .unwrap();

        assert_eq!(links[0].link, format!("{HELLO}#5#a.txt"));
    }

    #[test]
    fn test_cli_parses_formats() {
        let cli = Cli::try_parse_from(["rapidlink", "convert", "link", "BaiduPCS-Go", "pandownload"])
            .unwrap();

        match cli.command {
            Commands::Convert { link, formats } => {
                assert_eq!(link, "link");
                assert_eq!(formats, vec![LinkFormat::ClientStyleA, LinkFormat::EncodedURI]);
            }
            _ => panic!("expected convert"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["rapidlink", "create", "file", "aliyun"]).is_err());
    }
}
