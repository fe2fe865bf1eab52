use clap::{Args, Parser};
use paa_core::ArticleVariant;
use paa_sources::SourceSpec;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::error;

mod commands;
mod logging;

const TOO_LONG: &str = "Duration is too long";

#[derive(Debug, Clone, PartialEq)]
pub struct HumanDuration(pub Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total_seconds = 0u64;
        let mut current_number = String::new();
        let mut has_unit = false;

        for c in s.chars() {
            if c.is_ascii_digit() {
                current_number.push(c);
            } else if let Ok(num) = current_number.parse::<u64>() {
                let unit = match c {
                    's' => 1,
                    'm' => 60,
                    'h' => 3600,
                    _ => return Err(format!("Invalid duration unit: {}", c)),
                };
                total_seconds = num
                    .checked_mul(unit)
                    .and_then(|secs| total_seconds.checked_add(secs))
                    .ok_or_else(|| TOO_LONG.to_string())?;
                current_number.clear();
                has_unit = true;
            } else if !c.is_whitespace() {
                return Err(format!("Invalid character in duration: {}", c));
            }
        }

        // A trailing bare number counts as seconds
        if !current_number.is_empty() {
            let num = current_number
                .parse::<u64>()
                .map_err(|_| "Invalid number in duration".to_string())?;
            total_seconds = total_seconds.checked_add(num).ok_or_else(|| TOO_LONG.to_string())?;
            has_unit = true;
        }

        if !has_unit || total_seconds == 0 {
            return Err("Duration must be a positive number of seconds, minutes or hours".to_string());
        }

        Ok(HumanDuration(Duration::from_secs(total_seconds)))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Write SEO articles from \"People Also Ask\" questions", long_about = None)]
pub struct Cli {
    /// API key for the completion endpoint; falls back to the saved one
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,
    /// Model name (default: OPENAI_MODEL or gpt-4o-mini)
    #[arg(long, global = true)]
    model: Option<String>,
    /// Base URL of an OpenAI-compatible API (default: OPENAI_BASE_URL or https://api.openai.com/v1)
    #[arg(long, global = true)]
    base_url: Option<String>,
    #[arg(long, global = true)]
    temperature: Option<f32>,
    /// Request timeout, e.g. 90s, 2m, 1m30s
    #[arg(long, global = true)]
    timeout: Option<HumanDuration>,
    /// Where form values and the last article are remembered
    #[arg(long, default_value = "paa-state.json", global = true)]
    state_file: PathBuf,
    /// Directory for exported HTML and PDF files
    #[arg(long, default_value = ".", global = true)]
    output_dir: PathBuf,
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Generate a new article
    Generate(GenerateArgs),
    /// Run an improvement pass over the last (or a given) article
    Improve(ImproveArgs),
    /// Serve the JSON API
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
    },
    /// Inspect or edit the remembered form values
    Form {
        #[command(subcommand)]
        command: FormCommands,
    },
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Main keyword, e.g. "best dentists in Arica"
    #[arg(short, long)]
    keyword: Option<String>,
    /// A "People Also Ask" question; repeat for several
    #[arg(short, long = "question")]
    questions: Vec<String>,
    /// File with one question per line
    #[arg(long)]
    questions_file: Option<PathBuf>,
    /// Source text, @file or http(s) URL; at most two
    #[arg(short, long = "source")]
    sources: Vec<SourceSpec>,
    #[arg(long, default_value_t = ArticleVariant::Informational)]
    variant: ArticleVariant,
    /// Write the HTML here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Also save a timestamped copy into --output-dir
    #[arg(long)]
    export: bool,
    /// Also save a timestamped PDF into --output-dir
    #[arg(long)]
    export_pdf: bool,
    /// Do not remember these inputs for next time
    #[arg(long)]
    no_save: bool,
}

#[derive(Args, Debug)]
struct ImproveArgs {
    /// Defaults to the remembered keyword
    #[arg(short, long)]
    keyword: Option<String>,
    /// HTML file to improve instead of the last generated article
    #[arg(short, long)]
    input: Option<PathBuf>,
    #[arg(short, long)]
    output: Option<PathBuf>,
    #[arg(long)]
    export: bool,
    #[arg(long)]
    export_pdf: bool,
}

#[derive(clap::Subcommand, Debug)]
enum FormCommands {
    /// Print the remembered values
    Show,
    /// Change remembered values
    Set {
        #[arg(long)]
        keyword: Option<String>,
        #[arg(long)]
        questions_file: Option<PathBuf>,
        #[arg(long)]
        source1: Option<SourceSpec>,
        #[arg(long)]
        source2: Option<SourceSpec>,
        /// Remember the --api-key value
        #[arg(long)]
        remember_key: bool,
    },
    /// Forget everything, including the saved key and article
    Clear,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    if let Err(e) = commands::run(cli).await {
        error!("❌ {}", e.user_message());
        std::process::exit(1);
    }
}
