pub mod ask;

use std::path::PathBuf;

use clap::Parser;

use crate::config::Overrides;

#[derive(Parser, Debug)]
#[command(name = "pdfask")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Read a PDF and answer a question about it using Google Gemini", long_about = None)]
#[command(after_help = "The API key is read from GEMINI_API_KEY (or GOOGLE_API_KEY), \
    either exported or set in the .env file.")]
pub struct Cli {
    /// Path to the PDF file
    #[arg(long, value_name = "PATH")]
    pub pdf: PathBuf,

    /// Question to answer from the PDF
    #[arg(long, value_name = "TEXT")]
    pub question: String,

    /// Gemini model name [default: gemini-1.5-flash]
    #[arg(long)]
    pub model: Option<String>,

    /// Optional path to save the answer as a text file
    #[arg(long, value_name = "PATH")]
    pub save_answer: Option<PathBuf>,

    /// Optional .env file path
    #[arg(long, value_name = "PATH", default_value = ".env")]
    pub env_file: PathBuf,

    /// Configuration file [default: ~/.config/pdfask/config.toml]
    #[arg(long, value_name = "PATH", env = "PDFASK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Maximum characters of PDF text sent per request [default: 120000]
    #[arg(long, value_name = "CHARS")]
    pub chunk_size: Option<usize>,

    /// Retries for rate-limited or failed requests [default: 2]
    #[arg(long, value_name = "N")]
    pub max_retries: Option<u32>,

    /// Ask the model to merge partial answers from a long PDF into one
    #[arg(long, default_value = "false")]
    pub synthesize: bool,
}

impl Cli {
    /// Settings given on the command line
    pub fn overrides(&self) -> Overrides {
        Overrides {
            model: self.model.clone(),
            chunk_size: self.chunk_size,
            max_retries: self.max_retries,
        }
    }
}
