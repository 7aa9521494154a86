use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use console::{Emoji, style};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::answer::AnswerMerger;
use crate::cli::Cli;
use crate::config::env_file;
use crate::config::{Config, Settings};
use crate::error::{self, Error};
use crate::llm::prompts::{build_prompt, synthesis_prompt};
use crate::llm::{GeminiClient, ModelClient};
use crate::parser::{self, TextChunker};

static PAPER: Emoji<'_, '_> = Emoji("📄 ", "");
static BRAIN: Emoji<'_, '_> = Emoji("🧠 ", "");
static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");

/// Backoff before the first retry, doubled for each later attempt
const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

/// How often a failed model request is retried
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: RETRY_BASE_DELAY,
        }
    }

    fn delay(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let question = check_question(&cli.question)?;

    let env = env_file::load(&cli.env_file);
    let config = Config::load(cli.config.as_deref())?;
    let settings = Settings::resolve(cli.overrides(), config, &env)?;
    let client = GeminiClient::new(&settings);

    eprintln!("{}Reading {}", PAPER, style(cli.pdf.display()).cyan());
    let text = parser::extract_text(&cli.pdf)?;

    eprintln!("{}Model: {}", BRAIN, style(&settings.model).cyan());
    let answer = answer_question(&client, &settings, &text, question, cli.synthesize).await?;

    println!("\n=== Question ===");
    println!("{}", question);
    println!("\n=== Answer ===");
    println!("{}", answer);

    if let Some(path) = &cli.save_answer {
        save_answer(path, &answer)?;
        println!("\n{}Saved answer to: {}", SAVE, path.display());
    }

    Ok(())
}

/// Reject blank questions; anything else is used exactly as typed
fn check_question(question: &str) -> error::Result<&str> {
    if question.trim().is_empty() {
        return Err(Error::Input("Question must not be empty.".to_string()));
    }
    Ok(question)
}

/// Answer `question` from the document `text`
///
/// The text is chunked and every chunk is asked in order, one request at a
/// time; the partial answers are merged in that same order.
pub async fn answer_question(
    client: &dyn ModelClient,
    settings: &Settings,
    text: &str,
    question: &str,
    synthesize: bool,
) -> error::Result<String> {
    let chunks = TextChunker::new(settings.chunk_size).split(text);
    let retry = RetryPolicy::new(settings.max_retries);
    info!(
        "Asking {} about {} chunk(s) of at most {} characters",
        settings.model,
        chunks.len(),
        settings.chunk_size
    );

    let progress = progress_bar(chunks.len());
    let answers = ask_chunks(client, &settings.model, &chunks, question, retry, &progress).await;
    progress.finish_and_clear();
    let answers = answers?;

    if answers.iter().all(|answer| answer.trim().is_empty()) {
        return Err(Error::service("Gemini returned an empty response."));
    }

    let merger = AnswerMerger::default();
    let merged = merger.merge(&answers);

    let relevant = merger.relevant(&answers);
    if synthesize && relevant.len() > 1 {
        let prompt = synthesis_prompt(question, &relevant);
        match invoke_with_retry(client, &prompt, &settings.model, retry).await {
            Ok(text) if !text.trim().is_empty() => return Ok(text.trim().to_string()),
            Ok(_) => warn!("Synthesis returned no text, using merged partial answers"),
            Err(e) => warn!("Synthesis failed ({}), using merged partial answers", e),
        }
    }

    Ok(merged)
}

async fn ask_chunks(
    client: &dyn ModelClient,
    model: &str,
    chunks: &[String],
    question: &str,
    retry: RetryPolicy,
    progress: &ProgressBar,
) -> error::Result<Vec<String>> {
    let partial = chunks.len() > 1;
    let mut answers = Vec::with_capacity(chunks.len());

    for (idx, chunk) in chunks.iter().enumerate() {
        progress.set_message(format!("part {}/{}", idx + 1, chunks.len()));
        let prompt = build_prompt(chunk, question, partial);
        let answer = invoke_with_retry(client, &prompt, model, retry).await?;
        answers.push(answer);
        progress.inc(1);
    }

    Ok(answers)
}

/// Invoke the model, retrying transient failures with exponential backoff
async fn invoke_with_retry(
    client: &dyn ModelClient,
    prompt: &str,
    model: &str,
    retry: RetryPolicy,
) -> error::Result<String> {
    let mut attempt = 0;
    loop {
        match client.invoke(prompt, model).await {
            Ok(text) => return Ok(text),
            Err(e) if e.is_transient() && attempt < retry.max_retries => {
                let delay = retry.delay(attempt);
                attempt += 1;
                warn!(
                    "{} request failed: {}. Retrying in {:?} (attempt {}/{})",
                    client.name(),
                    e,
                    delay,
                    attempt,
                    retry.max_retries
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

fn save_answer(path: &Path, answer: &str) -> error::Result<()> {
    std::fs::write(path, format!("{}\n", answer)).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{}{{spinner:.green}} [{{elapsed_precise}}] {{bar:40.cyan/blue}} {{pos}}/{{len}} {{msg}}",
                BRAIN
            ))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("━━╸━"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
