//! `mcq-quiz` — generate a quiz from a text file and answer it in the terminal.
//!
//! ```text
//! mcq-quiz notes.txt --questions 4
//! ```
//!
//! Pages in the input are separated by form feeds (the `pdftotext` default).

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use mcq_core::types::{OPTION_COUNT, QuizId};
use mcq_service::document::split_pages;
use mcq_service::{QuizService, settings, telemetry};

#[derive(Debug, Parser)]
#[command(name = "mcq-quiz", version, about = "Generate a multiple-choice quiz from document text")]
struct Args {
    /// Plain-text export of the document.
    text_file: PathBuf,

    /// Number of questions to request (clamped to the configured maximum).
    #[arg(short = 'n', long)]
    questions: Option<usize>,

    /// Directory holding mcq.toml and mcq.local.toml.
    #[arg(short = 'c', long, default_value = ".")]
    config_dir: PathBuf,

    /// Label stored with the quiz (defaults to the file name).
    #[arg(long)]
    name: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = settings::load(&args.config_dir)
        .with_context(|| format!("loading settings from {}", args.config_dir.display()))?;
    telemetry::init(&config.general);

    let raw = std::fs::read_to_string(&args.text_file)
        .with_context(|| format!("reading {}", args.text_file.display()))?;
    let source_name = args.name.clone().unwrap_or_else(|| {
        args.text_file
            .file_name()
            .map_or_else(|| "document".to_string(), |n| n.to_string_lossy().into_owned())
    });

    let service = QuizService::from_config(&config)?;
    if !service.generator().is_available() {
        eprintln!("No LLM API key configured; the quiz will contain a sample question.");
    }
    let summary = service
        .create_quiz_from_pages(&source_name, &split_pages(&raw), args.questions)
        .await
        .context("creating quiz")?;

    println!(
        "Quiz {} ready with {} question(s).\n",
        summary.quiz_id, summary.num_questions
    );
    run_quiz(&service, &summary.quiz_id)
}

/// Ask every unanswered question until all are correct or input ends.
fn run_quiz(service: &QuizService, quiz_id: &QuizId) -> Result<()> {
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    let mut stdout = std::io::stdout();

    loop {
        let view = service.get_quiz(quiz_id)?;
        if view.completed {
            println!("All questions answered correctly. Well done!");
            return Ok(());
        }
        let Some(question) = view.questions.iter().find(|q| !q.is_correct) else {
            return Ok(());
        };

        println!("{}", question.question);
        for (i, option) in question.options.iter().enumerate() {
            println!("  {}) {option}", option_label(i));
        }
        print!("Answer (A-D, q to quit): ");
        stdout.flush()?;

        let Some(line) = lines.next().transpose()? else {
            println!();
            return Ok(());
        };
        if line.trim().eq_ignore_ascii_case("q") {
            return Ok(());
        }
        let Some(choice) = parse_choice(&line) else {
            println!("Please enter a letter A-D or a number 1-{OPTION_COUNT}.\n");
            continue;
        };

        match service.submit_answer(quiz_id, &question.id, choice) {
            Ok(outcome) if outcome.correct => {
                println!("Correct!");
                if let Some(explanation) = outcome.explanation {
                    println!("{explanation}");
                }
            }
            Ok(outcome) => {
                println!("Not quite.");
                if let Some(hint) = outcome.hint {
                    println!("Hint: {hint}");
                }
            }
            Err(err) if err.is_client_error() => println!("{err}"),
            Err(err) => return Err(err.into()),
        }
        println!();
    }
}

fn option_label(index: usize) -> char {
    u8::try_from(index).map_or('?', |i| char::from(b'A' + i))
}

/// Map `A`..`D` or `1`..`n` to a zero-based index. Out-of-range numbers are
/// passed through so the service reports them.
fn parse_choice(input: &str) -> Option<i64> {
    let input = input.trim();
    let mut chars = input.chars();
    if let (Some(c), None) = (chars.next(), chars.next())
        && c.is_ascii_alphabetic()
    {
        return Some(i64::from(u8::try_from(c.to_ascii_uppercase()).ok()? - b'A'));
    }
    input.parse::<i64>().ok()?.checked_sub(1)
}
