//! exam-gen - Generate quizzes from PDF textbooks with an LLM

mod auth;
mod config;
mod error;
mod llm;
mod pdf;
mod quiz;
mod session;
mod store;
mod text;

use anyhow::{Context, Result};
use auth::{Authenticator, Role, SharedPassword};
use clap::{Parser, Subcommand};
use config::ExamGenConfig;
use indicatif::{ProgressBar, ProgressStyle};
use llm_client::{Config, ModelPreset};
use quiz::{
    Difficulty, QuestionGenerator, QuestionRecord, QuestionType, QuizRequest, render, score,
};
use session::StudySession;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use store::{FileStore, PublishedQuiz, QuizStore, Submission};

#[derive(Parser, Debug)]
#[command(name = "exam-gen")]
#[command(about = "Generate question papers and quizzes from PDF textbooks", long_about = None)]
#[command(version)]
struct Args {
    /// Enable debug logging
    #[arg(long, global = true, default_value_t = false)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the chapters detected in a PDF
    Chapters {
        /// Path to the PDF file
        pdf: PathBuf,
    },
    /// Generate questions from a PDF
    Generate(GenerateArgs),
    /// Take the currently published quiz
    Take {
        /// Your name (prompted for if omitted)
        #[arg(long)]
        name: Option<String>,
    },
    /// List stored quiz submissions
    Results,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Manage LLM model presets
    Models {
        #[command(subcommand)]
        action: ModelsAction,
    },
}

#[derive(clap::Args, Debug)]
struct GenerateArgs {
    /// Path to the PDF file
    pdf: PathBuf,

    /// Chapter numbers to draw questions from (e.g., "1,3")
    #[arg(long, value_delimiter = ',', conflicts_with = "all")]
    chapters: Vec<u64>,

    /// Use the whole document
    #[arg(long)]
    all: bool,

    /// Question type (default from config)
    #[arg(short = 't', long = "type", value_enum)]
    question_type: Option<QuestionType>,

    /// Difficulty (default from config)
    #[arg(short, long, value_enum)]
    difficulty: Option<Difficulty>,

    /// Questions per selected chapter (default from config)
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Write the question paper to this file
    #[arg(long)]
    paper: Option<PathBuf>,

    /// Write the answer key to this file
    #[arg(long)]
    answers: Option<PathBuf>,

    /// Also print the answer key after the paper
    #[arg(long)]
    show_answers: bool,

    /// Publish the batch as the current quiz
    #[arg(long)]
    publish: bool,

    /// Examiner password for --publish (prompted for if omitted)
    #[arg(long, requires = "publish")]
    password: Option<String>,

    /// Model preset to use (overrides default from config)
    #[arg(short, long)]
    model: Option<String>,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set the default question type and/or difficulty
    SetDefault {
        #[arg(short = 't', long = "type", value_enum)]
        question_type: Option<QuestionType>,
        #[arg(short, long, value_enum)]
        difficulty: Option<Difficulty>,
    },
    /// Set how many source characters are sent to the model
    SetMaxChars { value: usize },
    /// Set the default number of questions per chapter
    SetCount { value: usize },
    /// Set the examiner password used for publishing
    SetPassword { password: String },
    /// Set where the published quiz and submissions are stored
    SetDataDir { path: PathBuf },
}

#[derive(Subcommand, Debug)]
enum ModelsAction {
    /// List available presets
    List,
    /// Add a new preset
    AddPreset {
        /// Preset name
        name: String,
        /// Provider (gemini, anthropic, openrouter)
        #[arg(short, long)]
        provider: String,
        /// Model identifier
        #[arg(short = 'M', long)]
        model: String,
    },
    /// Set the default model preset for exam-gen
    SetDefault {
        /// Name of the preset to use as default
        preset: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    match args.command {
        Commands::Chapters { pdf } => list_chapters(&pdf),
        Commands::Generate(generate) => run_generate(generate).await,
        Commands::Take { name } => take_quiz(name),
        Commands::Results => list_results(),
        Commands::Config { action } => handle_config_command(&action),
        Commands::Models { action } => handle_models_command(&action),
    }
}

fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner} {msg} ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Extract and segment a PDF into a fresh session
fn load_session(path: &Path) -> Result<StudySession> {
    if !path.exists() {
        anyhow::bail!("PDF file not found: {}", path.display());
    }

    let pb = spinner(format!("Extracting text from {}", path.display()));
    let extracted = pdf::extract_pdf(path);
    pb.finish_and_clear();
    let extracted = extracted.with_context(|| format!("Failed to read {}", path.display()))?;

    let mut session = StudySession::new();
    session.load_document(extracted);
    Ok(session)
}

fn open_store(config: &ExamGenConfig) -> Result<FileStore> {
    let dir = config.resolved_data_dir()?;
    FileStore::open(&dir).with_context(|| format!("Failed to open data directory {}", dir.display()))
}

/// Print `label` and read one line; None at end of input
fn prompt_line(label: &str) -> Result<Option<String>> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn list_chapters(path: &Path) -> Result<()> {
    let session = load_session(path)?;
    let document = session.document().context("No document loaded")?;

    println!("{} chapter(s) in {}:", document.chapters.len(), path.display());
    for label in document.chapters.labels() {
        let words = document
            .chapters
            .get(label)
            .map_or(0, |text| text.split_whitespace().count());
        println!("  {:<14} ~{} words", label, words);
    }
    Ok(())
}

async fn run_generate(args: GenerateArgs) -> Result<()> {
    let config = ExamGenConfig::load().context("Failed to load configuration")?;

    let count = args.count.unwrap_or(config.count);
    if count == 0 {
        anyhow::bail!("Question count must be at least 1");
    }

    let mut session = load_session(&args.pdf)?;
    let document = session.document().context("No document loaded")?;

    // --all, or no --chapters at all, means the whole document
    let selection: &[u64] = if args.all { &[] } else { &args.chapters };
    let source_text = document.select(selection)?;

    let chosen: Vec<&str> = document
        .chapters
        .iter()
        .filter(|c| {
            selection.is_empty() || c.number.is_some_and(|n| selection.contains(&n))
        })
        .map(|c| c.label.as_str())
        .collect();
    log::info!("Drawing questions from: {}", chosen.join(", "));

    let request = QuizRequest {
        question_type: args.question_type.unwrap_or(config.question_type),
        difficulty: args.difficulty.unwrap_or(config.difficulty),
        count,
    }
    .per_chapter(selection.len());

    let provider = llm::connect(args.model.as_deref())?;
    let generator = QuestionGenerator::new(provider.as_ref(), config.max_source_chars);

    let pb = spinner(format!(
        "Generating {} {} questions",
        request.count, request.question_type
    ));
    let generated = generator.generate(&source_text, &request).await;
    pb.finish_and_clear();
    if let Err(error::ExamError::GenerationFailure {
        rate_limited: true, ..
    }) = &generated
    {
        log::warn!("The model provider is rate limiting requests; wait a minute and try again");
    }
    session.replace_batch(generated.context("Question generation failed")?);

    let paper = render::question_paper(session.batch());
    let key = render::answer_key(session.batch());

    println!(
        "Question Paper - {} ({}, {} questions)\n",
        request.question_type,
        request.difficulty,
        session.batch().len()
    );
    print!("{}", paper);

    if args.show_answers {
        println!("\nAnswer Key\n");
        print!("{}", key);
    }

    if let Some(path) = &args.paper {
        std::fs::write(path, &paper)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        eprintln!("Question paper written to {}", path.display());
    }
    if let Some(path) = &args.answers {
        std::fs::write(path, &key)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        eprintln!("Answer key written to {}", path.display());
    }

    if args.publish {
        publish_batch(&config, &session, &request, args.password)?;
    }

    Ok(())
}

fn publish_batch(
    config: &ExamGenConfig,
    session: &StudySession,
    request: &QuizRequest,
    password: Option<String>,
) -> Result<()> {
    let auth = SharedPassword::from_env_or(config.examiner_password.as_deref());
    if !auth.is_configured() {
        anyhow::bail!(
            "No examiner password configured. Set {} or run 'exam-gen config set-password'.",
            auth::PASSWORD_ENV_VAR
        );
    }

    let password = match password {
        Some(p) => Some(p),
        None => prompt_line("Examiner password: ")?,
    };
    auth.authorize(Role::Examiner, password.as_deref())?;

    let source = session.source().context("No document loaded")?;
    let quiz = PublishedQuiz::new(
        request.question_type,
        request.difficulty,
        &source.name,
        &source.hash,
        session.batch().to_vec(),
    );

    let store = open_store(config)?;
    store.publish(&quiz)?;
    eprintln!("Published quiz {} to {}", quiz.quiz_id, store.dir().display());
    Ok(())
}

fn answer_hint(question_type: QuestionType) -> &'static str {
    match question_type {
        QuestionType::Mcq => "Your answer (A-D): ",
        QuestionType::TrueFalse => "Your answer (True/False): ",
        QuestionType::FillBlank | QuestionType::ShortAnswer => "Your answer: ",
    }
}

fn ask_questions(
    questions: &[QuestionRecord],
    question_type: QuestionType,
) -> Result<Vec<Option<String>>> {
    let mut responses = Vec::with_capacity(questions.len());

    for (i, record) in questions.iter().enumerate() {
        println!("\nQ{}. {}", i + 1, record.question);
        for option in &record.options {
            println!("   {}", option);
        }

        match prompt_line(answer_hint(question_type))? {
            Some(answer) => responses.push(Some(answer).filter(|a| !a.is_empty())),
            None => break,
        }
    }

    Ok(responses)
}

fn take_quiz(name: Option<String>) -> Result<()> {
    let config = ExamGenConfig::load().context("Failed to load configuration")?;
    let store = open_store(&config)?;
    SharedPassword::default().authorize(Role::Student, None)?;

    let quiz = store.current()?.ok_or(error::ExamError::NoPublishedQuiz)?;

    let name = match name {
        Some(n) => n,
        None => prompt_line("Your name: ")?.unwrap_or_default(),
    };
    if name.trim().is_empty() {
        return Err(error::ExamError::MissingAnswerInput)
            .context("A name is required to take the quiz");
    }

    println!(
        "\n{} quiz from {} ({}, {} questions)",
        quiz.question_type,
        quiz.source_name,
        quiz.difficulty,
        quiz.questions.len()
    );

    let responses = ask_questions(&quiz.questions, quiz.question_type)?;
    let report = score(&quiz.questions, quiz.question_type, &responses);

    println!("\nResults");
    for (i, outcome) in report.outcomes.iter().enumerate() {
        if outcome.correct {
            println!("  Q{}: correct", i + 1);
        } else {
            println!(
                "  Q{}: wrong (you answered {}, correct answer: {})",
                i + 1,
                outcome.given.as_deref().unwrap_or("nothing"),
                outcome.expected
            );
        }
    }
    println!(
        "\nScore: {}/{} ({:.0}%)",
        report.correct,
        report.total,
        report.percentage()
    );

    let submission = Submission::new(&name, &report, Some(&quiz.quiz_id))?;
    store.append_submission(&submission)?;
    Ok(())
}

fn list_results() -> Result<()> {
    let config = ExamGenConfig::load().context("Failed to load configuration")?;
    let store = open_store(&config)?;
    let submissions = store.submissions()?;

    if submissions.is_empty() {
        println!("No submissions yet.");
        return Ok(());
    }

    println!("{:<24} {:>7}  {}", "Name", "Score", "Submitted");
    for s in &submissions {
        println!(
            "{:<24} {:>7}  {}",
            s.name,
            format!("{}/{}", s.score, s.total),
            s.timestamp.format("%Y-%m-%d %H:%M UTC")
        );
    }
    Ok(())
}

fn handle_config_command(action: &ConfigAction) -> Result<()> {
    let mut config = ExamGenConfig::load()?;

    match action {
        ConfigAction::Show => {
            let path = ExamGenConfig::config_path()?;
            println!("Config file: {}", path.display());
            println!();
            println!("Question type: {}", config.question_type);
            println!("Difficulty: {}", config.difficulty);
            println!("Questions per chapter: {}", config.count);
            println!("Max source chars: {}", config.max_source_chars);
            println!("Data dir: {}", config.resolved_data_dir()?.display());
            println!(
                "Examiner password: {}",
                if config.examiner_password.is_some() { "(set)" } else { "(not set)" }
            );
            return Ok(());
        }
        ConfigAction::SetDefault {
            question_type,
            difficulty,
        } => {
            if question_type.is_none() && difficulty.is_none() {
                anyhow::bail!("Nothing to set; pass --type and/or --difficulty");
            }
            if let Some(t) = question_type {
                config.question_type = *t;
                println!("Default question type set to: {}", t);
            }
            if let Some(d) = difficulty {
                config.difficulty = *d;
                println!("Default difficulty set to: {}", d);
            }
        }
        ConfigAction::SetMaxChars { value } => {
            if *value == 0 {
                anyhow::bail!("Max source chars must be at least 1");
            }
            config.max_source_chars = *value;
            println!("Max source chars set to: {}", value);
        }
        ConfigAction::SetCount { value } => {
            if *value == 0 {
                anyhow::bail!("Question count must be at least 1");
            }
            config.count = *value;
            println!("Questions per chapter set to: {}", value);
        }
        ConfigAction::SetPassword { password } => {
            config.examiner_password = Some(password.clone()).filter(|p| !p.trim().is_empty());
            println!("Examiner password updated");
        }
        ConfigAction::SetDataDir { path } => {
            config.data_dir = Some(path.clone());
            println!("Data dir set to: {}", path.display());
        }
    }

    config.save()?;
    Ok(())
}

fn handle_models_command(action: &ModelsAction) -> Result<()> {
    match action {
        ModelsAction::List => {
            let config = Config::load()?;
            let current_default = config.get_default_for_program(llm::PROGRAM_NAME);
            println!("Available presets:");
            for (name, preset) in &config.presets {
                let default_marker = if name == current_default { " (default)" } else { "" };
                println!(
                    "  {} - {} / {}{}",
                    name, preset.provider, preset.model, default_marker
                );
            }
        }
        ModelsAction::AddPreset {
            name,
            provider,
            model,
        } => {
            // Reject unknown providers before they land in the file
            provider.parse::<llm_client::ProviderKind>()?;

            let mut config = Config::load()?;
            config.presets.insert(
                name.clone(),
                ModelPreset {
                    provider: provider.clone(),
                    model: model.clone(),
                },
            );
            config.save()?;
            println!("Added preset: {}", name);
        }
        ModelsAction::SetDefault { preset } => {
            let mut config = Config::load()?;
            config.get_preset(preset)?;
            config
                .defaults
                .insert(llm::PROGRAM_NAME.to_string(), preset.clone());
            config.save()?;
            println!("Default preset for exam-gen set to: {}", preset);
        }
    }
    Ok(())
}
