use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::io::AsyncBufReadExt;
use tracing_subscriber::EnvFilter;
use url::Url;

use services::{
    ApiConfig, Clock, HttpLearningApi, LearningApi, QuizController, QuizScreen, ReviewMode,
    ReviewRunner, ReviewScreen, SessionTrackerService, TrackerConfig,
};
use vocab_core::model::{ActivityKind, CategoryId, Judgment};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidCategory { raw: String },
    InvalidMode { raw: String },
    InvalidPageUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidCategory { raw } => write!(f, "invalid --category value: {raw}"),
            ArgsError::InvalidMode { raw } => {
                write!(f, "invalid --mode value: {raw} (expected new or repeat)")
            }
            ArgsError::InvalidPageUrl { raw } => write!(f, "cannot build page url: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- review [--mode new|repeat] [--api <base_url>]");
    eprintln!("  cargo run -p app -- quiz   [--category <id>]   [--api <base_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --mode repeat");
    eprintln!("  --category 1");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  VOCAB_API_BASE_URL, VOCAB_CATEGORY_ID");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Review,
    Quiz,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "review" => Some(Self::Review),
            "quiz" => Some(Self::Quiz),
            _ => None,
        }
    }
}

struct Args {
    api_base: Option<String>,
    mode: ReviewMode,
    category: CategoryId,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut api_base = None;
        let mut mode = ReviewMode::Repetition;
        let mut category = std::env::var("VOCAB_CATEGORY_ID")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .map_or_else(|| CategoryId::new(1), CategoryId::new);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api" => {
                    api_base = Some(require_value(args, "--api")?);
                }
                "--mode" => {
                    let value = require_value(args, "--mode")?;
                    mode = match value.as_str() {
                        "new" => ReviewMode::NewWords,
                        "repeat" => ReviewMode::Repetition,
                        _ => return Err(ArgsError::InvalidMode { raw: value }),
                    };
                }
                "--category" => {
                    let value = require_value(args, "--category")?;
                    let parsed: u64 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidCategory { raw: value.clone() })?;
                    category = CategoryId::new(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            api_base,
            mode,
            category,
        })
    }
}

// The tracker wants the address of the page being studied; the terminal app
// synthesizes one so the server can still split sessions by learning method.
fn page_url(command: Command, category: CategoryId) -> Result<Url, ArgsError> {
    let raw = match command {
        Command::Review => "app://vocab/repeat".to_string(),
        Command::Quiz => format!("app://vocab/test?category_id={category}"),
    };
    Url::parse(&raw).map_err(|_| ArgsError::InvalidPageUrl { raw })
}

/// Sleep until the tracker's inactivity deadline.
///
/// Rebuilt on every loop turn, so fresh activity replaces the armed timer
/// instead of stacking another one.
async fn wait_until(deadline: Option<DateTime<Utc>>) {
    match deadline {
        Some(at) => {
            let wait = (at - Utc::now()).to_std().unwrap_or_default();
            tokio::time::sleep(wait).await;
        }
        None => std::future::pending().await,
    }
}

//
// ─── REVIEW LOOP ──────────────────────────────────────────────────────────────
//

fn print_card(runner: &ReviewRunner) {
    match runner.screen() {
        ReviewScreen::Loading => {}
        ReviewScreen::Card { card, revealed } => {
            println!();
            println!("  {}", card.word());
            if *revealed {
                if let Some(transcription) = card.transcription() {
                    println!("  [{transcription}]");
                }
                println!("  {}", card.translation());
            }
            println!("  (k = known, f = forgot, r = reveal, q = quit)");
        }
        ReviewScreen::Exhausted => println!("No more words for now. Come back later."),
        ReviewScreen::LoadFailed => println!("Could not load the next card."),
    }
}

async fn run_review(
    api: Arc<dyn LearningApi>,
    mode: ReviewMode,
    page: Url,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut tracker =
        SessionTrackerService::new(Clock::system(), Arc::clone(&api), TrackerConfig::new(page));
    let mut runner = ReviewRunner::new(api, mode);
    runner.load_next().await;
    print_card(&runner);

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        let deadline = tracker.deadline();
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    tracker.page_unloading().await;
                    break;
                };
                tracker.record_activity(ActivityKind::KeyPress).await;
                let session_id = tracker.session_id();
                match line.trim() {
                    "q" => {
                        tracker.page_unloading().await;
                        break;
                    }
                    "r" => {
                        if runner.reveal().is_ok() {
                            print_card(&runner);
                        }
                    }
                    "k" => {
                        if runner.judge(Judgment::Known, session_id).await.is_ok() {
                            print_card(&runner);
                        }
                    }
                    "f" => {
                        if runner.judge(Judgment::Forgotten, session_id).await.is_ok() {
                            print_card(&runner);
                        }
                    }
                    "" => {}
                    other => println!("unknown input: {other} (k/f/r/q)"),
                }
            }
            () = wait_until(deadline) => {
                tracker.deadline_elapsed().await;
            }
        }
    }

    Ok(())
}

//
// ─── QUIZ LOOP ────────────────────────────────────────────────────────────────
//

fn print_quiz_screen(controller: &QuizController) {
    match controller.screen() {
        QuizScreen::Loading => {}
        QuizScreen::Ready(quiz) => {
            if quiz.is_finished() {
                println!();
                println!("Quiz finished! Score: {}.", quiz.score());
                println!("(type 'again' to retake, q to quit)");
                return;
            }
            let Some(question) = quiz.current_question() else {
                return;
            };
            let progress = quiz.progress();
            println!();
            println!("  {}  ({} left)", question.prompt(), progress.remaining);
            for (index, option) in question.options().iter().enumerate() {
                println!("  {}. {}", index + 1, option.label());
            }
        }
        QuizScreen::NoQuestions => println!("No questions for this category."),
        QuizScreen::LoadFailed => println!("Could not load the quiz."),
    }
}

async fn answer_and_advance(controller: &mut QuizController, choice: usize) {
    let delay = controller.timing().feedback_delay;
    let feedback = {
        let Some(quiz) = controller.quiz_mut() else {
            return;
        };
        match quiz.answer(choice) {
            Ok(outcome) => {
                let correct_label = quiz
                    .current_question()
                    .and_then(|question| question.option(outcome.correct))
                    .map(|option| option.label().to_string());
                Some((outcome, correct_label))
            }
            // Repeated click or finished run; inert by design of the phases.
            Err(_) => None,
        }
    };
    let Some((outcome, correct_label)) = feedback else {
        return;
    };

    if outcome.is_correct {
        println!("Correct!");
    } else if let Some(label) = correct_label {
        println!("Wrong. Correct answer: {label}");
    }

    tokio::time::sleep(delay).await;
    if let Some(quiz) = controller.quiz_mut() {
        let _ = quiz.advance();
    }
    print_quiz_screen(controller);
}

async fn run_quiz(
    api: Arc<dyn LearningApi>,
    category: CategoryId,
    page: Url,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut tracker =
        SessionTrackerService::new(Clock::system(), Arc::clone(&api), TrackerConfig::new(page));
    let mut controller = QuizController::new(api);
    controller.reload(category).await;
    print_quiz_screen(&controller);

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        let deadline = tracker.deadline();
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    tracker.page_unloading().await;
                    break;
                };
                tracker.record_activity(ActivityKind::KeyPress).await;
                match line.trim() {
                    "q" => {
                        tracker.page_unloading().await;
                        break;
                    }
                    "again" => {
                        controller.reload(category).await;
                        print_quiz_screen(&controller);
                    }
                    "" => {}
                    text => match text.parse::<usize>() {
                        Ok(number) if number > 0 => {
                            answer_and_advance(&mut controller, number - 1).await;
                        }
                        _ => println!("pick an option number, 'again', or q"),
                    },
                }
            }
            () = wait_until(deadline) => {
                tracker.deadline_elapsed().await;
            }
        }
    }

    Ok(())
}

//
// ─── ENTRY ────────────────────────────────────────────────────────────────────
//

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let command = match argv.first().map(String::as_str) {
        None => Command::Review,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Review,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let args = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let mut config = ApiConfig::from_env();
    if let Some(base) = args.api_base {
        config = config.with_base_url(base);
    }
    tracing::info!(base_url = %config.base_url, "using learning server");
    let api: Arc<dyn LearningApi> = Arc::new(HttpLearningApi::new(config));

    let page = page_url(command, args.category)?;
    match command {
        Command::Review => run_review(api, args.mode, page).await,
        Command::Quiz => run_quiz(api, args.category, page).await,
    }
}

#[tokio::main]
async fn main() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
