mod bank_file;

use std::fmt;
use std::path::PathBuf;

use tokio::io::{AsyncBufReadExt, BufReader};

use quiz_core::model::{Answer, QuestionBank, QuestionType};
use services::{EngineEvent, EngineHandle, format_remaining};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidMinutes { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidMinutes { raw } => write!(f, "invalid --minutes value: {raw}"),
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
    eprintln!("  cargo run -p app -- run  [--bank <json>] [--timed] [--minutes <n>]");
    eprintln!("  cargo run -p app -- list [--bank <json>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  embedded sample bank, timer off, 5 minutes");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_BANK  path to a bank file, overridden by --bank");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Run,
    List,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "run" => Some(Self::Run),
            "list" => Some(Self::List),
            _ => None,
        }
    }
}

struct Args {
    bank_path: Option<PathBuf>,
    timed: bool,
    minutes: Option<u32>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut bank_path = std::env::var("QUIZ_BANK").ok().map(PathBuf::from);
        let mut timed = false;
        let mut minutes = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--bank" => {
                    let value = require_value(args, "--bank")?;
                    bank_path = Some(PathBuf::from(value));
                }
                "--timed" => timed = true,
                "--minutes" => {
                    let value = require_value(args, "--minutes")?;
                    let parsed: u32 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidMinutes { raw: value.clone() })?;
                    minutes = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            bank_path,
            timed,
            minutes,
        })
    }
}

fn type_label(kind: QuestionType) -> &'static str {
    match kind {
        QuestionType::SingleChoice => "single choice",
        QuestionType::TrueFalse => "true or false",
        QuestionType::MultiSelect => "select all that apply",
    }
}

fn answer_label(answer: &Answer) -> String {
    match answer {
        Answer::Single(key) => key.to_string(),
        Answer::Multiple(keys) => keys
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(","),
    }
}

fn list_bank(bank: &QuestionBank) {
    for question in bank.questions() {
        println!(
            "#{} [{}] {}",
            question.id(),
            type_label(question.kind()),
            question.prompt()
        );
        for choice in question.choices() {
            println!("    {}. {}", choice.key, choice.text);
        }
        println!("    answer: {}", answer_label(question.answer()));
    }
    println!("{} question(s)", bank.len());
}

fn print_help() {
    println!("commands:");
    println!("  <key>        select/toggle a choice (e.g. a)");
    println!("  n / p        next / previous question");
    println!("  f            finish the session");
    println!("  r            restart with a fresh session");
    println!("  t            toggle the timer for the next session");
    println!("  time <mins>  set timer duration for the next session");
    println!("  q            quit");
}

fn render(engine: &EngineHandle) {
    let Some(question) = engine.current_question() else {
        return;
    };
    let Some(progress) = engine.progress() else {
        return;
    };

    println!();
    let mut header = format!(
        "Question {} of {}  (answered {}/{})",
        progress.current + 1,
        progress.total,
        progress.answered,
        progress.total
    );
    if let Some(secs) = engine.remaining_secs() {
        header.push_str(&format!("  [{}]", format_remaining(secs)));
    }
    println!("{header}");
    println!("{}  ({})", question.prompt(), type_label(question.kind()));

    let answer = engine.answer_for(question.id());
    for choice in question.choices() {
        let marker = if answer
            .as_ref()
            .is_some_and(|answer| answer.contains(&choice.key))
        {
            "x"
        } else {
            " "
        };
        println!("  [{marker}] {}. {}", choice.key, choice.text);
    }
}

fn print_results(engine: &EngineHandle) {
    let Some(summary) = engine.score_summary() else {
        return;
    };
    println!();
    println!("── results ──");
    println!(
        "score:   {}/{} ({}%)",
        summary.score,
        summary.total,
        summary.percent()
    );
    println!("highest: {}/{}", summary.highest, summary.total);
    for outcome in engine.breakdown() {
        let status = if outcome.correct { "correct" } else { "incorrect" };
        println!("  Q{}: {status}", outcome.ordinal);
    }
    let verdict = match summary.percent() {
        90..=100 => "Excellent!",
        70..=89 => "Good job!",
        50..=69 => "Not bad, keep practicing.",
        _ => "You can do better, try again.",
    };
    println!("{verdict}");
    println!("(r to retry, q to quit)");
}

fn select(engine: &EngineHandle, input: &str) {
    let Some(question) = engine.current_question() else {
        println!("no active question");
        return;
    };
    let matched = question
        .choices()
        .iter()
        .find(|choice| choice.key.as_str().eq_ignore_ascii_case(input))
        .map(|choice| choice.key.clone());
    match matched {
        Some(key) => engine.select_choice(question.id(), key),
        None => println!("unknown command or choice: {input} (h for help)"),
    }
}

async fn run_quiz(engine: EngineHandle) -> Result<(), Box<dyn std::error::Error>> {
    let printer = engine.clone();
    engine.subscribe(move |event| match event {
        EngineEvent::SessionCompleted { score, total } => {
            log::info!("session completed: {score}/{total}");
            print_results(&printer);
        }
        EngineEvent::TimerTick { remaining_secs } if matches!(remaining_secs, 30 | 10) => {
            println!("  {} left", format_remaining(remaining_secs));
        }
        _ => log::debug!("engine event: {event:?}"),
    });

    engine.start_session();
    println!("type h for help");
    render(&engine);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        match input {
            "" => {}
            "q" | "quit" => break,
            "h" | "?" | "help" => print_help(),
            "n" | "next" => engine.next(),
            "p" | "prev" => engine.previous(),
            "f" | "finish" => engine.finish(),
            "r" | "restart" => engine.restart(),
            "t" => {
                let enabled = !engine.timer_settings().enabled();
                engine.set_timer_enabled(enabled);
                println!(
                    "timer {} for the next session",
                    if enabled { "enabled" } else { "disabled" }
                );
            }
            _ if input.starts_with("time ") => match input["time ".len()..].trim().parse::<u32>() {
                Ok(minutes) => match engine.set_timer_duration_mins(minutes) {
                    Ok(()) => println!("timer set to {minutes} minute(s) for the next session"),
                    Err(err) => println!("{err}"),
                },
                Err(_) => println!("usage: time <minutes>"),
            },
            _ => select(&engine, input),
        }
        if !engine.is_complete() {
            render(&engine);
        }
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None => Command::Run,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Run,
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

    let drafts = match &args.bank_path {
        Some(path) => bank_file::load(path)?,
        None => bank_file::sample(),
    };
    let bank = QuestionBank::seed(drafts)?;
    log::info!("loaded {} question(s)", bank.len());

    match cmd {
        Command::List => {
            list_bank(&bank);
            Ok(())
        }
        Command::Run => {
            let engine = EngineHandle::new(bank);
            if args.timed {
                engine.set_timer_enabled(true);
            }
            if let Some(minutes) = args.minutes {
                engine.set_timer_duration_mins(minutes)?;
            }
            run_quiz(engine).await
        }
    }
}

#[tokio::main]
async fn main() {
    pretty_env_logger::init();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
