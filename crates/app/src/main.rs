use std::fmt;

use realms_core::model::{AchievementId, LessonId, RealmId};
use services::{AppServices, Clock};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    MissingOperand { command: &'static str, operand: &'static str },
    UnexpectedOperand(String),
    InvalidDbUrl { raw: String },
    InvalidMinutes { raw: String },
    InvalidAnswers { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown command: {cmd}"),
            ArgsError::MissingOperand { command, operand } => {
                write!(f, "{command} requires <{operand}>")
            }
            ArgsError::UnexpectedOperand(arg) => write!(f, "unexpected operand: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidMinutes { raw } => write!(f, "invalid minutes value: {raw}"),
            ArgsError::InvalidAnswers { raw } => {
                write!(f, "invalid --answers value (expected e.g. 1,0,2): {raw}")
            }
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
    eprintln!("  realms [--db <sqlite_url> | --memory] <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  overview                                 (default)");
    eprintln!("  realms");
    eprintln!("  achievements");
    eprintln!("  read <realm> <lesson>                    read the next theory block");
    eprintln!("  quiz <realm> <lesson> --answers 1,0,2    take a lesson quiz");
    eprintln!("  complete-lesson <realm> <lesson>");
    eprintln!("  add-time <minutes>");
    eprintln!("  unlock <achievement>");
    eprintln!("  reset-realm <realm>");
    eprintln!("  reset");
    eprintln!("  wipe                                     delete the saved snapshot");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite://realms.sqlite3");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  REALMS_DB_URL, RUST_LOG");
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Backend {
    Sqlite(String),
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Overview,
    Realms,
    Achievements,
    Read { realm: RealmId, lesson: LessonId },
    Quiz { realm: RealmId, lesson: LessonId, answers: Vec<usize> },
    CompleteLesson { realm: RealmId, lesson: LessonId },
    AddTime(i64),
    Unlock(AchievementId),
    ResetRealm(RealmId),
    Reset,
    Wipe,
}

struct Args {
    backend: Backend,
    command: Command,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, ArgsError> {
        let mut backend = Backend::Sqlite(
            std::env::var("REALMS_DB_URL")
                .ok()
                .map_or_else(|| normalize_sqlite_url("realms.sqlite3".into()), normalize_sqlite_url),
        );
        let mut answers: Option<Vec<usize>> = None;
        let mut operands = Vec::new();

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    backend = Backend::Sqlite(normalize_sqlite_url(value));
                }
                "--memory" => backend = Backend::Memory,
                "--answers" => {
                    let value = require_value(&mut args, "--answers")?;
                    answers = Some(parse_answers(&value)?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                flag if flag.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ => operands.push(arg),
            }
        }

        let command = parse_command(operands, answers)?;
        Ok(Self { backend, command })
    }
}

fn parse_command(operands: Vec<String>, answers: Option<Vec<usize>>) -> Result<Command, ArgsError> {
    let mut operands = operands.into_iter();
    let Some(name) = operands.next() else {
        return Ok(Command::Overview);
    };

    let mut operand = |command: &'static str, operand: &'static str| {
        operands
            .next()
            .ok_or(ArgsError::MissingOperand { command, operand })
    };

    let command = match name.as_str() {
        "overview" => Command::Overview,
        "realms" => Command::Realms,
        "achievements" => Command::Achievements,
        "read" => Command::Read {
            realm: RealmId::new(operand("read", "realm")?),
            lesson: LessonId::new(operand("read", "lesson")?),
        },
        "quiz" => Command::Quiz {
            realm: RealmId::new(operand("quiz", "realm")?),
            lesson: LessonId::new(operand("quiz", "lesson")?),
            answers: answers.ok_or(ArgsError::MissingValue { flag: "--answers" })?,
        },
        "complete-lesson" => Command::CompleteLesson {
            realm: RealmId::new(operand("complete-lesson", "realm")?),
            lesson: LessonId::new(operand("complete-lesson", "lesson")?),
        },
        "add-time" => {
            let raw = operand("add-time", "minutes")?;
            let minutes = raw
                .trim()
                .parse()
                .map_err(|_| ArgsError::InvalidMinutes { raw: raw.clone() })?;
            Command::AddTime(minutes)
        }
        "unlock" => Command::Unlock(AchievementId::new(operand("unlock", "achievement")?)),
        "reset-realm" => Command::ResetRealm(RealmId::new(operand("reset-realm", "realm")?)),
        "reset" => Command::Reset,
        "wipe" => Command::Wipe,
        _ => return Err(ArgsError::UnknownCommand(name)),
    };

    match operands.next() {
        Some(extra) => Err(ArgsError::UnexpectedOperand(extra)),
        None => Ok(command),
    }
}

fn parse_answers(raw: &str) -> Result<Vec<usize>, ArgsError> {
    raw.split(',')
        .map(|part| part.trim().parse::<usize>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| ArgsError::InvalidAnswers {
            raw: raw.to_string(),
        })
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}?mode=rwc", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let parsed = Args::parse(std::env::args().skip(1)).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let clock = Clock::system();
    let services = match &parsed.backend {
        Backend::Sqlite(db_url) => {
            prepare_sqlite_file(db_url)?;
            AppServices::new_sqlite(db_url, clock).await?
        }
        Backend::Memory => AppServices::in_memory(clock).await?,
    };

    let store = services.store()?;
    let outcome = commands::execute(&services, &store, parsed.command).await;
    store.flush().await;
    outcome
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        Args::parse(args.iter().map(|s| (*s).to_string()))
    }

    #[test]
    fn no_command_means_overview() {
        let args = parse(&["--memory"]).unwrap();
        assert_eq!(args.backend, Backend::Memory);
        assert_eq!(args.command, Command::Overview);
    }

    #[test]
    fn quiz_takes_comma_separated_answers() {
        let args = parse(&["quiz", "math", "algebra-basics", "--answers", "1, 0,2"]).unwrap();
        assert_eq!(
            args.command,
            Command::Quiz {
                realm: RealmId::new("math"),
                lesson: LessonId::new("algebra-basics"),
                answers: vec![1, 0, 2],
            }
        );
    }

    #[test]
    fn missing_operands_and_bad_values_are_rejected() {
        assert!(matches!(
            parse(&["complete-lesson", "math"]),
            Err(ArgsError::MissingOperand { operand: "lesson", .. })
        ));
        assert!(matches!(
            parse(&["add-time", "soon"]),
            Err(ArgsError::InvalidMinutes { .. })
        ));
        assert!(matches!(
            parse(&["quiz", "math", "algebra-basics", "--answers", "a,b"]),
            Err(ArgsError::InvalidAnswers { .. })
        ));
        assert!(matches!(parse(&["fly"]), Err(ArgsError::UnknownCommand(_))));
        assert!(matches!(
            parse(&["reset", "now"]),
            Err(ArgsError::UnexpectedOperand(_))
        ));
    }

    #[test]
    fn sqlite_urls_are_normalized() {
        assert_eq!(
            normalize_sqlite_url("sqlite://already.db".into()),
            "sqlite://already.db"
        );
        let normalized = normalize_sqlite_url("/tmp/realms.db".into());
        assert_eq!(normalized, "sqlite:///tmp/realms.db?mode=rwc");
    }
}
