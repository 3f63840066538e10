use std::fmt;

use chrono::{DateTime, Utc};
use realms_core::Catalog;
use realms_core::model::{AchievementId, QUIZ_MASTER, RealmId};
use storage::repository::Storage;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    realm_id: RealmId,
    lessons: usize,
    streak: i64,
    minutes: i64,
    quiz_master: bool,
    now: Option<DateTime<Utc>>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidLessons { raw: String },
    InvalidStreak { raw: String },
    InvalidMinutes { raw: String },
    InvalidDbUrl { raw: String },
    InvalidNow { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidLessons { raw } => write!(f, "invalid --lessons value: {raw}"),
            ArgsError::InvalidStreak { raw } => write!(f, "invalid --streak value: {raw}"),
            ArgsError::InvalidMinutes { raw } => write!(f, "invalid --minutes value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidNow { raw } => {
                write!(f, "invalid --now value (expected RFC3339): {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

#[derive(Debug)]
struct UnknownRealm(RealmId);

impl fmt::Display for UnknownRealm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "realm {} is not in the catalog", self.0)
    }
}

impl std::error::Error for UnknownRealm {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("REALMS_DB_URL").unwrap_or_else(|_| "sqlite://realms.sqlite3?mode=rwc".into());
        let mut realm_id = RealmId::new("math");
        let mut lessons = 2;
        let mut streak = 0;
        let mut minutes = 0;
        let mut quiz_master = false;
        let mut now: Option<DateTime<Utc>> = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--realm" => {
                    realm_id = RealmId::new(require_value(&mut args, "--realm")?);
                }
                "--lessons" => {
                    let value = require_value(&mut args, "--lessons")?;
                    lessons = value
                        .parse::<usize>()
                        .map_err(|_| ArgsError::InvalidLessons { raw: value.clone() })?;
                }
                "--streak" => {
                    let value = require_value(&mut args, "--streak")?;
                    streak = value
                        .parse::<i64>()
                        .map_err(|_| ArgsError::InvalidStreak { raw: value.clone() })?;
                }
                "--minutes" => {
                    let value = require_value(&mut args, "--minutes")?;
                    minutes = value
                        .parse::<i64>()
                        .map_err(|_| ArgsError::InvalidMinutes { raw: value.clone() })?;
                }
                "--quiz-master" => quiz_master = true,
                "--now" => {
                    let value = require_value(&mut args, "--now")?;
                    let parsed = DateTime::parse_from_rfc3339(&value)
                        .map_err(|_| ArgsError::InvalidNow { raw: value.clone() })?
                        .with_timezone(&Utc);
                    now = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            realm_id,
            lessons,
            streak,
            minutes,
            quiz_master,
            now,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite://realms.sqlite3?mode=rwc)");
    eprintln!("  --realm <id>              Realm to mark progress in (default: math)");
    eprintln!("  --lessons <n>             Completed lessons, in presentation order (default: 2)");
    eprintln!("  --streak <n>              Current streak to store (default: 0)");
    eprintln!("  --minutes <n>             Total minutes spent (default: 0)");
    eprintln!("  --quiz-master             Unlock the quiz-master achievement");
    eprintln!("  --now <rfc3339>           Fixed unlock time for deterministic seeding");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  REALMS_DB_URL");
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let catalog = Catalog::builtin()?;
    let mut state = catalog.default_state();
    let now = args.now.unwrap_or_else(Utc::now);

    let realm = state
        .realm(&args.realm_id)
        .ok_or_else(|| UnknownRealm(args.realm_id.clone()))?;
    let to_complete: Vec<_> = realm
        .ordered_lessons()
        .into_iter()
        .take(args.lessons)
        .map(|lesson| lesson.id().clone())
        .collect();
    let mut seeded = realm.clone();
    for lesson_id in &to_complete {
        if let Some(next) = seeded.with_lesson_completed(lesson_id) {
            seeded = next;
        }
    }
    state.replace_realm(seeded.with_recomputed_progress());
    state.current_streak = args.streak;
    state.total_time_spent = args.minutes;

    if args.quiz_master {
        let id = AchievementId::new(QUIZ_MASTER);
        if let Some(unlocked) = state.achievement(&id).and_then(|a| a.unlock(now)) {
            state.replace_achievement(unlocked);
        }
    }

    let storage = Storage::sqlite(&args.db_url).await?;
    storage.snapshots().save(&state).await?;

    println!(
        "Seeded {} completed lessons in {} ({} min, streak {}) into {}",
        to_complete.len(),
        args.realm_id,
        args.minutes,
        args.streak,
        args.db_url
    );

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

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
