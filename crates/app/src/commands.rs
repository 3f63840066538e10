use std::error::Error;
use std::fmt;

use realms_core::model::{LessonId, RealmId};
use services::{AppServices, LessonFlow, Overview, ProgressStore, QuizSession, QuizStep};
use tracing::info;

use crate::Command;

#[derive(Debug)]
enum CommandError {
    UnknownRealm(RealmId),
    UnknownLesson { realm: RealmId, lesson: LessonId },
    AnswerCount { expected: usize, given: usize },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::UnknownRealm(realm) => write!(f, "realm {realm} is not in the catalog"),
            CommandError::UnknownLesson { realm, lesson } => {
                write!(f, "lesson {lesson} is not in realm {realm}")
            }
            CommandError::AnswerCount { expected, given } => {
                write!(f, "quiz has {expected} questions but {given} answers were given")
            }
        }
    }
}

impl Error for CommandError {}

pub(crate) async fn execute(
    services: &AppServices,
    store: &ProgressStore,
    command: Command,
) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Overview => print_overview(store)?,
        Command::Realms => print_realms(store),
        Command::Achievements => print_achievements(store),
        Command::Read { realm, lesson } => read_next_block(store, &realm, &lesson)?,
        Command::Quiz {
            realm,
            lesson,
            answers,
        } => take_quiz(store, &realm, &lesson, &answers)?,
        Command::CompleteLesson { realm, lesson } => {
            ensure_lesson(store, &realm, &lesson)?;
            store.complete_lesson(&realm, &lesson);
            print_realm_progress(store, &realm);
        }
        Command::AddTime(minutes) => {
            store.add_time_spent(minutes);
            println!("total study time: {} minutes", store.total_time_spent());
        }
        Command::Unlock(id) => {
            store.unlock_achievement(&id);
            match store.achievement(&id) {
                Some(a) => println!("{}: {}", a.title(), unlocked_label(a.unlocked())),
                None => println!("no achievement named {id}"),
            }
        }
        Command::ResetRealm(realm) => {
            if store.realm(&realm).is_none() {
                return Err(CommandError::UnknownRealm(realm).into());
            }
            store.reset_realm(&realm);
            print_realm_progress(store, &realm);
        }
        Command::Reset => {
            store.reset_progress();
            println!("progress reset");
        }
        Command::Wipe => {
            services.snapshots().clear().await?;
            info!("saved snapshot deleted");
            println!("saved progress deleted");
        }
    }
    Ok(())
}

fn ensure_lesson(
    store: &ProgressStore,
    realm_id: &RealmId,
    lesson_id: &LessonId,
) -> Result<(), CommandError> {
    let realm = store
        .realm(realm_id)
        .ok_or_else(|| CommandError::UnknownRealm(realm_id.clone()))?;
    if realm.lesson(lesson_id).is_none() {
        return Err(CommandError::UnknownLesson {
            realm: realm_id.clone(),
            lesson: lesson_id.clone(),
        });
    }
    Ok(())
}

fn print_overview(store: &ProgressStore) -> Result<(), serde_json::Error> {
    let overview = Overview::from_store(store);
    println!("{}", serde_json::to_string_pretty(&overview)?);
    Ok(())
}

fn print_realms(store: &ProgressStore) {
    for realm in store.realms() {
        println!("{} ({}) {}%", realm.name(), realm.id(), realm.progress());
        for lesson in realm.ordered_lessons() {
            let mark = if lesson.completed() { "x" } else { " " };
            println!("  [{mark}] {} ({})", lesson.title(), lesson.id());
        }
    }
}

fn print_achievements(store: &ProgressStore) {
    for achievement in store.achievements() {
        let stamp = achievement
            .unlocked_at()
            .map(|at| format!(" on {}", at.format("%Y-%m-%d")))
            .unwrap_or_default();
        println!(
            "{} ({}): {}{stamp}",
            achievement.title(),
            achievement.id(),
            unlocked_label(achievement.unlocked())
        );
    }
}

fn print_realm_progress(store: &ProgressStore, realm_id: &RealmId) {
    if let Some(realm) = store.realm(realm_id) {
        println!("{}: {}%", realm.name(), realm.progress());
    }
}

fn unlocked_label(unlocked: bool) -> &'static str {
    if unlocked { "unlocked" } else { "locked" }
}

fn read_next_block(
    store: &ProgressStore,
    realm_id: &RealmId,
    lesson_id: &LessonId,
) -> Result<(), Box<dyn Error>> {
    let mut flow = LessonFlow::start(store, realm_id, lesson_id)?;
    match flow.current_block() {
        Some(block) => {
            println!("# {}\n\n{}\n", block.title(), block.content());
            flow.complete_current(store)?;
        }
        None => println!("all theory blocks of {} are read", flow.lesson().title()),
    }
    if flow.can_start_quiz() {
        println!("quiz unlocked: realms quiz {realm_id} {lesson_id} --answers ...");
    }
    Ok(())
}

fn take_quiz(
    store: &ProgressStore,
    realm_id: &RealmId,
    lesson_id: &LessonId,
    answers: &[usize],
) -> Result<(), Box<dyn Error>> {
    let flow = LessonFlow::start(store, realm_id, lesson_id)?;
    let mut quiz: QuizSession = flow.start_quiz()?;
    if answers.len() != quiz.total() {
        return Err(CommandError::AnswerCount {
            expected: quiz.total(),
            given: answers.len(),
        }
        .into());
    }

    for &answer in answers {
        let number = quiz.position() + 1;
        let feedback = quiz.answer(answer)?;
        let verdict = if feedback.is_correct { "correct" } else { "wrong" };
        println!("Q{number}: {verdict}. {}", feedback.explanation);

        if let QuizStep::Finished {
            score,
            correct,
            total,
        } = quiz.advance()?
        {
            let required = flow.lesson().required_score();
            let outcome = if quiz.passed(required)? { "passed" } else { "not passed" };
            println!("score: {score}% ({correct}/{total}), {outcome} (needs {required}%)");
        }
    }

    quiz.finish_into(store, realm_id, lesson_id)?;
    print_realm_progress(store, realm_id);
    Ok(())
}
