#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod lesson_flow;
pub mod loader;
pub mod overview;
pub mod persistence;
pub mod progress_store;
pub mod quiz_session;
pub mod store_handle;

pub use realms_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, LessonFlowError, QuizSessionError, StoreError};
pub use lesson_flow::LessonFlow;
pub use overview::{FocusRealm, Overview};
pub use progress_store::ProgressStore;
pub use quiz_session::{AnswerFeedback, LESSON_MINUTES, QuizProgress, QuizSession, QuizStep};
pub use store_handle::StoreHandle;
