//! Storage adapters for [`UserRepository`](super::repository::UserRepository).

pub mod seaorm;
