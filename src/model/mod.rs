pub mod genre;
pub mod session;
pub mod story_settings;
pub mod transcript;
pub mod turn;
