pub mod editing;
pub mod error;
pub mod history;
pub mod layout;
pub mod session;
pub mod settings;
pub mod types;
