pub mod chatbot;
pub mod models;
pub mod preference;
