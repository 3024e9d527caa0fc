pub mod answer;
pub mod cascade;
pub mod core;
pub mod faq;
pub mod history;
pub mod llm;
pub mod search;
pub mod server;
pub mod state;
