pub mod chat;
pub mod generate_content;
