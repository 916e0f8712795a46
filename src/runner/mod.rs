pub mod chunker;
pub mod command;
