//! askr - a question-answering research assistant
//!
//! A question goes to a language model that may ask for one of three
//! research tools (arXiv, Wikipedia, web search). At most one tool runs per
//! turn and its output is the answer; the model is never called twice.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod llm;
pub mod session;
pub mod tools;
pub mod tui;

pub use error::{AskrError, Result};
