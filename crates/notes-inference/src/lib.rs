//! # notes-inference
//!
//! Model gateway and prompt templates for the notes AI assistant.
//!
//! This crate provides:
//! - Gateway configuration loaded from the environment
//! - An OpenAI-compatible chat-completion gateway
//! - Prompt templates for the note analysis kinds
//! - A mock gateway for tests (feature `mock`)
//!
//! # Feature Flags
//!
//! - `mock`: Expose [`mock::MockGateway`] to dependent crates' tests
//!
//! # Example
//!
//! ```rust,no_run
//! use notes_core::{ModelGateway, ModelParams};
//! use notes_inference::{prompts, OpenAIGateway};
//!
//! #[tokio::main]
//! async fn main() {
//!     let gateway = OpenAIGateway::from_env().unwrap();
//!     let prompt = prompts::summary_prompt("Rust 的所有权系统...");
//!     let reply = gateway.send(&[], &prompt, &ModelParams::default()).await.unwrap();
//!     println!("{}", reply.content);
//! }
//! ```

pub mod config;
pub mod openai;
pub mod prompts;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use config::{ConfigError, GatewayConfig};
pub use openai::{OpenAIGateway, UpstreamErrorCode};
pub use prompts::{detect_code_language, split_list_answer, CodeLanguage};
