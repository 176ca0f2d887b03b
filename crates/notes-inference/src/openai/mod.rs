//! OpenAI-compatible model gateway.
//!
//! Works with any endpoint exposing `POST {base_url}/chat/completions` in the
//! OpenAI wire format, including:
//!
//! - Zhipu open platform (default)
//! - OpenAI cloud API
//! - Ollama, vLLM, LM Studio (OpenAI compatibility mode)
//!
//! # Example
//!
//! ```rust,no_run
//! use notes_core::{ChatTurn, ModelGateway, ModelParams};
//! use notes_inference::openai::OpenAIGateway;
//!
//! #[tokio::main]
//! async fn main() {
//!     let gateway = OpenAIGateway::from_env().unwrap();
//!     let history = vec![ChatTurn::user("什么是二分查找？"), ChatTurn::assistant("...")];
//!     let reply = gateway
//!         .send(&history, "时间复杂度是多少？", &ModelParams::default())
//!         .await
//!         .unwrap();
//!     println!("{}", reply.content);
//! }
//! ```

mod backend;
mod error;
mod types;

pub use backend::{parse_completion_body, OpenAIGateway};
pub use error::{classify_transport_error, UpstreamErrorCode};
pub use types::*;
