//! LLM integration crate for docseek.
//!
//! This crate provides a provider-agnostic abstraction for the two LLM calls
//! docseek makes: keyword extraction and grounded answer synthesis.
//!
//! # Providers
//! - **Gemini**: Google Generative Language REST API (default)
//! - **Ollama**: Local LLM runtime
//!
//! # Example
//! ```no_run
//! use docseek_llm::{LlmClient, LlmRequest, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new();
//! let request = LlmRequest::new("Hello, world!", "llama3.2");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::{GeminiClient, OllamaClient};
pub use types::ProviderType;
