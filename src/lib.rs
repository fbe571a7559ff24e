//! Benchmark the response quality and latency of language models.
//!
//! A run sends one fixed prompt to a model many times with bounded
//! concurrency, scores every response against an expected output, and
//! aggregates the results into per-trial records plus summary metrics.
//!
//! ```no_run
//! use std::sync::Arc;
//! use llm_profile::{
//!     builder::{ClientBuilder, Provider},
//!     evaluator::{Evaluator, TaskKind},
//!     trial::{RunContext, TrialConfig, TrialRunner},
//! };
//!
//! # async fn demo() -> Result<(), llm_profile::LLMError> {
//! let client = ClientBuilder::new()
//!     .provider(Provider::OpenAI)
//!     .api_key(std::env::var("OPENAI_API_KEY").unwrap_or_default())
//!     .model("gpt-4o-mini")
//!     .build()?;
//! let evaluator = Evaluator::algorithmic(TaskKind::StringMatch, "Paris");
//! let config = TrialConfig::new("What is the capital of France?", 20, 4);
//! let runner = TrialRunner::new(RunContext::new(Arc::new(client), evaluator, config))?;
//! let outcome = runner.run().await;
//! println!("{}", outcome.report);
//! # Ok(())
//! # }
//! ```

pub mod backends;
pub mod builder;
pub mod client;
pub mod credential_store;
pub mod error;
pub mod evaluator;
pub mod metrics;
pub mod trial;

pub use client::{GenerationOptions, ModelClient};
pub use error::LLMError;
