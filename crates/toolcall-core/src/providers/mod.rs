//! Model provider abstraction
//!
//! Token generation is an external capability. The orchestrator only needs
//! something that turns a list of messages into a stream of chunks; hosts
//! plug in their own backend by implementing `Provider`.
//!
//! `CallbackProvider` wraps a host closure that already reaches a model.
//! The `MockProvider` is kept for tests and demos.

mod traits;
mod error;
mod callback;
mod mock;

pub use traits::{GenerateOptions, Provider, StreamResponse};
pub use error::{ProviderError, ProviderResult};
pub use callback::{chunks_from_reply, CallbackProvider};
pub use mock::{MockConfig, MockMode, MockProvider, MockReply, MockRequest};
