//! Provider implementations for embedding and text generation
//!
//! Both sides of the pipeline's model access live here: the embedding
//! providers that back the context store, and the chat providers the
//! generator speaks to. Everything is constructed from configuration
//! through the two factory functions and handed around as trait objects.

pub mod chat;
pub mod embed;
pub mod mock;

mod http;

pub use chat::create_chat_provider;
pub use embed::create_embedding_provider;
