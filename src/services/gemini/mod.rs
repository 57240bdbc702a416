//! Gemini generative model integration

pub mod client;
pub mod messages;

pub use client::{GeminiClient, GenerativeModel};
pub use messages::{GenerateContentRequest, InlineData, ModelReply, Part};
