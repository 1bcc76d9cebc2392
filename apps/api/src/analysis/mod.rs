// Resume analysis and interview practice.
// Implements: prompt building, model reply parsing, and the three request pipelines.
// All LLM calls go through llm_client, never to the provider directly.

pub mod handlers;
pub mod models;
pub mod parser;
pub mod prompt_builder;
pub mod prompts;
pub mod service;
