// ICP evaluation: prompt construction, the completion round trip, and reply parsing.
// All completion calls go through llm_client — no direct provider calls here.

pub mod handlers;
pub mod models;
pub mod parser;
pub mod prompts;
pub mod service;
