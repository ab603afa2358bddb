//! Task Lingo: a multilingual to-do list whose tasks can be translated by an
//! LLM through a small relay endpoint. Tasks and sessions live in a Supabase
//! project; translation goes through an OpenAI-compatible chat API (Groq).

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod presentation;
pub mod state;
