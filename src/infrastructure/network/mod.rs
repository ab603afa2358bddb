pub mod groq;
pub mod http;
pub mod relay;
