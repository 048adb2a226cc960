pub mod gemini;
pub mod smtp;
