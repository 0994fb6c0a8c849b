// ATS compatibility engine.
// Implements: keyword and skill extraction, weighted section scoring, suggestions.
// Pure computation; handlers only adapt it to HTTP.

pub mod handlers;
pub mod keywords;
pub mod scoring;
pub mod sections;
