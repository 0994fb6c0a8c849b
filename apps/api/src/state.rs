use std::sync::Arc;

use crate::ats::keywords::KeywordExtractor;
use crate::ats::scoring::{HeuristicScorer, ResumeScorer};
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
/// Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Compiled keyword and skill patterns, shared with the default scorer.
    pub keywords: Arc<KeywordExtractor>,
    /// Pluggable scorer. Default: HeuristicScorer.
    pub scorer: Arc<dyn ResumeScorer>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let keywords = Arc::new(KeywordExtractor::new());
        let scorer = Arc::new(HeuristicScorer::new(keywords.clone()));
        Self {
            config,
            keywords,
            scorer,
        }
    }
}
