//! Keyword extraction — frequency-ranked salient terms and technical-skill terms
//! pulled out of free text (job descriptions, resume bodies).
//!
//! Pure and deterministic. All patterns are compiled once in
//! `KeywordExtractor::new` and the extractor is shared read-only afterwards.

use std::collections::{BTreeSet, HashMap};

use regex::Regex;

/// At most this many keywords are returned, most frequent first.
pub const MAX_KEYWORDS: usize = 30;

/// A token must occur at least this often to count as a keyword.
pub const MIN_KEYWORD_FREQUENCY: usize = 2;

const MIN_PHRASE_CHARS: usize = 3;
const MAX_PHRASE_CHARS: usize = 20;

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "all", "also", "am", "an", "and", "any", "are", "as",
    "at", "be", "because", "been", "before", "being", "below", "between", "both", "but", "by",
    "can", "could", "did", "do", "does", "doing", "down", "during", "each", "etc", "few", "for",
    "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "him", "his",
    "how", "if", "in", "into", "is", "it", "its", "just", "may", "me", "more", "most", "must",
    "my", "no", "nor", "not", "now", "of", "off", "on", "once", "only", "or", "other", "our",
    "ours", "out", "over", "own", "same", "she", "should", "so", "some", "such", "than", "that",
    "the", "their", "theirs", "them", "then", "there", "these", "they", "this", "those",
    "through", "to", "too", "under", "until", "up", "us", "very", "was", "we", "were", "what",
    "when", "where", "which", "while", "who", "whom", "why", "will", "with", "would", "you",
    "your", "yours",
];

/// Languages, frameworks, data stores, cloud/DevOps tooling and methodology
/// terms. Matched case-insensitively; the matched text is the skill term.
const SKILL_PATTERNS: &[&str] = &[
    // languages
    r"\bjavascript\b",
    r"\btypescript\b",
    r"\bpython\b",
    r"\bjava\b",
    r"\bc\+\+",
    r"\bc#",
    r"\bgolang\b",
    r"\brust\b",
    r"\bruby\b",
    r"\bphp\b",
    r"\bswift\b",
    r"\bkotlin\b",
    r"\bscala\b",
    r"\bsql\b",
    r"\bhtml5?\b",
    r"\bcss3?\b",
    // frameworks and libraries
    r"\breact(?:\.js)?\b",
    r"\bangular\b",
    r"\bvue(?:\.js)?\b",
    r"\bnode(?:\.js)?\b",
    r"\bnext\.js\b",
    r"\bexpress(?:\.js)?\b",
    r"\bdjango\b",
    r"\bflask\b",
    r"\bspring boot\b",
    r"\bruby on rails\b",
    r"\.net\b",
    r"\bsvelte\b",
    r"\btailwind\b",
    r"\bgraphql\b",
    r"\brest(?:ful)? apis?\b",
    r"\btensorflow\b",
    r"\bpytorch\b",
    r"\bpandas\b",
    r"\bnumpy\b",
    // data stores and messaging
    r"\bpostgres(?:ql)?\b",
    r"\bmysql\b",
    r"\bmongodb\b",
    r"\bredis\b",
    r"\bsqlite\b",
    r"\belasticsearch\b",
    r"\bdynamodb\b",
    r"\bcassandra\b",
    r"\bkafka\b",
    r"\brabbitmq\b",
    // cloud and devops
    r"\baws\b",
    r"\bazure\b",
    r"\bgcp\b",
    r"\bgoogle cloud\b",
    r"\bdocker\b",
    r"\bkubernetes\b",
    r"\bk8s\b",
    r"\bterraform\b",
    r"\bansible\b",
    r"\bjenkins\b",
    r"\bgithub actions\b",
    r"\bci/cd\b",
    r"\bgit\b",
    r"\blinux\b",
    // methodology
    r"\bagile\b",
    r"\bscrum\b",
    r"\bkanban\b",
    r"\bdevops\b",
    r"\btdd\b",
    r"\bmicroservices\b",
    r"\bmachine learning\b",
];

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Compiled keyword and skill matchers.
pub struct KeywordExtractor {
    token: Regex,
    capitalized_phrase: Regex,
    skill_patterns: Vec<Regex>,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordExtractor {
    pub fn new() -> Self {
        Self {
            token: Regex::new(r"\b[a-z]{2,}\b").expect("Invalid token regex"),
            capitalized_phrase: Regex::new(r"\b[A-Z][a-zA-Z]*(?:[ \t]+[A-Z][a-zA-Z]*){0,2}\b")
                .expect("Invalid capitalized phrase regex"),
            skill_patterns: SKILL_PATTERNS
                .iter()
                .map(|p| Regex::new(&format!("(?i){p}")).expect("Invalid skill regex"))
                .collect(),
        }
    }

    /// Ranks the repeated, non-stop-word tokens of `text`.
    ///
    /// Tokens are runs of two or more letters, compared case-insensitively.
    /// Only tokens seen at least `MIN_KEYWORD_FREQUENCY` times are kept,
    /// ordered by frequency with ties in first-seen order, capped at
    /// `MAX_KEYWORDS`.
    pub fn extract_keywords(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();

        // token -> (count, first position)
        let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
        for (position, token) in self
            .token
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|t| !is_stop_word(t))
            .enumerate()
        {
            counts.entry(token).or_insert((0, position)).0 += 1;
        }

        let mut ranked: Vec<(&str, usize, usize)> = counts
            .into_iter()
            .filter(|(_, (count, _))| *count >= MIN_KEYWORD_FREQUENCY)
            .map(|(token, (count, first))| (token, count, first))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        ranked
            .into_iter()
            .take(MAX_KEYWORDS)
            .map(|(token, _, _)| token.to_string())
            .collect()
    }

    /// Collects technical-skill terms: every hit of the fixed skill library
    /// plus short capitalised phrases (1–3 words, 3–20 characters) that may
    /// name a product or tool. Case-folded and deduplicated.
    ///
    /// Expects the original-case text; the phrase heuristic relies on it.
    pub fn extract_technical_skills(&self, text: &str) -> BTreeSet<String> {
        let mut skills = BTreeSet::new();

        for pattern in &self.skill_patterns {
            for m in pattern.find_iter(text) {
                skills.insert(m.as_str().to_lowercase());
            }
        }

        for m in self.capitalized_phrase.find_iter(text) {
            let phrase = m.as_str().split_whitespace().collect::<Vec<_>>().join(" ");
            let len = phrase.chars().count();
            if !(MIN_PHRASE_CHARS..=MAX_PHRASE_CHARS).contains(&len) {
                continue;
            }
            let lowered = phrase.to_lowercase();
            if lowered.split(' ').all(is_stop_word) {
                continue;
            }
            skills.insert(lowered);
        }

        skills
    }
}
