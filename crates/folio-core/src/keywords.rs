//! Trend keyword extraction from cast text

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::models::FarcasterTrendKeyword;
use crate::ranking::top_by_score;

pub const KEYWORD_LIMIT: usize = 6;
const MIN_TERM_LEN: usize = 3;

pub const KEYWORD_STOPWORDS: &[&str] = &[
    "about", "after", "also", "been", "before", "build", "check", "from", "have", "just", "like",
    "maybe", "more", "need", "only", "that", "this", "their", "them", "they", "what", "when",
    "where", "which", "with", "would", "your",
];

fn url_pattern() -> &'static Regex {
    static URL_RE: OnceLock<Regex> = OnceLock::new();
    URL_RE.get_or_init(|| Regex::new(r"https?://\S+").expect("valid url regex"))
}

fn token_pattern() -> &'static Regex {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    TOKEN_RE.get_or_init(|| Regex::new(r"[#$]?[a-z0-9]{3,}").expect("valid token regex"))
}

/// Lowercase terms from one text: URLs stripped, optional `#`/`$` prefix kept.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let stripped = url_pattern().replace_all(&lowered, " ");

    token_pattern()
        .find_iter(&stripped)
        .map(|m| m.as_str().to_string())
        .filter(|term| is_keyword(term))
        .collect()
}

fn is_keyword(term: &str) -> bool {
    term.len() >= MIN_TERM_LEN
        && !KEYWORD_STOPWORDS.contains(&term)
        && !term.chars().all(|c| c.is_ascii_digit())
}

/// Most frequent terms across `texts`. Equal counts keep first-seen order.
pub fn extract_trend_keywords<'a>(texts: impl IntoIterator<Item = &'a str>) -> Vec<FarcasterTrendKeyword> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<FarcasterTrendKeyword> = Vec::new();

    for text in texts {
        for term in tokenize(text) {
            match index.get(&term) {
                Some(&slot) => counts[slot].mentions += 1,
                None => {
                    index.insert(term.clone(), counts.len());
                    counts.push(FarcasterTrendKeyword { term, mentions: 1 });
                }
            }
        }
    }

    top_by_score(counts, KEYWORD_LIMIT, |k| f64::from(k.mentions))
}
