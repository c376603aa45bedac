use dex_protocol::Record;
use serde::{Deserialize, Serialize};

/// Named weight table for the composite similarity score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Multiplier for the query/name similarity ratio.
    pub name: f64,
    pub exact_name_bonus: f64,
    pub prefix_name_bonus: f64,
    pub contains_name_bonus: f64,
    /// Per (token, category) pair on an exact match.
    pub category_exact: f64,
    /// Multiplier for the token/category ratio otherwise.
    pub category_fuzzy: f64,
    pub category_cap: f64,
    /// Multiplier for the query/search-text ratio.
    pub search_text: f64,
    /// Per query token found literally in the search text.
    pub token_hit: f64,
    /// Multiplier for close search-text tokens.
    pub token_fuzzy: f64,
    /// A search-text token counts as close above this ratio.
    pub fuzzy_token_threshold: f64,
    pub char_overlap: f64,
    pub substring_bonus: f64,
    pub max_score: f64,
}

impl ScoreWeights {
    pub const DEFAULT: Self = Self {
        name: 40.0,
        exact_name_bonus: 30.0,
        prefix_name_bonus: 20.0,
        contains_name_bonus: 10.0,
        category_exact: 15.0,
        category_fuzzy: 10.0,
        category_cap: 20.0,
        search_text: 20.0,
        token_hit: 5.0,
        token_fuzzy: 3.0,
        fuzzy_token_threshold: 0.7,
        char_overlap: 10.0,
        substring_bonus: 5.0,
        max_score: 100.0,
    };

    pub(crate) fn fields(&self) -> [(&'static str, f64); 14] {
        [
            ("name", self.name),
            ("exact_name_bonus", self.exact_name_bonus),
            ("prefix_name_bonus", self.prefix_name_bonus),
            ("contains_name_bonus", self.contains_name_bonus),
            ("category_exact", self.category_exact),
            ("category_fuzzy", self.category_fuzzy),
            ("category_cap", self.category_cap),
            ("search_text", self.search_text),
            ("token_hit", self.token_hit),
            ("token_fuzzy", self.token_fuzzy),
            ("fuzzy_token_threshold", self.fuzzy_token_threshold),
            ("char_overlap", self.char_overlap),
            ("substring_bonus", self.substring_bonus),
            ("max_score", self.max_score),
        ]
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Levenshtein edit distance over Unicode scalar values.
#[must_use]
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Two rows of the (len(a)+1) x (len(b)+1) table.
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            curr[j] = if a[i - 1] == b[j - 1] {
                prev[j - 1]
            } else {
                1 + prev[j].min(curr[j - 1]).min(prev[j - 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Case-insensitive similarity in [0, 1]: `1 - distance / max_len`.
/// Two empty strings are identical; one empty string matches nothing.
#[must_use]
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let max_len = a.chars().count().max(b.chars().count());

    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    1.0 - levenshtein(&a, &b) as f64 / max_len as f64
}

/// Fuzzy relevance between a free-text query and a record, bounded to
/// `[0, max_score]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarityScorer {
    weights: ScoreWeights,
}

impl SimilarityScorer {
    #[must_use]
    pub const fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    #[must_use]
    pub const fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    #[must_use]
    pub fn score(&self, query: &str, record: &Record) -> f64 {
        let query = query.trim().to_lowercase();
        let name = record.name.to_lowercase();
        let categories: Vec<String> = record.categories.iter().map(|c| c.to_lowercase()).collect();
        let categories_joined = categories.join(" ");
        let search_text = record.search_text().to_lowercase();
        let tokens: Vec<&str> = query.split_whitespace().collect();

        let total = self.name_channel(&query, &name)
            + self.category_channel(&tokens, &categories)
            + self.search_text_channel(&query, &tokens, &search_text)
            + self.char_overlap_channel(&query, &name, &categories_joined)
            + self.substring_channel(&query, &name);

        total.max(0.0).min(self.weights.max_score)
    }

    fn name_channel(&self, query: &str, name: &str) -> f64 {
        let w = &self.weights;
        let bonus = if name == query {
            w.exact_name_bonus
        } else if name.starts_with(query) {
            w.prefix_name_bonus
        } else if name.contains(query) {
            w.contains_name_bonus
        } else {
            0.0
        };
        similarity_ratio(query, name) * w.name + bonus
    }

    fn category_channel(&self, tokens: &[&str], categories: &[String]) -> f64 {
        let w = &self.weights;
        let mut total = 0.0;
        for token in tokens {
            for category in categories {
                total += if category == token {
                    w.category_exact
                } else {
                    similarity_ratio(token, category) * w.category_fuzzy
                };
            }
        }
        total.min(w.category_cap)
    }

    fn search_text_channel(&self, query: &str, tokens: &[&str], search_text: &str) -> f64 {
        if search_text.is_empty() {
            return 0.0;
        }

        let w = &self.weights;
        let mut total = similarity_ratio(query, search_text) * w.search_text;
        for token in tokens {
            if search_text.contains(token) {
                total += w.token_hit;
                continue;
            }
            for candidate in search_text.split_whitespace() {
                let ratio = similarity_ratio(token, candidate);
                if ratio > w.fuzzy_token_threshold {
                    total += ratio * w.token_fuzzy;
                }
            }
        }
        total
    }

    fn char_overlap_channel(&self, query: &str, name: &str, categories: &str) -> f64 {
        let len = query.chars().count();
        if len == 0 {
            return 0.0;
        }
        let common = query
            .chars()
            .filter(|c| name.contains(*c) || categories.contains(*c))
            .count();
        common as f64 / len as f64 * self.weights.char_overlap
    }

    // Independent of the name bonus tiers, so a prefix or substring hit is
    // rewarded twice.
    // TODO: decide whether the cross-bonus should fold into the name tiers.
    fn substring_channel(&self, query: &str, name: &str) -> f64 {
        if name.contains(query) || query.contains(name) {
            self.weights.substring_bonus
        } else {
            0.0
        }
    }
}
