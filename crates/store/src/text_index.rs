use dex_protocol::Record;
use std::collections::HashMap;

/// Inverted index over each record's search text.
///
/// Scoring weights term frequency against document length:
/// `sum over matched query terms of (0.5 * count / doc_len + 0.5)`.
pub struct TextIndex {
    postings: HashMap<String, Vec<(usize, u32)>>,
    doc_lens: Vec<usize>,
}

impl TextIndex {
    /// Build the index; positions refer to the slice order.
    pub fn build(records: &[Record]) -> Self {
        let mut postings: HashMap<String, Vec<(usize, u32)>> = HashMap::new();
        let mut doc_lens = Vec::with_capacity(records.len());

        for (pos, record) in records.iter().enumerate() {
            let tokens = tokenize(record.search_text());
            doc_lens.push(tokens.len());

            let mut counts: HashMap<String, u32> = HashMap::new();
            for token in tokens {
                *counts.entry(token).or_insert(0) += 1;
            }
            for (term, count) in counts {
                postings.entry(term).or_default().push((pos, count));
            }
        }

        for list in postings.values_mut() {
            list.sort_unstable_by_key(|(pos, _)| *pos);
        }

        log::debug!(
            "Built text index: {} records, {} terms",
            doc_lens.len(),
            postings.len()
        );

        Self { postings, doc_lens }
    }

    /// Returns (position, score) for every record containing at least one
    /// query term, sorted by score descending then position ascending.
    pub fn search(&self, text: &str) -> Vec<(usize, f64)> {
        let mut terms = tokenize(text);
        terms.sort();
        terms.dedup();

        let mut scores: HashMap<usize, f64> = HashMap::new();
        for term in &terms {
            let Some(list) = self.postings.get(term) else {
                continue;
            };
            for &(pos, count) in list {
                let doc_len = self.doc_lens.get(pos).copied().unwrap_or(1).max(1);
                let weight = 0.5 * f64::from(count) / doc_len as f64 + 0.5;
                *scores.entry(pos).or_insert(0.0) += weight;
            }
        }

        let mut ranked: Vec<(usize, f64)> = scores.into_iter().collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked
    }

    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    pub fn len(&self) -> usize {
        self.doc_lens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_lens.is_empty()
    }
}

/// Lowercase and split on anything that is not alphanumeric.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}
