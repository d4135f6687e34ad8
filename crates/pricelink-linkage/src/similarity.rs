//! Product-name normalization and gestalt similarity scoring.
//!
//! The ratio is the Ratcliff/Obershelp "gestalt pattern matching" score:
//! repeatedly take the longest common block, recurse on both sides, and
//! report `2 * matched / (len(a) + len(b))`. Lengths are counted in Unicode
//! scalar values so Japanese titles score the same as ASCII ones.

use std::collections::HashMap;

/// Bracket characters removed before comparison.
const STRIPPED_CHARS: &[char] = &['【', '】', '「', '」', '『', '』', '(', ')'];

/// Second sequences at least this long get the popular-element heuristic.
const AUTOJUNK_MIN_LEN: usize = 200;

/// Lowercases, drops decorative brackets, turns `-` and `/` into spaces, and
/// collapses whitespace.
#[must_use]
pub fn normalize_name(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| !STRIPPED_CHARS.contains(c))
        .map(|c| if c == '-' || c == '/' { ' ' } else { c })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Similarity ratio in `[0.0, 1.0]` between two strings, compared as-is.
///
/// Two empty strings are identical (`1.0`). The score is not symmetric in
/// general; `a` is the reference side.
#[must_use]
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched = BlockMatcher::new(&a, &b).matched_len();
    #[allow(clippy::cast_precision_loss)]
    let score = 2.0 * matched as f64 / total as f64;
    score
}

/// Returns `true` if either candidate, once normalized, scores at least
/// `threshold` against the normalized `reference`.
///
/// Two candidates exist because foreign-language listings are compared both
/// as written and in translation.
#[must_use]
pub fn is_similar(reference: &str, candidate: &str, translated: &str, threshold: f64) -> bool {
    let reference = normalize_name(reference);
    [candidate, translated]
        .iter()
        .any(|c| ratio(&reference, &normalize_name(c)) >= threshold)
}

struct BlockMatcher<'a> {
    a: &'a [char],
    b: &'a [char],
    /// Positions of each element of `b`, ascending.
    b2j: HashMap<char, Vec<usize>>,
}

impl<'a> BlockMatcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
        }

        // In long sequences, elements occurring in more than 1% of positions
        // are too common to seed a match. They can still extend one.
        if b.len() >= AUTOJUNK_MIN_LEN {
            let popular_cutoff = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= popular_cutoff);
        }

        Self { a, b, b2j }
    }

    /// Longest common block within `a[alo..ahi]` and `b[blo..bhi]`, as
    /// `(i, j, size)`. Ties resolve to the earliest start in `a`, then in `b`.
    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0usize);
        let mut run_ending_at: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut next_runs: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| run_ending_at.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_runs.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            run_ending_at = next_runs;
        }

        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && self.a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }

        (best_i, best_j, best_size)
    }

    /// Total length of all matching blocks.
    fn matched_len(&self) -> usize {
        let mut pending = vec![(0, self.a.len(), 0, self.b.len())];
        let mut matched = 0;

        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let (i, j, size) = self.longest_match(alo, ahi, blo, bhi);
            if size == 0 {
                continue;
            }
            matched += size;
            if alo < i && blo < j {
                pending.push((alo, i, blo, j));
            }
            if i + size < ahi && j + size < bhi {
                pending.push((i + size, ahi, j + size, bhi));
            }
        }

        matched
    }
}
