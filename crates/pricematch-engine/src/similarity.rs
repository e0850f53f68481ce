//! Case-insensitive name similarity (Ratcliff/Obershelp "gestalt" matching).
//!
//! The score is `2 * M / T`, where `T` is the total number of characters in
//! both strings and `M` the number of characters in matching blocks. Blocks
//! are found by taking the longest common substring, then recursing on the
//! unmatched text to its left and right. Scores lie in `[0.0, 1.0]`.

/// Similarity ratio of two names, ignoring case.
#[must_use]
pub fn name_similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    ratio(&a, &b)
}

#[allow(clippy::cast_precision_loss)]
fn ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    (2 * matching_characters(a, b)) as f64 / total as f64
}

fn matching_characters(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_match(a, b, alo, ahi, blo, bhi);
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

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]` as
/// `(start_a, start_b, len)`. Ties go to the block starting earliest in `a`,
/// then earliest in `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    // run[j + 1] = length of the common run ending at a[i - 1], b[j]
    let mut previous = vec![0usize; b.len() + 1];
    let mut current = vec![0usize; b.len() + 1];

    for i in alo..ahi {
        for j in blo..bhi {
            current[j + 1] = if a[i] == b[j] { previous[j] + 1 } else { 0 };
            let k = current[j + 1];
            if k > best_size {
                best_i = i + 1 - k;
                best_j = j + 1 - k;
                best_size = k;
            }
        }
        std::mem::swap(&mut previous, &mut current);
        current[blo..=bhi].fill(0);
    }

    (best_i, best_j, best_size)
}
