//! Edit distance and the fuzzy acceptance policy.
//!
//! Distances are computed over `char`s with a rolling two-row table sized by
//! the shorter input, so memory stays `O(min(len(a), len(b)))`.

/// Maximum edit distance tolerated for a query term of the given length.
///
/// Terms of up to 5 characters tolerate one edit, 6 to 10 tolerate two and
/// anything longer tolerates three.
pub fn max_distance_for(term: &str) -> usize {
    match term.chars().count() {
        0..=5 => 1,
        6..=10 => 2,
        _ => 3,
    }
}

/// Classic Levenshtein distance (insert, delete and substitute all cost 1).
pub fn edit_distance(a: &str, b: &str) -> usize {
    let (short, long) = ordered_by_len(a, b);
    if short.is_empty() {
        return long.len();
    }

    let mut prev: Vec<usize> = (0..=short.len()).collect();
    let mut curr = vec![0usize; short.len() + 1];

    for (i, lc) in long.iter().enumerate() {
        curr[0] = i + 1;
        for (j, sc) in short.iter().enumerate() {
            let cost = usize::from(lc != sc);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[short.len()]
}

/// Edit distance if it is at most `max_distance`, `None` otherwise.
///
/// Stops as soon as every cell of a row exceeds the bound.
pub fn bounded_edit_distance(a: &str, b: &str, max_distance: usize) -> Option<usize> {
    let (short, long) = ordered_by_len(a, b);
    if long.len() - short.len() > max_distance {
        return None;
    }
    if short.is_empty() {
        return Some(long.len());
    }

    let mut prev: Vec<usize> = (0..=short.len()).collect();
    let mut curr = vec![0usize; short.len() + 1];

    for (i, lc) in long.iter().enumerate() {
        curr[0] = i + 1;
        let mut row_min = curr[0];
        for (j, sc) in short.iter().enumerate() {
            let cost = usize::from(lc != sc);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
            row_min = row_min.min(curr[j + 1]);
        }
        if row_min > max_distance {
            return None;
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    let distance = prev[short.len()];
    (distance <= max_distance).then_some(distance)
}

/// Whether `candidate` is within `max_distance` edits of `query_term`.
///
/// Both inputs are expected to be normalized already.
pub fn is_fuzzy_match(query_term: &str, candidate: &str, max_distance: usize) -> bool {
    bounded_edit_distance(query_term, candidate, max_distance).is_some()
}

fn ordered_by_len(a: &str, b: &str) -> (Vec<char>, Vec<char>) {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.len() <= b.len() { (a, b) } else { (b, a) }
}
