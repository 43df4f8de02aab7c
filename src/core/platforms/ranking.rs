// ─── Search ranking ───

/// Edit distance between two strings (insert, delete, substitute; all cost 1).
///
/// Compares chars, case-sensitively. Two-row DP, so memory is `O(len(b))`.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    if b.is_empty() {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != *cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Order projects by closeness of their name to `query`. Stable, so callers
/// pre-sort by the tiebreak (downloads).
pub fn rank_by_name<T, F>(items: &mut [T], query: &str, name: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by_cached_key(|item| levenshtein(name(item), query));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_basics() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("flaw", "lawn"), 2);
        assert_eq!(levenshtein("forge", "forge"), 0);
    }

    #[test]
    fn distance_is_case_sensitive() {
        assert_eq!(levenshtein("Forge", "forge"), 1);
    }

    #[test]
    fn distance_counts_chars_not_bytes() {
        assert_eq!(levenshtein("café", "cafe"), 1);
    }

    #[test]
    fn ranking_is_stable_for_ties() {
        let mut names = vec!["bbb", "abc", "aaa", "xyz"];
        rank_by_name(&mut names, "abc", |s| s);
        // "bbb" and "aaa" are both distance 2 and keep their relative order.
        assert_eq!(names, vec!["abc", "bbb", "aaa", "xyz"]);
    }
}
