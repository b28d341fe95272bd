//! Approximate matching over a rolling edit-distance column.
//!
//! Column `j` holds, for each pattern prefix `pattern[..i]`, the smallest edit
//! distance to any substring of `text` ending at `j`. Row 0 is always zero,
//! which lets a match start anywhere. Each cell also carries the start offset
//! of the alignment that produced it, so a reported match always comes with
//! a real `[start, end)` span whose distance equals its error count.
//!
//! Cells beyond the deepest row still within budget cannot come back under
//! it (the diagonal never decreases), so they are skipped and pinned to
//! `max_errors + 1`.

use super::Match;

/// Every end position in `text` where `pattern` matches with at most
/// `max_errors` errors, in order of end offset.
///
/// Only end offsets `1..=text.len()` are considered. When `max_errors` is at
/// least the pattern length, a reported span may be empty.
pub fn search_approx(text: &[char], pattern: &[char], max_errors: usize) -> Vec<Match> {
    let m = pattern.len();
    if m == 0 || text.is_empty() {
        return Vec::new();
    }

    let cap = max_errors.saturating_add(1);

    let mut prev_dist: Vec<usize> = (0..=m).map(|i| i.min(cap)).collect();
    let mut prev_start = vec![0usize; m + 1];
    let mut dist = vec![cap; m + 1];
    let mut start = vec![0usize; m + 1];

    // Deepest row whose distance is within budget in the previous column.
    let mut active = m.min(max_errors);
    let mut matches = Vec::new();

    for (j, &ch) in text.iter().enumerate() {
        let end = j + 1;
        dist[0] = 0;
        start[0] = end;

        let limit = active.saturating_add(1).min(m);
        for i in 1..=limit {
            let substitute = prev_dist[i - 1].saturating_add(usize::from(pattern[i - 1] != ch));
            let skip_pattern = dist[i - 1].saturating_add(1);
            let skip_text = prev_dist[i].saturating_add(1);

            let (best, from) = if substitute <= skip_pattern && substitute <= skip_text {
                (substitute, prev_start[i - 1])
            } else if skip_pattern <= skip_text {
                (skip_pattern, start[i - 1])
            } else {
                (skip_text, prev_start[i])
            };

            dist[i] = best.min(cap);
            start[i] = from;
        }
        for cell in dist.iter_mut().skip(limit + 1) {
            *cell = cap;
        }

        let mut row = limit;
        while row > 0 && dist[row] > max_errors {
            row -= 1;
        }
        active = row;

        if dist[m] <= max_errors {
            matches.push(Match {
                start: start[m],
                end,
                errors: dist[m],
            });
        }

        std::mem::swap(&mut prev_dist, &mut dist);
        std::mem::swap(&mut prev_start, &mut start);
    }

    matches
}

/// Smallest edit distance between `pattern` and any substring of `text`
/// (the empty substring included, so the result never exceeds the pattern
/// length).
pub fn min_distance(text: &[char], pattern: &[char]) -> usize {
    let m = pattern.len();
    if m == 0 {
        return 0;
    }

    let mut prev: Vec<usize> = (0..=m).collect();
    let mut cur = vec![0usize; m + 1];
    let mut best = m;

    for &ch in text {
        cur[0] = 0;
        for i in 1..=m {
            let substitute = prev[i - 1] + usize::from(pattern[i - 1] != ch);
            cur[i] = substitute.min(prev[i] + 1).min(cur[i - 1] + 1);
        }
        best = best.min(cur[m]);
        if best == 0 {
            break;
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    best
}
