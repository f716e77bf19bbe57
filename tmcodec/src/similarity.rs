//! Normalized string similarity used by fuzzy search.
//!
//! The score is `2 * M / T`, where `T` is the combined character count of
//! both strings and `M` is the number of characters covered by greedy,
//! recursive longest-common-block matching: find the longest common
//! substring, then repeat on the fragments to its left and to its right.

/// A common block: `a[a_start..a_start + len] == b[b_start..b_start + len]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub a_start: usize,
    pub b_start: usize,
    pub len: usize,
}

/// Case-insensitive similarity ratio in `[0.0, 1.0]`.
///
/// Two empty strings are identical and score `1.0`.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched: usize = blocks(&a, &b).iter().map(|block| block.len).sum();
    2.0 * matched as f64 / total as f64
}

/// Matching blocks between `a` and `b` (case-sensitive, in char offsets),
/// ordered by position.
pub fn matching_blocks(a: &str, b: &str) -> Vec<Block> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    blocks(&a, &b)
}

fn blocks(a: &[char], b: &[char]) -> Vec<Block> {
    let mut found = Vec::new();
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((a_lo, a_hi, b_lo, b_hi)) = pending.pop() {
        let block = longest_block(a, b, a_lo, a_hi, b_lo, b_hi);
        if block.len == 0 {
            continue;
        }
        if a_lo < block.a_start && b_lo < block.b_start {
            pending.push((a_lo, block.a_start, b_lo, block.b_start));
        }
        let a_end = block.a_start + block.len;
        let b_end = block.b_start + block.len;
        if a_end < a_hi && b_end < b_hi {
            pending.push((a_end, a_hi, b_end, b_hi));
        }
        found.push(block);
    }

    found.sort_by_key(|block| (block.a_start, block.b_start));
    found
}

/// Longest common substring of `a[a_lo..a_hi]` and `b[b_lo..b_hi]`.
///
/// Ties go to the block starting earliest in `a`, then earliest in `b`.
fn longest_block(
    a: &[char],
    b: &[char],
    a_lo: usize,
    a_hi: usize,
    b_lo: usize,
    b_hi: usize,
) -> Block {
    let mut best = Block {
        a_start: a_lo,
        b_start: b_lo,
        len: 0,
    };
    let width = b_hi - b_lo;
    // run[j + 1] = length of the common run ending at the current a[i] and b[b_lo + j]
    let mut prev = vec![0usize; width + 1];
    let mut run = vec![0usize; width + 1];

    for i in a_lo..a_hi {
        for j in 0..width {
            run[j + 1] = if a[i] == b[b_lo + j] { prev[j] + 1 } else { 0 };
            let len = run[j + 1];
            if len > best.len {
                best = Block {
                    a_start: i + 1 - len,
                    b_start: b_lo + j + 1 - len,
                    len,
                };
            }
        }
        std::mem::swap(&mut prev, &mut run);
    }

    best
}
