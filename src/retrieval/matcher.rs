use std::collections::HashMap;

/// Below this length no element of the second sequence is treated as popular.
const POPULAR_MIN_LEN: usize = 200;

/// Similarity between character sequences based on matching blocks.
///
/// The second sequence (`b`) is indexed once; the first (`a`) can be swapped
/// cheaply with [`SequenceMatcher::set_first`], which is how a single query
/// is compared against many candidates.
pub struct SequenceMatcher {
    a: Vec<char>,
    b: Vec<char>,
    /// Positions of each element of `b`, popular elements removed.
    b2j: HashMap<char, Vec<usize>>,
    /// Element counts of `b`, for the multiset bound.
    b_counts: HashMap<char, usize>,
}

impl SequenceMatcher {
    pub fn new(a: &str, b: &str) -> Self {
        let b: Vec<char> = b.chars().collect();

        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
        }
        let b_counts = b2j.iter().map(|(&c, js)| (c, js.len())).collect();

        if b.len() >= POPULAR_MIN_LEN {
            let limit = b.len() / 100 + 1;
            b2j.retain(|_, js| js.len() <= limit);
        }

        Self {
            a: a.chars().collect(),
            b,
            b2j,
            b_counts,
        }
    }

    pub fn set_first(&mut self, a: &str) {
        self.a = a.chars().collect();
    }

    /// Longest matching block in `a[alo..ahi]` and `b[blo..bhi]` as `(i, j, size)`.
    /// Ties go to the block starting earliest in `a`, then earliest in `b`.
    fn longest_match(
        &self,
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);

        // j2len[j] = length of the longest block ending at a[i-1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(js) = self.b2j.get(&self.a[i]) {
                for &j in js {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = next;
        }

        // Popular elements never seed a block; grow across them here.
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

    /// Total size of all matching blocks.
    fn matched(&self) -> usize {
        let mut total = 0;
        let mut pending = vec![(0, self.a.len(), 0, self.b.len())];
        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let (i, j, k) = self.longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            total += k;
            if alo < i && blo < j {
                pending.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                pending.push((i + k, ahi, j + k, bhi));
            }
        }
        total
    }

    fn scaled(&self, matches: usize) -> f64 {
        let len = self.a.len() + self.b.len();
        if len == 0 {
            1.0
        } else {
            2.0 * matches as f64 / len as f64
        }
    }

    /// Similarity in `[0, 1]`.
    pub fn ratio(&self) -> f64 {
        self.scaled(self.matched())
    }

    /// Upper bound on [`ratio`](Self::ratio) from shared element counts.
    pub fn quick_ratio(&self) -> f64 {
        let mut avail: HashMap<char, usize> = HashMap::new();
        let mut matches = 0;
        for c in &self.a {
            let left = avail
                .entry(*c)
                .or_insert_with(|| self.b_counts.get(c).copied().unwrap_or(0));
            if *left > 0 {
                *left -= 1;
                matches += 1;
            }
        }
        self.scaled(matches)
    }

    /// Upper bound on [`ratio`](Self::ratio) from lengths alone.
    pub fn real_quick_ratio(&self) -> f64 {
        self.scaled(self.a.len().min(self.b.len()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloseMatch<'a> {
    pub text: &'a str,
    pub score: f64,
}

/// Up to `n` candidates whose similarity to `word` is at least `cutoff`,
/// best first. Equal scores keep candidate order.
pub fn close_matches<'a>(
    word: &str,
    candidates: &[&'a str],
    n: usize,
    cutoff: f64,
) -> Vec<CloseMatch<'a>> {
    if n == 0 {
        return Vec::new();
    }

    let mut matcher = SequenceMatcher::new("", word);
    let mut found = Vec::new();
    for &candidate in candidates {
        matcher.set_first(candidate);
        if matcher.real_quick_ratio() >= cutoff && matcher.quick_ratio() >= cutoff {
            let score = matcher.ratio();
            if score >= cutoff {
                found.push(CloseMatch {
                    text: candidate,
                    score,
                });
            }
        }
    }

    // Stable sort keeps candidate order among equal scores.
    found.sort_by(|x, y| y.score.total_cmp(&x.score));
    found.truncate(n);
    found
}
