//! Selection helpers used by the samplers.

use rand::Rng;

/// Draw `k` distinct indices, each draw weighted among the indices not yet
/// drawn.
///
/// Zero-weight indices are only drawn once every positive weight is used,
/// and then uniformly. Asking for more indices than exist returns all of them.
pub(crate) fn weighted_sample_without_replacement<R: Rng + ?Sized>(
    weights: &[f64],
    k: usize,
    rng: &mut R,
) -> Vec<usize> {
    let mut remaining: Vec<usize> = (0..weights.len()).collect();
    let mut picks = Vec::with_capacity(k.min(weights.len()));

    while picks.len() < k && !remaining.is_empty() {
        let total: f64 = remaining.iter().map(|&i| weights[i]).sum();
        let position = if total > 0.0 {
            let mut target = rng.random::<f64>() * total;
            remaining
                .iter()
                .position(|&i| {
                    let w = weights[i];
                    if w <= 0.0 {
                        return false;
                    }
                    if target < w {
                        return true;
                    }
                    target -= w;
                    false
                })
                .or_else(|| remaining.iter().rposition(|&i| weights[i] > 0.0))
                .unwrap_or(0)
        } else {
            rng.random_range(0..remaining.len())
        };
        picks.push(remaining.remove(position));
    }
    picks
}

/// Pick one index, weighted when `weighted` is set, uniformly otherwise.
pub(crate) fn choose_index<R: Rng + ?Sized>(weights: &[f64], weighted: bool, rng: &mut R) -> usize {
    if weighted {
        weighted_sample_without_replacement(weights, 1, rng)
            .first()
            .copied()
            .unwrap_or(0)
    } else {
        rng.random_range(0..weights.len().max(1))
    }
}

/// Ordered `k`-tuples of distinct indices below `n`, in lexicographic order.
///
/// `k = 0` yields one empty tuple; `k > n` yields nothing.
pub(crate) struct Arrangements {
    n: usize,
    indices: Vec<usize>,
    done: bool,
}

impl Arrangements {
    pub(crate) fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            indices: vec![0; k],
            done: k > n,
        }
    }

    fn advance(&mut self) {
        for i in (0..self.indices.len()).rev() {
            self.indices[i] += 1;
            if self.indices[i] < self.n {
                return;
            }
            self.indices[i] = 0;
        }
        self.done = true;
    }
}

impl Iterator for Arrangements {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let current = self.indices.clone();
            self.advance();
            let distinct = current
                .iter()
                .enumerate()
                .all(|(i, a)| !current[..i].contains(a));
            if distinct {
                return Some(current);
            }
        }
        None
    }
}

/// Every arrangement for each `k` in `min..=max`.
pub(crate) fn arrangements_between(n: usize, min: usize, max: usize) -> impl Iterator<Item = Vec<usize>> {
    (min..=max).flat_map(move |k| Arrangements::new(n, k))
}
