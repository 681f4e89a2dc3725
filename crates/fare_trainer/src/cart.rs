//! CART (Classification and Regression Tree) builder
//!
//! Implements exact-greedy regression tree construction. For every candidate
//! feature the node's samples are sorted by value and swept once, scoring
//! each boundary between distinct values by its reduction in squared error.
//! Thresholds sit at the midpoint between the two neighbouring values.

use fare_core::forest::{Node, Tree};

use crate::deterministic::LcgRng;

/// Training parameters for a single tree
#[derive(Clone, Debug)]
pub struct TreeConfig {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features considered per split; `None` means all of them
    pub max_features: Option<usize>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 32,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
        }
    }
}

/// Best split found for a node
#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature_idx: usize,
    threshold: f64,
    gain: f64,
}

/// Build a regression tree over a sample of encoded rows
pub struct CartBuilder<'a> {
    config: &'a TreeConfig,
    rows: &'a [Vec<f64>],
    targets: &'a [f64],
    feature_count: usize,
}

impl<'a> CartBuilder<'a> {
    pub fn new(rows: &'a [Vec<f64>], targets: &'a [f64], config: &'a TreeConfig) -> Self {
        debug_assert_eq!(rows.len(), targets.len());
        let feature_count = rows.first().map_or(0, Vec::len);
        Self {
            config,
            rows,
            targets,
            feature_count,
        }
    }

    /// Build a tree over `sample` (row indices, duplicates allowed)
    pub fn build(&self, sample: &[usize], rng: &mut LcgRng) -> Tree {
        let mut nodes = Vec::new();
        if sample.is_empty() {
            nodes.push(Node::leaf(0, 0.0));
        } else {
            self.build_node(sample, 0, &mut nodes, rng);
        }
        Tree::new(nodes)
    }

    /// Recursively build tree nodes in pre-order; returns this node's index
    fn build_node(
        &self,
        indices: &[usize],
        depth: usize,
        nodes: &mut Vec<Node>,
        rng: &mut LcgRng,
    ) -> i32 {
        let current_idx = nodes.len() as i32;
        let leaf_value = self.mean_target(indices);

        // Check stopping conditions
        if depth >= self.config.max_depth
            || indices.len() < self.config.min_samples_split
            || indices.len() < 2 * self.config.min_samples_leaf
            || self.is_pure(indices)
        {
            nodes.push(Node::leaf(current_idx, leaf_value));
            return current_idx;
        }

        let Some(split) = self.find_best_split(indices, rng) else {
            nodes.push(Node::leaf(current_idx, leaf_value));
            return current_idx;
        };

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&idx| self.rows[idx][split.feature_idx] <= split.threshold);

        // Reserve space for current node
        nodes.push(Node::internal(
            current_idx,
            split.feature_idx as i32,
            split.threshold,
            -1,
            -1,
        ));

        let left_idx = self.build_node(&left_indices, depth + 1, nodes, rng);
        let right_idx = self.build_node(&right_indices, depth + 1, nodes, rng);

        let node = &mut nodes[current_idx as usize];
        node.left = left_idx;
        node.right = right_idx;

        current_idx
    }

    fn candidate_features(&self, rng: &mut LcgRng) -> Vec<usize> {
        match self.config.max_features {
            Some(k) if k < self.feature_count => {
                rng.choose_features(self.feature_count, k.max(1))
            }
            _ => (0..self.feature_count).collect(),
        }
    }

    /// Exact-greedy search; a later candidate must be strictly better to win
    fn find_best_split(&self, indices: &[usize], rng: &mut LcgRng) -> Option<SplitCandidate> {
        let n = indices.len();
        let min_leaf = self.config.min_samples_leaf.max(1);
        let total_sum: f64 = indices.iter().map(|&i| self.targets[i]).sum();
        let parent_score = total_sum * total_sum / n as f64;

        let mut best: Option<SplitCandidate> = None;
        let mut column: Vec<(f64, f64)> = Vec::with_capacity(n);

        for feature_idx in self.candidate_features(rng) {
            column.clear();
            column.extend(
                indices
                    .iter()
                    .map(|&i| (self.rows[i][feature_idx], self.targets[i])),
            );
            column.sort_by(|a, b| a.0.total_cmp(&b.0));

            if column[0].0 == column[n - 1].0 {
                continue;
            }

            let mut left_sum = 0.0;
            for i in 1..n {
                left_sum += column[i - 1].1;
                let (prev, next) = (column[i - 1].0, column[i].0);
                if prev == next || i < min_leaf || n - i < min_leaf {
                    continue;
                }

                let right_sum = total_sum - left_sum;
                let gain = left_sum * left_sum / i as f64
                    + right_sum * right_sum / (n - i) as f64
                    - parent_score;

                if best.map_or(true, |b| gain > b.gain) {
                    best = Some(SplitCandidate {
                        feature_idx,
                        threshold: midpoint(prev, next),
                        gain,
                    });
                }
            }
        }

        best.filter(|split| split.gain > 0.0)
    }

    fn mean_target(&self, indices: &[usize]) -> f64 {
        if indices.is_empty() {
            return 0.0;
        }
        indices.iter().map(|&i| self.targets[i]).sum::<f64>() / indices.len() as f64
    }

    fn is_pure(&self, indices: &[usize]) -> bool {
        let first = self.targets[indices[0]];
        indices.iter().all(|&i| self.targets[i] == first)
    }
}

/// Midpoint that still separates `lo` from `hi` under `<=`
fn midpoint(lo: f64, hi: f64) -> f64 {
    let mid = lo + (hi - lo) / 2.0;
    if mid < hi {
        mid
    } else {
        lo
    }
}
