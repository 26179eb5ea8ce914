//! Symmetric vertex orbits
//!
//! A polychoron's vertices are generated from a few seed tuples by applying
//! every permutation of the coordinates (optionally restricted by parity)
//! and every pattern of sign changes. The deduplicated union is the point
//! cloud handed to the convex hull.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use polychora_math::Vec4;
use serde::{Deserialize, Serialize};

use crate::error::BuildError;

/// Which coordinate arrangements a seed expands to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    #[default]
    All,
    Even,
    Odd,
}

/// One group of orbit generators
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PermutationSeed {
    pub values: Vec<f32>,
    #[serde(default)]
    pub with_sign_changes: bool,
    #[serde(default)]
    pub parity: Parity,
}

impl PermutationSeed {
    pub fn new(values: impl Into<Vec<f32>>, with_sign_changes: bool, parity: Parity) -> Self {
        Self {
            values: values.into(),
            with_sign_changes,
            parity,
        }
    }

    /// All arrangements plus all sign changes
    pub fn all(values: impl Into<Vec<f32>>) -> Self {
        Self::new(values, true, Parity::All)
    }

    /// Even arrangements plus all sign changes
    pub fn even(values: impl Into<Vec<f32>>) -> Self {
        Self::new(values, true, Parity::Even)
    }
}

/// A tuple of orbit coordinates, totally ordered so it can live in a set
#[derive(Clone, Debug)]
pub struct OrbitPoint(pub Vec<f32>);

impl OrbitPoint {
    fn new(mut values: Vec<f32>) -> Self {
        // -0.0 and 0.0 are the same point
        for v in values.iter_mut() {
            if *v == 0.0 {
                *v = 0.0;
            }
        }
        Self(values)
    }

    pub fn to_vec4(&self) -> Result<Vec4, BuildError> {
        match self.0[..] {
            [x, y, z, w] => Ok(Vec4::new(x, y, z, w)),
            _ => Err(BuildError::MalformedTuple { len: self.0.len() }),
        }
    }
}

impl PartialEq for OrbitPoint {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OrbitPoint {}

impl PartialOrd for OrbitPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrbitPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.0.iter().zip(other.0.iter()) {
            match a.total_cmp(b) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        self.0.len().cmp(&other.0.len())
    }
}

/// Duplicate-free set of orbit points, in lexicographic order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrbitSet {
    points: BTreeSet<OrbitPoint>,
}

impl OrbitSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tuple; returns false if an equal tuple was already present
    pub fn insert(&mut self, values: Vec<f32>) -> bool {
        self.points.insert(OrbitPoint::new(values))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn contains(&self, values: &[f32]) -> bool {
        self.points.contains(&OrbitPoint::new(values.to_vec()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &[f32]> {
        self.points.iter().map(|p| p.0.as_slice())
    }

    /// Convert every tuple to a 4D point, failing on the first tuple of the
    /// wrong arity
    pub fn to_vec4s(&self) -> Result<Vec<Vec4>, BuildError> {
        self.points.iter().map(OrbitPoint::to_vec4).collect()
    }

    pub fn extend(&mut self, other: OrbitSet) {
        self.points.extend(other.points);
    }
}

/// Every subset of `set`, starting with the empty set.
///
/// Subsets come out in binary counting order: bit `i` of the counter selects
/// `set[i]`.
pub fn powerset<T: Clone>(set: &[T]) -> Vec<Vec<T>> {
    let n = set.len();
    (0..1usize << n)
        .map(|mask| {
            (0..n)
                .filter(|i| mask & (1 << i) != 0)
                .map(|i| set[i].clone())
                .collect()
        })
        .collect()
}

/// Rearrange `values` into the lexicographically next arrangement.
/// Returns false (leaving `values` sorted ascending) after the last one.
fn next_permutation(values: &mut [f32]) -> bool {
    let n = values.len();
    if n < 2 {
        return false;
    }
    let mut i = n - 1;
    while i > 0 && values[i - 1] >= values[i] {
        i -= 1;
    }
    if i == 0 {
        values.reverse();
        return false;
    }
    let mut j = n - 1;
    while values[j] <= values[i - 1] {
        j -= 1;
    }
    values.swap(i - 1, j);
    values[i..].reverse();
    true
}

fn is_even_arrangement(values: &[f32]) -> bool {
    let mut inversions = 0usize;
    for i in 0..values.len() {
        for j in i + 1..values.len() {
            if values[i] > values[j] {
                inversions += 1;
            }
        }
    }
    inversions % 2 == 0
}

/// Distinct arrangements of `values` with the requested parity, in
/// lexicographic order.
///
/// With a repeated value any arrangement can be reached by both an even and
/// an odd permutation (swap the equal entries), so every parity then yields
/// every arrangement.
pub fn permutations_of(values: &[f32], parity: Parity) -> Vec<Vec<f32>> {
    let mut current = values.to_vec();
    current.sort_by(f32::total_cmp);

    let has_repeats = current.windows(2).any(|w| w[0] == w[1]);
    let keep = |arrangement: &[f32]| match parity {
        Parity::All => true,
        _ if has_repeats => true,
        Parity::Even => is_even_arrangement(arrangement),
        Parity::Odd => !is_even_arrangement(arrangement),
    };

    let mut out = Vec::new();
    loop {
        if keep(&current) {
            out.push(current.clone());
        }
        if !next_permutation(&mut current) {
            break;
        }
    }
    out
}

/// Expand a single seed into its orbit
pub fn expand(seed: &PermutationSeed) -> OrbitSet {
    let mut set = OrbitSet::new();
    let arrangements = permutations_of(&seed.values, seed.parity);

    if !seed.with_sign_changes {
        for arrangement in arrangements {
            set.insert(arrangement);
        }
        return set;
    }

    let positions: Vec<usize> = (0..seed.values.len()).collect();
    let sign_patterns = powerset(&positions);
    for arrangement in &arrangements {
        for pattern in &sign_patterns {
            let mut flipped = arrangement.clone();
            for &i in pattern {
                flipped[i] = -flipped[i];
            }
            set.insert(flipped);
        }
    }
    set
}

/// Union of the orbits of all seeds
pub fn generate(seeds: &[PermutationSeed]) -> OrbitSet {
    let mut set = OrbitSet::new();
    for seed in seeds {
        set.extend(expand(seed));
    }
    log::debug!("Generated {} orbit points from {} seeds", set.len(), seeds.len());
    set
}
