//! Registry of known polychora and their orbit seeds
//!
//! Each polychoron maps to the seed groups whose combined orbit is its vertex
//! set. Nothing here is cached: seeds are rebuilt on every call.

use serde::{Deserialize, Serialize};

use crate::combinatorics::{self, OrbitSet, Parity, PermutationSeed};

/// The golden ratio
pub const PHI: f32 = 1.618_034;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polychoron {
    /// Tesseract, 16 vertices
    Cell8,
    /// Dual of the tesseract, 8 vertices
    Cell16,
    Cell24,
    Cell120,
    Cell600,
    BitruncatedTesseract,
    Cantellated24Cell,
    /// Caller-supplied seeds
    Custom {
        name: String,
        seeds: Vec<PermutationSeed>,
    },
}

impl Polychoron {
    /// The five regular polychora (the 5-cell is not an orbit of this group)
    pub const REGULAR: [Polychoron; 5] = [
        Polychoron::Cell8,
        Polychoron::Cell16,
        Polychoron::Cell24,
        Polychoron::Cell120,
        Polychoron::Cell600,
    ];

    /// Every built-in polychoron
    pub const NAMED: [Polychoron; 7] = [
        Polychoron::Cell8,
        Polychoron::Cell16,
        Polychoron::Cell24,
        Polychoron::Cell120,
        Polychoron::Cell600,
        Polychoron::BitruncatedTesseract,
        Polychoron::Cantellated24Cell,
    ];

    /// Look up a built-in polychoron by its [`slug`](Self::slug)
    pub fn from_slug(slug: &str) -> Option<Polychoron> {
        Self::NAMED.into_iter().find(|p| p.slug() == slug)
    }

    pub fn name(&self) -> &str {
        match self {
            Polychoron::Cell8 => "8-cell",
            Polychoron::Cell16 => "16-cell",
            Polychoron::Cell24 => "24-cell",
            Polychoron::Cell120 => "120-cell",
            Polychoron::Cell600 => "600-cell",
            Polychoron::BitruncatedTesseract => "bitruncated tesseract",
            Polychoron::Cantellated24Cell => "cantellated 24-cell",
            Polychoron::Custom { name, .. } => name,
        }
    }

    /// File-system friendly identifier
    pub fn slug(&self) -> String {
        self.name()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .collect()
    }

    pub fn seeds(&self) -> Vec<PermutationSeed> {
        let sqrt2 = std::f32::consts::SQRT_2;
        let sqrt5 = 5.0f32.sqrt();
        let phi_inv = 1.0 / PHI;
        let phi_inv2 = phi_inv * phi_inv;
        let phi_sq = PHI * PHI;

        match self {
            Polychoron::Cell8 => vec![PermutationSeed::all([1.0, 1.0, 1.0, 1.0])],
            Polychoron::Cell16 => vec![PermutationSeed::all([2.0, 0.0, 0.0, 0.0])],
            Polychoron::Cell24 => vec![PermutationSeed::all([1.0, 1.0, 0.0, 0.0])],
            Polychoron::Cell120 => vec![
                PermutationSeed::all([0.0, 0.0, 2.0, 2.0]),
                PermutationSeed::all([1.0, 1.0, 1.0, sqrt5]),
                PermutationSeed::all([phi_inv2, PHI, PHI, PHI]),
                PermutationSeed::all([phi_inv, phi_inv, phi_inv, phi_sq]),
                PermutationSeed::even([0.0, phi_inv2, 1.0, phi_sq]),
                PermutationSeed::even([0.0, phi_inv, PHI, sqrt5]),
                PermutationSeed::even([phi_inv, 1.0, PHI, 2.0]),
            ],
            Polychoron::Cell600 => vec![
                PermutationSeed::all([0.5, 0.5, 0.5, 0.5]),
                PermutationSeed::all([1.0, 0.0, 0.0, 0.0]),
                PermutationSeed::new([0.0, 0.5 * phi_inv, 0.5, 0.5 * PHI], true, Parity::Even),
            ],
            Polychoron::BitruncatedTesseract => vec![PermutationSeed::all([
                0.0,
                sqrt2,
                2.0 * sqrt2,
                2.0 * sqrt2,
            ])],
            Polychoron::Cantellated24Cell => vec![
                PermutationSeed::all([0.0, sqrt2, sqrt2, 2.0 + 2.0 * sqrt2]),
                PermutationSeed::all([1.0, 1.0 + sqrt2, 1.0 + sqrt2, 1.0 + 2.0 * sqrt2]),
            ],
            Polychoron::Custom { seeds, .. } => seeds.clone(),
        }
    }

    /// The deduplicated vertex orbit
    pub fn orbit(&self) -> OrbitSet {
        let orbit = combinatorics::generate(&self.seeds());
        log::info!("{}: {} orbit points", self.name(), orbit.len());
        orbit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_vertex_counts() {
        let expected = [16, 8, 24, 600, 120];
        for (p, n) in Polychoron::REGULAR.iter().zip(expected) {
            assert_eq!(p.orbit().len(), n, "{}", p.name());
        }
    }

    #[test]
    fn test_seeds_are_rebuilt_each_call() {
        assert_eq!(Polychoron::Cell120.seeds(), Polychoron::Cell120.seeds());
    }

    #[test]
    fn test_slug() {
        assert_eq!(Polychoron::Cantellated24Cell.slug(), "cantellated_24_cell");
        assert_eq!(Polychoron::Cell600.slug(), "600_cell");
    }

    #[test]
    fn test_from_slug() {
        for p in Polychoron::NAMED {
            assert_eq!(Polychoron::from_slug(&p.slug()), Some(p));
        }
        assert_eq!(Polychoron::from_slug("5_cell"), None);
    }

    #[test]
    fn test_custom_passthrough() {
        let p = Polychoron::Custom {
            name: "cross".into(),
            seeds: vec![PermutationSeed::all([1.0, 0.0, 0.0, 0.0])],
        };
        assert_eq!(p.name(), "cross");
        assert_eq!(p.orbit().len(), 8);
    }
}
