//! Convex hull collaborator
//!
//! Hull computation itself is delegated to an external solver. This module
//! defines the narrow seam the rest of the crate consumes ([`ConvexHull`]),
//! the result shape ([`HullResult`]), a RON cache format for results, and an
//! adapter that drives the `qhull` executable.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use polychora_math::Vec4;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HullError {
    #[error("hull file I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("could not parse hull file: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("could not serialize hull: {0}")]
    Serialize(#[from] ron::Error),

    #[error("malformed qhull output at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("could not launch `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("qhull exited with {status}: {stderr}")]
    Process { status: String, stderr: String },

    #[error("expected 4-dimensional hull output, got {0} dimensions")]
    Dimension(usize),
}

/// Output of a 4D convex hull run.
///
/// `facets` index into `vertices`. Facets are kept as reported so that a
/// non-simplicial one can be detected and rejected when the mesh is built.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HullResult {
    pub vertices: Vec<Vec4>,
    pub facets: Vec<Vec<usize>>,
    /// One outward normal per facet
    pub normals: Vec<Vec4>,
}

impl HullResult {
    /// Load a hull from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, HullError> {
        let contents = fs::read_to_string(path)?;
        Ok(ron::from_str(&contents)?)
    }

    /// Save a hull to a RON file, creating parent directories as needed
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), HullError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let pretty = ron::ser::PrettyConfig::new()
            .struct_names(true)
            .enumerate_arrays(false);
        let contents = ron::ser::to_string_pretty(self, pretty)?;
        fs::write(path, contents)?;
        Ok(())
    }
}

/// A convex hull solver for 4D point clouds
pub trait ConvexHull {
    fn hull(&self, points: &[Vec4]) -> Result<HullResult, HullError>;
}

/// A previously computed hull served from memory or disk
impl ConvexHull for HullResult {
    fn hull(&self, _points: &[Vec4]) -> Result<HullResult, HullError> {
        Ok(self.clone())
    }
}

/// Runs the external `qhull` program.
///
/// Points are written to stdin in qhull's input format and the `i` (facet
/// vertex indices) and `n` (facet hyperplanes) outputs are parsed from
/// stdout. Vertex indices refer to the input points, which become
/// [`HullResult::vertices`] unchanged.
#[derive(Clone, Debug)]
pub struct QhullCommand {
    pub program: PathBuf,
    /// Extra qhull options, `Qt` (triangulated output) by default
    pub options: String,
}

impl Default for QhullCommand {
    fn default() -> Self {
        Self {
            program: PathBuf::from("qhull"),
            options: "Qt".to_string(),
        }
    }
}

impl QhullCommand {
    pub fn new(program: impl Into<PathBuf>, options: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            options: options.into(),
        }
    }
}

impl ConvexHull for QhullCommand {
    fn hull(&self, points: &[Vec4]) -> Result<HullResult, HullError> {
        let program = self.program.display().to_string();
        log::debug!("Running `{} {} i n` on {} points", program, self.options, points.len());

        let mut child = Command::new(&self.program)
            .args(self.options.split_whitespace())
            .args(["i", "n"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| HullError::Spawn { program: program.clone(), source })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(format_qhull_input(points).as_bytes())?;
        }
        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(HullError::Process {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let result = parse_qhull_output(&stdout, points.to_vec())?;
        log::info!(
            "Convex hull: {} vertices, {} facets, {} normals",
            result.vertices.len(),
            result.facets.len(),
            result.normals.len()
        );
        Ok(result)
    }
}

/// Points in qhull's input format: dimension, count, one point per line
pub fn format_qhull_input(points: &[Vec4]) -> String {
    let mut out = format!("4\n{}\n", points.len());
    for p in points {
        out.push_str(&format!("{} {} {} {}\n", p.x, p.y, p.z, p.w));
    }
    out
}

struct Lines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> Lines<'a> {
    fn next_tokens(&mut self) -> Result<(usize, Vec<&'a str>), HullError> {
        for (i, line) in self.inner.by_ref() {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if !tokens.is_empty() {
                return Ok((i + 1, tokens));
            }
        }
        Err(HullError::Parse {
            line: 0,
            message: "unexpected end of output".to_string(),
        })
    }

    fn next_count(&mut self) -> Result<usize, HullError> {
        let (line, tokens) = self.next_tokens()?;
        match tokens[..] {
            [n] => parse_token(n, line),
            _ => Err(HullError::Parse {
                line,
                message: format!("expected a single count, found {} values", tokens.len()),
            }),
        }
    }
}

fn parse_token<T: std::str::FromStr>(token: &str, line: usize) -> Result<T, HullError> {
    token.parse().map_err(|_| HullError::Parse {
        line,
        message: format!("invalid value `{}`", token),
    })
}

/// Parse the output of `qhull i n` for a 4D input.
pub fn parse_qhull_output(text: &str, vertices: Vec<Vec4>) -> Result<HullResult, HullError> {
    let mut lines = Lines { inner: text.lines().enumerate() };

    let facet_count = lines.next_count()?;
    let mut facets = Vec::with_capacity(facet_count);
    for _ in 0..facet_count {
        let (line, tokens) = lines.next_tokens()?;
        let facet = tokens
            .into_iter()
            .map(|t| parse_token(t, line))
            .collect::<Result<Vec<usize>, _>>()?;
        facets.push(facet);
    }

    // The hyperplane block starts with dimension + 1
    let columns = lines.next_count()?;
    if columns != 5 {
        return Err(HullError::Dimension(columns.saturating_sub(1)));
    }
    let normal_count = lines.next_count()?;
    let mut normals = Vec::with_capacity(normal_count);
    for _ in 0..normal_count {
        let (line, tokens) = lines.next_tokens()?;
        if tokens.len() != columns {
            return Err(HullError::Parse {
                line,
                message: format!("expected {} hyperplane values, found {}", columns, tokens.len()),
            });
        }
        let v = tokens[..4]
            .iter()
            .map(|t| parse_token(t, line))
            .collect::<Result<Vec<f32>, _>>()?;
        normals.push(Vec4::new(v[0], v[1], v[2], v[3]));
    }

    Ok(HullResult { vertices, facets, normals })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIVE_CELL_OUTPUT: &str = "5
1 2 3 4
0 2 3 4
0 1 3 4
0 1 2 4
0 1 2 3
5
5
-0.5 -0.5 -0.5 -0.5 0
1 0 0 0 0
0 1 0 0 0
0 0 1 0 0
0 0 0 1 0
";

    #[test]
    fn test_format_qhull_input() {
        let text = format_qhull_input(&[Vec4::ZERO, Vec4::new(1.0, 0.5, -2.0, 0.0)]);
        assert_eq!(text, "4\n2\n0 0 0 0\n1 0.5 -2 0\n");
    }

    #[test]
    fn test_parse_qhull_output() {
        let verts = vec![Vec4::ZERO, Vec4::X, Vec4::Y, Vec4::Z, Vec4::W];
        let hull = parse_qhull_output(FIVE_CELL_OUTPUT, verts.clone()).unwrap();
        assert_eq!(hull.vertices, verts);
        assert_eq!(hull.facets.len(), 5);
        assert_eq!(hull.facets[1], vec![0, 2, 3, 4]);
        assert_eq!(hull.normals[0], Vec4::new(-0.5, -0.5, -0.5, -0.5));
        assert_eq!(hull.normals[4], Vec4::W);
    }

    #[test]
    fn test_parse_keeps_non_simplicial_rows() {
        let text = "1\n0 1 2 3 4\n5\n1\n1 0 0 0 -1\n";
        let hull = parse_qhull_output(text, vec![]).unwrap();
        assert_eq!(hull.facets[0].len(), 5);
    }

    #[test]
    fn test_parse_rejects_wrong_dimension() {
        let text = "1\n0 1 2\n4\n1\n1 0 0 -1\n";
        assert!(matches!(parse_qhull_output(text, vec![]), Err(HullError::Dimension(3))));
    }

    #[test]
    fn test_parse_reports_bad_token() {
        let text = "1\n0 1 x 3\n";
        match parse_qhull_output(text, vec![]) {
            Err(HullError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_truncated() {
        assert!(matches!(
            parse_qhull_output("3\n0 1 2 3\n", vec![]),
            Err(HullError::Parse { .. })
        ));
    }

    #[test]
    fn test_ron_save_load() {
        let hull = parse_qhull_output(
            FIVE_CELL_OUTPUT,
            vec![Vec4::ZERO, Vec4::X, Vec4::Y, Vec4::Z, Vec4::W],
        )
        .unwrap();
        let path = std::env::temp_dir()
            .join(format!("polychora_hull_{}", std::process::id()))
            .join("five_cell.ron");
        hull.save(&path).unwrap();
        let loaded = HullResult::load(&path).unwrap();
        assert_eq!(loaded, hull);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let qhull = QhullCommand::new("/nonexistent/qhull-binary", "Qt");
        assert!(matches!(qhull.hull(&[Vec4::X]), Err(HullError::Spawn { .. })));
    }

    #[test]
    fn test_cached_result_is_a_hull() {
        let cached = HullResult { vertices: vec![Vec4::X], ..Default::default() };
        assert_eq!(cached.hull(&[]).unwrap(), cached);
    }
}
