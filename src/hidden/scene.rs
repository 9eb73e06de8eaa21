//! Text scene description for the hidden-line pipeline.
//!
//! Whitespace-delimited tokens: a projection mode, the viewport aspect
//! ratio, the eyepoint, a 4x4 view matrix (applied to every node on
//! load), then counted blocks of `v` node records, one-sided `f`
//! polygons, two-sided `f` polygons and `b` line segments.

use crate::error::{Result, SceneError};
use crate::math::{Matrix4, Point3};

/// Projection mode of a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Perspective projection toward the eyepoint.
    Perspective,
    /// Orthographic projection along the view direction.
    Orthographic,
}

/// One static scene snapshot in camera space.
#[derive(Debug, Clone)]
pub struct Scene {
    pub projection: Projection,
    /// Viewport aspect ratio (window half-width over half-height).
    pub aspect: f64,
    pub eye: Point3,
    /// Node positions, already view-transformed.
    pub nodes: Vec<Point3>,
    /// One-sided polygons (culled when facing away).
    pub one_sided: Vec<[u32; 4]>,
    /// Two-sided polygons (flipped to face the viewer).
    pub two_sided: Vec<[u32; 4]>,
    /// Explicit line segments.
    pub segments: Vec<[u32; 2]>,
}

struct Tokens<'a> {
    iter: std::str::SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            iter: text.split_whitespace(),
        }
    }

    fn next(&mut self, context: &'static str) -> Result<&'a str> {
        self.iter
            .next()
            .ok_or_else(|| SceneError::UnexpectedEof { context }.into())
    }

    fn float(&mut self, context: &'static str) -> Result<f64> {
        let token = self.next(context)?;
        token.parse().map_err(|_| {
            SceneError::Number {
                token: token.to_owned(),
                context,
            }
            .into()
        })
    }

    fn count(&mut self, context: &'static str) -> Result<usize> {
        let token = self.next(context)?;
        token.parse().map_err(|_| {
            SceneError::Number {
                token: token.to_owned(),
                context,
            }
            .into()
        })
    }

    fn index(&mut self, context: &'static str, node_count: usize) -> Result<u32> {
        let token = self.next(context)?;
        let index: u32 = token.parse().map_err(|_| SceneError::Number {
            token: token.to_owned(),
            context,
        })?;
        if index as usize >= node_count {
            return Err(SceneError::NodeIndexOutOfRange {
                index,
                count: node_count,
            }
            .into());
        }
        Ok(index)
    }

    fn tag(&mut self, expected: &'static str) -> Result<()> {
        let token = self.next(expected)?;
        if token == expected {
            Ok(())
        } else {
            Err(SceneError::Token {
                expected,
                found: token.to_owned(),
            }
            .into())
        }
    }
}

impl Scene {
    /// Parses a scene from its text description.
    ///
    /// # Errors
    ///
    /// Returns an error for truncated input, malformed numbers, an unknown
    /// projection token or out-of-range node references.
    pub fn parse(text: &str) -> Result<Self> {
        let mut tokens = Tokens::new(text);

        let projection = match tokens.next("projection mode")? {
            "PERSPECTIVE" => Projection::Perspective,
            "ORTHOGRAPHIC" => Projection::Orthographic,
            other => return Err(SceneError::UnknownProjection(other.to_owned()).into()),
        };

        let aspect = tokens.float("aspect ratio")?;
        let eye = Point3::new(
            tokens.float("eyepoint")?,
            tokens.float("eyepoint")?,
            tokens.float("eyepoint")?,
        );

        let mut view = Matrix4::identity();
        for r in 0..4 {
            for c in 0..4 {
                view[(r, c)] = tokens.float("view matrix")?;
            }
        }

        let node_count = tokens.count("node count")?;
        let mut nodes = Vec::with_capacity(node_count);
        for _ in 0..node_count {
            tokens.tag("v")?;
            let p = Point3::new(
                tokens.float("node record")?,
                tokens.float("node record")?,
                tokens.float("node record")?,
            );
            nodes.push(view.transform_point(&p));
        }

        let mut read_polys = |tokens: &mut Tokens<'_>, context| -> Result<Vec<[u32; 4]>> {
            let count = tokens.count(context)?;
            let mut polys = Vec::with_capacity(count);
            for _ in 0..count {
                tokens.tag("f")?;
                let mut poly = [0u32; 4];
                for slot in &mut poly {
                    *slot = tokens.index("polygon record", node_count)?;
                }
                polys.push(poly);
            }
            Ok(polys)
        };

        let one_sided = read_polys(&mut tokens, "one-sided polygon count")?;
        let two_sided = read_polys(&mut tokens, "two-sided polygon count")?;

        let segment_count = tokens.count("segment count")?;
        let mut segments = Vec::with_capacity(segment_count);
        for _ in 0..segment_count {
            tokens.tag("b")?;
            segments.push([
                tokens.index("segment record", node_count)?,
                tokens.index("segment record", node_count)?,
            ]);
        }

        Ok(Self {
            projection,
            aspect,
            eye,
            nodes,
            one_sided,
            two_sided,
            segments,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const IDENTITY: &str = "1 0 0 0  0 1 0 0  0 0 1 0  0 0 0 1";

    #[test]
    fn parses_minimal_scene() {
        let text = format!(
            "ORTHOGRAPHIC 1.0  0 0 10  {IDENTITY}
             3
             v 0 0 0
             v 1 0 0
             v 0 1 0
             1
             f 0 1 2 2
             0
             1
             b 0 1"
        );
        let scene = Scene::parse(&text).unwrap();
        assert_eq!(scene.projection, Projection::Orthographic);
        assert_eq!(scene.nodes.len(), 3);
        assert_eq!(scene.one_sided.len(), 1);
        assert!(scene.two_sided.is_empty());
        assert_eq!(scene.segments, vec![[0, 1]]);
    }

    #[test]
    fn view_matrix_transforms_nodes() {
        // Translation by (0, 0, -5).
        let text = "PERSPECTIVE 1.0  0 0 10
             1 0 0 0  0 1 0 0  0 0 1 -5  0 0 0 1
             1
             v 1 2 3
             0
             0
             0";
        let scene = Scene::parse(text).unwrap();
        assert_eq!(scene.nodes[0], Point3::new(1.0, 2.0, -2.0));
    }

    #[test]
    fn rejects_unknown_projection() {
        let result = Scene::parse("ISOMETRIC 1.0");
        assert!(matches!(
            result,
            Err(crate::error::VergeError::Scene(SceneError::UnknownProjection(_)))
        ));
    }

    #[test]
    fn rejects_bad_block_tag() {
        let text = format!(
            "ORTHOGRAPHIC 1.0  0 0 10  {IDENTITY}
             1
             x 0 0 0
             0 0 0"
        );
        let result = Scene::parse(&text);
        assert!(matches!(
            result,
            Err(crate::error::VergeError::Scene(SceneError::Token { .. }))
        ));
    }

    #[test]
    fn rejects_out_of_range_polygon_node() {
        let text = format!(
            "ORTHOGRAPHIC 1.0  0 0 10  {IDENTITY}
             2
             v 0 0 0
             v 1 0 0
             1
             f 0 1 2 2
             0
             0"
        );
        let result = Scene::parse(&text);
        assert!(matches!(
            result,
            Err(crate::error::VergeError::Scene(
                SceneError::NodeIndexOutOfRange { index: 2, count: 2 }
            ))
        ));
    }

    #[test]
    fn rejects_truncated_input() {
        let result = Scene::parse("PERSPECTIVE 1.0 0 0");
        assert!(matches!(
            result,
            Err(crate::error::VergeError::Scene(SceneError::UnexpectedEof { .. }))
        ));
    }
}
