//! Polygon orientation, projection to 2D and screen bounding boxes.

use crate::math::{Point2, Point3, Vector3, TOLERANCE};

use super::scene::{Projection, Scene};

/// A polygon that survived culling, oriented toward the viewer.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OrientedPoly {
    pub nodes: [u32; 4],
    /// 3 for a repeated-node triangular polygon, else 4.
    pub len: usize,
}

impl OrientedPoly {
    pub(crate) fn contains_node(&self, node: u32) -> bool {
        self.nodes[..self.len].contains(&node)
    }
}

/// Projects camera-space points onto the 2D view window at `z = 0`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Projector {
    pub projection: Projection,
    pub eye: Point3,
}

impl Projector {
    pub(crate) fn project(&self, p: &Point3) -> Point2 {
        match self.projection {
            Projection::Orthographic => Point2::new(p.x, p.y),
            Projection::Perspective => {
                let mut denom = self.eye.z - p.z;
                if denom.abs() < TOLERANCE {
                    denom = TOLERANCE.copysign(denom);
                }
                let s = self.eye.z / denom;
                Point2::new(
                    self.eye.x + s * (p.x - self.eye.x),
                    self.eye.y + s * (p.y - self.eye.y),
                )
            }
        }
    }
}

/// Removes repeated consecutive nodes, detecting triangular polygons.
/// Returns `None` when fewer than 3 distinct nodes remain.
fn compress_nodes(nodes: [u32; 4]) -> Option<OrientedPoly> {
    let mut out = [0u32; 4];
    let mut len = 0;
    for &n in &nodes {
        if len == 0 || out[len - 1] != n {
            out[len] = n;
            len += 1;
        }
    }
    if len > 1 && out[len - 1] == out[0] {
        len -= 1;
    }
    if len < 3 {
        return None;
    }
    Some(OrientedPoly { nodes: out, len })
}

/// Geometric normal of a polygon (cross of the diagonals for quads).
fn poly_normal(poly: &OrientedPoly, nodes: &[Point3]) -> Vector3 {
    let p = |i: usize| nodes[poly.nodes[i] as usize];
    if poly.len == 3 {
        (p(1) - p(0)).cross(&(p(2) - p(0)))
    } else {
        (p(2) - p(0)).cross(&(p(3) - p(1)))
    }
}

pub(crate) fn centroid(poly: &OrientedPoly, nodes: &[Point3]) -> Point3 {
    let mut sum = Vector3::zeros();
    for &n in &poly.nodes[..poly.len] {
        sum += nodes[n as usize].coords;
    }
    Point3::from(sum / poly.len as f64)
}

/// Culls away-facing one-sided polygons and orients two-sided polygons
/// toward the viewer.
///
/// An edge-on polygon (facing dot within epsilon of zero) is kept: its
/// edges still belong to the drawing even though it cannot occlude.
pub(crate) fn cull_and_orient(scene: &Scene, epsilon: f64) -> Vec<OrientedPoly> {
    let projector = Projector {
        projection: scene.projection,
        eye: scene.eye,
    };
    let mut polys = Vec::with_capacity(scene.one_sided.len() + scene.two_sided.len());

    let facing = |poly: &OrientedPoly| -> f64 {
        let normal = poly_normal(poly, &scene.nodes);
        match projector.projection {
            Projection::Orthographic => normal.z,
            Projection::Perspective => {
                normal.dot(&(scene.eye - centroid(poly, &scene.nodes)))
            }
        }
    };

    for &nodes in &scene.one_sided {
        let Some(poly) = compress_nodes(nodes) else {
            continue;
        };
        if facing(&poly) < -epsilon {
            continue;
        }
        polys.push(poly);
    }

    for &nodes in &scene.two_sided {
        let Some(mut poly) = compress_nodes(nodes) else {
            continue;
        };
        if facing(&poly) < -epsilon {
            poly.nodes[..poly.len].reverse();
        }
        polys.push(poly);
    }

    polys
}

/// Collects the deduplicated global edge list: every polygon edge plus
/// every explicit segment, as canonical node pairs.
pub(crate) fn global_edges(polys: &[OrientedPoly], segments: &[[u32; 2]]) -> Vec<[u32; 2]> {
    let mut edges = Vec::with_capacity(polys.len() * 4 + segments.len());
    for poly in polys {
        for i in 0..poly.len {
            let a = poly.nodes[i];
            let b = poly.nodes[(i + 1) % poly.len];
            if a != b {
                edges.push(if a < b { [a, b] } else { [b, a] });
            }
        }
    }
    for &[a, b] in segments {
        if a != b {
            edges.push(if a < b { [a, b] } else { [b, a] });
        }
    }
    edges.sort_unstable();
    edges.dedup();
    edges
}

/// 2D axis-aligned bounding box of a polygon's projected nodes.
pub(crate) fn poly_bbox(poly: &OrientedPoly, projected: &[Point2]) -> (Point2, Point2) {
    let mut min = Point2::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for &n in &poly.nodes[..poly.len] {
        let p = projected[n as usize];
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    (min, max)
}

/// Signed projected area of a polygon (shoelace over its 2D nodes).
pub(crate) fn projected_area(poly: &OrientedPoly, projected: &[Point2]) -> f64 {
    let mut area = 0.0;
    for i in 0..poly.len {
        let a = projected[poly.nodes[i] as usize];
        let b = projected[poly.nodes[(i + 1) % poly.len] as usize];
        area += a.x * b.y - b.x * a.y;
    }
    area * 0.5
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::hidden::scene::Projection;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn ortho_scene(one_sided: Vec<[u32; 4]>, two_sided: Vec<[u32; 4]>) -> Scene {
        Scene {
            projection: Projection::Orthographic,
            aspect: 1.0,
            eye: p(0.0, 0.0, 10.0),
            nodes: vec![
                p(0.0, 0.0, 0.0),
                p(1.0, 0.0, 0.0),
                p(1.0, 1.0, 0.0),
                p(0.0, 1.0, 0.0),
            ],
            one_sided,
            two_sided,
            segments: vec![],
        }
    }

    #[test]
    fn away_facing_one_sided_polygon_is_culled() {
        // Clockwise in the xy-plane: normal along -z.
        let scene = ortho_scene(vec![[0, 3, 2, 1]], vec![]);
        assert!(cull_and_orient(&scene, 1e-8).is_empty());
    }

    #[test]
    fn viewer_facing_polygon_is_kept() {
        let scene = ortho_scene(vec![[0, 1, 2, 3]], vec![]);
        assert_eq!(cull_and_orient(&scene, 1e-8).len(), 1);
    }

    #[test]
    fn two_sided_polygon_is_flipped() {
        let scene = ortho_scene(vec![], vec![[0, 3, 2, 1]]);
        let polys = cull_and_orient(&scene, 1e-8);
        assert_eq!(polys.len(), 1);
        assert!(projected_area(&polys[0], &[
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ]) > 0.0);
    }

    #[test]
    fn repeated_node_polygon_becomes_triangle() {
        let scene = ortho_scene(vec![[0, 1, 2, 2]], vec![]);
        let polys = cull_and_orient(&scene, 1e-8);
        assert_eq!(polys.len(), 1);
        assert_eq!(polys[0].len, 3);
    }

    #[test]
    fn fully_collapsed_polygon_is_dropped() {
        let scene = ortho_scene(vec![[0, 0, 1, 1]], vec![]);
        assert!(cull_and_orient(&scene, 1e-8).is_empty());
    }

    #[test]
    fn shared_polygon_edges_deduplicate() {
        let polys = [
            OrientedPoly {
                nodes: [0, 1, 2, 3],
                len: 4,
            },
            OrientedPoly {
                nodes: [1, 0, 4, 5],
                len: 4,
            },
        ];
        let edges = global_edges(&polys, &[]);
        assert_eq!(edges.iter().filter(|e| **e == [0, 1]).count(), 1);
        assert_eq!(edges.len(), 7);
    }

    #[test]
    fn perspective_projection_scales_toward_eye() {
        let projector = Projector {
            projection: Projection::Perspective,
            eye: p(0.0, 0.0, 10.0),
        };
        // A point at z = 5 is halfway to the eye: doubled on the window.
        let q = projector.project(&p(1.0, 0.0, 5.0));
        assert!((q.x - 2.0).abs() < 1e-12);
    }
}
