//! Polygon shadow volumes: the region behind a polygon as seen from the
//! viewpoint, bounded by one side plane per polygon edge plus the
//! polygon's supporting plane.

use crate::math::plane::{keep_behind_interval, keep_front_interval, Plane};
use crate::math::{Point2, Point3, Vector3, TOLERANCE};

use super::project::{centroid, poly_bbox, projected_area, OrientedPoly, Projector};
use super::scene::Projection;

#[derive(Debug, Clone)]
pub(crate) struct ShadowVolume {
    nodes: [u32; 4],
    len: usize,
    side: Vec<Plane>,
    support: Plane,
    pub min: Point2,
    pub max: Point2,
}

impl ShadowVolume {
    /// Builds the shadow volume of an oriented polygon, or `None` when the
    /// polygon cannot occlude (degenerate or edge-on: zero projected area).
    pub(crate) fn build(
        poly: &OrientedPoly,
        nodes: &[Point3],
        projected: &[Point2],
        projector: &Projector,
        epsilon: f64,
    ) -> Option<Self> {
        if projected_area(poly, projected).abs() < epsilon {
            return None;
        }

        let center = centroid(poly, nodes);
        let support = Plane::from_normal(center, poly_support_normal(poly, nodes))?;

        let mut side = Vec::with_capacity(poly.len);
        for i in 0..poly.len {
            let q0 = nodes[poly.nodes[i] as usize];
            let q1 = nodes[poly.nodes[(i + 1) % poly.len] as usize];
            let edge = q1 - q0;
            let toward = match projector.projection {
                Projection::Orthographic => Vector3::new(0.0, 0.0, -1.0),
                Projection::Perspective => q0 - projector.eye,
            };
            let mut normal = edge.cross(&toward);
            let orient = normal.dot(&(center - q0));
            if orient.abs() < TOLERANCE {
                // Zero-length or eye-aligned edge: no constraint from it.
                continue;
            }
            if orient < 0.0 {
                normal = -normal;
            }
            let Some(plane) = Plane::from_normal(q0, normal) else {
                continue;
            };
            side.push(plane);
        }

        let (min, max) = poly_bbox(poly, projected);
        Some(Self {
            nodes: poly.nodes,
            len: poly.len,
            side,
            support,
            min,
            max,
        })
    }

    /// `true` if the polygon uses either endpoint node of an edge; edges
    /// touching the polygon cannot be occluded by it.
    pub(crate) fn shares_node(&self, a: u32, b: u32) -> bool {
        let nodes = &self.nodes[..self.len];
        nodes.contains(&a) || nodes.contains(&b)
    }

    /// Sub-range of the parametric line `origin + t * dir`, within
    /// `[0, 1]`, that lies inside this shadow volume; `None` when nothing
    /// is occluded.
    ///
    /// A line parallel to any bounding plane is unclipped by that plane;
    /// only the part strictly behind the supporting plane shadows.
    pub(crate) fn shadow_interval(
        &self,
        origin: &Point3,
        dir: &Vector3,
        epsilon: f64,
    ) -> Option<(f64, f64)> {
        let mut interval = (0.0, 1.0);
        for plane in &self.side {
            interval = keep_front_interval(origin, dir, interval, plane, epsilon)?;
        }
        keep_behind_interval(origin, dir, interval, &self.support, epsilon)
    }
}

/// Supporting-plane normal, oriented toward the viewer by construction
/// (polygons are oriented before shadow volumes are built).
fn poly_support_normal(poly: &OrientedPoly, nodes: &[Point3]) -> Vector3 {
    let p = |i: usize| nodes[poly.nodes[i] as usize];
    if poly.len == 3 {
        (p(1) - p(0)).cross(&(p(2) - p(0)))
    } else {
        (p(2) - p(0)).cross(&(p(3) - p(1)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-8;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn ortho() -> Projector {
        Projector {
            projection: Projection::Orthographic,
            eye: p(0.0, 0.0, 10.0),
        }
    }

    /// Unit square at z = 0 facing +z, with an extra node pair for edges.
    fn square_volume() -> (Vec<Point3>, ShadowVolume) {
        let nodes = vec![
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(1.0, 1.0, 0.0),
            p(0.0, 1.0, 0.0),
        ];
        let projected: Vec<Point2> =
            nodes.iter().map(|q| Point2::new(q.x, q.y)).collect();
        let poly = OrientedPoly {
            nodes: [0, 1, 2, 3],
            len: 4,
        };
        let volume =
            ShadowVolume::build(&poly, &nodes, &projected, &ortho(), EPS).unwrap();
        (nodes, volume)
    }

    #[test]
    fn edge_behind_polygon_is_fully_shadowed() {
        let (_, volume) = square_volume();
        let origin = p(0.25, 0.5, -1.0);
        let dir = Vector3::new(0.5, 0.0, 0.0);
        let shadow = volume.shadow_interval(&origin, &dir, EPS).unwrap();
        assert!((shadow.0 - 0.0).abs() < 1e-9);
        assert!((shadow.1 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn edge_in_front_is_unshadowed() {
        let (_, volume) = square_volume();
        let origin = p(0.25, 0.5, 1.0);
        let dir = Vector3::new(0.5, 0.0, 0.0);
        assert!(volume.shadow_interval(&origin, &dir, EPS).is_none());
    }

    #[test]
    fn edge_crossing_the_silhouette_is_partially_shadowed() {
        let (_, volume) = square_volume();
        // From x = -1 to x = 0.5 behind the square: shadowed from x = 0.
        let origin = p(-1.0, 0.5, -1.0);
        let dir = Vector3::new(1.5, 0.0, 0.0);
        let shadow = volume.shadow_interval(&origin, &dir, EPS).unwrap();
        assert!((shadow.0 - 2.0 / 3.0).abs() < 1e-6);
        assert!((shadow.1 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn coplanar_edge_is_unshadowed() {
        let (_, volume) = square_volume();
        let origin = p(0.25, 0.5, 0.0);
        let dir = Vector3::new(0.5, 0.0, 0.0);
        assert!(volume.shadow_interval(&origin, &dir, EPS).is_none());
    }

    #[test]
    fn edge_on_polygon_builds_no_volume() {
        // A polygon seen edge-on projects to zero area.
        let nodes = vec![
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(1.0, 0.0, 1.0),
            p(0.0, 0.0, 1.0),
        ];
        let projected: Vec<Point2> =
            nodes.iter().map(|q| Point2::new(q.x, q.y)).collect();
        let poly = OrientedPoly {
            nodes: [0, 1, 2, 3],
            len: 4,
        };
        assert!(ShadowVolume::build(&poly, &nodes, &projected, &ortho(), EPS).is_none());
    }
}
