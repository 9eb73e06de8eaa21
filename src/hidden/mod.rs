//! Hidden-line removal over a static polygon scene.
//!
//! A scene is parsed from text, its polygons are culled and oriented
//! toward the viewer, and every unique edge is clipped against the view
//! frustum and against the shadow volume of every polygon that could
//! occlude it. Whatever survives is emitted as line segments in page
//! coordinates.

mod fragment;
mod output;
mod project;
mod scene;
mod shadow;

pub use output::{Drawing, DrawnEdge, PageLayout};
pub use scene::{Projection, Scene};

use crate::math::plane::{keep_front_interval, Plane};
use crate::math::{Point2, Point3, Vector3};

use fragment::{subtract_interval, Fragment};
use project::{cull_and_orient, global_edges, Projector};
use shadow::ShadowVolume;

/// Tuning knobs of the hidden-line pass.
#[derive(Debug, Clone, Copy)]
pub struct HiddenLineOptions {
    /// Signed epsilon for every plane-side test; near-coplanar counts
    /// as "on".
    pub epsilon: f64,
    pub page: PageLayout,
}

impl Default for HiddenLineOptions {
    fn default() -> Self {
        Self {
            epsilon: 1e-8,
            page: PageLayout::default(),
        }
    }
}

/// The four side planes of the view frustum, inward-facing.
fn frustum_planes(scene: &Scene) -> Vec<Plane> {
    let a = scene.aspect;
    match scene.projection {
        Projection::Orthographic => [
            (Point3::new(-a, 0.0, 0.0), Vector3::x()),
            (Point3::new(a, 0.0, 0.0), -Vector3::x()),
            (Point3::new(0.0, -1.0, 0.0), Vector3::y()),
            (Point3::new(0.0, 1.0, 0.0), -Vector3::y()),
        ]
        .into_iter()
        .filter_map(|(origin, normal)| Plane::from_normal(origin, normal))
        .collect(),
        Projection::Perspective => {
            // Each plane passes through the eye and one window edge,
            // oriented toward the window center.
            let corners = [
                Point3::new(-a, -1.0, 0.0),
                Point3::new(a, -1.0, 0.0),
                Point3::new(a, 1.0, 0.0),
                Point3::new(-a, 1.0, 0.0),
            ];
            let center = Point3::origin();
            let mut planes = Vec::with_capacity(4);
            for i in 0..4 {
                let c0 = corners[i];
                let c1 = corners[(i + 1) % 4];
                let mut normal = (c0 - scene.eye).cross(&(c1 - scene.eye));
                if normal.dot(&(center - scene.eye)) < 0.0 {
                    normal = -normal;
                }
                if let Some(plane) = Plane::from_normal(scene.eye, normal) {
                    planes.push(plane);
                }
            }
            planes
        }
    }
}

fn edge_bbox(a: Point2, b: Point2) -> (Point2, Point2) {
    (
        Point2::new(a.x.min(b.x), a.y.min(b.y)),
        Point2::new(a.x.max(b.x), a.y.max(b.y)),
    )
}

/// Renders a scene to its visible line segments.
///
/// Every unique edge starts as one parametric fragment, is clipped to
/// the frustum, then loses the interval shadowed by every occluding
/// polygon that does not share a node with it and whose screen bounding
/// box overlaps the edge's.
#[must_use]
pub fn render(scene: &Scene, options: &HiddenLineOptions) -> Drawing {
    let eps = options.epsilon;
    let projector = Projector {
        projection: scene.projection,
        eye: scene.eye,
    };

    let polys = cull_and_orient(scene, eps);
    let projected: Vec<Point2> = scene.nodes.iter().map(|p| projector.project(p)).collect();
    let edges = global_edges(&polys, &scene.segments);
    let volumes: Vec<ShadowVolume> = polys
        .iter()
        .filter_map(|poly| ShadowVolume::build(poly, &scene.nodes, &projected, &projector, eps))
        .collect();
    let frustum = frustum_planes(scene);
    let mapper = options.page.mapper(scene.aspect);

    let mut drawn = Vec::new();
    'edges: for &[a, b] in &edges {
        let origin = scene.nodes[a as usize];
        let dir = scene.nodes[b as usize] - origin;

        let mut interval = (0.0, 1.0);
        for plane in &frustum {
            match keep_front_interval(&origin, &dir, interval, plane, eps) {
                Some(kept) => interval = kept,
                None => continue 'edges,
            }
        }

        let mut fragments = vec![Fragment {
            t0: interval.0,
            t1: interval.1,
        }];
        let (emin, emax) = edge_bbox(projected[a as usize], projected[b as usize]);
        for volume in &volumes {
            if fragments.is_empty() {
                break;
            }
            // A polygon never occludes an edge it touches.
            if volume.shares_node(a, b) {
                continue;
            }
            if emax.x < volume.min.x - eps
                || emin.x > volume.max.x + eps
                || emax.y < volume.min.y - eps
                || emin.y > volume.max.y + eps
            {
                continue;
            }
            if let Some(shadow) = volume.shadow_interval(&origin, &dir, eps) {
                subtract_interval(&mut fragments, shadow, eps);
            }
        }

        for frag in &fragments {
            if frag.t1 - frag.t0 <= eps {
                continue;
            }
            let start = projector.project(&(origin + dir * frag.t0));
            let end = projector.project(&(origin + dir * frag.t1));
            drawn.push(DrawnEdge {
                start: mapper.map(start),
                end: mapper.map(end),
            });
        }
    }

    tracing::debug!(
        edges = edges.len(),
        polygons = polys.len(),
        occluders = volumes.len(),
        drawn = drawn.len(),
        "hidden-line pass"
    );
    Drawing::new(drawn)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    /// Viewer-facing square over the origin plus one segment at `z`.
    fn square_and_segment(z: f64) -> Scene {
        Scene {
            projection: Projection::Orthographic,
            aspect: 1.0,
            eye: p(0.0, 0.0, 10.0),
            nodes: vec![
                p(-0.5, -0.5, 0.0),
                p(0.5, -0.5, 0.0),
                p(0.5, 0.5, 0.0),
                p(-0.5, 0.5, 0.0),
                p(-0.4, 0.0, z),
                p(0.4, 0.0, z),
            ],
            one_sided: vec![[0, 1, 2, 3]],
            two_sided: vec![],
            segments: vec![[4, 5]],
        }
    }

    #[test]
    fn fully_shadowed_segment_disappears() {
        let scene = square_and_segment(-1.0);
        let drawing = render(&scene, &HiddenLineOptions::default());
        // The square's own 4 edges survive; the segment does not.
        assert_eq!(drawing.len(), 4);
    }

    #[test]
    fn segment_in_front_of_the_polygon_survives() {
        let scene = square_and_segment(1.0);
        let drawing = render(&scene, &HiddenLineOptions::default());
        assert_eq!(drawing.len(), 5);
    }

    #[test]
    fn segment_is_clipped_to_the_window() {
        let scene = Scene {
            projection: Projection::Orthographic,
            aspect: 1.0,
            eye: p(0.0, 0.0, 10.0),
            nodes: vec![p(-2.0, 0.0, 0.0), p(2.0, 0.0, 0.0)],
            one_sided: vec![],
            two_sided: vec![],
            segments: vec![[0, 1]],
        };
        let drawing = render(&scene, &HiddenLineOptions::default());
        assert_eq!(drawing.len(), 1);
        // Window x in [-1, 1] maps onto the default page as [50, 950].
        let edge = drawing.edges()[0];
        assert!((edge.start.x - 50.0).abs() < 1e-6);
        assert!((edge.end.x - 950.0).abs() < 1e-6);
    }

    #[test]
    fn segment_outside_the_window_is_dropped() {
        let scene = Scene {
            projection: Projection::Orthographic,
            aspect: 1.0,
            eye: p(0.0, 0.0, 10.0),
            nodes: vec![p(-2.0, 2.0, 0.0), p(2.0, 2.0, 0.0)],
            one_sided: vec![],
            two_sided: vec![],
            segments: vec![[0, 1]],
        };
        let drawing = render(&scene, &HiddenLineOptions::default());
        assert!(drawing.is_empty());
    }
}
