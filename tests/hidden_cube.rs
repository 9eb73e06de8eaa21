//! Hidden-line rendering of a closed cube, end to end from scene text.

#![allow(clippy::unwrap_used)]

use verge::hidden::{render, HiddenLineOptions, Projection, Scene};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Unit cube centered at the origin, one-sided outward faces, viewed
/// along +z from (0, 0, 10).
fn cube_scene(projection: &str) -> Scene {
    let text = format!(
        "{projection} 1.0  0 0 10
         1 0 0 0  0 1 0 0  0 0 1 0  0 0 0 1
         8
         v -0.5 -0.5 -0.5
         v  0.5 -0.5 -0.5
         v  0.5  0.5 -0.5
         v -0.5  0.5 -0.5
         v -0.5 -0.5  0.5
         v  0.5 -0.5  0.5
         v  0.5  0.5  0.5
         v -0.5  0.5  0.5
         6
         f 4 5 6 7
         f 0 3 2 1
         f 0 1 5 4
         f 1 2 6 5
         f 2 3 7 6
         f 3 0 4 7
         0
         0"
    );
    Scene::parse(&text).unwrap()
}

#[test]
fn orthographic_cube_draws_silhouette_only() {
    init_tracing();
    let scene = cube_scene("ORTHOGRAPHIC");
    assert_eq!(scene.projection, Projection::Orthographic);

    let drawing = render(&scene, &HiddenLineOptions::default());

    // The near face ring plus the 4 depth edges; the whole back face ring
    // is shadowed by the near face.
    assert_eq!(drawing.len(), 8);

    // Along +z the 4 depth edges collapse to points on screen.
    let collapsed = drawing
        .edges()
        .iter()
        .filter(|e| (e.end - e.start).norm() < 1e-9)
        .count();
    assert_eq!(collapsed, 4);
}

#[test]
fn perspective_cube_on_axis_shows_the_near_face() {
    init_tracing();
    let scene = cube_scene("PERSPECTIVE");

    // Every side face tilts away from an on-axis eyepoint, so only the
    // near face survives culling and only its 4 edges are drawn.
    let drawing = render(&scene, &HiddenLineOptions::default());
    assert_eq!(drawing.len(), 4);
}
