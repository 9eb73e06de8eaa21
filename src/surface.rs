//! Exposed boundary faces of a mesh under the current visibility state.

use crate::adjacency::{AdjacencyTable, Neighbor};
use crate::math::{Point3, Vector3};
use crate::mesh::ElementClass;

/// One exposed (element, local face) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceRecord {
    pub element: u32,
    pub face: u8,
}

/// Per-material visual 3D offsets used to separate overlapping materials.
/// Materials without an entry sit at the origin offset.
#[derive(Debug, Clone, Default)]
pub struct MaterialTranslations {
    entries: Vec<(i32, Vector3)>,
}

impl MaterialTranslations {
    /// Creates an empty translation set (all materials at zero offset).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the offset of one material.
    pub fn set(&mut self, material: i32, offset: Vector3) {
        if let Some(entry) = self.entries.iter_mut().find(|(m, _)| *m == material) {
            entry.1 = offset;
        } else {
            self.entries.push((material, offset));
        }
    }

    /// Offset of a material; zero if none was set.
    #[must_use]
    pub fn offset(&self, material: i32) -> Vector3 {
        self.entries
            .iter()
            .find(|(m, _)| *m == material)
            .map_or_else(Vector3::zeros, |(_, o)| *o)
    }
}

/// Extracts the list of exposed faces of one class.
///
/// A face is external iff its element is visible and its far side shows
/// nothing: a boundary, an invisible neighbor, or a neighbor whose
/// material is translated to a different offset. Degenerate faces are
/// skipped entirely; they must never emit zero-area geometry.
#[must_use]
pub fn external_faces(
    class: &ElementClass,
    adjacency: &AdjacencyTable,
    visible: &[bool],
    translations: Option<&MaterialTranslations>,
) -> Vec<FaceRecord> {
    let fpe = adjacency.faces_per_element();
    let mut faces = Vec::new();

    for e in 0..class.qty() {
        if !visible[e] {
            continue;
        }
        for f in 0..fpe {
            let external = match adjacency.neighbor(e, f) {
                Neighbor::Degenerate => false,
                Neighbor::Boundary => true,
                Neighbor::Element(n) => {
                    !visible[n as usize]
                        || translations.is_some_and(|t| {
                            t.offset(class.material(e))
                                != t.offset(class.material(n as usize))
                        })
                }
            };
            if external {
                faces.push(FaceRecord {
                    element: e as u32,
                    face: f as u8,
                });
            }
        }
    }
    faces
}

/// Average outward normal of a face, by Newell's method.
///
/// Robust against the repeated corner of a quad face collapsed to a
/// triangle. Two-node shell "faces" have no normal and yield zero.
#[must_use]
pub fn face_normal(class: &ElementClass, coords: &[Point3], rec: FaceRecord) -> Vector3 {
    let (nodes, len) = class.face_nodes(rec.element as usize, rec.face as usize);
    if len < 3 {
        return Vector3::zeros();
    }
    let mut normal = Vector3::zeros();
    for i in 0..len {
        let a = &coords[nodes[i] as usize];
        let b = &coords[nodes[(i + 1) % len] as usize];
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }
    normal
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::adjacency::{build_adjacency, OverlapMode};
    use crate::mesh::ElemShape;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    /// Two unit hexes stacked along x, sharing one face; 12 nodes.
    fn two_hexes() -> (ElementClass, Vec<Point3>) {
        let coords = vec![
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(1.0, 1.0, 0.0),
            p(0.0, 1.0, 0.0),
            p(0.0, 0.0, 1.0),
            p(1.0, 0.0, 1.0),
            p(1.0, 1.0, 1.0),
            p(0.0, 1.0, 1.0),
            p(2.0, 0.0, 0.0),
            p(2.0, 1.0, 0.0),
            p(2.0, 0.0, 1.0),
            p(2.0, 1.0, 1.0),
        ];
        let conn = vec![
            0, 1, 2, 3, 4, 5, 6, 7, //
            1, 8, 9, 2, 5, 10, 11, 6,
        ];
        let class = ElementClass::new("hexes", ElemShape::Hex, conn, vec![1, 2]).unwrap();
        (class, coords)
    }

    #[test]
    fn fully_visible_pair_exposes_outer_shell() {
        let (class, _) = two_hexes();
        let adj = build_adjacency(&class, OverlapMode::Unified).unwrap();
        let faces = external_faces(&class, &adj, &[true, true], None);
        // 12 faces total, 2 interior.
        assert_eq!(faces.len(), 10);
    }

    #[test]
    fn invisible_neighbor_exposes_interior_face() {
        let (class, _) = two_hexes();
        let adj = build_adjacency(&class, OverlapMode::Unified).unwrap();
        let faces = external_faces(&class, &adj, &[true, false], None);
        // All 6 faces of the visible hex, including the formerly interior
        // one; nothing from the invisible hex.
        assert_eq!(faces.len(), 6);
        assert!(faces.iter().all(|r| r.element == 0));
    }

    #[test]
    fn material_translation_exposes_interface() {
        let (class, _) = two_hexes();
        let adj = build_adjacency(&class, OverlapMode::Unified).unwrap();
        let mut trans = MaterialTranslations::new();
        trans.set(2, Vector3::new(0.5, 0.0, 0.0));
        let faces = external_faces(&class, &adj, &[true, true], Some(&trans));
        // Both interface faces are exposed by the differing offsets.
        assert_eq!(faces.len(), 12);
    }

    #[test]
    fn zero_translations_expose_nothing_extra() {
        let (class, _) = two_hexes();
        let adj = build_adjacency(&class, OverlapMode::Unified).unwrap();
        let trans = MaterialTranslations::new();
        let faces = external_faces(&class, &adj, &[true, true], Some(&trans));
        assert_eq!(faces.len(), 10);
    }

    #[test]
    fn degenerate_faces_are_never_emitted() {
        // Hex with its top face collapsed to an edge.
        let conn = vec![0, 1, 2, 3, 4, 4, 5, 5];
        let class = ElementClass::new("hexes", ElemShape::Hex, conn, vec![1]).unwrap();
        let adj = build_adjacency(&class, OverlapMode::Unified).unwrap();
        let faces = external_faces(&class, &adj, &[true], None);
        assert_eq!(faces.len(), 5);
        assert!(faces.iter().all(|r| r.face != 4));
    }

    #[test]
    fn hex_top_face_normal_points_up() {
        let (class, coords) = two_hexes();
        let n = face_normal(
            &class,
            &coords,
            FaceRecord {
                element: 0,
                face: 4,
            },
        );
        assert!(n.z > 0.0);
        assert!(n.x.abs() < 1e-12 && n.y.abs() < 1e-12);
    }
}
