//! Compressed, deduplicated edge lists over the exposed boundary surface.
//!
//! Edges are canonical `(a < b)` node pairs. An edge shared by two faces
//! at the same translation offset is kept only when the dihedral angle
//! marks a crease, once per distinct material; faces at different offsets
//! never pair up, so translated materials keep their outlines. A node
//! pair touched by more than two faces carries its extra material ids in
//! an overflow side-table instead of duplicate records.

use tracing::warn;

use crate::error::{CapacityError, Result};
use crate::math::{Point3, Vector3};
use crate::mesh::ElementClass;
use crate::surface::{face_normal, FaceRecord, MaterialTranslations};

/// Sentinel index for "no entry" in overflow chains.
const NONE: u32 = u32::MAX;

/// Thresholds for edge detection.
#[derive(Debug, Clone, Copy)]
pub struct EdgeOptions {
    /// Crease threshold in radians; an edge between same-material faces is
    /// drawn when the angle between their normals exceeds it.
    pub crease_angle: f64,
}

impl EdgeOptions {
    /// Threshold of the implicit detection mode (about 22 degrees).
    pub const IMPLICIT_DEG: f64 = 22.0;
    /// Threshold of the explicit detection mode (about 44 degrees).
    pub const EXPLICIT_DEG: f64 = 44.0;

    /// Options for the explicit detection mode.
    #[must_use]
    pub fn explicit() -> Self {
        Self {
            crease_angle: Self::EXPLICIT_DEG.to_radians(),
        }
    }

    /// Options with an exact-coplanarity threshold: any fold is a crease.
    #[must_use]
    pub fn exact() -> Self {
        Self { crease_angle: 0.0 }
    }
}

impl Default for EdgeOptions {
    fn default() -> Self {
        Self {
            crease_angle: Self::IMPLICIT_DEG.to_radians(),
        }
    }
}

/// One compressed edge: a canonical node pair with its primary material
/// and an optional overflow chain of further material ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeRecord {
    pub node_a: u32,
    pub node_b: u32,
    pub material: i32,
    overflow: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OverflowRecord {
    material: i32,
    next: u32,
}

/// Compressed edge list: records strictly ordered by `(node_a, node_b)`,
/// one record per pair, extra materials in the overflow side-table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompressedEdgeList {
    records: Vec<EdgeRecord>,
    overflow: Vec<OverflowRecord>,
}

impl CompressedEdgeList {
    /// Number of compressed edge records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `true` if the list holds no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The ordered edge records.
    #[must_use]
    pub fn records(&self) -> &[EdgeRecord] {
        &self.records
    }

    /// All material ids of record `idx`: the primary one plus the overflow
    /// chain, in chain order.
    #[must_use]
    pub fn materials(&self, idx: usize) -> Vec<i32> {
        let rec = &self.records[idx];
        let mut mats = vec![rec.material];
        let mut cur = rec.overflow;
        while cur != NONE {
            let row = &self.overflow[cur as usize];
            mats.push(row.material);
            cur = row.next;
        }
        mats
    }

    /// Appends an emission. The caller emits in non-descending pair order;
    /// a repeat of the trailing pair extends its overflow chain instead of
    /// duplicating the record.
    fn push(&mut self, node_a: u32, node_b: u32, material: i32) {
        if let Some(last) = self.records.last_mut() {
            if last.node_a == node_a && last.node_b == node_b {
                // Coalesce into the existing record.
                if last.material == material {
                    return;
                }
                let mut cur = last.overflow;
                while cur != NONE {
                    let row = &self.overflow[cur as usize];
                    if row.material == material {
                        return;
                    }
                    cur = row.next;
                }
                let idx = self.overflow.len() as u32;
                self.overflow.push(OverflowRecord {
                    material,
                    next: last.overflow,
                });
                last.overflow = idx;
                return;
            }
        }
        self.records.push(EdgeRecord {
            node_a,
            node_b,
            material,
            overflow: NONE,
        });
    }

    /// Sorted material set of record `idx`, for content comparisons.
    #[must_use]
    pub fn material_set(&self, idx: usize) -> Vec<i32> {
        let mut mats = self.materials(idx);
        mats.sort_unstable();
        mats
    }
}

/// One boundary edge of an external face, tagged for sorting.
#[derive(Debug, Clone, Copy)]
struct TaggedEdge {
    node_a: u32,
    node_b: u32,
    material: i32,
    offset: Vector3,
    face: u32,
}

fn tag_order(x: &TaggedEdge, y: &TaggedEdge) -> std::cmp::Ordering {
    x.node_a
        .cmp(&y.node_a)
        .then(x.node_b.cmp(&y.node_b))
        .then(x.offset.x.total_cmp(&y.offset.x))
        .then(x.offset.y.total_cmp(&y.offset.y))
        .then(x.offset.z.total_cmp(&y.offset.z))
}

/// Extracts the compressed edge list of one class's external faces.
///
/// # Errors
///
/// Returns a capacity error if the working edge table cannot be reserved;
/// the extraction aborts without partial output.
pub fn extract_edges(
    class: &ElementClass,
    coords: &[Point3],
    faces: &[FaceRecord],
    translations: Option<&MaterialTranslations>,
    options: &EdgeOptions,
) -> Result<CompressedEdgeList> {
    // Unit face normals, aligned with the face list.
    let normals: Vec<Vector3> = faces
        .iter()
        .map(|&rec| {
            let n = face_normal(class, coords, rec);
            let len = n.norm();
            if len > 0.0 { n / len } else { n }
        })
        .collect();

    let mut tagged: Vec<TaggedEdge> = Vec::new();
    let estimate = faces.len() * 4;
    tagged
        .try_reserve(estimate)
        .map_err(|_| CapacityError::EdgeList {
            requested: estimate,
        })?;

    for (i, &rec) in faces.iter().enumerate() {
        let material = class.material(rec.element as usize);
        let offset = translations.map_or_else(Vector3::zeros, |t| t.offset(material));
        let (nodes, len) = class.face_nodes(rec.element as usize, rec.face as usize);

        let mut push_pair = |a: u32, b: u32| {
            if a == b {
                return; // repeated corner of a collapsed quad
            }
            let (node_a, node_b) = if a < b { (a, b) } else { (b, a) };
            tagged.push(TaggedEdge {
                node_a,
                node_b,
                material,
                offset,
                face: i as u32,
            });
        };

        if len == 2 {
            push_pair(nodes[0], nodes[1]);
        } else {
            for k in 0..len {
                push_pair(nodes[k], nodes[(k + 1) % len]);
            }
        }
    }

    tagged.sort_unstable_by(tag_order);

    let cos_crease = options.crease_angle.cos();
    let mut list = CompressedEdgeList::default();

    let mut i = 0;
    while i < tagged.len() {
        // One run: identical node pair and identical translation offset.
        let mut j = i + 1;
        while j < tagged.len() && tag_order(&tagged[i], &tagged[j]).is_eq() {
            j += 1;
        }
        let run = &tagged[i..j];
        let first = run[0];

        match run.len() {
            1 => {
                // True boundary edge: appears on exactly one face.
                list.push(first.node_a, first.node_b, first.material);
            }
            2 => {
                // Draw only across a sharp fold, once per distinct
                // material. A coplanar material interface stays silent;
                // translated materials sort into separate runs and fall
                // under the boundary case instead.
                let second = run[1];
                let dot =
                    normals[first.face as usize].dot(&normals[second.face as usize]);
                if dot < cos_crease {
                    list.push(first.node_a, first.node_b, first.material);
                    if second.material != first.material {
                        list.push(second.node_a, second.node_b, second.material);
                    }
                }
            }
            n => {
                if n % 2 == 1 {
                    warn!(
                        class = class.name(),
                        node_a = first.node_a,
                        node_b = first.node_b,
                        count = n,
                        "edge shared by an odd number of faces; \
                         face enumeration may be inconsistent"
                    );
                }
                for edge in run {
                    list.push(edge.node_a, edge.node_b, edge.material);
                }
            }
        }
        i = j;
    }

    Ok(list)
}

/// Merges two compressed lists into one.
///
/// Records are merge-sorted by node pair; colliding pairs union their
/// overflow chains, with the donor list's chain indices re-based by the
/// size of the receiving overflow table. Duplicate materials are
/// coalesced, so the merged content does not depend on argument order.
#[must_use]
pub fn merge_edge_lists(
    a: &CompressedEdgeList,
    b: &CompressedEdgeList,
) -> CompressedEdgeList {
    let base = a.overflow.len() as u32;
    let rebase = |idx: u32| if idx == NONE { NONE } else { idx + base };

    let mut overflow = a.overflow.clone();
    overflow.extend(b.overflow.iter().map(|row| OverflowRecord {
        material: row.material,
        next: rebase(row.next),
    }));

    let mut records = Vec::with_capacity(a.records.len() + b.records.len());

    let (mut i, mut j) = (0, 0);
    while i < a.records.len() || j < b.records.len() {
        let take_a = match (a.records.get(i), b.records.get(j)) {
            (Some(ra), Some(rb)) => {
                match (ra.node_a, ra.node_b).cmp(&(rb.node_a, rb.node_b)) {
                    std::cmp::Ordering::Less => true,
                    std::cmp::Ordering::Greater => false,
                    std::cmp::Ordering::Equal => {
                        // Collision: union the chains onto a's record.
                        let mut merged = *ra;
                        let mut present = a.materials(i);
                        for mat in b.materials(j) {
                            if !present.contains(&mat) {
                                let idx = overflow.len() as u32;
                                overflow.push(OverflowRecord {
                                    material: mat,
                                    next: merged.overflow,
                                });
                                merged.overflow = idx;
                                present.push(mat);
                            }
                        }
                        records.push(merged);
                        i += 1;
                        j += 1;
                        continue;
                    }
                }
            }
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };

        if take_a {
            records.push(a.records[i]);
            i += 1;
        } else {
            let mut rec = b.records[j];
            rec.overflow = rebase(rec.overflow);
            records.push(rec);
            j += 1;
        }
    }

    CompressedEdgeList { records, overflow }
}
