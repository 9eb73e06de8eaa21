//! Neighbor-element tables over shared faces.
//!
//! For every (element, local face) pair of a class, finds the adjacent
//! element sharing that face in near-linear time using a bucket-hash face
//! table keyed by each face's minimum node id. Unmatched faces are mesh
//! boundary; faces collapsed below a valid arity are tagged degenerate and
//! never matched.

use tracing::debug;

use crate::error::{CapacityError, Result};
use crate::mesh::ElementClass;

/// Sentinel index for "no entry" in chains and free lists.
const NONE: u32 = u32::MAX;

/// Adjacency slot value for one (element, local face) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Neighbor {
    /// Index of the element sharing this face.
    Element(u32),
    /// No neighbor: the face lies on the mesh boundary.
    Boundary,
    /// The face is collapsed to an edge or point and was never matched.
    Degenerate,
}

/// Per-class neighbor table, `qty x faces_per_element` slots.
#[derive(Debug, Clone)]
pub struct AdjacencyTable {
    faces_per_element: usize,
    slots: Vec<Neighbor>,
}

impl AdjacencyTable {
    fn new(qty: usize, faces_per_element: usize) -> Self {
        Self {
            faces_per_element,
            slots: vec![Neighbor::Boundary; qty * faces_per_element],
        }
    }

    /// Number of faces per element in this table.
    #[must_use]
    pub fn faces_per_element(&self) -> usize {
        self.faces_per_element
    }

    /// Number of elements covered by this table.
    #[must_use]
    pub fn element_count(&self) -> usize {
        if self.faces_per_element == 0 {
            0
        } else {
            self.slots.len() / self.faces_per_element
        }
    }

    /// Neighbor of local face `f` of element `e`.
    ///
    /// # Panics
    ///
    /// Panics if `e` or `f` is out of range.
    #[must_use]
    pub fn neighbor(&self, e: usize, f: usize) -> Neighbor {
        assert!(f < self.faces_per_element);
        self.slots[e * self.faces_per_element + f]
    }

    fn set(&mut self, e: usize, f: usize, value: Neighbor) {
        self.slots[e * self.faces_per_element + f] = value;
    }

    /// Diagnostic check of the symmetry invariant: every `Element`
    /// reference must be answered by a reciprocal reference.
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        let fpe = self.faces_per_element;
        for e in 0..self.element_count() {
            for f in 0..fpe {
                if let Neighbor::Element(n) = self.neighbor(e, f) {
                    let reciprocal = (0..fpe).any(|g| {
                        self.neighbor(n as usize, g) == Neighbor::Element(e as u32)
                    });
                    if !reciprocal {
                        return false;
                    }
                }
            }
        }
        true
    }
}

/// Whether coincident geometry of different materials may overlap.
///
/// In `Separate` mode adjacency is built per material subset, so faces of
/// different materials never match and each material surfaces on its own.
/// The `Unified` mode matches across the whole class irrespective of
/// material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapMode {
    #[default]
    Unified,
    Separate,
}

/// One row of the growable face table.
#[derive(Debug, Clone, Copy)]
struct FaceRow {
    key: [u32; 4],
    elem: u32,
    face: u8,
    next: u32,
}

/// Arena of face rows addressed by stable indices, with an embedded free
/// list. Growth doubles the arena; index-based chain links survive
/// reallocation without fixup.
#[derive(Debug)]
struct FaceArena {
    rows: Vec<FaceRow>,
    free_head: u32,
}

impl FaceArena {
    fn empty() -> Self {
        Self {
            rows: Vec::new(),
            free_head: NONE,
        }
    }

    fn acquire(&mut self) -> Result<u32, CapacityError> {
        if self.free_head == NONE {
            self.grow()?;
        }
        let idx = self.free_head;
        self.free_head = self.rows[idx as usize].next;
        Ok(idx)
    }

    fn release(&mut self, idx: u32) {
        self.rows[idx as usize].next = self.free_head;
        self.free_head = idx;
    }

    fn grow(&mut self) -> Result<(), CapacityError> {
        let additional = self.rows.len().max(64);
        self.rows
            .try_reserve(additional)
            .map_err(|_| CapacityError::FaceTable {
                requested: additional,
            })?;
        debug!(rows = self.rows.len(), additional, "growing face table");
        for _ in 0..additional {
            let idx = self.rows.len() as u32;
            self.rows.push(FaceRow {
                key: [0; 4],
                elem: 0,
                face: 0,
                next: self.free_head,
            });
            self.free_head = idx;
        }
        Ok(())
    }

    /// Drops all live rows and relinks everything as free, keeping the
    /// allocation for the next subset pass.
    fn reset(&mut self) {
        self.rows.clear();
        self.free_head = NONE;
    }
}

/// Canonical match key for a face: its distinct node ids sorted ascending,
/// padded to four entries by repeating the last id.
///
/// A quad face collapsed to three distinct nodes thereby compares equal to
/// any face with the same distinct node set, regardless of which corner is
/// repeated. Returns `None` when the face has collapsed below a valid
/// arity (fewer than 3 distinct nodes for a polygon, fewer than 2 for a
/// shell edge).
fn canonical_key(nodes: &[u32; 4], len: usize) -> Option<[u32; 4]> {
    let mut sorted = [0u32; 4];
    sorted[..len].copy_from_slice(&nodes[..len]);
    sorted[..len].sort_unstable();

    let mut distinct = [0u32; 4];
    let mut d = 0;
    for &n in &sorted[..len] {
        if d == 0 || distinct[d - 1] != n {
            distinct[d] = n;
            d += 1;
        }
    }

    let min_arity = if len == 2 { 2 } else { 3 };
    if d < min_arity {
        return None;
    }

    let last = distinct[d - 1];
    for slot in distinct.iter_mut().skip(d) {
        *slot = last;
    }
    Some(distinct)
}

/// Builds the neighbor table of an element class.
///
/// Faces are matched across the whole class, or per material subset when
/// `overlap` is [`OverlapMode::Separate`], so that coincident faces of
/// different materials are not matched against each other.
///
/// # Errors
///
/// Returns a capacity error if the face table cannot grow; the build is
/// aborted and no table is produced.
pub fn build_adjacency(class: &ElementClass, overlap: OverlapMode) -> Result<AdjacencyTable> {
    let qty = class.qty();
    let fpe = class.shape().face_count();
    let mut table = AdjacencyTable::new(qty, fpe);
    if qty == 0 || fpe == 0 {
        return Ok(table);
    }

    let node_span = class.max_node().map_or(0, |m| m as usize + 1);
    let mut state = MatchState {
        node_head: vec![NONE; node_span],
        touched: Vec::new(),
        arena: FaceArena::empty(),
    };

    match overlap {
        OverlapMode::Unified => {
            match_faces(class, 0..qty, &mut table, &mut state)?;
        }
        OverlapMode::Separate => {
            let mut mats: Vec<i32> = class.materials().to_vec();
            mats.sort_unstable();
            mats.dedup();
            for mat in mats {
                let elems = (0..qty).filter(|&e| class.material(e) == mat);
                match_faces(class, elems, &mut table, &mut state)?;
                state.reset_chains();
            }
        }
    }

    Ok(table)
}

struct MatchState {
    node_head: Vec<u32>,
    touched: Vec<usize>,
    arena: FaceArena,
}

impl MatchState {
    fn reset_chains(&mut self) {
        for &n in &self.touched {
            self.node_head[n] = NONE;
        }
        self.touched.clear();
        self.arena.reset();
    }
}

fn match_faces(
    class: &ElementClass,
    elems: impl Iterator<Item = usize>,
    table: &mut AdjacencyTable,
    state: &mut MatchState,
) -> Result<()> {
    let fpe = class.shape().face_count();

    for e in elems {
        for f in 0..fpe {
            let (nodes, len) = class.face_nodes(e, f);
            let Some(key) = canonical_key(&nodes, len) else {
                table.set(e, f, Neighbor::Degenerate);
                continue;
            };
            let min = key[0] as usize;

            // Walk the collision chain of the face's minimum node.
            let mut prev = NONE;
            let mut cur = state.node_head[min];
            while cur != NONE {
                let row = state.arena.rows[cur as usize];
                if row.key == key {
                    break;
                }
                prev = cur;
                cur = row.next;
            }

            if cur == NONE {
                // First sighting: insert at the chain head.
                let idx = state.arena.acquire()?;
                let head = state.node_head[min];
                state.arena.rows[idx as usize] = FaceRow {
                    key,
                    elem: e as u32,
                    face: f as u8,
                    next: head,
                };
                if head == NONE {
                    state.touched.push(min);
                }
                state.node_head[min] = idx;
            } else {
                // Second sighting: link both adjacency slots and recycle
                // the row.
                let row = state.arena.rows[cur as usize];
                table.set(e, f, Neighbor::Element(row.elem));
                table.set(row.elem as usize, row.face as usize, Neighbor::Element(e as u32));
                if prev == NONE {
                    state.node_head[min] = row.next;
                } else {
                    state.arena.rows[prev as usize].next = row.next;
                }
                state.arena.release(cur);
            }
        }
    }
    Ok(())
}
