use crate::error::TopologyError;

use super::shape::ElemShape;

/// A topologically-homogeneous group of mesh elements.
///
/// Immutable for the lifetime of a session: owns the flat connectivity
/// array, the per-element material ids and the shape tag. Derived data
/// (adjacency, visibility, face lists) is computed over it, never stored
/// in it.
#[derive(Debug, Clone)]
pub struct ElementClass {
    name: String,
    shape: ElemShape,
    qty: usize,
    connectivity: Vec<u32>,
    materials: Vec<i32>,
}

impl ElementClass {
    /// Creates an element class from a flat connectivity array
    /// (`qty * node_count` 0-based node indices) and per-element materials.
    ///
    /// # Errors
    ///
    /// Returns an error if the connectivity length is not a multiple of the
    /// shape's node count, or if the material array length does not match
    /// the element count.
    pub fn new(
        name: impl Into<String>,
        shape: ElemShape,
        connectivity: Vec<u32>,
        materials: Vec<i32>,
    ) -> Result<Self, TopologyError> {
        let name = name.into();
        let nodes_per_elem = shape.node_count();
        if connectivity.len() % nodes_per_elem != 0 {
            return Err(TopologyError::ConnectivityLength {
                class: name,
                actual: connectivity.len(),
                nodes_per_elem,
            });
        }
        let qty = connectivity.len() / nodes_per_elem;
        if materials.len() != qty {
            return Err(TopologyError::MaterialLength {
                class: name,
                actual: materials.len(),
                expected: qty,
            });
        }
        Ok(Self {
            name,
            shape,
            qty,
            connectivity,
            materials,
        })
    }

    /// Name of the class.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shape tag of the class.
    #[must_use]
    pub fn shape(&self) -> ElemShape {
        self.shape
    }

    /// Number of elements in the class.
    #[must_use]
    pub fn qty(&self) -> usize {
        self.qty
    }

    /// Global node indices of element `e`.
    ///
    /// # Panics
    ///
    /// Panics if `e` is out of range.
    #[must_use]
    pub fn element_nodes(&self, e: usize) -> &[u32] {
        let n = self.shape.node_count();
        &self.connectivity[e * n..(e + 1) * n]
    }

    /// Material id of element `e`.
    ///
    /// # Panics
    ///
    /// Panics if `e` is out of range.
    #[must_use]
    pub fn material(&self, e: usize) -> i32 {
        self.materials[e]
    }

    /// Per-element material ids.
    #[must_use]
    pub fn materials(&self) -> &[i32] {
        &self.materials
    }

    /// Global node indices of local face `f` of element `e`.
    ///
    /// Returns the nodes in a fixed array together with the face arity
    /// (2 for shell edges, 3 or 4 for volume faces).
    ///
    /// # Panics
    ///
    /// Panics if `e` or `f` is out of range.
    #[must_use]
    pub fn face_nodes(&self, e: usize, f: usize) -> ([u32; 4], usize) {
        let elem = self.element_nodes(e);
        let local = self.shape.face_nodes(f);
        let mut nodes = [0u32; 4];
        for (slot, &i) in nodes.iter_mut().zip(local.iter()) {
            *slot = elem[i];
        }
        (nodes, local.len())
    }

    /// Largest node index referenced by the connectivity, if any.
    #[must_use]
    pub fn max_node(&self) -> Option<u32> {
        self.connectivity.iter().copied().max()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn rejects_ragged_connectivity() {
        let result = ElementClass::new("hexes", ElemShape::Hex, vec![0; 9], vec![1]);
        assert!(matches!(
            result,
            Err(TopologyError::ConnectivityLength { .. })
        ));
    }

    #[test]
    fn rejects_short_material_array() {
        let result = ElementClass::new("tets", ElemShape::Tet, vec![0, 1, 2, 3], vec![]);
        assert!(matches!(result, Err(TopologyError::MaterialLength { .. })));
    }

    #[test]
    fn face_nodes_follow_shape_table() {
        let class = ElementClass::new(
            "tets",
            ElemShape::Tet,
            vec![10, 11, 12, 13],
            vec![1],
        )
        .unwrap();
        let (nodes, len) = class.face_nodes(0, 0);
        assert_eq!(len, 3);
        // Tet face 0 is [0, 2, 1] in element-local numbering.
        assert_eq!(&nodes[..3], &[10, 12, 11]);
    }
}
