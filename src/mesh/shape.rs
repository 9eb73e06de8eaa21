/// Element shape category (topology tag).
///
/// Each variant carries static element-local node tables so that
/// adjacency, face and edge code is written once, parameterized by the
/// shape, instead of duplicated per element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElemShape {
    /// 8-node hexahedron, 6 quadrilateral faces.
    Hex,
    /// 4-node tetrahedron, 4 triangular faces.
    Tet,
    /// 5-node pyramid, 1 quadrilateral and 4 triangular faces.
    Pyramid,
    /// 4-node quadrilateral shell; its "faces" are its 4 edges.
    Quad,
    /// 3-node triangular shell; its "faces" are its 3 edges.
    Tri,
    /// 2-node beam element (no faces).
    Beam,
    /// 2-node truss element (no faces).
    Truss,
    /// 4-node surface facet; treated like a quad shell.
    Surface,
}

// Hexahedron: nodes 0-3 form the bottom face, 4-7 the top, with node i+4
// above node i. Face node orders give outward normals.
const HEX_FACES: [&[usize]; 6] = [
    &[0, 1, 5, 4],
    &[1, 2, 6, 5],
    &[2, 3, 7, 6],
    &[3, 0, 4, 7],
    &[4, 5, 6, 7],
    &[0, 3, 2, 1],
];

const HEX_EDGES: [[usize; 2]; 12] = [
    [0, 1],
    [1, 2],
    [2, 3],
    [3, 0],
    [4, 5],
    [5, 6],
    [6, 7],
    [7, 4],
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
];

// Tetrahedron: nodes 0-2 form the base, node 3 is the apex.
const TET_FACES: [&[usize]; 4] = [&[0, 2, 1], &[0, 1, 3], &[1, 2, 3], &[2, 0, 3]];

const TET_EDGES: [[usize; 2]; 6] = [[0, 1], [1, 2], [2, 0], [0, 3], [1, 3], [2, 3]];

// Pyramid: nodes 0-3 form the base, node 4 is the apex.
const PYRAMID_FACES: [&[usize]; 5] = [
    &[0, 3, 2, 1],
    &[0, 1, 4],
    &[1, 2, 4],
    &[2, 3, 4],
    &[3, 0, 4],
];

const PYRAMID_EDGES: [[usize; 2]; 8] = [
    [0, 1],
    [1, 2],
    [2, 3],
    [3, 0],
    [0, 4],
    [1, 4],
    [2, 4],
    [3, 4],
];

// Shell and line elements: "faces" used for adjacency are their edges.
const QUAD_FACES: [&[usize]; 4] = [&[0, 1], &[1, 2], &[2, 3], &[3, 0]];
const QUAD_EDGES: [[usize; 2]; 4] = [[0, 1], [1, 2], [2, 3], [3, 0]];

const TRI_FACES: [&[usize]; 3] = [&[0, 1], &[1, 2], &[2, 0]];
const TRI_EDGES: [[usize; 2]; 3] = [[0, 1], [1, 2], [2, 0]];

const LINE_EDGES: [[usize; 2]; 1] = [[0, 1]];

impl ElemShape {
    /// Number of nodes in one element of this shape.
    #[must_use]
    pub fn node_count(self) -> usize {
        match self {
            Self::Hex => 8,
            Self::Tet => 4,
            Self::Pyramid => 5,
            Self::Quad | Self::Surface => 4,
            Self::Tri => 3,
            Self::Beam | Self::Truss => 2,
        }
    }

    /// Number of matchable faces per element (edges for shell shapes).
    #[must_use]
    pub fn face_count(self) -> usize {
        self.face_table().len()
    }

    /// Element-local node indices of face `f`, in outward winding order.
    ///
    /// # Panics
    ///
    /// Panics if `f` is out of range for this shape.
    #[must_use]
    pub fn face_nodes(self, f: usize) -> &'static [usize] {
        self.face_table()[f]
    }

    /// Element-local node index pairs of all wireframe edges.
    #[must_use]
    pub fn edge_nodes(self) -> &'static [[usize; 2]] {
        match self {
            Self::Hex => &HEX_EDGES,
            Self::Tet => &TET_EDGES,
            Self::Pyramid => &PYRAMID_EDGES,
            Self::Quad | Self::Surface => &QUAD_EDGES,
            Self::Tri => &TRI_EDGES,
            Self::Beam | Self::Truss => &LINE_EDGES,
        }
    }

    /// `true` for volumetric shapes whose faces are polygons.
    #[must_use]
    pub fn is_volumetric(self) -> bool {
        matches!(self, Self::Hex | Self::Tet | Self::Pyramid)
    }

    fn face_table(self) -> &'static [&'static [usize]] {
        match self {
            Self::Hex => &HEX_FACES,
            Self::Tet => &TET_FACES,
            Self::Pyramid => &PYRAMID_FACES,
            Self::Quad | Self::Surface => &QUAD_FACES,
            Self::Tri => &TRI_FACES,
            Self::Beam | Self::Truss => &[],
        }
    }
}
