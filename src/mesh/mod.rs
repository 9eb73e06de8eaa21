pub mod class;
pub mod shape;

pub use class::ElementClass;
pub use shape::ElemShape;

use crate::error::TopologyError;
use crate::math::Point3;
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Unique identifier for an element class in the mesh store.
    pub struct ClassId;
}

/// Central store for one loaded mesh: global node coordinates plus the
/// element classes defined over them.
///
/// Classes reference nodes via indices into the shared coordinate array;
/// the store validates those references on insertion so that downstream
/// topology code never has to handle out-of-range indices defensively.
#[derive(Debug, Default)]
pub struct MeshStore {
    nodes: Vec<Point3>,
    classes: SlotMap<ClassId, ElementClass>,
}

impl MeshStore {
    /// Creates a new, empty mesh store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store over the given node coordinates.
    #[must_use]
    pub fn with_nodes(nodes: Vec<Point3>) -> Self {
        Self {
            nodes,
            classes: SlotMap::default(),
        }
    }

    /// Number of nodes in the mesh.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Node coordinate array.
    #[must_use]
    pub fn nodes(&self) -> &[Point3] {
        &self.nodes
    }

    /// Inserts an element class after validating its node references.
    ///
    /// A failing class is rejected without affecting classes already in
    /// the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the class references a node index outside the
    /// mesh's coordinate array.
    pub fn add_class(&mut self, class: ElementClass) -> Result<ClassId, TopologyError> {
        let node_count = self.nodes.len();
        for e in 0..class.qty() {
            for &n in class.element_nodes(e) {
                if n as usize >= node_count {
                    return Err(TopologyError::NodeIndexOutOfRange {
                        class: class.name().to_owned(),
                        element: e,
                        node: n,
                        node_count,
                    });
                }
            }
        }
        Ok(self.classes.insert(class))
    }

    /// Returns a reference to the class data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the class is not in the store.
    pub fn class(&self, id: ClassId) -> Result<&ElementClass, TopologyError> {
        self.classes
            .get(id)
            .ok_or_else(|| TopologyError::ClassNotFound("element class".into()))
    }

    /// Iterates over all classes with their ids.
    pub fn classes(&self) -> impl Iterator<Item = (ClassId, &ElementClass)> {
        self.classes.iter()
    }
}
