use thiserror::Error;

/// Top-level error type for the Verge visibility engine.
#[derive(Debug, Error)]
pub enum VergeError {
    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Capacity(#[from] CapacityError),

    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Errors in mesh topology data.
///
/// These are per-class precondition violations; a failing class does not
/// affect processing of other classes.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("element class not found: {0}")]
    ClassNotFound(String),

    #[error(
        "class {class}: connectivity length {actual} is not a multiple of \
         {nodes_per_elem} nodes per element"
    )]
    ConnectivityLength {
        class: String,
        actual: usize,
        nodes_per_elem: usize,
    },

    #[error("class {class}: material array has {actual} entries, expected {expected}")]
    MaterialLength {
        class: String,
        actual: usize,
        expected: usize,
    },

    #[error(
        "class {class}: element {element} references node {node}, \
         but the mesh has only {node_count} nodes"
    )]
    NodeIndexOutOfRange {
        class: String,
        element: usize,
        node: u32,
        node_count: usize,
    },
}

/// Resource-exhaustion errors from growable working tables.
///
/// A capacity failure aborts the current build only; tables committed by
/// earlier builds are left untouched.
#[derive(Debug, Error)]
pub enum CapacityError {
    #[error("face table growth failed while reserving {requested} rows")]
    FaceTable { requested: usize },

    #[error("edge list growth failed while reserving {requested} records")]
    EdgeList { requested: usize },
}

/// Errors while reading a hidden-line scene description.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("unexpected end of scene input while reading {context}")]
    UnexpectedEof { context: &'static str },

    #[error("expected token `{expected}`, found `{found}`")]
    Token { expected: &'static str, found: String },

    #[error("malformed number `{token}` while reading {context}")]
    Number { token: String, context: &'static str },

    #[error("unknown projection mode `{0}`")]
    UnknownProjection(String),

    #[error("scene entity references node {index}, but only {count} nodes were read")]
    NodeIndexOutOfRange { index: u32, count: usize },
}

/// Convenience type alias for results using [`VergeError`].
pub type Result<T, E = VergeError> = std::result::Result<T, E>;
