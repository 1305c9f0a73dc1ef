//! MeshLinkError: Unified error type for mesh-links public APIs
//!
//! Most of the link engine degrades instead of failing (see
//! [`crate::generator`]), so these errors surface from constructors, option
//! validation and the kernel session wrapper, and are absorbed at the
//! orchestration boundary.

use crate::link::LinkGeneratingType;
use thiserror::Error;

/// Unified error type for mesh-links operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshLinkError {
    /// Geometry that cannot be represented (too few ring points, NaN coordinates, ...).
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
    /// A discretization point refers to a branch that does not exist.
    #[error("Discretization point {point} refers to unknown branch {branch}")]
    UnknownBranch { point: usize, branch: usize },
    /// A grid cell refers to a vertex outside the vertex array.
    #[error("Cell {cell} refers to vertex {vertex}, but the grid has {vertex_count} vertices")]
    VertexOutOfRange {
        cell: usize,
        vertex: usize,
        vertex_count: usize,
    },
    /// A kernel call returned a nonzero status code.
    #[error("Kernel operation `{operation}` failed with status {code}")]
    KernelStatus { operation: &'static str, code: i32 },
    /// The kernel panicked while a call was in flight.
    #[error("Kernel operation `{0}` aborted")]
    KernelAborted(&'static str),
    /// The mode's contact computation failed or aborted.
    #[error("{0:?} contact computation failed")]
    ContactsFailed(LinkGeneratingType),
    /// A link generating mode could not be decoded.
    #[error("Unsupported link generating type: {0}")]
    UnsupportedMode(String),
    /// Generation options failed validation.
    #[error("Invalid link generation options: {0}")]
    InvalidOptions(String),
}
