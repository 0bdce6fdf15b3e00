//! Recoverable errors from layout tree operations.
//!
//! Invariant violations (styleless roots, containing-block queries on
//! detached nodes, double table-box transfer) are panics, not errors.

use thiserror::Error;
use trellis_geometry::GeometryError;

use crate::LayoutNodeId;

/// Structural mutation or lookup failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The id refers to a slot that has been reclaimed or reused.
    #[error("layout node {0:?} is no longer live")]
    StaleNode(LayoutNodeId),

    /// `child` is not a child of `parent`.
    #[error("{child:?} is not a child of {parent:?}")]
    NotAChild {
        /// The expected parent.
        parent: LayoutNodeId,
        /// The node that was not found among its children.
        child: LayoutNodeId,
    },

    /// The node kind never has children (text, breaks, markers, images).
    #[error("layout node {0:?} cannot have children")]
    CannotHaveChildren(LayoutNodeId),

    /// Inserting would make a node its own ancestor.
    #[error("inserting {child:?} under {parent:?} would create a cycle")]
    WouldCycle {
        /// The prospective parent.
        parent: LayoutNodeId,
        /// The node being inserted.
        child: LayoutNodeId,
    },
}

/// Failures from the read-only resolved style declaration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolvedStyleError {
    /// [CSSOM § 6.6](https://drafts.csswg.org/cssom/#dom-cssstyledeclaration-setproperty)
    ///
    /// "If the computed flag is set, then throw a NoModificationAllowedError exception."
    #[error("cannot modify properties in the result of a computed style query")]
    NoModificationAllowed,

    /// The element generates no layout node, so there is nothing to resolve against.
    #[error("element has no layout node")]
    NoLayoutNode,

    /// The transform could not be serialized.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}
