//! Error types for tree construction.

/// Errors surfaced while building a behavior tree.
///
/// Construction is the only fallible phase: ticking itself is synchronous
/// and deterministic, so there is no runtime error surface. Invariant
/// violations (e.g. a resume reaching a leaf) are defects and panic instead
/// of being reported through this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// The build factory produced no root node.
    #[error("behavior factory returned no root node")]
    EmptyBuild,
}
