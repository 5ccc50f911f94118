//! Agent context trait.

/// Per-agent world state read by predicates and mutated by action handlers.
///
/// The host owns the context and lends it to [`Tree::tick`] by mutable
/// borrow every frame; the tree never stores it. This keeps the tree free of
/// lifetimes while guaranteeing that exactly one tick at a time touches the
/// agent state.
///
/// [`Tree::tick`]: crate::Tree::tick
pub trait Context {
    /// Called exactly once per tick, before any node is evaluated.
    ///
    /// Typical implementations pull fresh sensor data or cache derived
    /// values that several predicates will read during the same tick.
    fn refresh(&mut self);
}
