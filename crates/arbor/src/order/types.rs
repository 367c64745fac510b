#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship {
    /// Neighbours on the layer to the left (prerequisites side).
    InEdges,
    /// Neighbours on the layer to the right (dependents side).
    OutEdges,
}
