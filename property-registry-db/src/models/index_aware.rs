use super::identifiable::Index;

/// Trait for persisted models that maintain a companion index record
pub trait IndexAware {
    /// The associated Index type that this model is projected to
    type IndexType: Index;

    /// Projects this model onto its index record
    fn to_index(&self) -> Self::IndexType;
}
