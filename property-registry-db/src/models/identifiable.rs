use uuid::Uuid;

/// Records addressed by a UUID primary key
pub trait Identifiable {
    fn get_id(&self) -> Uuid;
}

/// Marker for index records, the lightweight projections kept in the index cache
pub trait Index: Identifiable {}
