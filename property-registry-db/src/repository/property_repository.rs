use crate::models::property::PropertyModel;
use crate::repository::{
    CreateBatch, DeleteBatch, ExistByIds, FindByParentPropertyId, FindByRegistrationNumberHash,
    Load, LoadBatch, LoadPage, UpdateBatch,
};

/// Every repository operation available on properties
///
/// Implemented automatically for any type implementing the individual
/// operation traits, so services can work against `&dyn PropertyRepository`
/// regardless of the backing store.
pub trait PropertyRepository:
    Load<PropertyModel>
    + LoadBatch<PropertyModel>
    + CreateBatch<PropertyModel>
    + UpdateBatch<PropertyModel>
    + DeleteBatch
    + ExistByIds
    + LoadPage<PropertyModel>
    + FindByParentPropertyId
    + FindByRegistrationNumberHash
{
}

impl<R> PropertyRepository for R where
    R: Load<PropertyModel>
        + LoadBatch<PropertyModel>
        + CreateBatch<PropertyModel>
        + UpdateBatch<PropertyModel>
        + DeleteBatch
        + ExistByIds
        + LoadPage<PropertyModel>
        + FindByParentPropertyId
        + FindByRegistrationNumberHash
        + ?Sized
{
}
