use heapless::String as HeaplessString;
use property_registry_db::{RepositoryError, RepositoryResult};
use sqlx::{postgres::PgRow, Row};
use std::str::FromStr;

/// A trait for converting a database row into a model.
pub trait TryFromRow<R>: Sized {
    /// Performs the conversion.
    fn try_from_row(row: &R) -> RepositoryResult<Self>;
}

/// Retrieves a required `HeaplessString` from a row.
pub fn get_heapless_string<const N: usize>(
    row: &PgRow,
    col_name: &str,
) -> RepositoryResult<HeaplessString<N>> {
    let s: String = row.try_get(col_name)?;
    HeaplessString::from_str(&s).map_err(|_| too_long(col_name, N))
}

/// Retrieves an optional `HeaplessString` from a row.
pub fn get_optional_heapless_string<const N: usize>(
    row: &PgRow,
    col_name: &str,
) -> RepositoryResult<Option<HeaplessString<N>>> {
    let s: Option<String> = row.try_get(col_name)?;
    s.map(|val| HeaplessString::from_str(&val))
        .transpose()
        .map_err(|_| too_long(col_name, N))
}

fn too_long(col_name: &str, max: usize) -> RepositoryError {
    RepositoryError::Invalid(format!(
        "Value for column '{col_name}' is too long (max {max} bytes)"
    ))
}
