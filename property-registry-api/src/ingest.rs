//! Inbound property payloads.
//!
//! External clients send property records under several historical field
//! names. [`PropertyPayload`] accepts all of them and [`PropertyPayload::normalize`]
//! turns the payload into the single canonical [`PropertyDraft`]. Nothing past
//! this module deals with alternative field names.

use heapless::String as HeaplessString;
use property_registry_db::{PropertyPurpose, PropertyStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::{ApiError, ApiResult};

/// Payload layout understood by [`PropertyPayload::normalize`]
pub const PAYLOAD_VERSION: u32 = 1;

/// Decimal places kept for areas, matching the `NUMERIC(14,2)` area columns
pub const AREA_SCALE: u32 = 2;

/// Largest area the `NUMERIC(14,2)` columns can hold: 999 999 999 999.99 m²
pub const MAX_AREA: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, AREA_SCALE);

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PropertyPayload {
    /// Layout version; absent means [`PAYLOAD_VERSION`]
    #[serde(default)]
    pub version: Option<u32>,

    #[serde(default, alias = "parentId", alias = "parent_id", alias = "imovelPaiId")]
    pub parent_property_id: Option<Uuid>,

    #[serde(alias = "registrationNumber", alias = "matricula")]
    #[validate(length(min = 1, max = 50))]
    pub registration_number: String,

    #[serde(alias = "descricao")]
    #[validate(length(min = 1, max = 255))]
    pub description: String,

    #[serde(default, alias = "endereco")]
    #[validate(length(max = 255))]
    pub address: Option<String>,

    #[serde(default, alias = "municipio")]
    #[validate(length(max = 100))]
    pub locality: Option<String>,

    #[serde(default, alias = "finalidade")]
    pub purpose: Option<PropertyPurpose>,

    #[serde(default, alias = "situacao")]
    pub status: Option<PropertyStatus>,

    #[serde(alias = "totalArea", alias = "areaTotal", alias = "area_total")]
    pub total_area: Decimal,

    #[serde(default, alias = "builtArea", alias = "area_construida")]
    pub built_area: Option<Decimal>,
}

/// Canonical, validated property fields supplied by a caller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyDraft {
    pub parent_property_id: Option<Uuid>,
    pub registration_number: HeaplessString<50>,
    pub description: HeaplessString<255>,
    pub address: Option<HeaplessString<255>>,
    pub locality: Option<HeaplessString<100>>,
    pub purpose: PropertyPurpose,
    pub status: PropertyStatus,
    pub total_area: Decimal,
    pub built_area: Option<Decimal>,
}

impl PropertyPayload {
    pub fn normalize(self) -> ApiResult<PropertyDraft> {
        let version = self.version.unwrap_or(PAYLOAD_VERSION);
        if version != PAYLOAD_VERSION {
            return Err(ApiError::Validation(format!(
                "unsupported payload version {version}"
            )));
        }

        self.validate()
            .map_err(|e| ApiError::Validation(e.to_string()))?;

        let total_area = checked_area(self.total_area, "total_area")?;
        let built_area = self
            .built_area
            .map(|area| checked_area(area, "built_area"))
            .transpose()?;

        let registration_number = required_text(&self.registration_number, "registration_number")?;
        let description = required_text(&self.description, "description")?;

        Ok(PropertyDraft {
            parent_property_id: self.parent_property_id,
            registration_number: bounded(registration_number, "registration_number")?,
            description: bounded(description, "description")?,
            address: optional_text(self.address.as_deref(), "address")?,
            locality: optional_text(self.locality.as_deref(), "locality")?,
            purpose: self.purpose.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            total_area,
            built_area,
        })
    }
}

/// Areas must be non-negative, at most [`MAX_AREA`] and carry no more than
/// [`AREA_SCALE`] significant decimal places. The accepted value comes back
/// at exactly [`AREA_SCALE`] places, the form every store returns it in.
fn checked_area(area: Decimal, field: &str) -> ApiResult<Decimal> {
    if area.is_sign_negative() && !area.is_zero() {
        return Err(ApiError::Validation(format!("{field} must not be negative")));
    }
    if area.normalize().scale() > AREA_SCALE {
        return Err(ApiError::Validation(format!(
            "{field} must have at most {AREA_SCALE} decimal places"
        )));
    }
    if area > MAX_AREA {
        return Err(ApiError::Validation(format!("{field} must not exceed {MAX_AREA}")));
    }

    let mut area = area.abs();
    area.rescale(AREA_SCALE);
    Ok(area)
}

fn required_text<'a>(value: &'a str, field: &str) -> ApiResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Validation(format!("{field} must not be blank")));
    }
    Ok(trimmed)
}

fn optional_text<const N: usize>(
    value: Option<&str>,
    field: &str,
) -> ApiResult<Option<HeaplessString<N>>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => bounded(text, field).map(Some),
    }
}

// Capacity is in bytes, so accented text can overflow it even when the
// character count passed validation.
fn bounded<const N: usize>(value: &str, field: &str) -> ApiResult<HeaplessString<N>> {
    HeaplessString::try_from(value)
        .map_err(|_| ApiError::Validation(format!("{field} exceeds {N} bytes")))
}
