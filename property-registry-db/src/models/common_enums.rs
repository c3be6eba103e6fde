use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Intended use of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "property_purpose", rename_all = "PascalCase")]
pub enum PropertyPurpose {
    Residential,
    Commercial,
    Institutional,
    Rural,
    Mixed,
    #[default]
    Other,
}

impl std::fmt::Display for PropertyPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyPurpose::Residential => write!(f, "Residential"),
            PropertyPurpose::Commercial => write!(f, "Commercial"),
            PropertyPurpose::Institutional => write!(f, "Institutional"),
            PropertyPurpose::Rural => write!(f, "Rural"),
            PropertyPurpose::Mixed => write!(f, "Mixed"),
            PropertyPurpose::Other => write!(f, "Other"),
        }
    }
}

impl FromStr for PropertyPurpose {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Residential" => Ok(PropertyPurpose::Residential),
            "Commercial" => Ok(PropertyPurpose::Commercial),
            "Institutional" => Ok(PropertyPurpose::Institutional),
            "Rural" => Ok(PropertyPurpose::Rural),
            "Mixed" => Ok(PropertyPurpose::Mixed),
            "Other" => Ok(PropertyPurpose::Other),
            _ => Err(()),
        }
    }
}

/// Administrative status of a property record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "property_status", rename_all = "PascalCase")]
pub enum PropertyStatus {
    #[default]
    Active,
    Inactive,
    UnderReview,
    Disposed,
}

impl std::fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyStatus::Active => write!(f, "Active"),
            PropertyStatus::Inactive => write!(f, "Inactive"),
            PropertyStatus::UnderReview => write!(f, "UnderReview"),
            PropertyStatus::Disposed => write!(f, "Disposed"),
        }
    }
}

impl FromStr for PropertyStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(PropertyStatus::Active),
            "Inactive" => Ok(PropertyStatus::Inactive),
            "UnderReview" => Ok(PropertyStatus::UnderReview),
            "Disposed" => Ok(PropertyStatus::Disposed),
            _ => Err(()),
        }
    }
}
