#[cfg(test)]
pub mod test_utils {
    use chrono::Utc;
    use heapless::String as HeaplessString;
    use property_registry_db::models::property::PropertyModel;
    use property_registry_db::{PropertyPurpose, PropertyStatus};
    use rand::Rng;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    /// Property with a random registration number, so tests never collide on the unique index
    pub fn create_test_property(parent_property_id: Option<Uuid>) -> PropertyModel {
        let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
        let registration_number = format!("TEST-{suffix:09}");

        PropertyModel {
            id: Uuid::new_v4(),
            parent_property_id,
            registration_number: HeaplessString::try_from(registration_number.as_str()).unwrap(),
            description: HeaplessString::try_from("Test property").unwrap(),
            address: Some(HeaplessString::try_from("Rua das Flores, 10").unwrap()),
            locality: Some(HeaplessString::try_from("Campinas").unwrap()),
            purpose: PropertyPurpose::Residential,
            status: PropertyStatus::Active,
            total_area: Decimal::new(50000, 2),
            built_area: None,
            document_count: 0,
            registration_date: Utc::now(),
            update_date: None,
        }
    }
}
