use chrono::{TimeZone, Utc};
use criminal_intent_core::{Crime, CrimeId};
use std::cell::RefCell;
use uuid::Uuid;

#[test]
fn crime_new_sets_defaults() {
    let before = Utc::now();
    let crime = Crime::new();
    let after = Utc::now();

    assert!(!crime.id().as_uuid().is_nil());
    assert_eq!(crime.title, "");
    assert!(!crime.is_solved);
    // Default date is "now", truncated to whole milliseconds.
    assert!(crime.date.timestamp_millis() >= before.timestamp_millis());
    assert!(crime.date <= after);
}

#[test]
fn builder_returns_supplied_values() {
    let id = CrimeId::from_uuid(Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap());
    let date = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();

    let crime = Crime::builder()
        .id(id)
        .title("Theft")
        .date(date)
        .is_solved(true)
        .build();

    assert_eq!(crime.id(), id);
    assert_eq!(crime.title, "Theft");
    assert_eq!(crime.date, date);
    assert!(crime.is_solved);
}

#[test]
fn fields_other_than_id_are_mutable() {
    let mut crime = Crime::builder().title("draft").build();
    let id = crime.id();

    crime.title = "Burglary".to_string();
    crime.is_solved = true;
    crime.date = Utc.timestamp_millis_opt(0).unwrap();

    assert_eq!(crime.id(), id);
    assert_eq!(crime.title, "Burglary");
    assert!(crime.is_solved);
    assert_eq!(crime.date.timestamp_millis(), 0);
}

#[test]
fn omitted_ids_are_unique() {
    let first = Crime::new();
    let second = Crime::new();
    assert_ne!(first.id(), second.id());
}

#[test]
fn fixed_sequence_generator_is_deterministic() {
    let sequence = RefCell::new(vec![
        CrimeId::from_uuid(Uuid::from_u128(2)),
        CrimeId::from_uuid(Uuid::from_u128(1)),
    ]);
    let generator = || sequence.borrow_mut().pop().expect("sequence exhausted");

    let first = Crime::builder().build_with(&generator);
    let second = Crime::builder().build_with(&generator);

    assert_eq!(first.id(), CrimeId::from_uuid(Uuid::from_u128(1)));
    assert_eq!(second.id(), CrimeId::from_uuid(Uuid::from_u128(2)));
}

#[test]
fn equality_is_structural() {
    let date = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
    let id = CrimeId::new_random();
    let build = || Crime::builder().id(id).title("Theft").date(date).build();

    let left = build();
    let mut right = build();
    assert_eq!(left, right);

    right.is_solved = true;
    assert_ne!(left, right);
}

#[test]
fn crime_serialization_uses_expected_wire_fields() {
    let id = CrimeId::from_uuid(Uuid::parse_str("123e4567-e89b-12d3-a456-426614174000").unwrap());
    let crime = Crime::builder()
        .id(id)
        .title("Theft")
        .date(Utc.timestamp_millis_opt(1_700_000_000_000).unwrap())
        .build();

    let json = serde_json::to_value(&crime).unwrap();
    assert_eq!(json["id"], "123e4567-e89b-12d3-a456-426614174000");
    assert_eq!(json["title"], "Theft");
    assert_eq!(json["date"], "2023-11-14T22:13:20Z");
    assert_eq!(json["is_solved"], false);

    let decoded: Crime = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, crime);
}
