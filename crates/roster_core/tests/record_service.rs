use roster_core::db::open_db_in_memory;
use roster_core::{
    BaseRecord, Record, RecordService, RecordServiceError, RecordType, RecordValidationError,
    RepoError, SchemaRegistry, SqliteRecordRepository, Student,
};
use rusqlite::Connection;
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use std::sync::Arc;

fn service(conn: &Connection) -> RecordService<SqliteRecordRepository<'_>> {
    RecordService::new(
        SqliteRecordRepository::new(conn),
        Arc::new(SchemaRegistry::standard().unwrap()),
    )
}

fn attrs(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("fixture must be an object, got {other}"),
    }
}

#[test]
fn add_student_then_list_returns_it() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let stored = service
        .add_record(
            RecordType::Student,
            &attrs(json!({"name": "Ann", "gender": "F", "age": 20, "grade": 10})),
        )
        .unwrap();
    let json = serde_json::to_value(&stored).unwrap();
    assert_eq!(json["grade"], 10);
    assert_eq!(json["itemtype"], "Student");

    let students = service.list_records(RecordType::Student).unwrap();
    assert_eq!(students.len(), 1);
    assert_eq!(students[0], stored);
}

#[test]
fn add_employee_then_list_returns_it() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let stored = service
        .add_record(
            RecordType::Employee,
            &attrs(json!({
                "name": "Bob", "gender": "M", "age": 30, "salary": 5000, "desig": "Engineer"
            })),
        )
        .unwrap();
    let json = serde_json::to_value(&stored).unwrap();
    assert_eq!(json["salary"], json!(5000));
    assert_eq!(json["designation"], "Engineer");

    assert_eq!(service.list_records(RecordType::Employee).unwrap().len(), 1);
}

#[test]
fn missing_field_fails_validation_and_persists_nothing() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let err = service
        .add_record(
            RecordType::Student,
            &attrs(json!({"name": "Ann", "gender": "F", "age": 20})),
        )
        .unwrap_err();
    assert!(err.is_validation());
    assert!(matches!(
        err,
        RecordServiceError::Validation(RecordValidationError::MissingField { field: "grade", .. })
    ));

    assert!(service.list_records(RecordType::Student).unwrap().is_empty());
}

#[test]
fn every_missing_required_field_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let complete = json!({
        "name": "Bob", "gender": "M", "age": 30, "salary": 5000, "desig": "Engineer"
    });

    for field in ["name", "gender", "age", "salary", "desig"] {
        let mut input = attrs(complete.clone());
        input.remove(field);
        let err = service.add_record(RecordType::Employee, &input).unwrap_err();
        assert!(err.is_validation(), "missing `{field}` should fail validation");
    }

    assert!(service.list_records(RecordType::Employee).unwrap().is_empty());
}

#[test]
fn lists_never_cross_variants() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    service
        .add_record(
            RecordType::Student,
            &attrs(json!({"name": "Ann", "gender": "F", "age": 20, "grade": 10})),
        )
        .unwrap();
    service
        .add_record(
            RecordType::Employee,
            &attrs(json!({
                "name": "Bob", "gender": "M", "age": 30, "salary": 5000, "desig": "Engineer"
            })),
        )
        .unwrap();

    for kind in RecordType::ALL {
        let listed = service.list_records(kind).unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed.iter().all(|stored| stored.kind() == kind));
    }
}

#[test]
fn repeated_lists_return_the_same_records() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    for name in ["Ann", "Cy"] {
        service
            .create_record(&Record::from(Student::new(BaseRecord::new(name, "F", 20), 9)))
            .unwrap();
    }

    let first: HashSet<_> = service
        .list_records(RecordType::Student)
        .unwrap()
        .into_iter()
        .map(|stored| stored.id)
        .collect();
    let second: HashSet<_> = service
        .list_records(RecordType::Student)
        .unwrap()
        .into_iter()
        .map(|stored| stored.id)
        .collect();
    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
}

#[test]
fn unregistered_variant_is_a_validation_error() {
    let conn = open_db_in_memory().unwrap();
    let service = RecordService::new(
        SqliteRecordRepository::new(&conn),
        Arc::new(SchemaRegistry::new()),
    );

    let err = service
        .add_record(
            RecordType::Student,
            &attrs(json!({"name": "Ann", "gender": "F", "age": 20, "grade": 10})),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        RecordServiceError::Validation(RecordValidationError::UnregisteredVariant(
            RecordType::Student
        ))
    ));
}

#[test]
fn store_failure_surfaces_as_persistence_error() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch("DROP TABLE items;").unwrap();
    let service = service(&conn);

    let add_err = service
        .add_record(
            RecordType::Student,
            &attrs(json!({"name": "Ann", "gender": "F", "age": 20, "grade": 10})),
        )
        .unwrap_err();
    assert!(matches!(add_err, RecordServiceError::Persistence(_)));

    let list_err = service.list_records(RecordType::Student).unwrap_err();
    assert!(matches!(list_err, RecordServiceError::Persistence(_)));
}

#[test]
fn corrupted_stored_record_is_a_persistence_error() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO items (id, itemtype, document, created_at)
         VALUES (?1, 'Student', ?2, 0);",
        [
            "00000000-0000-4000-8000-000000000001",
            r#"{"itemtype":"Student","name":"","gender":"F","age":20,"grade":10}"#,
        ],
    )
    .unwrap();
    let service = service(&conn);

    let err = service.list_records(RecordType::Student).unwrap_err();
    assert!(!err.is_validation());
    assert!(matches!(
        err,
        RecordServiceError::Persistence(RepoError::InvalidData(_))
    ));
}
