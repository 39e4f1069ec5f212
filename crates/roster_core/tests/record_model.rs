use roster_core::{
    BaseRecord, Employee, Record, RecordId, RecordType, RecordValidationError, StoredRecord,
    Student,
};
use serde_json::json;
use uuid::Uuid;

#[test]
fn student_serializes_flat_with_discriminator() {
    let record = Record::from(Student::new(BaseRecord::new("Ann", "F", 20), 10));

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(
        json,
        json!({"itemtype": "Student", "name": "Ann", "gender": "F", "age": 20, "grade": 10})
    );

    let decoded: Record = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, record);
    assert_eq!(decoded.kind(), RecordType::Student);
}

#[test]
fn employee_accepts_desig_and_emits_designation() {
    let value = json!({
        "itemtype": "Employee",
        "name": "Bob",
        "gender": "M",
        "age": 30,
        "salary": 5000,
        "desig": "Engineer"
    });

    let record: Record = serde_json::from_value(value).unwrap();
    let Record::Employee(employee) = &record else {
        panic!("expected employee, got {record:?}");
    };
    assert_eq!(employee.designation, "Engineer");
    assert_eq!(employee.salary, 5000.0);

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["designation"], "Engineer");
    assert!(json.get("desig").is_none());
    assert_eq!(json["salary"], json!(5000));
}

#[test]
fn fractional_salary_keeps_its_fraction() {
    let record = Record::from(Employee::new(
        BaseRecord::new("Bob", "M", 30),
        5000.5,
        "Engineer",
    ));

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["salary"], json!(5000.5));

    let decoded: Record = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, record);
}

#[test]
fn stored_record_exposes_id_and_created_at() {
    let id: RecordId = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let stored = StoredRecord {
        id,
        record: Student::new(BaseRecord::new("Ann", "F", 20), 10).into(),
        created_at: 1_700_000_000_000,
    };

    let json = serde_json::to_value(&stored).unwrap();
    assert_eq!(json["_id"], id.to_string());
    assert_eq!(json["itemtype"], "Student");
    assert_eq!(json["grade"], 10);
    assert_eq!(json["created_at"], 1_700_000_000_000_i64);

    let decoded: StoredRecord = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, stored);
}

#[test]
fn unknown_discriminator_is_rejected() {
    let value = json!({"itemtype": "Contractor", "name": "X", "gender": "F", "age": 1});
    assert!(serde_json::from_value::<Record>(value).is_err());
}

#[test]
fn validate_rejects_empty_text_and_non_finite_salary() {
    let nameless = Record::from(Student::new(BaseRecord::new("", "F", 20), 10));
    assert_eq!(
        nameless.validate().unwrap_err(),
        RecordValidationError::EmptyText { field: "name" }
    );

    let unpaid = Record::from(Employee::new(
        BaseRecord::new("Bob", "M", 30),
        f64::NAN,
        "Engineer",
    ));
    assert_eq!(
        unpaid.validate().unwrap_err(),
        RecordValidationError::NonFiniteNumber { field: "salary" }
    );

    let untitled = Record::from(Employee::new(BaseRecord::new("Bob", "M", 30), 1.0, ""));
    assert_eq!(
        untitled.validate().unwrap_err(),
        RecordValidationError::EmptyText {
            field: "designation"
        }
    );
}
