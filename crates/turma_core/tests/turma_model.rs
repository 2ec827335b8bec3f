use turma_core::{Turma, TurmaValidationError};

#[test]
fn turma_new_creates_empty_record() {
    let turma = Turma::new(101, "A1");

    assert_eq!(turma.code, 101);
    assert_eq!(turma.room, "A1");
    assert_eq!(turma.teacher_id, None);
    assert!(turma.roster.is_empty());
    assert!(!turma.has_teacher());
    assert_eq!(turma.roster_len(), 0);
}

#[test]
fn roster_membership_is_checked_by_matricula() {
    let mut turma = Turma::new(101, "A1");
    turma.roster.push(200);

    assert!(turma.has_student(200));
    assert!(!turma.has_student(201));
    assert_eq!(turma.roster_len(), 1);
}

#[test]
fn validate_rejects_non_positive_code() {
    let turma = Turma::new(0, "A1");
    assert_eq!(
        turma.validate().unwrap_err(),
        TurmaValidationError::NonPositiveCode(0)
    );

    let negative = Turma::new(-3, "A1");
    assert_eq!(
        negative.validate().unwrap_err(),
        TurmaValidationError::NonPositiveCode(-3)
    );
}

#[test]
fn validate_rejects_blank_room() {
    let turma = Turma::new(101, "   ");
    assert_eq!(turma.validate().unwrap_err(), TurmaValidationError::BlankRoom);
}

#[test]
fn turma_serialization_uses_expected_wire_fields() {
    let mut turma = Turma::new(101, "A1");
    turma.teacher_id = Some(5);
    turma.roster = vec![200, 201];

    let json = serde_json::to_value(&turma).unwrap();
    assert_eq!(json["code"], 101);
    assert_eq!(json["room"], "A1");
    assert_eq!(json["teacher_id"], 5);
    assert_eq!(json["roster"], serde_json::json!([200, 201]));

    let decoded: Turma = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, turma);
}
