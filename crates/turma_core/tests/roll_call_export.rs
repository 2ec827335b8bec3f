use rusqlite::Connection;
use std::fs;
use std::path::Path;
use turma_core::db::open_db_in_memory;
use turma_core::{
    Missing, RegistryError, SqliteStudentDirectory, SqliteTeacherDirectory, SqliteTurmaRepository,
    Student, Teacher, Turma, TurmaService, Violation,
};

type SqliteService<'conn> = TurmaService<
    SqliteTurmaRepository<'conn>,
    SqliteTeacherDirectory<'conn>,
    SqliteStudentDirectory<'conn>,
>;

fn service_with_dir<'conn>(conn: &'conn Connection, dir: &Path) -> SqliteService<'conn> {
    TurmaService::new(
        SqliteTurmaRepository::try_new(conn).unwrap(),
        SqliteTeacherDirectory::try_new(conn).unwrap(),
        SqliteStudentDirectory::try_new(conn).unwrap(),
    )
    .with_export_dir(dir)
}

fn seed_teacher(conn: &Connection, id: i64, name: &str) {
    SqliteTeacherDirectory::try_new(conn)
        .unwrap()
        .register_teacher(&Teacher {
            id,
            name: name.to_string(),
        })
        .unwrap();
}

fn seed_student(conn: &Connection, matricula: i64, name: &str) {
    SqliteStudentDirectory::try_new(conn)
        .unwrap()
        .register_student(&Student {
            matricula,
            name: name.to_string(),
        })
        .unwrap();
}

#[test]
fn export_fails_when_class_is_missing() {
    let conn = open_db_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let registry = service_with_dir(&conn, dir.path());

    let err = registry.export_roll_call(999).unwrap_err();
    assert!(matches!(err, RegistryError::NotFound(Missing::Class(999))));
}

#[test]
fn export_fails_when_roster_is_empty() {
    let conn = open_db_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let registry = service_with_dir(&conn, dir.path());

    registry.create_turma(&Turma::new(101, "A1")).unwrap();

    let err = registry.export_roll_call(101).unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Precondition(Violation::EmptyRoster(101))
    ));
    assert!(!dir.path().join("chamada_101").exists());
}

#[test]
fn export_writes_header_teacher_and_student_lines() {
    let conn = open_db_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    seed_teacher(&conn, 5, "Marta Souza");
    seed_student(&conn, 200, "João Pedro");
    let registry = service_with_dir(&conn, dir.path());

    registry.create_turma(&Turma::new(101, "A1")).unwrap();
    registry.assign_teacher(101, 5).unwrap();
    registry.enroll_student(200, 101).unwrap();

    let err = registry.enroll_student(200, 101).unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateEntry { .. }));

    let path = registry.export_roll_call(101).unwrap();
    assert_eq!(path, dir.path().join("chamada_101"));

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "Turma 101 - Sala A1");
    assert_eq!(lines[1], "Professor: Marta Souza");
    assert_eq!(lines[2], "Nome\tMatrícula");
    assert_eq!(lines[3], "João Pedro   200");
}

#[test]
fn export_lines_follow_enrollment_order() {
    let conn = open_db_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    seed_teacher(&conn, 5, "Marta Souza");
    seed_student(&conn, 300, "Carla Nunes");
    seed_student(&conn, 100, "Bruno Alves");
    let registry = service_with_dir(&conn, dir.path());

    registry.create_turma(&Turma::new(7, "C3")).unwrap();
    registry.assign_teacher(7, 5).unwrap();
    registry.enroll_student(300, 7).unwrap();
    registry.enroll_student(100, 7).unwrap();

    let path = registry.export_roll_call(7).unwrap();
    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();

    assert_eq!(lines.len(), 5);
    assert_eq!(lines[3], "Carla Nunes   300");
    assert_eq!(lines[4], "Bruno Alves   100");
}

#[test]
fn export_overwrites_existing_file() {
    let conn = open_db_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    seed_teacher(&conn, 5, "Marta Souza");
    seed_student(&conn, 200, "João Pedro");
    let registry = service_with_dir(&conn, dir.path());

    registry.create_turma(&Turma::new(101, "A1")).unwrap();
    registry.assign_teacher(101, 5).unwrap();
    registry.enroll_student(200, 101).unwrap();

    let path = dir.path().join("chamada_101");
    fs::write(&path, "stale contents").unwrap();

    registry.export_roll_call(101).unwrap();
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("Turma 101 - Sala A1"));
    assert!(!content.contains("stale"));
}

#[test]
fn export_still_reports_success_when_write_fails() {
    let conn = open_db_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    seed_teacher(&conn, 5, "Marta Souza");
    seed_student(&conn, 200, "João Pedro");
    // Point the export at a directory that does not exist.
    let missing_dir = dir.path().join("nope");
    let registry = service_with_dir(&conn, &missing_dir);

    registry.create_turma(&Turma::new(101, "A1")).unwrap();
    registry.assign_teacher(101, 5).unwrap();
    registry.enroll_student(200, 101).unwrap();

    let path = registry.export_roll_call(101).unwrap();
    assert_eq!(path, missing_dir.join("chamada_101"));
    assert!(!path.exists());
}

#[test]
fn export_reports_dangling_student_reference() {
    let conn = open_db_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    seed_teacher(&conn, 5, "Marta Souza");
    seed_student(&conn, 200, "João Pedro");
    let registry = service_with_dir(&conn, dir.path());

    registry.create_turma(&Turma::new(101, "A1")).unwrap();
    registry.assign_teacher(101, 5).unwrap();
    registry.enroll_student(200, 101).unwrap();

    // Simulate directory drift behind the registry's back.
    conn.execute_batch("PRAGMA foreign_keys = OFF;").unwrap();
    conn.execute("DELETE FROM students WHERE matricula = 200;", [])
        .unwrap();

    let err = registry.export_roll_call(101).unwrap_err();
    assert!(matches!(err, RegistryError::NotFound(Missing::Student(200))));
}
