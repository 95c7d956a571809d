use super::common::*;

use crate::directory::{
    DirectoryRepository, DirectoryServiceError, FacultyUpdate, NewAlumni, Program, StudentStatus,
    StudentUpdate, UserRole, UserStatus, UserUpdate,
};

#[test]
fn add_student_creates_account_and_profile_together() {
    let (service, repository, _, _) = build_service();

    let registration = service
        .add_student(new_student("Ria", "Paul", "ria@college.edu"))
        .expect("registration succeeds");

    assert_eq!(registration.account.role, UserRole::Student);
    assert_eq!(registration.profile.id, registration.account.id);
    assert_eq!(registration.profile.register_number, "PC23MCA001");
    assert_eq!(registration.profile.program, Program::Mca);
    assert_eq!(registration.profile.status, StudentStatus::Active);
    assert!(repository
        .fetch_student(&registration.account.id)
        .expect("fetch works")
        .is_some());
}

#[test]
fn plain_registration_still_creates_a_role_satellite() {
    let (service, repository, _, _) = build_service();

    let account = service
        .add_user(new_user("Ben", "Joseph", "ben@college.edu", UserRole::Student))
        .expect("registration succeeds");

    let profile = repository
        .fetch_student(&account.id)
        .expect("fetch works")
        .expect("placeholder profile exists");
    assert_eq!(profile.email, "ben@college.edu");
    assert!(profile.register_number.is_empty());
}

#[test]
fn admin_accounts_have_no_satellite() {
    let (service, repository, _, _) = build_service();

    let account = service
        .add_user(new_user("Asha", "Varma", "asha@college.edu", UserRole::Admin))
        .expect("registration succeeds");

    assert!(repository
        .fetch_student(&account.id)
        .expect("fetch works")
        .is_none());
    assert!(repository
        .fetch_faculty(&account.id)
        .expect("fetch works")
        .is_none());
}

#[test]
fn student_update_propagates_contact_fields_to_the_account() {
    let (service, _, _, _) = build_service();
    let registration = service
        .add_student(new_student("Ria", "Paul", "ria@college.edu"))
        .expect("registration succeeds");

    let profile = service
        .update_student(
            &registration.account.id,
            StudentUpdate {
                email: Some("ria.paul@college.edu".to_string()),
                register_number: Some("PC23MCA017".to_string()),
                ..Default::default()
            },
        )
        .expect("update succeeds");

    assert_eq!(profile.email, "ria.paul@college.edu");
    assert_eq!(profile.register_number, "PC23MCA017");
    let account = service
        .get_user(&registration.account.id)
        .expect("account exists");
    assert_eq!(account.email, "ria.paul@college.edu");
}

#[test]
fn account_update_propagates_name_to_the_satellite() {
    let (service, _, _, _) = build_service();
    let registration = service
        .add_faculty(new_faculty("Anita", "Menon", "anita@college.edu"))
        .expect("registration succeeds");

    service
        .update_user(
            &registration.account.id,
            UserUpdate {
                last_name: Some("Menon-Iyer".to_string()),
                ..Default::default()
            },
        )
        .expect("update succeeds");

    let profile = service
        .get_faculty(&registration.account.id)
        .expect("profile exists");
    assert_eq!(profile.last_name, "Menon-Iyer");
}

#[test]
fn faculty_update_changes_department_only_when_asked() {
    let (service, _, _, _) = build_service();
    let registration = service
        .add_faculty(new_faculty("Anita", "Menon", "anita@college.edu"))
        .expect("registration succeeds");

    let profile = service
        .update_faculty(
            &registration.account.id,
            FacultyUpdate {
                designation: Some("Associate Professor".to_string()),
                ..Default::default()
            },
        )
        .expect("update succeeds");

    assert_eq!(profile.department, "Computer Applications");
    assert_eq!(profile.designation, "Associate Professor");
}

#[test]
fn migration_graduates_a_student_into_the_alumni_satellite() {
    let (service, _, _, _) = build_service();
    let registration = service
        .add_student(new_student("Ria", "Paul", "ria@college.edu"))
        .expect("registration succeeds");
    let id = registration.account.id.clone();

    let migration = service
        .migrate_student_to_alumni(&id)
        .expect("migration succeeds");

    assert_eq!(migration.account.role, UserRole::Alumni);
    assert_eq!(migration.account.status, UserStatus::Active);
    // MCA joined 2023 runs two years.
    assert_eq!(migration.alumni.graduation_year, 2025);

    let student = service.get_student(&id).expect("record kept");
    assert_eq!(student.status, StudentStatus::Completed);
    assert!(service.get_alumni(&id).is_ok());
}

#[test]
fn migration_rejects_non_students() {
    let (service, _, _, _) = build_service();
    let registration = service
        .add_faculty(new_faculty("Anita", "Menon", "anita@college.edu"))
        .expect("registration succeeds");

    let err = service
        .migrate_student_to_alumni(&registration.account.id)
        .expect_err("faculty cannot graduate");
    assert!(matches!(err, DirectoryServiceError::NotAStudent));
}

#[test]
fn deleting_a_student_removes_the_account_too() {
    let (service, _, _, _) = build_service();
    let registration = service
        .add_student(new_student("Ria", "Paul", "ria@college.edu"))
        .expect("registration succeeds");
    let id = registration.account.id.clone();

    service.delete_student(&id).expect("delete succeeds");

    assert!(service.get_student(&id).is_err());
    assert!(service.get_user(&id).is_err());
}

#[test]
fn alumni_registration_keeps_employment_details() {
    let (service, _, _, _) = build_service();

    let registration = service
        .add_alumni(NewAlumni {
            first_name: "Vivek".to_string(),
            middle_name: None,
            last_name: "Shankar".to_string(),
            email: "vivek@alumni.college.edu".to_string(),
            phone: None,
            graduation_year: 2021,
            current_company: Some("Zeta Labs".to_string()),
            current_position: Some("Backend Engineer".to_string()),
        })
        .expect("registration succeeds");

    assert_eq!(registration.profile.graduation_year, 2021);
    assert_eq!(
        registration.profile.current_company.as_deref(),
        Some("Zeta Labs")
    );
}
