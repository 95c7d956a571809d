use super::common::*;

use crate::directory::UserId;
use crate::notify::NotifyRepository;
use crate::recruiting::RequirementUpdate;

fn user(id: &str) -> UserId {
    UserId(id.to_string())
}

#[test]
fn adding_a_job_publishes_a_notice() {
    let (service, _, _, notices) = build_service();
    let company = service.add_company(new_company("Acme")).expect("company");
    let drive = service.add_drive(new_drive("Winter 2026")).expect("drive");

    let job = service
        .add_job(new_job(&drive.id, &company.id, "Platform Engineer"))
        .expect("job");

    let published = notices.list_notices().expect("notices");
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].title, "New job: Platform Engineer");
    assert!(published[0].content.contains("Winter 2026"));
    assert_eq!(published[0].job_id.as_deref(), Some(job.id.0.as_str()));
    assert_eq!(published[0].drive_id.as_deref(), Some(drive.id.0.as_str()));
}

#[test]
fn eligibility_refresh_stores_on_job_and_drive() {
    let (service, directory, records, _) = build_service();
    let company = service.add_company(new_company("Acme")).expect("company");
    let drive = service.add_drive(new_drive("Winter 2026")).expect("drive");
    let job = service
        .add_job(new_job(&drive.id, &company.id, "Backend Engineer"))
        .expect("job");

    let riya = seed_student(&directory, "riya", 2023);
    let arun = seed_student(&directory, "arun", 2023);
    let zoya = seed_student(&directory, "zoya", 2024);
    seed_performance(&records, &riya, Some(7.5), &[8.0]);
    seed_performance(&records, &arun, Some(6.0), &[8.0]);
    seed_performance(&records, &zoya, Some(9.0), &[9.0]);

    let mut requirement = open_requirement(&job.id);
    requirement.degree_cgpa = Some(7.0);
    requirement.passout_year = Some(2025);
    service.upsert_requirement(requirement).expect("requirement");

    // riya clears both rules; arun misses the CGPA bar; zoya is a later batch.
    let refreshed = service.refresh_eligible_students(&job.id).expect("refresh");
    assert_eq!(refreshed.eligible_students, vec![riya.clone()]);

    let drive = service.get_drive(&drive.id).expect("drive");
    assert_eq!(drive.eligible_students, vec![riya]);
}

#[test]
fn job_without_requirement_yields_no_eligible_students() {
    let (service, directory, records, _) = build_service();
    let company = service.add_company(new_company("Acme")).expect("company");
    let drive = service.add_drive(new_drive("Winter 2026")).expect("drive");
    let job = service
        .add_job(new_job(&drive.id, &company.id, "Backend Engineer"))
        .expect("job");

    let riya = seed_student(&directory, "riya", 2023);
    seed_performance(&records, &riya, Some(9.9), &[9.9]);

    assert!(service.eligible_students(&job.id).expect("compute").is_empty());
}

#[test]
fn drive_eligibility_is_an_ordered_union() {
    let (service, _, _, _) = build_service();
    let company = service.add_company(new_company("Acme")).expect("company");
    let drive = service.add_drive(new_drive("Winter 2026")).expect("drive");
    let first = service
        .add_job(new_job(&drive.id, &company.id, "Backend Engineer"))
        .expect("first job");
    let second = service
        .add_job(new_job(&drive.id, &company.id, "Data Engineer"))
        .expect("second job");

    service
        .set_eligible_students(&first.id, vec![user("riya"), user("arun")])
        .expect("first list");
    service
        .set_eligible_students(&second.id, vec![user("arun"), user("zoya")])
        .expect("second list");

    let drive = service.get_drive(&drive.id).expect("drive");
    assert_eq!(
        drive.eligible_students,
        vec![user("riya"), user("arun"), user("zoya")]
    );
}

#[test]
fn stage_lists_aggregate_to_the_longest_job() {
    let (service, _, _, _) = build_service();
    let company = service.add_company(new_company("Acme")).expect("company");
    let drive = service.add_drive(new_drive("Winter 2026")).expect("drive");
    let first = service
        .add_job(new_job(&drive.id, &company.id, "Backend Engineer"))
        .expect("first job");
    let second = service
        .add_job(new_job(&drive.id, &company.id, "Data Engineer"))
        .expect("second job");

    service
        .update_stage_students(
            &first.id,
            vec![vec![user("riya"), user("arun")], vec![user("riya")]],
        )
        .expect("first stages");
    service
        .update_stage_students(
            &second.id,
            vec![
                vec![user("arun")],
                vec![user("arun")],
                vec![user("arun")],
            ],
        )
        .expect("second stages");

    let drive = service.get_drive(&drive.id).expect("drive");
    assert_eq!(drive.stage_students.len(), 3);
    assert_eq!(drive.stage_students[0], vec![user("riya"), user("arun")]);
    assert_eq!(drive.stage_students[1], vec![user("riya"), user("arun")]);
    assert_eq!(drive.stage_students[2], vec![user("arun")]);
}

#[test]
fn confirming_selections_feeds_company_placements() {
    let (service, _, _, _) = build_service();
    let company = service.add_company(new_company("Acme")).expect("company");
    let drive = service.add_drive(new_drive("Winter 2026")).expect("drive");
    let first = service
        .add_job(new_job(&drive.id, &company.id, "Backend Engineer"))
        .expect("first job");
    let second = service
        .add_job(new_job(&drive.id, &company.id, "Data Engineer"))
        .expect("second job");

    service
        .confirm_selected_students(&first.id, vec![user("riya"), user("arun")])
        .expect("first selections");
    service
        .confirm_selected_students(&second.id, vec![user("arun"), user("zoya")])
        .expect("second selections");
    // Re-confirming must not duplicate placements.
    service
        .confirm_selected_students(&first.id, vec![user("riya"), user("arun")])
        .expect("repeat selections");

    let company = service.get_company(&company.id).expect("company");
    assert_eq!(
        company.placed_students,
        vec![user("riya"), user("arun"), user("zoya")]
    );

    let drive = service.get_drive(&drive.id).expect("drive");
    assert_eq!(
        drive.selected_students,
        vec![user("riya"), user("arun"), user("zoya")]
    );
}

#[test]
fn applying_twice_records_the_student_once() {
    let (service, _, _, _) = build_service();
    let company = service.add_company(new_company("Acme")).expect("company");
    let drive = service.add_drive(new_drive("Winter 2026")).expect("drive");
    let job = service
        .add_job(new_job(&drive.id, &company.id, "Backend Engineer"))
        .expect("job");

    service.apply_to_job(&job.id, &user("riya")).expect("apply");
    let job = service
        .apply_to_job(&job.id, &user("riya"))
        .expect("second apply");

    assert_eq!(job.applied_students, vec![user("riya")]);
    let drive = service.get_drive(&drive.id).expect("drive");
    assert_eq!(drive.applied_students, vec![user("riya")]);
}

#[test]
fn requirement_upsert_overwrites_in_place() {
    let (service, _, _, _) = build_service();
    let company = service.add_company(new_company("Acme")).expect("company");
    let drive = service.add_drive(new_drive("Winter 2026")).expect("drive");
    let job = service
        .add_job(new_job(&drive.id, &company.id, "Backend Engineer"))
        .expect("job");

    let mut first = open_requirement(&job.id);
    first.degree_cgpa = Some(6.0);
    let stored = service.upsert_requirement(first).expect("first upsert");

    let mut second = open_requirement(&job.id);
    second.degree_cgpa = Some(7.5);
    let overwritten = service.upsert_requirement(second).expect("second upsert");

    assert_eq!(overwritten.id, stored.id);
    assert_eq!(overwritten.created_at, stored.created_at);
    assert_eq!(overwritten.degree_cgpa, Some(7.5));

    let patched = service
        .update_requirement(
            &stored.id,
            RequirementUpdate {
                passout_year: Some(2026),
                ..Default::default()
            },
        )
        .expect("patch");
    assert_eq!(patched.passout_year, Some(2026));
    assert_eq!(patched.degree_cgpa, Some(7.5));
}

#[test]
fn deleting_a_drive_cascades_to_jobs_and_requirements() {
    let (service, _, _, _) = build_service();
    let company = service.add_company(new_company("Acme")).expect("company");
    let drive = service.add_drive(new_drive("Winter 2026")).expect("drive");
    let job = service
        .add_job(new_job(&drive.id, &company.id, "Backend Engineer"))
        .expect("job");
    let requirement = service
        .upsert_requirement(open_requirement(&job.id))
        .expect("requirement");

    service.delete_drive(&drive.id).expect("delete");

    assert!(service.get_drive(&drive.id).is_err());
    assert!(service.get_job(&job.id).is_err());
    assert!(service.get_requirement(&requirement.id).is_err());
}
