//! Placement season scenarios driven end to end through the public service
//! facades and the merged HTTP router, using the same wiring the API binary
//! sets up over the shared in-memory stores.

mod common {
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    use chrono::{DateTime, NaiveDate, Utc};
    use serde_json::Value;

    use placement_cell::analysis::AnalysisService;
    use placement_cell::applications::{
        ApplicationsService, InMemoryApplicationsRepository, NewJobApplication,
    };
    use placement_cell::community::{
        CommunityService, InMemoryCommunityRepository, NewPost, PostKind,
    };
    use placement_cell::config::AuthConfig;
    use placement_cell::directory::{
        DirectoryService, InMemoryDirectoryRepository, MailError, MailGateway, NewStudent,
        OutboundMail, Program, RestrictionPlanner, UserId,
    };
    use placement_cell::notify::{InMemoryNotifyRepository, NotifyService};
    use placement_cell::records::{
        CurrentStatus, FileReference, InMemoryRecordsRepository, NewPerformance, RecordsService,
    };
    use placement_cell::recruiting::{
        CompanyId, DriveId, InMemoryRecruitingRepository, JobId, JobType, NewCompany, NewDrive,
        NewJob, NewRequirement, RecruitingService,
    };

    #[derive(Default, Clone)]
    pub(super) struct RecordingMail {
        messages: Arc<Mutex<Vec<OutboundMail>>>,
    }

    impl RecordingMail {
        pub(super) fn messages(&self) -> Vec<OutboundMail> {
            self.messages.lock().expect("mail mutex poisoned").clone()
        }
    }

    impl MailGateway for RecordingMail {
        fn send(&self, mail: OutboundMail) -> Result<(), MailError> {
            self.messages
                .lock()
                .expect("mail mutex poisoned")
                .push(mail);
            Ok(())
        }
    }

    #[derive(Default)]
    pub(super) struct RecordingPlanner {
        scheduled: Mutex<Vec<(UserId, DateTime<Utc>)>>,
        cancelled: Mutex<Vec<UserId>>,
    }

    impl RecordingPlanner {
        pub(super) fn scheduled(&self) -> Vec<(UserId, DateTime<Utc>)> {
            self.scheduled
                .lock()
                .expect("planner mutex poisoned")
                .clone()
        }

        pub(super) fn cancelled(&self) -> Vec<UserId> {
            self.cancelled
                .lock()
                .expect("planner mutex poisoned")
                .clone()
        }
    }

    impl RestrictionPlanner for RecordingPlanner {
        fn schedule_lift(&self, user: &UserId, at: DateTime<Utc>) {
            self.scheduled
                .lock()
                .expect("planner mutex poisoned")
                .push((user.clone(), at));
        }

        fn cancel(&self, user: &UserId) {
            self.cancelled
                .lock()
                .expect("planner mutex poisoned")
                .push(user.clone());
        }
    }

    pub(super) struct Season {
        pub(super) directory: Arc<DirectoryService<InMemoryDirectoryRepository, RecordingMail>>,
        pub(super) records: Arc<RecordsService<InMemoryRecordsRepository>>,
        pub(super) notices: Arc<NotifyService<InMemoryNotifyRepository>>,
        pub(super) recruiting: Arc<RecruitingService<InMemoryRecruitingRepository>>,
        pub(super) applications: Arc<ApplicationsService<InMemoryApplicationsRepository>>,
        pub(super) community: Arc<CommunityService<InMemoryCommunityRepository>>,
        pub(super) analysis: Arc<AnalysisService>,
        pub(super) mail: Arc<RecordingMail>,
        pub(super) planner: Arc<RecordingPlanner>,
    }

    /// Full service graph over shared in-memory stores, with recording
    /// doubles standing in for the mailer and the restriction timers.
    pub(super) fn build_season() -> Season {
        let directory_store = Arc::new(InMemoryDirectoryRepository::default());
        let records_store = Arc::new(InMemoryRecordsRepository::default());
        let notify_store = Arc::new(InMemoryNotifyRepository::default());
        let recruiting_store = Arc::new(InMemoryRecruitingRepository::default());

        let mail = Arc::new(RecordingMail::default());
        let planner = Arc::new(RecordingPlanner::default());
        let auth = AuthConfig {
            token_secret: "season-test-secret".to_string(),
            token_ttl_minutes: 30,
        };

        let directory = Arc::new(DirectoryService::new(
            directory_store.clone(),
            mail.clone(),
            planner.clone(),
            &auth,
        ));
        let records = Arc::new(RecordsService::new(records_store.clone()));
        let notices = Arc::new(NotifyService::new(notify_store.clone()));
        let recruiting = Arc::new(RecruitingService::new(
            recruiting_store.clone(),
            directory_store.clone(),
            records_store.clone(),
            notify_store,
        ));
        let applications = Arc::new(ApplicationsService::new(
            Arc::new(InMemoryApplicationsRepository::default()),
            recruiting.clone(),
            directory_store.clone(),
            records_store,
        ));
        let community = Arc::new(CommunityService::new(
            Arc::new(InMemoryCommunityRepository::default()),
            directory_store.clone(),
        ));
        let analysis = Arc::new(AnalysisService::new(recruiting_store, directory_store));

        Season {
            directory,
            records,
            notices,
            recruiting,
            applications,
            community,
            analysis,
            mail,
            planner,
        }
    }

    pub(super) fn student(first: &str, last: &str, email: &str, register: &str) -> NewStudent {
        NewStudent {
            first_name: first.to_string(),
            middle_name: None,
            last_name: last.to_string(),
            email: email.to_string(),
            phone: None,
            register_number: register.to_string(),
            program: Program::Mca,
            join_date: NaiveDate::from_ymd_opt(2023, 7, 15).expect("valid date"),
        }
    }

    pub(super) fn performance(student_id: UserId, degree_cgpa: f64) -> NewPerformance {
        NewPerformance {
            student_id,
            semester: 4,
            tenth_cgpa: Some(8.0),
            twelth_cgpa: Some(8.0),
            degree_cgpa: Some(degree_cgpa),
            mca_cgpa: vec![degree_cgpa],
            skills: vec!["sql".to_string()],
            current_status: CurrentStatus::Studying,
            certification_files: Vec::new(),
            linkedin_url: None,
        }
    }

    pub(super) fn company() -> NewCompany {
        NewCompany {
            name: "Techcorp".to_string(),
            branch: "Kochi".to_string(),
            site: None,
            contact_email: Some("campus@techcorp.example".to_string()),
            contact_phone: None,
            avg_salary: None,
        }
    }

    pub(super) fn drive() -> NewDrive {
        NewDrive {
            title: "Campus Drive 2026".to_string(),
            description: None,
            location: Some("Main auditorium".to_string()),
            drive_date: NaiveDate::from_ymd_opt(2026, 9, 14),
            application_deadline: NaiveDate::from_ymd_opt(2026, 9, 7),
            stages: vec!["aptitude".to_string(), "interview".to_string()],
            form_link: None,
        }
    }

    pub(super) fn job(drive_id: &DriveId, company_id: &CompanyId) -> NewJob {
        NewJob {
            drive_id: drive_id.clone(),
            company_id: company_id.clone(),
            title: "Backend Engineer".to_string(),
            description: None,
            location: Some("Kochi".to_string()),
            job_type: JobType::FullTime,
            salary: Some(700_000.0),
            salary_range: None,
            form_link: None,
        }
    }

    pub(super) fn degree_cutoff(job_id: &JobId, cutoff: f64) -> NewRequirement {
        NewRequirement {
            job_id: job_id.clone(),
            experience_required: 0,
            sslc_cgpa: None,
            plustwo_cgpa: None,
            degree_cgpa: Some(cutoff),
            mca_cgpa: None,
            passout_year: None,
            skills_required: Vec::new(),
            required_certifications: Vec::new(),
            language_requirements: Vec::new(),
            additional_criteria: None,
        }
    }

    pub(super) fn application(job_id: &JobId, student_id: &UserId) -> NewJobApplication {
        NewJobApplication {
            job_id: job_id.clone(),
            student_id: student_id.clone(),
            uploaded_resume: Some(FileReference {
                filename: format!("{}.pdf", student_id.0),
                filepath: format!("uploads/resumes/{}.pdf", student_id.0),
                mime_type: Some("application/pdf".to_string()),
            }),
            saved_resume_id: None,
            additional_answers: BTreeMap::new(),
        }
    }

    pub(super) fn post(author: &UserId, title: &str) -> NewPost {
        NewPost {
            author_id: author.clone(),
            title: title.to_string(),
            body: "Sharing for the juniors.".to_string(),
            kind: PostKind::Text,
        }
    }

    pub(super) async fn read_json_body(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }
}

mod season {
    use super::common::*;
    use placement_cell::applications::{ApplicationStatus, ApplicationsServiceError};

    #[test]
    fn a_full_season_flows_from_intake_to_placement_report() {
        let season = build_season();

        let riya = season
            .directory
            .add_student(student("Riya", "Menon", "riya@college.edu", "PC23MCA042"))
            .expect("register riya");
        let arjun = season
            .directory
            .add_student(student("Arjun", "Nair", "arjun@college.edu", "PC23MCA017"))
            .expect("register arjun");
        assert_eq!(season.mail.messages().len(), 2);

        season
            .records
            .upsert_performance(performance(riya.account.id.clone(), 8.4))
            .expect("riya performance");
        season
            .records
            .upsert_performance(performance(arjun.account.id.clone(), 6.1))
            .expect("arjun performance");

        let techcorp = season.recruiting.add_company(company()).expect("company");
        let campus_drive = season.recruiting.add_drive(drive()).expect("drive");
        season
            .recruiting
            .publish_drive(&campus_drive.id)
            .expect("publish");
        let backend = season
            .recruiting
            .add_job(job(&campus_drive.id, &techcorp.id))
            .expect("job");
        season
            .recruiting
            .upsert_requirement(degree_cutoff(&backend.id, 7.0))
            .expect("requirement");
        let backend = season
            .recruiting
            .refresh_eligible_students(&backend.id)
            .expect("refresh eligibility");
        assert_eq!(backend.eligible_students, vec![riya.account.id.clone()]);

        let notices = season.notices.list_notices().expect("list notices");
        assert!(notices
            .iter()
            .any(|notice| notice.job_id.as_deref() == Some(backend.id.0.as_str())));

        let riya_application = season
            .applications
            .submit_application(application(&backend.id, &riya.account.id))
            .expect("riya applies");
        season
            .applications
            .submit_application(application(&backend.id, &arjun.account.id))
            .expect("arjun applies");
        match season
            .applications
            .submit_application(application(&backend.id, &riya.account.id))
        {
            Err(ApplicationsServiceError::AlreadyApplied) => {}
            other => panic!("expected duplicate refusal, got {other:?}"),
        }

        let backend = season.recruiting.get_job(&backend.id).expect("job reload");
        assert_eq!(backend.applied_students.len(), 2);
        let campus_drive = season
            .recruiting
            .get_drive(&campus_drive.id)
            .expect("drive reload");
        assert_eq!(campus_drive.applied_students.len(), 2);

        season
            .recruiting
            .update_stage_students(
                &backend.id,
                vec![
                    vec![riya.account.id.clone(), arjun.account.id.clone()],
                    vec![riya.account.id.clone()],
                ],
            )
            .expect("stage shortlists");
        season
            .recruiting
            .confirm_selected_students(&backend.id, vec![riya.account.id.clone()])
            .expect("confirm selection");
        season
            .applications
            .set_application_status(&riya_application.id, ApplicationStatus::Placed)
            .expect("mark placed");

        let techcorp = season
            .recruiting
            .get_company(&techcorp.id)
            .expect("company reload");
        assert_eq!(techcorp.placed_students, vec![riya.account.id.clone()]);

        let funnel = season
            .analysis
            .student_analysis(&riya.account.id)
            .expect("student report");
        assert_eq!(funnel.jobs_applied, 1);
        assert_eq!(funnel.jobs_eligible, 1);
        assert_eq!(funnel.jobs_selected, 1);
        assert_eq!(funnel.placement_rate, 1.0);
        assert_eq!(funnel.placements.len(), 1);
        assert_eq!(funnel.placements[0].company_name, "Techcorp");

        let footprint = season
            .analysis
            .company_analysis(&techcorp.id)
            .expect("company report");
        assert_eq!(footprint.total_applicants, 2);
        assert_eq!(footprint.total_selected, 1);

        let export = season.analysis.placements_export().expect("export");
        assert!(export
            .lines()
            .any(|line| line.contains("Riya Menon") && line.contains("Techcorp")));
    }
}

mod moderation {
    use super::common::*;
    use placement_cell::community::CommunityServiceError;

    #[test]
    fn restrictions_silence_the_feed_until_lifted() {
        let season = build_season();
        let riya = season
            .directory
            .add_student(student("Riya", "Menon", "riya@college.edu", "PC23MCA042"))
            .expect("register riya");

        season
            .directory
            .apply_restrictions(&riya.account.id, None)
            .expect("indefinite restriction");
        assert!(season.planner.scheduled().is_empty());
        assert_eq!(season.planner.cancelled(), vec![riya.account.id.clone()]);

        match season
            .community
            .create_post(post(&riya.account.id, "Referral thread"))
        {
            Err(CommunityServiceError::PostingBlocked) => {}
            other => panic!("expected posting block, got {other:?}"),
        }

        let account = season
            .directory
            .apply_restrictions(&riya.account.id, Some(7))
            .expect("timed restriction");
        let scheduled = season.planner.scheduled();
        assert_eq!(scheduled.len(), 1);
        assert_eq!(scheduled[0].0, riya.account.id);
        assert_eq!(Some(scheduled[0].1), account.restricted_until);

        season
            .directory
            .lift_restrictions(&riya.account.id)
            .expect("manual lift");
        let post = season
            .community
            .create_post(post(&riya.account.id, "Referral thread"))
            .expect("post after the lift");
        assert!(!post.is_approved, "student posts still wait for approval");
    }
}

mod routing {
    use super::common::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use placement_cell::analysis::analysis_router;
    use placement_cell::applications::applications_router;
    use placement_cell::community::community_router;
    use placement_cell::directory::{directory_router, UserId};
    use placement_cell::notify::notify_router;
    use placement_cell::records::records_router;
    use placement_cell::recruiting::recruiting_router;
    use serde_json::json;
    use tower::ServiceExt;

    fn merged_router(season: &Season) -> axum::Router {
        directory_router(season.directory.clone())
            .merge(records_router(season.records.clone()))
            .merge(notify_router(season.notices.clone()))
            .merge(recruiting_router(season.recruiting.clone()))
            .merge(applications_router(season.applications.clone()))
            .merge(community_router(season.community.clone()))
            .merge(analysis_router(season.analysis.clone()))
    }

    #[tokio::test]
    async fn the_merged_surface_serves_a_round_trip() {
        let season = build_season();
        let app = merged_router(&season);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/students")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        serde_json::to_vec(&json!({
                            "first_name": "Riya",
                            "last_name": "Menon",
                            "email": "riya.menon@college.edu",
                            "register_number": "PC23MCA042",
                            "program": "mca",
                            "join_date": "2023-07-15"
                        }))
                        .expect("encode"),
                    ))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::CREATED);
        let registration = read_json_body(response).await;
        let student_id = UserId(
            registration["account"]["id"]
                .as_str()
                .expect("account id")
                .to_string(),
        );

        season
            .records
            .upsert_performance(performance(student_id.clone(), 8.4))
            .expect("performance");
        let techcorp = season.recruiting.add_company(company()).expect("company");
        let campus_drive = season.recruiting.add_drive(drive()).expect("drive");
        let backend = season
            .recruiting
            .add_job(job(&campus_drive.id, &techcorp.id))
            .expect("job");
        season
            .recruiting
            .upsert_requirement(degree_cutoff(&backend.id, 7.0))
            .expect("requirement");
        season
            .recruiting
            .refresh_eligible_students(&backend.id)
            .expect("refresh eligibility");

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/applications")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        serde_json::to_vec(&json!({
                            "job_id": backend.id.0,
                            "student_id": student_id.0,
                            "uploaded_resume": {
                                "filename": "riya-menon.pdf",
                                "filepath": "uploads/resumes/riya-menon.pdf",
                                "mime_type": "application/pdf"
                            }
                        }))
                        .expect("encode"),
                    ))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::CREATED);

        season
            .recruiting
            .confirm_selected_students(&backend.id, vec![student_id.clone()])
            .expect("confirm selection");

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/notices")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);
        let notices = read_json_body(response).await;
        assert!(notices
            .as_array()
            .expect("notice list")
            .iter()
            .any(|notice| notice["job_id"] == backend.id.0.as_str()));

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/analysis/students/{}", student_id.0))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);
        let funnel = read_json_body(response).await;
        assert_eq!(funnel["jobs_applied"], 1);
        assert_eq!(funnel["jobs_selected"], 1);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/analysis/placements/export")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
