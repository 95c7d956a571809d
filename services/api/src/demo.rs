use crate::infra::build_services;
use chrono::{Local, NaiveDate};
use clap::Args;
use placement_cell::applications::{ApplicationStatus, NewJobApplication};
use placement_cell::community::{NewComment, NewPost, PostKind};
use placement_cell::config::AppConfig;
use placement_cell::directory::{NewStudent, NewUser, Program, StudentProfile, UserRole};
use placement_cell::error::AppError;
use placement_cell::notify::NewNotice;
use placement_cell::records::{CurrentStatus, Education, FileReference, NewPerformance, NewResume};
use placement_cell::recruiting::{JobType, NewCompany, NewDrive, NewJob, NewRequirement};
use std::collections::BTreeMap;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Drive date for the seeded recruitment drive (YYYY-MM-DD). Defaults to
    /// three weeks from today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) drive_date: Option<NaiveDate>,
    /// Skip the community feed portion of the walkthrough.
    #[arg(long)]
    pub(crate) skip_community: bool,
    /// Print the full placement CSV instead of a one-line summary.
    #[arg(long)]
    pub(crate) show_report: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        drive_date,
        skip_community,
        show_report,
    } = args;

    let drive_date =
        drive_date.unwrap_or_else(|| Local::now().date_naive() + chrono::Duration::days(21));
    let config = AppConfig::load()?;
    let services = build_services(&config.auth);

    println!("Placement season walkthrough");

    println!("\nDirectory intake");
    let officer = services
        .directory
        .add_user(NewUser {
            first_name: "Latha".to_string(),
            middle_name: None,
            last_name: "Krishnan".to_string(),
            email: "placement.officer@college.edu".to_string(),
            phone: Some("9400112233".to_string()),
            role: UserRole::Admin,
        })
        .map_err(AppError::workflow)?;
    println!(
        "- Placement officer {} {} on board ({})",
        officer.first_name, officer.last_name, officer.id.0
    );

    let riya = services
        .directory
        .add_student(NewStudent {
            first_name: "Riya".to_string(),
            middle_name: None,
            last_name: "Menon".to_string(),
            email: "riya.menon@college.edu".to_string(),
            phone: Some("9811224455".to_string()),
            register_number: "PC23MCA042".to_string(),
            program: Program::Mca,
            join_date: NaiveDate::from_ymd_opt(2023, 7, 15).unwrap_or_default(),
        })
        .map_err(AppError::workflow)?;
    let arjun = services
        .directory
        .add_student(NewStudent {
            first_name: "Arjun".to_string(),
            middle_name: None,
            last_name: "Nair".to_string(),
            email: "arjun.nair@college.edu".to_string(),
            phone: None,
            register_number: "PC23MCA017".to_string(),
            program: Program::Mca,
            join_date: NaiveDate::from_ymd_opt(2023, 7, 15).unwrap_or_default(),
        })
        .map_err(AppError::workflow)?;
    let meera = services
        .directory
        .add_student(NewStudent {
            first_name: "Meera".to_string(),
            middle_name: None,
            last_name: "Thomas".to_string(),
            email: "meera.thomas@college.edu".to_string(),
            phone: None,
            register_number: "PC24MBA005".to_string(),
            program: Program::Mba,
            join_date: NaiveDate::from_ymd_opt(2024, 7, 22).unwrap_or_default(),
        })
        .map_err(AppError::workflow)?;
    for registration in [&riya, &arjun, &meera] {
        println!(
            "- Registered {} {} as {} ({})",
            registration.profile.first_name,
            registration.profile.last_name,
            registration.profile.register_number,
            registration.account.id.0
        );
    }

    println!("\nAcademic records");
    services
        .records
        .upsert_performance(NewPerformance {
            student_id: riya.account.id.clone(),
            semester: 4,
            tenth_cgpa: Some(9.1),
            twelth_cgpa: Some(8.7),
            degree_cgpa: Some(8.4),
            mca_cgpa: vec![8.2, 8.6],
            skills: vec!["rust".to_string(), "sql".to_string()],
            current_status: CurrentStatus::Studying,
            certification_files: Vec::new(),
            linkedin_url: Some("https://linkedin.com/in/riyamenon".to_string()),
        })
        .map_err(AppError::workflow)?;
    services
        .records
        .upsert_performance(NewPerformance {
            student_id: arjun.account.id.clone(),
            semester: 4,
            tenth_cgpa: Some(7.8),
            twelth_cgpa: Some(6.9),
            degree_cgpa: Some(6.1),
            mca_cgpa: vec![6.4, 6.7],
            skills: vec!["java".to_string()],
            current_status: CurrentStatus::Studying,
            certification_files: Vec::new(),
            linkedin_url: None,
        })
        .map_err(AppError::workflow)?;
    println!(
        "- Performance on file for {} (degree CGPA 8.4) and {} (degree CGPA 6.1)",
        riya.profile.first_name, arjun.profile.first_name
    );
    println!(
        "- {} has no record yet and will sit out any CGPA cutoff",
        meera.profile.first_name
    );

    let resume = services
        .records
        .add_resume(demo_resume(&riya.profile))
        .map_err(AppError::workflow)?;
    println!(
        "- {} saved resume '{}' ({})",
        riya.profile.first_name, resume.title, resume.id.0
    );

    println!("\nRecruitment drive");
    let company = services
        .recruiting
        .add_company(NewCompany {
            name: "Techcorp".to_string(),
            branch: "Kochi".to_string(),
            site: Some("https://techcorp.example".to_string()),
            contact_email: Some("campus@techcorp.example".to_string()),
            contact_phone: None,
            avg_salary: None,
        })
        .map_err(AppError::workflow)?;
    println!("- Company {} registered ({})", company.name, company.id.0);

    let drive = services
        .recruiting
        .add_drive(NewDrive {
            title: "Campus Drive 2026".to_string(),
            description: Some("Final year hiring across MCA and MBA".to_string()),
            location: Some("Main auditorium".to_string()),
            drive_date: Some(drive_date),
            application_deadline: Some(drive_date - chrono::Duration::days(7)),
            stages: vec!["aptitude".to_string(), "interview".to_string()],
            form_link: None,
        })
        .map_err(AppError::workflow)?;
    let drive = services
        .recruiting
        .publish_drive(&drive.id)
        .map_err(AppError::workflow)?;
    println!("- Drive '{}' published for {}", drive.title, drive_date);

    services
        .notices
        .add_notice(NewNotice {
            title: "Campus Drive 2026 registrations open".to_string(),
            content: "Keep your resume and performance record current before applying.".to_string(),
            author: Some(officer.id.clone()),
            job_id: None,
            drive_id: Some(drive.id.0.clone()),
        })
        .map_err(AppError::workflow)?;

    let job = services
        .recruiting
        .add_job(NewJob {
            drive_id: drive.id.clone(),
            company_id: company.id.clone(),
            title: "Backend Engineer".to_string(),
            description: Some("Rust services on the payments team".to_string()),
            location: Some("Kochi".to_string()),
            job_type: JobType::FullTime,
            salary: Some(700_000.0),
            salary_range: None,
            form_link: None,
        })
        .map_err(AppError::workflow)?;
    println!("- Job '{}' posted ({})", job.title, job.id.0);

    services
        .recruiting
        .upsert_requirement(NewRequirement {
            job_id: job.id.clone(),
            experience_required: 0,
            sslc_cgpa: None,
            plustwo_cgpa: None,
            degree_cgpa: Some(7.0),
            mca_cgpa: None,
            passout_year: None,
            skills_required: vec!["sql".to_string()],
            required_certifications: Vec::new(),
            language_requirements: Vec::new(),
            additional_criteria: None,
        })
        .map_err(AppError::workflow)?;
    let job = services
        .recruiting
        .refresh_eligible_students(&job.id)
        .map_err(AppError::workflow)?;
    println!(
        "- Degree CGPA cutoff 7.0 leaves {} of 3 students eligible",
        job.eligible_students.len()
    );

    println!("\nApplications");
    let application = services
        .applications
        .submit_application(NewJobApplication {
            job_id: job.id.clone(),
            student_id: riya.account.id.clone(),
            uploaded_resume: None,
            saved_resume_id: Some(resume.id.clone()),
            additional_answers: BTreeMap::new(),
        })
        .map_err(AppError::workflow)?;
    println!(
        "- {} applied with the saved resume -> status {}",
        riya.profile.first_name,
        application.status.label()
    );
    match services.applications.submit_application(NewJobApplication {
        job_id: job.id.clone(),
        student_id: riya.account.id.clone(),
        uploaded_resume: None,
        saved_resume_id: Some(resume.id.clone()),
        additional_answers: BTreeMap::new(),
    }) {
        Ok(_) => println!("  A second application slipped through"),
        Err(err) => println!("  Second attempt refused: {}", err),
    }

    let arjun_application = services
        .applications
        .submit_application(NewJobApplication {
            job_id: job.id.clone(),
            student_id: arjun.account.id.clone(),
            uploaded_resume: Some(FileReference {
                filename: "arjun-nair.pdf".to_string(),
                filepath: "uploads/resumes/arjun-nair.pdf".to_string(),
                mime_type: Some("application/pdf".to_string()),
            }),
            saved_resume_id: None,
            additional_answers: BTreeMap::new(),
        })
        .map_err(AppError::workflow)?;
    println!(
        "- {} applied anyway with an uploaded file; the cutoff only filters shortlists",
        arjun.profile.first_name
    );

    println!("\nSelection rounds");
    services
        .recruiting
        .update_stage_students(
            &job.id,
            vec![
                vec![riya.account.id.clone(), arjun.account.id.clone()],
                vec![riya.account.id.clone()],
            ],
        )
        .map_err(AppError::workflow)?;
    println!("- Aptitude round cleared by 2, interview shortlist holds 1");

    services
        .recruiting
        .confirm_selected_students(&job.id, vec![riya.account.id.clone()])
        .map_err(AppError::workflow)?;
    services
        .applications
        .set_application_status(&application.id, ApplicationStatus::Placed)
        .map_err(AppError::workflow)?;
    services
        .applications
        .set_application_status(&arjun_application.id, ApplicationStatus::Rejected)
        .map_err(AppError::workflow)?;
    println!(
        "- {} confirmed placed at {}; {} informed of the rejection",
        riya.profile.first_name, company.name, arjun.profile.first_name
    );

    println!("\nNotice board");
    let notices = services.notices.list_notices().map_err(AppError::workflow)?;
    for notice in &notices {
        println!("- {}", notice.title);
    }

    if !skip_community {
        println!("\nCommunity feed");
        let post = services
            .community
            .create_post(NewPost {
                author_id: riya.account.id.clone(),
                title: "Interview experience at Techcorp".to_string(),
                body: "Aptitude was SQL heavy; the interview dug into one past project in depth."
                    .to_string(),
                kind: PostKind::Text,
            })
            .map_err(AppError::workflow)?;
        println!(
            "- {} shared '{}' (awaiting approval)",
            riya.profile.first_name, post.title
        );
        let pending = services
            .community
            .pending_posts(&officer.id)
            .map_err(AppError::workflow)?;
        println!("- Moderation queue holds {} post(s)", pending.len());
        let post = services
            .community
            .approve_post(&post.id, &officer.id)
            .map_err(AppError::workflow)?;
        let feed = services
            .community
            .list_posts(None)
            .map_err(AppError::workflow)?;
        println!("- Approved; the public feed now shows {} post(s)", feed.len());
        services
            .community
            .add_comment(
                &post.id,
                NewComment {
                    author_id: arjun.account.id.clone(),
                    body: "Which project did they pick?".to_string(),
                },
            )
            .map_err(AppError::workflow)?;
        services
            .directory
            .apply_restrictions(&arjun.account.id, Some(7))
            .map_err(AppError::workflow)?;
        println!(
            "- {} muted for a week after a reported comment; the timer lifts it automatically",
            arjun.profile.first_name
        );
    }

    println!("\nSeason report");
    let student_report = services
        .analysis
        .student_analysis(&riya.account.id)
        .map_err(AppError::workflow)?;
    println!(
        "- {}: applied {} / eligible {} / selected {} (placement rate {:.0}%)",
        riya.profile.first_name,
        student_report.jobs_applied,
        student_report.jobs_eligible,
        student_report.jobs_selected,
        student_report.placement_rate * 100.0
    );
    let company_report = services
        .analysis
        .company_analysis(&company.id)
        .map_err(AppError::workflow)?;
    println!(
        "- {}: {} applicants, {} selected across {} drive(s)",
        company_report.company_name,
        company_report.total_applicants,
        company_report.total_selected,
        company_report.drives_participated
    );
    match serde_json::to_string_pretty(&student_report) {
        Ok(json) => println!("  Student funnel payload:\n{}", json),
        Err(err) => println!("  Student funnel payload unavailable: {}", err),
    }

    let report = services
        .analysis
        .placements_export()
        .map_err(AppError::workflow)?;
    if show_report {
        println!("\nPlacement report CSV");
        print!("{report}");
    } else {
        let rows = report.lines().count().saturating_sub(1);
        println!(
            "- Placement report ready with {} row(s); rerun with --show-report for the CSV",
            rows
        );
    }

    Ok(())
}

fn demo_resume(profile: &StudentProfile) -> NewResume {
    NewResume {
        student_id: profile.id.clone(),
        title: "Backend roles".to_string(),
        first_name: profile.first_name.clone(),
        middle_name: None,
        last_name: profile.last_name.clone(),
        objective: Some("Backend engineering role on a data heavy product".to_string()),
        email: profile.email.clone(),
        alt_email: None,
        phone: Some("9811224455".to_string()),
        alt_phone: None,
        address: None,
        city: Some("Kochi".to_string()),
        state: Some("Kerala".to_string()),
        linkedin: Some("https://linkedin.com/in/riyamenon".to_string()),
        github: Some("https://github.com/riyamenon".to_string()),
        achievements: vec!["Winner, state level hackathon 2025".to_string()],
        skills: vec!["rust".to_string(), "sql".to_string(), "docker".to_string()],
        education: vec![Education {
            institute: "St. Berchmans College".to_string(),
            university: "MG University".to_string(),
            course: "MCA".to_string(),
            gpa: Some(8.4),
            start_date: NaiveDate::from_ymd_opt(2023, 7, 15),
            end_date: None,
        }],
        projects: Vec::new(),
        work_experience: Vec::new(),
        certificates: Vec::new(),
    }
}
