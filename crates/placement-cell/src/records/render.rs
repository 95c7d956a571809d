//! Renders a resume as a self-contained printable HTML document. The
//! stylesheet is embedded so the downloaded file opens offline and prints
//! on a single column without external assets.

use std::fmt::Write as _;

use chrono::NaiveDate;

use super::domain::Resume;

const STYLESHEET: &str = "\
body { font-family: Georgia, 'Times New Roman', serif; color: #1a1a1a; \
max-width: 48rem; margin: 2rem auto; padding: 0 1.5rem; line-height: 1.45; }\n\
h1 { font-size: 1.6rem; margin-bottom: 0.1rem; }\n\
h2 { font-size: 1.05rem; text-transform: uppercase; letter-spacing: 0.08em; \
border-bottom: 1px solid #999; padding-bottom: 0.15rem; margin-top: 1.4rem; }\n\
p.contact { margin-top: 0; color: #444; }\n\
table { width: 100%; border-collapse: collapse; }\n\
th, td { text-align: left; padding: 0.25rem 0.5rem 0.25rem 0; \
border-bottom: 1px solid #ddd; font-size: 0.95rem; }\n\
ul { margin: 0.3rem 0 0.3rem 1.2rem; padding: 0; }\n\
.entry { margin-bottom: 0.6rem; }\n\
.entry .when { color: #666; font-size: 0.9rem; }\n\
@media print { body { margin: 0; max-width: none; } }";

pub fn render_resume(resume: &Resume) -> String {
    let mut html = String::new();
    writeln!(html, "<!DOCTYPE html>").expect("write doctype");
    writeln!(html, "<html lang=\"en\"><head><meta charset=\"utf-8\">").expect("write head");
    writeln!(
        html,
        "<title>{}</title>",
        escape_html(&format!("{} - {}", resume.full_name(), resume.title))
    )
    .expect("write title");
    writeln!(html, "<style>{STYLESHEET}</style></head><body>").expect("write style");

    render_header(&mut html, resume);

    if let Some(objective) = resume.objective.as_deref().filter(|o| !o.trim().is_empty()) {
        writeln!(html, "<h2>Objective</h2>").expect("write objective heading");
        writeln!(html, "<p>{}</p>", escape_html(objective)).expect("write objective");
    }

    if !resume.education.is_empty() {
        render_education(&mut html, resume);
    }
    if !resume.work_experience.is_empty() {
        render_work_experience(&mut html, resume);
    }
    if !resume.projects.is_empty() {
        render_projects(&mut html, resume);
    }
    if !resume.certificates.is_empty() {
        render_certificates(&mut html, resume);
    }
    if !resume.skills.is_empty() {
        writeln!(html, "<h2>Skills</h2>").expect("write skills heading");
        writeln!(html, "<p>{}</p>", escape_html(&resume.skills.join(", "))).expect("write skills");
    }
    if !resume.achievements.is_empty() {
        writeln!(html, "<h2>Achievements</h2><ul>").expect("write achievements heading");
        for achievement in &resume.achievements {
            writeln!(html, "<li>{}</li>", escape_html(achievement)).expect("write achievement");
        }
        writeln!(html, "</ul>").expect("close achievements");
    }

    writeln!(html, "</body></html>").expect("close document");
    html
}

fn render_header(html: &mut String, resume: &Resume) {
    writeln!(html, "<h1>{}</h1>", escape_html(&resume.full_name())).expect("write name");

    let mut contact = vec![resume.email.clone()];
    contact.extend(resume.alt_email.clone());
    contact.extend(resume.phone.clone());
    contact.extend(resume.alt_phone.clone());
    if let Some(city) = &resume.city {
        match &resume.state {
            Some(state) => contact.push(format!("{city}, {state}")),
            None => contact.push(city.clone()),
        }
    }
    writeln!(
        html,
        "<p class=\"contact\">{}</p>",
        escape_html(&contact.join(" | "))
    )
    .expect("write contact");

    let mut links = Vec::new();
    links.extend(resume.linkedin.clone());
    links.extend(resume.github.clone());
    if !links.is_empty() {
        writeln!(html, "<p class=\"contact\">").expect("open links");
        for (index, link) in links.iter().enumerate() {
            if index > 0 {
                html.push_str(" | ");
            }
            write!(
                html,
                "<a href=\"{0}\">{0}</a>",
                escape_html(link)
            )
            .expect("write link");
        }
        writeln!(html, "</p>").expect("close links");
    }
}

fn render_education(html: &mut String, resume: &Resume) {
    writeln!(html, "<h2>Education</h2>").expect("write education heading");
    writeln!(
        html,
        "<table><tr><th>Course</th><th>Institute</th><th>University</th>\
         <th>Period</th><th>GPA</th></tr>"
    )
    .expect("write education header row");
    for entry in &resume.education {
        let period = date_span(entry.start_date, entry.end_date);
        let gpa = entry
            .gpa
            .map(|gpa| format!("{gpa:.2}"))
            .unwrap_or_default();
        writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&entry.course),
            escape_html(&entry.institute),
            escape_html(&entry.university),
            escape_html(&period),
            escape_html(&gpa),
        )
        .expect("write education row");
    }
    writeln!(html, "</table>").expect("close education table");
}

fn render_work_experience(html: &mut String, resume: &Resume) {
    writeln!(html, "<h2>Work Experience</h2>").expect("write experience heading");
    for entry in &resume.work_experience {
        writeln!(html, "<div class=\"entry\">").expect("open experience entry");
        writeln!(
            html,
            "<strong>{}</strong>, {} <span class=\"when\">{}</span>",
            escape_html(&entry.job_title),
            escape_html(&entry.company),
            escape_html(&date_span(entry.start_date, entry.end_date)),
        )
        .expect("write experience line");
        if let Some(description) = &entry.description {
            writeln!(html, "<p>{}</p>", escape_html(description)).expect("write experience body");
        }
        writeln!(html, "</div>").expect("close experience entry");
    }
}

fn render_projects(html: &mut String, resume: &Resume) {
    writeln!(html, "<h2>Projects</h2>").expect("write projects heading");
    for project in &resume.projects {
        writeln!(html, "<div class=\"entry\">").expect("open project entry");
        match &project.url {
            Some(url) => writeln!(
                html,
                "<strong><a href=\"{}\">{}</a></strong>",
                escape_html(url),
                escape_html(&project.title),
            )
            .expect("write project link"),
            None => writeln!(html, "<strong>{}</strong>", escape_html(&project.title))
                .expect("write project title"),
        }
        writeln!(html, "<p>{}</p>", escape_html(&project.description)).expect("write project body");
        if !project.technologies.is_empty() {
            writeln!(
                html,
                "<p class=\"when\">Technologies: {}</p>",
                escape_html(&project.technologies.join(", ")),
            )
            .expect("write project technologies");
        }
        writeln!(html, "</div>").expect("close project entry");
    }
}

fn render_certificates(html: &mut String, resume: &Resume) {
    writeln!(html, "<h2>Certificates</h2><ul>").expect("write certificates heading");
    for certificate in &resume.certificates {
        let mut line = format!("{}, {}", certificate.title, certificate.institute);
        if let Some(issued) = certificate.issued_on {
            line.push_str(&format!(" ({})", issued.format("%b %Y")));
        }
        writeln!(html, "<li>{}</li>", escape_html(&line)).expect("write certificate");
    }
    writeln!(html, "</ul>").expect("close certificates");
}

fn date_span(start: Option<NaiveDate>, end: Option<NaiveDate>) -> String {
    match (start, end) {
        (Some(start), Some(end)) => {
            format!("{} to {}", start.format("%b %Y"), end.format("%b %Y"))
        }
        (Some(start), None) => format!("{} to present", start.format("%b %Y")),
        (None, Some(end)) => format!("until {}", end.format("%b %Y")),
        (None, None) => String::new(),
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
