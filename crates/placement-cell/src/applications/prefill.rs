//! Heuristic prefill for hosted application forms.
//!
//! Recruiters routinely collect applications through a hosted form builder.
//! Given the saved HTML of such a form, the `entry.<digits>` field ids are
//! lifted either from the embedded `FB_PUBLIC_LOAD_DATA_` script blob or
//! from the visible markup, their labels are matched against what the cell
//! already knows about the student, and the result is folded into a
//! `viewform` link that opens with most answers in place. The caller
//! supplies the HTML; nothing here talks to the network.

use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// One fillable question lifted from the form markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub entry_id: String,
    pub label: String,
}

/// Everything the matcher knows about one student. Assembled by the
/// service from the account, the student profile and the performance
/// record; empty slots simply never match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentSnapshot {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub register_number: Option<String>,
    pub program: Option<String>,
    pub semester: Option<u32>,
    pub skills: Vec<String>,
    pub tenth_cgpa: Option<f64>,
    pub twelth_cgpa: Option<f64>,
    pub degree_cgpa: Option<f64>,
    pub linkedin_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefillOutcome {
    pub url: String,
    pub matched: BTreeMap<String, String>,
    pub unmatched: Vec<FormField>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrefillError {
    #[error("no fillable fields found in the supplied form markup")]
    NoFields,
    #[error("form url is not parseable: {0}")]
    BadUrl(String),
}

#[derive(Debug, Clone, Copy)]
enum SnapshotField {
    FullName,
    FirstName,
    LastName,
    Email,
    Phone,
    Registration,
    Program,
    Semester,
    Skills,
    TenthCgpa,
    TwelthCgpa,
    DegreeCgpa,
    AnyCgpa,
    Linkedin,
}

/// Label fragments tried top to bottom against the normalized question
/// text. Tier-specific academic fragments sit above the bare cgpa
/// catch-all so "Class XII CGPA" lands on the twelfth tier, and the
/// twelfth tier is probed before the tenth because "class x" is a prefix
/// of "class xii".
const LABEL_PATTERNS: &[(SnapshotField, &[&str])] = &[
    (SnapshotField::Linkedin, &["linkedin"]),
    (
        SnapshotField::TwelthCgpa,
        &[
            "twelfth",
            "twelth",
            "12th",
            "hsc",
            "plus two",
            "higher secondary",
            "class xii",
            "puc",
            "intermediate",
        ],
    ),
    (
        SnapshotField::TenthCgpa,
        &["tenth", "10th", "sslc", "class x"],
    ),
    (
        SnapshotField::DegreeCgpa,
        &[
            "degree cgpa",
            "degree percentage",
            "degree marks",
            "ug cgpa",
            "ug percentage",
            "undergraduate",
            "graduation percentage",
            "bachelors",
            "current cgpa",
            "present cgpa",
        ],
    ),
    (SnapshotField::Email, &["email", "mail"]),
    (
        SnapshotField::Phone,
        &["phone", "mobile", "contact", "ph no", "whatsapp", "telephone"],
    ),
    (
        SnapshotField::Registration,
        &["registration", "register", "reg no", "regno", "roll", "admission", "adm no"],
    ),
    (SnapshotField::Semester, &["semester", "sem"]),
    (
        SnapshotField::Skills,
        &["skills", "skill set", "technologies", "programming languages"],
    ),
    (
        SnapshotField::Program,
        &[
            "program",
            "programme",
            "course",
            "branch",
            "department",
            "dept",
            "stream",
            "discipline",
            "degree",
        ],
    ),
    (SnapshotField::FirstName, &["first name", "firstname"]),
    (SnapshotField::LastName, &["last name", "lastname", "surname"]),
    (
        SnapshotField::FullName,
        &["full name", "student name", "candidate name", "applicant name", "name"],
    ),
    (
        SnapshotField::AnyCgpa,
        &["cgpa", "gpa", "percentage", "marks", "aggregate", "score"],
    ),
];

/// Lifts field ids and labels out of saved form HTML. The script blob is
/// the primary source; visible markup is the fallback.
pub fn extract_form_fields(html: &str) -> Vec<FormField> {
    fields_from_script(html).unwrap_or_else(|| fields_from_markup(html))
}

/// Pairs extracted fields with snapshot values. Returns the `entry.N` to
/// value map alongside the fields nothing matched; unmatched fields are
/// reported, never guessed at.
pub fn match_fields(
    fields: &[FormField],
    snapshot: &StudentSnapshot,
) -> (BTreeMap<String, String>, Vec<FormField>) {
    let mut matched = BTreeMap::new();
    let mut unmatched = Vec::new();
    for field in fields {
        let label = normalize(&field.label);
        let value = LABEL_PATTERNS.iter().find_map(|(slot, patterns)| {
            patterns
                .iter()
                .any(|pattern| label.contains(pattern))
                .then(|| field_value(snapshot, *slot))
                .flatten()
        });
        match value {
            Some(value) => {
                matched.insert(field.entry_id.clone(), value);
            }
            None => unmatched.push(field.clone()),
        }
    }
    (matched, unmatched)
}

/// Extracts, matches, and builds the shareable `viewform` link carrying the
/// matched values as query parameters.
pub fn prefill_form(
    form_url: &str,
    html: &str,
    snapshot: &StudentSnapshot,
) -> Result<PrefillOutcome, PrefillError> {
    let fields = extract_form_fields(html);
    if fields.is_empty() {
        return Err(PrefillError::NoFields);
    }
    let (matched, unmatched) = match_fields(&fields, snapshot);
    let mut url = viewform_url(form_url)?;
    url.set_query(None);
    if !matched.is_empty() {
        url.query_pairs_mut().extend_pairs(
            matched
                .iter()
                .map(|(entry, value)| (entry.as_str(), value.as_str())),
        );
    }
    Ok(PrefillOutcome {
        url: url.to_string(),
        matched,
        unmatched,
    })
}

fn field_value(snapshot: &StudentSnapshot, field: SnapshotField) -> Option<String> {
    match field {
        SnapshotField::FullName => {
            let name = format!("{} {}", snapshot.first_name, snapshot.last_name);
            let name = name.trim().to_string();
            (!name.is_empty()).then_some(name)
        }
        SnapshotField::FirstName => {
            (!snapshot.first_name.is_empty()).then(|| snapshot.first_name.clone())
        }
        SnapshotField::LastName => {
            (!snapshot.last_name.is_empty()).then(|| snapshot.last_name.clone())
        }
        SnapshotField::Email => snapshot.email.clone(),
        SnapshotField::Phone => snapshot.phone.clone(),
        SnapshotField::Registration => snapshot.register_number.clone(),
        SnapshotField::Program => snapshot.program.clone(),
        SnapshotField::Semester => snapshot.semester.map(|semester| semester.to_string()),
        SnapshotField::Skills => {
            (!snapshot.skills.is_empty()).then(|| snapshot.skills.join(", "))
        }
        SnapshotField::TenthCgpa => snapshot.tenth_cgpa.map(|value| value.to_string()),
        SnapshotField::TwelthCgpa => snapshot.twelth_cgpa.map(|value| value.to_string()),
        SnapshotField::DegreeCgpa | SnapshotField::AnyCgpa => {
            snapshot.degree_cgpa.map(|value| value.to_string())
        }
        SnapshotField::Linkedin => snapshot.linkedin_url.clone(),
    }
}

/// Lowercases and strips punctuation so "E-mail Address:" and "email
/// address" compare equal.
fn normalize(label: &str) -> String {
    let cleaned: String = label
        .to_lowercase()
        .chars()
        .filter(|ch| ch.is_alphanumeric() || ch.is_whitespace())
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn fields_from_script(html: &str) -> Option<Vec<FormField>> {
    let marker = Regex::new(r"FB_PUBLIC_LOAD_DATA_\s*=").unwrap();
    let found = marker.find(html)?;
    let payload = balanced_array(&html[found.end()..])?;
    let data: Value = serde_json::from_str(payload).ok()?;
    // The item list has moved around between exports; probe the known spots.
    let candidates = [
        data.get(1).and_then(|outer| outer.get(1)),
        data.get(1),
        data.get(0).and_then(|outer| outer.get(1)),
    ];
    let fields = candidates
        .into_iter()
        .flatten()
        .map(collect_item_fields)
        .find(|fields| !fields.is_empty());
    fields
}

fn collect_item_fields(items: &Value) -> Vec<FormField> {
    let Some(items) = items.as_array() else {
        return Vec::new();
    };
    let mut fields = Vec::new();
    for item in items {
        // Item shape: [item_id, label, description, type, [[entry_id, ...]]].
        // Section headers and media items carry no entry id and drop out.
        let Some(label) = item.get(1).and_then(Value::as_str) else {
            continue;
        };
        let entry_id = item
            .get(4)
            .and_then(|answers| answers.get(0))
            .and_then(|answer| answer.get(0))
            .and_then(Value::as_u64);
        let Some(entry_id) = entry_id else {
            continue;
        };
        let label = label.split_whitespace().collect::<Vec<_>>().join(" ");
        if label.is_empty() {
            continue;
        }
        fields.push(FormField {
            entry_id: format!("entry.{entry_id}"),
            label,
        });
    }
    fields
}

/// Carves the JSON array assigned to the marker out of the surrounding
/// script text. String and escape state are tracked so brackets inside
/// question labels do not end the scan early.
fn balanced_array(source: &str) -> Option<&str> {
    let start = source.find('[')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, ch) in source[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '[' if !in_string => depth += 1,
            ']' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&source[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Fallback when the script blob is absent: scan input-like tags for
/// `entry.N` names and read their labels from `aria-label` attributes.
/// Choice groups repeat one name per option; the first occurrence wins.
fn fields_from_markup(html: &str) -> Vec<FormField> {
    let tag = Regex::new(r"<(?:input|textarea|select)\b[^>]*>").unwrap();
    let mut fields = Vec::new();
    let mut seen = BTreeSet::new();
    for found in tag.find_iter(html) {
        let Some(name) = attribute_value(found.as_str(), "name") else {
            continue;
        };
        if !is_entry_id(&name) || !seen.insert(name.clone()) {
            continue;
        }
        let Some(label) = attribute_value(found.as_str(), "aria-label") else {
            continue;
        };
        let label = label.split_whitespace().collect::<Vec<_>>().join(" ");
        if label.is_empty() {
            continue;
        }
        fields.push(FormField {
            entry_id: name,
            label,
        });
    }
    fields
}

fn is_entry_id(name: &str) -> bool {
    name.strip_prefix("entry.").is_some_and(|digits| {
        !digits.is_empty() && digits.bytes().all(|byte| byte.is_ascii_digit())
    })
}

fn attribute_value(tag: &str, attribute: &str) -> Option<String> {
    let marker = format!("{attribute}=\"");
    for (position, _) in tag.match_indices(&marker) {
        // Guard against hits inside another attribute's quoted value.
        let boundary = tag[..position].chars().next_back();
        if !boundary.is_some_and(char::is_whitespace) {
            continue;
        }
        let rest = &tag[position + marker.len()..];
        if let Some(end) = rest.find('"') {
            return Some(rest[..end].to_string());
        }
    }
    None
}

/// Normalizes the form link to its fillable `viewform` shape.
fn viewform_url(form_url: &str) -> Result<Url, PrefillError> {
    let mut url = Url::parse(form_url).map_err(|err| PrefillError::BadUrl(err.to_string()))?;
    let path = url.path().to_string();
    if let Some(base) = path.strip_suffix("/formResponse") {
        url.set_path(&format!("{base}/viewform"));
    } else if !path.ends_with("/viewform") {
        url.set_path(&format!("{}/viewform", path.trim_end_matches('/')));
    }
    Ok(url)
}
