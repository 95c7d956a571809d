use crate::applications::prefill::{
    extract_form_fields, match_fields, prefill_form, FormField, PrefillError, StudentSnapshot,
};

/// Saved page with the script blob present. One item is a section header
/// without an entry id, and one label carries brackets inside the string.
const SCRIPT_FORM: &str = r#"<html><head>
<script type="text/javascript">var FB_PUBLIC_LOAD_DATA_ = [null,[null,[[1001,"Full Name",null,0,[[111001]]],[1002,"Email Address",null,0,[[111002]]],[1003,"Class XII Percentage",null,0,[[111003]]],[1004,"Gender",null,2,[[111004]]],[1005,"Skills [comma separated]",null,0,[[111005]]],[1006,"About the role",null,8]]],"Campus Hiring"];</script>
</head><body></body></html>"#;

fn field(entry_id: &str, label: &str) -> FormField {
    FormField {
        entry_id: entry_id.to_string(),
        label: label.to_string(),
    }
}

fn snapshot() -> StudentSnapshot {
    StudentSnapshot {
        first_name: "Riya".to_string(),
        last_name: "Menon".to_string(),
        email: Some("riya@college.edu".to_string()),
        phone: Some("9876512345".to_string()),
        register_number: Some("PC23MCA042".to_string()),
        program: Some("mca".to_string()),
        semester: Some(3),
        skills: vec!["Rust".to_string(), "SQL".to_string()],
        tenth_cgpa: Some(9.1),
        twelth_cgpa: Some(8.7),
        degree_cgpa: Some(8.2),
        linkedin_url: Some("https://linkedin.com/in/riya".to_string()),
    }
}

#[test]
fn script_blob_fields_win_over_markup() {
    let html = format!(
        "{SCRIPT_FORM}\n<input type=\"text\" name=\"entry.999\" aria-label=\"Stray\">"
    );

    let fields = extract_form_fields(&html);

    assert_eq!(fields.len(), 5);
    assert_eq!(fields[0].entry_id, "entry.111001");
    assert_eq!(fields[0].label, "Full Name");
    assert_eq!(fields[4].entry_id, "entry.111005");
    assert_eq!(fields[4].label, "Skills [comma separated]");
    assert!(fields.iter().all(|field| field.entry_id != "entry.999"));
}

#[test]
fn markup_fallback_reads_aria_labels() {
    let html = r#"<form>
<input type="text" name="entry.2001" aria-label="Full Name">
<input type="radio" name="entry.2002" aria-label="Gender" value="Male">
<input type="radio" name="entry.2002" aria-label="Gender" value="Female">
<textarea name="entry.2003" aria-label="Skills"></textarea>
<input type="hidden" name="fvv" value="1">
</form>"#;

    let fields = extract_form_fields(html);

    assert_eq!(fields.len(), 3);
    assert_eq!(fields[0].entry_id, "entry.2001");
    assert_eq!(fields[1].entry_id, "entry.2002");
    assert_eq!(fields[1].label, "Gender");
    assert_eq!(fields[2].entry_id, "entry.2003");
}

#[test]
fn labels_match_their_snapshot_slots() {
    let fields = vec![
        field("entry.1", "Full Name"),
        field("entry.2", "E-mail Address"),
        field("entry.3", "Ph. No."),
        field("entry.4", "Register Number"),
        field("entry.5", "10th CGPA"),
        field("entry.6", "Class XII Percentage"),
        field("entry.7", "Degree CGPA"),
        field("entry.8", "Technical Skills"),
        field("entry.9", "LinkedIn Profile"),
        field("entry.10", "Current Semester"),
        field("entry.11", "Branch"),
    ];

    let (matched, unmatched) = match_fields(&fields, &snapshot());

    assert!(unmatched.is_empty());
    assert_eq!(matched.get("entry.1"), Some(&"Riya Menon".to_string()));
    assert_eq!(
        matched.get("entry.2"),
        Some(&"riya@college.edu".to_string())
    );
    assert_eq!(matched.get("entry.3"), Some(&"9876512345".to_string()));
    assert_eq!(matched.get("entry.4"), Some(&"PC23MCA042".to_string()));
    assert_eq!(matched.get("entry.5"), Some(&"9.1".to_string()));
    assert_eq!(matched.get("entry.6"), Some(&"8.7".to_string()));
    assert_eq!(matched.get("entry.7"), Some(&"8.2".to_string()));
    assert_eq!(matched.get("entry.8"), Some(&"Rust, SQL".to_string()));
    assert_eq!(
        matched.get("entry.9"),
        Some(&"https://linkedin.com/in/riya".to_string())
    );
    assert_eq!(matched.get("entry.10"), Some(&"3".to_string()));
    assert_eq!(matched.get("entry.11"), Some(&"mca".to_string()));
}

#[test]
fn tier_specific_cgpa_beats_the_catch_all() {
    let fields = vec![
        field("entry.1", "SSLC CGPA"),
        field("entry.2", "Aggregate CGPA"),
    ];

    let (matched, unmatched) = match_fields(&fields, &snapshot());

    assert!(unmatched.is_empty());
    assert_eq!(matched.get("entry.1"), Some(&"9.1".to_string()));
    assert_eq!(matched.get("entry.2"), Some(&"8.2".to_string()));
}

#[test]
fn unmatched_fields_are_reported_not_guessed() {
    let fields = vec![
        field("entry.1", "Gender"),
        field("entry.2", "Willing to relocate?"),
        field("entry.3", "Email ID"),
    ];

    let (matched, unmatched) = match_fields(&fields, &snapshot());

    assert_eq!(matched.len(), 1);
    assert!(matched.contains_key("entry.3"));
    assert_eq!(unmatched.len(), 2);
    assert_eq!(unmatched[0].label, "Gender");
    assert_eq!(unmatched[1].label, "Willing to relocate?");
}

#[test]
fn prefill_builds_a_viewform_link() {
    let outcome = prefill_form(
        "https://docs.google.com/forms/d/e/FAKE/formResponse",
        SCRIPT_FORM,
        &snapshot(),
    )
    .expect("prefill succeeds");

    assert!(outcome
        .url
        .starts_with("https://docs.google.com/forms/d/e/FAKE/viewform?"));
    assert!(outcome.url.contains("entry.111001=Riya+Menon"));
    assert!(outcome.url.contains("entry.111002=riya%40college.edu"));
    assert_eq!(outcome.matched.len(), 4);
    assert_eq!(outcome.unmatched.len(), 1);
    assert_eq!(outcome.unmatched[0].label, "Gender");
}

#[test]
fn form_without_fields_is_rejected() {
    let err = prefill_form(
        "https://example.com/apply",
        "<html><body>closed</body></html>",
        &snapshot(),
    )
    .expect_err("nothing to fill");

    assert_eq!(err, PrefillError::NoFields);
}

#[test]
fn unparseable_form_url_is_rejected() {
    let err = prefill_form("not a url", SCRIPT_FORM, &snapshot()).expect_err("bad url");

    assert!(matches!(err, PrefillError::BadUrl(_)));
}
