//! Round-trip tests for the source mutator.
//!
//! Every edit is a minimal byte-range splice: the tests assert not just
//! that the edit landed but that every byte outside the edited span is
//! unchanged. After each successful edit the text is re-parsed, the way
//! callers are required to.

use rstest::rstest;
use sharpsync::{BackendKind, CstBackend, EditFailed, PatternBackend, SyncBackend, SyncContext};

const CUSTOMER: &str = r#"namespace Crm.Models;

public class Customer
{
    /// <summary>Primary key.</summary>
    public Guid Id { get; set; }

    /// <summary>Display name.</summary>
    [MaxLength(100)]
    public string Name { get; set; }

    public int Age { get; set; }

    public string? Notes { get; set; }
}
"#;

#[rstest]
#[case::cst(Box::new(CstBackend))]
#[case::pattern(Box::new(PatternBackend))]
fn rename_replaces_only_the_identifier(#[case] backend: Box<dyn SyncBackend>) {
    let out = backend
        .rename_property(CUSTOMER, "Name", "FullName")
        .expect("rename");

    // the only difference is the identifier token
    assert_eq!(out, CUSTOMER.replace("string Name ", "string FullName "));

    let entity = backend.parse(&out).expect("re-parse");
    let names: Vec<_> = entity.properties.iter().map(|p| p.name.as_str()).collect();
    assert!(names.contains(&"FullName"));
    assert!(!names.contains(&"Name"));
}

#[rstest]
#[case::cst(Box::new(CstBackend))]
#[case::pattern(Box::new(PatternBackend))]
fn rename_missing_property_fails(#[case] backend: Box<dyn SyncBackend>) {
    assert_eq!(
        backend.rename_property(CUSTOMER, "Nope", "Else"),
        Err(EditFailed)
    );
}

#[rstest]
#[case::cst(Box::new(CstBackend))]
#[case::pattern(Box::new(PatternBackend))]
fn change_type_replaces_only_the_type(#[case] backend: Box<dyn SyncBackend>) {
    let out = backend
        .change_property_type(CUSTOMER, "Age", "long", false)
        .expect("change type");
    assert_eq!(out, CUSTOMER.replace("public int Age", "public long Age"));

    let entity = backend.parse(&out).expect("re-parse");
    let age = entity.properties.iter().find(|p| p.name == "Age").unwrap();
    assert_eq!(age.ty, "long");
}

#[rstest]
#[case::cst(Box::new(CstBackend))]
#[case::pattern(Box::new(PatternBackend))]
fn change_type_can_request_nullable(#[case] backend: Box<dyn SyncBackend>) {
    let out = backend
        .change_property_type(CUSTOMER, "Age", "decimal", true)
        .expect("change type");
    assert!(out.contains("public decimal? Age { get; set; }"));

    let entity = backend.parse(&out).expect("re-parse");
    let age = entity.properties.iter().find(|p| p.name == "Age").unwrap();
    assert_eq!(age.ty, "decimal");
    assert!(age.nullable);
}

#[rstest]
#[case::cst(Box::new(CstBackend))]
#[case::pattern(Box::new(PatternBackend))]
fn toggle_nullable_adds_exactly_one_sigil(#[case] backend: Box<dyn SyncBackend>) {
    let out = backend.set_nullable(CUSTOMER, "Age", true).expect("toggle");
    assert_eq!(out, CUSTOMER.replace("public int Age", "public int? Age"));
}

#[rstest]
#[case::cst(Box::new(CstBackend))]
#[case::pattern(Box::new(PatternBackend))]
fn toggle_nullable_on_nullable_is_byte_identical_noop(#[case] backend: Box<dyn SyncBackend>) {
    let out = backend
        .set_nullable(CUSTOMER, "Notes", true)
        .expect("no-op toggle");
    assert_eq!(out, CUSTOMER, "file bytes must be unchanged");
}

#[rstest]
#[case::cst(Box::new(CstBackend))]
#[case::pattern(Box::new(PatternBackend))]
fn toggle_nullable_off_strips_the_sigil(#[case] backend: Box<dyn SyncBackend>) {
    let out = backend
        .set_nullable(CUSTOMER, "Notes", false)
        .expect("toggle off");
    assert_eq!(out, CUSTOMER.replace("string? Notes", "string Notes"));
}

#[rstest]
#[case::cst(Box::new(CstBackend))]
#[case::pattern(Box::new(PatternBackend))]
fn add_property_appends_after_last(#[case] backend: Box<dyn SyncBackend>) {
    let out = backend
        .add_property(CUSTOMER, "Email", "string", true)
        .expect("add");
    assert!(out.contains("        public string? Email { get; set; }\n"));

    let entity = backend.parse(&out).expect("re-parse");
    let names: Vec<_> = entity.properties.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names.last(), Some(&"Email"), "added after the last property");

    // everything before the insertion point is untouched
    let insert = out.find("        public string? Email").expect("stub");
    assert_eq!(&out[..insert], &CUSTOMER[..insert]);
}

#[rstest]
#[case::cst(Box::new(CstBackend))]
#[case::pattern(Box::new(PatternBackend))]
fn add_property_without_class_fails(#[case] backend: Box<dyn SyncBackend>) {
    assert_eq!(
        backend.add_property("// nothing here\n", "X", "int", false),
        Err(EditFailed)
    );
}

#[test]
fn add_property_into_empty_class_body() {
    let src = "public class Empty\n{\n}\n";
    let out = CstBackend
        .add_property(src, "Id", "Guid", false)
        .expect("add");
    assert!(out.contains("        public Guid Id { get; set; }\n"));
    let entity = CstBackend.parse(&out).expect("re-parse");
    assert_eq!(entity.properties.len(), 1);
}

#[rstest]
#[case::cst(Box::new(CstBackend))]
#[case::pattern(Box::new(PatternBackend))]
fn remove_property_takes_docs_and_attributes_along(#[case] backend: Box<dyn SyncBackend>) {
    let out = backend.remove_property(CUSTOMER, "Name").expect("remove");

    assert!(!out.contains("Display name."), "doc comment removed");
    assert!(!out.contains("MaxLength"), "attribute removed");
    assert!(!out.contains("public string Name"));

    // the surviving properties are byte-identical
    assert!(out.contains("    /// <summary>Primary key.</summary>\n    public Guid Id { get; set; }\n"));
    assert!(out.contains("    public int Age { get; set; }\n"));

    let entity = backend.parse(&out).expect("re-parse");
    let names: Vec<_> = entity.properties.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Id", "Age", "Notes"]);
}

#[rstest]
#[case::cst(Box::new(CstBackend))]
#[case::pattern(Box::new(PatternBackend))]
fn remove_missing_property_fails(#[case] backend: Box<dyn SyncBackend>) {
    assert_eq!(backend.remove_property(CUSTOMER, "Ghost"), Err(EditFailed));
}

#[test]
fn pattern_backend_fails_closed_on_ambiguous_match() {
    let two = format!(
        "{CUSTOMER}\npublic class Shadow\n{{\n    public string Name {{ get; set; }}\n}}\n"
    );
    let backend = PatternBackend;
    assert_eq!(
        backend.rename_property(&two, "Name", "Title"),
        Err(EditFailed),
        "two candidate declarations must reject the edit"
    );
    assert_eq!(backend.remove_property(&two, "Name"), Err(EditFailed));
}

// =========================================================================
// File-level application through SyncContext
// =========================================================================

#[test]
fn file_edit_round_trip_strips_bom_and_applies() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("Customer.cs");
    std::fs::write(&path, format!("\u{feff}{CUSTOMER}")).expect("write");

    let ctx = SyncContext::with_kind(BackendKind::Cst);
    ctx.rename_property(&path, "Name", "Title").expect("rename");

    let on_disk = std::fs::read_to_string(&path).expect("read back");
    assert!(!on_disk.starts_with('\u{feff}'), "BOM never reintroduced");
    assert_eq!(on_disk, CUSTOMER.replace("string Name ", "string Title "));

    let entity = ctx.parse_file(&path).expect("parse file");
    assert_eq!(entity.file_path, path.display().to_string());
    assert!(entity.last_modified.is_some());
    assert!(entity.properties.iter().any(|p| p.name == "Title"));
}

#[test]
fn file_noop_toggle_leaves_mtime_content_identical() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("Customer.cs");
    std::fs::write(&path, CUSTOMER).expect("write");

    let ctx = SyncContext::with_kind(BackendKind::Cst);
    ctx.set_nullable(&path, "Notes", true).expect("no-op");

    let on_disk = std::fs::read_to_string(&path).expect("read back");
    assert_eq!(on_disk, CUSTOMER);
}

#[test]
fn failed_edit_leaves_file_untouched() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("Customer.cs");
    std::fs::write(&path, CUSTOMER).expect("write");

    let ctx = SyncContext::with_kind(BackendKind::Pattern);
    assert_eq!(ctx.remove_property(&path, "Ghost"), Err(EditFailed));

    let on_disk = std::fs::read_to_string(&path).expect("read back");
    assert_eq!(on_disk, CUSTOMER);
}
