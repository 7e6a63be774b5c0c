//! Directory scan tests: skip sets, property-less files, ordering.

use std::fs;

use sharpsync::{BackendKind, SyncContext, scan_directory};

const INVOICE: &str = r#"namespace Billing;

public class Invoice
{
    public Guid Id { get; set; }
    public decimal Total { get; set; }
}
"#;

const CUSTOMER: &str = r#"namespace Billing;

public class Customer
{
    public Guid Id { get; set; }
    public string Name { get; set; }
}
"#;

const EMPTY_CLASS: &str = "namespace Billing;\n\npublic class Tag\n{\n}\n";

#[test]
fn scan_finds_entities_and_skips_tooling_directories() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();

    fs::create_dir_all(root.join("Models")).expect("mkdir");
    fs::create_dir_all(root.join("bin")).expect("mkdir");
    fs::create_dir_all(root.join("obj/Debug")).expect("mkdir");

    fs::write(root.join("Models/Invoice.cs"), INVOICE).expect("write");
    fs::write(root.join("Customer.cs"), CUSTOMER).expect("write");
    // build output must not be scanned
    fs::write(root.join("bin/Invoice.cs"), INVOICE).expect("write");
    fs::write(root.join("obj/Debug/Invoice.cs"), INVOICE).expect("write");
    // entities without properties are not reported
    fs::write(root.join("Tag.cs"), EMPTY_CLASS).expect("write");
    // non-C# files are ignored
    fs::write(root.join("README.md"), "# docs").expect("write");

    let ctx = SyncContext::detect();
    let entities = scan_directory(root, &ctx);

    let names: Vec<_> = entities.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Customer", "Invoice"], "path-sorted, skips applied");
    assert!(entities.iter().all(|e| !e.file_path.contains("bin")));
    assert!(entities.iter().all(|e| e.last_modified.is_some()));
}

#[test]
fn scan_of_missing_directory_is_empty() {
    let ctx = SyncContext::with_kind(BackendKind::Pattern);
    let entities = scan_directory(std::path::Path::new("/no/such/dir"), &ctx);
    assert!(entities.is_empty());
}

#[test]
fn mid_edit_files_are_simply_absent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();
    fs::write(root.join("Broken.cs"), "public class { oops").expect("write");
    fs::write(root.join("Customer.cs"), CUSTOMER).expect("write");

    let ctx = SyncContext::detect();
    let entities = scan_directory(root, &ctx);
    let names: Vec<_> = entities.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Customer"], "unparsable file is not an error");
}
