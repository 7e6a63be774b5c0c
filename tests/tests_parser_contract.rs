//! Contract tests for the structural parser.
//!
//! Every case runs against both backends: the CST implementation and the
//! pattern fallback satisfy the same contract, and on well-formed input
//! they must produce the same Entity shape.

use rstest::rstest;
use sharpsync::{CstBackend, PatternBackend, SyncBackend};

fn backends() -> [(&'static str, Box<dyn SyncBackend>); 2] {
    [
        ("cst", Box::new(CstBackend)),
        ("pattern", Box::new(PatternBackend)),
    ]
}

const PRODUCT: &str = r#"using System;

namespace Shop.Models
{
    /// <summary>A product offered for sale.</summary>
    [Table("Products")]
    public partial class Product : EntityBase, IAuditable
    {
        /// <summary>Primary key.</summary>
        public Guid Id { get; set; }

        [MaxLength(200)]
        public required string Name { get; set; }

        public decimal Price { get; set; }

        public int? Stock { get; set; }

        public bool InStock { get; set; }
    }
}
"#;

#[rstest]
#[case::cst(Box::new(CstBackend))]
#[case::pattern(Box::new(PatternBackend))]
fn extracts_the_entity_shape(#[case] backend: Box<dyn SyncBackend>) {
    let entity = backend.parse(PRODUCT).expect("entity");

    assert_eq!(entity.name, "Product");
    assert_eq!(entity.namespace, "Shop.Models");
    assert!(entity.is_partial);
    assert_eq!(entity.base_class, "EntityBase");
    assert_eq!(entity.interfaces, vec!["IAuditable".to_string()]);
    assert_eq!(entity.attributes, vec!["Table".to_string()]);
    assert_eq!(entity.xml_doc, "A product offered for sale.");

    let names: Vec<_> = entity.properties.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Id", "Name", "Price", "Stock", "InStock"]);
}

#[rstest]
#[case::cst(Box::new(CstBackend))]
#[case::pattern(Box::new(PatternBackend))]
fn property_details(#[case] backend: Box<dyn SyncBackend>) {
    let entity = backend.parse(PRODUCT).expect("entity");

    let id = &entity.properties[0];
    assert_eq!(id.ty, "Guid");
    assert!(!id.nullable);
    assert!(id.required, "non-nullable Guid is required by inference");
    assert_eq!(id.xml_doc, "Primary key.");
    assert!(id.has_getter);
    assert!(id.has_setter);

    let name = &entity.properties[1];
    assert!(name.required, "explicit required modifier");
    assert_eq!(name.attributes, vec!["MaxLength".to_string()]);

    let stock = &entity.properties[3];
    assert_eq!(stock.ty, "int", "sigil is stripped from the type");
    assert!(stock.nullable);
    assert!(!stock.required, "nullable is never required by inference");
}

#[rstest]
#[case::cst(Box::new(CstBackend))]
#[case::pattern(Box::new(PatternBackend))]
fn required_heuristic_exempts_reference_types(#[case] backend: Box<dyn SyncBackend>) {
    let src = "public class C { public string Label { get; set; } public int Count { get; set; } }";
    let entity = backend.parse(src).expect("entity");
    assert!(!entity.properties[0].required, "string is reference-like");
    assert!(entity.properties[1].required, "non-nullable int");
}

#[rstest]
#[case::cst(Box::new(CstBackend))]
#[case::pattern(Box::new(PatternBackend))]
fn parsing_is_idempotent(#[case] backend: Box<dyn SyncBackend>) {
    let first = backend.parse(PRODUCT).expect("first parse");
    let second = backend.parse(PRODUCT).expect("second parse");
    assert_eq!(first, second);
}

#[rstest]
#[case::cst(Box::new(CstBackend))]
#[case::pattern(Box::new(PatternBackend))]
fn absent_when_no_eligible_class(#[case] backend: Box<dyn SyncBackend>) {
    assert!(backend.parse("").is_none());
    assert!(backend.parse("internal class Hidden { }").is_none());
    assert!(backend.parse("public abstract class Base { }").is_none());
    assert!(backend.parse("public static class Util { }").is_none());
    assert!(backend.parse("public interface IThing { }").is_none());
    assert!(backend.parse("not C# at all ~~ ???").is_none());
}

#[rstest]
#[case::cst(Box::new(CstBackend))]
#[case::pattern(Box::new(PatternBackend))]
fn first_eligible_class_wins(#[case] backend: Box<dyn SyncBackend>) {
    let src = r#"
public class First { public int A { get; set; } }
public class Second { public int B { get; set; } }
"#;
    let entity = backend.parse(src).expect("entity");
    assert_eq!(entity.name, "First");
    assert_eq!(entity.properties.len(), 1);
    assert_eq!(entity.properties[0].name, "A");
}

#[rstest]
#[case::cst(Box::new(CstBackend))]
#[case::pattern(Box::new(PatternBackend))]
fn file_scoped_namespace(#[case] backend: Box<dyn SyncBackend>) {
    let src = "namespace Billing.Core;\n\npublic class Invoice { public int Number { get; set; } }\n";
    let entity = backend.parse(src).expect("entity");
    assert_eq!(entity.namespace, "Billing.Core");
}

#[rstest]
#[case::cst(Box::new(CstBackend))]
#[case::pattern(Box::new(PatternBackend))]
fn missing_namespace_is_empty(#[case] backend: Box<dyn SyncBackend>) {
    let entity = backend
        .parse("public class Bare { public int X { get; set; } }")
        .expect("entity");
    assert_eq!(entity.namespace, "");
}

#[rstest]
#[case::cst(Box::new(CstBackend))]
#[case::pattern(Box::new(PatternBackend))]
fn static_and_const_members_are_not_properties(#[case] backend: Box<dyn SyncBackend>) {
    let src = r#"
public class Config
{
    public static string Shared { get; set; }
    public int Timeout { get; set; }
}
"#;
    let entity = backend.parse(src).expect("entity");
    let names: Vec<_> = entity.properties.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Timeout"]);
}

#[rstest]
#[case::cst(Box::new(CstBackend))]
#[case::pattern(Box::new(PatternBackend))]
fn methods_and_fields_are_not_properties(#[case] backend: Box<dyn SyncBackend>) {
    let src = r#"
public class Account
{
    private int balance;

    public int Balance { get; set; }

    public void Deposit(int amount)
    {
        balance = balance + amount;
    }
}
"#;
    let entity = backend.parse(src).expect("entity");
    let names: Vec<_> = entity.properties.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Balance"]);
}

#[rstest]
#[case::cst(Box::new(CstBackend))]
#[case::pattern(Box::new(PatternBackend))]
fn doc_without_summary_tag_joins_lines(#[case] backend: Box<dyn SyncBackend>) {
    let src = r#"
public class Note
{
    /// First line
    /// second line
    public string Body { get; set; }
}
"#;
    let entity = backend.parse(src).expect("entity");
    assert_eq!(entity.properties[0].xml_doc, "First line second line");
}

#[rstest]
#[case::cst(Box::new(CstBackend))]
#[case::pattern(Box::new(PatternBackend))]
fn init_accessor_counts_as_setter(#[case] backend: Box<dyn SyncBackend>) {
    let src = "public class C { public int Id { get; init; } }";
    let entity = backend.parse(src).expect("entity");
    assert!(entity.properties[0].has_getter);
    assert!(entity.properties[0].has_setter);
}

#[test]
fn backends_agree_on_well_formed_input() {
    for (label, backend) in backends() {
        let entity = backend.parse(PRODUCT).unwrap_or_else(|| panic!("{label} parse"));
        let reference = CstBackend.parse(PRODUCT).expect("reference parse");
        assert_eq!(
            entity, reference,
            "{label} backend must match the CST result on well-formed input"
        );
    }
}

#[test]
fn line_numbers_point_at_declarations() {
    let entity = CstBackend.parse(PRODUCT).expect("entity");
    // `public Guid Id` sits on line 10 of the snippet (1-based), but its
    // span starts at the doc comment's attribute-free declaration line.
    let id = &entity.properties[0];
    let line = PRODUCT
        .lines()
        .position(|l| l.contains("public Guid Id"))
        .expect("declaration line")
        + 1;
    assert_eq!(id.line_number as usize, line);
}
