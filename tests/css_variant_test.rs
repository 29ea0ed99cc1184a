//! Integration tests for CSS variant matching.

use vouch::css::{create_variant, Templates};

#[test]
fn test_current_variant() {
    let current = create_variant("current", r#"&[aria-current="page"]"#);

    let matched = current.match_input("current:text-red").unwrap();
    assert_eq!(matched.matcher, "text-red");
    assert_eq!(matched.selector(".x"), r#".x[aria-current="page"]"#);

    assert!(current.match_input("hover:text-red").is_none());
}

#[test]
fn test_variant_fields() {
    let variant = create_variant("open", "&[open]");
    assert_eq!(variant.name, "open");
    assert_eq!(variant.autocomplete, "open:");
    assert_eq!(variant.templates(), ["&[open]"]);
}

#[test]
fn test_template_list() {
    let templates = Templates::from(vec!["&:hover".to_string(), "&:focus-visible".to_string()]);
    let variant = create_variant("interact", templates);
    let matched = variant.match_input("interact-ring").unwrap();
    assert_eq!(matched.matcher, "ring");
    assert_eq!(matched.selector(".ring"), ".ring:hover, .ring:focus-visible");
}

#[test]
fn test_template_without_placeholder() {
    let variant = create_variant("print", "@media print");
    let matched = variant.match_input("print:hidden").unwrap();
    assert_eq!(matched.selector(".hidden"), "@media print");
}
