//! Utility-class variant matching.
//!
//! A variant such as `current:` prefixes a utility class (`current:text-red`)
//! and scopes it with a selector template. Every `&` in a template stands for
//! the selector of the generated class.

/// Placeholder replaced by the base selector.
pub const PLACEHOLDER: char = '&';

/// One or more selector templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Templates(Vec<String>);

impl Templates {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for Templates {
    fn from(template: &str) -> Self {
        Templates(vec![template.to_string()])
    }
}

impl From<String> for Templates {
    fn from(template: String) -> Self {
        Templates(vec![template])
    }
}

impl From<Vec<&str>> for Templates {
    fn from(templates: Vec<&str>) -> Self {
        Templates(templates.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for Templates {
    fn from(templates: Vec<String>) -> Self {
        Templates(templates)
    }
}

/// A named variant with its selector templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub name: String,
    /// Completion hint offered to editors, `name:`.
    pub autocomplete: String,
    templates: Templates,
}

/// Creates a variant.
///
/// # Example
///
/// ```rust
/// use vouch::css::create_variant;
///
/// let current = create_variant("current", r#"&[aria-current="page"]"#);
/// assert_eq!(current.autocomplete, "current:");
///
/// let matched = current.match_input("current:text-red").unwrap();
/// assert_eq!(matched.matcher, "text-red");
/// assert_eq!(matched.selector(".x"), r#".x[aria-current="page"]"#);
///
/// assert!(current.match_input("hover:text-red").is_none());
/// ```
pub fn create_variant(name: impl Into<String>, template: impl Into<Templates>) -> Variant {
    let name = name.into();
    Variant {
        autocomplete: format!("{name}:"),
        name,
        templates: template.into(),
    }
}

impl Variant {
    pub fn templates(&self) -> &[String] {
        self.templates.as_slice()
    }

    /// Matches `name:rest` or `name-rest`, returning the remainder.
    ///
    /// An empty remainder does not match.
    pub fn match_input<'a>(&self, input: &'a str) -> Option<VariantMatch<'a>> {
        let rest = input.strip_prefix(self.name.as_str())?;
        let matcher = rest.strip_prefix(':').or_else(|| rest.strip_prefix('-'))?;
        if matcher.is_empty() {
            return None;
        }
        Some(VariantMatch {
            matcher,
            templates: self.templates.clone(),
        })
    }
}

/// A successful variant match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantMatch<'a> {
    /// The input with the variant prefix removed.
    pub matcher: &'a str,
    templates: Templates,
}

impl VariantMatch<'_> {
    /// Substitutes `base` into every template and joins them with `", "`.
    pub fn selector(&self, base: &str) -> String {
        self.templates
            .as_slice()
            .iter()
            .map(|template| template.replace(PLACEHOLDER, base))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
