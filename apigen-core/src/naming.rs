//! Resource name derivation.
//!
//! Every identifier a generated file uses is computed here, once, from the
//! raw name typed by the user. Templates never re-derive names themselves.

use heck::{ToKebabCase, ToSnakeCase};

use crate::GenerateError;

/// Version used when none is supplied.
pub const DEFAULT_VERSION: &str = "V1";

/// Turns a singular word into its plural form.
pub trait Pluralizer {
    fn pluralize(&self, word: &str) -> String;
}

/// Appends `s`, nothing else: `category` becomes `categorys`.
///
/// This is the default so generated route segments and method names stay
/// predictable from the resource name alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuffixPluralizer;

impl Pluralizer for SuffixPluralizer {
    fn pluralize(&self, word: &str) -> String {
        format!("{word}s")
    }
}

/// Simple English rules (`-es` after sibilants, `-ies` after a consonant + `y`).
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishPluralizer;

impl Pluralizer for EnglishPluralizer {
    fn pluralize(&self, word: &str) -> String {
        if word.ends_with('s')
            || word.ends_with('x')
            || word.ends_with("sh")
            || word.ends_with("ch")
        {
            format!("{word}es")
        } else if word.ends_with('y')
            && !word.ends_with("ey")
            && !word.ends_with("ay")
            && !word.ends_with("oy")
            && !word.ends_with("uy")
        {
            format!("{}ies", &word[..word.len() - 1])
        } else {
            format!("{word}s")
        }
    }
}

/// The closed set of names derived from one raw resource name.
///
/// Only [`NameDeriver`] constructs it; every field but `raw_input` and
/// `version` is a pure function of `pascal_name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceIdentity {
    raw_input: String,
    pascal_name: String,
    camel_name: String,
    route_segment: String,
    table_name: String,
    version: String,
}

impl ResourceIdentity {
    /// The name exactly as typed.
    pub fn raw_input(&self) -> &str {
        &self.raw_input
    }

    /// `"order item"` → `"OrderItem"`.
    pub fn pascal_name(&self) -> &str {
        &self.pascal_name
    }

    /// `"OrderItem"` → `"orderItem"`; used for variables and parameters.
    pub fn camel_name(&self) -> &str {
        &self.camel_name
    }

    /// Lower-kebab plural used in URLs: `"order-items"`.
    pub fn route_segment(&self) -> &str {
        &self.route_segment
    }

    /// Snake plural used for the database table: `"order_items"`.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Version suffix / namespace segment, e.g. `"V1"`.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Lower-cased version, used as the route prefix of a seeded routes file.
    pub fn version_lower(&self) -> String {
        self.version.to_lowercase()
    }
}

/// Builds [`ResourceIdentity`] values with a configurable pluralizer and
/// default version.
pub struct NameDeriver {
    pluralizer: Box<dyn Pluralizer>,
    default_version: String,
}

impl Default for NameDeriver {
    fn default() -> Self {
        NameDeriver::new(Box::new(SuffixPluralizer), DEFAULT_VERSION)
    }
}

impl NameDeriver {
    pub fn new(pluralizer: Box<dyn Pluralizer>, default_version: impl Into<String>) -> Self {
        NameDeriver {
            pluralizer,
            default_version: default_version.into(),
        }
    }

    /// Derive all identifiers for `raw_input` at `version`.
    ///
    /// A missing or empty `version` falls back to the default version. The
    /// name and version must both be usable as class-name fragments; anything
    /// else is rejected with [`GenerateError::InvalidInput`] before a single
    /// file is touched.
    pub fn derive(
        &self,
        raw_input: &str,
        version: Option<&str>,
    ) -> Result<ResourceIdentity, GenerateError> {
        let pascal_name = to_pascal_case(raw_input);
        if pascal_name.is_empty() {
            return Err(GenerateError::InvalidInput(
                "resource name must not be empty".into(),
            ));
        }
        if !is_identifier(&pascal_name) {
            return Err(GenerateError::InvalidInput(format!(
                "resource name '{raw_input}' does not produce a valid class name ('{pascal_name}')"
            )));
        }

        let version = match version {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => self.default_version.clone(),
        };
        if !is_identifier(&version) {
            return Err(GenerateError::InvalidInput(format!(
                "version '{version}' is not a valid identifier"
            )));
        }

        Ok(ResourceIdentity {
            raw_input: raw_input.to_string(),
            camel_name: lcfirst(&pascal_name),
            route_segment: self.pluralizer.pluralize(&pascal_name.to_kebab_case()),
            table_name: self.pluralizer.pluralize(&pascal_name.to_snake_case()),
            pascal_name,
            version,
        })
    }
}

/// Derive with the default (suffix) pluralizer and `V1` as default version.
pub fn derive(raw_input: &str, version: Option<&str>) -> Result<ResourceIdentity, GenerateError> {
    NameDeriver::default().derive(raw_input, version)
}

/// Capitalize the first letter of each whitespace-separated word and join
/// them. The rest of each word is kept as typed, so an already PascalCased
/// name maps to itself.
pub fn to_pascal_case(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

fn lcfirst(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Letters, digits and `_`, not starting with a digit.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pascal_from_words() {
        assert_eq!(to_pascal_case("order item"), "OrderItem");
        assert_eq!(to_pascal_case("  customer   order "), "CustomerOrder");
        assert_eq!(to_pascal_case("customer Order"), "CustomerOrder");
        assert_eq!(to_pascal_case("CustomerOrder"), "CustomerOrder");
    }

    #[test]
    fn end_to_end_names() {
        let id = derive("customer order", None).unwrap();
        assert_eq!(id.pascal_name(), "CustomerOrder");
        assert_eq!(id.camel_name(), "customerOrder");
        assert_eq!(id.route_segment(), "customer-orders");
        assert_eq!(id.table_name(), "customer_orders");
        assert_eq!(id.version(), "V1");
        assert_eq!(id.version_lower(), "v1");
        assert_eq!(id.raw_input(), "customer order");
    }

    #[test]
    fn empty_version_falls_back_to_default() {
        assert_eq!(derive("Order", Some("")).unwrap().version(), "V1");
        assert_eq!(derive("Order", Some("V2")).unwrap().version(), "V2");
    }

    #[test]
    fn empty_name_rejected() {
        assert!(matches!(derive("", None), Err(GenerateError::InvalidInput(_))));
        assert!(matches!(derive("   \t", None), Err(GenerateError::InvalidInput(_))));
    }

    #[test]
    fn non_identifier_name_rejected() {
        assert!(matches!(derive("order-item", None), Err(GenerateError::InvalidInput(_))));
        assert!(matches!(derive("1st order", None), Err(GenerateError::InvalidInput(_))));
    }

    #[test]
    fn non_identifier_version_rejected() {
        assert!(matches!(derive("Order", Some("v1.2")), Err(GenerateError::InvalidInput(_))));
        assert!(matches!(derive("Order", Some("V 2")), Err(GenerateError::InvalidInput(_))));
    }

    #[test]
    fn pascal_name_never_contains_whitespace() {
        for raw in ["a", "a b", " x  y z ", "already Pascal", "tab\tseparated", "new\nline"] {
            let id = derive(raw, None).unwrap();
            assert!(!id.pascal_name().is_empty());
            assert!(!id.pascal_name().chars().any(char::is_whitespace));
        }
    }

    #[test]
    fn derivation_is_idempotent() {
        for raw in ["customer order", "CustomerOrder", "customer Order", "order_item", "http client"] {
            for version in [None, Some("V2"), Some("")] {
                let first = derive(raw, version).unwrap();
                let second = derive(first.pascal_name(), version).unwrap();
                assert_eq!(first.pascal_name(), second.pascal_name());
                assert_eq!(first.camel_name(), second.camel_name());
                assert_eq!(first.route_segment(), second.route_segment());
                assert_eq!(first.version(), second.version());
            }
        }
    }

    #[test]
    fn suffix_pluralizer_is_naive() {
        assert_eq!(derive("Category", None).unwrap().route_segment(), "categorys");
    }

    #[test]
    fn english_pluralizer_rules() {
        let p = EnglishPluralizer;
        assert_eq!(p.pluralize("category"), "categories");
        assert_eq!(p.pluralize("status"), "statuses");
        assert_eq!(p.pluralize("box"), "boxes");
        assert_eq!(p.pluralize("key"), "keys");
        assert_eq!(p.pluralize("user"), "users");

        let deriver = NameDeriver::new(Box::new(EnglishPluralizer), DEFAULT_VERSION);
        let id = deriver.derive("product category", None).unwrap();
        assert_eq!(id.route_segment(), "product-categories");
        assert_eq!(id.table_name(), "product_categories");
    }

    #[test]
    fn custom_default_version() {
        let deriver = NameDeriver::new(Box::new(SuffixPluralizer), "V3");
        assert_eq!(deriver.derive("Order", None).unwrap().version(), "V3");
    }
}
