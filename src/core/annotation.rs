//! Annotation payload parsing.
//!
//! Export annotations reach us as raw strings attached to declarations, in the
//! form `category[:type_params]:attrs`, `category:attrs`, or bare `category`.
//! Sections are split on standalone colons; the doubled colons of a scope
//! separator (`map:std::string,int:name=ScoreMap`) never separate sections.
//! With two or more separators, the attribute section is the text after the
//! LAST one and everything between the first and last is the type-parameter
//! section. A single separator is ambiguous between the two forms; it
//! resolves by category: categories that take type parameters (containers,
//! templates) read the section as `type_params`, everything else reads it as
//! `attrs`, so `vector:Piece` and `function:name=spawn` both mean what they
//! look like.
//!
//! Parsing never fails: malformed payloads degrade to a bare category equal to
//! the raw input with an empty attribute map.

use std::collections::BTreeMap;

/// Recognized annotation categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationCategory {
    Module,
    Namespace,
    Class,
    StaticClass,
    Singleton,
    AbstractClass,
    Method,
    StaticMethod,
    Operator,
    Property,
    Function,
    Variable,
    Constant,
    Enum,
    Vector,
    Map,
    UnorderedMap,
    Set,
    List,
    Template,
    TemplateInstance,
    Ignore,
    Callback,
}

impl AnnotationCategory {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "module" => Some(Self::Module),
            "namespace" => Some(Self::Namespace),
            "class" => Some(Self::Class),
            "static_class" => Some(Self::StaticClass),
            "singleton" => Some(Self::Singleton),
            "abstract_class" => Some(Self::AbstractClass),
            "method" => Some(Self::Method),
            "static_method" => Some(Self::StaticMethod),
            "operator" => Some(Self::Operator),
            "property" => Some(Self::Property),
            "function" => Some(Self::Function),
            "variable" => Some(Self::Variable),
            "constant" => Some(Self::Constant),
            "enum" => Some(Self::Enum),
            "vector" => Some(Self::Vector),
            "map" => Some(Self::Map),
            "unordered_map" => Some(Self::UnorderedMap),
            "set" => Some(Self::Set),
            "list" => Some(Self::List),
            "template" => Some(Self::Template),
            "template_instance" => Some(Self::TemplateInstance),
            "ignore" => Some(Self::Ignore),
            "callback" => Some(Self::Callback),
            _ => None,
        }
    }

    /// Whether payloads of this category carry a type-parameter section.
    pub fn takes_type_params(&self) -> bool {
        matches!(
            self,
            Self::Vector
                | Self::Map
                | Self::UnorderedMap
                | Self::Set
                | Self::List
                | Self::Template
                | Self::TemplateInstance
        )
    }
}

/// Result of parsing one annotation payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAnnotation {
    /// Raw category text. May be unrecognized; the extractor decides.
    pub category: String,
    /// Text between the first and last colon, if both exist.
    pub type_params: Option<String>,
    /// Attribute map from the section after the last colon.
    pub attributes: BTreeMap<String, String>,
}

impl ParsedAnnotation {
    /// Recognized category, if any.
    pub fn known_category(&self) -> Option<AnnotationCategory> {
        AnnotationCategory::from_str(&self.category)
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

/// Parse an annotation payload. Never fails.
///
/// Only standalone colons act as section separators; the doubled colons of a
/// scope separator (`std::string`) never do.
pub fn parse(raw: &str) -> ParsedAnnotation {
    let raw = raw.trim();
    let separators = separator_positions(raw);

    let Some(&first) = separators.first() else {
        // Bare category.
        return ParsedAnnotation {
            category: raw.to_string(),
            type_params: None,
            attributes: BTreeMap::new(),
        };
    };

    if first == 0 {
        // Empty category: degrade leniently.
        return ParsedAnnotation {
            category: raw.to_string(),
            type_params: None,
            attributes: BTreeMap::new(),
        };
    }

    let last = *separators.last().unwrap_or(&first);
    let category = raw[..first].to_string();

    if first == last {
        // One colon: the section is type params for container/template
        // categories and attributes for everything else.
        let section = &raw[first + 1..];
        let takes_params = AnnotationCategory::from_str(&category)
            .is_some_and(|c| c.takes_type_params());
        return if takes_params {
            ParsedAnnotation {
                category,
                type_params: (!section.trim().is_empty()).then(|| section.trim().to_string()),
                attributes: BTreeMap::new(),
            }
        } else {
            ParsedAnnotation {
                category,
                type_params: None,
                attributes: parse_attributes(section),
            }
        };
    }

    let type_params = raw[first + 1..last].to_string();
    ParsedAnnotation {
        category,
        type_params: (!type_params.is_empty()).then_some(type_params),
        attributes: parse_attributes(&raw[last + 1..]),
    }
}

/// Byte positions of colons that are not part of a `::` pair.
fn separator_positions(raw: &str) -> Vec<usize> {
    let bytes = raw.as_bytes();
    (0..bytes.len())
        .filter(|&i| {
            bytes[i] == b':'
                && (i == 0 || bytes[i - 1] != b':')
                && bytes.get(i + 1) != Some(&b':')
        })
        .collect()
}

/// Parse the comma-separated attribute section.
///
/// Entries are `key=value` or bare `key` (implying `"true"`). Empty entries
/// are skipped.
fn parse_attributes(section: &str) -> BTreeMap<String, String> {
    let mut attributes = BTreeMap::new();
    for entry in section.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        match entry.split_once('=') {
            Some((key, value)) => {
                attributes.insert(key.trim().to_string(), value.trim().to_string());
            }
            None => {
                attributes.insert(entry.to_string(), "true".to_string());
            }
        }
    }
    attributes
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn attrs(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn bare_category() {
        let parsed = parse("class");
        assert_eq!(parsed.category, "class");
        assert_eq!(parsed.type_params, None);
        assert!(parsed.attributes.is_empty());
        assert_eq!(parsed.known_category(), Some(AnnotationCategory::Class));
    }

    #[test]
    fn category_with_attributes() {
        let parsed = parse("class:namespace=game,abstract");
        assert_eq!(parsed.category, "class");
        assert_eq!(parsed.type_params, None);
        assert_eq!(
            parsed.attributes,
            attrs(&[("namespace", "game"), ("abstract", "true")])
        );
    }

    #[test]
    fn type_params_between_first_and_last_colon() {
        let parsed = parse("vector:int:name=IntVector");
        assert_eq!(parsed.category, "vector");
        assert_eq!(parsed.type_params.as_deref(), Some("int"));
        assert_eq!(parsed.attributes, attrs(&[("name", "IntVector")]));
    }

    #[test]
    fn type_params_may_contain_colons() {
        let parsed = parse("map:std::string,game::Piece:name=PieceMap");
        assert_eq!(parsed.category, "map");
        assert_eq!(
            parsed.type_params.as_deref(),
            Some("std::string,game::Piece")
        );
        assert_eq!(parsed.attributes, attrs(&[("name", "PieceMap")]));
    }

    #[test]
    fn single_colon_container_payload_is_type_params() {
        let parsed = parse("vector:Piece");
        assert_eq!(parsed.category, "vector");
        assert_eq!(parsed.type_params.as_deref(), Some("Piece"));
        assert!(parsed.attributes.is_empty());

        let parsed = parse("map:std::string,int");
        assert_eq!(parsed.type_params.as_deref(), Some("std::string,int"));
    }

    #[test]
    fn bare_attribute_implies_true() {
        let parsed = parse("property:readonly");
        assert_eq!(parsed.attributes, attrs(&[("readonly", "true")]));
    }

    #[test]
    fn malformed_degrades_to_raw_category() {
        let parsed = parse(":namespace=game");
        assert_eq!(parsed.category, ":namespace=game");
        assert!(parsed.attributes.is_empty());
        assert_eq!(parsed.known_category(), None);
    }

    #[test]
    fn unrecognized_category_is_kept_verbatim() {
        let parsed = parse("frobnicate:some=thing");
        assert_eq!(parsed.category, "frobnicate");
        assert_eq!(parsed.known_category(), None);
        assert_eq!(parsed.attributes, attrs(&[("some", "thing")]));
    }

    #[test]
    fn whitespace_in_attributes_is_trimmed() {
        let parsed = parse("function: name = spawn , global ");
        assert_eq!(
            parsed.attributes,
            attrs(&[("name", "spawn"), ("global", "true")])
        );
    }
}
