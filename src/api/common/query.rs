//
//  gerrit-cli
//  api/common/query.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Query Parameter Encoding
//!
//! Option structs (`QueryChangeOptions`, `ProjectOptions`, ...) declare their
//! query-parameter names with `#[serde(rename = "...")]` and their
//! omit-when-unset rule with `skip_serializing_if`. This module flattens the
//! serialized form of such a struct into URL query pairs.
//!
//! # Encoding Rules
//!
//! | Field value | Query output |
//! |-------------|--------------|
//! | `null` (unset `Option`) | omitted |
//! | string | `key=value` |
//! | number / bool | `key=<display form>` |
//! | array | one `key=item` pair per element, in order |
//!
//! Nested objects have no query representation and are rejected.

use serde_json::Value;
use url::Url;

use super::{GerritError, Result};

/// Appends the fields of `options` to the query string of `url`.
///
/// # Parameters
///
/// * `url` - The request URL; existing query pairs are kept
/// * `options` - The serialized option struct
///
/// # Errors
///
/// Returns [`GerritError::Query`] if `options` is not an object (or `null`),
/// or if one of its fields is itself an object.
///
/// # Example
///
/// ```rust
/// use gerrit_cli::api::common::encode_query;
/// use url::Url;
///
/// let mut url = Url::parse("https://review.example.com/changes/").unwrap();
/// encode_query(&mut url, &serde_json::json!({"q": ["is:open", "owner:self"], "n": 25})).unwrap();
/// assert_eq!(url.query(), Some("q=is%3Aopen&q=owner%3Aself&n=25"));
/// ```
pub fn encode_query(url: &mut Url, options: &Value) -> Result<()> {
    let fields = match options {
        Value::Null => return Ok(()),
        Value::Object(fields) => fields,
        other => {
            return Err(GerritError::Query(format!(
                "expected a struct of options, got {}",
                kind(other)
            )))
        }
    };

    let mut pairs = Vec::new();
    for (key, value) in fields {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    pairs.push((key.as_str(), scalar(key, item)?));
                }
            }
            other => pairs.push((key.as_str(), scalar(key, other)?)),
        }
    }

    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }
    Ok(())
}

fn scalar(key: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(GerritError::Query(format!(
            "option {key:?} cannot be encoded from {}",
            kind(other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use serde_json::json;

    #[derive(Serialize, Default)]
    struct Options {
        #[serde(rename = "n", skip_serializing_if = "Option::is_none")]
        limit: Option<u32>,
        #[serde(rename = "S", skip_serializing_if = "Option::is_none")]
        skip: Option<u32>,
        #[serde(rename = "o", skip_serializing_if = "Vec::is_empty")]
        additional_fields: Vec<String>,
        #[serde(rename = "d", skip_serializing_if = "std::ops::Not::not")]
        description: bool,
    }

    fn base() -> Url {
        Url::parse("http://localhost/projects/").unwrap()
    }

    #[test]
    fn test_only_set_fields_are_encoded() {
        let mut url = base();
        let options = Options {
            limit: Some(25),
            ..Default::default()
        };
        encode_query(&mut url, &serde_json::to_value(&options).unwrap()).unwrap();
        assert_eq!(url.query(), Some("n=25"));
    }

    #[test]
    fn test_repeated_and_boolean_fields() {
        let mut url = base();
        let options = Options {
            skip: Some(5),
            additional_fields: vec!["LABELS".into(), "CURRENT_REVISION".into()],
            description: true,
            ..Default::default()
        };
        encode_query(&mut url, &serde_json::to_value(&options).unwrap()).unwrap();
        assert_eq!(
            url.query(),
            Some("S=5&o=LABELS&o=CURRENT_REVISION&d=true")
        );
    }

    #[test]
    fn test_empty_options_leave_url_without_query() {
        let mut url = base();
        encode_query(&mut url, &serde_json::to_value(Options::default()).unwrap()).unwrap();
        assert_eq!(url.query(), None);

        encode_query(&mut url, &Value::Null).unwrap();
        assert_eq!(url.as_str(), "http://localhost/projects/");
    }

    #[test]
    fn test_non_struct_options_are_rejected() {
        let mut url = base();
        assert!(matches!(
            encode_query(&mut url, &json!("raw")),
            Err(GerritError::Query(_))
        ));
        assert!(matches!(
            encode_query(&mut url, &json!({"nested": {"a": 1}})),
            Err(GerritError::Query(_))
        ));
    }
}
