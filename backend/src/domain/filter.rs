//! Declared query-parameter filters for list endpoints.
//!
//! Each endpoint lists the fields callers may filter on and how each field
//! matches. Undeclared query parameters are ignored; empty values mean "no
//! filter", matching the behaviour callers expect from HTML filter forms.

use serde_json::Value;

use crate::domain::contract::Record;

/// How a declared filter compares the record value to the parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Textual equality on the rendered value.
    Exact,
    /// Case-insensitive substring match.
    Contains,
}

/// One filterable field of a list endpoint.
#[derive(Debug, Clone)]
pub struct FilterSpec {
    field: String,
    mode: FilterMode,
}

impl FilterSpec {
    /// Exact-match filter on `field`.
    #[must_use]
    pub fn exact(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            mode: FilterMode::Exact,
        }
    }

    /// Case-insensitive containment filter on `field`.
    #[must_use]
    pub fn contains(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            mode: FilterMode::Contains,
        }
    }

    /// Query parameter (and record field) name.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    fn matches(&self, record: &Record, needle: &str) -> bool {
        let Some(value) = record.get(&self.field).and_then(render_scalar) else {
            return false;
        };
        match self.mode {
            FilterMode::Exact => value == needle,
            FilterMode::Contains => value.to_lowercase().contains(&needle.to_lowercase()),
        }
    }
}

fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Retain the records matching every supplied filter parameter.
///
/// `params` is the request's decoded query string; only parameters matching
/// a declared spec participate.
#[must_use]
pub fn apply_filters(
    records: Vec<Record>,
    specs: &[FilterSpec],
    params: &[(String, String)],
) -> Vec<Record> {
    let mut records = records;
    for spec in specs {
        let Some((_, needle)) = params.iter().find(|(name, _)| name == spec.field()) else {
            continue;
        };
        if needle.is_empty() {
            continue;
        }
        records.retain(|record| spec.matches(record, needle));
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn record(name: &str, status: u64) -> Record {
        let mut record = Record::new();
        record.insert("nickname".into(), json!(name));
        record.insert("status".into(), json!(status));
        record
    }

    fn fixtures() -> Vec<Record> {
        vec![record("Ada Lovelace", 1), record("Grace Hopper", 1), record("ada admin", 0)]
    }

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[rstest]
    #[case(&[("nickname", "ada")], 2)]
    #[case(&[("nickname", "ADA")], 2)]
    #[case(&[("nickname", "hopper")], 1)]
    #[case(&[("nickname", "turing")], 0)]
    fn contains_filter_is_case_insensitive(
        #[case] query: &[(&str, &str)],
        #[case] expected: usize,
    ) {
        let specs = [FilterSpec::contains("nickname")];
        let kept = apply_filters(fixtures(), &specs, &params(query));
        assert_eq!(kept.len(), expected);
    }

    #[test]
    fn exact_filter_compares_rendered_numbers() {
        let specs = [FilterSpec::exact("status")];
        let kept = apply_filters(fixtures(), &specs, &params(&[("status", "0")]));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].get("nickname"), Some(&json!("ada admin")));
    }

    #[test]
    fn filters_compose_with_and_semantics() {
        let specs = [FilterSpec::contains("nickname"), FilterSpec::exact("status")];
        let kept = apply_filters(
            fixtures(),
            &specs,
            &params(&[("nickname", "ada"), ("status", "1")]),
        );
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn empty_and_undeclared_parameters_are_ignored() {
        let specs = [FilterSpec::exact("status")];
        let kept = apply_filters(
            fixtures(),
            &specs,
            &params(&[("status", ""), ("page", "2"), ("unknown", "x")]),
        );
        assert_eq!(kept.len(), 3);
    }
}
