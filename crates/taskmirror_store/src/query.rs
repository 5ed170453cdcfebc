//! Structured queries: filters, sorting, projection, pagination.
//!
//! Callers (an HTTP layer parsing JSON query strings, or the sync engine
//! itself) build these values; stores evaluate them. Keeping the query
//! language as plain data keeps the store trait object-safe and lets
//! every implementation share the same matching semantics.

use crate::document::Document;
use serde_json::Value;
use std::cmp::Ordering as CmpOrdering;

/// A single per-field condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Field equals the value exactly.
    Eq(Value),
    /// Field is a string equal to the value ignoring ASCII case.
    EqIgnoreCase(String),
    /// Field differs from the value (missing fields match).
    Ne(Value),
    /// Field equals one of the values.
    In(Vec<Value>),
    /// Field presence check.
    Exists(bool),
}

impl Condition {
    /// Evaluates the condition against a field value (`None` = absent).
    fn matches(&self, value: Option<&Value>) -> bool {
        match self {
            Condition::Eq(expected) => value == Some(expected),
            Condition::EqIgnoreCase(expected) => value
                .and_then(Value::as_str)
                .is_some_and(|s| s.eq_ignore_ascii_case(expected)),
            Condition::Ne(expected) => value != Some(expected),
            Condition::In(values) => value.is_some_and(|v| values.contains(v)),
            Condition::Exists(expected) => value.is_some() == *expected,
        }
    }
}

/// A conjunction of per-field conditions.
///
/// An empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Condition)>,
}

impl Filter {
    /// Creates an empty filter (matches everything).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality condition.
    #[must_use]
    pub fn eq(mut self, field: impl Into<String>, value: Value) -> Self {
        self.conditions.push((field.into(), Condition::Eq(value)));
        self
    }

    /// Adds a case-insensitive string equality condition.
    #[must_use]
    pub fn eq_ignore_case(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.conditions
            .push((field.into(), Condition::EqIgnoreCase(value.into())));
        self
    }

    /// Adds an inequality condition.
    #[must_use]
    pub fn ne(mut self, field: impl Into<String>, value: Value) -> Self {
        self.conditions.push((field.into(), Condition::Ne(value)));
        self
    }

    /// Adds a membership condition.
    #[must_use]
    pub fn is_in(mut self, field: impl Into<String>, values: Vec<Value>) -> Self {
        self.conditions.push((field.into(), Condition::In(values)));
        self
    }

    /// Adds a field presence condition.
    #[must_use]
    pub fn exists(mut self, field: impl Into<String>, expected: bool) -> Self {
        self.conditions
            .push((field.into(), Condition::Exists(expected)));
        self
    }

    /// Returns true if the filter has no conditions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Evaluates the filter against a document.
    #[must_use]
    pub fn matches(&self, doc: &Document) -> bool {
        self.conditions
            .iter()
            .all(|(field, condition)| condition.matches(doc.get(field)))
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

/// A single sort key.
#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    /// Field to sort by.
    pub field: String,
    /// Direction.
    pub order: Order,
}

/// Field projection: which fields of matched documents to return.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// Return only the named fields.
    Include(Vec<String>),
    /// Return all fields except the named ones.
    Exclude(Vec<String>),
}

impl Projection {
    /// Applies the projection to a document.
    #[must_use]
    pub fn apply(&self, doc: &Document) -> Document {
        match self {
            Projection::Include(fields) => doc.project_include(fields),
            Projection::Exclude(fields) => doc.project_exclude(fields),
        }
    }
}

/// A full listing query: filter + sort + projection + pagination.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    /// Filter to apply.
    pub filter: Filter,
    /// Sort keys, applied in order with a stable sort.
    pub sort: Vec<SortKey>,
    /// Optional field projection.
    pub select: Option<Projection>,
    /// Number of matched documents to skip.
    pub skip: Option<usize>,
    /// Maximum number of documents to return.
    pub limit: Option<usize>,
}

impl ListQuery {
    /// Creates a query that returns every document in a collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the filter.
    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    /// Adds a sort key.
    #[must_use]
    pub fn sort_by(mut self, field: impl Into<String>, order: Order) -> Self {
        self.sort.push(SortKey {
            field: field.into(),
            order,
        });
        self
    }

    /// Sets the projection.
    #[must_use]
    pub fn select(mut self, projection: Projection) -> Self {
        self.select = Some(projection);
        self
    }

    /// Sets the skip count.
    #[must_use]
    pub fn skip(mut self, n: usize) -> Self {
        self.skip = Some(n);
        self
    }

    /// Sets the result limit.
    #[must_use]
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }
}

/// Orders two JSON values for sorting.
///
/// Nulls and missing fields sort first, then booleans, numbers, strings,
/// and everything else last in its JSON text form. This mirrors the loose
/// ordering document stores apply across mixed-type fields.
#[must_use]
pub(crate) fn compare_values(a: Option<&Value>, b: Option<&Value>) -> CmpOrdering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(_) => 4,
        }
    }

    match rank(a).cmp(&rank(b)) {
        CmpOrdering::Equal => match (a, b) {
            (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
            (Some(Value::Number(x)), Some(Value::Number(y))) => x
                .as_f64()
                .partial_cmp(&y.as_f64())
                .unwrap_or(CmpOrdering::Equal),
            (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
            (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
            _ => CmpOrdering::Equal,
        },
        other => other,
    }
}
