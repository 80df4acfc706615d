//! Derived views over a [`ClaimConfigDocument`].
//!
//! `flatten` splits the step-partitioned document into the free-form
//! attribute fields (all non-fixed steps, merged) and the fixed fields that
//! describe top-level claim columns. `sort_by_ordering_number` gives the
//! presentation and iteration order shared by steps and fields.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::config::{ClaimConfigDocument, FieldDefinition, FieldMap, Step};

/// A field declared inside a fixed step, with its owning step.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedField {
    pub step_title: String,
    pub field: FieldDefinition,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlattenedSchema {
    /// Union of every non-fixed step's configs; a repeated key keeps the
    /// definition from the last step that declares it.
    pub non_fixed: FieldMap,
    pub fixed: Vec<FixedField>,
}

impl FlattenedSchema {
    pub fn has_fixed_steps(&self) -> bool {
        !self.fixed.is_empty()
    }
}

/// Anything that carries an optional `orderingNumber`.
pub trait Ordered {
    fn ordering_number(&self) -> Option<i64>;
}

impl Ordered for FieldDefinition {
    fn ordering_number(&self) -> Option<i64> {
        self.ordering_number
    }
}

impl Ordered for Step {
    fn ordering_number(&self) -> Option<i64> {
        self.ordering_number
    }
}

/// Entries ordered ascending by `orderingNumber` (missing counts as 0).
/// The sort is stable, so ties keep their insertion order.
pub fn sort_by_ordering_number<'a, K, T, I>(entries: I) -> Vec<(K, &'a T)>
where
    T: Ordered + 'a,
    I: IntoIterator<Item = (K, &'a T)>,
{
    let mut sorted: Vec<(K, &'a T)> = entries.into_iter().collect();
    sorted.sort_by_key(|(_, item)| item.ordering_number().unwrap_or(0));
    sorted
}

pub fn flatten(document: &ClaimConfigDocument) -> FlattenedSchema {
    let mut schema = FlattenedSchema::default();
    for step in &document.steps {
        if step.fixed {
            schema
                .fixed
                .extend(step.configs.iter().map(|(_, field)| FixedField {
                    step_title: step.title.clone(),
                    field: field.clone(),
                }));
        } else {
            for (key, field) in step.configs.iter() {
                if schema.non_fixed.insert(key.to_string(), field.clone()).is_some() {
                    tracing::warn!(
                        key,
                        step = %step.title,
                        "attribute key declared in more than one step; last definition wins"
                    );
                }
            }
        }
    }
    schema
}

impl ClaimConfigDocument {
    pub fn flatten(&self) -> FlattenedSchema {
        flatten(self)
    }

    pub fn ordered_steps(&self) -> Vec<&Step> {
        sort_by_ordering_number(self.steps.iter().map(|s| ((), s)))
            .into_iter()
            .map(|(_, s)| s)
            .collect()
    }
}

fn key_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("static pattern"))
}

/// Structural problems that make a document unfit to be saved. An empty
/// result means the document is acceptable.
pub fn check_document(document: &ClaimConfigDocument) -> Vec<String> {
    let mut problems = Vec::new();
    let mut titles = HashSet::new();
    let mut attribute_keys: HashSet<&str> = HashSet::new();

    for step in &document.steps {
        if step.title.trim().is_empty() {
            problems.push("Step title must not be empty".to_string());
        } else if !titles.insert(step.title.as_str()) {
            problems.push(format!("Step title {} is used more than once", step.title));
        }

        for (map_key, field) in step.configs.iter() {
            if !key_pattern().is_match(&field.key) {
                problems.push(format!(
                    "Field key {} in step {} must be alphanumeric and can include underscores only",
                    field.key, step.title
                ));
            }
            if map_key != field.key {
                problems.push(format!(
                    "Field {} in step {} is stored under key {}",
                    field.key, step.title, map_key
                ));
            }
            if field.field_type.has_options() && field.options.is_empty() {
                problems.push(format!("Field {} needs at least one option", field.key));
            }
            if !step.fixed && !attribute_keys.insert(map_key) {
                problems.push(format!(
                    "Attribute key {map_key} is declared in more than one step"
                ));
            }
        }
    }
    problems
}
