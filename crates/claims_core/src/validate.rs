//! Attribute validation against the runtime claim configuration.
//!
//! A single pass collects every problem instead of stopping at the first:
//!   1. unknown attribute keys
//!   2. fixed-step fields checked against the request's top-level fields
//!   3. each non-fixed field: required, select options, number coercion,
//!      primitive type, dependency
//!
//! The checks are plain functions over the flattened schema; callers get one
//! aggregate [`ClaimsError::InvalidAttributes`] or `Ok(())`.

use crate::attribute::{AttributeMap, AttributeValue};
use crate::config::{ClaimConfigDocument, FieldDefinition, FieldType};
use crate::error::ClaimsError;
use crate::schema::{sort_by_ordering_number, FixedField, FlattenedSchema};

/// Top-level keys never reported as missing by the fixed-field check.
pub const REQUIRED_CHECK_EXEMPT: &[&str] = &["attributes", "policyId"];

/// A claim-shaped request: named top-level fields plus the attribute bag.
pub trait ClaimPayload {
    fn top_level_field(&self, key: &str) -> Option<AttributeValue>;
    fn attributes(&self) -> &AttributeMap;
}

/// Validate `payload` against `config`, failing with every problem found.
pub fn validate_claim_attributes<P: ClaimPayload + ?Sized>(
    payload: &P,
    config: &ClaimConfigDocument,
) -> Result<(), ClaimsError> {
    let errors = collect_attribute_errors(payload, config);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ClaimsError::InvalidAttributes(errors))
    }
}

pub fn collect_attribute_errors<P: ClaimPayload + ?Sized>(
    payload: &P,
    config: &ClaimConfigDocument,
) -> Vec<String> {
    let schema = config.flatten();
    let mut errors = Vec::new();

    check_unknown_attributes(payload.attributes(), &schema, &mut errors);
    if schema.has_fixed_steps() {
        check_fixed_fields(payload, &schema.fixed, &mut errors);
    }
    for (key, field) in sort_by_ordering_number(schema.non_fixed.iter()) {
        check_attribute(key, field, payload.attributes(), &mut errors);
    }
    errors
}

pub fn check_unknown_attributes(
    attributes: &AttributeMap,
    schema: &FlattenedSchema,
    errors: &mut Vec<String>,
) {
    for key in attributes.keys() {
        if !schema.non_fixed.contains_key(key) {
            errors.push(format!("Invalid attribute {key} provided"));
        }
    }
}

pub fn check_fixed_fields<P: ClaimPayload + ?Sized>(
    payload: &P,
    fixed: &[FixedField],
    errors: &mut Vec<String>,
) {
    for FixedField { field, .. } in fixed {
        let key = field.key.as_str();
        let value = payload.top_level_field(key);

        let present = value.as_ref().is_some_and(AttributeValue::is_truthy);
        if field.required && !present && !REQUIRED_CHECK_EXEMPT.contains(&key) {
            errors.push(format!("Attribute {key} is required"));
        }

        if field.field_type == FieldType::Select {
            if let Some(value) = value.filter(|v| *v != AttributeValue::Null) {
                let rendered = value.to_string();
                let options = field.option_values();
                if !options.contains(&rendered.as_str()) {
                    errors.push(format!(
                        "Attribute {key} options are {} passed value {rendered} is invalid",
                        options.join(", ")
                    ));
                }
            }
        }
    }
}

/// Checks for one non-fixed field, in order: required, select membership,
/// number coercion, primitive type, dependency.
pub fn check_attribute(
    key: &str,
    field: &FieldDefinition,
    attributes: &AttributeMap,
    errors: &mut Vec<String>,
) {
    let mut value = attributes.get(key).cloned();

    let missing = match &value {
        None | Some(AttributeValue::Null) => true,
        Some(AttributeValue::Text(s)) => s.is_empty(),
        Some(_) => false,
    };
    if field.required && missing {
        errors.push(format!("Attribute {key} is required"));
    }

    if field.field_type == FieldType::Select {
        if let Some(v) = value.as_ref().filter(|v| v.is_truthy()) {
            let known = matches!(v, AttributeValue::Text(s) if field.options.iter().any(|o| o.value == *s));
            if !known {
                errors.push(format!(
                    "Attribute {key} options are {} passed value is invalid",
                    field.option_values().join(", ")
                ));
            }
        }
    }

    if field.field_type == FieldType::Number {
        if let Some(AttributeValue::Text(raw)) = &value {
            value = Some(AttributeValue::Number(crate::attribute::parse_number(raw)));
        }
    }

    if let Some(expected) = field.field_type.expected_primitive() {
        let actual = value.as_ref().map_or("undefined", AttributeValue::type_name);
        if actual != expected && field.required {
            errors.push(format!("Attribute {key} must be of type {expected}"));
        }
    }

    if let Some(dep) = &field.depends_on {
        let satisfied = attributes
            .get(&dep.key)
            .is_some_and(|other| other.loosely_equals(&dep.value));
        if !satisfied && value.as_ref().is_some_and(AttributeValue::is_truthy) {
            errors.push(format!(
                "Attribute {key} depends on {} being {}",
                dep.key, dep.value
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Step;

    #[derive(Default)]
    struct Req {
        top: Vec<(&'static str, AttributeValue)>,
        attributes: AttributeMap,
    }

    impl Req {
        fn attr(mut self, key: &str, value: impl Into<AttributeValue>) -> Self {
            self.attributes.insert(key.to_string(), value.into());
            self
        }

        fn top(mut self, key: &'static str, value: impl Into<AttributeValue>) -> Self {
            self.top.push((key, value.into()));
            self
        }
    }

    impl ClaimPayload for Req {
        fn top_level_field(&self, key: &str) -> Option<AttributeValue> {
            self.top.iter().find(|(k, _)| *k == key).map(|(_, v)| v.clone())
        }

        fn attributes(&self) -> &AttributeMap {
            &self.attributes
        }
    }

    fn text(key: &str) -> FieldDefinition {
        FieldDefinition::new(key, FieldType::Text)
    }

    fn doc(steps: Vec<Step>) -> ClaimConfigDocument {
        ClaimConfigDocument::new(steps)
    }

    fn errors(req: &Req, config: &ClaimConfigDocument) -> Vec<String> {
        collect_attribute_errors(req, config)
    }

    #[test]
    fn complete_correctly_typed_request_passes() {
        let config = doc(vec![Step::new("Details")
            .with_field(text("location").required())
            .with_field(FieldDefinition::new("damage", FieldType::Number).required())
            .with_field(FieldDefinition::new("kind", FieldType::Select).required().with_options(["a", "b"]))]);
        let req = Req::default()
            .attr("location", "Main St")
            .attr("damage", 1200.0)
            .attr("kind", "b");
        assert!(validate_claim_attributes(&req, &config).is_ok());
    }

    #[test]
    fn unknown_attribute_is_reported_regardless_of_value() {
        let config = doc(vec![Step::new("Details").with_field(text("location"))]);
        let req = Req::default().attr("colour", "").attr("location", "x");
        assert_eq!(errors(&req, &config), vec!["Invalid attribute colour provided"]);
    }

    #[test]
    fn unknown_attributes_are_reported_in_request_order() {
        let config = doc(vec![Step::new("Details")]);
        let req: AttributeMap = serde_json::from_str(r#"{"zeta":"1","alpha":"2"}"#).unwrap();
        let req = Req {
            attributes: req,
            ..Req::default()
        };
        assert_eq!(
            errors(&req, &config),
            vec!["Invalid attribute zeta provided", "Invalid attribute alpha provided"]
        );
    }

    #[test]
    fn fixed_field_keys_are_not_valid_attributes() {
        let config = doc(vec![
            Step::new("Claim").fixed().with_field(text("incidentType")),
            Step::new("Details").with_field(text("location")),
        ]);
        let req = Req::default().attr("incidentType", "theft");
        assert_eq!(
            errors(&req, &config),
            vec!["Invalid attribute incidentType provided"]
        );
    }

    #[test]
    fn missing_null_or_empty_required_attribute_is_reported() {
        let config = doc(vec![Step::new("Details").with_field(text("location").required())]);
        for req in [
            Req::default(),
            Req::default().attr("location", AttributeValue::Null),
            Req::default().attr("location", ""),
        ] {
            let errs = errors(&req, &config);
            assert_eq!(errs[0], "Attribute location is required");
            assert!(errs.iter().all(|e| e.contains("location")));
        }
    }

    #[test]
    fn absent_required_text_also_fails_the_type_check() {
        let config = doc(vec![Step::new("Details").with_field(text("location").required())]);
        assert_eq!(
            errors(&Req::default(), &config),
            vec![
                "Attribute location is required",
                "Attribute location must be of type string"
            ]
        );
        // an empty string is the right type, only the required check fires
        let req = Req::default().attr("location", "");
        assert_eq!(errors(&req, &config), vec!["Attribute location is required"]);
    }

    #[test]
    fn select_value_outside_options_is_reported() {
        let config = doc(vec![Step::new("Details").with_field(
            FieldDefinition::new("kind", FieldType::Select).with_options(["a", "b"]),
        )]);
        assert_eq!(
            errors(&Req::default().attr("kind", "c"), &config),
            vec!["Attribute kind options are a, b passed value is invalid"]
        );
        assert!(errors(&Req::default().attr("kind", "a"), &config).is_empty());
        assert!(errors(&Req::default().attr("kind", "b"), &config).is_empty());
        // falsy values skip the membership check
        assert!(errors(&Req::default().attr("kind", ""), &config).is_empty());
    }

    #[test]
    fn select_membership_is_exact() {
        let config = doc(vec![Step::new("Details").with_field(
            FieldDefinition::new("count", FieldType::Select).with_options(["1", "2"]),
        )]);
        assert_eq!(errors(&Req::default().attr("count", 1.0), &config).len(), 1);
        assert_eq!(errors(&Req::default().attr("count", "A"), &config).len(), 1);
    }

    #[test]
    fn number_fields_accept_numeric_strings() {
        let config = doc(vec![Step::new("Details")
            .with_field(FieldDefinition::new("damage", FieldType::Number).required())]);
        assert!(errors(&Req::default().attr("damage", "1200.50"), &config).is_empty());
        // unparseable text becomes NaN, which still has the number type
        assert!(errors(&Req::default().attr("damage", "lots"), &config).is_empty());
        assert_eq!(
            errors(&Req::default().attr("damage", true), &config),
            vec!["Attribute damage must be of type number"]
        );
    }

    #[test]
    fn optional_fields_of_the_wrong_type_are_tolerated() {
        let config = doc(vec![Step::new("Details")
            .with_field(text("note"))
            .with_field(FieldDefinition::new("damage", FieldType::Number))]);
        let req = Req::default().attr("note", 5.0).attr("damage", false);
        assert!(errors(&req, &config).is_empty());
    }

    #[test]
    fn required_text_field_rejects_numbers() {
        let config = doc(vec![Step::new("Details").with_field(text("note").required())]);
        assert_eq!(
            errors(&Req::default().attr("note", 5.0), &config),
            vec!["Attribute note must be of type string"]
        );
    }

    #[test]
    fn dependency_flags_value_when_condition_unmet() {
        let config = doc(vec![Step::new("Details")
            .with_field(text("A"))
            .with_field(text("B").depends_on("A", "yes"))]);

        let req = Req::default().attr("A", "no").attr("B", "x");
        assert_eq!(
            errors(&req, &config),
            vec!["Attribute B depends on A being yes"]
        );

        let req = Req::default().attr("A", "yes").attr("B", "x");
        assert!(errors(&req, &config).is_empty());

        // not enforced the other way round: condition met, B omitted
        let req = Req::default().attr("A", "no");
        assert!(errors(&req, &config).is_empty());
        let req = Req::default().attr("A", "yes");
        assert!(errors(&req, &config).is_empty());
    }

    #[test]
    fn dependency_comparison_is_loose() {
        let config = doc(vec![Step::new("Details")
            .with_field(FieldDefinition::new("count", FieldType::Number))
            .with_field(text("detail").depends_on("count", "2"))]);
        let req = Req::default().attr("count", 2.0).attr("detail", "x");
        assert!(errors(&req, &config).is_empty());
        let req = Req::default().attr("count", 3.0).attr("detail", "x");
        assert_eq!(errors(&req, &config).len(), 1);
    }

    #[test]
    fn number_that_fails_to_parse_skips_the_dependency_check() {
        let config = doc(vec![Step::new("Details")
            .with_field(text("A"))
            .with_field(FieldDefinition::new("n", FieldType::Number).depends_on("A", "yes"))]);
        let req = Req::default().attr("A", "no").attr("n", "not a number");
        assert!(errors(&req, &config).is_empty());
        let req = Req::default().attr("A", "no").attr("n", "4");
        assert_eq!(errors(&req, &config), vec!["Attribute n depends on A being yes"]);
    }

    #[test]
    fn fixed_required_fields_exempt_policy_id() {
        let config = doc(vec![
            Step::new("Claim")
                .fixed()
                .with_field(text("policyId").required())
                .with_field(text("region").required()),
            Step::new("Details").with_field(text("incidentType").required()),
        ]);
        let req = Req::default()
            .top("policyId", "")
            .top("region", "")
            .attr("incidentType", "theft");
        assert_eq!(errors(&req, &config), vec!["Attribute region is required"]);

        let req = Req::default()
            .top("region", "north")
            .attr("incidentType", "theft");
        assert!(errors(&req, &config).is_empty());
    }

    #[test]
    fn fixed_select_checks_stringified_value() {
        let config = doc(vec![Step::new("Claim").fixed().with_field(
            FieldDefinition::new("status", FieldType::Select).with_options(["OPEN", "CLOSED"]),
        )]);
        assert!(errors(&Req::default().top("status", "OPEN"), &config).is_empty());
        assert!(errors(&Req::default(), &config).is_empty());
        assert_eq!(
            errors(&Req::default().top("status", "IN_REVIEW"), &config),
            vec!["Attribute status options are OPEN, CLOSED passed value IN_REVIEW is invalid"]
        );

        let config = doc(vec![Step::new("Claim").fixed().with_field(
            FieldDefinition::new("tier", FieldType::Select).with_options(["1", "2"]),
        )]);
        assert!(errors(&Req::default().top("tier", 2.0), &config).is_empty());
        // empty strings are still a value for the fixed select check
        assert_eq!(
            errors(&Req::default().top("tier", ""), &config),
            vec!["Attribute tier options are 1, 2 passed value  is invalid"]
        );
    }

    #[test]
    fn errors_follow_check_order_and_field_ordering() {
        let config = doc(vec![
            Step::new("Claim").fixed().with_field(text("region").required()),
            Step::new("Details")
                .with_field(text("second").required().ordered(2))
                .with_field(text("first").required().ordered(1)),
        ]);
        let req = Req::default().attr("zzz", "1").attr("first", "").attr("second", "");
        assert_eq!(
            errors(&req, &config),
            vec![
                "Invalid attribute zzz provided",
                "Attribute region is required",
                "Attribute first is required",
                "Attribute second is required",
            ]
        );
    }

    #[test]
    fn aggregate_error_carries_every_message() {
        let config = doc(vec![Step::new("Details").with_field(text("location").required())]);
        let req = Req::default().attr("bogus", "1").attr("location", "");
        let err = validate_claim_attributes(&req, &config).unwrap_err();
        assert_eq!(err.code().as_str(), "INVALID_ARGUMENT");
        assert_eq!(
            err.to_string(),
            "Invalid claim attributes:\nInvalid attribute bogus provided\nAttribute location is required"
        );
    }

    #[test]
    fn empty_config_rejects_every_attribute() {
        let req = Req::default().attr("anything", "x");
        assert_eq!(
            errors(&req, &ClaimConfigDocument::default()),
            vec!["Invalid attribute anything provided"]
        );
        assert!(errors(&Req::default(), &ClaimConfigDocument::default()).is_empty());
    }
}
