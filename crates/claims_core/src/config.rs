//! Claim configuration document: the editable runtime schema that decides
//! which attributes a claim may carry.
//!
//! The document is a list of steps; every step maps field keys to field
//! definitions. Field order inside a step is the order the keys appear in the
//! JSON object, which is what `orderingNumber` ties fall back to.

use serde::{Deserialize, Serialize};

use crate::ordered_map::OrderedMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

/// Names another field and the exact value it must hold for this one to apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependsOn {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    Text,
    Number,
    Select,
    Checkbox,
    Radio,
    Date,
    DatetimeLocal,
    Email,
    Textarea,
    Time,
}

impl FieldType {
    /// Primitive type a value must have for this field, where one is enforced.
    pub fn expected_primitive(self) -> Option<&'static str> {
        match self {
            Self::Text => Some("string"),
            Self::Number => Some("number"),
            _ => None,
        }
    }

    pub fn has_options(self) -> bool {
        matches!(self, Self::Select | Self::Radio)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub options: Vec<FieldOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    /// Carried through the schema but never evaluated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordering_number: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<DependsOn>,
}

impl FieldDefinition {
    pub fn new(key: impl Into<String>, field_type: FieldType) -> Self {
        let key = key.into();
        Self {
            label: key.clone(),
            key,
            field_type,
            options: Vec::new(),
            placeholder: None,
            required: false,
            validation: None,
            default_value: None,
            ordering_number: None,
            depends_on: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_options<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = values
            .into_iter()
            .map(|v| {
                let value = v.into();
                FieldOption {
                    label: value.clone(),
                    value,
                }
            })
            .collect();
        self
    }

    pub fn depends_on(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.depends_on = Some(DependsOn {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    pub fn ordered(mut self, ordering_number: i64) -> Self {
        self.ordering_number = Some(ordering_number);
        self
    }

    pub fn option_values(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.value.as_str()).collect()
    }
}

/// Field definitions of one step, keyed by field key, in the order the keys
/// appear in the document.
pub type FieldMap = OrderedMap<FieldDefinition>;

impl FromIterator<FieldDefinition> for FieldMap {
    fn from_iter<T: IntoIterator<Item = FieldDefinition>>(iter: T) -> Self {
        iter.into_iter().map(|f| (f.key.clone(), f)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub configs: FieldMap,
    /// Fields of a fixed step are top-level claim columns, not attributes.
    #[serde(default)]
    pub fixed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordering_number: Option<i64>,
}

impl Step {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            configs: FieldMap::new(),
            fixed: false,
            ordering_number: None,
        }
    }

    pub fn fixed(mut self) -> Self {
        self.fixed = true;
        self
    }

    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.configs.insert(field.key.clone(), field);
        self
    }

    pub fn ordered(mut self, ordering_number: i64) -> Self {
        self.ordering_number = Some(ordering_number);
        self
    }
}

/// The single, whole-document claim configuration. Updates replace it wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimConfigDocument {
    pub steps: Vec<Step>,
}

impl ClaimConfigDocument {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIRE: &str = r#"[
      {
        "title": "Incident",
        "description": "What happened",
        "orderingNumber": 2,
        "configs": {
          "vehicle": {"key": "vehicle", "label": "Vehicle", "type": "select",
                      "options": [{"value": "car", "label": "Car"}], "required": true},
          "plate": {"key": "plate", "label": "Plate", "type": "text", "options": [],
                    "dependsOn": {"key": "vehicle", "value": "car"}, "orderingNumber": 1},
          "when": {"key": "when", "label": "When", "type": "datetime-local", "options": []}
        }
      },
      {"title": "Claim", "fixed": true, "configs": {}}
    ]"#;

    #[test]
    fn parses_wire_shape_and_keeps_key_order() {
        let doc: ClaimConfigDocument = serde_json::from_str(WIRE).unwrap();
        assert_eq!(doc.steps.len(), 2);
        let step = &doc.steps[0];
        assert_eq!(step.ordering_number, Some(2));
        assert!(!step.fixed);
        assert_eq!(
            step.configs.keys().collect::<Vec<_>>(),
            vec!["vehicle", "plate", "when"]
        );
        let plate = step.configs.get("plate").unwrap();
        assert_eq!(plate.depends_on.as_ref().unwrap().value, "car");
        assert!(!plate.required);
        assert_eq!(
            step.configs.get("when").unwrap().field_type,
            FieldType::DatetimeLocal
        );
        assert!(doc.steps[1].fixed);
    }

    #[test]
    fn serializes_back_in_the_same_key_order() {
        let doc: ClaimConfigDocument = serde_json::from_str(WIRE).unwrap();
        let text = serde_json::to_string(&doc).unwrap();
        let vehicle = text.find("\"vehicle\":").unwrap();
        let plate = text.find("\"plate\":").unwrap();
        let when = text.find("\"when\":").unwrap();
        assert!(vehicle < plate && plate < when);
        assert!(text.contains("\"dependsOn\""));
        assert!(!text.contains("\"placeholder\""));
    }

    #[test]
    fn unknown_field_type_is_rejected() {
        let err = serde_json::from_str::<FieldDefinition>(
            r#"{"key":"k","label":"K","type":"color","options":[]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown variant"));
    }

    #[test]
    fn reinserting_a_key_replaces_in_place() {
        let mut map = FieldMap::new();
        map.insert("a".into(), FieldDefinition::new("a", FieldType::Text));
        map.insert("b".into(), FieldDefinition::new("b", FieldType::Text));
        let old = map.insert("a".into(), FieldDefinition::new("a", FieldType::Number));
        assert_eq!(old.unwrap().field_type, FieldType::Text);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(map.get("a").unwrap().field_type, FieldType::Number);
    }
}
