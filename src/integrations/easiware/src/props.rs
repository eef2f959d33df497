//! Typed input properties
//!
//! Every action and trigger declares an ordered list of [`Property`] values.
//! The host hands back a loose JSON object; [`PropsValue::resolve`] checks it
//! against the declaration and keeps only the fields that were actually set,
//! in declaration order. Request builders only ever see the resolved bag.

use crate::error::{PieceError, PieceResult};
use crate::utils::{JsonUtils, StringUtils};
use serde::Serialize;
use serde_json::{Map, Value};

/// One selectable entry of a static dropdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropdownOption {
    pub label: String,
    pub value: String,
}

impl DropdownOption {
    pub fn new<L: Into<String>, V: Into<String>>(label: L, value: V) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Build dropdown options from `(label, value)` pairs
pub fn options(pairs: &[(&str, &str)]) -> Vec<DropdownOption> {
    pairs
        .iter()
        .map(|(label, value)| DropdownOption::new(*label, *value))
        .collect()
}

/// Input widget kind as understood by the host
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyKind {
    ShortText,
    LongText,
    DateTime,
    Checkbox,
    Json,
    StaticDropdown { options: Vec<DropdownOption> },
    StaticMultiSelectDropdown { options: Vec<DropdownOption> },
}

/// Declaration of a single input field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub name: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(flatten)]
    pub kind: PropertyKind,
}

impl Property {
    fn new<N: Into<String>, D: Into<String>>(name: N, display_name: D, kind: PropertyKind) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            description: None,
            required: false,
            default_value: None,
            kind,
        }
    }

    pub fn short_text<N: Into<String>, D: Into<String>>(name: N, display_name: D) -> Self {
        Self::new(name, display_name, PropertyKind::ShortText)
    }

    pub fn long_text<N: Into<String>, D: Into<String>>(name: N, display_name: D) -> Self {
        Self::new(name, display_name, PropertyKind::LongText)
    }

    pub fn date_time<N: Into<String>, D: Into<String>>(name: N, display_name: D) -> Self {
        Self::new(name, display_name, PropertyKind::DateTime)
    }

    pub fn checkbox<N: Into<String>, D: Into<String>>(name: N, display_name: D) -> Self {
        Self::new(name, display_name, PropertyKind::Checkbox)
    }

    pub fn json<N: Into<String>, D: Into<String>>(name: N, display_name: D) -> Self {
        Self::new(name, display_name, PropertyKind::Json)
    }

    pub fn static_dropdown<N: Into<String>, D: Into<String>>(
        name: N,
        display_name: D,
        options: Vec<DropdownOption>,
    ) -> Self {
        Self::new(name, display_name, PropertyKind::StaticDropdown { options })
    }

    pub fn static_multi_select<N: Into<String>, D: Into<String>>(
        name: N,
        display_name: D,
        options: Vec<DropdownOption>,
    ) -> Self {
        Self::new(
            name,
            display_name,
            PropertyKind::StaticMultiSelectDropdown { options },
        )
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Check a present value against the declared kind
    fn check(&self, value: &Value) -> PieceResult<()> {
        match &self.kind {
            PropertyKind::ShortText | PropertyKind::LongText | PropertyKind::DateTime => {
                match value {
                    Value::String(_) | Value::Number(_) | Value::Bool(_) => Ok(()),
                    _ => Err(PieceError::validation(&self.name, "Expected a text value")),
                }
            }
            PropertyKind::Checkbox => match value {
                Value::Bool(_) => Ok(()),
                _ => Err(PieceError::validation(&self.name, "Expected a boolean")),
            },
            PropertyKind::Json => Ok(()),
            PropertyKind::StaticDropdown { options } => {
                let selected = value
                    .as_str()
                    .ok_or_else(|| PieceError::validation(&self.name, "Expected a string"))?;
                self.check_option(options, selected)
            }
            PropertyKind::StaticMultiSelectDropdown { options } => {
                let items = value
                    .as_array()
                    .ok_or_else(|| PieceError::validation(&self.name, "Expected a list"))?;
                for item in items {
                    let selected = item.as_str().ok_or_else(|| {
                        PieceError::validation(&self.name, "Expected a list of strings")
                    })?;
                    self.check_option(options, selected)?;
                }
                Ok(())
            }
        }
    }

    fn check_option(&self, options: &[DropdownOption], selected: &str) -> PieceResult<()> {
        if options.iter().any(|option| option.value == selected) {
            Ok(())
        } else {
            Err(PieceError::validation(
                &self.name,
                format!("'{}' is not one of the allowed values", selected),
            ))
        }
    }
}

/// Resolved input values, in declaration order, holding only supplied fields
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PropsValue(Map<String, Value>);

impl PropsValue {
    /// Resolve raw host input against a property schema.
    ///
    /// Undeclared keys are dropped. Null and `""` count as absent; an absent
    /// field takes its declared default, and a required field that is still
    /// absent is rejected.
    pub fn resolve(schema: &[Property], raw: &Map<String, Value>) -> PieceResult<Self> {
        let mut values = Map::new();

        for property in schema {
            let supplied = raw
                .get(&property.name)
                .filter(|value| JsonUtils::is_present(value))
                .cloned()
                .or_else(|| property.default_value.clone());

            match supplied {
                Some(value) => {
                    property.check(&value)?;
                    values.insert(property.name.clone(), value);
                }
                None if property.required => {
                    return Err(PieceError::validation(
                        &property.name,
                        "Required property is missing",
                    ));
                }
                None => {}
            }
        }

        Ok(Self(values))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Text rendition of a scalar field
    pub fn text(&self, name: &str) -> Option<String> {
        self.get(name).map(JsonUtils::to_query_value)
    }

    pub fn require_text(&self, name: &str) -> PieceResult<String> {
        self.text(name)
            .ok_or_else(|| PieceError::validation(name, "Required property is missing"))
    }

    /// Checkbox state; unset counts as unchecked
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.get(name), Some(Value::Bool(true)))
    }

    /// Every option picked in a multi-select, empty when nothing was picked
    pub fn selections(&self, name: &str) -> Vec<String> {
        self.get(name)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Comma-separated field as a list of trimmed, non-empty tokens
    pub fn csv(&self, name: &str) -> Vec<String> {
        self.text(name)
            .map(|raw| StringUtils::split_csv(&raw))
            .unwrap_or_default()
    }

    /// JSON object field, only when it holds at least one key
    pub fn object(&self, name: &str) -> Option<&Map<String, Value>> {
        self.get(name).and_then(JsonUtils::non_empty_object)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
