//! Feature vector encoding
//!
//! Translates an untyped JSON request into the flat numeric vector the
//! model was trained on: numeric fields go into their dedicated slots and
//! each categorical value switches on the indicator column of the same
//! name. A categorical value with no matching column leaves every indicator
//! off, which the model reads as the baseline category.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    error::{PredictError, Result},
    schema::FeatureSchema,
};

/// Categorical request field encoded as a one-hot indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoricalField {
    /// Neighbourhood / site location
    Locality,
    /// Area type, e.g. "Super built-up Area"
    PropertyType,
    /// Availability, e.g. "Ready To Move"
    Availability,
}

impl CategoricalField {
    /// All categorical fields in encoding order
    pub const ALL: [Self; 3] = [Self::Locality, Self::PropertyType, Self::Availability];

    /// JSON key this field is read from
    #[must_use]
    pub fn request_key(self) -> &'static str {
        match self {
            Self::Locality => "locality",
            Self::PropertyType => "property_type",
            Self::Availability => "availability",
        }
    }
}

/// Fixed-width model input for one prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    /// All-zero vector of width `len`
    #[must_use]
    pub fn zeros(len: usize) -> Self {
        Self(vec![0.0; len])
    }

    /// Vector width
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for a zero-width vector
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw values
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

/// Encode a request payload against `schema`
///
/// # Errors
///
/// - [`PredictError::InvalidPayload`] if `payload` is not a JSON object
/// - [`PredictError::MissingField`] if any numeric or categorical key is absent
/// - [`PredictError::InvalidField`] if a numeric value is not a finite number
pub fn encode(schema: &FeatureSchema, payload: &Value) -> Result<FeatureVector> {
    let object = payload.as_object().ok_or_else(|| {
        PredictError::InvalidPayload(format!("expected a JSON object, got {}", kind_of(payload)))
    })?;

    let mut features = FeatureVector::zeros(schema.len());

    for slot in schema.numeric_slots() {
        features.0[slot.index] = numeric_value(object, slot.field.request_key())?;
    }

    for field in CategoricalField::ALL {
        let key = field.request_key();
        let value = object
            .get(key)
            .ok_or_else(|| PredictError::MissingField(key.to_string()))?;

        let Some(category) = value.as_str() else {
            tracing::debug!(field = key, "Non-string categorical value treated as unmatched");
            continue;
        };

        match schema.indicator_index(category) {
            Some(index) => features.0[index] = 1.0,
            None => tracing::debug!(field = key, value = category, "Unknown category"),
        }
    }

    Ok(features)
}

fn numeric_value(object: &Map<String, Value>, key: &str) -> Result<f64> {
    let value = object
        .get(key)
        .ok_or_else(|| PredictError::MissingField(key.to_string()))?;

    let number = match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| PredictError::invalid_field(key, "number out of range"))?,
        // Form-backed clients post numbers as strings.
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| PredictError::invalid_field(key, format!("'{s}' is not a number")))?,
        other => {
            return Err(PredictError::invalid_field(
                key,
                format!("expected a number, got {}", kind_of(other)),
            ))
        },
    };

    if !number.is_finite() {
        return Err(PredictError::invalid_field(key, "value must be finite"));
    }
    Ok(number)
}

fn kind_of(value: &Value) -> &'static str {
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
    use serde_json::json;

    use super::*;
    use crate::schema::NumericColumns;

    fn scenario_schema() -> FeatureSchema {
        let columns = [
            "bathrooms",
            "balcony",
            "rooms",
            "area",
            "Whitefield",
            "Apartment",
            "Ready To Move",
        ]
        .map(String::from)
        .to_vec();
        FeatureSchema::from_columns(columns, &NumericColumns::default()).expect("schema")
    }

    fn scenario_request() -> Value {
        json!({
            "bathrooms": 2,
            "balcony": 1,
            "rooms": 3,
            "area": 1200,
            "locality": "Whitefield",
            "property_type": "Apartment",
            "availability": "Ready To Move"
        })
    }

    #[test]
    fn test_all_categories_matched() {
        let features = encode(&scenario_schema(), &scenario_request()).expect("encode");
        assert_eq!(
            features.as_slice(),
            &[2.0, 1.0, 3.0, 1200.0, 1.0, 1.0, 1.0]
        );
    }

    #[test]
    fn test_unknown_locality_leaves_indicator_off() {
        let mut request = scenario_request();
        request["locality"] = json!("Unknown Area");

        let features = encode(&scenario_schema(), &request).expect("encode");
        assert_eq!(
            features.as_slice(),
            &[2.0, 1.0, 3.0, 1200.0, 0.0, 1.0, 1.0]
        );
    }

    #[test]
    fn test_category_named_like_numeric_column_is_ignored() {
        let mut request = scenario_request();
        request["locality"] = json!("area");

        let features = encode(&scenario_schema(), &request).expect("encode");
        assert_eq!(features.as_slice()[3], 1200.0);
        assert_eq!(features.as_slice()[4], 0.0);
    }

    #[test]
    fn test_missing_numeric_field() {
        let mut request = scenario_request();
        request.as_object_mut().expect("object").remove("area");

        let err = encode(&scenario_schema(), &request).unwrap_err();
        assert!(matches!(err, PredictError::MissingField(ref k) if k == "area"));
    }

    #[test]
    fn test_missing_categorical_field() {
        let mut request = scenario_request();
        request.as_object_mut().expect("object").remove("availability");

        let err = encode(&scenario_schema(), &request).unwrap_err();
        assert!(matches!(err, PredictError::MissingField(ref k) if k == "availability"));
    }

    #[test]
    fn test_numeric_string_accepted() {
        let mut request = scenario_request();
        request["area"] = json!(" 1450.5 ");

        let features = encode(&scenario_schema(), &request).expect("encode");
        assert_eq!(features.as_slice()[3], 1450.5);
    }

    #[test]
    fn test_non_numeric_string_rejected() {
        let mut request = scenario_request();
        request["rooms"] = json!("three");

        let err = encode(&scenario_schema(), &request).unwrap_err();
        assert!(err.to_string().contains("'three' is not a number"));
    }

    #[test]
    fn test_null_numeric_rejected() {
        let mut request = scenario_request();
        request["balcony"] = Value::Null;

        let err = encode(&scenario_schema(), &request).unwrap_err();
        assert!(matches!(err, PredictError::InvalidField { ref field, .. } if field == "balcony"));
    }

    #[test]
    fn test_boolean_numeric_rejected() {
        let mut request = scenario_request();
        request["balcony"] = json!(true);

        let err = encode(&scenario_schema(), &request).unwrap_err();
        assert!(err.to_string().contains("a boolean"));
    }

    #[test]
    fn test_non_finite_string_rejected() {
        let mut request = scenario_request();
        request["area"] = json!("inf");

        let err = encode(&scenario_schema(), &request).unwrap_err();
        assert!(err.to_string().contains("finite"));
    }

    #[test]
    fn test_non_string_category_is_unmatched() {
        let mut request = scenario_request();
        request["property_type"] = json!(5);

        let features = encode(&scenario_schema(), &request).expect("encode");
        assert_eq!(features.as_slice()[5], 0.0);
    }

    #[test]
    fn test_non_object_payload_rejected() {
        let err = encode(&scenario_schema(), &json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, PredictError::InvalidPayload(_)));
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_extra_keys_ignored() {
        let mut request = scenario_request();
        request["address"] = json!("12 MG Road");

        let features = encode(&scenario_schema(), &request).expect("encode");
        assert_eq!(features.len(), 7);
    }
}
