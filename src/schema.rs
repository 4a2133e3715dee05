//! Feature schema: the training-time column layout
//!
//! The schema is the ordered list of column names the model was trained on.
//! At load time it is partitioned into two kinds of slot:
//!
//! - **numeric slots** for `bathrooms`, `balcony`, `rooms` and `area`,
//!   located by column name rather than by position;
//! - **category indicators**, one per remaining column, whose name is the
//!   categorical value (a locality, property type or availability string)
//!   that switches the slot on.
//!
//! ## Example
//!
//! ```rust
//! use house_price::schema::{FeatureSchema, NumericColumns};
//!
//! let columns = ["bathrooms", "balcony", "rooms", "area", "Whitefield"]
//!     .map(String::from)
//!     .to_vec();
//! let schema = FeatureSchema::from_columns(columns, &NumericColumns::default()).unwrap();
//!
//! assert_eq!(schema.len(), 5);
//! assert_eq!(schema.indicator_index("Whitefield"), Some(4));
//! assert_eq!(schema.indicator_index("area"), None);
//! ```

use std::{collections::HashMap, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{PredictError, Result};

/// Numeric request field with a dedicated schema slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericField {
    /// Number of bathrooms
    Bathrooms,
    /// Number of balconies
    Balcony,
    /// Number of rooms (BHK)
    Rooms,
    /// Built-up area in square feet
    Area,
}

impl NumericField {
    /// All numeric fields in conventional column order
    pub const ALL: [Self; 4] = [Self::Bathrooms, Self::Balcony, Self::Rooms, Self::Area];

    /// JSON key this field is read from
    #[must_use]
    pub fn request_key(self) -> &'static str {
        match self {
            Self::Bathrooms => "bathrooms",
            Self::Balcony => "balcony",
            Self::Rooms => "rooms",
            Self::Area => "area",
        }
    }
}

/// Schema column names backing each numeric field
///
/// Defaults to the request key names, which is what the training pipeline
/// emits. Override when a model was trained with different column labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericColumns {
    /// Column for `bathrooms`
    pub bathrooms: String,
    /// Column for `balcony`
    pub balcony: String,
    /// Column for `rooms`
    pub rooms: String,
    /// Column for `area`
    pub area: String,
}

impl Default for NumericColumns {
    fn default() -> Self {
        Self {
            bathrooms: "bathrooms".to_string(),
            balcony: "balcony".to_string(),
            rooms: "rooms".to_string(),
            area: "area".to_string(),
        }
    }
}

impl NumericColumns {
    /// Column name configured for `field`
    #[must_use]
    pub fn column(&self, field: NumericField) -> &str {
        match field {
            NumericField::Bathrooms => &self.bathrooms,
            NumericField::Balcony => &self.balcony,
            NumericField::Rooms => &self.rooms,
            NumericField::Area => &self.area,
        }
    }
}

/// A numeric field bound to its schema position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericSlot {
    /// Request field feeding this slot
    pub field: NumericField,
    /// Schema column name
    pub column: String,
    /// Position in the feature vector
    pub index: usize,
}

/// Immutable, partitioned feature schema
#[derive(Debug, Clone)]
pub struct FeatureSchema {
    columns: Vec<String>,
    numeric: Vec<NumericSlot>,
    indicators: HashMap<String, usize>,
}

impl FeatureSchema {
    /// Partition a raw column list into numeric slots and category indicators
    ///
    /// # Errors
    ///
    /// Returns [`PredictError::InvalidSchema`] if the list is empty, if a
    /// configured numeric column is absent, or if two numeric fields are
    /// configured to the same column.
    pub fn from_columns(columns: Vec<String>, numeric_columns: &NumericColumns) -> Result<Self> {
        if columns.is_empty() {
            return Err(PredictError::InvalidSchema(
                "column list is empty".to_string(),
            ));
        }

        let mut numeric = Vec::with_capacity(NumericField::ALL.len());
        for field in NumericField::ALL {
            let column = numeric_columns.column(field);
            let index = columns.iter().position(|c| c == column).ok_or_else(|| {
                PredictError::InvalidSchema(format!(
                    "numeric column '{column}' for '{}' not found",
                    field.request_key()
                ))
            })?;
            if let Some(taken) = numeric.iter().find(|s: &&NumericSlot| s.index == index) {
                return Err(PredictError::InvalidSchema(format!(
                    "column '{column}' is mapped to both '{}' and '{}'",
                    taken.field.request_key(),
                    field.request_key()
                )));
            }
            numeric.push(NumericSlot {
                field,
                column: column.to_string(),
                index,
            });
        }

        let mut indicators = HashMap::with_capacity(columns.len() - numeric.len());
        for (index, name) in columns.iter().enumerate() {
            if numeric.iter().any(|s| s.index == index) {
                continue;
            }
            if indicators.contains_key(name) {
                // First occurrence wins.
                tracing::warn!(column = %name, index, "Duplicate schema column ignored");
                continue;
            }
            indicators.insert(name.clone(), index);
        }

        let conventional = numeric.iter().enumerate().all(|(i, s)| s.index == i);
        if !conventional {
            tracing::debug!("Numeric columns are not in the first four positions");
        }

        Ok(Self {
            columns,
            numeric,
            indicators,
        })
    }

    /// Load a JSON array of column names from `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a JSON array of
    /// strings, or fails [`FeatureSchema::from_columns`].
    pub fn load(path: &Path, numeric_columns: &NumericColumns) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| PredictError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let columns: Vec<String> =
            serde_json::from_str(&text).map_err(|e| PredictError::ArtifactParse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let schema = Self::from_columns(columns, numeric_columns)?;
        tracing::info!(
            path = %path.display(),
            columns = schema.len(),
            indicators = schema.indicator_count(),
            "Loaded feature schema"
        );
        Ok(schema)
    }

    /// Feature vector width
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Always false for a loaded schema
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names in training order
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Numeric slots in [`NumericField::ALL`] order
    #[must_use]
    pub fn numeric_slots(&self) -> &[NumericSlot] {
        &self.numeric
    }

    /// Position of the indicator column named `value`, if any
    #[must_use]
    pub fn indicator_index(&self, value: &str) -> Option<usize> {
        self.indicators.get(value).copied()
    }

    /// Number of category indicator columns
    #[must_use]
    pub fn indicator_count(&self) -> usize {
        self.indicators.len()
    }
}
