//! Schema-free documents.

use crate::error::{CoreError, CoreResult};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::borrow::Cow;
use std::time::{SystemTime, UNIX_EPOCH};

/// Identity key of a document, unique within its collection.
pub type DocumentId = i64;

/// Name of the identity field in the stored JSON.
pub const ID_FIELD: &str = "id";
/// Name of the optional expiry field in the stored JSON.
pub const EXPIRES_AT_FIELD: &str = "expiresAt";

/// Returns the current time in milliseconds since the Unix epoch.
#[must_use]
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
}

/// Converts a JSON number to `i64` if it is integral and in range.
///
/// Files written by other tools may store timestamps as `1.7e12`.
fn integral_number(n: &Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    let f = n.as_f64()?;
    // i64::MIN is exactly representable; i64::MAX + 1 is the first value out of range
    if f.fract() == 0.0 && f >= -9_223_372_036_854_775_808.0 && f < 9_223_372_036_854_775_808.0 {
        Some(f as i64)
    } else {
        None
    }
}

/// Converts a JSON value to `i64` if it is an integral number in range.
pub(crate) fn integral_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => integral_number(n),
        _ => None,
    }
}

fn deserialize_integral<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let n = Number::deserialize(deserializer)?;
    integral_number(&n)
        .ok_or_else(|| de::Error::custom(format!("expected an integral number, got {n}")))
}

fn deserialize_optional_integral<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Number>::deserialize(deserializer)? {
        None => Ok(None),
        Some(n) => integral_number(&n)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("expected an integral number, got {n}"))),
    }
}

/// One stored record.
///
/// A document has an integer `id`, an optional `expiresAt` timestamp in
/// milliseconds since the Unix epoch, and any number of additional fields
/// holding arbitrary JSON values. On disk it is a flat JSON object:
///
/// ```json
/// { "id": 1, "expiresAt": 1700000000000, "name": "Alice", "age": 25 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(deserialize_with = "deserialize_integral")]
    id: DocumentId,
    #[serde(
        rename = "expiresAt",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_integral"
    )]
    expires_at: Option<i64>,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl Document {
    /// Creates a document with the given id and no other fields.
    #[must_use]
    pub fn new(id: DocumentId) -> Self {
        Self {
            id,
            expires_at: None,
            fields: Map::new(),
        }
    }

    /// Builds a document from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDocument` if `value` is not an object, lacks an
    /// integer `id`, or has a non-integer `expiresAt`.
    pub fn from_value(value: Value) -> CoreResult<Self> {
        if !value.is_object() {
            return Err(CoreError::invalid_document("document must be a JSON object"));
        }
        serde_json::from_value(value).map_err(|e| CoreError::invalid_document(e.to_string()))
    }

    /// Converts the document into its JSON object form.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut map = Map::with_capacity(self.fields.len() + 2);
        map.insert(ID_FIELD.to_string(), Value::from(self.id));
        if let Some(ts) = self.expires_at {
            map.insert(EXPIRES_AT_FIELD.to_string(), Value::from(ts));
        }
        for (k, v) in &self.fields {
            map.insert(k.clone(), v.clone());
        }
        Value::Object(map)
    }

    /// Adds or replaces a field, builder style.
    ///
    /// `id` and `expiresAt` go to the typed fields when the value is an
    /// integral number (or `null`, for `expiresAt`). Any other value under
    /// a reserved name is kept as given and rejected by
    /// [`Document::validate`], so inserting such a document fails.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        let value = value.into();
        let routed = match (key.as_str(), integral_value(&value)) {
            (ID_FIELD, Some(id)) => {
                self.id = id;
                true
            }
            (EXPIRES_AT_FIELD, Some(ts)) => {
                self.expires_at = Some(ts);
                true
            }
            (EXPIRES_AT_FIELD, None) if value.is_null() => {
                self.expires_at = None;
                true
            }
            _ => false,
        };
        if !routed {
            self.fields.insert(key, value);
        }
        self
    }

    /// Checks that no extra field uses a reserved name.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDocument` if `id` or `expiresAt` appears among the
    /// extra fields, which would write a duplicate key to the file.
    pub fn validate(&self) -> CoreResult<()> {
        for reserved in [ID_FIELD, EXPIRES_AT_FIELD] {
            if let Some(value) = self.fields.get(reserved) {
                return Err(CoreError::invalid_document(format!(
                    "{reserved} must be an integral number, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Sets the expiry timestamp (epoch milliseconds), builder style.
    #[must_use]
    pub fn with_expiry(mut self, expires_at: i64) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Returns the document id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> DocumentId {
        self.id
    }

    /// Returns the expiry timestamp, if any.
    #[inline]
    #[must_use]
    pub fn expires_at(&self) -> Option<i64> {
        self.expires_at
    }

    /// Returns the additional fields (everything except `id` and `expiresAt`).
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Looks up a field by name.
    ///
    /// `id` and `expiresAt` resolve to their typed values, so queries can
    /// search, sort, and aggregate on them like any other field.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<Cow<'_, Value>> {
        match key {
            ID_FIELD => Some(Cow::Owned(Value::from(self.id))),
            EXPIRES_AT_FIELD => self.expires_at.map(|ts| Cow::Owned(Value::from(ts))),
            _ => self.fields.get(key).map(Cow::Borrowed),
        }
    }

    /// Returns whether the document is expired at `now` (epoch milliseconds).
    ///
    /// A document expires once `now` reaches `expiresAt`.
    #[inline]
    #[must_use]
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|ts| ts <= now)
    }

    /// Shallow-merges `patch` into this document.
    ///
    /// Patch fields overwrite same-named fields; other fields are kept.
    /// `expiresAt` is set by a number and cleared by `null`. An `id` equal
    /// to the current id is ignored.
    ///
    /// The patch is validated before anything is applied, so on error the
    /// document is unchanged.
    pub(crate) fn merge(&mut self, patch: Map<String, Value>) -> CoreResult<()> {
        if let Some(id) = patch.get(ID_FIELD) {
            if integral_value(id) != Some(self.id) {
                return Err(CoreError::invalid_document(format!(
                    "cannot change id of document {} to {id}",
                    self.id
                )));
            }
        }
        let expiry = match patch.get(EXPIRES_AT_FIELD) {
            None => None,
            Some(Value::Null) => Some(None),
            Some(v) => match integral_value(v) {
                Some(ts) => Some(Some(ts)),
                None => {
                    return Err(CoreError::invalid_document(format!(
                        "expiresAt must be an integer timestamp or null, got {v}"
                    )))
                }
            },
        };

        if let Some(expiry) = expiry {
            self.expires_at = expiry;
        }
        for (key, value) in patch {
            if key != ID_FIELD && key != EXPIRES_AT_FIELD {
                self.fields.insert(key, value);
            }
        }
        Ok(())
    }
}

impl TryFrom<Value> for Document {
    type Error = CoreError;

    fn try_from(value: Value) -> CoreResult<Self> {
        Self::from_value(value)
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        doc.to_value()
    }
}
