use crate::errors::QueryError;
use crate::query::coder::{self, DateDecodingStrategy, QueryScalar, ScalarError};
use crate::query::filters::FilterValue;
use crate::query::QueryParams;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// Decodes a flat query representation into typed records.
///
/// Construct one from whichever form the transport hands over: an already
/// parsed dictionary, the query-string text, or its raw UTF-8 bytes. Keys
/// the target record does not ask for are ignored, so partial and extended
/// query strings decode cleanly.
pub struct QueryDecoder {
    dictionary: HashMap<String, String>,
}

impl QueryDecoder {
    /// Wraps an already parsed key/value mapping.
    pub fn from_dictionary(dictionary: HashMap<String, String>) -> Self {
        Self { dictionary }
    }

    /// Tokenizes a query string: `&`-separated `key=value` pairs, both
    /// sides percent-decoded, with an optional leading `?`. Tokens without
    /// an `=` and pairs that do not percent-decode are dropped.
    pub fn from_query_string(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let dictionary = query
            .split('&')
            .filter_map(|pair| {
                let (key, value) = pair.split_once('=')?;
                Some((
                    urlencoding::decode(key).ok()?.into_owned(),
                    urlencoding::decode(value).ok()?.into_owned(),
                ))
            })
            .collect();
        Self { dictionary }
    }

    /// Tokenizes the UTF-8 bytes of a query string (no leading `?`).
    pub fn from_bytes(data: &[u8]) -> Result<Self, QueryError> {
        let query = std::str::from_utf8(data)?;
        Ok(Self::from_query_string(query))
    }

    /// Decodes a record of type `T`, using `T`'s date-decoding strategy
    /// for its date fields.
    pub fn decode<T: QueryParams>(&self) -> Result<T, QueryError> {
        let reader = FieldReader {
            dictionary: &self.dictionary,
            dates: T::date_decoding_strategy(),
        };
        T::decode(&reader)
    }
}

/// Field-by-field view over the query dictionary handed to a record's
/// [`QueryParams::decode`] impl.
///
/// Required getters error on an absent key; `*_optional` getters answer
/// `None` instead. Every conversion failure names the field and echoes the
/// raw string.
pub struct FieldReader<'a> {
    dictionary: &'a HashMap<String, String>,
    dates: DateDecodingStrategy,
}

impl<'a> FieldReader<'a> {
    fn raw(&self, field: &str) -> Result<&'a str, QueryError> {
        self.dictionary
            .get(field)
            .map(String::as_str)
            .ok_or_else(|| QueryError::MissingField {
                field: field.to_string(),
            })
    }

    fn raw_optional(&self, field: &str) -> Option<&'a str> {
        self.dictionary.get(field).map(String::as_str)
    }

    /// Reads a required scalar field.
    pub fn get<T: QueryScalar>(&self, field: &str) -> Result<T, QueryError> {
        scalar(field, self.raw(field)?)
    }

    /// Reads an optional scalar field. An absent key is `None`; a present
    /// key decodes as the inner kind and propagates its errors.
    pub fn get_optional<T: QueryScalar>(&self, field: &str) -> Result<Option<T>, QueryError> {
        self.raw_optional(field)
            .map(|raw| scalar(field, raw))
            .transpose()
    }

    /// Reads a required comma-separated array field. Any bad element fails
    /// the whole field.
    pub fn get_array<T: QueryScalar>(&self, field: &str) -> Result<Vec<T>, QueryError> {
        array(field, self.raw(field)?)
    }

    /// Reads an optional comma-separated array field.
    pub fn get_optional_array<T: QueryScalar>(
        &self,
        field: &str,
    ) -> Result<Option<Vec<T>>, QueryError> {
        self.raw_optional(field)
            .map(|raw| array(field, raw))
            .transpose()
    }

    /// Reads a required date field with the record's decoding strategy.
    pub fn get_date(&self, field: &str) -> Result<DateTime<Utc>, QueryError> {
        self.date(field, self.raw(field)?)
    }

    /// Reads an optional date field.
    pub fn get_optional_date(&self, field: &str) -> Result<Option<DateTime<Utc>>, QueryError> {
        self.raw_optional(field)
            .map(|raw| self.date(field, raw))
            .transpose()
    }

    /// Reads a required comma-separated array of dates. The strategy,
    /// including a custom one, applies to each element in turn.
    pub fn get_date_array(&self, field: &str) -> Result<Vec<DateTime<Utc>>, QueryError> {
        self.date_array(field, self.raw(field)?)
    }

    /// Reads an optional comma-separated array of dates.
    pub fn get_optional_date_array(
        &self,
        field: &str,
    ) -> Result<Option<Vec<DateTime<Utc>>>, QueryError> {
        self.raw_optional(field)
            .map(|raw| self.date_array(field, raw))
            .transpose()
    }

    /// Reads a required nested value carried as a JSON object string.
    pub fn get_nested<T: DeserializeOwned>(&self, field: &str) -> Result<T, QueryError> {
        nested(field, self.raw(field)?)
    }

    /// Reads an optional nested value.
    pub fn get_optional_nested<T: DeserializeOwned>(
        &self,
        field: &str,
    ) -> Result<Option<T>, QueryError> {
        self.raw_optional(field)
            .map(|raw| nested(field, raw))
            .transpose()
    }

    /// Reads a required filter field.
    pub fn get_filter<F: FilterValue>(&self, field: &str) -> Result<F, QueryError> {
        filter(field, self.raw(field)?)
    }

    /// Reads an optional filter field.
    pub fn get_optional_filter<F: FilterValue>(
        &self,
        field: &str,
    ) -> Result<Option<F>, QueryError> {
        self.raw_optional(field)
            .map(|raw| filter(field, raw))
            .transpose()
    }

    fn date(&self, field: &str, raw: &str) -> Result<DateTime<Utc>, QueryError> {
        coder::parse_date(raw, self.dates).ok_or_else(|| QueryError::InvalidValue {
            field: field.to_string(),
            raw: raw.to_string(),
            kind: "date",
        })
    }

    fn date_array(&self, field: &str, raw: &str) -> Result<Vec<DateTime<Utc>>, QueryError> {
        raw.split(',').map(|part| self.date(field, part)).collect()
    }
}

fn scalar<T: QueryScalar>(field: &str, raw: &str) -> Result<T, QueryError> {
    T::from_query_value(raw).map_err(|error| match error {
        ScalarError::OutOfRange => QueryError::OutOfRange {
            field: field.to_string(),
            raw: raw.to_string(),
            kind: T::KIND,
        },
        ScalarError::Invalid => QueryError::InvalidValue {
            field: field.to_string(),
            raw: raw.to_string(),
            kind: T::KIND,
        },
    })
}

fn array<T: QueryScalar>(field: &str, raw: &str) -> Result<Vec<T>, QueryError> {
    raw.split(',').map(|part| scalar(field, part)).collect()
}

fn nested<T: DeserializeOwned>(field: &str, raw: &str) -> Result<T, QueryError> {
    serde_json::from_str(raw).map_err(|source| QueryError::JsonDecoding {
        field: field.to_string(),
        source,
    })
}

fn filter<F: FilterValue>(field: &str, raw: &str) -> Result<F, QueryError> {
    F::from_query_value(raw).map_err(|error| match error {
        ScalarError::OutOfRange => QueryError::OutOfRange {
            field: field.to_string(),
            raw: raw.to_string(),
            kind: F::KIND,
        },
        ScalarError::Invalid => QueryError::MalformedFilter {
            field: field.to_string(),
            raw: raw.to_string(),
            kind: F::KIND,
        },
    })
}
