use crate::errors::QueryError;
use crate::query::coder::{self, DateEncodingStrategy, QueryScalar};
use crate::query::filters::FilterValue;
use crate::query::QueryParams;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Encodes typed records into flat query representations.
///
/// Output forms: a key/value dictionary, a `?`-prefixed query string, an
/// ordered name/value pair list for URL builders, or the raw UTF-8 bytes
/// of the query string. The string and byte forms percent-encode keys and
/// values; the dictionary and pair forms carry them raw.
#[derive(Default)]
pub struct QueryEncoder;

impl QueryEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Encodes a record to a key/value dictionary. Consumers must not rely
    /// on key order here; use the pair or string forms for stable order.
    pub fn encode<T: QueryParams>(&self, value: &T) -> Result<HashMap<String, String>, QueryError> {
        Ok(self.encode_to_pairs(value)?.into_iter().collect())
    }

    /// Encodes a record to name/value pairs in the order its schema emits
    /// fields.
    pub fn encode_to_pairs<T: QueryParams>(
        &self,
        value: &T,
    ) -> Result<Vec<(String, String)>, QueryError> {
        let mut writer = FieldWriter::new(T::date_encoding_strategy());
        value.encode(&mut writer)?;
        Ok(writer.pairs)
    }

    /// Encodes a record to a percent-encoded query string with a leading
    /// `?`.
    pub fn encode_to_string<T: QueryParams>(&self, value: &T) -> Result<String, QueryError> {
        Ok(format!("?{}", self.render(value)?))
    }

    /// Encodes a record to the UTF-8 bytes of the percent-encoded query
    /// string, without a leading `?`.
    pub fn encode_to_bytes<T: QueryParams>(&self, value: &T) -> Result<Vec<u8>, QueryError> {
        Ok(self.render(value)?.into_bytes())
    }

    fn render<T: QueryParams>(&self, value: &T) -> Result<String, QueryError> {
        let rendered = self
            .encode_to_pairs(value)?
            .iter()
            .map(|(key, value)| {
                format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
            })
            .collect::<Vec<_>>()
            .join("&");
        Ok(rendered)
    }
}

/// Field-by-field sink handed to a record's [`QueryParams::encode`] impl.
///
/// Emission order is output order for the pair, string and byte forms.
/// `put_optional*` with `None` emits nothing at all.
pub struct FieldWriter {
    pairs: Vec<(String, String)>,
    dates: DateEncodingStrategy,
}

impl FieldWriter {
    fn new(dates: DateEncodingStrategy) -> Self {
        Self {
            pairs: Vec::new(),
            dates,
        }
    }

    /// Emits a scalar field.
    pub fn put<T: QueryScalar>(&mut self, field: &str, value: &T) {
        self.pairs.push((field.to_string(), value.to_query_value()));
    }

    /// Emits an optional scalar field; `None` is omitted entirely.
    pub fn put_optional<T: QueryScalar>(&mut self, field: &str, value: &Option<T>) {
        if let Some(value) = value {
            self.put(field, value);
        }
    }

    /// Emits an array field as comma-joined element values.
    pub fn put_array<T: QueryScalar>(&mut self, field: &str, values: &[T]) {
        let joined = values
            .iter()
            .map(QueryScalar::to_query_value)
            .collect::<Vec<_>>()
            .join(",");
        self.pairs.push((field.to_string(), joined));
    }

    /// Emits an optional array field; `None` is omitted entirely.
    pub fn put_optional_array<T: QueryScalar>(&mut self, field: &str, values: &Option<Vec<T>>) {
        if let Some(values) = values {
            self.put_array(field, values);
        }
    }

    /// Emits a date field with the record's encoding strategy.
    pub fn put_date(&mut self, field: &str, date: &DateTime<Utc>) {
        self.pairs
            .push((field.to_string(), coder::format_date(date, self.dates)));
    }

    /// Emits an optional date field; `None` is omitted entirely.
    pub fn put_optional_date(&mut self, field: &str, date: &Option<DateTime<Utc>>) {
        if let Some(date) = date {
            self.put_date(field, date);
        }
    }

    /// Emits an array of dates, the strategy applied per element.
    pub fn put_date_array(&mut self, field: &str, dates: &[DateTime<Utc>]) {
        let strategy = self.dates;
        let joined = dates
            .iter()
            .map(|date| coder::format_date(date, strategy))
            .collect::<Vec<_>>()
            .join(",");
        self.pairs.push((field.to_string(), joined));
    }

    /// Emits an optional array of dates; `None` is omitted entirely.
    pub fn put_optional_date_array(&mut self, field: &str, dates: &Option<Vec<DateTime<Utc>>>) {
        if let Some(dates) = dates {
            self.put_date_array(field, dates);
        }
    }

    /// Emits a nested value as a JSON object string. Fails when the value
    /// is not representable as JSON.
    pub fn put_nested<T: Serialize>(&mut self, field: &str, value: &T) -> Result<(), QueryError> {
        let rendered =
            serde_json::to_string(value).map_err(|source| QueryError::JsonEncoding {
                field: field.to_string(),
                source,
            })?;
        self.pairs.push((field.to_string(), rendered));
        Ok(())
    }

    /// Emits an optional nested value; `None` is omitted entirely.
    pub fn put_optional_nested<T: Serialize>(
        &mut self,
        field: &str,
        value: &Option<T>,
    ) -> Result<(), QueryError> {
        match value {
            Some(value) => self.put_nested(field, value),
            None => Ok(()),
        }
    }

    /// Emits a filter field in its token grammar.
    pub fn put_filter<F: FilterValue>(&mut self, field: &str, value: &F) {
        self.pairs.push((field.to_string(), value.query_value()));
    }

    /// Emits an optional filter field; `None` is omitted entirely.
    pub fn put_optional_filter<F: FilterValue>(&mut self, field: &str, value: &Option<F>) {
        if let Some(value) = value {
            self.put_filter(field, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::decoder::{FieldReader, QueryDecoder};
    use crate::query::filters::{Order, Ordering};

    struct Sample {
        name: String,
        count: i32,
        tags: Vec<i64>,
        note: Option<String>,
        ordering: Ordering,
    }

    impl QueryParams for Sample {
        fn decode(query: &FieldReader<'_>) -> Result<Self, QueryError> {
            Ok(Self {
                name: query.get("name")?,
                count: query.get("count")?,
                tags: query.get_array("tags")?,
                note: query.get_optional("note")?,
                ordering: query.get_filter("ordering")?,
            })
        }

        fn encode(&self, query: &mut FieldWriter) -> Result<(), QueryError> {
            query.put("name", &self.name);
            query.put("count", &self.count);
            query.put_array("tags", &self.tags);
            query.put_optional("note", &self.note);
            query.put_filter("ordering", &self.ordering);
            Ok(())
        }
    }

    fn sample() -> Sample {
        Sample {
            name: "a string".to_string(),
            count: -7,
            tags: vec![1, -1, 3],
            note: None,
            ordering: Ordering::new(vec![Order::asc("name"), Order::desc("age")]),
        }
    }

    #[test]
    fn test_pairs_keep_declared_order() {
        let pairs = QueryEncoder::new().encode_to_pairs(&sample()).unwrap();
        let keys: Vec<&str> = pairs.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, ["name", "count", "tags", "ordering"]);
    }

    #[test]
    fn test_dictionary_values_are_raw() {
        let dict = QueryEncoder::new().encode(&sample()).unwrap();
        assert_eq!(dict.get("name"), Some(&"a string".to_string()));
        assert_eq!(dict.get("count"), Some(&"-7".to_string()));
        assert_eq!(dict.get("tags"), Some(&"1,-1,3".to_string()));
        assert_eq!(dict.get("ordering"), Some(&"asc(name),desc(age)".to_string()));
    }

    #[test]
    fn test_none_fields_are_omitted() {
        let dict = QueryEncoder::new().encode(&sample()).unwrap();
        assert!(!dict.contains_key("note"));
    }

    #[test]
    fn test_query_string_percent_encodes_values() {
        let rendered = QueryEncoder::new().encode_to_string(&sample()).unwrap();
        assert!(rendered.starts_with('?'));
        assert!(rendered.contains("name=a%20string"));
        assert!(rendered.contains("tags=1%2C-1%2C3"));
        assert!(!rendered.contains(' '));
    }

    #[test]
    fn test_bytes_form_has_no_question_mark() {
        let bytes = QueryEncoder::new().encode_to_bytes(&sample()).unwrap();
        let rendered = QueryEncoder::new().encode_to_string(&sample()).unwrap();
        assert_eq!(bytes, rendered[1..].as_bytes());
    }

    #[test]
    fn test_round_trip_through_query_string() {
        let rendered = QueryEncoder::new().encode_to_string(&sample()).unwrap();
        let decoded: Sample = QueryDecoder::from_query_string(&rendered).decode().unwrap();
        assert_eq!(decoded.name, "a string");
        assert_eq!(decoded.count, -7);
        assert_eq!(decoded.tags, vec![1, -1, 3]);
        assert_eq!(decoded.note, None);
        assert_eq!(
            decoded.ordering,
            Ordering::new(vec![Order::asc("name"), Order::desc("age")])
        );
    }
}
