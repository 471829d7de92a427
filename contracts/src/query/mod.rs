//! Bidirectional codec between typed records and URL query strings.
//!
//! A record type opts in by implementing [`QueryParams`], listing its
//! fields once per direction against the [`FieldReader`] and
//! [`FieldWriter`] seams. [`QueryDecoder`] then projects any flat query
//! representation onto the record, and [`QueryEncoder`] projects the
//! record back out. Both directions are pure, single-pass and stateless
//! per call.

pub mod coder;
pub mod decoder;
pub mod encoder;
pub mod filters;

pub use coder::{
    DateDecodingStrategy, DateEncodingStrategy, QueryScalar, ScalarError, DEFAULT_DATE_FORMAT,
};
pub use decoder::{FieldReader, QueryDecoder};
pub use encoder::{FieldWriter, QueryEncoder};
pub use filters::{
    ExclusiveRange, FilterValue, GreaterThan, GreaterThanOrEqual, InclusiveRange, LowerThan,
    LowerThanOrEqual, Order, Ordering, Pagination,
};

use crate::errors::QueryError;

/// The schema contract a record type registers with the query codec.
///
/// `decode` and `encode` enumerate the record's fields by name and kind;
/// the reader and writer do the per-kind conversion work. The two date
/// strategy methods are static configuration for the whole record type,
/// fixed at definition time. Leave them at their defaults to use
/// [`DEFAULT_DATE_FORMAT`].
///
/// ```
/// use project_contracts::errors::QueryError;
/// use project_contracts::query::{FieldReader, FieldWriter, QueryDecoder, QueryParams};
///
/// struct UserQuery {
///     name: String,
///     age: Option<u8>,
/// }
///
/// impl QueryParams for UserQuery {
///     fn decode(query: &FieldReader<'_>) -> Result<Self, QueryError> {
///         Ok(Self {
///             name: query.get("name")?,
///             age: query.get_optional("age")?,
///         })
///     }
///
///     fn encode(&self, query: &mut FieldWriter) -> Result<(), QueryError> {
///         query.put("name", &self.name);
///         query.put_optional("age", &self.age);
///         Ok(())
///     }
/// }
///
/// let decoded: UserQuery = QueryDecoder::from_query_string("name=ada&age=36")
///     .decode()
///     .unwrap();
/// assert_eq!(decoded.name, "ada");
/// assert_eq!(decoded.age, Some(36));
/// ```
pub trait QueryParams: Sized {
    /// Rebuilds a record from the fields of a decoded query.
    fn decode(query: &FieldReader<'_>) -> Result<Self, QueryError>;

    /// Emits the record's fields, in declared order, into the writer.
    fn encode(&self, query: &mut FieldWriter) -> Result<(), QueryError>;

    /// Strategy for parsing this type's date fields.
    fn date_decoding_strategy() -> DateDecodingStrategy {
        DateDecodingStrategy::Default
    }

    /// Strategy for rendering this type's date fields.
    fn date_encoding_strategy() -> DateEncodingStrategy {
        DateEncodingStrategy::Default
    }
}
