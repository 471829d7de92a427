pub use crate::errors::{BodyFormat, ErrorBody, IdentifierError, QueryError, RequestError};
pub use crate::handlers::{
    CodableArrayClosure, CodableArrayResultClosure, CodableClosure, CodableIdentifierClosure,
    CodableResultClosure, IdentifierCodableClosure, IdentifierCodableResultClosure,
    IdentifierNonCodableClosure, IdentifierSimpleCodableClosure, NonCodableClosure, ResultClosure,
    SimpleCodableClosure,
};
pub use crate::identifier::Identifier;
pub use crate::query::{
    DateDecodingStrategy, DateEncodingStrategy, ExclusiveRange, FieldReader, FieldWriter,
    FilterValue, GreaterThan, GreaterThanOrEqual, InclusiveRange, LowerThan, LowerThanOrEqual,
    Order, Ordering, Pagination, QueryDecoder, QueryEncoder, QueryParams, QueryScalar,
    DEFAULT_DATE_FORMAT,
};
