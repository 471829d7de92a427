//! Comparison, range, ordering and pagination wrappers for query fields.
//!
//! Each wrapper is a small immutable value with its own token grammar:
//! a single scalar for the comparison family, `"start,end"` for ranges,
//! `"start,size"` for pagination and an `asc(...)`/`desc(...)` list for
//! ordering. They share nothing but the `FilterValue` seam the codec
//! drives them through.

use crate::query::coder::{QueryScalar, ScalarError};

/// A value that can cross the query string as a single token.
///
/// Parse failures reuse `ScalarError` so the decoder can report a range
/// violation distinctly from a malformed token.
pub trait FilterValue: Sized {
    /// Kind name used in decode diagnostics.
    const KIND: &'static str;

    fn from_query_value(raw: &str) -> Result<Self, ScalarError>;

    fn query_value(&self) -> String;
}

// ================================================================================================
// COMPARISON FILTERS - single-value operators
// ================================================================================================

macro_rules! comparison_filter {
    ($(#[$doc:meta])* $name:ident, $kind:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub struct $name<T> {
            value: T,
        }

        impl<T: QueryScalar> $name<T> {
            pub fn new(value: T) -> Self {
                Self { value }
            }

            /// The wrapped comparison operand.
            pub fn value(&self) -> &T {
                &self.value
            }
        }

        impl<T: QueryScalar> FilterValue for $name<T> {
            const KIND: &'static str = $kind;

            fn from_query_value(raw: &str) -> Result<Self, ScalarError> {
                T::from_query_value(raw).map(Self::new)
            }

            fn query_value(&self) -> String {
                self.value.to_query_value()
            }
        }
    };
}

comparison_filter!(
    /// Matches values strictly greater than the wrapped operand.
    GreaterThan,
    "greater-than filter"
);
comparison_filter!(
    /// Matches values greater than or equal to the wrapped operand.
    GreaterThanOrEqual,
    "greater-than-or-equal filter"
);
comparison_filter!(
    /// Matches values strictly lower than the wrapped operand.
    LowerThan,
    "lower-than filter"
);
comparison_filter!(
    /// Matches values lower than or equal to the wrapped operand.
    LowerThanOrEqual,
    "lower-than-or-equal filter"
);

// ================================================================================================
// RANGE FILTERS - "start,end" pairs
// ================================================================================================

macro_rules! range_filter {
    ($(#[$doc:meta])* $name:ident, $kind:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub struct $name<T> {
            start: T,
            end: T,
        }

        impl<T: QueryScalar> $name<T> {
            pub fn new(start: T, end: T) -> Self {
                Self { start, end }
            }

            pub fn start(&self) -> &T {
                &self.start
            }

            pub fn end(&self) -> &T {
                &self.end
            }
        }

        impl<T: QueryScalar> FilterValue for $name<T> {
            const KIND: &'static str = $kind;

            fn from_query_value(raw: &str) -> Result<Self, ScalarError> {
                let (start, end) = raw.split_once(',').ok_or(ScalarError::Invalid)?;
                Ok(Self::new(
                    T::from_query_value(start)?,
                    T::from_query_value(end)?,
                ))
            }

            fn query_value(&self) -> String {
                format!(
                    "{},{}",
                    self.start.to_query_value(),
                    self.end.to_query_value()
                )
            }
        }
    };
}

range_filter!(
    /// Matches values between `start` and `end`, both included.
    InclusiveRange,
    "inclusive range"
);
range_filter!(
    /// Matches values between `start` and `end`, both excluded.
    ExclusiveRange,
    "exclusive range"
);

// ================================================================================================
// ORDERING - "asc(field),desc(field)" token list
// ================================================================================================

/// A single sort directive: a direction applied to a field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Order {
    Asc(String),
    Desc(String),
}

impl Order {
    pub fn asc(field: impl Into<String>) -> Self {
        Order::Asc(field.into())
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Order::Desc(field.into())
    }

    /// The field this directive sorts by.
    pub fn field(&self) -> &str {
        match self {
            Order::Asc(field) | Order::Desc(field) => field,
        }
    }

    fn token(&self) -> String {
        match self {
            Order::Asc(field) => format!("asc({})", field),
            Order::Desc(field) => format!("desc({})", field),
        }
    }

    fn from_token(token: &str) -> Result<Self, ScalarError> {
        let body = token.strip_suffix(')').ok_or(ScalarError::Invalid)?;
        if let Some(field) = body.strip_prefix("asc(") {
            return Ok(Order::Asc(field.to_string()));
        }
        if let Some(field) = body.strip_prefix("desc(") {
            return Ok(Order::Desc(field.to_string()));
        }
        Err(ScalarError::Invalid)
    }
}

/// An ordered list of sort directives, e.g. `asc(name),desc(age)`.
/// Directive order is significant and preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ordering {
    order: Vec<Order>,
}

impl Ordering {
    pub fn new(order: Vec<Order>) -> Self {
        Self { order }
    }

    pub fn values(&self) -> &[Order] {
        &self.order
    }
}

impl FilterValue for Ordering {
    const KIND: &'static str = "ordering";

    fn from_query_value(raw: &str) -> Result<Self, ScalarError> {
        raw.split(',')
            .map(Order::from_token)
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }

    fn query_value(&self) -> String {
        self.order
            .iter()
            .map(Order::token)
            .collect::<Vec<_>>()
            .join(",")
    }
}

// ================================================================================================
// PAGINATION - "start,size" pair
// ================================================================================================

/// A window onto a collection: the offset of the first record and the
/// number of records wanted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    start: u32,
    size: u32,
}

impl Pagination {
    pub fn new(start: u32, size: u32) -> Self {
        Self { start, size }
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn size(&self) -> u32 {
        self.size
    }
}

impl FilterValue for Pagination {
    const KIND: &'static str = "pagination";

    fn from_query_value(raw: &str) -> Result<Self, ScalarError> {
        let (start, size) = raw.split_once(',').ok_or(ScalarError::Invalid)?;
        Ok(Self::new(
            u32::from_query_value(start)?,
            u32::from_query_value(size)?,
        ))
    }

    fn query_value(&self) -> String {
        format!("{},{}", self.start, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod comparison_filter_tests {
        use super::*;

        #[test]
        fn test_single_value_round_trip() {
            let filter = GreaterThan::new(8_i64);
            assert_eq!(filter.query_value(), "8");
            assert_eq!(GreaterThan::<i64>::from_query_value("8"), Ok(filter));
        }

        #[test]
        fn test_float_operand_keeps_fractional_digit() {
            assert_eq!(LowerThan::new(7.0_f64).query_value(), "7.0");
            assert_eq!(LowerThanOrEqual::new(12.0_f64).query_value(), "12.0");
        }

        #[test]
        fn test_garbage_operand_fails() {
            assert_eq!(
                GreaterThanOrEqual::<i32>::from_query_value("ten"),
                Err(ScalarError::Invalid)
            );
        }

        #[test]
        fn test_out_of_range_operand_is_classified() {
            assert_eq!(
                GreaterThan::<u8>::from_query_value("-1"),
                Err(ScalarError::OutOfRange)
            );
        }
    }

    mod range_filter_tests {
        use super::*;

        #[test]
        fn test_inclusive_range_round_trip() {
            let range = InclusiveRange::new(0_u64, 5_u64);
            assert_eq!(range.query_value(), "0,5");
            assert_eq!(InclusiveRange::<u64>::from_query_value("0,5"), Ok(range));
        }

        #[test]
        fn test_exclusive_range_round_trip() {
            let range = ExclusiveRange::new(4_u64, 15_u64);
            assert_eq!(range.query_value(), "4,15");
            assert_eq!(ExclusiveRange::<u64>::from_query_value("4,15"), Ok(range));
        }

        #[test]
        fn test_range_without_comma_fails() {
            assert_eq!(
                InclusiveRange::<u64>::from_query_value("5"),
                Err(ScalarError::Invalid)
            );
        }

        #[test]
        fn test_range_with_extra_part_fails() {
            // The split is on the first comma, so the tail is one bad scalar.
            assert_eq!(
                InclusiveRange::<u64>::from_query_value("0,5,7"),
                Err(ScalarError::Invalid)
            );
        }
    }

    mod ordering_tests {
        use super::*;

        #[test]
        fn test_ordering_round_trip_preserves_order() {
            let ordering = Ordering::new(vec![Order::asc("name"), Order::desc("age")]);
            assert_eq!(ordering.query_value(), "asc(name),desc(age)");
            assert_eq!(
                Ordering::from_query_value("asc(name),desc(age)"),
                Ok(ordering)
            );
        }

        #[test]
        fn test_unknown_direction_fails() {
            assert_eq!(
                Ordering::from_query_value("sideways(name)"),
                Err(ScalarError::Invalid)
            );
        }

        #[test]
        fn test_unterminated_token_fails() {
            assert_eq!(
                Ordering::from_query_value("asc(name"),
                Err(ScalarError::Invalid)
            );
        }

        #[test]
        fn test_order_field_accessor() {
            assert_eq!(Order::asc("name").field(), "name");
            assert_eq!(Order::desc("age").field(), "age");
        }
    }

    mod pagination_tests {
        use super::*;

        #[test]
        fn test_pagination_round_trip() {
            let page = Pagination::new(8, 14);
            assert_eq!(page.query_value(), "8,14");
            assert_eq!(Pagination::from_query_value("8,14"), Ok(page));
        }

        #[test]
        fn test_negative_start_is_out_of_range() {
            assert_eq!(
                Pagination::from_query_value("-1,14"),
                Err(ScalarError::OutOfRange)
            );
        }

        #[test]
        fn test_missing_size_fails() {
            assert_eq!(Pagination::from_query_value("8"), Err(ScalarError::Invalid));
        }
    }
}
