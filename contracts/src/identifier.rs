use crate::errors::IdentifierError;

/// An identifier for an entity with a string representation, typically the
/// `:id` segment of a route path.
pub trait Identifier: Sized {
    /// Creates an identifier from its string representation.
    fn from_value(value: &str) -> Result<Self, IdentifierError>;

    /// The string representation of the identifier.
    fn value(&self) -> String;
}

impl Identifier for String {
    fn from_value(value: &str) -> Result<Self, IdentifierError> {
        Ok(value.to_string())
    }

    fn value(&self) -> String {
        self.clone()
    }
}

macro_rules! integer_identifier {
    ($($int:ty),*) => {$(
        impl Identifier for $int {
            fn from_value(value: &str) -> Result<Self, IdentifierError> {
                value.parse().map_err(|_| IdentifierError::InvalidValue)
            }

            fn value(&self) -> String {
                self.to_string()
            }
        }
    )*};
}

integer_identifier!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
