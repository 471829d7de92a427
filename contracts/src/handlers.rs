//! Closure shapes shared between the router and application route handlers.
//!
//! A route handler receives its decoded inputs plus a completion closure and
//! responds by invoking the completion exactly once, with either a value or
//! a `RequestError`. The aliases here are the contract between the two
//! sides; they carry no behavior of their own.

use crate::errors::RequestError;

/// Completion for handlers that produce no value, e.g. DELETE routes.
pub type ResultClosure = Box<dyn FnOnce(Option<RequestError>) + Send>;

/// Completion carrying a single encodable value.
pub type CodableResultClosure<O> = Box<dyn FnOnce(Option<O>, Option<RequestError>) + Send>;

/// Completion carrying an array of encodable values.
pub type CodableArrayResultClosure<O> = Box<dyn FnOnce(Option<Vec<O>>, Option<RequestError>) + Send>;

/// Completion carrying a new identifier alongside the value, e.g. POST
/// routes that mint an id for the created entity.
pub type IdentifierCodableResultClosure<Id, O> =
    Box<dyn FnOnce(Option<Id>, Option<O>, Option<RequestError>) + Send>;

/// Handler with no inputs and no output value.
pub type NonCodableClosure = Box<dyn Fn(ResultClosure) + Send + Sync>;

/// Handler addressed by identifier, producing no output value.
pub type IdentifierNonCodableClosure<Id> = Box<dyn Fn(Id, ResultClosure) + Send + Sync>;

/// Handler taking a decoded body, e.g. POST routes.
pub type CodableClosure<I, O> = Box<dyn Fn(I, CodableResultClosure<O>) + Send + Sync>;

/// Handler taking a decoded body and responding with an identifier.
pub type CodableIdentifierClosure<I, Id, O> =
    Box<dyn Fn(I, IdentifierCodableResultClosure<Id, O>) + Send + Sync>;

/// Handler addressed by identifier and taking a decoded body, e.g. PUT and
/// PATCH routes.
pub type IdentifierCodableClosure<Id, I, O> =
    Box<dyn Fn(Id, I, CodableResultClosure<O>) + Send + Sync>;

/// Handler returning a single value, e.g. GET on a singleton resource.
pub type SimpleCodableClosure<O> = Box<dyn Fn(CodableResultClosure<O>) + Send + Sync>;

/// Handler returning an array of values, e.g. GET on a collection.
pub type CodableArrayClosure<O> = Box<dyn Fn(CodableArrayResultClosure<O>) + Send + Sync>;

/// Handler addressed by identifier, returning a single value.
pub type IdentifierSimpleCodableClosure<Id, O> =
    Box<dyn Fn(Id, CodableResultClosure<O>) + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_invokes_completion_with_value() {
        let handler: SimpleCodableClosure<i32> = Box::new(|respond_with| {
            respond_with(Some(17), None);
        });

        let completion: CodableResultClosure<i32> = Box::new(|value, error| {
            assert_eq!(value, Some(17));
            assert!(error.is_none());
        });

        handler(completion);
    }

    #[test]
    fn test_handler_invokes_completion_with_error() {
        let handler: NonCodableClosure = Box::new(|respond_with| {
            respond_with(Some(RequestError::INTERNAL_SERVER_ERROR));
        });

        let completion: ResultClosure = Box::new(|error| {
            assert_eq!(error, Some(RequestError::INTERNAL_SERVER_ERROR));
        });

        handler(completion);
    }
}
