use serde::de::DeserializeOwned;
use serde::Serialize;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// An error representing a failed request, shared by the client and server
/// side of a route. Codes 100 to 599 are reserved for HTTP status codes;
/// larger custom codes may be used and must not conflict with that range.
#[derive(Debug, Clone)]
pub struct RequestError {
    raw_value: u16,
    reason: Cow<'static, str>,
    body: Option<ErrorBody>,
}

/// Wire format of a raw error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    Json,
}

/// A response body attached to a `RequestError`.
///
/// A `Json` body was supplied as a structured value and can be encoded for
/// transmission. A `Data` body was received as raw bytes and can be decoded
/// into a structured value.
#[derive(Debug, Clone)]
pub enum ErrorBody {
    Json(serde_json::Value),
    Data(Vec<u8>, BodyFormat),
}

impl RequestError {
    const fn catalog(raw_value: u16, reason: &'static str) -> Self {
        Self {
            raw_value,
            reason: Cow::Borrowed(reason),
            body: None,
        }
    }

    /// Creates an error representing the given error code.
    pub fn new(raw_value: u16) -> Self {
        Self {
            raw_value,
            reason: Cow::Owned(format!("error_{}", raw_value)),
            body: None,
        }
    }

    /// Creates an error representing a HTTP status code. Known status codes
    /// get their standard reason phrase.
    pub fn from_http_code(http_code: u16) -> Self {
        match Self::reason_for(http_code) {
            Some(reason) => Self::catalog(http_code, reason),
            None => Self {
                raw_value: http_code,
                reason: Cow::Owned(format!("http_{}", http_code)),
                body: None,
            },
        }
    }

    /// Creates an error with the given code and reason string.
    pub fn with_reason(raw_value: u16, reason: impl Into<Cow<'static, str>>) -> Self {
        Self {
            raw_value,
            reason: reason.into(),
            body: None,
        }
    }

    /// An error code representing the type of error that has occurred.
    pub fn raw_value(&self) -> u16 {
        self.raw_value
    }

    /// The HTTP status code for the error. Valid as a status code when
    /// inside the range 100 to 599.
    pub fn http_code(&self) -> u16 {
        self.raw_value
    }

    /// A human-readable description of the error code.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// The body attached to this error, if any.
    pub fn body(&self) -> Option<&ErrorBody> {
        self.body.as_ref()
    }

    /// Attaches a structured body to this error. Fails when the value is
    /// not representable as JSON.
    pub fn with_json_body<B: Serialize>(self, body: &B) -> Result<Self, serde_json::Error> {
        let value = serde_json::to_value(body)?;
        Ok(Self {
            body: Some(ErrorBody::Json(value)),
            ..self
        })
    }

    /// Attaches a raw body, as received from the wire, to this error.
    pub fn with_body_data(self, data: Vec<u8>, format: BodyFormat) -> Self {
        Self {
            body: Some(ErrorBody::Data(data, format)),
            ..self
        }
    }

    /// Encodes a structured body to bytes for transmission. Errors carrying
    /// a raw body, or no body at all, yield `None`.
    pub fn encoded_body(&self) -> Result<Option<Vec<u8>>, serde_json::Error> {
        match &self.body {
            Some(ErrorBody::Json(value)) => serde_json::to_vec(value).map(Some),
            _ => Ok(None),
        }
    }

    /// Decodes a raw body into a typed value. Errors carrying a structured
    /// body, or no body at all, yield `None`.
    pub fn decode_body<B: DeserializeOwned>(&self) -> Result<Option<B>, serde_json::Error> {
        match &self.body {
            Some(ErrorBody::Data(data, BodyFormat::Json)) => serde_json::from_slice(data).map(Some),
            _ => Ok(None),
        }
    }

    /// Decodes a raw body into a typed value, discarding decode failures.
    pub fn body_as<B: DeserializeOwned>(&self) -> Option<B> {
        self.decode_body().ok().flatten()
    }

    fn reason_for(http_code: u16) -> Option<&'static str> {
        let reason = match http_code {
            100 => "Continue",
            101 => "Switching Protocols",
            200 => "OK",
            201 => "Created",
            202 => "Accepted",
            203 => "Non-Authoritative Information",
            204 => "No Content",
            205 => "Reset Content",
            206 => "Partial Content",
            207 => "Multi-Status",
            208 => "Already Reported",
            226 => "IM Used",
            300 => "Multiple Choices",
            301 => "Moved Permanently",
            302 => "Found",
            303 => "See Other",
            304 => "Not Modified",
            305 => "Use Proxy",
            307 => "Temporary Redirect",
            308 => "Permanent Redirect",
            400 => "Bad Request",
            401 => "Unauthorized",
            402 => "Payment Required",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            406 => "Not Acceptable",
            407 => "Proxy Authentication Required",
            408 => "Request Timeout",
            409 => "Conflict",
            410 => "Gone",
            411 => "Length Required",
            412 => "Precondition Failed",
            413 => "Payload Too Large",
            414 => "URI Too Long",
            415 => "Unsupported Media Type",
            416 => "Range Not Satisfiable",
            417 => "Expectation Failed",
            421 => "Misdirected Request",
            422 => "Unprocessable Entity",
            423 => "Locked",
            424 => "Failed Dependency",
            426 => "Upgrade Required",
            428 => "Precondition Required",
            429 => "Too Many Requests",
            431 => "Request Header Fields Too Large",
            451 => "Unavailable For Legal Reasons",
            500 => "Internal Server Error",
            501 => "Not Implemented",
            502 => "Bad Gateway",
            503 => "Service Unavailable",
            504 => "Gateway Timeout",
            505 => "HTTP Version Not Supported",
            506 => "Variant Also Negotiates",
            507 => "Insufficient Storage",
            508 => "Loop Detected",
            510 => "Not Extended",
            511 => "Network Authentication Required",
            _ => return None,
        };
        Some(reason)
    }

    /// HTTP code 100 - Continue
    pub const CONTINUE: Self = Self::catalog(100, "Continue");
    /// HTTP code 101 - Switching Protocols
    pub const SWITCHING_PROTOCOLS: Self = Self::catalog(101, "Switching Protocols");
    /// HTTP code 200 - OK
    pub const OK: Self = Self::catalog(200, "OK");
    /// HTTP code 201 - Created
    pub const CREATED: Self = Self::catalog(201, "Created");
    /// HTTP code 202 - Accepted
    pub const ACCEPTED: Self = Self::catalog(202, "Accepted");
    /// HTTP code 203 - Non Authoritative Information
    pub const NON_AUTHORITATIVE_INFORMATION: Self =
        Self::catalog(203, "Non-Authoritative Information");
    /// HTTP code 204 - No Content
    pub const NO_CONTENT: Self = Self::catalog(204, "No Content");
    /// HTTP code 205 - Reset Content
    pub const RESET_CONTENT: Self = Self::catalog(205, "Reset Content");
    /// HTTP code 206 - Partial Content
    pub const PARTIAL_CONTENT: Self = Self::catalog(206, "Partial Content");
    /// HTTP code 207 - Multi Status
    pub const MULTI_STATUS: Self = Self::catalog(207, "Multi-Status");
    /// HTTP code 208 - Already Reported
    pub const ALREADY_REPORTED: Self = Self::catalog(208, "Already Reported");
    /// HTTP code 226 - IM Used
    pub const IM_USED: Self = Self::catalog(226, "IM Used");
    /// HTTP code 300 - Multiple Choices
    pub const MULTIPLE_CHOICES: Self = Self::catalog(300, "Multiple Choices");
    /// HTTP code 301 - Moved Permanently
    pub const MOVED_PERMANENTLY: Self = Self::catalog(301, "Moved Permanently");
    /// HTTP code 302 - Found
    pub const FOUND: Self = Self::catalog(302, "Found");
    /// HTTP code 303 - See Other
    pub const SEE_OTHER: Self = Self::catalog(303, "See Other");
    /// HTTP code 304 - Not Modified
    pub const NOT_MODIFIED: Self = Self::catalog(304, "Not Modified");
    /// HTTP code 305 - Use Proxy
    pub const USE_PROXY: Self = Self::catalog(305, "Use Proxy");
    /// HTTP code 307 - Temporary Redirect
    pub const TEMPORARY_REDIRECT: Self = Self::catalog(307, "Temporary Redirect");
    /// HTTP code 308 - Permanent Redirect
    pub const PERMANENT_REDIRECT: Self = Self::catalog(308, "Permanent Redirect");
    /// HTTP code 400 - Bad Request
    pub const BAD_REQUEST: Self = Self::catalog(400, "Bad Request");
    /// HTTP code 401 - Unauthorized
    pub const UNAUTHORIZED: Self = Self::catalog(401, "Unauthorized");
    /// HTTP code 402 - Payment Required
    pub const PAYMENT_REQUIRED: Self = Self::catalog(402, "Payment Required");
    /// HTTP code 403 - Forbidden
    pub const FORBIDDEN: Self = Self::catalog(403, "Forbidden");
    /// HTTP code 404 - Not Found
    pub const NOT_FOUND: Self = Self::catalog(404, "Not Found");
    /// HTTP code 405 - Method Not Allowed
    pub const METHOD_NOT_ALLOWED: Self = Self::catalog(405, "Method Not Allowed");
    /// HTTP code 406 - Not Acceptable
    pub const NOT_ACCEPTABLE: Self = Self::catalog(406, "Not Acceptable");
    /// HTTP code 407 - Proxy Authentication Required
    pub const PROXY_AUTHENTICATION_REQUIRED: Self =
        Self::catalog(407, "Proxy Authentication Required");
    /// HTTP code 408 - Request Timeout
    pub const REQUEST_TIMEOUT: Self = Self::catalog(408, "Request Timeout");
    /// HTTP code 409 - Conflict
    pub const CONFLICT: Self = Self::catalog(409, "Conflict");
    /// HTTP code 410 - Gone
    pub const GONE: Self = Self::catalog(410, "Gone");
    /// HTTP code 411 - Length Required
    pub const LENGTH_REQUIRED: Self = Self::catalog(411, "Length Required");
    /// HTTP code 412 - Precondition Failed
    pub const PRECONDITION_FAILED: Self = Self::catalog(412, "Precondition Failed");
    /// HTTP code 413 - Payload Too Large
    pub const PAYLOAD_TOO_LARGE: Self = Self::catalog(413, "Payload Too Large");
    /// HTTP code 414 - URI Too Long
    pub const URI_TOO_LONG: Self = Self::catalog(414, "URI Too Long");
    /// HTTP code 415 - Unsupported Media Type
    pub const UNSUPPORTED_MEDIA_TYPE: Self = Self::catalog(415, "Unsupported Media Type");
    /// HTTP code 416 - Range Not Satisfiable
    pub const RANGE_NOT_SATISFIABLE: Self = Self::catalog(416, "Range Not Satisfiable");
    /// HTTP code 417 - Expectation Failed
    pub const EXPECTATION_FAILED: Self = Self::catalog(417, "Expectation Failed");
    /// HTTP code 421 - Misdirected Request
    pub const MISDIRECTED_REQUEST: Self = Self::catalog(421, "Misdirected Request");
    /// HTTP code 422 - Unprocessable Entity
    pub const UNPROCESSABLE_ENTITY: Self = Self::catalog(422, "Unprocessable Entity");
    /// HTTP code 423 - Locked
    pub const LOCKED: Self = Self::catalog(423, "Locked");
    /// HTTP code 424 - Failed Dependency
    pub const FAILED_DEPENDENCY: Self = Self::catalog(424, "Failed Dependency");
    /// HTTP code 426 - Upgrade Required
    pub const UPGRADE_REQUIRED: Self = Self::catalog(426, "Upgrade Required");
    /// HTTP code 428 - Precondition Required
    pub const PRECONDITION_REQUIRED: Self = Self::catalog(428, "Precondition Required");
    /// HTTP code 429 - Too Many Requests
    pub const TOO_MANY_REQUESTS: Self = Self::catalog(429, "Too Many Requests");
    /// HTTP code 431 - Request Header Fields Too Large
    pub const REQUEST_HEADER_FIELDS_TOO_LARGE: Self =
        Self::catalog(431, "Request Header Fields Too Large");
    /// HTTP code 451 - Unavailable For Legal Reasons
    pub const UNAVAILABLE_FOR_LEGAL_REASONS: Self =
        Self::catalog(451, "Unavailable For Legal Reasons");
    /// HTTP code 500 - Internal Server Error
    pub const INTERNAL_SERVER_ERROR: Self = Self::catalog(500, "Internal Server Error");
    /// HTTP code 501 - Not Implemented
    pub const NOT_IMPLEMENTED: Self = Self::catalog(501, "Not Implemented");
    /// HTTP code 502 - Bad Gateway
    pub const BAD_GATEWAY: Self = Self::catalog(502, "Bad Gateway");
    /// HTTP code 503 - Service Unavailable
    pub const SERVICE_UNAVAILABLE: Self = Self::catalog(503, "Service Unavailable");
    /// HTTP code 504 - Gateway Timeout
    pub const GATEWAY_TIMEOUT: Self = Self::catalog(504, "Gateway Timeout");
    /// HTTP code 505 - HTTP Version Not Supported
    pub const HTTP_VERSION_NOT_SUPPORTED: Self = Self::catalog(505, "HTTP Version Not Supported");
    /// HTTP code 506 - Variant Also Negotiates
    pub const VARIANT_ALSO_NEGOTIATES: Self = Self::catalog(506, "Variant Also Negotiates");
    /// HTTP code 507 - Insufficient Storage
    pub const INSUFFICIENT_STORAGE: Self = Self::catalog(507, "Insufficient Storage");
    /// HTTP code 508 - Loop Detected
    pub const LOOP_DETECTED: Self = Self::catalog(508, "Loop Detected");
    /// HTTP code 510 - Not Extended
    pub const NOT_EXTENDED: Self = Self::catalog(510, "Not Extended");
    /// HTTP code 511 - Network Authentication Required
    pub const NETWORK_AUTHENTICATION_REQUIRED: Self =
        Self::catalog(511, "Network Authentication Required");
}

// Equality, ordering and hashing consider the code only; two errors with
// the same code are the same error regardless of reason or body.
impl PartialEq for RequestError {
    fn eq(&self, other: &Self) -> bool {
        self.raw_value == other.raw_value
    }
}

impl Eq for RequestError {}

impl PartialOrd for RequestError {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RequestError {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw_value.cmp(&other.raw_value)
    }
}

impl std::hash::Hash for RequestError {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.raw_value.hash(state);
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.raw_value, self.reason)
    }
}

impl std::error::Error for RequestError {}

/// An error representing a failure to create an `Identifier`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("invalid identifier value")]
    InvalidValue,
}

/// A failure to decode a query representation into a record, or to encode
/// a record back out. Every variant names the offending field so callers
/// can build a diagnostic without re-walking the input.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("missing value for required field '{field}'")]
    MissingField { field: String },

    #[error("field '{field}': cannot convert '{raw}' to {kind}")]
    InvalidValue {
        field: String,
        raw: String,
        kind: &'static str,
    },

    #[error("field '{field}': value '{raw}' is out of range for {kind}")]
    OutOfRange {
        field: String,
        raw: String,
        kind: &'static str,
    },

    #[error("field '{field}': malformed {kind} expression '{raw}'")]
    MalformedFilter {
        field: String,
        raw: String,
        kind: &'static str,
    },

    #[error("field '{field}': invalid JSON value: {source}")]
    JsonDecoding {
        field: String,
        source: serde_json::Error,
    },

    #[error("field '{field}': value is not representable as JSON: {source}")]
    JsonEncoding {
        field: String,
        source: serde_json::Error,
    },

    #[error("query buffer is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}
