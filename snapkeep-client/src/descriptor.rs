//! Request descriptors.
//!
//! A [`RequestDescriptor`] is an immutable value describing one API call:
//! path, query, method, headers, body parameters, whether the executor
//! must attach the access token, and which body encoding to use.
//! Constructing a descriptor is pure data assembly and never fails;
//! validation of field contents is the server's job.

use std::collections::BTreeMap;

// ============================================================================
// Method
// ============================================================================

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET — never carries a body.
    Get,
    /// PUT.
    Put,
    /// POST.
    Post,
    /// PATCH.
    Patch,
    /// DELETE.
    Delete,
}

impl Method {
    /// Returns the wire name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Returns true if requests with this method may carry a body.
    ///
    /// For GET the descriptor's parameters are ignored and no body is
    /// ever serialized.
    pub fn allows_body(&self) -> bool {
        !matches!(self, Self::Get)
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Body Encoding
// ============================================================================

/// Which body codec a descriptor selects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BodyEncoding {
    /// `application/json` object body.
    #[default]
    Json,
    /// `multipart/form-data` body with a per-request random boundary.
    Multipart,
}

// ============================================================================
// Binary Part
// ============================================================================

/// An opaque binary file used as a multipart parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryPart {
    /// File name emitted in the part's `Content-Disposition`.
    pub file_name: String,
    /// MIME type emitted as the part's `Content-Type`.
    pub mime_type: String,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

impl BinaryPart {
    /// Creates a new binary part.
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Creates a JPEG part.
    pub fn jpeg(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::new(file_name, "image/jpeg", bytes)
    }
}

// ============================================================================
// Parameter Value
// ============================================================================

/// A body parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Plain text value.
    Text(String),
    /// Arbitrary JSON value (scalar, array, or object).
    Json(serde_json::Value),
    /// A single binary file part (multipart only).
    File(BinaryPart),
    /// A sequence of binary file parts under one name (multipart only).
    Files(Vec<BinaryPart>),
}

impl ParamValue {
    /// Returns the plain-text form of a non-file value, if it has one.
    ///
    /// Multipart text fields coerce values to their string form:
    /// JSON strings are used verbatim (unquoted), other JSON values are
    /// rendered compactly.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Json(serde_json::Value::String(s)) => Some(s.clone()),
            Self::Json(v) => Some(v.to_string()),
            Self::File(_) | Self::Files(_) => None,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<serde_json::Value> for ParamValue {
    fn from(v: serde_json::Value) -> Self {
        Self::Json(v)
    }
}

// ============================================================================
// Request Descriptor
// ============================================================================

/// An immutable description of one API call.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// Path relative to the environment's base URL, e.g. `/v1/images`.
    pub path: String,
    /// Ordered query items; repeated names are allowed.
    pub query: Vec<(String, String)>,
    /// HTTP method.
    pub method: Method,
    /// Per-request header overrides. The body codec's content type is
    /// applied by the executor unless a `Content-Type` override is present.
    pub headers: Vec<(String, String)>,
    /// Body parameters. Ignored for GET.
    pub parameters: BTreeMap<String, ParamValue>,
    /// Whether the executor must attach the current access token.
    pub requires_auth: bool,
    /// Body encoding selected for this request.
    pub encoding: BodyEncoding,
}

impl RequestDescriptor {
    /// Creates a descriptor with JSON encoding and no auth requirement.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
            method,
            headers: Vec::new(),
            parameters: BTreeMap::new(),
            requires_auth: false,
            encoding: BodyEncoding::Json,
        }
    }

    /// Appends a query item.
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Adds a header override.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Adds a body parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Marks the request as requiring the access token.
    pub fn authenticated(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    /// Selects the body encoding.
    pub fn with_encoding(mut self, encoding: BodyEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Looks up a header override, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

// ============================================================================
// Tests
// ============================================================================
