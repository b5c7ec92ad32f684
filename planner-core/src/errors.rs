//! # Errors
//!
//! Structured errors for the planner backend.
//! - each error carries an HTTP-style status code
//! - can be carried through `anyhow::Error` across async seams
//! - transport-agnostic (the HTTP crate decides how to write them)
//!
//! Clients only ever see the `{"error": "<message>"}` payload produced by
//! [`PlannerError::to_json`]; the inner `source` stays server-side.

use std::fmt;

use anyhow::Error as AnyError;
use serde_json::{json, Value};

/// A convenience result type for planner APIs.
pub type PlannerResult<T> = std::result::Result<T, AnyError>;

/// Error classes the backend answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,          // 400
    NotFound,            // 404
    RangeNotSatisfiable, // 416
    GeneralError,        // 500
}

impl ErrorKind {
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::RangeNotSatisfiable => 416,
            ErrorKind::GeneralError => 500,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BadRequest",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::RangeNotSatisfiable => "RangeNotSatisfiable",
            ErrorKind::GeneralError => "GeneralError",
        }
    }
}

/// A structured planner error that can live inside `anyhow::Error`.
#[derive(Debug)]
pub struct PlannerError {
    pub kind: ErrorKind,
    pub message: String,
    pub data: Option<Value>,
    pub source: Option<AnyError>,
}

impl PlannerError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            data: None,
            source: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_source(mut self, source: AnyError) -> Self {
        self.source = Some(source);
        self
    }

    pub fn code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Convert into `anyhow::Error`.
    pub fn into_anyhow(self) -> AnyError {
        AnyError::new(self)
    }

    /// Copy without the inner `source`, suitable for returning to clients.
    pub fn sanitize_for_client(&self) -> PlannerError {
        PlannerError {
            kind: self.kind,
            message: self.message.clone(),
            data: self.data.clone(),
            source: None,
        }
    }

    /// Client payload: `{"error": message}`, plus `data` when attached.
    pub fn to_json(&self) -> Value {
        let mut base = json!({ "error": self.message });
        if let Some(d) = &self.data {
            base["data"] = d.clone();
        }
        base
    }

    // ---- Constructors ----

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, msg)
    }
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, msg)
    }
    pub fn range_not_satisfiable(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::RangeNotSatisfiable, msg)
    }
    pub fn general_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::GeneralError, msg)
    }
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.name(), self.code(), self.message)
    }
}

impl std::error::Error for PlannerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_payload_only_exposes_message() {
        let err = PlannerError::not_found("File not found")
            .with_source(anyhow::anyhow!("signing rejected: secret detail"));
        let safe = err.sanitize_for_client();

        assert_eq!(safe.code(), 404);
        assert!(safe.source.is_none());
        assert_eq!(safe.to_json(), json!({ "error": "File not found" }));
    }

    #[test]
    fn kinds_map_to_status_codes() {
        let expected = [
            (ErrorKind::BadRequest, 400),
            (ErrorKind::NotFound, 404),
            (ErrorKind::RangeNotSatisfiable, 416),
            (ErrorKind::GeneralError, 500),
        ];
        for (kind, code) in expected {
            assert_eq!(PlannerError::new(kind, "x").code(), code, "{}", kind.name());
        }
    }

    #[test]
    fn display_includes_name_and_code() {
        let err = PlannerError::range_not_satisfiable("bytes */500");
        assert_eq!(err.to_string(), "RangeNotSatisfiable (416): bytes */500");
    }
}
