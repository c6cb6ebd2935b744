//! Request types and validation for HTTP endpoints.

use alchemy_lib::TraversalMode;
use serde::{Deserialize, Serialize};

use crate::ProblemDetails;

/// Validation trait for request types.
///
/// Returns a boxed `ProblemDetails` to avoid large `Result::Err` variants.
/// The `request_id` populates the `instance` field of the problem.
pub trait Validate {
    /// Validate the request, returning an error if invalid.
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>>;
}

/// Body of `POST /dfs` and `POST /bfs`.
///
/// ```json
/// { "element": "Steam", "type": "all" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraversalRequest {
    /// Target element name, matched case-sensitively.
    pub element: String,

    /// Traversal mode, `"one"` or `"all"`.
    #[serde(rename = "type")]
    pub kind: String,
}

impl TraversalRequest {
    pub fn new(element: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            kind: kind.into(),
        }
    }

    /// Parse the `type` field.
    pub fn mode(&self, request_id: &str) -> Result<TraversalMode, Box<ProblemDetails>> {
        self.kind.parse().map_err(|_| {
            Box::new(ProblemDetails::bad_request(
                format!(
                    "Invalid type '{}': must be 'one' or 'all'",
                    self.kind
                ),
                request_id,
            ))
        })
    }
}

impl Validate for TraversalRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        if self.element.trim().is_empty() {
            return Err(Box::new(ProblemDetails::bad_request(
                "The 'element' field is required and cannot be empty",
                request_id,
            )));
        }

        self.mode(request_id).map(|_| ())
    }
}
