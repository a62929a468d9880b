use super::ContentReference;

/// Platform result code for a completed request.
pub const RESULT_OK: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultStatus {
    Ok,
    Cancelled,
}

impl ResultStatus {
    /// Anything other than [`RESULT_OK`] counts as cancelled.
    pub fn from_code(code: i32) -> Self {
        if code == RESULT_OK {
            ResultStatus::Ok
        } else {
            ResultStatus::Cancelled
        }
    }

    pub fn is_success(self) -> bool {
        self == ResultStatus::Ok
    }
}

/// Content references carried by a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultPayload {
    Single(ContentReference),
    /// Multi-select list, in the order the platform reported it.
    Multiple(Vec<ContentReference>),
}

/// The asynchronous answer to a launched request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalResult {
    pub status: ResultStatus,
    pub payload: Option<ResultPayload>,
}

impl ExternalResult {
    pub fn cancelled() -> Self {
        Self {
            status: ResultStatus::Cancelled,
            payload: None,
        }
    }

    /// Successful result without data, as a camera capture reports.
    pub fn ok() -> Self {
        Self {
            status: ResultStatus::Ok,
            payload: None,
        }
    }

    pub fn single(reference: impl Into<ContentReference>) -> Self {
        Self {
            status: ResultStatus::Ok,
            payload: Some(ResultPayload::Single(reference.into())),
        }
    }

    pub fn multiple<I, R>(references: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<ContentReference>,
    {
        Self {
            status: ResultStatus::Ok,
            payload: Some(ResultPayload::Multiple(
                references.into_iter().map(Into::into).collect(),
            )),
        }
    }
}
