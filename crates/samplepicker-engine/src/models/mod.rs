pub mod acquired_file;
pub mod content_reference;
pub mod external_result;

pub use acquired_file::AcquiredFile;
pub use content_reference::ContentReference;
pub use external_result::{ExternalResult, RESULT_OK, ResultPayload, ResultStatus};
