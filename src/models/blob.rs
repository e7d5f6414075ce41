//! Represents a blob stored in the external container.

use serde::Serialize;

/// A stored blob as seen by this service.
///
/// The gateway never reads blob contents back; after an upload the only thing
/// a caller needs is the public URL, and the name is what listing returns.
#[derive(Serialize, Clone, Debug)]
pub struct Blob {
    /// Object key inside the container (`{timestamp}-{sanitized filename}`).
    pub name: String,

    /// Publicly reachable URL of the blob (`{endpoint}/{container}/{name}`).
    pub url: String,
}
