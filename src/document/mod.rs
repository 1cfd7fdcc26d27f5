//! Documents and the virtual document store.

#[allow(clippy::module_inception)]
mod document;
mod store;
mod uri;

pub use document::{DISK_VERSION, Document, DocumentKind, EditorDocument, UNCOMPILED, Version};
pub use store::{DocumentStore, Registration};
pub use uri::{path_to_uri, uri_to_path};
