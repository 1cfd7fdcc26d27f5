//! Editor URI to path conversion.

use std::path::Path;

use url::Url;

use crate::diagnostic::OverlayError;
use crate::path::to_slash;

/// Decode a `file://` URI into an engine-style path.
///
/// Percent-escapes are decoded; Windows drive paths come out as `C:/...`.
pub fn uri_to_path(uri: &str) -> Result<String, OverlayError> {
    let invalid = || OverlayError::InvalidUri {
        uri: uri.to_string(),
    };
    let url = Url::parse(uri).map_err(|_| invalid())?;
    if url.scheme() != "file" {
        return Err(invalid());
    }
    let path = url.to_file_path().map_err(|_| invalid())?;
    Ok(to_slash(&path))
}

/// Encode an absolute path as a `file://` URI.
pub fn path_to_uri(path: &str) -> Option<String> {
    Url::from_file_path(Path::new(path)).ok().map(String::from)
}
