// BLOB version prefix helpers. [version: u8][wincode payload].

/// Current usage document encoding.
pub(super) const DOCUMENT_VERSION: u8 = 1;

pub(super) fn with_version_prefix(version: u8, payload: Vec<u8>) -> Vec<u8> {
    let mut out = Vec::with_capacity(1 + payload.len());
    out.push(version);
    out.extend_from_slice(&payload);
    out
}

/// Payload after the version byte, or None if the blob is empty or another version.
pub(super) fn versioned_payload(bytes: &[u8], expected_version: u8) -> Option<&[u8]> {
    match bytes.split_first() {
        Some((&version, payload)) if version == expected_version => Some(payload),
        _ => None,
    }
}

pub(super) fn blob_version(bytes: &[u8]) -> Option<u8> {
    bytes.first().copied()
}
