//! Collection naming rules shared by the store backends

use super::error::{StoreError, StoreResult};

/// Longest allowed `<database>.<collection>` namespace, in bytes
pub const MAX_NAMESPACE_BYTES: usize = 255;

/// Prefix reserved for the store's own collections
pub const RESERVED_PREFIX: &str = "system.";

/// Check a collection name against the document-store naming rules
pub fn validate_collection_name(database: &str, name: &str) -> StoreResult<()> {
    if name.is_empty() {
        return Err(StoreError::invalid_name(name, "must not be empty"));
    }
    if name.contains('\0') {
        return Err(StoreError::invalid_name(name, "must not contain a null byte"));
    }
    if name.contains('$') {
        return Err(StoreError::invalid_name(name, "must not contain '$'"));
    }
    if name.starts_with(RESERVED_PREFIX) {
        return Err(StoreError::invalid_name(
            name,
            format!("the '{}' prefix is reserved", RESERVED_PREFIX),
        ));
    }

    let namespace_len = database.len() + 1 + name.len();
    if namespace_len > MAX_NAMESPACE_BYTES {
        return Err(StoreError::invalid_name(
            name,
            format!(
                "namespace '{}.{}' is {} bytes, limit is {}",
                database, name, namespace_len, MAX_NAMESPACE_BYTES
            ),
        ));
    }

    Ok(())
}
