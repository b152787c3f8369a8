//! Write guard for insert-only tables.
//!
//! Rows in these tables are history: an insert that would land on an
//! existing key is refused, and update/delete have no code path other than
//! the explicit refusal below.

use redb::{Key, ReadableTable, Table};

use crate::tables::Doc;
use crate::StoreError;

pub(crate) fn append_row<'k, K>(
    table: &mut Table<'_, K, Doc>,
    table_name: &'static str,
    key: K::SelfType<'k>,
    display_key: &str,
    bytes: &[u8],
) -> Result<(), StoreError>
where
    K: Key + 'static,
{
    if table.get(&key)?.is_some() {
        return Err(refuse(table_name, display_key));
    }
    table.insert(&key, bytes)?;
    Ok(())
}

/// Every rewrite attempt against an append-only table ends here.
pub(crate) fn refuse(table_name: &'static str, display_key: &str) -> StoreError {
    tracing::error!(table = table_name, key = display_key, "append-only violation");
    StoreError::Immutable {
        table: table_name,
        key: display_key.to_string(),
    }
}
