//! Fixed-size array storage.

use super::{BackendKind, PhiloxBackend};

/// Counter and key stored as `[u32; 4]` and `[u32; 2]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ArrayBackend;

impl PhiloxBackend for ArrayBackend {
    type Counter = [u32; 4];
    type Key = [u32; 2];

    const KIND: BackendKind = BackendKind::Array;
}
