//! Native small-vector storage mirroring CUDA's `uint4` and `uint2`.
//!
//! The lanes are named (`x`, `y`, `z`, `w`) like the device vector types and
//! the structs carry the same size and alignment, so a counter can be copied
//! to or from device memory without repacking. Indexing maps lane `i` to the
//! `i`-th field so the shared round code can treat them as arrays.

use std::ops::{Index, IndexMut};

use bytemuck::{Pod, Zeroable};

use super::{BackendKind, PhiloxBackend, WordArray};

/// Four 32-bit lanes, 16-byte aligned (`uint4`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(C, align(16))]
pub struct Uint4 {
    /// Lane 0 (least significant counter word).
    pub x: u32,
    /// Lane 1.
    pub y: u32,
    /// Lane 2.
    pub z: u32,
    /// Lane 3.
    pub w: u32,
}

/// Two 32-bit lanes, 8-byte aligned (`uint2`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(C, align(8))]
pub struct Uint2 {
    /// Lane 0.
    pub x: u32,
    /// Lane 1.
    pub y: u32,
}

// SAFETY: both types are #[repr(C)] over u32 fields only; the alignment equals
// the total size, so there is no padding.
unsafe impl Zeroable for Uint4 {}
unsafe impl Pod for Uint4 {}
unsafe impl Zeroable for Uint2 {}
unsafe impl Pod for Uint2 {}

impl Uint4 {
    /// Create from four lanes.
    pub const fn new(x: u32, y: u32, z: u32, w: u32) -> Self {
        Self { x, y, z, w }
    }
}

impl Uint2 {
    /// Create from two lanes.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl Index<usize> for Uint4 {
    type Output = u32;

    #[inline(always)]
    fn index(&self, index: usize) -> &u32 {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            3 => &self.w,
            _ => panic!("Uint4 index {} out of range", index),
        }
    }
}

impl IndexMut<usize> for Uint4 {
    #[inline(always)]
    fn index_mut(&mut self, index: usize) -> &mut u32 {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            3 => &mut self.w,
            _ => panic!("Uint4 index {} out of range", index),
        }
    }
}

impl Index<usize> for Uint2 {
    type Output = u32;

    #[inline(always)]
    fn index(&self, index: usize) -> &u32 {
        match index {
            0 => &self.x,
            1 => &self.y,
            _ => panic!("Uint2 index {} out of range", index),
        }
    }
}

impl IndexMut<usize> for Uint2 {
    #[inline(always)]
    fn index_mut(&mut self, index: usize) -> &mut u32 {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            _ => panic!("Uint2 index {} out of range", index),
        }
    }
}

impl WordArray<4> for Uint4 {
    #[inline(always)]
    fn from_words(words: [u32; 4]) -> Self {
        Self::new(words[0], words[1], words[2], words[3])
    }

    #[inline(always)]
    fn into_words(self) -> [u32; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

impl WordArray<2> for Uint2 {
    #[inline(always)]
    fn from_words(words: [u32; 2]) -> Self {
        Self::new(words[0], words[1])
    }

    #[inline(always)]
    fn into_words(self) -> [u32; 2] {
        [self.x, self.y]
    }
}

/// Counter and key stored as [`Uint4`] and [`Uint2`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NativeVectorBackend;

impl PhiloxBackend for NativeVectorBackend {
    type Counter = Uint4;
    type Key = Uint2;

    const KIND: BackendKind = BackendKind::NativeVector;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_matches_device_vectors() {
        assert_eq!(std::mem::size_of::<Uint4>(), 16);
        assert_eq!(std::mem::align_of::<Uint4>(), 16);
        assert_eq!(std::mem::size_of::<Uint2>(), 8);
        assert_eq!(std::mem::align_of::<Uint2>(), 8);
    }

    #[test]
    fn test_pod_cast_preserves_lane_order() {
        let v = Uint4::new(1, 2, 3, 4);
        let words: [u32; 4] = bytemuck::cast(v);
        assert_eq!(words, [1, 2, 3, 4]);
        assert_eq!(words, v.into_words());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_index_out_of_range_panics() {
        let v = Uint2::default();
        let _ = v[2];
    }
}
