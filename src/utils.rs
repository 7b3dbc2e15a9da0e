use std::alloc::{alloc_zeroed, dealloc, Layout};
use std::fmt;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;

use crate::error::{allocation_error, layout_error, Result};

/// An owned, fixed-length `f32` buffer with a guaranteed start alignment.
///
/// This is the backing store of [`ImageBuffer`](crate::ImageBuffer). The
/// memory is obtained with `std::alloc::alloc_zeroed` and released with the
/// matching `dealloc` in `Drop`, so there is no manual free anywhere else in
/// the crate and the allocation is released on every exit path.
///
/// # Memory Safety
///
/// - Zero bytes are a valid `f32` (`0.0`), so the buffer is initialized on
///   construction and can be read immediately.
/// - The type is move-only. Duplication goes through [`AlignedVec::try_clone`],
///   which can fail like any other allocation.
/// - Slice access goes through `Deref`/`DerefMut`, so the borrow checker
///   enforces exclusive mutable access.
pub struct AlignedVec<T> {
    ptr: NonNull<T>,
    len: usize,
    layout: Layout,
}

// SAFETY: AlignedVec uniquely owns its allocation, like Vec<T>.
unsafe impl<T: Send> Send for AlignedVec<T> {}
// SAFETY: shared access only hands out &[T].
unsafe impl<T: Sync> Sync for AlignedVec<T> {}

impl AlignedVec<f32> {
    /// Allocates `len` zero-initialized floats aligned to `align` bytes.
    ///
    /// # Errors
    ///
    /// - [`LayoutError`](crate::BlurError::LayoutError) if `align` is not a
    ///   power of two, is smaller than the alignment of `f32`, or the byte
    ///   size overflows.
    /// - [`AllocationError`](crate::BlurError::AllocationError) if the
    ///   allocator cannot provide the memory.
    pub fn zeroed(len: usize, align: usize) -> Result<Self> {
        if !align.is_power_of_two() || align < mem::align_of::<f32>() {
            return Err(layout_error(
                len,
                align,
                "alignment must be a power of two no smaller than f32",
            ));
        }

        let size = len
            .checked_mul(mem::size_of::<f32>())
            .ok_or_else(|| layout_error(len, align, "byte size overflows usize"))?;

        let layout = Layout::from_size_align(size, align)
            .map_err(|e| layout_error(size, align, e.to_string()))?;

        if size == 0 {
            return Ok(Self {
                ptr: NonNull::dangling(),
                len: 0,
                layout,
            });
        }

        // SAFETY: layout has a non-zero size.
        let raw = unsafe { alloc_zeroed(layout) };

        let ptr = NonNull::new(raw as *mut f32)
            .ok_or_else(|| allocation_error(size, align, "allocator returned null"))?;

        Ok(Self { ptr, len, layout })
    }

    /// Allocates a new buffer with the same alignment and copies the contents.
    pub fn try_clone(&self) -> Result<Self> {
        let mut copy = Self::zeroed(self.len, self.layout.align())?;
        copy.copy_from_slice(self);
        Ok(copy)
    }
}

impl<T> AlignedVec<T> {
    /// Alignment of the allocation in bytes.
    #[inline]
    pub fn alignment(&self) -> usize {
        self.layout.align()
    }
}

impl<T> Drop for AlignedVec<T> {
    fn drop(&mut self) {
        if self.layout.size() > 0 {
            // SAFETY: ptr came from alloc_zeroed with this exact layout.
            unsafe {
                dealloc(self.ptr.as_ptr() as *mut u8, self.layout);
            }
        }
    }
}

impl<T> Deref for AlignedVec<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &Self::Target {
        // SAFETY: ptr is valid for len initialized elements (or dangling with len 0).
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl<T> DerefMut for AlignedVec<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        // SAFETY: as in deref, and &mut self guarantees exclusivity.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T> fmt::Debug for AlignedVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedVec")
            .field("len", &self.len)
            .field("alignment", &self.layout.align())
            .finish()
    }
}
