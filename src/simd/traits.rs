/// Checks pointer alignment for a vector type.
pub trait Alignment<T> {
    fn is_aligned(ptr: *const T) -> bool;
}

/// Loading a full lane of scalars from memory.
pub trait SimdLoad<T> {
    type Output;

    /// Loads exactly one lane, choosing aligned or unaligned access.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for `size` reads and `size` must equal the lane count.
    unsafe fn load(ptr: *const T, size: usize) -> Self::Output;

    /// # Safety
    ///
    /// `ptr` must be aligned to the vector width and valid for a full lane.
    unsafe fn load_aligned(ptr: *const T) -> Self::Output;

    /// # Safety
    ///
    /// `ptr` must be valid for a full lane.
    unsafe fn load_unaligned(ptr: *const T) -> Self::Output;
}

/// Accumulation primitives used by the convolution inner loop.
pub trait SimdAccumulate: Sized + Copy {
    /// A lane with every element set to zero.
    fn zeros() -> Self;

    /// Returns `self + a * b`, fused where the hardware allows it.
    fn fmadd(&self, a: Self, b: Self) -> Self;

    /// Sums all elements: the two halves are added first, then pairwise.
    fn reduce_add(&self) -> f32;
}
