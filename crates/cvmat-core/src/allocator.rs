use std::alloc;
use std::alloc::Layout;

use thiserror::Error;

/// An error type for mat allocator operations.
#[derive(Debug, Error, PartialEq)]
pub enum MatAllocatorError {
    /// The requested layout is invalid for the allocator.
    #[error("Invalid mat layout {0}")]
    LayoutError(core::alloc::LayoutError),

    /// The allocator returned a null pointer.
    #[error("Null pointer")]
    NullPointer,
}

/// A trait for allocating and deallocating the memory backing a [`crate::Mat`].
///
/// # Safety
///
/// The allocator must be thread-safe and must return zero-initialized memory
/// from [`MatAllocator::alloc_zeroed`].
pub trait MatAllocator: Clone + Send + Sync + 'static {
    /// Allocates zero-initialized memory with the given layout.
    fn alloc_zeroed(&self, layout: Layout) -> Result<*mut u8, MatAllocatorError>;

    /// Deallocates memory previously returned by this allocator.
    fn dealloc(&self, ptr: *mut u8, layout: Layout);
}

/// A mat allocator that uses the system allocator.
#[derive(Clone, Copy, Debug, Default)]
pub struct CpuAllocator;

impl MatAllocator for CpuAllocator {
    /// Allocates zero-initialized memory for a mat with the given layout.
    ///
    /// # Arguments
    ///
    /// * `layout` - The layout of the mat buffer. Must have a non-zero size.
    ///
    /// # Returns
    ///
    /// A non-null pointer to the allocated memory if successful, otherwise an error.
    fn alloc_zeroed(&self, layout: Layout) -> Result<*mut u8, MatAllocatorError> {
        let ptr = unsafe { alloc::alloc_zeroed(layout) };
        if ptr.is_null() {
            Err(MatAllocatorError::NullPointer)?
        }
        Ok(ptr)
    }

    /// Deallocates memory for a mat with the given layout.
    ///
    /// # Safety
    ///
    /// The pointer must come from [`CpuAllocator::alloc_zeroed`] with the same layout.
    #[allow(clippy::not_unsafe_ptr_arg_deref)]
    fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        if !ptr.is_null() {
            unsafe { alloc::dealloc(ptr, layout) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_allocator() -> Result<(), MatAllocatorError> {
        let allocator = CpuAllocator;
        let layout = Layout::from_size_align(1024, 64).map_err(MatAllocatorError::LayoutError)?;
        let ptr = allocator.alloc_zeroed(layout)?;
        let bytes = unsafe { std::slice::from_raw_parts(ptr, 1024) };
        assert!(bytes.iter().all(|&b| b == 0));
        allocator.dealloc(ptr, layout);
        Ok(())
    }
}
