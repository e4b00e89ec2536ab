use std::{alloc::Layout, ptr::NonNull};

use crate::allocator::{CpuAllocator, MatAllocator, MatAllocatorError};

/// Alignment of freshly allocated mat buffers, enough for any element depth.
const MAT_ALIGN: usize = 16;

/// Owned byte buffer backing a [`crate::Mat`].
///
/// The buffer either comes from a [`MatAllocator`] or is a caller vector moved
/// in without copying. In both cases the memory is released exactly once, when
/// the storage is dropped.
///
/// # Fields
///
/// * `ptr` - Pointer to the first byte. Dangling when `len == 0`.
/// * `len` - Number of initialized bytes.
/// * `layout` - Layout the memory was allocated with.
/// * `alloc` - Allocator to release the memory with, `None` for zero-sized buffers.
pub struct MatStorage<A: MatAllocator = CpuAllocator> {
    ptr: NonNull<u8>,
    len: usize,
    layout: Layout,
    alloc: Option<A>,
}

// Safety:
// MatStorage owns its memory exclusively, mutation requires `&mut self`.
unsafe impl<A: MatAllocator> Send for MatStorage<A> {}
unsafe impl<A: MatAllocator> Sync for MatStorage<A> {}

impl<A: MatAllocator> MatStorage<A> {
    /// Allocates a zero-initialized buffer of `len` bytes.
    ///
    /// # Arguments
    ///
    /// * `len` - The number of bytes to allocate.
    /// * `alloc` - The allocator used to allocate the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout is invalid or the allocation fails.
    pub fn zeros(len: usize, alloc: A) -> Result<Self, MatAllocatorError> {
        let layout =
            Layout::from_size_align(len, MAT_ALIGN).map_err(MatAllocatorError::LayoutError)?;

        if len == 0 {
            return Ok(Self {
                ptr: NonNull::dangling(),
                len,
                layout,
                alloc: None,
            });
        }

        let ptr = NonNull::new(alloc.alloc_zeroed(layout)?).ok_or(MatAllocatorError::NullPointer)?;

        Ok(Self {
            ptr,
            len,
            layout,
            alloc: Some(alloc),
        })
    }

    /// Returns the number of bytes in the buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the buffer holds no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the layout of the buffer.
    #[inline]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Returns the pointer to the first byte.
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr() as *const u8
    }

    /// Returns the mutable pointer to the first byte.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    /// Returns the buffer as a byte slice.
    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: ptr is valid for len initialized bytes (or dangling with len 0)
        unsafe { std::slice::from_raw_parts(self.as_ptr(), self.len) }
    }

    /// Returns the buffer as a mutable byte slice.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: ptr is valid for len initialized bytes and exclusively borrowed
        unsafe { std::slice::from_raw_parts_mut(self.as_mut_ptr(), self.len) }
    }
}

impl MatStorage<CpuAllocator> {
    /// Takes ownership of a vector without copying its bytes.
    ///
    /// The vector's own layout is kept so that the memory is returned to the
    /// global allocator unchanged.
    pub fn from_vec(value: Vec<u8>) -> Self {
        let mut value = std::mem::ManuallyDrop::new(value);
        let len = value.len();
        let capacity = value.capacity();
        // Safety
        // Vec::as_mut_ptr guaranteed to not be null
        let ptr = unsafe { NonNull::new_unchecked(value.as_mut_ptr()) };
        // Safety
        // Vec guaranteed to have a valid layout matching that of `Layout::array`
        let layout = unsafe { Layout::array::<u8>(capacity).unwrap_unchecked() };

        Self {
            ptr,
            len,
            layout,
            alloc: (capacity > 0).then_some(CpuAllocator),
        }
    }
}

impl<A: MatAllocator> Drop for MatStorage<A> {
    fn drop(&mut self) {
        if let Some(alloc) = self.alloc.take() {
            alloc.dealloc(self.ptr.as_ptr(), self.layout);
        }
    }
}

impl<A: MatAllocator> std::fmt::Debug for MatStorage<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatStorage")
            .field("ptr", &self.ptr)
            .field("len", &self.len)
            .field("layout", &self.layout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicIsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_storage_zeros() -> Result<(), MatAllocatorError> {
        let storage = MatStorage::zeros(1024, CpuAllocator)?;
        assert_eq!(storage.len(), 1024);
        assert_eq!(storage.layout().align(), MAT_ALIGN);
        assert!(storage.as_slice().iter().all(|&b| b == 0));
        Ok(())
    }

    #[test]
    fn test_storage_zero_len() -> Result<(), MatAllocatorError> {
        let storage = MatStorage::zeros(0, CpuAllocator)?;
        assert!(storage.is_empty());
        assert_eq!(storage.as_slice(), &[] as &[u8]);
        Ok(())
    }

    #[test]
    fn test_storage_from_vec_no_copy() {
        let vec = vec![1u8, 2, 3, 4, 5];
        let vec_ptr = vec.as_ptr();
        let storage = MatStorage::from_vec(vec);
        assert_eq!(storage.as_ptr(), vec_ptr);
        assert_eq!(storage.as_slice(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_storage_mutability() {
        let mut storage = MatStorage::from_vec(vec![1u8, 2, 3]);
        storage.as_mut_slice()[0] = 10;
        assert_eq!(storage.as_slice(), &[10, 2, 3]);
    }

    #[test]
    fn test_storage_lifecycle() -> Result<(), MatAllocatorError> {
        /// A simple allocator that counts the number of bytes allocated and deallocated.
        #[derive(Clone)]
        struct TestAllocator {
            bytes_allocated: Arc<AtomicIsize>,
        }

        impl MatAllocator for TestAllocator {
            fn alloc_zeroed(&self, layout: Layout) -> Result<*mut u8, MatAllocatorError> {
                self.bytes_allocated
                    .fetch_add(layout.size() as isize, Ordering::SeqCst);
                CpuAllocator.alloc_zeroed(layout)
            }
            fn dealloc(&self, ptr: *mut u8, layout: Layout) {
                self.bytes_allocated
                    .fetch_sub(layout.size() as isize, Ordering::SeqCst);
                CpuAllocator.dealloc(ptr, layout)
            }
        }

        let allocator = TestAllocator {
            bytes_allocated: Arc::new(AtomicIsize::new(0)),
        };

        {
            let _storage = MatStorage::zeros(256, allocator.clone())?;
            assert_eq!(allocator.bytes_allocated.load(Ordering::SeqCst), 256);
        }
        assert_eq!(allocator.bytes_allocated.load(Ordering::SeqCst), 0);

        Ok(())
    }
}
