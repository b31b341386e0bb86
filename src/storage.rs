//! Contiguous byte region backing the slots.
//!
//! The region is either allocated and owned by the buffer or borrowed from the
//! caller for `'a`. Either way it is accessed through a raw pointer so the
//! producer and consumer sides can copy into disjoint slots at the same time.

use std::marker::PhantomData;
use std::ptr::{self, NonNull};

use tracing::warn;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ownership {
    Unset,
    Owned,
    Borrowed,
}

pub(crate) struct Storage<'a> {
    data: NonNull<u8>,
    len: usize,
    ownership: Ownership,
    _region: PhantomData<&'a mut [u8]>,
}

// The pointer is either a uniquely owned allocation or derived from a unique
// `&'a mut [u8]`; concurrent access is coordinated by the ring buffer.
unsafe impl Send for Storage<'_> {}
unsafe impl Sync for Storage<'_> {}

impl<'a> Storage<'a> {
    pub(crate) const fn unset() -> Self {
        Storage {
            data: NonNull::dangling(),
            len: 0,
            ownership: Ownership::Unset,
            _region: PhantomData,
        }
    }

    /// Allocate `len` zeroed bytes, reporting allocation failure instead of aborting.
    pub(crate) fn allocate(len: usize) -> Result<Self> {
        let mut bytes: Vec<u8> = Vec::new();
        if bytes.try_reserve_exact(len).is_err() {
            warn!(bytes = len, "ring buffer storage allocation failed");
            return Err(Error::OutOfMemory { bytes: len });
        }
        bytes.resize(len, 0);

        let raw = Box::into_raw(bytes.into_boxed_slice());
        // Box never hands out a null pointer
        let data = NonNull::new(raw.cast::<u8>()).ok_or(Error::OutOfMemory { bytes: len })?;
        Ok(Storage {
            data,
            len,
            ownership: Ownership::Owned,
            _region: PhantomData,
        })
    }

    /// Borrow the first `len` bytes of a caller region for the buffer's lifetime.
    pub(crate) fn borrow(region: &'a mut [u8], len: usize) -> Result<Self> {
        if region.len() < len {
            return Err(Error::InvalidArgument("provided storage is smaller than capacity * item_size"));
        }
        let mut storage = Storage {
            data: NonNull::from(&mut region[..len]).cast::<u8>(),
            len,
            ownership: Ownership::Borrowed,
            _region: PhantomData,
        };
        storage.zero();
        Ok(storage)
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn is_borrowed(&self) -> bool {
        self.ownership == Ownership::Borrowed
    }

    pub(crate) fn zero(&mut self) {
        // Safety: `data` is valid for `len` bytes and we hold `&mut self`
        unsafe { ptr::write_bytes(self.data.as_ptr(), 0, self.len) }
    }

    /// Copy `src` into the region at byte `offset`.
    ///
    /// # Safety
    /// No other thread may access `offset..offset + src.len()` during the call.
    #[inline]
    pub(crate) unsafe fn write(&self, offset: usize, src: &[u8]) {
        debug_assert!(offset + src.len() <= self.len);
        ptr::copy_nonoverlapping(src.as_ptr(), self.data.as_ptr().add(offset), src.len());
    }

    /// Copy bytes at `offset` into `dst`.
    ///
    /// # Safety
    /// No other thread may write `offset..offset + dst.len()` during the call.
    #[inline]
    pub(crate) unsafe fn read(&self, offset: usize, dst: &mut [u8]) {
        debug_assert!(offset + dst.len() <= self.len);
        ptr::copy_nonoverlapping(self.data.as_ptr().add(offset), dst.as_mut_ptr(), dst.len());
    }
}

impl Drop for Storage<'_> {
    fn drop(&mut self) {
        if self.ownership == Ownership::Owned {
            // Safety: produced by `Box::into_raw` in `allocate` with this exact length
            unsafe {
                let slice = ptr::slice_from_raw_parts_mut(self.data.as_ptr(), self.len);
                drop(Box::from_raw(slice));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_zeroed() {
        let storage = Storage::allocate(16).unwrap();
        let mut out = [0xFFu8; 16];
        unsafe { storage.read(0, &mut out) };
        assert_eq!(out, [0u8; 16]);
        assert!(!storage.is_borrowed());
    }

    #[test]
    fn test_borrow_zeroes_prefix_only() {
        let mut region = [0xAAu8; 10];
        {
            let storage = Storage::borrow(&mut region, 8).unwrap();
            assert!(storage.is_borrowed());
            assert_eq!(storage.len(), 8);
            unsafe { storage.write(2, &[1, 2, 3]) };
        }
        assert_eq!(region, [0, 0, 1, 2, 3, 0, 0, 0, 0xAA, 0xAA]);
    }

    #[test]
    fn test_borrow_too_small() {
        let mut region = [0u8; 4];
        assert!(matches!(
            Storage::borrow(&mut region, 5),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_allocate_huge_reports_oom() {
        assert_eq!(
            Storage::allocate(usize::MAX).err(),
            Some(Error::OutOfMemory { bytes: usize::MAX })
        );
    }
}
