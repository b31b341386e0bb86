//! Single-producer / single-consumer handles.
//!
//! Both handles borrow the same [`RingBuffer`] and may live on different
//! threads. The producer only moves `head`, the consumer only moves `tail`,
//! and the element count is the single synchronization point between them.
//! Splitting is refused for override-enabled buffers, so the writer never
//! touches the reader's cursor while split.

use crate::error::Result;
use crate::ring_buffer::{empty_for_single, full_for_single, RingBuffer};
use crate::scalar::Scalar;

/// Writer side of a split ring buffer
#[derive(Debug)]
pub struct Producer<'b, 'a> {
    rb: &'b RingBuffer<'a>,
}

impl<'b, 'a> Producer<'b, 'a> {
    pub(crate) fn new(rb: &'b RingBuffer<'a>) -> Self {
        Producer { rb }
    }

    /// Append one item, `Err(Error::Full)` when no slot is free
    pub fn add(&mut self, item: &[u8]) -> Result<()> {
        self.rb.check_item(item.len())?;
        // Safety: `&mut self` on the only producer; override is off
        let status = unsafe { self.rb.write_items(item) };
        status.map_err(full_for_single)
    }

    /// Append several items at once or none of them
    pub fn add_multi(&mut self, items: &[u8]) -> Result<()> {
        self.rb.check_items(items.len())?;
        // Safety: `&mut self` on the only producer; override is off
        unsafe { self.rb.write_items(items) }
    }

    /// Append one scalar
    pub fn add_scalar<T: Scalar>(&mut self, value: T) -> Result<()> {
        self.add(value.into_bytes().as_ref())
    }

    /// Free slots as seen by the producer; may grow concurrently
    pub fn free(&self) -> usize {
        self.rb.slots() - self.rb.stored()
    }

    /// No slot free at the moment of the call
    pub fn is_full(&self) -> bool {
        self.free() == 0
    }
}

/// Reader side of a split ring buffer
#[derive(Debug)]
pub struct Consumer<'b, 'a> {
    rb: &'b RingBuffer<'a>,
}

impl<'b, 'a> Consumer<'b, 'a> {
    pub(crate) fn new(rb: &'b RingBuffer<'a>) -> Self {
        Consumer { rb }
    }

    /// Remove the oldest item, `Err(Error::Empty)` when nothing is stored
    pub fn get(&mut self, out: &mut [u8]) -> Result<()> {
        self.rb.check_item(out.len())?;
        // Safety: `&mut self` on the only consumer; override is off
        let status = unsafe { self.rb.read_items(out) };
        status.map_err(empty_for_single)
    }

    /// Remove several items at once or none of them
    pub fn get_multi(&mut self, out: &mut [u8]) -> Result<()> {
        self.rb.check_items(out.len())?;
        // Safety: `&mut self` on the only consumer; override is off
        unsafe { self.rb.read_items(out) }
    }

    /// Remove the oldest item as a scalar
    pub fn get_scalar<T: Scalar>(&mut self) -> Result<T> {
        let mut bytes = T::Bytes::default();
        self.get(bytes.as_mut())?;
        Ok(T::from_bytes(bytes))
    }

    /// Items stored as seen by the consumer; may grow concurrently
    pub fn taken(&self) -> usize {
        self.rb.stored()
    }

    /// Nothing stored at the moment of the call
    pub fn is_empty(&self) -> bool {
        self.taken() == 0
    }
}
