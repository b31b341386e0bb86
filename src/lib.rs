//! # fixring - Fixed-item Ring Buffer
//!
//! A bounded circular buffer of fixed-size byte items for embedded and
//! general-purpose code where dynamic growth is undesirable.
//!
//! ## Design
//!
//! - Capacity and item size fixed at construction, storage owned or borrowed
//! - FIFO consumption (`get`, `get_multi`) and non-consuming historical access
//!   (`get_by_index`): `0..capacity` from the oldest item, `-1..=-capacity`
//!   back from the newest write
//! - Optional override: a full buffer evicts its oldest items instead of failing
//! - `add_multi`/`get_multi` are all or nothing, with a two-part copy when the
//!   span crosses the end of storage
//! - Single-producer/single-consumer without a lock: the element count is an
//!   atomic paired with release/acquire fences around the data copy
//! - Every operation is non-blocking and returns a [`Result`]
//!
//! ## Example
//!
//! ```
//! use fixring::{Error, RingBuffer, RingBufferAttr};
//!
//! // 4 slots of 4 bytes each
//! let mut rb = RingBuffer::new(4, RingBufferAttr::default().with_item_size(4)).unwrap();
//!
//! for v in [10u32, 20, 30, 40] {
//!     rb.add_scalar(v).unwrap();
//! }
//! assert_eq!(rb.add_scalar(50u32), Err(Error::Full));
//!
//! // Historical access does not consume
//! assert_eq!(rb.get_scalar_by_index::<u32>(-1), Ok(40));
//! assert_eq!(rb.get_scalar_by_index::<u32>(0), Ok(10));
//!
//! // FIFO consumption
//! assert_eq!(rb.get_scalar::<u32>(), Ok(10));
//! assert_eq!(rb.taken(), Ok(3));
//! ```
//!
//! ## Two threads
//!
//! ```
//! use fixring::{RingBuffer, RingBufferAttr};
//!
//! let mut rb = RingBuffer::new(8, RingBufferAttr::default()).unwrap();
//! let (mut tx, mut rx) = rb.split().unwrap();
//!
//! std::thread::scope(|s| {
//!     s.spawn(move || {
//!         for b in 0..100u8 {
//!             while tx.add(&[b]).is_err() {
//!                 std::hint::spin_loop();
//!             }
//!         }
//!     });
//!     let mut item = [0u8];
//!     for b in 0..100u8 {
//!         while rx.get(&mut item).is_err() {
//!             std::hint::spin_loop();
//!         }
//!         assert_eq!(item[0], b);
//!     }
//! });
//! ```

#![warn(missing_docs)]

mod attr;
mod error;
mod index;
mod ring_buffer;
mod scalar;
mod split;
mod storage;

pub use attr::RingBufferAttr;
pub use error::{Error, Result};
pub use index::is_valid_index;
pub use ring_buffer::RingBuffer;
pub use scalar::Scalar;
pub use split::{Consumer, Producer};
