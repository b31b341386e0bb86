use std::fmt;
use std::sync::atomic::{fence, AtomicUsize, Ordering};

use tracing::{debug, trace};

use crate::attr::RingBufferAttr;
use crate::error::{Error, Result};
use crate::index::{advance, resolve, split_span};
use crate::scalar::Scalar;
use crate::split::{Consumer, Producer};
use crate::storage::Storage;

/// Fixed-capacity ring buffer of fixed-size byte items
///
/// - `capacity` slots of `item_size` bytes, both fixed at construction
/// - FIFO `get`/`get_multi` plus non-consuming `get_by_index`
/// - optional override: a full buffer evicts its oldest items instead of failing
/// - storage either owned by the buffer or borrowed from the caller for `'a`
///
/// All methods on `&mut self` are single-threaded. For one writer thread and
/// one reader thread running at the same time, use [`RingBuffer::split`].
pub struct RingBuffer<'a> {
    storage: Storage<'a>,
    capacity: usize,
    item_size: usize,
    /// Next slot to write, owned by the writer
    head: AtomicUsize,
    /// Oldest unread slot, owned by the reader (and by the writer when evicting)
    tail: AtomicUsize,
    /// Items stored; the only state both sides touch concurrently
    count: AtomicUsize,
    override_on_full: bool,
    name: Option<String>,
    initialized: bool,
}

impl RingBuffer<'static> {
    /// Create a ring buffer that owns zero-filled storage
    ///
    /// # Arguments
    /// * `capacity` - Number of item slots
    /// * `attr` - Item size, override policy and label
    ///
    /// # Returns
    /// * `Ok(RingBuffer)` on success
    /// * `Err(Error::InvalidArgument)` if `capacity` or `item_size` is 0
    /// * `Err(Error::OutOfMemory)` if the storage cannot be allocated
    pub fn new(capacity: usize, attr: RingBufferAttr) -> Result<Self> {
        let mut rb = RingBuffer::uninit();
        rb.init(capacity, attr)?;
        Ok(rb)
    }
}

impl<'a> RingBuffer<'a> {
    /// Create a ring buffer over caller-provided storage
    ///
    /// The first `capacity * item_size` bytes of `region` are zero-filled and
    /// used as slots. The region stays borrowed until the buffer is dropped and
    /// is never freed by it.
    pub fn with_storage(capacity: usize, attr: RingBufferAttr, region: &'a mut [u8]) -> Result<Self> {
        let mut rb = RingBuffer::uninit();
        rb.init_with_storage(capacity, attr, region)?;
        Ok(rb)
    }

    /// An uninitialized buffer, usable in `const`/`static` context
    ///
    /// Every operation fails with [`Error::NotInitialized`] until
    /// [`init`](Self::init) or [`init_with_storage`](Self::init_with_storage)
    /// succeeds.
    pub const fn uninit() -> Self {
        RingBuffer {
            storage: Storage::unset(),
            capacity: 0,
            item_size: 0,
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            count: AtomicUsize::new(0),
            override_on_full: false,
            name: None,
            initialized: false,
        }
    }

    /// Set up an uninitialized buffer with self-allocated storage
    pub fn init(&mut self, capacity: usize, attr: RingBufferAttr) -> Result<()> {
        self.ensure_uninit()?;
        let bytes = layout_bytes(capacity, attr.item_size)?;
        let storage = Storage::allocate(bytes)?;
        self.install(storage, capacity, attr);
        Ok(())
    }

    /// Set up an uninitialized buffer over caller-provided storage
    pub fn init_with_storage(&mut self, capacity: usize, attr: RingBufferAttr, region: &'a mut [u8]) -> Result<()> {
        self.ensure_uninit()?;
        let bytes = layout_bytes(capacity, attr.item_size)?;
        let storage = Storage::borrow(region, bytes)?;
        self.install(storage, capacity, attr);
        Ok(())
    }

    fn install(&mut self, storage: Storage<'a>, capacity: usize, attr: RingBufferAttr) {
        debug!(
            name = attr.name.as_deref().unwrap_or("<unnamed>"),
            capacity,
            item_size = attr.item_size,
            override_on_full = attr.override_on_full,
            borrowed = storage.is_borrowed(),
            "ring buffer initialized"
        );
        self.storage = storage;
        self.capacity = capacity;
        self.item_size = attr.item_size;
        *self.head.get_mut() = 0;
        *self.tail.get_mut() = 0;
        *self.count.get_mut() = 0;
        self.override_on_full = attr.override_on_full;
        self.name = attr.name;
        self.initialized = true;
    }

    #[inline]
    fn ensure_init(&self) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(Error::NotInitialized)
        }
    }

    fn ensure_uninit(&self) -> Result<()> {
        if self.initialized {
            Err(Error::AlreadyInitialized)
        } else {
            Ok(())
        }
    }

    /// Append one item
    ///
    /// # Returns
    /// * `Ok(())` once the item is stored (possibly evicting the oldest one)
    /// * `Err(Error::Full)` if full and override is disabled; nothing changes
    /// * `Err(Error::InvalidArgument)` if `item.len() != item_size`
    pub fn add(&mut self, item: &[u8]) -> Result<()> {
        self.ensure_init()?;
        self.check_item(item.len())?;
        // Safety: `&mut self` excludes every other accessor
        let status = unsafe { self.write_items(item) };
        status.map_err(full_for_single)
    }

    /// Append `items.len() / item_size` items, all or nothing
    ///
    /// Without override, a request larger than the free space returns
    /// [`Error::InsufficientSpace`] and leaves the buffer untouched. With
    /// override, the oldest items are evicted to make room. A request larger
    /// than the whole capacity is always rejected.
    pub fn add_multi(&mut self, items: &[u8]) -> Result<()> {
        self.ensure_init()?;
        self.check_items(items.len())?;
        // Safety: `&mut self` excludes every other accessor
        unsafe { self.write_items(items) }
    }

    /// Remove the oldest item into `out`
    ///
    /// On any error `out` is left untouched.
    pub fn get(&mut self, out: &mut [u8]) -> Result<()> {
        self.ensure_init()?;
        self.check_item(out.len())?;
        // Safety: `&mut self` excludes every other accessor
        let status = unsafe { self.read_items(out) };
        status.map_err(empty_for_single)
    }

    /// Remove the `out.len() / item_size` oldest items, all or nothing
    pub fn get_multi(&mut self, out: &mut [u8]) -> Result<()> {
        self.ensure_init()?;
        self.check_items(out.len())?;
        // Safety: `&mut self` excludes every other accessor
        unsafe { self.read_items(out) }
    }

    /// Copy the item at a historical index without consuming it
    ///
    /// `0..capacity` counts forward from the oldest retained item,
    /// `-1..=-capacity` counts backward from the most recent write. The slot
    /// is copied whether or not it currently holds a live item.
    ///
    /// # Returns
    /// * `Err(Error::InvalidIndex)` for indices outside `[-capacity, capacity)`
    pub fn get_by_index(&self, out: &mut [u8], index: isize) -> Result<()> {
        self.ensure_init()?;
        self.check_item(out.len())?;
        let slot = resolve(
            index,
            self.tail.load(Ordering::Relaxed),
            self.head.load(Ordering::Relaxed),
            self.capacity,
        )?;
        // Safety: `&self` outside of a split cannot race a write path
        unsafe { self.storage.read(slot * self.item_size, out) };
        Ok(())
    }

    /// Drop all items and zero the storage; layout and policy are kept
    pub fn reset(&mut self) -> Result<()> {
        self.ensure_init()?;
        self.storage.zero();
        *self.head.get_mut() = 0;
        *self.tail.get_mut() = 0;
        *self.count.get_mut() = 0;
        debug!(name = self.label(), "ring buffer reset");
        Ok(())
    }

    /// Split into a writer handle and a reader handle usable from two threads
    ///
    /// # Returns
    /// * `Err(Error::SplitWithOverride)` if override is enabled, since eviction
    ///   moves the reader's cursor from the writer side
    pub fn split(&mut self) -> Result<(Producer<'_, 'a>, Consumer<'_, 'a>)> {
        self.ensure_init()?;
        if self.override_on_full {
            return Err(Error::SplitWithOverride);
        }
        debug!(name = self.label(), "ring buffer split into producer and consumer");
        let rb: &RingBuffer<'a> = self;
        Ok((Producer::new(rb), Consumer::new(rb)))
    }

    /// Append one scalar; `item_size` must equal `size_of::<T>()`
    pub fn add_scalar<T: Scalar>(&mut self, value: T) -> Result<()> {
        self.add(value.into_bytes().as_ref())
    }

    /// Remove the oldest item as a scalar
    pub fn get_scalar<T: Scalar>(&mut self) -> Result<T> {
        let mut bytes = T::Bytes::default();
        self.get(bytes.as_mut())?;
        Ok(T::from_bytes(bytes))
    }

    /// Read a scalar at a historical index without consuming it
    pub fn get_scalar_by_index<T: Scalar>(&self, index: isize) -> Result<T> {
        let mut bytes = T::Bytes::default();
        self.get_by_index(bytes.as_mut(), index)?;
        Ok(T::from_bytes(bytes))
    }

    /// Whether setup has completed
    pub fn is_init(&self) -> bool {
        self.initialized
    }

    /// Diagnostic label, if any
    pub fn name(&self) -> Result<Option<&str>> {
        self.ensure_init()?;
        Ok(self.name.as_deref())
    }

    /// Capacity in items
    pub fn capacity(&self) -> Result<usize> {
        self.ensure_init()?;
        Ok(self.capacity)
    }

    /// Size of one item in bytes
    pub fn item_size(&self) -> Result<usize> {
        self.ensure_init()?;
        Ok(self.item_size)
    }

    /// Whether a full buffer evicts instead of failing
    pub fn override_on_full(&self) -> Result<bool> {
        self.ensure_init()?;
        Ok(self.override_on_full)
    }

    /// Number of stored items
    pub fn taken(&self) -> Result<usize> {
        self.ensure_init()?;
        Ok(self.count.load(Ordering::Relaxed))
    }

    /// Number of free slots
    pub fn free(&self) -> Result<usize> {
        Ok(self.capacity - self.taken()?)
    }

    /// `taken() == capacity()`
    pub fn is_full(&self) -> Result<bool> {
        Ok(self.taken()? == self.capacity)
    }

    /// `taken() == 0`
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.taken()? == 0)
    }

    #[cfg(test)]
    pub(crate) fn cursors(&self) -> (usize, usize) {
        (self.head.load(Ordering::Relaxed), self.tail.load(Ordering::Relaxed))
    }

    fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }

    #[inline]
    pub(crate) fn check_item(&self, len: usize) -> Result<()> {
        if len != self.item_size {
            return Err(Error::InvalidArgument("item length must equal item_size"));
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn check_items(&self, len: usize) -> Result<()> {
        if len == 0 || len % self.item_size != 0 {
            return Err(Error::InvalidArgument("length must be a non-zero multiple of item_size"));
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn stored(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn slots(&self) -> usize {
        self.capacity
    }

    /// Writer half of the element-count protocol.
    ///
    /// Copy into the slots at `head`, publish with a release fence, then bump
    /// `count` and move `head`. With override the oldest items are evicted by
    /// moving `tail`, and `count` grows by at most the free slots it had.
    ///
    /// # Safety
    /// The caller must be the only thread on a write path. With override
    /// enabled, no read path may run concurrently either.
    pub(crate) unsafe fn write_items(&self, items: &[u8]) -> Result<()> {
        let n = items.len() / self.item_size;
        let free = self.capacity - self.count.load(Ordering::Relaxed);
        if n > free && (!self.override_on_full || n > self.capacity) {
            return Err(Error::InsufficientSpace { requested: n, free });
        }
        // Slots handed back by the reader must be fully copied out before reuse
        fence(Ordering::Acquire);

        let head = self.head.load(Ordering::Relaxed);
        self.copy_in(head, n, items);

        let evicted = n.saturating_sub(free);
        if evicted > 0 {
            let tail = self.tail.load(Ordering::Relaxed);
            self.tail.store(advance(tail, self.capacity, evicted), Ordering::Relaxed);
            trace!(name = self.label(), evicted, "override evicted oldest items");
        }

        fence(Ordering::Release);
        self.count.fetch_add(n - evicted, Ordering::Relaxed);
        self.head.store(advance(head, self.capacity, n), Ordering::Relaxed);
        Ok(())
    }

    /// Reader half of the element-count protocol.
    ///
    /// Observe `count`, acquire the writer's bytes, copy out, then release the
    /// slots by decrementing `count` and moving `tail`.
    ///
    /// # Safety
    /// The caller must be the only thread on a read path, and no override
    /// write may run concurrently.
    pub(crate) unsafe fn read_items(&self, out: &mut [u8]) -> Result<()> {
        let n = out.len() / self.item_size;
        let available = self.count.load(Ordering::Relaxed);
        if available < n {
            return Err(Error::InsufficientData { requested: n, available });
        }
        fence(Ordering::Acquire);

        let tail = self.tail.load(Ordering::Relaxed);
        self.copy_out(tail, n, out);

        fence(Ordering::Release);
        self.count.fetch_sub(n, Ordering::Relaxed);
        self.tail.store(advance(tail, self.capacity, n), Ordering::Relaxed);
        Ok(())
    }

    /// Two-part copy of `n` items into the slots starting at `start`.
    unsafe fn copy_in(&self, start: usize, n: usize, items: &[u8]) {
        let (first, second) = split_span(start, n, self.capacity);
        let split_at = first * self.item_size;
        self.storage.write(start * self.item_size, &items[..split_at]);
        if second > 0 {
            self.storage.write(0, &items[split_at..]);
        }
    }

    /// Two-part copy of `n` items out of the slots starting at `start`.
    unsafe fn copy_out(&self, start: usize, n: usize, out: &mut [u8]) {
        let (first, second) = split_span(start, n, self.capacity);
        let split_at = first * self.item_size;
        let (front, back) = out.split_at_mut(split_at);
        self.storage.read(start * self.item_size, front);
        if second > 0 {
            self.storage.read(0, back);
        }
    }
}

impl Default for RingBuffer<'_> {
    fn default() -> Self {
        RingBuffer::uninit()
    }
}

impl fmt::Debug for RingBuffer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("name", &self.name)
            .field("initialized", &self.initialized)
            .field("capacity", &self.capacity)
            .field("item_size", &self.item_size)
            .field("head", &self.head)
            .field("tail", &self.tail)
            .field("count", &self.count)
            .field("override_on_full", &self.override_on_full)
            .field("borrowed", &self.storage.is_borrowed())
            .finish()
    }
}

fn layout_bytes(capacity: usize, item_size: usize) -> Result<usize> {
    if capacity == 0 {
        return Err(Error::InvalidArgument("capacity must be non-zero"));
    }
    if item_size == 0 {
        return Err(Error::InvalidArgument("item_size must be non-zero"));
    }
    // the negative index range must fit in an isize
    if capacity > isize::MAX as usize {
        return Err(Error::InvalidArgument("capacity too large"));
    }
    capacity
        .checked_mul(item_size)
        .ok_or(Error::InvalidArgument("capacity * item_size overflows"))
}

pub(crate) fn full_for_single(err: Error) -> Error {
    match err {
        Error::InsufficientSpace { .. } => Error::Full,
        other => other,
    }
}

pub(crate) fn empty_for_single(err: Error) -> Error {
    match err {
        Error::InsufficientData { .. } => Error::Empty,
        other => other,
    }
}
