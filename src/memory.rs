use std::{
    alloc::{GlobalAlloc, Layout, System},
    fmt,
    sync::atomic::{AtomicUsize, Ordering},
};

/// Snapshot of the heap counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemoryStats {
    pub total_allocated: usize,
    pub total_freed: usize,
    pub allocation_count: usize,
    pub deallocation_count: usize,
}

impl MemoryStats {
    /// Bytes that are currently allocated
    pub fn used(&self) -> usize {
        self.total_allocated.saturating_sub(self.total_freed)
    }
}

impl fmt::Display for MemoryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "allocated {} B, freed {} B, in use {} B, {} allocations, {} deallocations",
            self.total_allocated,
            self.total_freed,
            self.used(),
            self.allocation_count,
            self.deallocation_count
        )
    }
}

pub trait AllocationTracker {
    fn record_alloc(&self, size: usize);
    fn record_dealloc(&self, size: usize);
    fn stats(&self) -> MemoryStats;
}

/// Logs the counters of `tracker` and returns the snapshot that was logged
pub fn report(tracker: &dyn AllocationTracker) -> MemoryStats {
    let stats = tracker.stats();
    tracing::info!("memory: {stats}");
    if stats.used() > 0 {
        tracing::debug!(bytes = stats.used(), "heap still in use at shutdown");
    }
    stats
}

/// Wraps an allocator and counts the bytes and calls that pass through it.
///
/// Nothing is tracked unless the binary installs it with `#[global_allocator]`.
pub struct TrackingAllocator<A: GlobalAlloc = System> {
    inner: A,
    allocated: AtomicUsize,
    freed: AtomicUsize,
    allocations: AtomicUsize,
    deallocations: AtomicUsize,
}

impl TrackingAllocator<System> {
    pub const fn system() -> Self {
        Self::new(System)
    }
}

impl<A: GlobalAlloc> TrackingAllocator<A> {
    pub const fn new(inner: A) -> Self {
        Self {
            inner,
            allocated: AtomicUsize::new(0),
            freed: AtomicUsize::new(0),
            allocations: AtomicUsize::new(0),
            deallocations: AtomicUsize::new(0),
        }
    }
}

impl<A: GlobalAlloc> AllocationTracker for TrackingAllocator<A> {
    fn record_alloc(&self, size: usize) {
        self.allocated.fetch_add(size, Ordering::Relaxed);
        self.allocations.fetch_add(1, Ordering::Relaxed);
    }

    fn record_dealloc(&self, size: usize) {
        self.freed.fetch_add(size, Ordering::Relaxed);
        self.deallocations.fetch_add(1, Ordering::Relaxed);
    }

    fn stats(&self) -> MemoryStats {
        MemoryStats {
            total_allocated: self.allocated.load(Ordering::Relaxed),
            total_freed: self.freed.load(Ordering::Relaxed),
            allocation_count: self.allocations.load(Ordering::Relaxed),
            deallocation_count: self.deallocations.load(Ordering::Relaxed),
        }
    }
}

// Counters must not allocate, only atomics are touched here
unsafe impl<A: GlobalAlloc> GlobalAlloc for TrackingAllocator<A> {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = self.inner.alloc(layout);
        if !ptr.is_null() {
            self.record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = self.inner.alloc_zeroed(layout);
        if !ptr.is_null() {
            self.record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        self.inner.dealloc(ptr, layout);
        self.record_dealloc(layout.size());
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = self.inner.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            self.record_dealloc(layout.size());
            self.record_alloc(new_size);
        }
        new_ptr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_allocations() {
        let tracker = TrackingAllocator::system();
        let layout = Layout::from_size_align(64, 8).unwrap();

        unsafe {
            let ptr = tracker.alloc(layout);
            assert!(!ptr.is_null());
            assert_eq!(tracker.stats().used(), 64);

            let ptr = tracker.realloc(ptr, layout, 128);
            assert!(!ptr.is_null());
            tracker.dealloc(ptr, Layout::from_size_align(128, 8).unwrap());
        }

        assert_eq!(
            tracker.stats(),
            MemoryStats {
                total_allocated: 192,
                total_freed: 192,
                allocation_count: 2,
                deallocation_count: 2,
            }
        );
        assert_eq!(tracker.stats().used(), 0);
    }

    #[derive(Default)]
    struct CountingTracker {
        stats: std::cell::Cell<MemoryStats>,
    }

    impl AllocationTracker for CountingTracker {
        fn record_alloc(&self, size: usize) {
            let mut stats = self.stats.get();
            stats.total_allocated += size;
            stats.allocation_count += 1;
            self.stats.set(stats);
        }

        fn record_dealloc(&self, size: usize) {
            let mut stats = self.stats.get();
            stats.total_freed += size;
            stats.deallocation_count += 1;
            self.stats.set(stats);
        }

        fn stats(&self) -> MemoryStats {
            self.stats.get()
        }
    }

    #[test]
    fn report_reads_any_tracker() {
        let tracker = CountingTracker::default();
        tracker.record_alloc(100);
        tracker.record_alloc(20);
        tracker.record_dealloc(100);

        let stats = report(&tracker);
        assert_eq!(stats.used(), 20);
        assert_eq!(stats.allocation_count, 2);
        assert_eq!(stats.deallocation_count, 1);

        let allocator = TrackingAllocator::system();
        allocator.record_alloc(8);
        assert_eq!(report(&allocator).total_allocated, 8);
    }

    #[test]
    fn stats_display() {
        let stats = MemoryStats {
            total_allocated: 10,
            total_freed: 4,
            allocation_count: 2,
            deallocation_count: 1,
        };
        assert_eq!(
            stats.to_string(),
            "allocated 10 B, freed 4 B, in use 6 B, 2 allocations, 1 deallocations"
        );
    }
}
