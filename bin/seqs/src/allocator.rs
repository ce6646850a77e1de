//! The global allocator: jemalloc on unix when the `jemalloc` feature is enabled, the system
//! allocator otherwise.

#[cfg(all(feature = "jemalloc", unix))]
type AllocatorInner = tikv_jemallocator::Jemalloc;
#[cfg(not(all(feature = "jemalloc", unix)))]
type AllocatorInner = std::alloc::System;

/// The process allocator.
pub(crate) type Allocator = AllocatorInner;

/// Returns the [process allocator][Allocator].
pub(crate) const fn new_allocator() -> Allocator {
    AllocatorInner {}
}
