//! Sub-allocators over an [`Arena`] (spec.md §4.1).
//!
//! A `Region` is where a mutator actually allocates from — every BST/HAMT/
//! structmap `insert`/`delete`/`remove`/`condense` call opens one internally
//! (via [`Region::scratch`]) and allocates every node and header through it,
//! rather than reaching into the arena directly. The common case — one
//! mutation appending to the live end of the arena — is a non-final,
//! forward region with no fixed limit; the `*_in_region` entry point on
//! each container lets a caller supply a bounded or reversed region instead
//! (a garbage-collection output area, or a test exercising allocation
//! failure, spec.md §8 scenario 6).

use crate::arena::{offset_cmp, Arena, Offset};
use crate::error::{PatchError, Result};
use std::cmp::Ordering;

/// Growth direction and exhaustion policy for a [`Region`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegionFlags {
    /// Cursor moves down; allocations return monotonically decreasing
    /// offsets. Used by GC compaction passes that build a result arena from
    /// the high end down.
    pub reversed: bool,
    /// Exhaustion is fatal — the region does not request more space from
    /// the arena. Used for bounded-capacity regions (tests, GC output
    /// areas with a known upper bound).
    pub is_final: bool,
}

/// A bounded-or-extendable allocation policy scoped to one mutation.
///
/// A forward region's `cursor` starts at `start` and increases toward
/// `end` (unbounded unless `is_final`). A reversed region pre-reserves its
/// whole `[start, end)` span up front — so every byte in it already exists
/// and `Arena::write` may target any offset inside — and its `cursor`
/// starts at `end` and decreases toward `start`, handing out monotonically
/// decreasing offsets (spec.md §4.1's `REVERSED` flag).
pub struct Region {
    start: Offset,
    end: Offset,
    cursor: Offset,
    flags: RegionFlags,
}

impl Region {
    /// A forward, extendable region starting at the arena's current cursor.
    /// This is what every BST/HAMT/structmap mutation uses by default.
    #[must_use]
    pub fn scratch(arena: &Arena) -> Self {
        let here = arena.cursor();
        Self {
            start: here,
            end: here,
            cursor: here,
            flags: RegionFlags::default(),
        }
    }

    /// A forward region that fails rather than growing past `limit` bytes
    /// beyond its start — spec.md §4.1's `FINAL` flag. Used by tests that
    /// exercise allocation-failure atomicity.
    #[must_use]
    pub fn bounded(arena: &Arena, limit: usize) -> Self {
        let start = arena.cursor();
        let end = start + limit as Offset;
        Self {
            start,
            end,
            cursor: start,
            flags: RegionFlags { reversed: false, is_final: true },
        }
    }

    /// A final, reverse-growing region: pre-reserves `limit` bytes forward
    /// in `arena` (so the whole span is real, written-to-able memory), then
    /// hands out offsets from the top of that span down, per allocation.
    /// Exhaustion — running past `start` — is `AllocationFailure`, the same
    /// as a forward-final region.
    pub fn bounded_reversed(arena: &mut Arena, limit: usize) -> Result<Self> {
        let start = arena.memalign(limit, 1)?;
        let end = start + limit as Offset;
        Ok(Self {
            start,
            end,
            cursor: end,
            flags: RegionFlags { reversed: true, is_final: true },
        })
    }

    /// The offset this region began allocating from — the value a caller
    /// should rewind the arena to on failure (meaningless, and unused, for
    /// a reversed region: its span was already committed up front and
    /// nothing in it is visible until the region's owner publishes a root
    /// that points into it).
    #[must_use]
    pub fn entry_offset(&self) -> Offset {
        self.start
    }

    fn would_exceed_forward(&self, projected_end: Offset) -> bool {
        self.flags.is_final && offset_cmp(projected_end, self.end) == Ordering::Greater
    }

    fn would_exceed_reverse(&self, projected_start: Offset) -> bool {
        offset_cmp(projected_start, self.start) == Ordering::Less
    }

    /// Allocates a `T`-sized, `T`-aligned value from `arena` through this
    /// region's policy.
    pub fn alloc<T: Copy>(&mut self, arena: &mut Arena, value: T) -> Result<Offset> {
        let size = std::mem::size_of::<T>() as Offset;
        let align = std::mem::align_of::<T>() as Offset;
        if self.flags.reversed {
            let aligned = (self.cursor.saturating_sub(size)) & !(align - 1);
            if self.would_exceed_reverse(aligned) {
                return Err(PatchError::AllocationFailure { requested: size as usize });
            }
            arena.write(aligned, value);
            self.cursor = aligned;
            return Ok(aligned);
        }
        if self.flags.is_final {
            let cur = arena.cursor();
            let aligned = (cur + align - 1) & !(align - 1);
            let projected = aligned + size;
            if self.would_exceed_forward(projected) {
                return Err(PatchError::AllocationFailure { requested: size as usize });
            }
        }
        let off = arena.alloc(value)?;
        if offset_cmp(arena.cursor(), self.end) == Ordering::Greater {
            self.end = arena.cursor();
        }
        self.cursor = off;
        Ok(off)
    }

    /// Allocates a contiguous block of `values` through this region's
    /// policy. See [`Arena::alloc_slice`].
    pub fn alloc_slice<T: Copy>(&mut self, arena: &mut Arena, values: &[T]) -> Result<Option<Offset>> {
        if values.is_empty() {
            return Ok(None);
        }
        let elem = std::mem::size_of::<T>();
        let total = (elem * values.len()) as Offset;
        let align = std::mem::align_of::<T>() as Offset;
        if self.flags.reversed {
            let aligned = (self.cursor.saturating_sub(total)) & !(align - 1);
            if self.would_exceed_reverse(aligned) {
                return Err(PatchError::AllocationFailure { requested: total as usize });
            }
            for (i, v) in values.iter().enumerate() {
                arena.write(aligned + (i * elem) as Offset, *v);
            }
            self.cursor = aligned;
            return Ok(Some(aligned));
        }
        if self.flags.is_final {
            let cur = arena.cursor();
            let aligned = (cur + align - 1) & !(align - 1);
            let projected = aligned + total;
            if self.would_exceed_forward(projected) {
                return Err(PatchError::AllocationFailure { requested: total as usize });
            }
        }
        let off = arena.alloc_slice(values)?;
        if offset_cmp(arena.cursor(), self.end) == Ordering::Greater {
            self.end = arena.cursor();
        }
        if let Some(off) = off {
            self.cursor = off;
        }
        Ok(off)
    }
}
