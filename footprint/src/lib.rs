#![no_std]

//! Overlap and proximity queries over axis aligned squares.
//!
//! Entries are kept in a slice sorted by the x coordinate of their centre.
//! A query only ever has to look at the entries whose centre lies in an x-window around the probe,
//! which a binary search finds, everything inside the window gets checked exactly.
//! For the couple hundred entities of a pasture this beats building any kind of tree.


/// an axis aligned square.
/// `pos` is the corner with the smallest coordinates, so in screen space its the top left one.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Square {
    pub pos: [f64; 2],
    pub edge: f64,
}

impl Square {
    pub fn new(pos: [f64; 2], edge: f64) -> Self {
        Self { pos, edge }
    }

    pub fn center(&self) -> [f64; 2] {
        let half = self.edge / 2.;
        [self.pos[0] + half, self.pos[1] + half]
    }

    /// scales both squares by `ratio` around their own centres and checks if the results overlap.
    ///
    /// squares that merely touch do not overlap, squares without area never overlap anything.
    pub fn near(&self, other: &Square, ratio: f64) -> bool {
        if self.edge <= 0. || other.edge <= 0. || ratio <= 0. {
            return false;
        }
        let reach = (self.edge + other.edge) * ratio / 2.;
        let [ax, ay] = self.center();
        let [bx, by] = other.center();
        gap(ax, bx) < reach && gap(ay, by) < reach
    }

    pub fn overlaps(&self, other: &Square) -> bool {
        self.near(other, 1.)
    }
}

fn gap(a: f64, b: f64) -> f64 {
    if a > b { a - b } else { b - a }
}

fn reach<V>(base: &[(Square, V)]) -> f64 {
    base.iter().map(|(s, _)| s.edge).fold(0., f64::max)
}

/// a sweep slice, basically just a slice sorted by the x coordinate of the squares centre.
/// additionally it remembers the largest edge it contains, which bounds how far away (on the
/// x axis) a square can be while still touching a probe.
///
/// if you want to move elements just let this go out of scope, modify the base slice and rebuild
/// the sweep slice.
#[derive(PartialEq, Debug)]
pub struct SweepSlice<'a, V> {
    inner: &'a [(Square, V)],
    reach: f64,
}

impl<'a, V> SweepSlice<'a, V> {
    pub fn new(base: &'a mut [(Square, V)]) -> Self {
        base.sort_unstable_by(|a, b| a.0.center()[0].total_cmp(&b.0.center()[0]));
        Self::new_unchecked(base)
    }

    /// when calling this instead of new you guarantee that the base is already sorted by centre x.
    /// an unsorted base will result in missed entries, not unsafety
    pub fn new_unchecked(base: &'a [(Square, V)]) -> Self {
        Self {
            inner: base,
            reach: reach(base),
        }
    }

    /// the largest edge in this slice
    pub fn reach(&self) -> f64 {
        self.reach
    }

    /// index range of all entries whose centre x lies within `lo..=hi`
    pub fn window(&self, lo: f64, hi: f64) -> (usize, usize) {
        let start = self.inner.partition_point(|(s, _)| s.center()[0] < lo);
        // only search remainder, lo is <= hi
        let end = self.inner[start..].partition_point(|(s, _)| s.center()[0] <= hi);
        (start, start + end)
    }

    /// all entries that are [`Square::near`] the probe at the given ratio.
    ///
    /// results come in ascending order of centre x, the same query on the same slice always
    /// yields the same order.
    pub fn query_near(
        &self,
        probe: &Square,
        ratio: f64,
    ) -> impl Iterator<Item = &'a (Square, V)> + use<'a, V> {
        let probe = *probe;
        let half = (probe.edge + self.reach) * ratio / 2.;
        let cx = probe.center()[0];
        let (start, end) = if half > 0. {
            self.window(cx - half, cx + half)
        } else {
            (0, 0)
        };
        self.inner[start..end]
            .iter()
            .filter(move |(s, _)| probe.near(s, ratio))
    }

    /// all entries overlapping the probe
    pub fn query_overlap(
        &self,
        probe: &Square,
    ) -> impl Iterator<Item = &'a (Square, V)> + use<'a, V> {
        self.query_near(probe, 1.)
    }
}

impl<'a, V> core::ops::Deref for SweepSlice<'a, V> {
    type Target = &'a [(Square, V)];
    fn deref(&self) -> &&'a [(Square, V)] {
        &self.inner
    }
}

#[cfg(feature = "alloc")]
pub use vec::SweepVec;

#[cfg(feature = "alloc")]
pub mod vec {
    extern crate alloc;
    use crate::{Square, SweepSlice};
    use alloc::vec::Vec;

    /// owned version of [`SweepSlice`]
    #[derive(PartialEq, Debug)]
    pub struct SweepVec<V> {
        inner: Vec<(Square, V)>,
        // cached so handing out slices stays O(1)
        reach: f64,
    }

    impl<V> SweepVec<V> {
        /// sorts stably, so entries sharing a centre x keep their insertion order
        pub fn new_from(mut v: Vec<(Square, V)>) -> Self {
            v.sort_by(|a, b| a.0.center()[0].total_cmp(&b.0.center()[0]));
            Self::new_from_unchecked(v)
        }
        pub fn new_from_unchecked(v: Vec<(Square, V)>) -> Self {
            let reach = crate::reach(&v);
            Self { inner: v, reach }
        }
        pub fn as_sweep_slice(&self) -> SweepSlice<'_, V> {
            self.into()
        }
    }

    impl<V> Default for SweepVec<V> {
        fn default() -> Self {
            Self {
                inner: Vec::new(),
                reach: 0.,
            }
        }
    }

    impl<V> core::ops::Deref for SweepVec<V> {
        type Target = [(Square, V)];
        fn deref(&self) -> &[(Square, V)] {
            &self.inner
        }
    }

    impl<'a, V> From<&'a SweepVec<V>> for SweepSlice<'a, V> {
        fn from(t: &'a SweepVec<V>) -> Self {
            SweepSlice {
                inner: &t.inner,
                reach: t.reach,
            }
        }
    }
}
