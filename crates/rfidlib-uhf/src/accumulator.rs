//! Per-cycle EPC deduplication.
//!
//! An [`EpcAccumulator`] is owned by the polling loop. It collects the EPCs
//! seen in every chunk read during one cycle and is drained once at the end
//! of the cycle, so nothing carries over between cycles.

use std::collections::BTreeSet;

use rfidlib_core::types::EpcId;

use crate::frame;

/// Set of unique EPCs seen during the current polling cycle.
///
/// Backed by a `BTreeSet`, so [`drain`](Self::drain) returns identifiers in
/// sorted order.
///
/// # Example
///
/// ```
/// use rfidlib_core::EpcId;
/// use rfidlib_uhf::EpcAccumulator;
///
/// let epc: EpcId = "E28068940000501D6FBBC4E1".parse().unwrap();
///
/// let mut acc = EpcAccumulator::new();
/// assert!(acc.insert(epc));
/// assert!(!acc.insert(epc));
///
/// assert_eq!(acc.drain(), vec![epc]);
/// assert!(acc.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct EpcAccumulator {
    seen: BTreeSet<EpcId>,
}

impl EpcAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an EPC. Returns `true` if it had not been seen this cycle.
    pub fn insert(&mut self, epc: EpcId) -> bool {
        self.seen.insert(epc)
    }

    /// Scan one raw chunk and record every valid EPC in it.
    ///
    /// Returns how many of them were new this cycle. Malformed frame bodies
    /// are dropped silently.
    pub fn extend_from_chunk(&mut self, chunk: &[u8]) -> usize {
        frame::epcs(chunk).filter(|&epc| self.insert(epc)).count()
    }

    /// Whether any EPC has been seen this cycle.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Number of unique EPCs seen this cycle.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether `epc` has been seen this cycle.
    pub fn contains(&self, epc: &EpcId) -> bool {
        self.seen.contains(epc)
    }

    /// Iterate the current set in sorted order without clearing it.
    pub fn iter(&self) -> impl Iterator<Item = &EpcId> {
        self.seen.iter()
    }

    /// Take the cycle's EPCs in sorted order and leave the accumulator empty.
    pub fn drain(&mut self) -> Vec<EpcId> {
        std::mem::take(&mut self.seen).into_iter().collect()
    }
}

impl Extend<EpcId> for EpcAccumulator {
    fn extend<I: IntoIterator<Item = EpcId>>(&mut self, iter: I) {
        self.seen.extend(iter);
    }
}
