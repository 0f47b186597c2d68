//! Deterministic block-cutting policy.
//!
//! Counts transactions drained from the shared queue and cuts a block
//! boundary every fixed number of them. Kept free of transport concerns so
//! the policy is testable on its own.

/// A cut block boundary. `number` is 1-based and monotonically increasing;
/// `transactions` always equals the configured threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockCut {
    pub number: u64,
    pub transactions: u64,
}

/// Cuts a block every `threshold` observed transactions.
#[derive(Debug)]
pub struct BlockCutter {
    threshold: u64,
    drained: u64,
    blocks: u64,
}

impl BlockCutter {
    /// `threshold` must be positive.
    pub fn new(threshold: u64) -> Self {
        assert!(threshold > 0, "block threshold must be positive");
        Self {
            threshold,
            drained: 0,
            blocks: 0,
        }
    }

    /// Record one drained transaction. Returns the cut boundary exactly
    /// when the running count reaches a multiple of the threshold.
    pub fn observe(&mut self) -> Option<BlockCut> {
        self.drained += 1;
        if self.drained % self.threshold == 0 {
            self.blocks += 1;
            Some(BlockCut {
                number: self.blocks,
                transactions: self.threshold,
            })
        } else {
            None
        }
    }

    /// Transactions observed since service start.
    pub fn drained(&self) -> u64 {
        self.drained
    }

    /// Blocks cut since service start.
    pub fn blocks_cut(&self) -> u64 {
        self.blocks
    }
}
