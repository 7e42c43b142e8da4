//! Latest-request-wins bookkeeping.
//!
//! Every issued request takes the next number from the register. A result may
//! be applied only while its number is still the latest one issued; anything
//! older is stale, whatever order the responses arrive in.

/// Monotonic sequence register.
#[derive(Debug, Default, Clone)]
pub struct SequenceRegister {
    latest: u64,
}

impl SequenceRegister {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next sequence number, superseding every earlier one.
    pub fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    /// Supersede everything in flight without starting a new request.
    pub fn invalidate(&mut self) {
        self.issue();
    }

    pub fn is_current(&self, seq: u64) -> bool {
        seq == self.latest
    }

    pub fn latest(&self) -> u64 {
        self.latest
    }
}
