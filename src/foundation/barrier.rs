/// Counting join point: completes once `total` arrivals have been recorded.
///
/// Completion is reported exactly once, by the arrival that reaches the total.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JoinBarrier {
    total: usize,
    arrived: usize,
}

impl JoinBarrier {
    /// Barrier waiting for `total` arrivals.
    pub fn new(total: usize) -> Self {
        Self { total, arrived: 0 }
    }

    /// Record one arrival. Returns `true` only for the arrival that completes the
    /// barrier; arrivals after completion are ignored.
    pub fn arrive(&mut self) -> bool {
        if self.is_complete() {
            return false;
        }
        self.arrived += 1;
        self.is_complete()
    }

    /// Whether every arrival has been recorded.
    pub fn is_complete(&self) -> bool {
        self.arrived >= self.total
    }

    /// `(arrived, total)`.
    pub fn progress(&self) -> (usize, usize) {
        (self.arrived, self.total)
    }
}
