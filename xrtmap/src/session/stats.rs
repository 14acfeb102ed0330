//! Session counters reported at shutdown.

use std::fmt;

/// Totals accumulated over a session's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Points accepted from the control channel.
    pub plotted: u64,
    /// Control lines rejected as malformed.
    pub rejected: u64,
    /// Points erased after reaching their expiry age.
    pub expired: u64,
    /// Full repaints of the backing surface.
    pub repaints: u64,
}

impl fmt::Display for SessionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} plotted, {} rejected, {} expired, {} repaints",
            self.plotted, self.rejected, self.expired, self.repaints
        )
    }
}
