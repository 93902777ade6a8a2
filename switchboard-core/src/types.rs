//! Core types for the switchboard bridge library
//!
//! This module defines the value types that flow through one sampling cycle
//! (snapshot in, frame out) and the error taxonomy shared by all components.

use std::fmt;

/// Result type for switchboard operations
pub type Result<T> = std::result::Result<T, SwitchboardError>;

/// Maximum number of switch lines a single frame can carry
pub const MAX_LINES: usize = 8;

/// Errors that can occur while sampling inputs or driving the bus
#[derive(Debug, thiserror::Error)]
pub enum SwitchboardError {
    #[error("Unknown switch line: {0}")]
    UnknownLine(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to read switch line '{0}': {1}")]
    LineRead(String, String),

    #[error("CAN bring-up failed: {0}")]
    TransportInit(String),

    #[error("CAN send failed: {0}")]
    TransportSend(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One atomic logical capture of all configured switch levels
///
/// The order of levels is the configuration order of the lines and defines
/// the byte order in the encoded frame. The snapshot is immutable once
/// constructed; arity is validated at construction and never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchSnapshot {
    levels: Vec<bool>,
}

impl SwitchSnapshot {
    /// Create a snapshot from captured levels (1 to 8 lines)
    pub fn new(levels: Vec<bool>) -> Result<Self> {
        if levels.is_empty() || levels.len() > MAX_LINES {
            return Err(SwitchboardError::InvalidConfig(format!(
                "snapshot must hold 1 to {} levels, got {}",
                MAX_LINES,
                levels.len()
            )));
        }
        Ok(Self { levels })
    }

    /// Number of captured lines
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Level at position `index` (configuration order)
    pub fn get(&self, index: usize) -> Option<bool> {
        self.levels.get(index).copied()
    }

    /// Iterate levels in configuration order
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.levels.iter().copied()
    }

    /// All levels as a slice
    pub fn levels(&self) -> &[bool] {
        &self.levels
    }
}

impl fmt::Display for SwitchSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for level in &self.levels {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{}", if *level { 1 } else { 0 })?;
            first = false;
        }
        Ok(())
    }
}

/// A classic CAN frame as produced by the encoder
///
/// The payload is always the full 8 bytes; positions beyond the configured
/// line count carry the filler constant so they stay distinguishable from a
/// meaningful low reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanFrame {
    /// CAN message ID (11-bit standard identifier)
    pub can_id: u32,
    /// Frame payload, always full width
    pub data: [u8; MAX_LINES],
}

impl CanFrame {
    /// Get the data length code (DLC) - number of data bytes
    pub fn dlc(&self) -> usize {
        self.data.len()
    }
}

impl fmt::Display for CanFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X} {:?}", self.can_id, self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_arity_validation() {
        assert!(SwitchSnapshot::new(vec![]).is_err());
        assert!(SwitchSnapshot::new(vec![true; 9]).is_err());
        assert!(SwitchSnapshot::new(vec![true]).is_ok());
        assert!(SwitchSnapshot::new(vec![false; 8]).is_ok());
    }

    #[test]
    fn test_snapshot_order_is_stable() {
        let snapshot = SwitchSnapshot::new(vec![true, false, true]).unwrap();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.get(0), Some(true));
        assert_eq!(snapshot.get(1), Some(false));
        assert_eq!(snapshot.get(2), Some(true));
        assert_eq!(snapshot.get(3), None);
    }

    #[test]
    fn test_snapshot_display() {
        let snapshot = SwitchSnapshot::new(vec![true, false, true]).unwrap();
        assert_eq!(format!("{}", snapshot), "1 0 1");
    }

    #[test]
    fn test_frame_display() {
        let frame = CanFrame {
            can_id: 0x123,
            data: [1, 0, 1, 111, 111, 111, 111, 111],
        };
        let text = format!("{}", frame);
        assert!(text.starts_with("0x123"));
        assert_eq!(frame.dlc(), 8);
    }
}
