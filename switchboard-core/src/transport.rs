//! CAN bus transport
//!
//! Owns the lifecycle of the outbound channel: a two-state machine (Down and
//! Up). Bring-up reconfigures the link layer from scratch (forced down,
//! bit rate, queue depth, up) and opens the SocketCAN socket; teardown
//! releases both. Frame transmission is valid only while Up.
//!
//! Link-layer configuration shells out to `ip link`, which covers the
//! transmit queue length that the socket API does not expose. The data path
//! uses the `socketcan` crate.

use crate::types::{CanFrame, Result, SwitchboardError};
use socketcan::{CanSocket, EmbeddedFrame, Socket, StandardId};
use std::process::Command;

/// Capability to bring the bus up, enqueue frames, and tear the bus down
pub trait CanTransport {
    /// Transition Down -> Up, configuring the link layer on the way
    ///
    /// Fails with [`SwitchboardError::TransportInit`]; the caller must not
    /// enter the scheduling loop in that case.
    fn bring_up(&mut self) -> Result<()>;

    /// Enqueue a frame for transmission (Up state only)
    ///
    /// Fails with [`SwitchboardError::TransportSend`]; a single dropped
    /// frame on a periodic link is superseded by the next cycle.
    fn send(&mut self, frame: &CanFrame) -> Result<()>;

    /// Transition Up -> Down, releasing the channel
    ///
    /// Idempotent: calling while already Down is a no-op.
    fn shutdown(&mut self) -> Result<()>;

    /// Whether the transport is currently Up
    fn is_up(&self) -> bool;
}

/// SocketCAN transport over a named network interface
pub struct SocketCanTransport {
    interface: String,
    bitrate: u32,
    tx_queue_len: u32,
    socket: Option<CanSocket>,
}

impl SocketCanTransport {
    pub fn new(interface: impl Into<String>, bitrate: u32, tx_queue_len: u32) -> Self {
        Self {
            interface: interface.into(),
            bitrate,
            tx_queue_len,
            socket: None,
        }
    }

    /// Run `ip link set <interface> <args...>`, mapping failure to
    /// `TransportInit`
    fn ip_link(&self, args: &[&str]) -> Result<()> {
        log::debug!("ip link set {} {}", self.interface, args.join(" "));
        let status = Command::new("ip")
            .arg("link")
            .arg("set")
            .arg(&self.interface)
            .args(args)
            .status()
            .map_err(|e| {
                SwitchboardError::TransportInit(format!("failed to run ip: {}", e))
            })?;
        if !status.success() {
            return Err(SwitchboardError::TransportInit(format!(
                "ip link set {} {} exited with {}",
                self.interface,
                args.join(" "),
                status
            )));
        }
        Ok(())
    }
}

impl CanTransport for SocketCanTransport {
    fn bring_up(&mut self) -> Result<()> {
        if self.socket.is_some() {
            return Ok(());
        }

        log::info!(
            "bringing up {} (bitrate {}, txqueuelen {})",
            self.interface,
            self.bitrate,
            self.tx_queue_len
        );

        // Force the interface down first to clear any prior configuration
        self.ip_link(&["down"])?;

        let bitrate = self.bitrate.to_string();
        let queue_len = self.tx_queue_len.to_string();
        self.ip_link(&["type", "can", "bitrate", bitrate.as_str()])?;
        self.ip_link(&["txqueuelen", queue_len.as_str()])?;
        self.ip_link(&["up"])?;

        match CanSocket::open(&self.interface) {
            Ok(socket) => {
                self.socket = Some(socket);
                Ok(())
            }
            Err(e) => {
                // Do not leave a half-configured link behind
                if let Err(down_err) = self.ip_link(&["down"]) {
                    log::warn!("teardown after failed open: {}", down_err);
                }
                Err(SwitchboardError::TransportInit(format!(
                    "failed to open {}: {}",
                    self.interface, e
                )))
            }
        }
    }

    fn send(&mut self, frame: &CanFrame) -> Result<()> {
        let socket = self.socket.as_ref().ok_or_else(|| {
            SwitchboardError::TransportSend("transport is down".to_string())
        })?;

        let id = u16::try_from(frame.can_id)
            .ok()
            .and_then(StandardId::new)
            .ok_or_else(|| {
                SwitchboardError::TransportSend(format!(
                    "0x{:X} is not a standard CAN ID",
                    frame.can_id
                ))
            })?;
        let wire_frame = socketcan::CanFrame::new(id, &frame.data).ok_or_else(|| {
            SwitchboardError::TransportSend(format!(
                "payload of {} bytes rejected",
                frame.data.len()
            ))
        })?;

        socket
            .write_frame(&wire_frame)
            .map_err(|e| SwitchboardError::TransportSend(e.to_string()))
    }

    fn shutdown(&mut self) -> Result<()> {
        if self.socket.is_none() {
            return Ok(());
        }
        log::info!("shutting down {}", self.interface);
        self.socket = None;
        // Teardown failure leaves nothing for the caller to act on
        if let Err(e) = self.ip_link(&["down"]) {
            log::warn!("failed to bring {} down: {}", self.interface, e);
        }
        Ok(())
    }

    fn is_up(&self) -> bool {
        self.socket.is_some()
    }
}

impl Drop for SocketCanTransport {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{FILLER_BYTE, SWITCH_FRAME_ID};

    #[test]
    fn test_send_while_down_is_rejected() {
        let mut transport = SocketCanTransport::new("can0", 1_000_000, 100_000);
        assert!(!transport.is_up());

        let frame = CanFrame {
            can_id: SWITCH_FRAME_ID,
            data: [FILLER_BYTE; 8],
        };
        assert!(matches!(
            transport.send(&frame),
            Err(SwitchboardError::TransportSend(_))
        ));
    }

    #[test]
    fn test_shutdown_is_idempotent_while_down() {
        let mut transport = SocketCanTransport::new("can0", 1_000_000, 100_000);
        assert!(transport.shutdown().is_ok());
        assert!(transport.shutdown().is_ok());
        assert!(!transport.is_up());
    }
}
