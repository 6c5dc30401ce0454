//! Vehicle transport abstraction
//!
//! The mission loop exchanges whole MAVLink datagrams with the autopilot
//! through [`VehicleTransport`]. The production implementation is
//! [`udp::UdpTransport`]; [`MockTransport`] is always available so the loop
//! can be driven from tests without sockets.
//!
//! ```text
//! MissionLoop ──► VehicleTransport ──► UdpTransport ──► autopilot / SITL
//!                                  └─► MockTransport ──► test harness
//! ```

pub mod udp;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::LinkError;

/// Datagram link to the autopilot
#[async_trait]
pub trait VehicleTransport: Send {
    /// Wait for the next datagram and copy it into `buf`
    ///
    /// Returns the number of bytes received. `LinkError::Closed` means no
    /// further datagrams will ever arrive.
    async fn recv(&mut self, buf: &mut [u8]) -> Result<usize, LinkError>;

    /// Send one datagram to the vehicle
    ///
    /// `LinkError::NoPeer` is returned while the vehicle endpoint is unknown.
    async fn send(&mut self, frame: &[u8]) -> Result<(), LinkError>;
}

// ============================================================================
// Mock Implementation (always available for testing)
// ============================================================================

/// Shared record of datagrams sent through a [`MockTransport`]
pub type SentFrames = Arc<Mutex<Vec<Vec<u8>>>>;

/// In-memory transport fed through a channel
///
/// Inbound datagrams are pushed with the sender returned by
/// [`MockTransport::new`]. Everything sent is appended to [`SentFrames`].
pub struct MockTransport {
    inbound: mpsc::UnboundedReceiver<Vec<u8>>,
    sent: SentFrames,
}

impl MockTransport {
    pub fn new() -> (Self, mpsc::UnboundedSender<Vec<u8>>, SentFrames) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sent = SentFrames::default();
        let transport = Self {
            inbound: rx,
            sent: Arc::clone(&sent),
        };
        (transport, tx, sent)
    }
}

#[async_trait]
impl VehicleTransport for MockTransport {
    async fn recv(&mut self, buf: &mut [u8]) -> Result<usize, LinkError> {
        let datagram = self.inbound.recv().await.ok_or(LinkError::Closed)?;
        let len = datagram.len().min(buf.len());
        buf[..len].copy_from_slice(&datagram[..len]);
        Ok(len)
    }

    async fn send(&mut self, frame: &[u8]) -> Result<(), LinkError> {
        self.sent
            .lock()
            .map_err(|_| LinkError::Closed)?
            .push(frame.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_round_trip() {
        let (mut transport, inbound, sent) = MockTransport::new();
        inbound.send(vec![1, 2, 3]).unwrap();

        let mut buf = [0u8; 8];
        let len = transport.recv(&mut buf).await.unwrap();
        assert_eq!(&buf[..len], &[1, 2, 3]);

        transport.send(&[9, 9]).await.unwrap();
        assert_eq!(sent.lock().unwrap().as_slice(), &[vec![9, 9]]);
    }

    #[tokio::test]
    async fn test_mock_closed() {
        let (mut transport, inbound, _sent) = MockTransport::new();
        drop(inbound);

        let mut buf = [0u8; 8];
        assert!(matches!(
            transport.recv(&mut buf).await,
            Err(LinkError::Closed)
        ));
    }
}
