//! UDP transport
//!
//! Binds a tokio `UdpSocket` and exchanges datagrams with one autopilot
//! endpoint. The endpoint is either configured up front (`--vehicle`) or
//! learned from the first datagram received, which is how SITL and
//! MAVProxy outputs behave when they are pointed at us.

use std::net::SocketAddr;

use async_trait::async_trait;
use log::info;
use tokio::net::UdpSocket;

use super::VehicleTransport;
use crate::error::LinkError;

/// Standard MAVLink ground station port
pub const MAVLINK_UDP_PORT: u16 = 14550;

pub struct UdpTransport {
    socket: UdpSocket,
    peer: Option<SocketAddr>,
}

impl UdpTransport {
    /// Bind to `bind`, optionally with a fixed vehicle endpoint
    pub async fn bind(bind: SocketAddr, peer: Option<SocketAddr>) -> Result<Self, LinkError> {
        let socket = UdpSocket::bind(bind).await?;
        info!("Vehicle link bound to {}", socket.local_addr()?);
        if let Some(peer) = peer {
            info!("Vehicle endpoint fixed at {}", peer);
        }
        Ok(Self { socket, peer })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, LinkError> {
        Ok(self.socket.local_addr()?)
    }

    /// Vehicle endpoint, once known
    pub fn peer(&self) -> Option<SocketAddr> {
        self.peer
    }
}

#[async_trait]
impl VehicleTransport for UdpTransport {
    async fn recv(&mut self, buf: &mut [u8]) -> Result<usize, LinkError> {
        let (len, addr) = self.socket.recv_from(buf).await?;
        if self.peer.is_none() {
            info!("Vehicle endpoint discovered at {}", addr);
            self.peer = Some(addr);
        }
        Ok(len)
    }

    async fn send(&mut self, frame: &[u8]) -> Result<(), LinkError> {
        let peer = self.peer.ok_or(LinkError::NoPeer)?;
        self.socket.send_to(frame, peer).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loopback() -> SocketAddr {
        "127.0.0.1:0".parse().unwrap()
    }

    #[tokio::test]
    async fn test_send_without_peer() {
        let mut transport = UdpTransport::bind(loopback(), None).await.unwrap();
        assert!(transport.peer().is_none());
        assert!(matches!(
            transport.send(&[0xFD]).await,
            Err(LinkError::NoPeer)
        ));
    }

    #[tokio::test]
    async fn test_peer_learned_from_first_datagram() {
        let mut transport = UdpTransport::bind(loopback(), None).await.unwrap();
        let link_addr = transport.local_addr().unwrap();

        let vehicle = UdpSocket::bind(loopback()).await.unwrap();
        vehicle.send_to(&[1, 2, 3], link_addr).await.unwrap();

        let mut buf = [0u8; 16];
        let len = transport.recv(&mut buf).await.unwrap();
        assert_eq!(&buf[..len], &[1, 2, 3]);
        assert_eq!(transport.peer(), Some(vehicle.local_addr().unwrap()));

        // Replies now reach the vehicle
        transport.send(&[4, 5]).await.unwrap();
        let (len, _) = vehicle.recv_from(&mut buf).await.unwrap();
        assert_eq!(&buf[..len], &[4, 5]);
    }

    #[tokio::test]
    async fn test_fixed_peer_kept() {
        let vehicle = UdpSocket::bind(loopback()).await.unwrap();
        let vehicle_addr = vehicle.local_addr().unwrap();
        let mut transport = UdpTransport::bind(loopback(), Some(vehicle_addr))
            .await
            .unwrap();

        let other = UdpSocket::bind(loopback()).await.unwrap();
        other
            .send_to(&[7], transport.local_addr().unwrap())
            .await
            .unwrap();

        let mut buf = [0u8; 4];
        transport.recv(&mut buf).await.unwrap();
        assert_eq!(transport.peer(), Some(vehicle_addr));
    }
}
