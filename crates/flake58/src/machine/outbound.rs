use crate::{Error, MachineIdSource, Result};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};

/// Derives the machine ID from the local address the OS would use to reach
/// `probe`.
///
/// A UDP socket is bound and `connect`ed to the probe address, which only
/// performs a route lookup: no packet leaves the host. The low 16 bits of the
/// selected local address become the discriminator, so hosts on one `/16`
/// network get distinct IDs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutboundIp {
    probe: SocketAddr,
}

impl OutboundIp {
    /// Public resolver address used for the route lookup by default.
    pub const DEFAULT_PROBE: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)), 80);

    /// Resolves through `probe` instead of [`Self::DEFAULT_PROBE`].
    pub const fn new(probe: SocketAddr) -> Self {
        Self { probe }
    }

    /// The address used for the route lookup.
    pub const fn probe(&self) -> SocketAddr {
        self.probe
    }

    /// Returns the local address chosen to reach the probe.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MachineIdUnavailable`] if no route exists or the
    /// socket cannot be created.
    pub fn local_addr(&self) -> Result<IpAddr> {
        let bind: SocketAddr = match self.probe {
            SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };
        let socket = UdpSocket::bind(bind).map_err(unavailable)?;
        socket.connect(self.probe).map_err(unavailable)?;
        let local = socket.local_addr().map_err(unavailable)?.ip();
        if local.is_unspecified() {
            return Err(Error::MachineIdUnavailable {
                reason: format!("no local address routes to {}", self.probe),
            });
        }
        Ok(local)
    }
}

impl Default for OutboundIp {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PROBE)
    }
}

impl MachineIdSource for OutboundIp {
    fn machine_id(&self) -> Result<u16> {
        let ip = self.local_addr()?;
        #[cfg(feature = "tracing")]
        tracing::debug!(%ip, probe = %self.probe, "resolved outbound address");
        Ok(lower_16_bits(ip))
    }
}

/// The last two octets of `ip`, big-endian.
pub const fn lower_16_bits(ip: IpAddr) -> u16 {
    match ip {
        IpAddr::V4(v4) => {
            let octets = v4.octets();
            u16::from_be_bytes([octets[2], octets[3]])
        }
        IpAddr::V6(v6) => {
            let octets = v6.octets();
            u16::from_be_bytes([octets[14], octets[15]])
        }
    }
}

fn unavailable(err: std::io::Error) -> Error {
    Error::MachineIdUnavailable {
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_low_octets_of_ipv4() {
        let ip = IpAddr::V4(Ipv4Addr::new(10, 20, 1, 2));
        assert_eq!(lower_16_bits(ip), 0x0102);
        let ip = IpAddr::V4(Ipv4Addr::new(192, 168, 255, 255));
        assert_eq!(lower_16_bits(ip), u16::MAX);
    }

    #[test]
    fn takes_last_segment_of_ipv6() {
        let ip: IpAddr = "fe80::1:abcd".parse().unwrap();
        assert_eq!(lower_16_bits(ip), 0xabcd);
    }

    #[test]
    fn loopback_probe_resolves_locally() {
        let probe = OutboundIp::new((Ipv4Addr::LOCALHOST, 9).into());
        let ip = probe.local_addr().unwrap();
        assert!(ip.is_loopback());
        assert_eq!(probe.machine_id().unwrap(), lower_16_bits(ip));
    }
}
