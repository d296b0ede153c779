use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Where the `/metrics` exporter listens, if anywhere.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MonitoringConfig {
    /// Off by default; the hit-rate log lines carry the same numbers
    #[serde(default)]
    pub prometheus_enabled: bool,

    #[serde(default = "default_listen_addr")]
    pub listen_addr: IpAddr,

    #[serde(default = "default_prometheus_port")]
    pub prometheus_port: u16,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            prometheus_enabled: false,
            listen_addr: default_listen_addr(),
            prometheus_port: default_prometheus_port(),
        }
    }
}

impl MonitoringConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.listen_addr, self.prometheus_port)
    }

    /// Only an enabled exporter is checked.
    ///
    /// # Errors
    /// `Error::InvalidConfig` for an ephemeral (0) or privileged port.
    pub fn validate(&self) -> Result<()> {
        if !self.prometheus_enabled {
            return Ok(());
        }
        match self.prometheus_port {
            0 => Err(Error::InvalidConfig(
                "prometheus_port must be fixed so scrapers can find it, got 0".into(),
            )),
            port if port < 1024 => Err(Error::InvalidConfig(format!(
                "prometheus_port {} needs root; pick one above 1023",
                port
            ))),
            _ => Ok(()),
        }
    }
}

fn default_listen_addr() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_prometheus_port() -> u16 {
    9100
}
