//! Server configuration from flags, environment and `.env`.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use clap::Parser;
use pixgrid_session::SessionConfig;

use crate::state::Limits;

/// pixgrid HTTP server.
#[derive(Parser, Debug, Clone)]
#[command(name = "pixgrid-server", version)]
#[command(about = "Upload an image once, then convert it to pixel art repeatedly")]
pub struct ServerConfig {
    /// Address to listen on.
    #[arg(long, env = "PIXGRID_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Port to listen on.
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Seconds of inactivity after which a session is discarded.
    #[arg(long, env = "PIXGRID_SESSION_IDLE_SECS", default_value_t = SessionConfig::DEFAULT_IDLE_TIMEOUT.as_secs())]
    pub session_idle_secs: u64,

    /// Seconds between passes that discard idle sessions.
    #[arg(long, env = "PIXGRID_REAP_INTERVAL_SECS", default_value_t = SessionConfig::DEFAULT_REAP_INTERVAL.as_secs())]
    pub reap_interval_secs: u64,

    /// Largest accepted request body, in bytes.
    #[arg(long, env = "PIXGRID_MAX_UPLOAD_BYTES", default_value_t = Limits::DEFAULT.max_upload_bytes)]
    pub max_upload_bytes: usize,

    /// Largest accepted `size` (downscaled width).
    #[arg(long, env = "PIXGRID_MAX_PIXEL_SIZE", default_value_t = Limits::DEFAULT.max_pixel_size)]
    pub max_pixel_size: u32,

    /// Largest accepted side of a converted image, in pixels.
    #[arg(long, env = "PIXGRID_MAX_OUTPUT_SIDE", default_value_t = Limits::DEFAULT.max_output_side)]
    pub max_output_side: u32,
}

impl ServerConfig {
    /// Socket address to bind.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Session expiry policy.
    #[must_use]
    pub const fn session_config(&self) -> SessionConfig {
        SessionConfig {
            idle_timeout: Duration::from_secs(self.session_idle_secs),
            reap_interval: Duration::from_secs(self.reap_interval_secs),
        }
    }

    /// Request limits.
    #[must_use]
    pub const fn limits(&self) -> Limits {
        Limits {
            max_upload_bytes: self.max_upload_bytes,
            max_pixel_size: self.max_pixel_size,
            max_output_side: self.max_output_side,
        }
    }
}
