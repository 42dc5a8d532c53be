use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::{TcpListener, TcpSocket};
use tracing::info;

use crate::config::{Config, StaticFilesConfig};
use crate::http::connection::Connection;

/// The accepting side of the server: one listening socket, one spawned
/// handler task per accepted connection.
pub struct Listener {
    inner: TcpListener,
    static_files: StaticFilesConfig,
}

impl Listener {
    /// Binds the configured address with the configured accept backlog.
    /// Failure here is fatal: the server cannot start without its socket.
    pub async fn bind(cfg: &Config) -> anyhow::Result<Self> {
        let addr: SocketAddr = cfg
            .server
            .listen_addr
            .parse()
            .with_context(|| format!("invalid listen address {}", cfg.server.listen_addr))?;

        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()?
        } else {
            TcpSocket::new_v6()?
        };
        socket.bind(addr)?;
        let inner = socket.listen(cfg.server.backlog)?;

        info!("Listening on {}", inner.local_addr()?);

        Ok(Self {
            inner,
            static_files: cfg.static_files.clone(),
        })
    }

    /// The address actually bound. The OS picks the port when the
    /// configured one is 0.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.inner.local_addr()
    }

    /// Accepts connections until dropped. Each accepted connection gets an
    /// independent task; the loop never waits on a handler, and a handler
    /// failure never reaches this loop.
    pub async fn run(&self) -> anyhow::Result<()> {
        loop {
            let (socket, peer) = self.inner.accept().await?;
            info!("Accepted connection from {}", peer);

            let static_files = self.static_files.clone();
            tokio::spawn(async move {
                let mut conn = Connection::new(socket, static_files);
                if let Err(e) = conn.run().await {
                    tracing::error!("Connection error from {}: {}", peer, e);
                }
            });
        }
    }
}
