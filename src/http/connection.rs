use anyhow::Context;
use bytes::BytesMut;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;

use crate::config::StaticFilesConfig;
use crate::http::mime;
use crate::http::parser;
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::router::{RouteOutcome, Router};
use crate::http::writer::ResponseWriter;

/// Cap on a single request read. Whatever does not arrive in the first
/// read is never seen: the request is truncated, not reassembled.
const RECV_BUFFER_SIZE: usize = 1024;

pub struct Connection {
    stream: TcpStream,
    router: Router,
    fallback: String,
    state: ConnectionState,
}

pub enum ConnectionState {
    Receiving,
    Routing(Request),
    Writing(ResponseWriter),
    Closed,
}

impl Connection {
    pub fn new(stream: TcpStream, cfg: StaticFilesConfig) -> Self {
        Self {
            stream,
            router: Router::new(&cfg),
            fallback: cfg.fallback,
            state: ConnectionState::Receiving,
        }
    }

    /// Drives the connection through its single request/response cycle.
    ///
    /// Every path out of here (clean exchange, silent drop, or error)
    /// ends with the connection closed exactly once: the spawning task
    /// owns `self`, and the stream closes when it drops.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Receiving => {
                    match self.read_request().await? {
                        Some(req) => {
                            self.state = ConnectionState::Routing(req);
                        }
                        None => {
                            // Malformed, empty, or non-GET: drop without
                            // sending anything back.
                            self.state = ConnectionState::Closed;
                        }
                    }
                }

                ConnectionState::Routing(req) => {
                    let path = req.path.clone();
                    let outcome = self.router.route(&path);
                    let response = self.serve(outcome).await?;

                    self.state = ConnectionState::Writing(ResponseWriter::new(&response));
                }

                ConnectionState::Writing(writer) => {
                    writer.write_to_stream(&mut self.stream).await?;

                    // One exchange per connection; there is no way back to
                    // Receiving.
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Receives at most `RECV_BUFFER_SIZE` bytes in a single read and
    /// parses the request line out of them. No follow-up reads happen even
    /// if the client has more to send.
    async fn read_request(&mut self) -> anyhow::Result<Option<Request>> {
        let mut buffer = BytesMut::with_capacity(RECV_BUFFER_SIZE);
        let n = self.stream.read_buf(&mut buffer).await?;

        tracing::debug!(
            "received request ({} bytes): {}",
            n,
            String::from_utf8_lossy(&buffer)
        );

        match parser::parse_request(&buffer) {
            Ok(request) => Ok(request),
            Err(e) => Err(anyhow::anyhow!("request decode error: {:?}", e)),
        }
    }

    /// Turns a routing outcome into a response, reading file content as
    /// needed.
    async fn serve(&self, outcome: RouteOutcome) -> anyhow::Result<Response> {
        match outcome {
            RouteOutcome::Redirect { location } => Ok(Response::redirect(&location)),

            RouteOutcome::ServeFile { resolved_path } => {
                match tokio::fs::read(&resolved_path).await {
                    Ok(content) => {
                        let content_type = mime::content_type_for(&resolved_path);
                        Ok(Response::file(content_type, content))
                    }
                    // Not-found and every other read failure take the same
                    // fallback path.
                    Err(_) => self.fallback_response().await,
                }
            }

            RouteOutcome::NotFound => self.fallback_response().await,
        }
    }

    /// Reads the fallback page fresh and wraps it in a 404. An unreadable
    /// fallback is not recovered from; the error carries to the task
    /// boundary and the client gets nothing.
    async fn fallback_response(&self) -> anyhow::Result<Response> {
        let content = tokio::fs::read(&self.fallback)
            .await
            .with_context(|| format!("fallback page {} unreadable", self.fallback))?;

        Ok(Response::not_found(content))
    }
}
