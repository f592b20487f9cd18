use crate::{
    data::RequestData,
    error::Error,
    matching,
    registry::InteractionRegistry,
};
use hyper::{
    body,
    header::{HeaderName, HeaderValue, CONTENT_TYPE},
    service::{make_service_fn, service_fn},
    Body, HeaderMap, Request, Response, Server,
};
use std::{
    collections::HashMap,
    convert::Infallible,
    net::{SocketAddr, TcpListener},
    sync::Arc,
    thread::{self, JoinHandle},
};
use tokio::{runtime::Runtime, sync::oneshot};
use tracing::{debug, error, info, warn};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ServerState {
    Stopped,
    Starting,
    Listening,
    Stopping,
}

/// The in-process HTTP stand-in for the real provider. Runs a hyper server
/// on a dedicated thread with its own runtime; each session owns exactly
/// one instance bound to its own port.
#[derive(Debug)]
pub struct MockServer {
    registry: Arc<InteractionRegistry>,
    state: ServerState,
    address: Option<SocketAddr>,
    shutdown_sender: Option<oneshot::Sender<()>>,
    join_handle: Option<JoinHandle<()>>,
}

impl MockServer {
    pub fn new(registry: Arc<InteractionRegistry>) -> Self {
        Self {
            registry,
            state: ServerState::Stopped,
            address: None,
            shutdown_sender: None,
            join_handle: None,
        }
    }

    pub fn state(&self) -> ServerState {
        self.state
    }

    /// The bound address while listening.
    pub fn address(&self) -> Option<SocketAddr> {
        self.address
    }

    /// Binds a loopback socket on the configured port (an ephemeral one
    /// when `port` is `None`) and starts serving the registry. Fails with
    /// `BindError` when the port is unavailable.
    pub fn start(&mut self, port: Option<u16>) -> Result<SocketAddr, Error> {
        if let Some(address) = self.address {
            return Ok(address);
        }

        self.state = ServerState::Starting;

        let requested = SocketAddr::from(([127, 0, 0, 1], port.unwrap_or(0)));
        let listener = TcpListener::bind(requested).map_err(Error::BindError)?;
        listener.set_nonblocking(true).map_err(Error::BindError)?;
        let address = listener.local_addr().map_err(Error::BindError)?;

        let (shutdown_sender, shutdown_receiver) = oneshot::channel::<()>();
        let registry = self.registry.clone();

        self.join_handle = Some(thread::spawn(move || {
            let runtime = match Runtime::new() {
                Ok(runtime) => runtime,
                Err(e) => {
                    error!("couldn't create the mock server runtime: {}", e);
                    return;
                }
            };

            runtime.block_on(async move {
                let server = match Server::from_tcp(listener) {
                    Ok(builder) => builder,
                    Err(e) => {
                        error!("couldn't adopt the mock server socket: {}", e);
                        return;
                    }
                };

                let server = server
                    .serve(make_service_fn(move |_| {
                        let registry = registry.clone();
                        async move {
                            Ok::<_, Infallible>(service_fn(move |request| {
                                handle_request(registry.clone(), request)
                            }))
                        }
                    }))
                    .with_graceful_shutdown(async {
                        shutdown_receiver.await.ok();
                    });

                if let Err(e) = server.await {
                    error!("mock server error: {}", e);
                }
            });
        }));

        self.shutdown_sender = Some(shutdown_sender);
        self.address = Some(address);
        self.state = ServerState::Listening;
        info!(%address, "mock server listening");

        Ok(address)
    }

    /// Signals graceful shutdown and joins the server thread. In-flight
    /// requests finish or see a connection reset; stopping an already
    /// stopped server is a no-op.
    pub fn stop(&mut self) -> Result<(), Error> {
        if self.state == ServerState::Stopped {
            return Ok(());
        }

        self.state = ServerState::Stopping;

        if let Some(sender) = self.shutdown_sender.take() {
            let _ = sender.send(());
        }

        if let Some(join_handle) = self.join_handle.take() {
            if join_handle.join().is_err() {
                warn!("the mock server thread panicked during shutdown");
            }
        }

        self.address = None;
        self.state = ServerState::Stopped;
        info!("mock server stopped");

        Ok(())
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

async fn handle_request(
    registry: Arc<InteractionRegistry>,
    mut request: Request<Body>,
) -> Result<Response<Body>, Infallible> {
    match serve_request(registry, &mut request).await {
        Ok(response) => Ok(response),
        Err(e) => {
            warn!("request handling failed: {}", e);
            Ok(Response::builder()
                .status(500)
                .body(Body::empty())
                .unwrap_or_else(|_| Response::new(Body::empty())))
        }
    }
}

async fn serve_request(
    registry: Arc<InteractionRegistry>,
    request: &mut Request<Body>,
) -> Result<Response<Body>, Error> {
    let request_data = read_request_data(request).await?;
    debug!(
        method = %request_data.method,
        path = %request_data.path,
        "handling request"
    );

    match registry.find_match(&request_data)? {
        Some(interaction) => {
            debug!(description = %interaction.description(), "matched interaction");

            let response_data = interaction.response().unwrap_concrete();
            let mut response_builder = Response::builder().status(response_data.status_code);

            if let Some(headers_mut) = response_builder.headers_mut() {
                put_headers(headers_mut, &response_data.headers)?;
            }

            Ok(response_builder.body(response_data.body.into())?)
        }
        None => {
            let candidates = registry.descriptions()?;
            warn!(
                method = %request_data.method,
                path = %request_data.path,
                "no matching interaction"
            );

            // the mismatch diagnostic is an observable contract of the
            // server, not just a log line
            let diagnostic = serde_json::json!({
                "error": "NoMatchingInteraction",
                "method": request_data.method,
                "path": request_data.path,
                "candidates": candidates,
            });

            Ok(Response::builder()
                .status(500)
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(diagnostic.to_string()))?)
        }
    }
}

async fn read_request_data(request: &mut Request<Body>) -> Result<RequestData, Error> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let query = request
        .uri()
        .query()
        .map(matching::parse_query)
        .unwrap_or_default();
    let headers = extract_headers(request.headers());

    let body = body::to_bytes(request.body_mut()).await?;

    Ok(RequestData {
        method,
        path,
        query,
        headers,
        body: String::from_utf8_lossy(&body).into(),
    })
}

fn extract_headers(header_map: &HeaderMap) -> HashMap<String, String> {
    // header values with opaque characters are skipped
    header_map
        .iter()
        .map(|(k, v)| (String::from(k.as_str()), v.to_str()))
        .filter_map(|(key, value)| value.ok().map(|v| (key, String::from(v))))
        .collect::<HashMap<_, _>>()
}

fn put_headers<'a, I: IntoIterator<Item = (&'a String, &'a String)>>(
    header_map: &mut HeaderMap<HeaderValue>,
    headers: I,
) -> Result<(), Error> {
    for (key, value) in headers {
        let header_name = HeaderName::from_lowercase(key.to_lowercase().as_bytes())?;
        let header_value = HeaderValue::from_str(value)?;
        header_map.append(header_name, header_value);
    }

    Ok(())
}
