use crate::{
    contract_manager::ContractManager,
    error::Error,
    interaction::InteractionBuilder,
    mock_server::MockServer,
    pactium_configuration::PactiumConfiguration,
    registry::InteractionRegistry,
};
use std::{env, net::SocketAddr, path::PathBuf, sync::Arc};
use tracing::info;

/// One consumer test session: an interaction registry and a mock server
/// bound to their own port, acquired for the duration of a test. The
/// server is stopped on drop, so teardown is guaranteed on every exit path
/// including assertion panics; `finish` additionally writes the contract
/// document.
///
/// Sessions are independent of each other and can run in parallel.
#[derive(Debug)]
pub struct TestSession {
    configuration: PactiumConfiguration,
    registry: Arc<InteractionRegistry>,
    server: MockServer,
    address: SocketAddr,
}

impl TestSession {
    pub fn start(configuration: PactiumConfiguration) -> Result<Self, Error> {
        let registry = Arc::new(InteractionRegistry::new());
        let mut server = MockServer::new(registry.clone());
        let address = server.start(configuration.port())?;

        if configuration.no_proxy() {
            extend_no_proxy();
        }

        info!(
            consumer = configuration.consumer(),
            provider = configuration.provider(),
            %address,
            "test session started"
        );

        Ok(Self {
            configuration,
            registry,
            server,
            address,
        })
    }

    /// Entry point of the registration API: names the provider-side
    /// precondition the interaction assumes.
    pub fn given<S: Into<String>>(&self, provider_state: S) -> InteractionBuilder {
        InteractionBuilder::new(self.registry.clone(), provider_state)
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }

    /// The URL the client under test should use as the provider base.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.address)
    }

    pub fn consumer(&self) -> &str {
        self.configuration.consumer()
    }

    pub fn provider(&self) -> &str {
        self.configuration.provider()
    }

    pub fn registry(&self) -> &InteractionRegistry {
        &self.registry
    }

    /// Explicit idempotent teardown without writing a contract.
    pub fn stop(&mut self) -> Result<(), Error> {
        self.server.stop()
    }

    /// Writes the contract document for every fulfilled interaction, then
    /// stops the server and clears the registry. The server is stopped
    /// whether or not the write succeeded.
    pub fn finish(mut self) -> Result<PathBuf, Error> {
        let write_result = ContractManager::save_contract(
            &self.registry,
            self.configuration.consumer(),
            self.configuration.provider(),
            self.configuration.contract_dir(),
        );

        self.server.stop()?;
        self.registry.reset()?;

        write_result
    }
}

// reqwest and friends consult NO_PROXY; make sure loopback traffic bypasses
// any ambient HTTP proxy
fn extend_no_proxy() {
    const LOOPBACK: &str = "localhost,127.0.0.1";

    let merged = match env::var("NO_PROXY") {
        Ok(existing) if !existing.is_empty() => {
            if existing.split(',').any(|entry| entry.trim() == "localhost") {
                existing
            } else {
                format!("{},{}", existing, LOOPBACK)
            }
        }
        _ => String::from(LOOPBACK),
    };

    env::set_var("NO_PROXY", &merged);
    env::set_var("no_proxy", merged);
}
