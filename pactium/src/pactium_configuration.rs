use std::path::{Path, PathBuf};

const DEFAULT_CONTRACT_DIR: &str = "./pacts";

/// Configuration for one test session: the consumer/provider pair, the
/// listen port (ephemeral when unset), where contract documents go, and
/// whether loopback traffic should bypass an ambient HTTP proxy.
#[derive(Debug, Clone)]
pub struct PactiumConfiguration {
    consumer: String,
    provider: String,
    port: Option<u16>,
    contract_dir: PathBuf,
    no_proxy: bool,
}

impl PactiumConfiguration {
    pub fn new<S1: Into<String>, S2: Into<String>>(consumer: S1, provider: S2) -> Self {
        Self {
            consumer: consumer.into(),
            provider: provider.into(),
            port: None,
            contract_dir: PathBuf::from(DEFAULT_CONTRACT_DIR),
            no_proxy: true,
        }
    }

    pub fn consumer(&self) -> &str {
        &self.consumer
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn set_port(&mut self, port: u16) {
        self.port = Some(port);
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn set_contract_dir<P: Into<PathBuf>>(&mut self, contract_dir: P) {
        self.contract_dir = contract_dir.into();
    }

    pub fn contract_dir(&self) -> &Path {
        &self.contract_dir
    }

    pub fn set_no_proxy(&mut self, value: bool) {
        self.no_proxy = value;
    }

    pub fn no_proxy(&self) -> bool {
        self.no_proxy
    }
}
