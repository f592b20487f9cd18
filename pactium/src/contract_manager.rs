use crate::{
    contract::{ContractDocument, ContractInteraction},
    error::Error,
    registry::InteractionRegistry,
};
use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};
use tracing::info;

pub struct ContractManager;

impl ContractManager {
    /// Serializes every matched interaction into a contract document at
    /// `<contract_dir>/<consumer>-<provider>.json`.
    ///
    /// Fails with `IncompleteInteractions` if any registered interaction
    /// was never matched — an unmatched declared interaction means the
    /// consumer test never exercised its own expectation, which has to be
    /// surfaced rather than silently dropped.
    pub fn save_contract<P: AsRef<Path>>(
        registry: &InteractionRegistry,
        consumer: &str,
        provider: &str,
        contract_dir: P,
    ) -> Result<PathBuf, Error> {
        let unmatched = registry.finalize_unmatched()?;
        if !unmatched.is_empty() {
            return Err(Error::IncompleteInteractions(unmatched));
        }

        let document = ContractDocument {
            consumer: consumer.into(),
            provider: provider.into(),
            interactions: registry
                .matched_interactions()?
                .iter()
                .map(ContractInteraction::from_interaction)
                .collect(),
        };

        fs::create_dir_all(contract_dir.as_ref())?;
        let contract_path = contract_dir
            .as_ref()
            .join(format!("{}-{}.json", consumer, provider));

        let file = File::create(&contract_path)?;
        serde_json::to_writer_pretty(file, &document)?;

        info!(
            path = %contract_path.display(),
            interactions = document.interactions.len(),
            "contract document written"
        );

        Ok(contract_path)
    }

    /// Parses a persisted contract document for replay-based provider
    /// verification.
    pub fn load_contract<P: AsRef<Path>>(path: P) -> Result<ContractDocument, Error> {
        let contents = fs::read_to_string(path.as_ref())?;

        serde_json::from_str(&contents).map_err(|e| Error::MalformedContract {
            path: path.as_ref().into(),
            detail: e.to_string(),
        })
    }
}
