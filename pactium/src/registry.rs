use crate::{
    data::RequestData,
    error::Error,
    interaction::{Interaction, InteractionStatus},
    matching,
};
use std::sync::Mutex;
use tracing::debug;

/// Ordered collection of the interactions declared for one
/// consumer/provider pair. Lookups and the matched-mark happen under one
/// lock so that two concurrent identical requests can't double-mark an
/// interaction or lose a match.
#[derive(Debug, Default)]
pub struct InteractionRegistry {
    interactions: Mutex<Vec<Interaction>>,
}

impl InteractionRegistry {
    pub fn new() -> Self {
        Self {
            interactions: Mutex::new(Vec::new()),
        }
    }

    /// Appends an interaction in declaration order.
    ///
    /// Registration is expected to happen before the mock server starts
    /// serving; it is not synchronized against concurrent `find_match`
    /// calls beyond the registry lock itself.
    pub fn register(&self, interaction: Interaction) -> Result<(), Error> {
        let mut interactions = self.interactions.lock()?;

        if interactions.iter().any(|existing| {
            existing.provider_state == interaction.provider_state
                && existing.description == interaction.description
        }) {
            return Err(Error::DuplicateInteraction {
                provider_state: interaction.provider_state,
                description: interaction.description,
            });
        }

        debug!(
            provider_state = %interaction.provider_state,
            description = %interaction.description,
            "registered interaction"
        );
        interactions.push(interaction);

        Ok(())
    }

    /// Scans in declaration order and returns the first interaction whose
    /// request pattern matches, marking it matched in the same critical
    /// section. First match wins; declaration order is the tie-break.
    pub fn find_match(&self, request: &RequestData) -> Result<Option<Interaction>, Error> {
        let mut interactions = self.interactions.lock()?;

        for interaction in interactions.iter_mut() {
            if matching::request_matches(&interaction.request, request) {
                interaction.status = InteractionStatus::Matched;
                return Ok(Some(interaction.clone()));
            }
        }

        Ok(None)
    }

    /// Descriptions of every registered interaction, for mismatch
    /// diagnostics.
    pub fn descriptions(&self) -> Result<Vec<String>, Error> {
        let interactions = self.interactions.lock()?;

        Ok(interactions
            .iter()
            .map(|interaction| interaction.description.clone())
            .collect())
    }

    /// Marks every still-declared interaction as unmatched and returns
    /// their identities. Called by the contract writer, since a declared
    /// interaction the consumer test never exercised has to be surfaced
    /// rather than silently dropped.
    pub fn finalize_unmatched(&self) -> Result<Vec<String>, Error> {
        let mut interactions = self.interactions.lock()?;
        let mut unmatched = Vec::new();

        for interaction in interactions.iter_mut() {
            if interaction.status == InteractionStatus::Declared {
                interaction.status = InteractionStatus::Unmatched;
                unmatched.push(interaction.identity());
            }
        }

        Ok(unmatched)
    }

    /// Snapshot of the matched interactions in declaration order.
    pub fn matched_interactions(&self) -> Result<Vec<Interaction>, Error> {
        let interactions = self.interactions.lock()?;

        Ok(interactions
            .iter()
            .filter(|interaction| interaction.status == InteractionStatus::Matched)
            .cloned()
            .collect())
    }

    /// Clears all interactions at session end.
    pub fn reset(&self) -> Result<(), Error> {
        self.interactions.lock()?.clear();
        Ok(())
    }
}
