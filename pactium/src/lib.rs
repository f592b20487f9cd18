//! Consumer-driven contract testing: a mock HTTP server that serves
//! declared interactions to the client under test, verifies incoming
//! requests against their declared shapes, and persists the realized
//! interactions as a contract document for provider verification.

mod contract;
mod contract_manager;
mod data;
mod error;
mod interaction;
mod matcher;
mod matching;
mod mock_server;
mod pactium_configuration;
mod registry;
mod test_session;

pub use contract::{ContractDocument, ContractInteraction, ContractRequest, ContractResponse};
pub use contract_manager::ContractManager;
pub use data::{RequestData, ResponseData};
pub use error::Error;
pub use interaction::{
    Interaction, InteractionBuilder, InteractionStatus, RequestPattern, ResponseBuilder,
    ResponseTemplate,
};
pub use matcher::{each_like, like, term, Matcher};
pub use matching::request_matches;
pub use mock_server::{MockServer, ServerState};
pub use pactium_codegen::pactium_consumer_test;
pub use pactium_configuration::PactiumConfiguration;
pub use registry::InteractionRegistry;
pub use test_session::TestSession;
