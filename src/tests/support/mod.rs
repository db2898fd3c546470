// Shared fixtures for controller integration tests.

mod harness;
mod mock;

pub use harness::Harness;
pub use mock::{MockClients, MockNetwork, MockNotifier, ScriptedResponse};
