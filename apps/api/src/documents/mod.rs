// Résumé documents: lifecycle state machine, persistence, raw-text fetching,
// the parsing orchestrator and the HTTP handlers over them.

pub mod fetcher;
pub mod handlers;
pub mod lifecycle;
pub mod orchestrator;
pub mod store;
