// Treemark state managers
// Managers own the persistence round-trip and expose the collaborator-facing API.

pub mod bookmark_store;
