// Treemark services
// Format conversion services independent of the storage layer.

pub mod import_export;
