// SiteBook state managers
// Managers own persisted state and expose the operations the presentation layer calls.

pub mod website_store;
