// SiteBook services
// Stateless or file-backed helpers used by the app core.

pub mod settings_engine;
