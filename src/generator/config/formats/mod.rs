pub mod clash;
pub mod single;

// Re-export all format converters
pub use clash::proxy_to_clash;
pub use single::{proxy_to_links, proxy_to_shadowrocket, proxy_to_single, LinkOutcome};
