pub mod config;
pub mod links;

// Re-export format converters
pub use config::formats::clash::proxy_to_clash;
pub use config::formats::single::{
    proxy_to_links, proxy_to_shadowrocket, proxy_to_single, LinkOutcome,
};

// Re-export link encoders
pub use links::proxy_to_link;
