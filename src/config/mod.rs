//! Configuration module

mod site;

pub use site::RendererBackend;
pub use site::RendererConfig;
pub use site::ServerConfig;
pub use site::SiteConfig;
