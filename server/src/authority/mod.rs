mod authority;
mod authority_config;

pub use authority::Authority;
pub use authority_config::AuthorityConfig;
