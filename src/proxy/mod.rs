pub mod error;
pub mod hadith;
pub mod upstream;
pub mod weather;

#[cfg(test)]
pub mod testing;

pub use error::{ProxyError, ProxyResult, SchemaError, UpstreamError};
pub use upstream::{ReqwestUpstream, Upstream};
