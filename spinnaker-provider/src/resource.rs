//! Resource contract invoked by the host

use async_trait::async_trait;

use crate::Provider;
use crate::error::Result;

/// Lifecycle operations for one resource type
///
/// Operations mutate the state in place. `read` clears the state's ID when
/// the remote object is gone instead of returning an error.
#[async_trait]
pub trait Resource: Send + Sync {
    type State: Send + Sync;

    /// Check user input before any remote call
    fn validate(&self, _state: &Self::State) -> Result<()> {
        Ok(())
    }

    /// Whether `old` and `new` differ only in ways the remote side
    /// introduces on its own
    fn diff_suppressed(&self, old: &str, new: &str) -> bool;

    async fn create(&self, provider: &Provider, state: &mut Self::State) -> Result<()>;

    async fn read(&self, provider: &Provider, state: &mut Self::State) -> Result<()>;

    async fn update(&self, provider: &Provider, state: &mut Self::State) -> Result<()>;

    async fn delete(&self, provider: &Provider, state: &mut Self::State) -> Result<()>;

    async fn exists(&self, provider: &Provider, state: &Self::State) -> Result<bool>;
}

/// Read-only lookup of a remote object
///
/// The state carries the lookup keys in; `read` fills in the rest.
#[async_trait]
pub trait DataSource: Send + Sync {
    type State: Send + Sync;

    async fn read(&self, provider: &Provider, state: &mut Self::State) -> Result<()>;
}
