//! Workspace repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{NewWorkspace, Workspace, WorkspaceId};

/// Repository trait for workspaces.
///
/// Also hosts the connection health check, since every backend stores
/// workspaces and the check is backend-wide.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait WorkspaceRepository: Send + Sync {
    /// Check that the backing store is reachable.
    ///
    /// # Returns
    /// * `Ok(true)` if the store answers
    /// * `Err(RepositoryError)` if the check itself fails
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Persist a new workspace.
    ///
    /// # Arguments
    /// * `workspace` - Validated workspace input
    ///
    /// # Returns
    /// * `Ok(Workspace)` - The stored record with its assigned id
    async fn create_workspace(&self, workspace: NewWorkspace) -> RepositoryResult<Workspace>;

    /// List every workspace in insertion order.
    async fn list_workspaces(&self) -> RepositoryResult<Vec<Workspace>>;

    /// Fetch a single workspace.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` if no workspace has this id
    async fn get_workspace(&self, id: WorkspaceId) -> RepositoryResult<Workspace>;

    /// Find workspaces whose stored status string equals `status` exactly.
    ///
    /// The filter is a plain string comparison against the stored value, so a
    /// status outside the known set simply matches nothing.
    ///
    /// # Arguments
    /// * `status` - Raw status value to match
    ///
    /// # Returns
    /// * `Ok(Vec<Workspace>)` - Matches in insertion order (possibly empty)
    async fn find_workspaces_by_status(&self, status: &str) -> RepositoryResult<Vec<Workspace>>;
}
