//! Follow graph operations.

use crate::app::session::Identity;
use crate::domain::model::{UserRecord, UserSummary};
use crate::domain::{RefList, Toggle};
use crate::error::{AppError, AppResult};
use crate::storage::SocialStore;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct GraphService {
    store: Arc<dyn SocialStore>,
}

impl GraphService {
    pub fn new(store: Arc<dyn SocialStore>) -> Self {
        Self { store }
    }

    /// Flips `caller -> target` and returns the new state with the caller's updated record.
    pub async fn toggle_follow(
        &self,
        identity: &Identity,
        target: Uuid,
    ) -> AppResult<(Toggle, UserRecord)> {
        if target == identity.id() {
            return Err(AppError::validation("You cannot follow yourself"));
        }
        let state = self.store.toggle_follow(identity.id(), target).await?;
        tracing::debug!(follower = %identity.id(), followee = %target, ?state, "follow toggled");

        let me = self.reload(identity).await?;
        Ok((state, me))
    }

    /// Accounts the caller follows, in follow order.
    pub async fn follows(&self, identity: &Identity) -> AppResult<Vec<UserSummary>> {
        let me = self.reload(identity).await?;
        self.summaries(&me.follows).await
    }

    /// Accounts following the caller, in follow order.
    pub async fn followers(&self, identity: &Identity) -> AppResult<Vec<UserSummary>> {
        let me = self.reload(identity).await?;
        self.summaries(&me.followers).await
    }

    async fn reload(&self, identity: &Identity) -> AppResult<UserRecord> {
        self.store
            .find_user(identity.id())
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    async fn summaries(&self, ids: &RefList) -> AppResult<Vec<UserSummary>> {
        let by_id: HashMap<Uuid, UserRecord> = self
            .store
            .users_by_ids(ids.as_slice())
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();
        Ok(ids
            .iter()
            .filter_map(|id| by_id.get(&id).map(UserSummary::from))
            .collect())
    }
}
