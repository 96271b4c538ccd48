//! Friendship service.
//!
//! Lifecycle: `none → pending → {accepted, rejected}`; an accepted
//! friendship goes back to `none` when either party removes it. A rejected
//! row stays in place, so a new request for the pair only becomes possible
//! after the old row is removed.

use alumnet_common::{AppError, AppResult, IdGenerator};
use chrono::Utc;
use alumnet_db::{
    entities::{friendship, friendship::FriendshipStatus, user},
    repositories::{FriendshipRepository, UserRepository},
};
use sea_orm::Set;
use std::collections::HashMap;

/// A pending request received by a user, with the requester resolved.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    /// The pending friendship row.
    pub friendship: friendship::Model,
    /// The user who sent the request.
    pub requester: user::Model,
}

/// Friendship service for business logic.
#[derive(Clone)]
pub struct FriendshipService {
    friendship_repo: FriendshipRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl FriendshipService {
    /// Create a new friendship service.
    #[must_use]
    pub fn new(friendship_repo: FriendshipRepository, user_repo: UserRepository) -> Self {
        Self {
            friendship_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Send a friendship request from the actor to another user.
    ///
    /// Fails with `Conflict` if any row already exists for the pair, in
    /// either direction and whatever its status.
    pub async fn request(
        &self,
        actor: &user::Model,
        addressee_id: &str,
    ) -> AppResult<friendship::Model> {
        // Can't befriend yourself
        if actor.id == addressee_id {
            return Err(AppError::Validation(
                "Cannot send a friendship request to yourself".to_string(),
            ));
        }

        // Addressee must exist
        let addressee = self.user_repo.get_by_id(addressee_id).await?;

        // One row per pair, checked in both directions
        if self
            .friendship_repo
            .find_pair(&actor.id, &addressee.id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "A friendship request already exists for this pair".to_string(),
            ));
        }

        let model = friendship::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id1: Set(actor.id.clone()),
            user_id2: Set(addressee.id.clone()),
            status: Set(FriendshipStatus::Pending),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        // A concurrent duplicate request loses to the pair index and
        // surfaces as Conflict from the repository
        let created = self.friendship_repo.create(model).await?;

        tracing::debug!(
            requester_id = %actor.id,
            addressee_id = %addressee.id,
            "Created friendship request"
        );

        Ok(created)
    }

    /// Accept a pending request. Only the addressee may accept.
    pub async fn accept(
        &self,
        actor: &user::Model,
        friendship_id: &str,
    ) -> AppResult<friendship::Model> {
        self.transition(actor, friendship_id, FriendshipStatus::Accepted)
            .await
    }

    /// Reject a pending request. Only the addressee may reject.
    pub async fn reject(
        &self,
        actor: &user::Model,
        friendship_id: &str,
    ) -> AppResult<friendship::Model> {
        self.transition(actor, friendship_id, FriendshipStatus::Rejected)
            .await
    }

    async fn transition(
        &self,
        actor: &user::Model,
        friendship_id: &str,
        to: FriendshipStatus,
    ) -> AppResult<friendship::Model> {
        let friendship = self.friendship_repo.get_by_id(friendship_id).await?;

        // Directionality matters: only the addressee may resolve a request
        if friendship.user_id2 != actor.id {
            return Err(AppError::Forbidden(
                "Only the addressee may resolve this request".to_string(),
            ));
        }

        if friendship.status != FriendshipStatus::Pending {
            return Err(AppError::Conflict(
                "This request has already been resolved".to_string(),
            ));
        }

        let mut model: friendship::ActiveModel = friendship.into();
        model.status = Set(to);
        model.updated_at = Set(Some(Utc::now().into()));

        let updated = self.friendship_repo.update(model).await?;

        tracing::debug!(
            friendship_id = %updated.id,
            status = ?updated.status,
            "Resolved friendship request"
        );

        Ok(updated)
    }

    /// Remove a friendship row. Either party may remove it, whatever its
    /// current status.
    pub async fn remove(&self, actor: &user::Model, friendship_id: &str) -> AppResult<()> {
        let friendship = self.friendship_repo.get_by_id(friendship_id).await?;

        if !friendship.involves(&actor.id) {
            return Err(AppError::Forbidden(
                "You are not part of this friendship".to_string(),
            ));
        }

        self.friendship_repo.delete(&friendship.id).await?;

        tracing::debug!(friendship_id = %friendship.id, "Removed friendship");

        Ok(())
    }

    /// Get the friends of a user: the other party of every accepted row the
    /// user appears in.
    pub async fn friends_of(&self, user_id: &str) -> AppResult<Vec<user::Model>> {
        let rows = self.friendship_repo.find_accepted_involving(user_id).await?;

        let friend_ids: Vec<String> = rows
            .iter()
            .filter_map(|f| f.other_party(user_id))
            .map(ToString::to_string)
            .collect();

        self.user_repo.find_by_ids(&friend_ids).await
    }

    /// Get the pending requests received by a user, with requesters resolved.
    pub async fn pending_received(&self, user_id: &str) -> AppResult<Vec<PendingRequest>> {
        let rows = self.friendship_repo.find_pending_received(user_id).await?;

        let requester_ids: Vec<String> = rows.iter().map(|f| f.user_id1.clone()).collect();
        let requesters: HashMap<String, user::Model> = self
            .user_repo
            .find_by_ids(&requester_ids)
            .await?
            .into_iter()
            .map(|u| (u.id.clone(), u))
            .collect();

        Ok(rows
            .into_iter()
            .filter_map(|friendship| {
                let requester = requesters.get(&friendship.user_id1)?.clone();
                Some(PendingRequest {
                    friendship,
                    requester,
                })
            })
            .collect())
    }

    /// Get the status of the pair row between two users, if any exists.
    pub async fn status_between(
        &self,
        user_a: &str,
        user_b: &str,
    ) -> AppResult<Option<FriendshipStatus>> {
        Ok(self
            .friendship_repo
            .find_pair(user_a, user_b)
            .await?
            .map(|f| f.status))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_user(id: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            name: format!("User {id}"),
            email: format!("{id}@example.com"),
            password_hash: "hash".to_string(),
            token: None,
            profile_image: None,
            bio: None,
            graduation_year: None,
            course: None,
            current_job: None,
            current_company: None,
            linkedin_url: None,
            is_admin: false,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_friendship(
        id: &str,
        user_id1: &str,
        user_id2: &str,
        status: FriendshipStatus,
    ) -> friendship::Model {
        friendship::Model {
            id: id.to_string(),
            user_id1: user_id1.to_string(),
            user_id2: user_id2.to_string(),
            status,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_request_yourself_returns_validation_error() {
        let db1 = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let db2 = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = FriendshipService::new(
            FriendshipRepository::new(db1),
            UserRepository::new(db2),
        );

        let actor = create_test_user("u1");
        let result = service.request(&actor, "u1").await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_request_missing_addressee_returns_not_found() {
        let db1 = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let db2 = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let service = FriendshipService::new(
            FriendshipRepository::new(db1),
            UserRepository::new(db2),
        );

        let actor = create_test_user("u1");
        let result = service.request(&actor, "ghost").await;

        assert!(matches!(result, Err(AppError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_request_existing_pair_returns_conflict() {
        // Pair row exists in the reverse direction: u2 requested u1 earlier
        let existing = create_test_friendship("f1", "u2", "u1", FriendshipStatus::Pending);

        let db1 = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .into_connection(),
        );
        let db2 = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("u2")]])
                .into_connection(),
        );

        let service = FriendshipService::new(
            FriendshipRepository::new(db1),
            UserRepository::new(db2),
        );

        let actor = create_test_user("u1");
        let result = service.request(&actor, "u2").await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_request_creates_pending_row() {
        let created = create_test_friendship("f1", "u1", "u2", FriendshipStatus::Pending);

        let db1 = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // find_pair: no existing row
                .append_query_results([Vec::<friendship::Model>::new()])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                // insert returns the created row
                .append_query_results([[created]])
                .into_connection(),
        );
        let db2 = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("u2")]])
                .into_connection(),
        );

        let service = FriendshipService::new(
            FriendshipRepository::new(db1),
            UserRepository::new(db2),
        );

        let actor = create_test_user("u1");
        let result = service.request(&actor, "u2").await.unwrap();

        assert_eq!(result.status, FriendshipStatus::Pending);
        assert_eq!(result.user_id1, "u1");
        assert_eq!(result.user_id2, "u2");
    }

    #[tokio::test]
    async fn test_accept_by_non_addressee_returns_forbidden() {
        let pending = create_test_friendship("f1", "u1", "u2", FriendshipStatus::Pending);

        let db1 = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[pending]])
                .into_connection(),
        );
        let db2 = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = FriendshipService::new(
            FriendshipRepository::new(db1),
            UserRepository::new(db2),
        );

        // The requester tries to accept their own request
        let actor = create_test_user("u1");
        let result = service.accept(&actor, "f1").await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_accept_non_pending_returns_conflict() {
        let rejected = create_test_friendship("f1", "u1", "u2", FriendshipStatus::Rejected);

        let db1 = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[rejected]])
                .into_connection(),
        );
        let db2 = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = FriendshipService::new(
            FriendshipRepository::new(db1),
            UserRepository::new(db2),
        );

        let actor = create_test_user("u2");
        let result = service.accept(&actor, "f1").await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_accept_by_addressee_transitions_to_accepted() {
        let pending = create_test_friendship("f1", "u1", "u2", FriendshipStatus::Pending);
        let mut accepted = pending.clone();
        accepted.status = FriendshipStatus::Accepted;

        let db1 = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[pending]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([[accepted]])
                .into_connection(),
        );
        let db2 = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = FriendshipService::new(
            FriendshipRepository::new(db1),
            UserRepository::new(db2),
        );

        let actor = create_test_user("u2");
        let result = service.accept(&actor, "f1").await.unwrap();

        assert_eq!(result.status, FriendshipStatus::Accepted);
    }

    #[tokio::test]
    async fn test_reject_by_addressee_transitions_to_rejected() {
        let pending = create_test_friendship("f1", "u1", "u2", FriendshipStatus::Pending);
        let mut rejected = pending.clone();
        rejected.status = FriendshipStatus::Rejected;

        let db1 = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[pending]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([[rejected]])
                .into_connection(),
        );
        let db2 = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = FriendshipService::new(
            FriendshipRepository::new(db1),
            UserRepository::new(db2),
        );

        let actor = create_test_user("u2");
        let result = service.reject(&actor, "f1").await.unwrap();

        assert_eq!(result.status, FriendshipStatus::Rejected);
    }

    #[tokio::test]
    async fn test_remove_by_outsider_returns_forbidden() {
        let accepted = create_test_friendship("f1", "u1", "u2", FriendshipStatus::Accepted);

        let db1 = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[accepted]])
                .into_connection(),
        );
        let db2 = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = FriendshipService::new(
            FriendshipRepository::new(db1),
            UserRepository::new(db2),
        );

        let actor = create_test_user("u3");
        let result = service.remove(&actor, "f1").await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_remove_by_either_party_deletes_row() {
        let accepted = create_test_friendship("f1", "u1", "u2", FriendshipStatus::Accepted);

        let db1 = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // get_by_id for the guard, then find_by_id inside delete
                .append_query_results([[accepted.clone()], [accepted]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        let db2 = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = FriendshipService::new(
            FriendshipRepository::new(db1),
            UserRepository::new(db2),
        );

        // The requester removes; the addressee would be equally allowed
        let actor = create_test_user("u1");
        assert!(service.remove(&actor, "f1").await.is_ok());
    }

    #[tokio::test]
    async fn test_friends_of_resolves_other_party() {
        let f1 = create_test_friendship("f1", "u1", "u2", FriendshipStatus::Accepted);
        let f2 = create_test_friendship("f2", "u3", "u1", FriendshipStatus::Accepted);

        let db1 = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[f1, f2]])
                .into_connection(),
        );
        let db2 = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("u2"), create_test_user("u3")]])
                .into_connection(),
        );

        let service = FriendshipService::new(
            FriendshipRepository::new(db1),
            UserRepository::new(db2),
        );

        let friends = service.friends_of("u1").await.unwrap();
        let ids: Vec<&str> = friends.iter().map(|u| u.id.as_str()).collect();

        assert_eq!(ids, vec!["u2", "u3"]);
    }

    #[tokio::test]
    async fn test_pending_received_resolves_requesters() {
        let f1 = create_test_friendship("f1", "u2", "u1", FriendshipStatus::Pending);

        let db1 = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[f1]])
                .into_connection(),
        );
        let db2 = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("u2")]])
                .into_connection(),
        );

        let service = FriendshipService::new(
            FriendshipRepository::new(db1),
            UserRepository::new(db2),
        );

        let pending = service.pending_received("u1").await.unwrap();

        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].requester.id, "u2");
    }

    #[tokio::test]
    async fn test_status_between_reports_pair_status() {
        let f1 = create_test_friendship("f1", "u2", "u1", FriendshipStatus::Accepted);

        let db1 = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[f1]])
                .into_connection(),
        );
        let db2 = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = FriendshipService::new(
            FriendshipRepository::new(db1),
            UserRepository::new(db2),
        );

        let status = service.status_between("u1", "u2").await.unwrap();

        assert_eq!(status, Some(FriendshipStatus::Accepted));
    }
}
