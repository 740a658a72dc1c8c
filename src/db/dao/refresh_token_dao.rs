use sea_orm::{ColumnTrait, DatabaseConnection, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult};
use crate::db::entities::refresh_token::{self, Entity as RefreshToken};

#[derive(Clone)]
pub struct RefreshTokenDao {
    db: DatabaseConnection,
}

impl DaoBase for RefreshTokenDao {
    type Entity = RefreshToken;

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl RefreshTokenDao {
    pub async fn find_by_user(&self, user_id: &Uuid) -> DaoResult<Option<refresh_token::Model>> {
        let user_id = *user_id;
        self.find(1, 1, None, move |query| {
            query.filter(refresh_token::Column::UserId.eq(user_id))
        })
        .await
        .map(|response| response.data.into_iter().next())
    }

    pub async fn find_by_token(&self, token: &str) -> DaoResult<Option<refresh_token::Model>> {
        let token = token.to_string();
        self.find(1, 1, None, move |query| {
            query.filter(refresh_token::Column::RefreshToken.eq(token))
        })
        .await
        .map(|response| response.data.into_iter().next())
    }

    /// Replaces the user's stored token, creating the row on first use.
    pub async fn upsert_for_user(
        &self,
        user_id: &Uuid,
        token: &str,
    ) -> DaoResult<refresh_token::Model> {
        let token = token.to_string();
        match self.find_by_user(user_id).await? {
            Some(existing) => {
                self.update(existing.id, move |active| {
                    active.refresh_token = Set(token);
                })
                .await
            }
            None => {
                let model = refresh_token::ActiveModel {
                    user_id: Set(*user_id),
                    refresh_token: Set(token),
                    ..Default::default()
                };
                self.create(model).await
            }
        }
    }

    /// Deletes the row holding `token` and returns it.
    pub async fn remove_by_token(&self, token: &str) -> DaoResult<Option<refresh_token::Model>> {
        let Some(existing) = self.find_by_token(token).await? else {
            return Ok(None);
        };
        self.delete(existing.id).await?;
        Ok(Some(existing))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use crate::db::entities::refresh_token;

    use super::RefreshTokenDao;
    use crate::db::dao::{DaoBase, DaoLayerError};

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn token_model(id: Uuid, user_id: Uuid, token: &str) -> refresh_token::Model {
        let now = ts();
        refresh_token::Model {
            id,
            created_at: now,
            updated_at: now,
            user_id,
            refresh_token: token.to_string(),
        }
    }

    #[tokio::test]
    async fn find_by_token_returns_none_when_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<refresh_token::Model>::new()])
            .into_connection();
        let dao = RefreshTokenDao::new(&db);

        let result = dao
            .find_by_token("missing-token")
            .await
            .expect("query should succeed");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn upsert_creates_row_for_new_user() {
        let user_id = Uuid::new_v4();
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<refresh_token::Model>::new()])
            .append_query_results([[token_model(id, user_id, "token-1")]])
            .into_connection();
        let dao = RefreshTokenDao::new(&db);

        let saved = dao
            .upsert_for_user(&user_id, "token-1")
            .await
            .expect("upsert should succeed");
        assert_eq!(saved.id, id);
        assert_eq!(saved.refresh_token, "token-1");
    }

    #[tokio::test]
    async fn upsert_overwrites_existing_row() {
        let user_id = Uuid::new_v4();
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[token_model(id, user_id, "old-token")]])
            .append_query_results([[token_model(id, user_id, "old-token")]])
            .append_query_results([[token_model(id, user_id, "new-token")]])
            .into_connection();
        let dao = RefreshTokenDao::new(&db);

        let saved = dao
            .upsert_for_user(&user_id, "new-token")
            .await
            .expect("upsert should succeed");
        assert_eq!(saved.id, id);
        assert_eq!(saved.refresh_token, "new-token");
    }

    #[tokio::test]
    async fn remove_by_token_returns_deleted_row() {
        let user_id = Uuid::new_v4();
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[token_model(id, user_id, "token-1")]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let dao = RefreshTokenDao::new(&db);

        let removed = dao
            .remove_by_token("token-1")
            .await
            .expect("delete should succeed")
            .expect("row should be returned");
        assert_eq!(removed.user_id, user_id);
    }

    #[tokio::test]
    async fn remove_by_token_is_noop_when_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<refresh_token::Model>::new()])
            .into_connection();
        let dao = RefreshTokenDao::new(&db);

        let removed = dao
            .remove_by_token("missing-token")
            .await
            .expect("lookup should succeed");
        assert!(removed.is_none());
    }

    #[tokio::test]
    async fn remove_by_token_maps_database_errors() {
        let user_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[token_model(Uuid::new_v4(), user_id, "token-1")]])
            .append_exec_errors([DbErr::Custom("delete failed".to_string())])
            .into_connection();
        let dao = RefreshTokenDao::new(&db);

        let err = dao
            .remove_by_token("token-1")
            .await
            .expect_err("delete should fail");
        assert!(matches!(err, DaoLayerError::Db(_)));
    }
}
