use sea_orm::{ColumnTrait, DatabaseConnection, Order, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult};
use crate::db::entities::{prelude::User, user};

#[derive(Clone)]
pub struct UserDao {
    db: DatabaseConnection,
}

impl DaoBase for UserDao {
    type Entity = User;

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl UserDao {
    pub async fn find_by_email(&self, email: &str) -> DaoResult<Option<user::Model>> {
        let email = email.to_string();
        self.find(1, 1, None, move |query| {
            query.filter(user::Column::Email.eq(email))
        })
        .await
        .map(|response| response.data.into_iter().next())
    }

    pub async fn find_by_activation_link(&self, link: &str) -> DaoResult<Option<user::Model>> {
        let link = link.to_string();
        self.find(1, 1, None, move |query| {
            query.filter(user::Column::ActivationLink.eq(link))
        })
        .await
        .map(|response| response.data.into_iter().next())
    }

    pub async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        activation_link: &str,
    ) -> DaoResult<user::Model> {
        let model = user::ActiveModel {
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            is_activated: Set(false),
            activation_link: Set(activation_link.to_string()),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn set_activated(&self, id: &Uuid) -> DaoResult<user::Model> {
        self.update(*id, |active| {
            active.is_activated = Set(true);
        })
        .await
    }

    /// Every user, oldest first.
    pub async fn list_all(&self) -> DaoResult<Vec<user::Model>> {
        let mut users = Vec::new();
        let mut page = 1;
        loop {
            let response = self
                .find(
                    page,
                    Self::MAX_PAGE_SIZE,
                    Some((user::Column::CreatedAt, Order::Asc)),
                    |query| query,
                )
                .await?;
            users.extend(response.data);
            if !response.has_next {
                return Ok(users);
            }
            page += 1;
        }
    }
}
