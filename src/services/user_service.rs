use uuid::Uuid;

use crate::{
    db::dao::{DaoBase, DaoLayerError, UserDao},
    db::entities::user,
    error::AppError,
};

#[derive(Clone)]
pub struct UserService {
    user_dao: UserDao,
}

impl UserService {
    pub fn new(user_dao: UserDao) -> Self {
        Self { user_dao }
    }

    pub async fn find_by_id(&self, id: &Uuid) -> Result<Option<user::Model>, AppError> {
        match self.user_dao.find_by_id(*id).await {
            Ok(model) => Ok(Some(model)),
            Err(DaoLayerError::NotFound { .. }) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, AppError> {
        Ok(self.user_dao.find_by_email(email).await?)
    }

    pub async fn find_by_activation_link(
        &self,
        link: &str,
    ) -> Result<Option<user::Model>, AppError> {
        Ok(self.user_dao.find_by_activation_link(link).await?)
    }

    pub async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        activation_link: &str,
    ) -> Result<user::Model, AppError> {
        match self
            .user_dao
            .create_user(email, password_hash, activation_link)
            .await
        {
            Ok(model) => Ok(model),
            Err(DaoLayerError::Conflict { .. }) => Err(AppError::validation(format!(
                "User with email {email} already exists"
            ))),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn activate(&self, id: &Uuid) -> Result<user::Model, AppError> {
        Ok(self.user_dao.set_activated(id).await?)
    }

    pub async fn delete(&self, id: &Uuid) -> Result<(), AppError> {
        self.user_dao.delete(*id).await?;
        Ok(())
    }

    pub async fn list_all(&self) -> Result<Vec<user::Model>, AppError> {
        Ok(self.user_dao.list_all().await?)
    }
}
