use crate::domain::order::Order;
use crate::domain::user::User;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn save_user(&self, user: User) -> Result<()>;
    async fn update_user(&self, user: User) -> Result<()>;
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn save_order(&self, order: Order) -> Result<()>;
    async fn find_order_by_id(&self, id: &str) -> Result<Option<Order>>;
}
