use crate::domain::order::Order;
use crate::domain::repository::OrderRepository;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct InMemoryOrderRepository {
    storage: Arc<RwLock<HashMap<String, Order>>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryOrderRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn save_order(&self, order: Order) -> Result<()> {
        let mut storage = self.storage.write().await;
        storage.insert(order.id.clone(), order);
        Ok(())
    }

    async fn find_order_by_id(&self, id: &str) -> Result<Option<Order>> {
        let storage = self.storage.read().await;
        Ok(storage.get(id).cloned())
    }
}
