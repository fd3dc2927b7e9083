//! Shared fixtures for service unit tests.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::config::Config;
use crate::domain::{Gender, Password, Product, User, UserState};
use crate::infra::{
    MockProductRepository, MockUserRepository, ProductRepository, UnitOfWork, UserRepository,
};

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only-32chars";

pub fn test_config() -> Config {
    let vars = HashMap::from([("JWT_SECRET".to_string(), TEST_SECRET.to_string())]);
    Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

pub fn sample_user(username: &str, password: &str) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        username: username.to_string(),
        nickname: username.to_string(),
        gender: Gender::Unknown,
        avatar: String::new(),
        cellphone: None,
        email: Some(format!("{}@example.com", username)),
        email_verified_at: None,
        password_hash: Password::new(password).unwrap().into_string(),
        state: UserState::Enabled,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

pub fn sample_product(id: Uuid, owner_id: Uuid) -> Product {
    let now = Utc::now();
    Product {
        id,
        owner_id,
        name: "Keyboard".to_string(),
        description: "Mechanical".to_string(),
        price_cents: 12900,
        stock: 3,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

/// Unit of work backed by mock repositories
pub struct TestUnitOfWork {
    users: Arc<MockUserRepository>,
    products: Arc<MockProductRepository>,
}

impl TestUnitOfWork {
    pub fn new(users: MockUserRepository, products: MockProductRepository) -> Self {
        Self {
            users: Arc::new(users),
            products: Arc::new(products),
        }
    }
}

impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.products.clone()
    }
}
