//! Shared fixtures for the HTTP-level tests.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::Duration;
use momentum_core::{Credential, CredentialStore, Gateway, MemoryStore};
use serde_json::{json, Value};

pub const TOKEN: &str = "tok-abc";

pub fn user_json(id: &str, is_premium: bool) -> Value {
    json!({
        "id": id,
        "email": "ana@example.com",
        "username": "ana",
        "is_premium": is_premium,
        "created_at": "2024-05-01T10:00:00Z",
        "updated_at": "2024-05-01T10:00:00Z"
    })
}

pub fn step_json(id: &str, goal_id: &str, is_completed: bool) -> Value {
    json!({
        "id": id,
        "title": format!("Step {id}"),
        "description": null,
        "is_completed": is_completed,
        "goal_id": goal_id,
        "created_at": "2024-05-01T10:00:00Z",
        "updated_at": "2024-05-01T10:00:00Z"
    })
}

pub fn goal_json(id: &str, total_steps: i64, completed_steps: i64) -> Value {
    json!({
        "id": id,
        "title": format!("Goal {id}"),
        "description": "",
        "total_steps": total_steps,
        "completed_steps": completed_steps,
        "progress": 0,
        "user_id": "u-1",
        "created_at": "2024-05-01T10:00:00Z",
        "updated_at": "2024-05-01T10:00:00Z",
        "steps": []
    })
}

pub fn auth_json(token: &str) -> Value {
    json!({
        "access_token": token,
        "token_type": "bearer",
        "user": user_json("u-1", false)
    })
}

pub fn rewards_json() -> Value {
    json!({
        "user_id": "u-1",
        "total_points": 120,
        "current_streak": 3,
        "longest_streak": 9,
        "badges": [
            {
                "id": "b-1",
                "name": "First Steps",
                "description": "Completed your first goal",
                "icon": "🎯",
                "type": "bronze",
                "earned_at": "2024-05-02T10:00:00Z"
            },
            {
                "id": "b-2",
                "name": "Consistency King",
                "description": "30-day streak",
                "icon": "👑",
                "type": "gold"
            }
        ]
    })
}

pub fn signed_in_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with(Credential::issue(TOKEN, "bearer", Duration::days(7))))
}

pub fn gateway(url: &str, store: Arc<MemoryStore>) -> Gateway {
    let store: Arc<dyn CredentialStore> = store;
    Gateway::new(url, store).unwrap()
}

pub fn bearer() -> String {
    format!("Bearer {TOKEN}")
}
