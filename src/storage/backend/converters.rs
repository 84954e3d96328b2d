use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;

use crate::storage::{LinkRecord, NewLink, NewUser, Namespace, UserRecord};
use migration::entities::{link, user};

/// 将 Sea-ORM Model 转换为 LinkRecord
pub fn model_to_link(model: link::Model) -> LinkRecord {
    LinkRecord {
        id: model.id,
        owner_id: model.owner_id,
        namespace: model.namespace,
        original_url: model.original_url,
        code: model.short_code,
        visit_count: model.visit_count.max(0) as u64,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

pub fn model_to_user(model: user::Model) -> UserRecord {
    UserRecord {
        id: model.id,
        email: model.email,
        username: model.username,
        namespace: model.namespace,
        password_hash: model.password_hash,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

/// 新链接的 ActiveModel，计数从 0 开始
pub fn new_link_to_active_model(
    id: &str,
    link: &NewLink,
    now: DateTime<Utc>,
) -> link::ActiveModel {
    link::ActiveModel {
        id: Set(id.to_string()),
        owner_id: Set(link.owner_id.clone()),
        namespace: Set(link.namespace.as_str().to_string()),
        original_url: Set(link.original_url.clone()),
        short_code: Set(link.code.clone()),
        visit_count: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

pub fn new_user_to_active_model(
    id: &str,
    new_user: &NewUser,
    now: DateTime<Utc>,
) -> user::ActiveModel {
    user::ActiveModel {
        id: Set(id.to_string()),
        email: Set(new_user.email.clone()),
        username: Set(new_user.username.clone()),
        namespace: Set(Namespace::for_email(&new_user.email).as_str().to_string()),
        password_hash: Set(new_user.password_hash.clone()),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue;

    fn sample_new_link() -> NewLink {
        NewLink {
            owner_id: "u1".to_string(),
            namespace: Namespace::for_email("a@b.c"),
            original_url: "https://example.com".to_string(),
            code: "abc123".to_string(),
        }
    }

    #[test]
    fn test_new_link_starts_with_zero_visits() {
        let now = Utc::now();
        let active = new_link_to_active_model("id-1", &sample_new_link(), now);

        assert!(matches!(active.visit_count, ActiveValue::Set(0)));
        assert!(matches!(active.short_code, ActiveValue::Set(ref c) if c == "abc123"));
        assert!(matches!(active.namespace, ActiveValue::Set(ref ns) if ns == "urls_a_b_c"));
        assert!(matches!(active.created_at, ActiveValue::Set(t) if t == now));
        assert!(matches!(active.updated_at, ActiveValue::Set(t) if t == now));
    }

    #[test]
    fn test_model_to_link_clamps_negative_count() {
        let now = Utc::now();
        let model = link::Model {
            id: "id-1".to_string(),
            owner_id: "u1".to_string(),
            namespace: "urls_a_b_c".to_string(),
            original_url: "https://example.com".to_string(),
            short_code: "abc123".to_string(),
            visit_count: -3,
            created_at: now,
            updated_at: now,
        };

        let record = model_to_link(model);
        assert_eq!(record.visit_count, 0);
        assert_eq!(record.code, "abc123");
    }

    #[test]
    fn test_user_namespace_derived_from_email() {
        let new_user = NewUser {
            email: "bob@example.com".to_string(),
            username: "bob".to_string(),
            password_hash: "hash".to_string(),
        };
        let active = new_user_to_active_model("u1", &new_user, Utc::now());
        assert!(matches!(
            active.namespace,
            ActiveValue::Set(ref ns) if ns == "urls_bob_example_com"
        ));
    }
}
