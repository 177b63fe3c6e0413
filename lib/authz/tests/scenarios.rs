//! End-to-end decisions for concrete actors and records.

use amber_lantern_authz::{
    Action, Actor, App, AuthzConfig, EntityType, PolicyRegistry, Resource, Target, User,
};
use amber_lantern_core::UserId;
use ulid::Ulid;

fn uid(n: u128) -> UserId {
    UserId::from_ulid(Ulid::from(n))
}

fn registry() -> PolicyRegistry {
    PolicyRegistry::from_config(&AuthzConfig::default()).expect("default config is valid")
}

/// Decisions for create, read, update and delete, in that order.
fn crud(registry: &PolicyRegistry, actor: &Actor, resource: &Resource) -> [bool; 4] {
    Action::ALL.map(|action| {
        let target = if action == Action::Create {
            Target::NoInstance
        } else {
            Target::Instance(resource)
        };
        registry
            .is_authorized(actor, action, resource.entity_type(), target)
            .expect("well-formed check")
    })
}

#[test]
fn anonymous_visitor_can_only_read_an_app() {
    let app = Resource::from(App::new(uid(42), "survey"));
    assert_eq!(
        crud(&registry(), &Actor::anonymous(), &app),
        [false, true, false, false]
    );
}

#[test]
fn owner_can_update_and_delete_their_app() {
    let app = Resource::from(App::new(uid(7), "survey"));
    let [_, _, update, delete] = crud(&registry(), &Actor::user(uid(7)), &app);
    assert!(update);
    assert!(delete);
}

#[test]
fn non_owner_cannot_update_or_delete_an_app() {
    let app = Resource::from(App::new(uid(99), "survey"));
    let [_, _, update, delete] = crud(&registry(), &Actor::user(uid(7)), &app);
    assert!(!update);
    assert!(!delete);
}

#[test]
fn admin_manages_user_accounts() {
    let account = Resource::from(User::new(uid(5), "ada", false));
    assert_eq!(
        crud(&registry(), &Actor::admin(uid(1)), &account),
        [true, true, true, true]
    );
}

#[test]
fn regular_user_cannot_manage_accounts() {
    let registry = registry();
    let actor = Actor::user(uid(2));
    let someone_else = Resource::from(User::new(uid(5), "ada", false));
    let own_account = Resource::from(User::new(uid(2), "grace", false));

    assert_eq!(crud(&registry, &actor, &someone_else), [false, true, false, false]);
    assert_eq!(crud(&registry, &actor, &own_account), [false, true, false, false]);
}

#[test]
fn denied_anonymous_and_denied_user_map_to_different_statuses() {
    let registry = registry();
    let app = Resource::from(App::new(uid(42), "survey"));

    let unauthenticated = registry
        .ensure_authorized(&Actor::anonymous(), Action::Update, EntityType::App, (&app).into())
        .unwrap_err();
    let forbidden = registry
        .ensure_authorized(&Actor::user(uid(7)), Action::Update, EntityType::App, (&app).into())
        .unwrap_err();

    assert!(unauthenticated.to_string().contains("not authenticated"));
    assert!(forbidden.to_string().contains("lacks permission"));
}

#[test]
fn registry_limited_by_config_rejects_other_types() {
    let config = AuthzConfig {
        entity_types: vec!["user".to_string()],
    };
    let registry = PolicyRegistry::from_config(&config).expect("valid config");
    let result = registry.is_authorized(
        &Actor::admin(uid(1)),
        Action::Read,
        EntityType::App,
        Target::NoInstance,
    );
    assert!(result.is_err());
}
