//! Entitlement resolver integration tests against the mock providers.

use chrono::{Duration, Utc};
use learngate_entitlements::lifecycle::CreateTicket;
use learngate_entitlements::mocks::{MockCatalog, MockNotificationSink, MockTicketStore};
use learngate_entitlements::{
    Content, ContentId, ContentLink, Course, CourseId, EntitlementError, EntitlementResolver,
    Environment, Package, PackageId, PackageType, Principal, Role, TicketLifecycle, UserId,
};

type TestEnv = Environment<MockTicketStore, MockCatalog, MockNotificationSink>;

fn user_principal() -> Principal {
    Principal {
        id: UserId::new(),
        role: Role::User,
        email: "learner@example.com".to_string(),
    }
}

fn admin_principal() -> Principal {
    Principal {
        id: UserId::new(),
        role: Role::Admin,
        email: "admin@example.com".to_string(),
    }
}

fn seed_env(package_type: PackageType) -> (TestEnv, CourseId, PackageId) {
    let catalog = MockCatalog::new();
    let course_id = CourseId::new();
    let package_id = PackageId::new();
    catalog.add_course(Course {
        id: course_id,
        title: "Calculus".to_string(),
        description: "Limits and integrals".to_string(),
        image: "https://cdn.example.com/calc.png".to_string(),
        packages: vec![],
    });
    catalog.add_package(Package {
        id: package_id,
        course_id,
        name: "Mock bundle".to_string(),
        price: 4900,
        start: Utc::now(),
        end: Utc::now() + Duration::days(90),
        package_type,
        mock_prices: vec![],
    });
    let env = Environment::new(MockTicketStore::new(), catalog, MockNotificationSink::new());
    (env, course_id, package_id)
}

fn add_content(
    env: &TestEnv,
    course_id: CourseId,
    package_id: PackageId,
    topic: &str,
    week_no: u32,
    lecture_no: u32,
) {
    env.catalog.add_content(Content {
        id: ContentId::new(),
        course_id,
        package_id,
        topic: topic.to_string(),
        week_no,
        lecture_no,
        link: ContentLink::Mock(format!("https://mocks.example.com/{week_no}/{lecture_no}")),
    });
}

async fn approve_purchase(
    env: &TestEnv,
    user: &Principal,
    course_id: CourseId,
    package_id: PackageId,
    mocks_purchased: u32,
) {
    let lifecycle = TicketLifecycle::new(env.clone());
    let created = lifecycle
        .create(
            user,
            CreateTicket {
                course_id,
                package_id,
                paid_through: "card".to_string(),
                price_paid: 4900,
                email: None,
                receipt: None,
                mocks_purchased: Some(mocks_purchased),
            },
        )
        .await
        .expect("create should succeed");
    lifecycle
        .approve(&admin_principal(), created.ticket.id)
        .await
        .expect("approve should succeed");
}

#[tokio::test]
async fn access_requires_an_approved_ticket() {
    let (env, course_id, package_id) = seed_env(PackageType::Standard);
    let resolver = EntitlementResolver::new(env.clone());
    let user = user_principal();

    assert!(!resolver
        .can_access(&user, course_id, package_id)
        .await
        .expect("query should succeed"));

    // A pending ticket is not enough.
    let lifecycle = TicketLifecycle::new(env.clone());
    let created = lifecycle
        .create(
            &user,
            CreateTicket {
                course_id,
                package_id,
                paid_through: "card".to_string(),
                price_paid: 4900,
                email: None,
                receipt: None,
                mocks_purchased: None,
            },
        )
        .await
        .expect("create should succeed");
    assert!(!resolver
        .can_access(&user, course_id, package_id)
        .await
        .expect("query should succeed"));

    lifecycle
        .approve(&admin_principal(), created.ticket.id)
        .await
        .expect("approve should succeed");
    assert!(resolver
        .can_access(&user, course_id, package_id)
        .await
        .expect("query should succeed"));
}

#[tokio::test]
async fn admins_always_have_access() {
    let (env, course_id, package_id) = seed_env(PackageType::Standard);
    let resolver = EntitlementResolver::new(env);

    assert!(resolver
        .can_access(&admin_principal(), course_id, package_id)
        .await
        .expect("query should succeed"));
}

#[tokio::test]
async fn listing_without_entitlement_is_forbidden() {
    let (env, course_id, package_id) = seed_env(PackageType::Standard);
    add_content(&env, course_id, package_id, "Week 1", 1, 1);
    let resolver = EntitlementResolver::new(env);

    let err = resolver
        .list_visible_content(&user_principal(), course_id, package_id)
        .await
        .expect_err("no ticket, no listing");
    assert_eq!(err, EntitlementError::Forbidden);
}

#[tokio::test]
async fn standard_packages_list_everything_in_stored_order() {
    let (env, course_id, package_id) = seed_env(PackageType::Standard);
    add_content(&env, course_id, package_id, "Intro", 1, 1);
    add_content(&env, course_id, package_id, "Derivatives", 2, 1);
    add_content(&env, course_id, package_id, "Integrals", 3, 1);
    add_content(&env, course_id, package_id, "Bonus", 1, 2);

    let user = user_principal();
    approve_purchase(&env, &user, course_id, package_id, 0).await;
    let resolver = EntitlementResolver::new(env);

    let visible = resolver
        .list_visible_content(&user, course_id, package_id)
        .await
        .expect("listing should succeed");
    let topics: Vec<_> = visible.iter().map(|c| c.topic.as_str()).collect();
    assert_eq!(topics, ["Intro", "Derivatives", "Integrals", "Bonus"]);
}

#[tokio::test]
async fn mock_packages_truncate_to_the_purchased_quota() {
    let (env, course_id, package_id) = seed_env(PackageType::Mock);
    // Insert out of order to make the sort observable.
    for week in (1..=10).rev() {
        add_content(&env, course_id, package_id, &format!("W{week}L2"), week, 2);
        add_content(&env, course_id, package_id, &format!("W{week}L1"), week, 1);
    }

    let user = user_principal();
    approve_purchase(&env, &user, course_id, package_id, 2).await;
    let resolver = EntitlementResolver::new(env);

    // 2 units purchased at 8 mocks per unit: the first 16 of 20.
    let visible = resolver
        .list_visible_content(&user, course_id, package_id)
        .await
        .expect("listing should succeed");
    assert_eq!(visible.len(), 16);
    assert_eq!(visible[0].topic, "W1L1");
    assert_eq!(visible[1].topic, "W1L2");
    assert_eq!(visible[15].topic, "W8L2");

    let keys: Vec<_> = visible.iter().map(|c| (c.week_no, c.lecture_no)).collect();
    let mut sorted = keys.clone();
    sorted.sort_unstable();
    assert_eq!(keys, sorted);
}

#[tokio::test]
async fn mock_packages_fall_back_to_the_free_tier() {
    let (env, course_id, package_id) = seed_env(PackageType::Mock);
    for week in 1..=12 {
        add_content(&env, course_id, package_id, &format!("W{week}"), week, 1);
    }

    let user = user_principal();
    approve_purchase(&env, &user, course_id, package_id, 0).await;
    let resolver = EntitlementResolver::new(env);

    let visible = resolver
        .list_visible_content(&user, course_id, package_id)
        .await
        .expect("listing should succeed");
    assert_eq!(visible.len(), 8);
    assert_eq!(visible[0].topic, "W1");
    assert_eq!(visible[7].topic, "W8");
}

#[tokio::test]
async fn quota_never_exceeds_the_item_count() {
    let (env, course_id, package_id) = seed_env(PackageType::Mock);
    for week in 1..=5 {
        add_content(&env, course_id, package_id, &format!("W{week}"), week, 1);
    }

    let user = user_principal();
    approve_purchase(&env, &user, course_id, package_id, 3).await;
    let resolver = EntitlementResolver::new(env);

    let visible = resolver
        .list_visible_content(&user, course_id, package_id)
        .await
        .expect("listing should succeed");
    assert_eq!(visible.len(), 5);
}

#[tokio::test]
async fn admins_see_the_full_mock_catalog() {
    let (env, course_id, package_id) = seed_env(PackageType::Mock);
    for week in 1..=12 {
        add_content(&env, course_id, package_id, &format!("W{week}"), week, 1);
    }
    let resolver = EntitlementResolver::new(env);

    let visible = resolver
        .list_visible_content(&admin_principal(), course_id, package_id)
        .await
        .expect("listing should succeed");
    assert_eq!(visible.len(), 12);
}

#[tokio::test]
async fn deleting_the_ticket_revokes_access_despite_the_cache() {
    let (env, course_id, package_id) = seed_env(PackageType::Standard);
    let user = user_principal();
    approve_purchase(&env, &user, course_id, package_id, 0).await;

    let lifecycle = TicketLifecycle::new(env.clone());
    let resolver = EntitlementResolver::new(env.clone());
    let admin = admin_principal();

    assert!(resolver
        .can_access(&user, course_id, package_id)
        .await
        .expect("query should succeed"));

    let tickets = lifecycle
        .list(&admin, Some(learngate_entitlements::TicketStatus::Approved))
        .await
        .expect("list should succeed");
    lifecycle
        .delete(&admin, tickets[0].ticket.id)
        .await
        .expect("delete should succeed");

    // The cache still lists the pair, but access decisions ignore it.
    use learngate_entitlements::providers::TicketStore;
    let cache = env
        .tickets
        .entitlement_cache(user.id)
        .await
        .expect("cache read");
    assert_eq!(cache.len(), 1);
    assert!(!resolver
        .can_access(&user, course_id, package_id)
        .await
        .expect("query should succeed"));
}

#[tokio::test]
async fn package_mismatch_is_not_found() {
    let (env, course_id, package_id) = seed_env(PackageType::Standard);
    let other_course = CourseId::new();
    env.catalog.add_course(Course {
        id: other_course,
        title: "Statistics".to_string(),
        description: "Distributions".to_string(),
        image: "https://cdn.example.com/stats.png".to_string(),
        packages: vec![],
    });
    let resolver = EntitlementResolver::new(env);

    // The package belongs to a different course.
    let err = resolver
        .list_visible_content(&admin_principal(), other_course, package_id)
        .await
        .expect_err("mismatched pair must not resolve");
    assert!(matches!(err, EntitlementError::NotFound { .. }));
}
