//! Service orchestration tests for account administration.

use std::sync::Arc;

use crate::access::{AccessError, Actor};
use crate::identity::{
    adapters::{memory::InMemoryUserRepository, password::Argon2PasswordHasher},
    domain::{Role, UserId},
    ports::{MockPasswordHasher, PasswordHashError, UserRepository},
    services::{
        CreateUserRequest, UpdateProfileRequest, UpdateUserRequest, UserDirectoryError,
        UserDirectoryService,
    },
};
use crate::pagination::PageRequest;
use crate::store::InMemoryDatabase;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestService =
    UserDirectoryService<InMemoryUserRepository, Argon2PasswordHasher, DefaultClock>;

struct Harness {
    service: TestService,
    repository: Arc<InMemoryUserRepository>,
    admin: Actor,
}

fn request(name: &str, email: &str, roles: &[&str]) -> CreateUserRequest {
    CreateUserRequest {
        name: name.to_owned(),
        email: email.to_owned(),
        password: "s3cret-pass".to_owned(),
        password_confirmation: "s3cret-pass".to_owned(),
        phone: None,
        is_active: None,
        roles: roles.iter().map(|label| (*label).to_owned()).collect(),
    }
}

#[fixture]
async fn harness() -> Harness {
    let repository = Arc::new(InMemoryUserRepository::new(InMemoryDatabase::new()));
    let service = UserDirectoryService::new(
        Arc::clone(&repository),
        Arc::new(Argon2PasswordHasher::new()),
        Arc::new(DefaultClock),
    );
    let bootstrap = Actor::new(
        UserId::new(),
        [Role::Administrator].into_iter().collect(),
        true,
    );
    let admin_user = service
        .create(&bootstrap, request("Root", "root@example.com", &["Administrador"]))
        .await
        .expect("bootstrap admin is created");
    Harness {
        service,
        repository,
        admin: Actor::from(&admin_user),
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_defaults_to_active_and_hashes_password(#[future] harness: Harness) {
    let ctx = harness.await;
    let user = ctx
        .service
        .create(
            &ctx.admin,
            request("Marta", "Marta@Example.com", &["Responsable de tarea"]),
        )
        .await
        .expect("user is created");

    assert!(user.is_active());
    assert_eq!(user.email().as_str(), "marta@example.com");
    assert_ne!(user.password_hash().as_str(), "s3cret-pass");
    let verified = ctx
        .service
        .verify_credentials("marta@example.com", "s3cret-pass")
        .await
        .expect("credentials verify");
    assert_eq!(verified.id(), user.id());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_collects_every_field_error(#[future] harness: Harness) {
    let ctx = harness.await;
    let mut invalid = request("", "not-an-email", &[]);
    invalid.password = "short".to_owned();
    invalid.password_confirmation = "different".to_owned();
    invalid.phone = Some("0".repeat(21));

    let Err(UserDirectoryError::Validation(errors)) =
        ctx.service.create(&ctx.admin, invalid).await
    else {
        panic!("expected validation failure");
    };

    for field in ["name", "email", "password", "phone", "roles"] {
        assert!(errors.contains(field), "{field} should be flagged");
    }
    assert_eq!(errors.get("password").map(<[String]>::len), Some(2));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_rejects_unknown_role_label(#[future] harness: Harness) {
    let ctx = harness.await;
    let result = ctx
        .service
        .create(
            &ctx.admin,
            request("Eva", "eva@example.com", &["administrador"]),
        )
        .await;

    let Err(UserDirectoryError::Validation(errors)) = result else {
        panic!("expected validation failure");
    };
    assert!(errors.contains("roles"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_rejects_duplicate_email(#[future] harness: Harness) {
    let ctx = harness.await;
    let result = ctx
        .service
        .create(
            &ctx.admin,
            request("Other root", "ROOT@example.com", &["Administrador"]),
        )
        .await;

    let Err(UserDirectoryError::Validation(errors)) = result else {
        panic!("expected validation failure");
    };
    assert!(errors.contains("email"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn non_admin_cannot_administer_accounts(#[future] harness: Harness) {
    let ctx = harness.await;
    let manager = ctx
        .service
        .create(
            &ctx.admin,
            request("Pablo", "pablo@example.com", &["Responsable de proyecto"]),
        )
        .await
        .expect("user is created");
    let actor = Actor::from(&manager);

    let result = ctx
        .service
        .list(&actor, None, PageRequest::default())
        .await;

    assert!(matches!(
        result,
        Err(UserDirectoryError::Access(AccessError::MissingRole {
            role: Role::Administrator,
            ..
        }))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_without_roles_clears_role_set(#[future] harness: Harness) {
    let ctx = harness.await;
    let user = ctx
        .service
        .create(
            &ctx.admin,
            request("Iker", "iker@example.com", &["Responsable de tarea"]),
        )
        .await
        .expect("user is created");

    let updated = ctx
        .service
        .update(
            &ctx.admin,
            user.id(),
            UpdateUserRequest {
                name: "Iker B.".to_owned(),
                email: "iker@example.com".to_owned(),
                phone: None,
                is_active: Some(false),
                roles: None,
            },
        )
        .await
        .expect("user is updated");

    assert!(updated.roles().is_empty());
    assert!(!updated.is_active());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn admin_cannot_delete_own_account(#[future] harness: Harness) {
    let ctx = harness.await;
    let result = ctx
        .service
        .delete(&ctx.admin, ctx.admin.user_id())
        .await;

    assert!(matches!(result, Err(UserDirectoryError::SelfDeletion(id)) if id == ctx.admin.user_id()));
    let still_there = ctx
        .repository
        .find_by_id(ctx.admin.user_id())
        .await
        .expect("lookup succeeds");
    assert!(still_there.is_some());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_unknown_user_is_not_found(#[future] harness: Harness) {
    let ctx = harness.await;
    let missing = UserId::new();
    let result = ctx.service.delete(&ctx.admin, missing).await;
    assert!(matches!(result, Err(UserDirectoryError::NotFound(id)) if id == missing));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn search_matches_name_or_email(#[future] harness: Harness) {
    let ctx = harness.await;
    for (name, email) in [
        ("Nora", "nora@example.com"),
        ("Olga", "olga@sample.org"),
    ] {
        ctx
            .service
            .create(&ctx.admin, request(name, email, &["Responsable de tarea"]))
            .await
            .expect("user is created");
    }

    let by_email = ctx
        .service
        .list(&ctx.admin, Some("sample"), PageRequest::default())
        .await
        .expect("search succeeds");
    let by_name = ctx
        .service
        .list(&ctx.admin, Some("NOR"), PageRequest::default())
        .await
        .expect("search succeeds");

    assert_eq!(by_email.total(), 1);
    assert_eq!(by_email.items().first().map(|u| u.name().as_str()), Some("Olga"));
    assert_eq!(by_name.total(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn profile_update_rejects_email_of_another_account(#[future] harness: Harness) {
    let ctx = harness.await;
    let user = ctx
        .service
        .create(
            &ctx.admin,
            request("Sara", "sara@example.com", &["Responsable de tarea"]),
        )
        .await
        .expect("user is created");

    let result = ctx
        .service
        .update_profile(
            &Actor::from(&user),
            UpdateProfileRequest {
                name: "Sara".to_owned(),
                email: "root@example.com".to_owned(),
                phone: None,
            },
        )
        .await;

    let Err(UserDirectoryError::Validation(errors)) = result else {
        panic!("expected validation failure");
    };
    assert!(errors.contains("email"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn disabled_account_fails_credential_check(#[future] harness: Harness) {
    let ctx = harness.await;
    let mut disabled = request("Tomás", "tomas@example.com", &["Responsable de tarea"]);
    disabled.is_active = Some(false);
    ctx
        .service
        .create(&ctx.admin, disabled)
        .await
        .expect("user is created");

    let result = ctx
        .service
        .verify_credentials("tomas@example.com", "s3cret-pass")
        .await;
    assert!(matches!(result, Err(UserDirectoryError::InvalidCredentials)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn hashing_failure_is_surfaced() {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .returning(|_| Err(PasswordHashError::Hash("backend offline".to_owned())));
    let service = UserDirectoryService::new(
        Arc::new(InMemoryUserRepository::new(InMemoryDatabase::new())),
        Arc::new(hasher),
        Arc::new(DefaultClock),
    );
    let admin = Actor::new(
        UserId::new(),
        [Role::Administrator].into_iter().collect(),
        true,
    );

    let result = service
        .create(&admin, request("Uma", "uma@example.com", &["Administrador"]))
        .await;

    assert!(matches!(
        result,
        Err(UserDirectoryError::Password(PasswordHashError::Hash(_)))
    ));
}
