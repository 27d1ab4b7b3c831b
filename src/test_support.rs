//! Shared builders for unit tests over the in-memory store.

use crate::access::Actor;
use crate::identity::domain::{
    EmailAddress, NewUser, PasswordHash, Role, RoleSet, User, UserId, UserName,
};
use crate::project::domain::{MemberSet, NewProject, Project};
use crate::schedule::DateRange;
use crate::store::InMemoryDatabase;
use crate::task::domain::{NewTask, Task};
use crate::validation::{Description, Title};
use chrono::NaiveDate;
use mockable::DefaultClock;

pub(crate) fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("valid test date")
}

pub(crate) fn range(start: &str, end: &str) -> DateRange {
    DateRange::new(date(start), date(end)).expect("valid test range")
}

/// Inserts an active account straight into the store.
pub(crate) fn seed_user(database: &InMemoryDatabase, name: &str, roles: &[Role]) -> User {
    let user = User::new(
        NewUser {
            name: UserName::new(name).expect("valid name"),
            email: EmailAddress::new(format!("{}@example.com", name.to_lowercase()))
                .expect("valid email"),
            password_hash: PasswordHash::new("$argon2id$stub"),
            phone: None,
            is_active: true,
            roles: roles.iter().copied().collect::<RoleSet>(),
        },
        &DefaultClock,
    );
    database
        .write()
        .expect("store lock")
        .users
        .insert(user.id(), user.clone());
    user
}

pub(crate) fn seed_actor(database: &InMemoryDatabase, name: &str, roles: &[Role]) -> Actor {
    Actor::from(&seed_user(database, name, roles))
}

/// Inserts a January 2025 project straight into the store.
pub(crate) fn seed_project(
    database: &InMemoryDatabase,
    created_by: UserId,
    members: &[UserId],
) -> Project {
    let project = Project::new(
        NewProject {
            title: Title::new("Launch").expect("valid title"),
            description: Description::new("Ship the launch").expect("valid description"),
            schedule: range("2025-01-01", "2025-01-31"),
            members: MemberSet::new(members.iter().copied()).expect("members given"),
            created_by,
        },
        &DefaultClock,
    );
    database
        .write()
        .expect("store lock")
        .projects
        .insert(project.id(), project.clone());
    project
}

/// Inserts a task spanning 5 to 10 January 2025 straight into the store.
pub(crate) fn seed_task(
    database: &InMemoryDatabase,
    project: &Project,
    assigned_to: UserId,
    created_by: UserId,
) -> Task {
    let task = Task::new(
        NewTask {
            title: Title::new("Draft brief").expect("valid title"),
            description: Description::new("First pass").expect("valid description"),
            schedule: range("2025-01-05", "2025-01-10"),
            project_id: project.id(),
            assigned_to,
            created_by,
        },
        &DefaultClock,
    );
    database
        .write()
        .expect("store lock")
        .tasks
        .insert(task.id(), task.clone());
    task
}
