//! Shared wiring and environment guards for integration tests.

use std::env;
use std::ffi::OsString;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use eyre::WrapErr;
use mockable::DefaultClock;
use workboard::access::Actor;
use workboard::attachment::{
    adapters::{memory::InMemoryAttachmentRepository, storage::InMemoryFileStorage},
    services::AttachmentService,
};
use workboard::config::UploadConfig;
use workboard::identity::{
    adapters::{memory::InMemoryUserRepository, password::Argon2PasswordHasher},
    domain::{EmailAddress, NewUser, PasswordHash, Role, User, UserId, UserName},
    ports::UserRepository,
    services::UserDirectoryService,
};
use workboard::project::{
    adapters::memory::InMemoryProjectRepository,
    domain::Project,
    services::{CreateProjectRequest, ProjectService},
};
use workboard::store::InMemoryDatabase;
use workboard::task::{
    adapters::memory::InMemoryTaskRepository, domain::Task, services::CreateTaskRequest,
    services::TaskService,
};

/// Account service over the in-memory store.
pub type Directory =
    UserDirectoryService<InMemoryUserRepository, Argon2PasswordHasher, DefaultClock>;
/// Project service over the in-memory store.
pub type Projects = ProjectService<InMemoryProjectRepository, InMemoryUserRepository, DefaultClock>;
/// Task service over the in-memory store.
pub type Tasks = TaskService<
    InMemoryTaskRepository,
    InMemoryProjectRepository,
    InMemoryUserRepository,
    DefaultClock,
>;
/// Attachment service over the in-memory store.
pub type Attachments = AttachmentService<
    InMemoryAttachmentRepository,
    InMemoryFileStorage,
    InMemoryProjectRepository,
    InMemoryTaskRepository,
    DefaultClock,
>;

/// Every service wired to one shared in-memory store.
pub struct Workspace {
    pub users: Arc<InMemoryUserRepository>,
    pub directory: Directory,
    pub projects: Projects,
    pub tasks: Tasks,
    pub attachments: Attachments,
    pub storage: Arc<InMemoryFileStorage>,
}

impl Workspace {
    /// Builds a workspace with default upload limits.
    #[must_use]
    pub fn new() -> Self {
        let database = InMemoryDatabase::new();
        let users = Arc::new(InMemoryUserRepository::new(database.clone()));
        let projects = Arc::new(InMemoryProjectRepository::new(database.clone()));
        let tasks = Arc::new(InMemoryTaskRepository::new(database.clone()));
        let storage = Arc::new(InMemoryFileStorage::new());
        let clock = Arc::new(DefaultClock);

        Self {
            directory: UserDirectoryService::new(
                Arc::clone(&users),
                Arc::new(Argon2PasswordHasher::new()),
                Arc::clone(&clock),
            ),
            projects: ProjectService::new(
                Arc::clone(&projects),
                Arc::clone(&users),
                Arc::clone(&clock),
            ),
            tasks: TaskService::new(
                Arc::clone(&tasks),
                Arc::clone(&projects),
                Arc::clone(&users),
                Arc::clone(&clock),
            ),
            attachments: AttachmentService::new(
                Arc::new(InMemoryAttachmentRepository::new(database)),
                Arc::clone(&storage),
                projects,
                tasks,
                clock,
                &UploadConfig::default(),
            ),
            users,
            storage,
        }
    }

    /// Stores an active account directly and returns it as an actor.
    ///
    /// The password hash is a placeholder; use the directory service when a
    /// test needs to log in.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or the store rejects it.
    pub async fn seed_user(&self, name: &str, roles: &[Role]) -> eyre::Result<Actor> {
        let user = User::new(
            NewUser {
                name: UserName::new(name)?,
                email: EmailAddress::new(format!("{}@example.com", name.to_lowercase()))?,
                password_hash: PasswordHash::new("$argon2id$placeholder"),
                phone: None,
                is_active: true,
                roles: roles.iter().copied().collect(),
            },
            &DefaultClock,
        );
        self.users
            .store(&user)
            .await
            .wrap_err_with(|| format!("seed user {name}"))?;
        Ok(Actor::from(&user))
    }

    /// Creates a project through the service.
    ///
    /// # Errors
    ///
    /// Returns an error if the service rejects the project.
    pub async fn create_project(
        &self,
        actor: &Actor,
        (start_date, end_date): (&str, &str),
        members: &[UserId],
    ) -> eyre::Result<Project> {
        let request = CreateProjectRequest {
            title: "Quarterly report".to_owned(),
            description: "Collect figures and publish".to_owned(),
            start_date: start_date.to_owned(),
            end_date: end_date.to_owned(),
            users: members.to_vec(),
        };
        self.projects
            .create(actor, request)
            .await
            .wrap_err("create project")
    }

    /// Creates a task through the service.
    ///
    /// # Errors
    ///
    /// Returns an error if the service rejects the task.
    pub async fn create_task(
        &self,
        actor: &Actor,
        project: &Project,
        assignee: UserId,
        dates: (&str, &str),
    ) -> eyre::Result<Task> {
        self.tasks
            .create(actor, task_request(project, assignee, dates))
            .await
            .wrap_err("create task")
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a task request inside `project`.
#[must_use]
pub fn task_request(
    project: &Project,
    assignee: UserId,
    (start_date, end_date): (&str, &str),
) -> CreateTaskRequest {
    CreateTaskRequest {
        title: "Gather figures".to_owned(),
        description: "From every department".to_owned(),
        start_date: start_date.to_owned(),
        end_date: end_date.to_owned(),
        project_id: project.id(),
        assigned_user_id: assignee,
    }
}

static ENV_MUTEX: OnceLock<Mutex<()>> = OnceLock::new();

/// Guard that applies a scoped environment variable update.
pub struct EnvVarGuard {
    previous: Vec<(OsString, Option<OsString>)>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvVarGuard {
    /// Sets multiple environment variables for the guard lifetime.
    pub fn set_many(changes: &[(OsString, Option<OsString>)]) -> Self {
        let lock = env_lock();
        let mut previous = Vec::with_capacity(changes.len());

        for (key, value) in changes {
            previous.push((key.clone(), env::var_os(key)));
            unsafe {
                // SAFETY: the global mutex serializes environment mutations in tests.
                match value {
                    Some(new_value) => env::set_var(key, new_value),
                    None => env::remove_var(key),
                }
            }
        }

        Self {
            previous,
            _lock: lock,
        }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        for (key, value) in self.previous.drain(..) {
            unsafe {
                // SAFETY: the global mutex serializes environment mutations in tests.
                match value {
                    Some(previous) => env::set_var(&key, &previous),
                    None => env::remove_var(&key),
                }
            }
        }
    }
}

fn env_lock() -> MutexGuard<'static, ()> {
    ENV_MUTEX
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}
