//! Authorisation policies for mutations and direct-object access.
//!
//! Each function returns `Ok(())` or the [`AccessError`] to surface. None of
//! them check that the actor is enabled; services call [`ensure_active`]
//! first.

use super::{AccessError, Action, Actor, Visibility};
use crate::attachment::domain::Attachment;
use crate::identity::domain::Role;
use crate::project::domain::{MemberSet, Project};
use crate::task::domain::Task;

/// Refuses disabled accounts.
///
/// # Errors
///
/// Returns [`AccessError::AccountDisabled`] when the actor is inactive.
pub const fn ensure_active(actor: &Actor) -> Result<(), AccessError> {
    if actor.is_active() {
        Ok(())
    } else {
        Err(AccessError::AccountDisabled(actor.user_id()))
    }
}

/// Requires the actor to hold `role`.
///
/// # Errors
///
/// Returns [`AccessError::MissingRole`] when the role is absent.
pub fn require_role(actor: &Actor, role: Role) -> Result<(), AccessError> {
    if actor.has_role(role) {
        Ok(())
    } else {
        Err(AccessError::MissingRole {
            user_id: actor.user_id(),
            role,
        })
    }
}

fn allow_if(actor: &Actor, allowed: bool, action: Action) -> Result<(), AccessError> {
    if allowed {
        Ok(())
    } else {
        Err(AccessError::Forbidden {
            user_id: actor.user_id(),
            action,
        })
    }
}

/// Administrators and project managers may create projects.
///
/// # Errors
///
/// Returns [`AccessError::Forbidden`] otherwise.
pub fn authorize_project_create(actor: &Actor) -> Result<(), AccessError> {
    let allowed = actor.is_admin() || actor.has_role(Role::ProjectManager);
    allow_if(actor, allowed, Action::CreateProject)
}

/// Visible projects may be viewed.
///
/// # Errors
///
/// Returns [`AccessError::Forbidden`] otherwise.
pub fn authorize_project_view(actor: &Actor, project: &Project) -> Result<(), AccessError> {
    let allowed = Visibility::for_actor(actor).admits_project(project);
    allow_if(actor, allowed, Action::ViewProject)
}

/// Administrators may edit any project; project managers and the creator
/// may edit projects visible to them.
///
/// # Errors
///
/// Returns [`AccessError::Forbidden`] otherwise.
pub fn authorize_project_update(actor: &Actor, project: &Project) -> Result<(), AccessError> {
    let visible = Visibility::for_actor(actor).admits_project(project);
    let manages = actor.has_role(Role::ProjectManager) || project.created_by() == actor.user_id();
    allow_if(
        actor,
        actor.is_admin() || (visible && manages),
        Action::UpdateProject,
    )
}

/// Administrators and the creator may delete a project.
///
/// # Errors
///
/// Returns [`AccessError::Forbidden`] otherwise.
pub fn authorize_project_delete(actor: &Actor, project: &Project) -> Result<(), AccessError> {
    let allowed = actor.is_admin() || project.created_by() == actor.user_id();
    allow_if(actor, allowed, Action::DeleteProject)
}

/// Administrators and project members may create tasks in a project.
///
/// # Errors
///
/// Returns [`AccessError::Forbidden`] otherwise.
pub fn authorize_task_create(actor: &Actor, project: &Project) -> Result<(), AccessError> {
    let allowed = actor.is_admin() || project.is_member(actor.user_id());
    allow_if(actor, allowed, Action::CreateTask)
}

/// Visible tasks may be viewed.
///
/// # Errors
///
/// Returns [`AccessError::Forbidden`] otherwise.
pub fn authorize_task_view(
    actor: &Actor,
    task: &Task,
    project_members: &MemberSet,
) -> Result<(), AccessError> {
    let allowed = Visibility::for_actor(actor).admits_task(task, project_members);
    allow_if(actor, allowed, Action::ViewTask)
}

/// Moving a task into another project needs the same standing as creating
/// one there.
///
/// # Errors
///
/// Returns [`AccessError::Forbidden`] unless the actor is an administrator or
/// a member of `target`.
pub fn authorize_task_move(actor: &Actor, target: &Project) -> Result<(), AccessError> {
    let allowed = actor.is_admin() || target.is_member(actor.user_id());
    allow_if(actor, allowed, Action::UpdateTask)
}

/// Visible tasks may be edited, fully or status only.
///
/// # Errors
///
/// Returns [`AccessError::Forbidden`] otherwise.
pub fn authorize_task_update(
    actor: &Actor,
    task: &Task,
    project_members: &MemberSet,
    action: Action,
) -> Result<(), AccessError> {
    let allowed = Visibility::for_actor(actor).admits_task(task, project_members);
    allow_if(actor, allowed, action)
}

/// Administrators, the creator, and project managers who are members of the
/// parent project may delete a task.
///
/// # Errors
///
/// Returns [`AccessError::Forbidden`] otherwise.
pub fn authorize_task_delete(
    actor: &Actor,
    task: &Task,
    project_members: &MemberSet,
) -> Result<(), AccessError> {
    let manages_project =
        actor.has_role(Role::ProjectManager) && project_members.contains(actor.user_id());
    let allowed = actor.is_admin() || task.created_by() == actor.user_id() || manages_project;
    allow_if(actor, allowed, Action::DeleteTask)
}

/// Administrators, members and the creator may attach files to a project.
///
/// # Errors
///
/// Returns [`AccessError::Forbidden`] otherwise.
pub fn authorize_project_attach(actor: &Actor, project: &Project) -> Result<(), AccessError> {
    let allowed = Visibility::for_actor(actor).admits_project(project)
        || project.created_by() == actor.user_id();
    allow_if(actor, allowed, Action::AttachFile)
}

/// Files may be attached to visible tasks.
///
/// # Errors
///
/// Returns [`AccessError::Forbidden`] otherwise.
pub fn authorize_task_attach(
    actor: &Actor,
    task: &Task,
    project_members: &MemberSet,
) -> Result<(), AccessError> {
    let allowed = Visibility::for_actor(actor).admits_task(task, project_members);
    allow_if(actor, allowed, Action::AttachFile)
}

/// Administrators and the uploader may delete an attachment.
///
/// # Errors
///
/// Returns [`AccessError::Forbidden`] otherwise.
pub fn authorize_attachment_delete(
    actor: &Actor,
    attachment: &Attachment,
) -> Result<(), AccessError> {
    let allowed = actor.is_admin() || attachment.uploaded_by() == actor.user_id();
    allow_if(actor, allowed, Action::DeleteAttachment)
}
