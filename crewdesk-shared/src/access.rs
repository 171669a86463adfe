/// Access control
///
/// Every visibility/mutation decision in the system goes through the
/// predicates in this module, so the rules cannot drift between endpoints.
/// The admin role passes every project/task/comment check. Notifications
/// are the one exception: they are strictly recipient-only, so there is
/// no predicate for them beyond an id comparison in the handler.
///
/// # Rule summary
///
/// | Resource | View | Mutate |
/// |---|---|---|
/// | Project | member, creator, admin | creator, admin |
/// | Task | project view, or assignee | task creator, project creator, admin; assignee may change status only |
/// | Comment | parent task's view rule | delete: author, admin |
///
/// The assignee's status-only path is enforced in the task handler (it
/// depends on payload shape, not just identities); everything else is a
/// pure function of (user, resource).

use uuid::Uuid;

use crate::models::{Comment, Project, Task, User};

/// Whether the user may view a project and its enriched detail
pub fn can_view_project(user: &User, project: &Project) -> bool {
    user.is_admin() || project.has_member(user.id) || project.created_by == user.id
}

/// Whether the user may update or delete a project
pub fn can_manage_project(user: &User, project: &Project) -> bool {
    user.is_admin() || project.created_by == user.id
}

/// Whether the user may view a task (and its comments)
pub fn can_view_task(user: &User, project: &Project, task: &Task) -> bool {
    can_view_project(user, project) || task.assigned_to == Some(user.id)
}

/// Whether the user may edit every task field, or delete the task
///
/// Assignees not covered here may still change the status; that single
/// carve-out is handled at the payload level by the task handler.
pub fn can_edit_task(user: &User, project: &Project, task: &Task) -> bool {
    user.is_admin() || task.created_by == user.id || project.created_by == user.id
}

/// Whether the user may delete a comment
pub fn can_delete_comment(user: &User, comment: &Comment) -> bool {
    user.is_admin() || comment.author_id == user.id
}

/// Whether a user id is assignable on tasks of this project
///
/// Valid assignees are project team members and the project creator.
/// Checked for every actor, admins included, before any write.
pub fn is_valid_assignee(project: &Project, user_id: Uuid) -> bool {
    project.has_member(user_id) || project.created_by == user_id
}

/// Ids from `requested` that did not resolve to a user
///
/// Used to reject membership updates atomically: one unknown id fails the
/// whole write.
pub fn missing_user_ids(requested: &[Uuid], found: &[User]) -> Vec<Uuid> {
    requested
        .iter()
        .filter(|id| !found.iter().any(|u| u.id == **id))
        .copied()
        .collect()
}
