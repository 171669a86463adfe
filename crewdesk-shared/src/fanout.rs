/// Notification fanout
///
/// After a successful mutation, the handler describes what changed as a
/// [`ChangeEvent`] and [`plan`] turns it into the notification records to
/// persist. Planning is pure, with no store access, which keeps "what
/// changed" cleanly separated from "who gets told" and makes the target
/// rules directly testable.
///
/// The actor is excluded from every target set: you are never notified
/// about your own change. Repeated identical events always plan fresh
/// records; nothing is deduplicated. Persisting the planned batch is the
/// caller's job and is fire-and-forget relative to the primary mutation.
///
/// # Target sets
///
/// - team changed → newly added members only (set difference)
/// - task assigned → the new assignee
/// - status changed / comment added → the task's stakeholders: project
///   team members ∪ project creator ∪ current assignee

use std::collections::HashSet;

use uuid::Uuid;

use crate::models::{Notification, NotificationKind, Project, Task, TaskStatus};

/// A state transition that may notify users
#[derive(Debug)]
pub enum ChangeEvent<'a> {
    /// Project membership changed (project create or update)
    ///
    /// `old_members` is empty on create. Targets are the ids present in
    /// `new_members` but not `old_members`.
    TeamChanged {
        project_id: Uuid,
        project_title: &'a str,
        old_members: &'a [Uuid],
        new_members: &'a [Uuid],
    },

    /// A task gained an assignee (at creation, or reassignment)
    TaskAssigned {
        project_id: Uuid,
        project_title: &'a str,
        task_title: &'a str,
        assignee: Uuid,
    },

    /// A task's status changed
    ///
    /// `task` is the pre-update document: its title goes into the message
    /// and its assignee into the stakeholder set.
    StatusChanged {
        project: &'a Project,
        task: &'a Task,
        new_status: TaskStatus,
    },

    /// A comment was posted on a task
    CommentAdded {
        project: &'a Project,
        task: &'a Task,
        author_name: &'a str,
    },
}

/// Frontend link for a project, also the purge key on project delete
pub fn project_link(project_id: Uuid) -> String {
    format!("/projects/{project_id}")
}

/// Stakeholders of a task: team members ∪ project creator ∪ assignee
fn stakeholders(project: &Project, task: &Task) -> HashSet<Uuid> {
    let mut targets: HashSet<Uuid> = project.team_members.iter().copied().collect();
    targets.insert(project.created_by);
    if let Some(assignee) = task.assigned_to {
        targets.insert(assignee);
    }
    targets
}

/// Plans the notifications for an event
///
/// Returns one unread record per target user, actor excluded. The order
/// of the returned batch is unspecified; readers sort by `created_at`.
pub fn plan(event: &ChangeEvent<'_>, actor: Uuid) -> Vec<Notification> {
    match event {
        ChangeEvent::TeamChanged {
            project_id,
            project_title,
            old_members,
            new_members,
        } => {
            let old: HashSet<Uuid> = old_members.iter().copied().collect();
            let added: HashSet<Uuid> = new_members
                .iter()
                .copied()
                .filter(|id| !old.contains(id) && *id != actor)
                .collect();

            added
                .into_iter()
                .map(|user_id| {
                    Notification::new(
                        user_id,
                        NotificationKind::ProjectAdded,
                        format!("You have been added to project \"{project_title}\""),
                        project_link(*project_id),
                    )
                })
                .collect()
        }

        ChangeEvent::TaskAssigned {
            project_id,
            project_title,
            task_title,
            assignee,
        } => {
            if *assignee == actor {
                return Vec::new();
            }
            vec![Notification::new(
                *assignee,
                NotificationKind::TaskAssigned,
                format!(
                    "You have been assigned to task \"{task_title}\" in project \"{project_title}\""
                ),
                project_link(*project_id),
            )]
        }

        ChangeEvent::StatusChanged {
            project,
            task,
            new_status,
        } => {
            let mut targets = stakeholders(project, task);
            targets.remove(&actor);

            targets
                .into_iter()
                .map(|user_id| {
                    Notification::new(
                        user_id,
                        NotificationKind::StatusChanged,
                        format!(
                            "Task \"{}\" status changed to {}",
                            task.title,
                            new_status.humanize()
                        ),
                        project_link(project.id),
                    )
                })
                .collect()
        }

        ChangeEvent::CommentAdded {
            project,
            task,
            author_name,
        } => {
            let mut targets = stakeholders(project, task);
            targets.remove(&actor);

            targets
                .into_iter()
                .map(|user_id| {
                    Notification::new(
                        user_id,
                        NotificationKind::CommentAdded,
                        format!("{} commented on task \"{}\"", author_name, task.title),
                        project_link(project.id),
                    )
                })
                .collect()
        }
    }
}
