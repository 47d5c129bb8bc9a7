//! Notification CLI commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use uuid::Uuid;

use crate::cli::open_stack;
use crate::cli::output::{output, truncate, CommandOutput};
use crate::domain::models::Notification;

#[derive(Args, Debug)]
pub struct NotificationArgs {
    #[command(subcommand)]
    pub command: NotificationCommands,
}

#[derive(Subcommand, Debug)]
pub enum NotificationCommands {
    /// List an owner's notifications, newest first
    List {
        #[arg(long)]
        owner: String,

        /// Only show unread notifications
        #[arg(long)]
        unread: bool,
    },

    /// Mark a notification as read
    Read {
        /// Notification ID
        id: Uuid,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct NotificationOutput {
    pub id: String,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub read: bool,
    pub created_at: String,
}

impl From<&Notification> for NotificationOutput {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id.to_string(),
            kind: n.kind.clone(),
            title: n.title.clone(),
            body: n.body.clone(),
            read: n.read,
            created_at: n.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct NotificationListOutput {
    pub notifications: Vec<NotificationOutput>,
    pub total: usize,
}

impl CommandOutput for NotificationListOutput {
    fn to_human(&self) -> String {
        if self.notifications.is_empty() {
            return "No notifications.".to_string();
        }

        let mut lines = vec![format!("Found {} notification(s):\n", self.total)];
        for n in &self.notifications {
            let marker = if n.read { " " } else { "*" };
            lines.push(format!(
                "{marker} {:<36} {:<25} {}",
                n.id,
                truncate(&n.title, 25),
                truncate(&n.body, 60)
            ));
        }
        lines.join("\n")
    }
}

#[derive(Debug, serde::Serialize)]
pub struct MarkReadOutput {
    pub success: bool,
    pub id: String,
}

impl CommandOutput for MarkReadOutput {
    fn to_human(&self) -> String {
        format!("Marked notification {} as read", self.id)
    }
}

pub async fn execute(args: NotificationArgs, json: bool) -> Result<()> {
    let (_config, stack) = open_stack().await?;

    match args.command {
        NotificationCommands::List { owner, unread } => {
            let notifications = stack.notifications.list_for_owner(&owner, unread).await?;
            output(
                &NotificationListOutput {
                    total: notifications.len(),
                    notifications: notifications.iter().map(NotificationOutput::from).collect(),
                },
                json,
            );
        }

        NotificationCommands::Read { id } => {
            let updated = stack.notifications.mark_read(id).await?;
            if !updated {
                anyhow::bail!("No notification with id {id}");
            }
            output(
                &MarkReadOutput {
                    success: true,
                    id: id.to_string(),
                },
                json,
            );
        }
    }

    Ok(())
}
