use anyhow::Result;

use super::{report_failure, with_gateway, Command};

pub struct UserDetailsCommand {
    user_id: String,
}

impl UserDetailsCommand {
    pub fn new(user_id: String) -> Self {
        Self { user_id }
    }
}

impl Command for UserDetailsCommand {
    async fn execute(&self) -> Result<()> {
        let user_id = self.user_id.clone();
        with_gateway(|gateway| async move {
            match gateway.get_user_details(&user_id).await {
                Ok(user) => {
                    println!("👤 {} <{}>", user.name, user.email);
                    println!("   Stage: {}", user.stage);
                    match &user.project_id {
                        Some(project_id) => println!("   Project: {project_id}"),
                        None => println!("   Project: none"),
                    }
                    if let Some(thread_id) = &user.thread_id {
                        println!("   Thread: {thread_id}");
                    }
                }
                Err(err) => report_failure(&err),
            }
            Ok(())
        })
        .await
    }
}
