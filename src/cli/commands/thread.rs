use anyhow::Result;

use super::{report_failure, with_gateway, Command};

pub struct FetchThreadCommand {
    project_id: String,
}

impl FetchThreadCommand {
    pub fn new(project_id: String) -> Self {
        Self { project_id }
    }
}

impl Command for FetchThreadCommand {
    async fn execute(&self) -> Result<()> {
        let project_id = self.project_id.clone();
        with_gateway(|gateway| async move {
            match gateway.fetch_thread(&project_id).await {
                Ok(thread) => {
                    println!(
                        "💬 Thread {} bound to project {}",
                        thread.thread_id, thread.project_id
                    );
                }
                Err(err) => report_failure(&err),
            }
            Ok(())
        })
        .await
    }
}
