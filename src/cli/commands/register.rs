use anyhow::Result;

use super::{report_failure, with_gateway, Command};

pub struct RegisterCommand {
    name: String,
    email: String,
}

impl RegisterCommand {
    pub fn new(name: String, email: String) -> Self {
        Self { name, email }
    }
}

impl Command for RegisterCommand {
    async fn execute(&self) -> Result<()> {
        let name = self.name.clone();
        let email = self.email.clone();
        with_gateway(|gateway| async move {
            match gateway.register_user(&name, &email).await {
                Ok(()) => println!("✉️  {name} <{email}> subscribed to the mailing list"),
                Err(err) => report_failure(&err),
            }
            Ok(())
        })
        .await
    }
}
