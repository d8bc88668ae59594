//
//  gerrit-cli
//  cli/version.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Server version command

use anyhow::{Context, Result};
use clap::Args;

use super::GlobalOptions;
use crate::VERSION;

/// Show who is connected to which server, and its Gerrit version
#[derive(Args, Debug)]
pub struct VersionCommand {
    /// Also print the server configuration
    #[arg(long)]
    pub info: bool,
}

impl VersionCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let (client, profile) = global.connect()?;
        let server = client.server();
        let version = server
            .version()
            .await
            .with_context(|| format!("gerrit server unreachable: {}", client.base_url()))?;

        let output = global.output();
        let user = profile
            .credentials()
            .map_or("anonymous", |(username, _)| username);
        output.write_success(&format!("Connected with: {user}"));
        output.write_success(&format!("Server: {}", client.base_url()));
        output.write_success(&format!("Version: {version}"));
        if global.verbose {
            output.write_success(&format!("gerritctl {VERSION}"));
        }

        if self.info {
            let info = server.info().await?;
            output.write_item(
                &format!("Auth: {}, All-Projects: {}", info.auth.auth_type, info.gerrit.all_projects),
                &info,
            )?;
        }
        Ok(())
    }
}
