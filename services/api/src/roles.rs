use crate::infra::catalog_facade;
use clap::{Args, Subcommand};
use hireflow::config::AppConfig;
use hireflow::error::AppError;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub(crate) enum RolesCommand {
    /// Print every role in the catalog
    List(CatalogArgs),
    /// Add a role or replace its description
    Add(AddRoleArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct CatalogArgs {
    /// Job catalog file (defaults to JOB_CATALOG_PATH)
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct AddRoleArgs {
    /// Role name as candidates will select it
    #[arg(long)]
    pub(crate) role: String,
    /// Free-text job description
    #[arg(long)]
    pub(crate) description: String,
    /// Optional notes for the reviewer
    #[arg(long)]
    pub(crate) instructions: Option<String>,
    #[command(flatten)]
    pub(crate) catalog: CatalogArgs,
}

pub(crate) fn run_roles(command: RolesCommand) -> Result<(), AppError> {
    let config = AppConfig::load()?;

    match command {
        RolesCommand::List(args) => {
            let catalog = catalog_facade(&config, args.catalog)?;
            let roles = catalog.list_roles()?;
            if roles.is_empty() {
                println!("No roles in the job catalog yet.");
            }
            for role in roles {
                println!("- {role}");
            }
        }
        RolesCommand::Add(args) => {
            let catalog = catalog_facade(&config, args.catalog.catalog)?;
            let requirement = catalog.add_job_details(
                &args.role,
                &args.description,
                args.instructions.as_deref(),
            )?;
            println!("Saved job details for {}", requirement.role);
        }
    }

    Ok(())
}
