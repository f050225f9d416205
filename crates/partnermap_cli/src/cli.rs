//! Command-line surface of the `partnermap` binary.

use clap::{Args, Parser, Subcommand};
use partnermap_core::{ContactId, PartnerId, PartnerStatus, ProjectId, ProjectStatus};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "partnermap", version, about = "Regional partner directory")]
pub struct Cli {
    /// JSON config file; defaults rooted at the working directory otherwise
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print region summaries, or one region in detail
    Show {
        /// Region id (e.g. `idf`)
        #[arg(long)]
        region: Option<String>,
    },
    /// Merge a delimited text file into the directory
    Import {
        file: PathBuf,
        #[command(flatten)]
        admin: AdminArgs,
    },
    /// Find projects whose name contains the query
    SearchProjects { query: String },
    /// Find named accounts containing the query
    SearchAccounts { query: String },
    AddPartner {
        #[arg(long)]
        region: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        city: String,
        #[arg(long, default_value = "")]
        address: String,
        /// gold, silver or bronze
        #[arg(long, default_value = "silver", value_parser = parse_partner_status)]
        status: PartnerStatus,
        /// Logo URL
        #[arg(long, default_value = "")]
        logo: String,
        #[command(flatten)]
        admin: AdminArgs,
    },
    DeletePartner {
        #[command(flatten)]
        target: PartnerTarget,
        #[command(flatten)]
        admin: AdminArgs,
    },
    AddContact {
        #[command(flatten)]
        target: PartnerTarget,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        /// Comma or semicolon separated
        #[arg(long, default_value = "")]
        verticals: String,
        /// Comma or semicolon separated
        #[arg(long, default_value = "")]
        accounts: String,
        #[arg(long, default_value = "")]
        territory: String,
        #[command(flatten)]
        admin: AdminArgs,
    },
    DeleteContact {
        #[command(flatten)]
        target: PartnerTarget,
        #[arg(long)]
        contact: ContactId,
        #[command(flatten)]
        admin: AdminArgs,
    },
    AddProject {
        #[command(flatten)]
        target: PartnerTarget,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// "En cours", "Gagné", "Perdu" or "Pause"
        #[arg(long, default_value = "En cours", value_parser = parse_project_status)]
        status: ProjectStatus,
        /// Internal contact in charge
        #[arg(long, default_value = "")]
        ic: String,
        #[command(flatten)]
        admin: AdminArgs,
    },
    DeleteProject {
        #[command(flatten)]
        target: PartnerTarget,
        #[arg(long)]
        project: ProjectId,
        #[command(flatten)]
        admin: AdminArgs,
    },
    /// Replace the whole directory with sample data
    Seed {
        #[command(flatten)]
        admin: AdminArgs,
    },
}

#[derive(Args)]
pub struct AdminArgs {
    /// Admin credential
    #[arg(long)]
    pub password: String,
}

#[derive(Args)]
pub struct PartnerTarget {
    #[arg(long)]
    pub region: String,
    #[arg(long)]
    pub partner: PartnerId,
}

fn parse_partner_status(value: &str) -> Result<PartnerStatus, String> {
    PartnerStatus::parse(value).ok_or_else(|| format!("unknown partner status `{value}`"))
}

fn parse_project_status(value: &str) -> Result<ProjectStatus, String> {
    ProjectStatus::parse(value).ok_or_else(|| format!("unknown project status `{value}`"))
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::{CommandFactory, Parser};
    use partnermap_core::PartnerStatus;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn add_partner_parses_status_case_insensitively() {
        let cli = Cli::try_parse_from([
            "partnermap",
            "add-partner",
            "--region",
            "bre",
            "--name",
            "Acme",
            "--status",
            "GOLD",
            "--password",
            "x",
        ])
        .unwrap();
        match cli.command {
            Command::AddPartner { status, .. } => assert_eq!(status, PartnerStatus::Gold),
            _ => panic!("unexpected command"),
        }
    }

    #[test]
    fn unknown_status_is_a_usage_error() {
        let result = Cli::try_parse_from([
            "partnermap",
            "add-partner",
            "--region",
            "bre",
            "--name",
            "Acme",
            "--status",
            "platinum",
            "--password",
            "x",
        ]);
        assert!(result.is_err());
    }
}
