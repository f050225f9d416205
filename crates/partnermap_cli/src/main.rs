//! `partnermap` command-line entry point.
//!
//! # Responsibility
//! - Wire config, logging, the SQLite store and the fallback cache into one
//!   `DirectoryService`.
//! - Render directory reads and admin mutations as plain text.
//!
//! # Invariants
//! - Every failure is reported on stderr with exit code 1; nothing panics.

mod cli;

use clap::Parser;
use cli::{AdminArgs, Cli, Command, PartnerTarget};
use log::info;
use partnermap_core::db::open_db;
use partnermap_core::{
    init_logging, AdminSession, AppConfig, ContactDraft, DirectoryService, FileCache, PartnerDraft,
    ProjectDraft, Region, SqliteDocumentStore, StaticCredentialAuthority,
};
use std::error::Error;
use std::process::ExitCode;

type Service<'conn> =
    DirectoryService<SqliteDocumentStore<'conn>, FileCache, StaticCredentialAuthority>;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load_or_default(cli.config.as_deref())?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)?;
    }

    let catalog = config.region_catalog()?;
    let conn = open_db(&config.db_path)?;
    let mut service = DirectoryService::new(
        SqliteDocumentStore::new(&conn),
        FileCache::new(&config.cache_dir, &config.cache_key),
        StaticCredentialAuthority::new(config.admin_credential.clone()),
        catalog,
        config.document_id.clone(),
    );

    let outcome = service.load();
    if let Some(notice) = &outcome.notice {
        eprintln!("warning: {notice}");
    }
    info!(
        "event=cli_start module=cli status=ok source={}",
        outcome.source.as_str()
    );

    execute(&mut service, cli.command)
}

fn execute(service: &mut Service<'_>, command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Show { region: None } => {
            for region in &service.document().regions {
                println!(
                    "{:<4} {:<28} partners={}",
                    region.id,
                    region.name,
                    region.partners.len()
                );
            }
        }
        Command::Show {
            region: Some(region_id),
        } => {
            let region = service
                .region(&region_id)
                .ok_or_else(|| format!("unknown region `{region_id}`"))?;
            print_region(region);
        }
        Command::Import { file, admin } => {
            let text = std::fs::read_to_string(&file)
                .map_err(|err| format!("cannot read `{}`: {err}", file.display()))?;
            let session = login(service, &admin)?;
            let report = service.import_text(&session, &text)?;
            if report.rows_parsed == 0 {
                println!("no valid rows found; nothing imported");
            } else {
                println!(
                    "rows={} applied={} partners_created={} contacts_created={} contacts_merged={} \
                     skipped_unknown_region={} skipped_missing_partner={} skipped_empty_contact={}",
                    report.rows_parsed,
                    report.rows_applied,
                    report.partners_created,
                    report.contacts_created,
                    report.contacts_merged,
                    report.skipped_unknown_region,
                    report.skipped_missing_partner,
                    report.skipped_empty_contact
                );
            }
        }
        Command::SearchProjects { query } => {
            for hit in service.search_projects(&query) {
                println!(
                    "{} | {} | {} | {} | {}",
                    hit.region_name,
                    hit.partner_name,
                    hit.project.name,
                    hit.project.status.as_str(),
                    hit.project.ic_name
                );
            }
        }
        Command::SearchAccounts { query } => {
            for hit in service.search_accounts(&query) {
                println!(
                    "{} | {} | {} | {}",
                    hit.account_name,
                    hit.region_name,
                    hit.partner_name,
                    hit.contact.display_name()
                );
            }
        }
        Command::AddPartner {
            region,
            name,
            city,
            address,
            status,
            logo,
            admin,
        } => {
            let session = login(service, &admin)?;
            let draft = PartnerDraft {
                name,
                city,
                address,
                status,
                logo,
            };
            let id = service.add_partner(&session, &region, &draft)?;
            println!("{id}");
        }
        Command::DeletePartner { target, admin } => {
            let session = login(service, &admin)?;
            service.delete_partner(&session, &target.region, target.partner)?;
        }
        Command::AddContact {
            target,
            first_name,
            last_name,
            title,
            email,
            phone,
            verticals,
            accounts,
            territory,
            admin,
        } => {
            let session = login(service, &admin)?;
            let draft = ContactDraft {
                first_name,
                last_name,
                title,
                email,
                phone,
                territory,
                ..ContactDraft::default()
            }
            .with_list_text(&verticals, &accounts);
            let PartnerTarget { region, partner } = target;
            let id = service.add_contact(&session, &region, partner, &draft)?;
            println!("{id}");
        }
        Command::DeleteContact {
            target,
            contact,
            admin,
        } => {
            let session = login(service, &admin)?;
            service.delete_contact(&session, &target.region, target.partner, contact)?;
        }
        Command::AddProject {
            target,
            name,
            description,
            status,
            ic,
            admin,
        } => {
            let session = login(service, &admin)?;
            let draft = ProjectDraft {
                name,
                description,
                status,
                ic_name: ic,
            };
            let id = service.add_project(&session, &target.region, target.partner, &draft)?;
            println!("{id}");
        }
        Command::DeleteProject {
            target,
            project,
            admin,
        } => {
            let session = login(service, &admin)?;
            service.delete_project(&session, &target.region, target.partner, project)?;
        }
        Command::Seed { admin } => {
            let session = login(service, &admin)?;
            service.reset_to_sample(&session)?;
            println!("partners={}", service.document().partner_count());
        }
    }
    Ok(())
}

fn login(
    service: &mut Service<'_>,
    admin: &AdminArgs,
) -> Result<AdminSession, Box<dyn Error>> {
    Ok(service.login(&admin.password)?)
}

fn print_region(region: &Region) {
    println!("{} ({})", region.name, region.id);
    for partner in &region.partners {
        println!(
            "  {} [{}] {} {}",
            partner.name,
            partner.status.as_str(),
            partner.city,
            partner.id
        );
        for contact in &partner.contacts {
            println!(
                "    contact {} {} {} {}",
                contact.display_name(),
                contact.title,
                contact.email,
                contact.id
            );
        }
        for project in &partner.projects {
            println!(
                "    project {} [{}] {}",
                project.name,
                project.status.as_str(),
                project.id
            );
        }
    }
}
