//! Command-line client for the bid document generation service.
//!
//! Mirrors the form flow end to end: pick a template, fill its fields
//! (optionally pre-filled from the engineer directory), then submit and
//! save the generated document. Session state lives in the runtime
//! directory, so `login` and `generate` can run as separate invocations.

use std::io::BufRead;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, bail};
use bidforge_core::taxonomy::{field_label, group_fields};
use bidforge_core::{
    AuthGate, Config, DirectoryTable, EphemeralSessionStore, FormState, ServiceClient,
    TemplateRegistry, find_bidforge_home, load_config, save_artifact, submit,
};
use clap::{Parser, Subcommand};
use tracing::debug;

/// Bid document generation client
#[derive(Debug, Parser)]
#[command(name = "bidforge", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Authenticate against the generation service
    Login(LoginArgs),
    /// Drop the current session token
    Logout,
    /// Show session state and service configuration
    Status,
    /// List the available document templates
    Templates,
    /// Show one template's fields, grouped by section
    Fields(FieldsArgs),
    /// List the engineer directory entries
    Directory,
    /// Fill a template and generate the document
    Generate(GenerateArgs),
}

#[derive(Debug, Parser)]
pub struct LoginArgs {
    /// Service password. Read from stdin when omitted.
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Debug, Parser)]
pub struct FieldsArgs {
    /// Template name, as listed by `bidforge templates`
    pub template: String,
}

#[derive(Debug, Parser)]
pub struct GenerateArgs {
    /// Template name, as listed by `bidforge templates`
    pub template: String,

    /// Set one field, e.g. `--set project_name="Pump Station 4"`
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    pub set: Vec<String>,

    /// Append one scope-of-work item (templates with a scope section)
    #[arg(long = "scope", value_name = "ITEM")]
    pub scope: Vec<String>,

    /// Pre-fill contact fields from this directory entry
    #[arg(long, value_name = "LABEL")]
    pub contact: Option<String>,

    /// Directory to write the generated document into
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let home = find_bidforge_home()?;
    let config = load_config(&home)?;
    debug!(
        base_url = %config.base_url,
        require_auth = config.require_auth,
        "configuration loaded"
    );

    match cli.command {
        Command::Login(args) => cmd_login(&config, args).await,
        Command::Logout => cmd_logout(),
        Command::Status => cmd_status(&config),
        Command::Templates => cmd_templates(),
        Command::Fields(args) => cmd_fields(&args.template),
        Command::Directory => cmd_directory(&config),
        Command::Generate(args) => cmd_generate(&config, args).await,
    }
}

/// Auth gate over the session file in the runtime directory.
fn session_gate() -> anyhow::Result<AuthGate> {
    AuthGate::new(Box::new(EphemeralSessionStore::new()))
        .context("failed to restore session state")
}

async fn cmd_login(config: &Config, args: LoginArgs) -> anyhow::Result<()> {
    let password = match args.password {
        Some(password) => password,
        None => prompt_password()?,
    };
    if password.is_empty() {
        bail!("password must not be empty");
    }

    let client = ServiceClient::new(config.base_url.clone());
    let mut gate = session_gate()?;
    gate.login(&client, &password).await?;
    println!("Logged in.");
    Ok(())
}

fn cmd_logout() -> anyhow::Result<()> {
    let mut gate = session_gate()?;
    gate.logout()?;
    println!("Logged out.");
    Ok(())
}

fn cmd_status(config: &Config) -> anyhow::Result<()> {
    let gate = session_gate()?;
    let auth = if config.require_auth {
        "required"
    } else {
        "disabled"
    };
    println!("session:  {}", gate.state());
    println!("service:  {}", config.base_url);
    println!("auth:     {auth}");
    Ok(())
}

fn cmd_templates() -> anyhow::Result<()> {
    let registry = TemplateRegistry::built_in();
    for template in registry.iter() {
        println!(
            "{}  ({} fields -> {})",
            template.name,
            template.fields.len(),
            template.artifact
        );
    }
    Ok(())
}

fn cmd_fields(template_name: &str) -> anyhow::Result<()> {
    let registry = TemplateRegistry::built_in();
    let template = registry.lookup(template_name)?;

    for group in group_fields(template.fields) {
        println!("{}", group.category.heading());
        for field in &group.fields {
            println!("  {field}  ({})", field_label(field));
        }
    }
    if let Some(scope_field) = template.scope_field {
        println!("Scope");
        println!("  {scope_field}  (repeatable; items are joined at submission)");
    }
    Ok(())
}

fn cmd_directory(config: &Config) -> anyhow::Result<()> {
    let table = DirectoryTable::with_extra(config.directory.clone());
    for entry in table.iter() {
        println!("{}", entry.label);
        for (field, value) in &entry.overrides {
            println!("  {field} = {value}");
        }
    }
    Ok(())
}

async fn cmd_generate(config: &Config, args: GenerateArgs) -> anyhow::Result<()> {
    let registry = TemplateRegistry::built_in();
    // Reject a bad template name before touching the form or network.
    registry.lookup(&args.template)?;

    let mut form = FormState::new();

    if let Some(label) = &args.contact {
        let table = DirectoryTable::with_extra(config.directory.clone());
        if !table.apply(label, &mut form) {
            bail!("unknown directory entry: {label}");
        }
    }

    for pair in &args.set {
        let Some((field, value)) = pair.split_once('=') else {
            bail!("invalid --set {pair:?}; expected FIELD=VALUE");
        };
        form.set_scalar(field, value);
    }

    for item in &args.scope {
        let index = form.scope_items().len();
        form.set_scope_item(index, item.as_str())?;
    }

    let client = ServiceClient::new(config.base_url.clone());
    let mut gate = session_gate()?;
    let document = submit(
        &registry,
        &args.template,
        &form,
        &mut gate,
        &client,
        config.require_auth,
    )
    .await?;

    let out_dir = args
        .out
        .or_else(|| config.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    let path = save_artifact(&document, &out_dir)?;
    println!("Saved {}", path.display());
    Ok(())
}

fn prompt_password() -> anyhow::Result<String> {
    eprint!("Password: ");
    std::io::stderr().flush()?;

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
