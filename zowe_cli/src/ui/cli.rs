use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args as ClapArgs, Parser, Subcommand};
use log::{info, warn};
use zowe_core::connections::zowe_cli::ZoweCliTransport;
use zowe_core::storage::config::keys;
use zowe_core::storage::{Credentials, KeyringSecrets, MemorySecrets, SecretStore, StoreRegistry};
use zowe_core::{
    ApiRegister, CommandDispatcher, ConfigStore, HistoryStore, HostCapability, Profile,
    ProfileKind, ProfileRegistry, ProfileStore, SessionManager, ZoweError,
};

use super::host;
use super::terminal::{ConsoleLog, TerminalSurface};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "zowe-rs", version = "0.1.0", subcommand_required = true)]
pub struct Args {
    /// Numbered prompts instead of the interactive list
    #[arg(long, global = true)]
    pub plain: bool,

    /// Keep passwords in memory for this run instead of the OS keyring
    #[arg(long, global = true)]
    pub no_keyring: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Pick a profile and issue a console command through it
    Issue,
    /// Manage connection profiles
    #[command(subcommand)]
    Profiles(ProfilesCommand),
    /// Inspect or clear the per-profile command history
    #[command(subcommand)]
    History(HistoryCommand),
}

#[derive(Subcommand, Debug)]
pub enum ProfilesCommand {
    /// List profiles, marking the default with '*'
    List,
    /// Create or replace a profile
    #[command(subcommand)]
    Add(AddProfile),
    /// Remove a profile and its stored password
    Delete { name: String },
    /// Make a profile the preselected one
    Default { name: String },
}

#[derive(Subcommand, Debug)]
pub enum AddProfile {
    /// z/OSMF profile, served by the Zowe CLI
    Zosmf(ProfileFields),
    /// SSH profile, commands run over an exec channel
    Ssh(ProfileFields),
}

#[derive(ClapArgs, Debug)]
pub struct ProfileFields {
    /// Profile name
    #[arg(long)]
    pub name: String,
    /// Host name or address
    #[arg(long)]
    pub host: String,
    /// Port (443 for zosmf, 22 for ssh when omitted)
    #[arg(long)]
    pub port: Option<u16>,
    /// User name
    #[arg(long)]
    pub user: Option<String>,
    /// Password; prompted for on first use when omitted
    #[arg(long)]
    pub password: Option<String>,
    /// Reject self-signed certificates
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub reject_unauthorized: bool,
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommand {
    /// Show stored commands, most recent first
    List {
        #[arg(long)]
        profile: Option<String>,
    },
    /// Forget all commands of one profile
    Clear {
        #[arg(long)]
        profile: String,
    },
}

/// Everything the commands share, opened once.
struct Context {
    config: ConfigStore,
    registry: StoreRegistry,
    surface: Arc<TerminalSurface>,
    host: HostCapability,
}

impl Context {
    fn open(args: &Args) -> Result<Self, ZoweError> {
        let config = ConfigStore::open_default()?;
        let store = ProfileStore::new()?;
        let secrets: Arc<dyn SecretStore> = if args.no_keyring {
            info!("Keyring disabled, passwords last for this run only");
            Arc::new(MemorySecrets::new())
        } else {
            Arc::new(KeyringSecrets)
        };
        let host = host::detect(args.plain);
        let surface = Arc::new(TerminalSurface::new(host));
        let registry = StoreRegistry::new(store, secrets, config.clone(), surface.clone());
        Ok(Self {
            config,
            registry,
            surface,
            host,
        })
    }
}

pub async fn run_cli(args: Args) -> Result<(), ZoweError> {
    let ctx = Context::open(&args)?;

    match args.command {
        Command::Issue => run_issue(&ctx).await,
        Command::Profiles(command) => run_profiles(&ctx, command).await,
        Command::History(command) => run_history(&ctx, command).await,
    }
}

async fn build_register(config: &ConfigStore) -> ApiRegister {
    let mut apis = ApiRegister::new();
    let configured = config.get::<PathBuf>(keys::CLI_PATH).await;
    match ZoweCliTransport::locate(configured) {
        Ok(transport) => apis.register(Arc::new(transport)),
        Err(e) => warn!("zosmf profiles unavailable: {}", e),
    }
    #[cfg(feature = "ssh")]
    apis.register(Arc::new(zowe_core::connections::ssh::SshTransport::default()));
    apis
}

async fn run_issue(ctx: &Context) -> Result<(), ZoweError> {
    let apis = build_register(&ctx.config).await;
    info!("Command APIs: {:?}", apis.registered_types());
    let history = HistoryStore::from_config(ctx.config.clone()).await;

    let dispatcher = CommandDispatcher::new(
        Arc::new(ctx.registry.clone()),
        Arc::new(SessionManager::new()),
        apis,
        ctx.surface.clone(),
        Arc::new(ConsoleLog),
        history,
        ctx.host,
    );
    let outcome = dispatcher.issue_command().await;
    info!("Run finished: {:?}", outcome);
    Ok(())
}

async fn run_profiles(ctx: &Context, command: ProfilesCommand) -> Result<(), ZoweError> {
    match command {
        ProfilesCommand::List => {
            let listing = ctx.registry.list_profiles().await?;
            if listing.all.is_empty() {
                println!("No profiles. Create one with `zowe-rs profiles add`.");
            }
            for profile in &listing.all {
                let marker = if listing.default.as_deref() == Some(profile.name.as_str()) {
                    '*'
                } else {
                    ' '
                };
                println!(
                    "{} {:<20} {:<6} {}:{}",
                    marker,
                    profile.name,
                    profile.type_name(),
                    profile.host,
                    profile.port
                );
            }
        }
        ProfilesCommand::Add(add) => {
            let (kind, fields) = match add {
                AddProfile::Zosmf(fields) => (ProfileKind::Zosmf, fields),
                AddProfile::Ssh(fields) => (ProfileKind::Ssh, fields),
            };
            let profile = profile_from(kind, fields);
            ctx.registry.update_profile(&profile).await?;
            println!("Saved {} profile '{}'", profile.type_name(), profile.name);
        }
        ProfilesCommand::Delete { name } => {
            if ctx.registry.delete(&name).await? {
                println!("Deleted profile '{}'", name);
            } else {
                return Err(ZoweError::ProfileNotFound(name));
            }
        }
        ProfilesCommand::Default { name } => {
            ctx.registry.set_default(&name).await?;
            println!("Default profile is now '{}'", name);
        }
    }
    Ok(())
}

fn profile_from(kind: ProfileKind, fields: ProfileFields) -> Profile {
    let mut profile = Profile::new(fields.name, kind, fields.host);
    if let Some(port) = fields.port {
        profile.port = port;
    }
    profile.reject_unauthorized = fields.reject_unauthorized;
    match (fields.user, fields.password) {
        (Some(user), Some(password)) => profile.with_credentials(Credentials { user, password }),
        (user, password) => {
            if password.is_some() {
                warn!("--password ignored without --user");
            }
            profile.user = user;
            profile
        }
    }
}

async fn run_history(ctx: &Context, command: HistoryCommand) -> Result<(), ZoweError> {
    let history = HistoryStore::from_config(ctx.config.clone()).await;
    match command {
        HistoryCommand::List { profile } => {
            let profiles = match profile {
                Some(name) => vec![name],
                None => history.profiles().await,
            };
            for name in profiles {
                println!("{name}:");
                for entry in history.get(&name).await {
                    println!("  {entry}");
                }
            }
        }
        HistoryCommand::Clear { profile } => {
            history.clear(&profile).await?;
            println!("Cleared history of '{}'", profile);
        }
    }
    Ok(())
}
