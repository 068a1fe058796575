//! TaskHub inspector
//!
//! Prints the permission matrix, route guard decisions and the full portal
//! view (context, breadcrumbs, menu) for a sequence of paths.
//!
//! # Usage
//! ```bash
//! taskhub matrix --json
//! taskhub check --role client_admin --client C1 /clients/C1 /clients/C2 /settings
//! taskhub navigate --role agency_admin --agency A1 --directory dir.json /agencies/A1 /clients/C1
//! ```

mod directory;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use directory::StaticDirectory;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use taskhub_access::{PermissionEvaluator, PermissionMatrix, Principal, Role, TracingAuditSink};
use taskhub_core::{init_tracing, Portal, PortalConfig, PortalView, Router, UserRecord};
use taskhub_navigation::NavigationOutcome;
use taskhub_routing::GuardDecision;

/// TaskHub access and navigation inspector
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Portal configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, overrides the configured level
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the role × permission matrix
    Matrix {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show route guard decisions for paths
    Check {
        #[command(flatten)]
        user: UserArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Paths to check
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Drive the portal through a sequence of path changes
    Navigate {
        #[command(flatten)]
        user: UserArgs,
        /// Entity directory (JSON)
        #[arg(short, long)]
        directory: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Paths to visit, in order
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

#[derive(Args)]
struct UserArgs {
    /// Role of the signed-in user
    #[arg(short, long)]
    role: Role,
    /// Home system id
    #[arg(long)]
    system: Option<String>,
    /// Home agency id
    #[arg(long)]
    agency: Option<String>,
    /// Home client id
    #[arg(long)]
    client: Option<String>,
}

impl UserArgs {
    fn record(&self) -> UserRecord {
        UserRecord {
            id: format!("cli-{}", self.role),
            role: Some(self.role.as_str().to_string()),
            system_id: self.system.clone(),
            agency_id: self.agency.clone(),
            client_id: self.client.clone(),
        }
    }
}

/// Router that reports navigation side effects on stdout
struct PrintRouter;

impl Router for PrintRouter {
    fn redirect(&self, to: &str) {
        println!("  router: redirect → {to}");
    }

    fn logout(&self) {
        println!("  router: logout");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => PortalConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => PortalConfig::default(),
    };
    if let Some(level) = &cli.log_level {
        config.logging.level.clone_from(level);
    }
    config.logging.json |= cli.json_logs;
    init_tracing(&config.logging)?;

    match cli.command {
        Command::Matrix { json } => print_matrix(json),
        Command::Check { user, json, paths } => check(&config, &user, json, &paths),
        Command::Navigate {
            user,
            directory,
            json,
            paths,
        } => navigate(config, &user, &directory, json, &paths).await,
    }
}

fn print_matrix(json: bool) -> anyhow::Result<()> {
    let matrix = PermissionMatrix::for_roles();
    if json {
        println!("{}", serde_json::to_string_pretty(&matrix)?);
    } else {
        print!("{}", matrix.to_text());
    }
    Ok(())
}

fn check(
    config: &PortalConfig,
    user: &UserArgs,
    json: bool,
    paths: &[String],
) -> anyhow::Result<()> {
    let audit = Arc::new(TracingAuditSink);
    let guard = config.route_guard(PermissionEvaluator::new(audit.clone()), audit)?;
    let principal: Principal = user.record().to_principal();

    for path in paths {
        let decision = guard.check(Some(&principal), path);
        if json {
            println!(
                "{}",
                serde_json::json!({ "path": path, "decision": decision })
            );
        } else {
            println!("{path:<32} {}", describe(&decision));
        }
    }
    Ok(())
}

async fn navigate(
    config: PortalConfig,
    user: &UserArgs,
    directory: &Path,
    json: bool,
    paths: &[String],
) -> anyhow::Result<()> {
    let lookup = StaticDirectory::load(directory)?;
    tracing::debug!(entities = lookup.len(), "directory loaded");

    let portal = Portal::new(
        config,
        Arc::new(lookup),
        Arc::new(PrintRouter),
        Arc::new(TracingAuditSink),
    )?;
    portal.login(&user.record());

    for path in paths {
        let view = portal.on_route_change(path).await;
        if json {
            println!("{}", view_json(&view));
        } else {
            print_view(&view);
        }
    }
    Ok(())
}

fn describe(decision: &GuardDecision) -> String {
    match decision {
        GuardDecision::Allow { route: Some(route) } => format!("allow ({})", route.permission),
        GuardDecision::Allow { route: None } => "allow (exempt)".to_string(),
        GuardDecision::Redirect { to, reason } => format!("redirect → {to} ({reason})"),
        GuardDecision::ForceLogout { to, reason } => format!("force logout → {to} ({reason})"),
    }
}

fn outcome_name(outcome: Option<&NavigationOutcome>) -> String {
    match outcome {
        None => "skipped".to_string(),
        Some(NavigationOutcome::Updated(_)) => "updated".to_string(),
        Some(NavigationOutcome::Unchanged) => "unchanged".to_string(),
        Some(NavigationOutcome::Superseded) => "superseded".to_string(),
        Some(NavigationOutcome::Failed(e)) => format!("failed: {e}"),
    }
}

fn view_json(view: &PortalView) -> serde_json::Value {
    serde_json::json!({
        "path": view.path,
        "decision": view.decision,
        "outcome": outcome_name(view.outcome.as_ref()),
        "context": view.context,
        "breadcrumbs": view.breadcrumbs,
        "menu": view.menu,
    })
}

fn print_view(view: &PortalView) {
    println!("{}", view.path);
    println!("  guard:   {}", describe(&view.decision));
    println!("  context: {}", outcome_name(view.outcome.as_ref()));
    for (kind, label) in view.context.levels() {
        println!("    {:<7} {} ({})", kind.as_str(), label.name, label.id);
    }
    if !view.breadcrumbs.is_empty() {
        let trail: Vec<_> = view.breadcrumbs.iter().map(|c| c.label.as_str()).collect();
        println!("  trail:   {}", trail.join(" › "));
    }
    if !view.menu.is_empty() {
        let items: Vec<_> = view
            .menu
            .iter()
            .map(|m| {
                if m.active {
                    format!("[{}]", m.label)
                } else {
                    m.label.clone()
                }
            })
            .collect();
        println!("  menu:    {}", items.join(" "));
    }
}
