use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use tracing_subscriber::{fmt, EnvFilter};

use scoped_rbac::rbac::{loader, web, Permission};
use scoped_rbac::settings::Settings;

#[derive(Parser, Debug)]
#[command(
    name = "scoped-rbac",
    version,
    about = "Compositional scoped RBAC policy engine"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP decision API (default)
    Serve,
    /// Decide a single permission against the loaded policies
    Check {
        #[arg(long)]
        context: String,
        #[arg(long)]
        action: String,
        #[arg(long)]
        resource_type: String,
    },
    /// Print the merged policy as JSON
    Dump,
}

#[tokio::main]
async fn main() -> Result<()> {
    // logging
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = Settings::load(&cli.config)?;
    tracing::info!(?settings, "Loaded configuration");

    let root = loader::load_policies(&settings.policies.dir)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => web::serve(&settings, root).await?,
        Command::Check {
            context,
            action,
            resource_type,
        } => {
            let permission = Permission::new(action, resource_type);
            let allowed = root.should_allow(&permission, &context, &());
            println!("{}", if allowed { "allow" } else { "deny" });
            if !allowed {
                std::process::exit(1);
            }
        }
        Command::Dump => {
            let json = serde_json::to_string_pretty(&root.policy().to_json()).into_diagnostic()?;
            println!("{json}");
        }
    }
    Ok(())
}
