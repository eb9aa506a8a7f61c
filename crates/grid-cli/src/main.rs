use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use grid_scale::ScaleError;

mod commands;

use commands::{GlobalArgs, Session};

#[derive(Parser)]
#[command(
    name = "gridctl",
    about = "Manage tenant clusters of the platform",
    version,
    propagate_version = true,
)]
struct Cli {
    /// API endpoint URL or alias to use instead of the selected one
    #[arg(long, global = true)]
    endpoint: Option<String>,
    /// Auth token to use instead of the stored one
    #[arg(long, global = true)]
    auth_token: Option<String>,
    /// Configuration directory (default: $GRIDCTL_CONFIG_DIR or ~/.config/gridctl)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,
    /// Print debug output
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with email and password to the endpoint given by --endpoint
    Login {
        /// Account email address
        email: String,
        /// Password (prompted for when omitted)
        #[arg(short, long)]
        password: Option<String>,
        /// Short name for the endpoint (default: the installation name)
        #[arg(long)]
        alias: Option<String>,
    },
    /// Change the number of worker nodes
    Scale {
        #[command(subcommand)]
        target: ScaleTarget,
    },
    /// Show details of a resource
    Show {
        #[command(subcommand)]
        target: ShowTarget,
    },
    /// List resources
    List {
        #[command(subcommand)]
        target: ListTarget,
    },
    /// Delete a resource
    Delete {
        #[command(subcommand)]
        target: DeleteTarget,
    },
    /// Select a resource as the default
    Select {
        #[command(subcommand)]
        target: SelectTarget,
    },
    /// Drop the stored token of the current endpoint
    Logout,
}

#[derive(Subcommand)]
enum ScaleTarget {
    /// Increase or reduce the number of worker nodes in a cluster.
    ///
    /// When reducing the number of nodes, the node(s) to be removed are chosen
    /// non-deterministically and data stored on them is lost.
    ///
    /// Examples:
    ///
    ///   gridctl scale cluster c7t2o --workers-min 12 --workers-max 16
    ///
    ///   gridctl scale cluster c7t2o --num-workers 3
    Cluster {
        /// Cluster ID
        cluster_id: String,
        /// Minimum number of worker nodes to have after scaling
        #[arg(long)]
        workers_min: Option<i64>,
        /// Maximum number of worker nodes to have after scaling
        #[arg(long)]
        workers_max: Option<i64>,
        /// Shorthand to set --workers-min and --workers-max to the same value
        #[arg(short = 'w', long)]
        num_workers: Option<i64>,
        /// Do not ask for confirmation
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum ShowTarget {
    /// Show cluster details
    Cluster { cluster_id: String },
}

#[derive(Subcommand)]
enum ListTarget {
    /// List known API endpoints
    Endpoints,
    /// List clusters of all organizations you belong to
    Clusters,
}

#[derive(Subcommand)]
enum DeleteTarget {
    /// Delete a cluster and all workloads running on it.
    ///
    /// The deletion cannot be undone.
    Cluster {
        /// Cluster ID
        cluster_id: String,
        /// Do not ask for confirmation
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum SelectTarget {
    /// Select the endpoint to use by default
    Endpoint {
        /// Endpoint URL or alias
        endpoint: String,
    },
}

fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    for target in ["gridctl", "grid_scale", "grid_client", "grid_core"] {
        filter = filter.add_directive(format!("{target}={level}").parse()?);
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("Error: {e:#}");
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(&e),
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let globals = GlobalArgs {
        endpoint: cli.endpoint,
        auth_token: cli.auth_token,
        config_dir: cli.config_dir,
    };
    let mut session = Session::load(&globals)?;

    match cli.command {
        Commands::Login {
            email,
            password,
            alias,
        } => {
            let args = commands::auth::LoginArgs {
                email,
                password,
                alias,
            };
            let outcome =
                commands::auth::login(&mut session, &args, commands::auth::ask_password).await?;
            println!("{}", outcome.summary());
            Ok(())
        }
        Commands::Scale { target } => match target {
            ScaleTarget::Cluster {
                cluster_id,
                workers_min,
                workers_max,
                num_workers,
                force,
            } => {
                let args = commands::scale::ScaleClusterArgs {
                    cluster_id,
                    intent: grid_scale::ScaleIntent {
                        workers_min,
                        workers_max,
                        num_workers,
                    },
                    force,
                };
                let outcome =
                    commands::scale::scale_cluster(&session, &args, commands::scale::ask_stdin).await?;
                println!("{}", outcome.summary());
                Ok(())
            }
        },
        Commands::Show { target } => match target {
            ShowTarget::Cluster { cluster_id } => {
                commands::show::show_cluster(&session, &cluster_id).await
            }
        },
        Commands::List { target } => match target {
            ListTarget::Endpoints => {
                print!("{}", commands::endpoints::format_endpoints(&session.config));
                Ok(())
            }
            ListTarget::Clusters => {
                print!("{}", commands::clusters::list_clusters(&session).await?);
                Ok(())
            }
        },
        Commands::Delete { target } => match target {
            DeleteTarget::Cluster { cluster_id, force } => {
                let args = commands::clusters::DeleteClusterArgs {
                    cluster_id: cluster_id.clone(),
                    force,
                };
                let deleted =
                    commands::clusters::delete_cluster(&session, &args, commands::scale::ask_stdin)
                        .await?;
                if deleted {
                    println!(
                        "The cluster with ID '{cluster_id}' will be deleted as soon as all workloads are terminated."
                    );
                } else {
                    println!("Cluster not deleted");
                }
                Ok(())
            }
        },
        Commands::Select { target } => match target {
            SelectTarget::Endpoint { endpoint } => {
                commands::endpoints::select_endpoint(&mut session, &endpoint)
            }
        },
        Commands::Logout => commands::auth::logout(&mut session).await,
    }
}

/// A declined confirmation is not a failure.
fn is_cancellation(err: &anyhow::Error) -> bool {
    matches!(err.downcast_ref::<ScaleError>(), Some(ScaleError::CommandAborted))
}

/// Print an error the way the user should see it and pick the exit code.
fn report(err: &anyhow::Error) -> ExitCode {
    if is_cancellation(err) {
        println!("Scaling cancelled");
        return ExitCode::SUCCESS;
    }

    match err.downcast_ref::<ScaleError>() {
        Some(scale_err) => {
            let (headline, subtext) = commands::scale::describe(scale_err);
            eprintln!("{headline}");
            if let Some(subtext) = subtext {
                eprintln!("{subtext}");
            }
            ExitCode::FAILURE
        }
        None => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
