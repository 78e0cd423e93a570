mod commands;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use std::process::ExitCode;
use vimius_core::Submodules;

#[derive(Debug, Parser)]
#[command(
    name = "vimius",
    version,
    about = "Inspect and activate vimius submodules and their dependencies"
)]
struct Cli {
    /// Path to the submodule manifest (YAML, or TOML with a .toml extension).
    #[arg(long, default_value = "submodules.yml", global = true)]
    manifest: PathBuf,

    /// Path to the user configuration file [default: ~/vimius.yml].
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List every submodule in manifest order.
    List {
        /// Only show submodules in this group.
        #[arg(long)]
        group: Option<String>,
        /// Bucket the output by group.
        #[arg(long, default_value_t = false)]
        by_group: bool,
    },
    /// Show one submodule.
    Show {
        /// Submodule name.
        name: String,
        /// Also show every submodule it transitively depends on.
        #[arg(long, default_value_t = false)]
        with_deps: bool,
    },
    /// List the transitive dependencies of a submodule.
    Deps {
        /// Submodule name.
        name: String,
    },
    /// List the distinct groups.
    Groups,
    /// List the submodules enabled in the configuration file.
    Active {
        /// Include dependencies of active submodules that are not active themselves.
        #[arg(long, default_value_t = false)]
        with_deps: bool,
    },
    /// Verify every dependency reference resolves and no cycle exists.
    Check,
    /// Enable a submodule and everything it depends on.
    Enable {
        /// Submodule name.
        name: String,
    },
    /// Disable a submodule unless another active submodule needs it.
    Disable {
        /// Submodule name.
        name: String,
    },
    /// Generate shell completions for bash, zsh, fish, elvish, or powershell.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("VIMIUS_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let submodules = Submodules::from_path(&cli.manifest);
    let config_path = cli.config.as_deref();
    let json_output = cli.json;

    let result = match cli.command {
        Commands::List { group, by_group } => {
            commands::list::run(&submodules, group.as_deref(), by_group, json_output)
        }
        Commands::Show { name, with_deps } => {
            commands::show::run(&submodules, &name, with_deps, json_output)
        }
        Commands::Deps { name } => commands::deps::run(&submodules, &name, json_output),
        Commands::Groups => commands::groups::run(&submodules, json_output),
        Commands::Active { with_deps } => {
            commands::active::run(&submodules, config_path, with_deps, json_output)
        }
        Commands::Check => commands::check::run(&submodules, json_output),
        Commands::Enable { name } => {
            commands::enable::run(&submodules, config_path, &name, json_output)
        }
        Commands::Disable { name } => {
            commands::disable::run(&submodules, config_path, &name, json_output)
        }
        Commands::Completions { shell } => commands::completions::run::<Cli>(shell),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            ExitCode::from(commands::exit_code_for(&msg))
        }
    }
}
