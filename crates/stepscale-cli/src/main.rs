use clap::{Parser, Subcommand};

mod commands;

use commands::compile::OutputFormat;

#[derive(Parser)]
#[command(
    name = "stepscale",
    about = "Step scaling policy compiler",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a policy declaration.
    ///
    /// Output formats: json (the compiled policy), resource (the
    /// ScalingPolicy template fragment), text (a tier table).
    Compile {
        /// Path to the policy declaration
        #[arg(short, long, default_value = "policy.toml")]
        path: String,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Check that the declared tiers have no gaps or overlaps
    Check {
        #[arg(short, long, default_value = "policy.toml")]
        path: String,
    },
    /// Write a starter policy.toml
    Init {
        /// Directory to write into
        #[arg(short, long, default_value = ".")]
        path: String,
        /// Construct id of the policy
        #[arg(long, default_value = "ScalingPolicy")]
        id: String,
        /// Scalable target the policy adjusts
        #[arg(long, default_value = "service/default/app")]
        target: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stepscale_cli=info".parse()?)
                .add_directive("stepscale_policy=info".parse()?)
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compile { path, format } => commands::compile::compile(&path, format),
        Commands::Check { path } => commands::compile::check(&path),
        Commands::Init { path, id, target } => commands::init::init(&path, &id, &target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_format_parses_known_values() {
        let cli = Cli::try_parse_from(["stepscale", "compile", "--format", "resource"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Compile { format: OutputFormat::Resource, .. }
        ));

        let cli = Cli::try_parse_from(["stepscale", "compile"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Compile { format: OutputFormat::Json, .. }
        ));
    }

    #[test]
    fn test_compile_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["stepscale", "compile", "--format", "resorce"]).is_err());
    }
}
