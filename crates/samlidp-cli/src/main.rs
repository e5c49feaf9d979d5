use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "samlidp", version, about = "SAML IdP shortcut server")]
struct Cli {
    /// Path to the configuration file.
    #[arg(
        long,
        short,
        global = true,
        env = "SAMLIDP_CONFIG",
        default_value = "samlidp.toml"
    )]
    config: PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the shortcut and login server.
    Serve,

    /// Validate the configuration file.
    Check,

    /// Tracked-request key management.
    Keys {
        #[command(subcommand)]
        cmd: KeysCommand,
    },

    /// Encode or inspect tracked-request tokens.
    Token {
        #[command(subcommand)]
        cmd: TokenCommand,
    },
}

#[derive(Subcommand, Debug)]
enum KeysCommand {
    /// Generate a new RSA keypair for tracked-request tokens.
    Generate {
        /// Directory to write tracker.pem and tracker.pub.pem into.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum TokenCommand {
    /// Sign a tracked request.
    Encode {
        /// Tracked request index (becomes the token subject).
        #[arg(long)]
        index: String,

        /// ID of the AuthnRequest being tracked.
        #[arg(long)]
        id: String,

        /// URI the user originally asked for.
        #[arg(long, default_value = "/")]
        uri: String,

        /// Private key PEM file; overrides the configured key.
        #[arg(long)]
        key: Option<PathBuf>,
    },

    /// Verify a token and print the tracked request it carries.
    Decode {
        token: String,

        /// Private key PEM file; overrides the configured key.
        #[arg(long)]
        key: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Serve => commands::serve::run(&cli.config).await?,
        Command::Check => commands::check::run(&cli.config)?,
        Command::Keys { cmd } => match cmd {
            KeysCommand::Generate { output } => commands::keys::generate(output)?,
        },
        Command::Token { cmd } => match cmd {
            TokenCommand::Encode {
                index,
                id,
                uri,
                key,
            } => commands::token::encode(&cli.config, key.as_deref(), &index, &id, &uri)?,
            TokenCommand::Decode { token, key } => {
                commands::token::decode(&cli.config, key.as_deref(), &token)?
            }
        },
    }

    Ok(())
}
