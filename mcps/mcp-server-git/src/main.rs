//! mcp-server-git - git repository interaction over MCP stdio

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use mcp_server_git::{Config, GitMcpServer};
use rmcp::{transport::io::stdio, ServiceExt};

#[derive(Parser)]
#[command(name = "mcp-server-git")]
#[command(about = "MCP server for interacting with local git repositories")]
struct Cli {
    /// Restrict all tools to this git repository
    #[arg(short, long)]
    repository: Option<PathBuf>,

    /// Config file (default: GIT_MCP_CONFIG, ./git-mcp.toml, then the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace). Default is warn.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    mcp_common::init_tracing("mcp_server_git", cli.verbose)?;

    let mut config = Config::load(cli.config.as_deref())?;
    if cli.repository.is_some() {
        config.repository = cli.repository;
    }

    let server = GitMcpServer::from_config(&config)?;

    tracing::info!("Starting Git MCP server");

    let service = server.serve(stdio()).await?;

    tracing::info!("Git MCP server running");

    service.waiting().await?;

    tracing::info!("Git MCP server stopped");

    Ok(())
}
