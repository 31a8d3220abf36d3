use colored::Colorize;

use artifex_server::{ArtifexServer, ServerConfig};
use artifex_store::{FsKeyStore, KeyStore};
use artifex_types::Path;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args, cli.data_dir),
        Command::Get(args) => cmd_get(args, cli.data_dir),
        Command::Set(args) => cmd_set(args, cli.data_dir),
        Command::Ls(args) => cmd_ls(args, cli.data_dir),
        Command::Clear(args) => cmd_clear(args, cli.data_dir),
    }
}

fn open_store(data_dir: std::path::PathBuf) -> anyhow::Result<FsKeyStore> {
    Ok(FsKeyStore::open(data_dir)?)
}

fn cmd_serve(args: ServeArgs, data_dir: std::path::PathBuf) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig {
            data_dir: Some(data_dir),
            ..ServerConfig::default()
        },
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if args.allow_cors {
        config.allow_cors = true;
    }
    if args.in_memory {
        config.data_dir = None;
    }

    let backing = match &config.data_dir {
        Some(dir) => dir.display().to_string(),
        None => "memory".to_string(),
    };
    println!(
        "{} artifex server on {} (store: {})",
        "✓".green().bold(),
        config.bind_addr.to_string().bold(),
        backing.cyan()
    );

    let server = ArtifexServer::new(config)?;
    tokio::runtime::Runtime::new()?.block_on(server.serve())?;
    Ok(())
}

fn cmd_get(args: GetArgs, data_dir: std::path::PathBuf) -> anyhow::Result<()> {
    let store = open_store(data_dir)?;
    let path: Path = args.path.parse()?;
    match store.get(&path)? {
        Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        None => println!("{}", "{}".dimmed()),
    }
    Ok(())
}

fn cmd_set(args: SetArgs, data_dir: std::path::PathBuf) -> anyhow::Result<()> {
    let store = open_store(data_dir)?;
    let path: Path = args.path.parse()?;
    let value = serde_json::from_str(&args.value)?;

    if store.set(&path, value, args.overwrite)? {
        println!("{} stored {}", "✓".green().bold(), path.to_string().yellow());
    } else {
        println!(
            "{} {} already holds a value; pass {} to replace it",
            "declined:".red().bold(),
            path.to_string().yellow(),
            "--overwrite".bold()
        );
    }
    Ok(())
}

fn cmd_ls(args: LsArgs, data_dir: std::path::PathBuf) -> anyhow::Result<()> {
    let store = open_store(data_dir)?;
    let prefix = match &args.prefix {
        Some(raw) => raw.parse()?,
        None => Path::empty(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&store.subtree(&prefix)?)?);
        return Ok(());
    }

    let entries = store.list(&prefix)?;
    if entries.is_empty() {
        println!("{}", "no entries".dimmed());
    }
    for (path, _) in entries {
        println!("{path}");
    }
    Ok(())
}

fn cmd_clear(args: ClearArgs, data_dir: std::path::PathBuf) -> anyhow::Result<()> {
    let store = open_store(data_dir)?;
    let path: Path = args.path.parse()?;
    if store.clear(&path)? {
        println!("{} cleared {}", "✓".green().bold(), path.to_string().yellow());
    } else {
        println!("nothing stored at {}", path.to_string().yellow());
    }
    Ok(())
}
