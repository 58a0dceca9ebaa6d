//! fastembed config - Inspect configuration

use clap::{Args, Subcommand};

use crate::app::AppContext;
use crate::cli::output::robot_ok;
use crate::config::{Config, PROJECT_CONFIG_FILE};
use crate::error::{EmbedError, Result};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Print the config file locations that are consulted
    Path,
}

pub fn run(ctx: &AppContext, args: &ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show(ctx),
        ConfigCommand::Path => path(ctx),
    }
}

fn show(ctx: &AppContext) -> Result<()> {
    if ctx.robot_mode {
        return ctx.emit_robot(&robot_ok(&ctx.config));
    }
    let rendered = toml::to_string_pretty(&ctx.config)
        .map_err(|err| EmbedError::Config(format!("render config: {err}")))?;
    print!("{rendered}");
    Ok(())
}

fn path(ctx: &AppContext) -> Result<()> {
    let global = Config::global_path().map(|p| p.display().to_string());
    let project = ctx.project_root.join(PROJECT_CONFIG_FILE).display().to_string();

    if ctx.robot_mode {
        ctx.emit_robot(&robot_ok(serde_json::json!({
            "global": global,
            "project": project,
        })))
    } else {
        println!("global:  {}", global.as_deref().unwrap_or("(no config directory)"));
        println!("project: {project}");
        Ok(())
    }
}
