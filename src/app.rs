use std::path::PathBuf;

use serde::Serialize;

use crate::cli::output::{RobotResponse, emit_robot};
use crate::config::Config;
use crate::core::Dimension;
use crate::error::Result;
use crate::vector::Kernel;

/// Everything a CLI command needs, resolved once from flags and config.
pub struct AppContext {
    pub project_root: PathBuf,
    pub config: Config,
    pub kernel: Kernel,
    pub robot_mode: bool,
    pub verbosity: u8,
}

impl AppContext {
    pub fn from_cli(cli: &crate::cli::Cli) -> Result<Self> {
        let project_root = std::env::current_dir()?;
        let config = Config::load(cli.config.as_deref(), &project_root)?;
        let kernel = config.kernel()?;

        Ok(Self {
            project_root,
            robot_mode: cli.robot || config.output.robot,
            kernel,
            config,
            verbosity: cli.verbose,
        })
    }

    /// Print a robot envelope, indented when `output.pretty` is set.
    pub fn emit_robot<T: Serialize>(&self, response: &RobotResponse<T>) -> Result<()> {
        emit_robot(response, self.config.output.pretty)
    }

    /// The configured model, relative paths taken from the project root.
    #[must_use]
    pub fn model_path(&self) -> Option<PathBuf> {
        self.config
            .neural
            .model_path
            .as_ref()
            .map(|path| self.project_root.join(path))
    }

    /// `--dim` if given, otherwise the configured default.
    pub fn dimension(&self, requested: Option<usize>) -> Result<Dimension> {
        Dimension::resolve_or(requested.unwrap_or(0), self.config.default_dimension()?)
    }
}
