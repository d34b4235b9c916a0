mod config;
mod generate;

pub use config::*;
pub use generate::*;

use anyhow::Result;
use clap::Parser;

/// relgen CLI library for building custom command-line tools
#[derive(Debug, Default)]
pub struct RelgenCli {
    config: Config,
}

impl RelgenCli {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new RelgenCli instance with a custom configuration
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parse and execute CLI commands from command-line arguments
    pub fn parse_and_run(&self) -> Result<()> {
        let cli = Cli::parse();
        self.run(cli)
    }

    /// Parse and execute CLI commands from an iterator of arguments
    pub fn parse_from<I, T>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli = Cli::try_parse_from(args)?;
        self.run(cli)
    }

    fn run(&self, cli: Cli) -> Result<()> {
        match cli.command {
            Command::Generate(cmd) => cmd.run(&self.config).map(|_| ()),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "relgen")]
#[command(about = "relgen - persistence code generator for C++ classes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser, Debug)]
enum Command {
    /// Generate traits, statements and schema for a translation unit
    Generate(GenerateCommand),
}
