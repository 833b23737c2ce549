// File: ./src/cli.rs
//! Command-line parsing and help text.
use crate::config::{Config, INVALID_CONFIG};
use crate::context::AppContext;
use crate::controller::PageSource;
use crate::storage::OutputTarget;
use anyhow::{Result, bail};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub help: bool,
    pub init_config: bool,
    pub verbose: bool,
    pub root: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub url: Option<String>,
    pub from_file: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub stdout: bool,
    pub no_scraped: bool,
    pub no_holidays: bool,
}

impl CliArgs {
    /// Parses the arguments after the binary name.
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        let mut parsed = Self::default();
        let mut iter = args.iter().map(|a| a.as_ref());

        while let Some(arg) = iter.next() {
            let mut value = |flag: &str| -> Result<String> {
                match iter.next() {
                    Some(v) if !v.starts_with("--") => Ok(v.to_string()),
                    _ => bail!("{} expects a value", flag),
                }
            };
            match arg {
                "-h" | "--help" | "help" => parsed.help = true,
                "init-config" => parsed.init_config = true,
                "-v" | "--verbose" => parsed.verbose = true,
                "-r" | "--root" => parsed.root = Some(PathBuf::from(value(arg)?)),
                "-c" | "--config" => parsed.config = Some(PathBuf::from(value(arg)?)),
                "--url" => parsed.url = Some(value(arg)?),
                "--from-file" => parsed.from_file = Some(PathBuf::from(value(arg)?)),
                "-o" | "--output" => parsed.output = Some(PathBuf::from(value(arg)?)),
                "--stdout" => parsed.stdout = true,
                "--no-scraped" => parsed.no_scraped = true,
                "--no-holidays" => parsed.no_holidays = true,
                other => bail!("Unknown argument '{}'", other),
            }
        }

        if parsed.url.is_some() && parsed.from_file.is_some() {
            bail!("--url and --from-file cannot be used together");
        }
        if parsed.output.is_some() && parsed.stdout {
            bail!("--output and --stdout cannot be used together");
        }
        Ok(parsed)
    }

    /// Loads `--config` if given, otherwise the context's config file or the defaults.
    pub fn load_config(&self, ctx: &dyn AppContext) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load_from_path(path),
            None => Config::load_or_default(ctx),
        }
    }

    /// Loads the config with the overrides applied and picks the log file.
    ///
    /// A config that fails to load still yields the default log file, so the
    /// failure can be written to it.
    pub fn prepare(&self, ctx: &dyn AppContext) -> (Result<Config>, PathBuf) {
        match self.load_config(ctx) {
            Ok(mut config) => {
                self.apply_overrides(&mut config);
                let log_path = resolve_log_path(ctx, &config.log_path);
                (Ok(config), log_path)
            }
            Err(e) => (
                Err(e.context(INVALID_CONFIG)),
                resolve_log_path(ctx, &Config::default().log_path),
            ),
        }
    }

    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(url) = &self.url {
            config.url = url.clone();
        }
        if let Some(output) = &self.output {
            config.output_path = output.clone();
        }
        if self.no_scraped {
            config.create_scraped_events = false;
        }
        if self.no_holidays {
            config.create_holiday_events = false;
        }
    }

    pub fn source(&self, config: &Config) -> PageSource {
        match &self.from_file {
            Some(path) => PageSource::File(path.clone()),
            None => PageSource::Url(config.url.clone()),
        }
    }

    pub fn target(&self, config: &Config) -> OutputTarget {
        if self.stdout {
            OutputTarget::Stdout
        } else {
            OutputTarget::File(config.output_path.clone())
        }
    }
}

fn resolve_log_path(ctx: &dyn AppContext, path: &Path) -> PathBuf {
    ctx.resolve_path(path).unwrap_or_else(|_| path.to_path_buf())
}

pub fn print_help(binary_name: &str) {
    println!(
        "Termdates v{} - School term dates to iCalendar",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [OPTIONS]", binary_name);
    println!("    {} init-config [--root <path>]", binary_name);
    println!("    {} --help", binary_name);
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>       Use a different directory for config and data.");
    println!("    -c, --config <file>     Load this config file instead of the default one.");
    println!("    --url <url>             Term dates page to fetch.");
    println!("    --from-file <page>      Parse a saved HTML page instead of fetching.");
    println!("    -o, --output <file>     Where to write the .ics file.");
    println!("    --stdout                Print the calendar instead of writing a file.");
    println!("    --no-scraped            Leave out the events listed on the page.");
    println!("    --no-holidays           Leave out the inferred holidays.");
    println!("    -v, --verbose           Show debug output.");
    println!("    -h, --help              Show this help message.");
    println!();
    println!("INIT-CONFIG:");
    println!("    Writes the current settings to config.toml so they can be edited.");
    println!();
    println!("EXAMPLES:");
    println!("    {}                                   Fetch and write penrice.ics", binary_name);
    println!("    {} --stdout | grep SUMMARY           Inspect the generated events", binary_name);
    println!("    {} --from-file saved.html -o t.ics   Work offline", binary_name);
}
