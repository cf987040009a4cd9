pub mod toml_config;

use crate::core::ConfigProvider;
use crate::domain::model::{MatchRules, OutputTarget};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::path::{Path, PathBuf};
use toml_config::SyncConfig;

#[cfg(feature = "cli")]
use crate::utils::logger::LogFormat;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "export_staff_records")]
#[command(about = "Compare HR and asset-system staff exports and write the updates to import")]
pub struct CliConfig {
    /// CSV export of current staff from the HR system
    pub authoritative_file: PathBuf,

    /// CSV export of current staff from the asset-management system
    pub target_file: PathBuf,

    /// Path for the CSV of updates to import ("-" for stdout)
    pub output_file: String,

    /// TOML settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the recognized email domain suffix
    #[arg(long)]
    pub domain: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Log line format; defaults to the config file's setting
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Reconcile and report counts without writing the output file
    #[arg(long)]
    pub dry_run: bool,

    /// Print a JSON summary of the run to stderr
    #[arg(long)]
    pub summary: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Load the settings file (if any) and apply command-line overrides.
    pub fn resolve(&self) -> Result<RunConfig> {
        let mut settings = match &self.config {
            Some(path) => SyncConfig::from_file(path)?,
            None => SyncConfig::default(),
        };

        if let Some(domain) = &self.domain {
            settings.rules.email_domain = domain.clone();
        }
        if let Some(format) = self.log_format {
            settings.logging.format = format;
        }

        Ok(RunConfig::new(
            self.authoritative_file.clone(),
            self.target_file.clone(),
            &self.output_file,
            settings,
        ))
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub authoritative_file: PathBuf,
    pub target_file: PathBuf,
    pub output: OutputTarget,
    pub settings: SyncConfig,
    rules: MatchRules,
}

impl RunConfig {
    pub fn new(
        authoritative_file: PathBuf,
        target_file: PathBuf,
        output: &str,
        settings: SyncConfig,
    ) -> Self {
        let rules = settings.match_rules();
        Self {
            authoritative_file,
            target_file,
            output: OutputTarget::parse(output),
            settings,
            rules,
        }
    }
}

impl Validate for RunConfig {
    fn validate(&self) -> Result<()> {
        self.settings.validate()?;
        validation::validate_input_file("authoritative_file", &self.authoritative_file)?;
        validation::validate_input_file("target_file", &self.target_file)?;
        if let OutputTarget::File(path) = &self.output {
            validation::validate_path("output_file", &path.to_string_lossy())?;
        }
        Ok(())
    }
}

impl ConfigProvider for RunConfig {
    fn authoritative_file(&self) -> &Path {
        &self.authoritative_file
    }

    fn target_file(&self) -> &Path {
        &self.target_file
    }

    fn output(&self) -> &OutputTarget {
        &self.output
    }

    fn key_column(&self) -> &str {
        &self.settings.roster.key_column
    }

    fn rules(&self) -> &MatchRules {
        &self.rules
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use crate::utils::error::SyncError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_positional_arguments() {
        let cli = CliConfig::try_parse_from(["export_staff_records", "ps.csv", "ap.csv", "-"])
            .unwrap();

        assert_eq!(cli.authoritative_file, PathBuf::from("ps.csv"));
        assert_eq!(cli.output_file, "-");
        assert!(!cli.dry_run);

        let run = cli.resolve().unwrap();
        assert_eq!(run.output, OutputTarget::Stdout);
        assert_eq!(run.rules().email_domain, "@centercitypcs.org");
    }

    #[test]
    fn test_all_three_paths_are_required() {
        assert!(CliConfig::try_parse_from(["export_staff_records", "ps.csv", "ap.csv"]).is_err());
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let mut config_file = NamedTempFile::new().unwrap();
        config_file
            .write_all(b"[rules]\nemail_domain = \"@file.org\"\ninactive_status = \"Gone\"\n")
            .unwrap();
        let config_path = config_file.path().to_string_lossy().to_string();

        let cli = CliConfig::try_parse_from([
            "export_staff_records",
            "--config",
            config_path.as_str(),
            "--domain",
            "@flag.org",
            "--log-format",
            "json",
            "ps.csv",
            "ap.csv",
            "out.csv",
        ])
        .unwrap();

        let run = cli.resolve().unwrap();
        assert_eq!(run.rules().email_domain, "@flag.org");
        assert_eq!(run.rules().inactive_status, "Gone");
        assert_eq!(run.settings.logging.format, LogFormat::Json);
        assert_eq!(run.output, OutputTarget::File(PathBuf::from("out.csv")));
    }

    #[test]
    fn test_validate_requires_existing_inputs() {
        let authoritative = NamedTempFile::new().unwrap();
        let run = RunConfig::new(
            authoritative.path().to_path_buf(),
            PathBuf::from("/no/such/target.csv"),
            "-",
            SyncConfig::default(),
        );

        match run.validate() {
            Err(SyncError::FileNotFound { path }) => {
                assert_eq!(path, PathBuf::from("/no/such/target.csv"))
            }
            other => panic!("expected missing target file, got {:?}", other),
        }
    }
}
