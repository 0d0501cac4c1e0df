//! CLI command handling
//!
//! Turns parsed commands into runner calls and formats their results.

use colored::Colorize;
use std::path::Path;

use crate::commands::{Commands, RunArgs};
use crate::common::config::Settings;
use crate::common::Result;
use crate::runner::{report, Options, PartialOptions, ReportDocument, ResolvedConfig, Runner};

/// Dispatch a CLI command, returning the process exit code
pub async fn dispatch(command: Commands) -> Result<i32> {
    match command {
        Commands::Run(args) => {
            if args.no_colors {
                colored::control::set_override(false);
            }

            let settings = Settings::load()?;
            let runner = Runner::new(run_options(args, &settings));
            let code = runner.run().await?;

            // The summary is a courtesy; a missing report doesn't change the exit code
            match runner.report() {
                Ok(Some(report)) => print_summary(&report),
                Ok(None) => {}
                Err(e) => tracing::warn!("{}", e),
            }

            Ok(code)
        }

        Commands::Report { path, json } => {
            let report = report::parse(&path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_summary(&report);
            }
            Ok(if report.passed() { 0 } else { 1 })
        }

        Commands::Config { jasmine_config } => {
            let config = ResolvedConfig::load(Path::new(&jasmine_config))?;
            print!("{}", serde_yaml::to_string(config.values())?);
            println!("# spec_dir resolves to {}", config.spec_dir().display());
            println!("# src_dir resolves to {}", config.src_dir().display());
            Ok(0)
        }
    }
}

/// Merge command-line flags over the settings file
///
/// Flags win; settings fill in whatever the flags leave unset.
pub fn run_options(args: RunArgs, settings: &Settings) -> Options {
    let colors = if args.no_colors {
        false
    } else {
        args.colors || settings.output.colors
    };

    Options::from_partial(PartialOptions {
        jasmine_config: args.jasmine_config,
        colors: Some(colors),
        report: args.report,
        runner: args.runner.or_else(|| settings.runner.path.clone()),
        files: Some(args.files),
        keep_runner: Some(args.keep),
        timeout_secs: args.timeout.or(settings.runner.timeout_secs),
        ..Default::default()
    })
}

fn print_summary(report: &ReportDocument) {
    let counts = format!(
        "{} specs, {} failures{}",
        report.total,
        report.failures,
        match report.time_secs {
            Some(secs) => format!(" in {:.3}s", secs),
            None => String::new(),
        }
    );

    if report.passed() {
        println!("\n{} {}", "PASS".green().bold(), counts);
    } else {
        println!("\n{} {}", "FAIL".red().bold(), counts);
    }

    for spec in &report.failed_specs {
        match &spec.location {
            Some(location) => println!(
                "  {} {} {}",
                "✗".red(),
                spec.labels.join(" "),
                format!("({})", location).dimmed()
            ),
            None => println!("  {} {}", "✗".red(), spec.labels.join(" ")),
        }
    }

    for error in &report.errors {
        println!("  {} {}", "!".red(), error.message);
    }

    if report.pending {
        println!("  {}", "Some specs are pending".yellow());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_flags_override_settings() {
        let settings: Settings =
            toml::from_str("[runner]\npath = \"/opt/runner\"\ntimeout_secs = 60\n").unwrap();
        let args = RunArgs {
            runner: Some(PathBuf::from("/usr/bin/specrunner")),
            timeout: Some(5),
            ..Default::default()
        };

        let options = run_options(args, &settings);
        assert_eq!(options.runner(), Path::new("/usr/bin/specrunner"));
        assert_eq!(options.timeout(), Some(std::time::Duration::from_secs(5)));
    }

    #[test]
    fn test_settings_fill_gaps() {
        let settings: Settings =
            toml::from_str("[runner]\npath = \"/opt/runner\"\n\n[output]\ncolors = true\n").unwrap();

        let options = run_options(RunArgs::default(), &settings);
        assert_eq!(options.runner(), Path::new("/opt/runner"));
        assert!(options.colors());
        assert_eq!(options.jasmine_config(), crate::runner::DEFAULT_JASMINE_CONFIG);
    }

    #[test]
    fn test_no_colors_beats_settings() {
        let settings: Settings = toml::from_str("[output]\ncolors = true\n").unwrap();
        let args = RunArgs {
            no_colors: true,
            ..Default::default()
        };
        assert!(!run_options(args, &settings).colors());
    }

    #[test]
    fn test_targeted_files_are_passed_through() {
        let args = RunArgs {
            files: vec!["spec/a_spec.js".into()],
            keep: true,
            ..Default::default()
        };
        let options = run_options(args, &Settings::default());
        assert_eq!(options.files(), ["spec/a_spec.js".to_string()]);
        assert!(options.keep_runner());
    }
}
