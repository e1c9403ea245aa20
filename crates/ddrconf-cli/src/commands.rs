use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use tracing::debug;

use ddrconf_diff::{compare_timing, Comparator, CompareConfig, Outcome, TableReport, TimingReport};
use ddrconf_report::{render_json, Dump, TextOptions, TextReport};
use ddrconf_types::DramTiming;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Compare(args) => cmd_compare(args, &cli.format),
        Command::Dump(args) => cmd_dump(args, &cli.format),
    }
}

/// Differences are reported, never turned into a failing exit status.
fn cmd_compare(args: CompareArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let config = build_config(&args)?;
    let left = load_dataset(&args.left)?;
    let right = load_dataset(&args.right)?;

    let report = compare_timing(&left, &right, &Comparator::new(config));

    match format {
        OutputFormat::Json => println!("{}", render_json(&report)?),
        OutputFormat::Text => {
            let options = TextOptions {
                list_duplicates: args.list_duplicates,
                max_block_rows: args.max_block_rows,
            };
            print!("{}", TextReport::new(&report, &options));
            println!();
            println!("{}", verdict(&report));
        }
    }
    Ok(())
}

fn cmd_dump(args: DumpArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let timing = load_dataset(&args.path)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&timing)?),
        OutputFormat::Text => print!("{}", Dump(&timing)),
    }
    Ok(())
}

fn load_dataset(path: &Path) -> anyhow::Result<DramTiming> {
    DramTiming::from_path(path).with_context(|| format!("failed to load {}", path.display()))
}

fn build_config(args: &CompareArgs) -> anyhow::Result<CompareConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => CompareConfig::default(),
    };
    if let Some(window) = args.window {
        config.lookahead_window = window;
    }
    if args.show_matched_runs {
        config.summarize_matched_runs = true;
    }
    debug!(?config, "comparison settings");
    Ok(config)
}

fn load_config(path: &Path) -> anyhow::Result<CompareConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
}

/// One-line colored outcome printed after the text report.
fn verdict(report: &TimingReport) -> String {
    let diffs: usize = report.tables().map(TableReport::total_diff_count).sum();
    let fields = report.field_diff_count();
    let reordered = report
        .tables()
        .filter(|t| matches!(t.outcome(), Outcome::Reordered { .. }))
        .count();

    if report.has_structural_errors() {
        format!(
            "{} Structural differences found ({} value differences)",
            "✗".red().bold(),
            diffs
        )
    } else if diffs > 0 || fields > 0 || reordered > 0 {
        format!(
            "{} Same registers: {} value differences, {} field differences, {} reordered tables",
            "!".yellow().bold(),
            diffs,
            fields,
            reordered
        )
    } else {
        format!("{} Configurations match", "✓".green().bold())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    use ddrconf_types::FspConfig;

    fn compare_args(config: Option<PathBuf>) -> CompareArgs {
        CompareArgs {
            left: "left.toml".into(),
            right: "right.toml".into(),
            list_duplicates: false,
            config,
            window: None,
            show_matched_runs: false,
            max_block_rows: 10,
        }
    }

    fn write_file(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn config_defaults_without_file() {
        let config = build_config(&compare_args(None)).unwrap();
        assert_eq!(config, CompareConfig::default());
    }

    #[test]
    fn config_file_then_flag_overrides() {
        let file = write_file(".toml", "lookahead_window = 12\nmax_group_size = 8\n");
        let mut args = compare_args(Some(file.path().to_path_buf()));
        let config = build_config(&args).unwrap();
        assert_eq!(config.lookahead_window, 12);
        assert_eq!(config.max_group_size, 8);
        assert_eq!(config.max_duplicate_groups, 100);

        args.window = Some(3);
        args.show_matched_runs = true;
        let config = build_config(&args).unwrap();
        assert_eq!(config.lookahead_window, 3);
        assert!(config.summarize_matched_runs);
    }

    #[test]
    fn bad_config_is_reported_with_path() {
        let file = write_file(".toml", "lookahead_window = \"wide\"\n");
        let err = build_config(&compare_args(Some(file.path().to_path_buf()))).unwrap_err();
        assert!(err.to_string().starts_with("invalid config"));
    }

    #[test]
    fn compare_and_dump_run_on_files() {
        let left = write_file(
            ".toml",
            "[[ddrc_cfg]]\nreg = 0x3d400000\nval = 0x1\n\n[[ddrphy_pie]]\nreg = 0x90000\nval = 0x10\n",
        );
        let right = write_file(".json", r#"{"ddrc_cfg": [{"reg": 1027604480, "val": 2}]}"#);

        let mut args = compare_args(None);
        args.left = left.path().to_path_buf();
        args.right = right.path().to_path_buf();
        cmd_compare(args, &OutputFormat::Json).unwrap();

        let dump = DumpArgs {
            path: left.path().to_path_buf(),
        };
        cmd_dump(dump, &OutputFormat::Text).unwrap();
    }

    #[test]
    fn missing_dataset_fails() {
        let err = load_dataset(Path::new("/nonexistent/left.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to load"));
    }

    #[test]
    fn verdict_reflects_outcome() {
        colored::control::set_override(false);
        let same = DramTiming::default();
        let report = compare_timing(&same, &same, &Comparator::default());
        assert_eq!(verdict(&report), "✓ Configurations match");

        let other = DramTiming {
            ddrc_cfg: vec![ddrconf_types::DdrcParam::new(1, 1)],
            ..Default::default()
        };
        let report = compare_timing(&same, &other, &Comparator::default());
        assert!(verdict(&report).starts_with("✗ Structural differences found"));
    }

    #[test]
    fn bypass_only_difference_is_not_a_match() {
        colored::control::set_override(false);
        let fsp = |bypass| DramTiming {
            fsp_cfg: vec![FspConfig { ddrc_cfg: vec![], bypass }],
            ..Default::default()
        };
        let report = compare_timing(&fsp(0), &fsp(1), &Comparator::default());
        assert_eq!(
            verdict(&report),
            "! Same registers: 0 value differences, 1 field differences, 0 reordered tables"
        );
    }
}
