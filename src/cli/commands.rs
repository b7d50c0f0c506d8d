//! CLI subcommands: wizard, guide, preview, report-url, init, config and logs.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::LogCommands;
use crate::config::Config;
use crate::tui::{self, App};
use crate::wizard::guides::{self, GuideKind, SecretPolicy};
use crate::wizard::validate::{self, MISSING_URL_MESSAGE};
use crate::wizard::{AppDraft, ExportPhase, FieldUpdate, PreviewModel};

/// Start from the given preset (or the configured one) and apply `--set` overrides
pub(crate) fn build_draft(
    config: &Config,
    preset: Option<&Path>,
    assignments: &[String],
) -> Result<AppDraft> {
    let mut draft = match preset.or(config.wizard.preset.as_deref()) {
        Some(path) => {
            tracing::info!("Loading draft preset from {:?}", path);
            AppDraft::load_preset(path)?
        }
        None => AppDraft::default(),
    };

    for assignment in assignments {
        let update = FieldUpdate::parse_assignment(assignment)?;
        tracing::debug!("Applying override for {}", update.name());
        draft.apply(update);
    }

    Ok(draft)
}

/// Run the interactive wizard
pub(crate) async fn cmd_wizard(
    config: Config,
    preset: Option<PathBuf>,
    url: Option<String>,
) -> Result<()> {
    let mut draft = build_draft(&config, preset.as_deref(), &[])?;
    if let Some(url) = url {
        draft.apply(FieldUpdate::WebsiteUrl(url));
    }

    let app = App::new(config, draft);
    tui::run(app).await.context("TUI error")?;

    Ok(())
}

/// Render a guide to stdout or into a directory
pub(crate) async fn cmd_guide(
    config: &Config,
    kind: GuideKind,
    preset: Option<PathBuf>,
    assignments: &[String],
    out: Option<PathBuf>,
    include_passwords: bool,
) -> Result<()> {
    let draft = build_draft(config, preset.as_deref(), assignments)?;
    let policy = if include_passwords {
        SecretPolicy::Plaintext
    } else {
        config.export.secret_policy()
    };

    match out {
        Some(dir) => {
            let path = guides::write_guide(&dir, kind, &draft, policy)?;
            println!("✅ Wrote {}", path.display());
            if policy == SecretPolicy::Plaintext && kind == GuideKind::Signing {
                println!("⚠️  The guide contains passwords in plaintext. Keep it out of version control.");
            }
        }
        None => print!("{}", kind.render(&draft, policy)),
    }

    Ok(())
}

/// Print the device preview model as JSON
pub(crate) async fn cmd_preview(
    config: &Config,
    preset: Option<PathBuf>,
    assignments: &[String],
) -> Result<()> {
    let draft = build_draft(config, preset.as_deref(), assignments)?;
    let model = PreviewModel::project(&draft, ExportPhase::Idle);
    println!("{}", serde_json::to_string_pretty(&model)?);
    Ok(())
}

/// Print the report link for the draft's website
pub(crate) async fn cmd_report_url(
    config: &Config,
    preset: Option<PathBuf>,
    url: Option<String>,
) -> Result<()> {
    println!("{}", report_link(config, preset.as_deref(), url)?);
    Ok(())
}

fn report_link(config: &Config, preset: Option<&Path>, url: Option<String>) -> Result<String> {
    let mut draft = build_draft(config, preset, &[])?;
    if let Some(url) = url {
        draft.apply(FieldUpdate::WebsiteUrl(url));
    }

    if draft.website_url.is_empty() {
        anyhow::bail!(MISSING_URL_MESSAGE);
    }
    validate::validate_url(&draft.website_url)?;

    Ok(guides::report_url(&draft, &config.export.report_base_url))
}

/// Initialize configuration file
pub(crate) async fn cmd_init(force: bool) -> Result<()> {
    println!("🔨 AppForge Configuration Initialization\n");

    let config_path =
        Config::system_config_path().context("Could not determine config directory")?;

    if config_path.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists at: {}\nUse --force to overwrite",
            config_path.display()
        );
    }

    Config::default().save(&config_path)?;

    println!("✅ Configuration initialized at: {}", config_path.display());
    println!("\n📝 Next steps:");
    println!("   1. Adjust [export] output_dir and delay_ms if needed");
    println!("   2. Point [wizard] preset at a saved draft to skip retyping");
    println!("   3. Run 'appforge' to start the wizard");

    Ok(())
}

/// Show the effective configuration
pub(crate) async fn cmd_config(config: &Config) -> Result<()> {
    println!("🔨 AppForge Configuration\n");

    if let Some(path) = Config::system_config_path() {
        println!("System config: {}", describe_path(&path));
    }
    println!("Local config:  {}\n", describe_path(&Config::local_config_path()));

    let rendered = toml::to_string_pretty(config).context("Failed to serialize config")?;
    println!("{}", rendered);

    Ok(())
}

fn describe_path(path: &Path) -> String {
    let state = if path.exists() { "found" } else { "not found" };
    format!("{} ({})", path.display(), state)
}

/// Log management
pub(crate) async fn cmd_logs(operation: LogCommands) -> Result<()> {
    use crate::logging;
    use std::io::{BufRead, BufReader};

    match operation {
        LogCommands::Status => {
            let log_dir = logging::log_dir();
            println!("📊 AppForge Logging Status\n");
            println!("Log directory: {}", log_dir.display());

            let status = logging::log_status();
            if status.file_count == 0 {
                println!("Status: ❌ No logs found");
            } else {
                println!("Status: ✅ Active");
                println!("Log files: {}", status.file_count);
                println!(
                    "Total size: {:.2} MB",
                    status.total_bytes as f64 / (1024.0 * 1024.0)
                );
                if let Some((path, modified)) = status.newest {
                    println!(
                        "Latest log: {} (updated {})",
                        path.display(),
                        modified.format("%Y-%m-%d %H:%M:%S")
                    );
                }
            }

            println!("\n💡 To enable debug logging, run with -d flag:");
            println!("   appforge -d");

            Ok(())
        }

        LogCommands::View { lines } => {
            let Some(log_path) = logging::get_log_path() else {
                println!("❌ No log files found.\n");
                println!("💡 Run AppForge with -d flag to enable debug logging:");
                println!("   appforge -d");
                return Ok(());
            };

            println!(
                "📜 Viewing last {} lines of: {}\n",
                lines,
                log_path.display()
            );

            let file = std::fs::File::open(&log_path)
                .with_context(|| format!("Failed to open {}", log_path.display()))?;
            let all_lines: Vec<String> = BufReader::new(file).lines().map_while(Result::ok).collect();
            let start = all_lines.len().saturating_sub(lines);

            for line in &all_lines[start..] {
                println!("{}", line);
            }

            if all_lines.is_empty() {
                println!("(empty log file)");
            }

            Ok(())
        }

        LogCommands::Clean { days } => {
            println!("🧹 Cleaning up log files older than {} days...\n", days);

            match logging::cleanup_old_logs(days) {
                Ok(removed) if removed > 0 => println!("✅ Removed {} old log file(s)", removed),
                Ok(_) => println!("✅ No old log files to remove"),
                Err(e) => println!("❌ Error cleaning logs: {}", e),
            }

            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::NavigationStyle;
    use tempfile::TempDir;

    fn sets(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_build_draft_defaults() {
        let draft = build_draft(&Config::default(), None, &[]).unwrap();
        assert_eq!(draft, AppDraft::default());
    }

    #[test]
    fn test_build_draft_applies_overrides_over_preset() {
        let dir = TempDir::new().unwrap();
        let preset = dir.path().join("shop.toml");
        let mut saved = AppDraft::default();
        saved.app_name = "Crab Shop".to_string();
        saved.website_url = "https://crab.shop".to_string();
        saved.save_preset(&preset).unwrap();

        let draft = build_draft(
            &Config::default(),
            Some(&preset),
            &sets(&["navigation_style=tabs", "app_name=Crab Store"]),
        )
        .unwrap();

        assert_eq!(draft.website_url, "https://crab.shop");
        assert_eq!(draft.app_name, "Crab Store");
        assert_eq!(draft.navigation_style, NavigationStyle::Tabs);
    }

    #[test]
    fn test_build_draft_uses_configured_preset() {
        let dir = TempDir::new().unwrap();
        let preset = dir.path().join("preset.toml");
        let mut saved = AppDraft::default();
        saved.version = "2.0.0".to_string();
        saved.save_preset(&preset).unwrap();

        let mut config = Config::default();
        config.wizard.preset = Some(preset);
        let draft = build_draft(&config, None, &[]).unwrap();
        assert_eq!(draft.version, "2.0.0");
    }

    #[test]
    fn test_build_draft_rejects_unknown_field() {
        let err = build_draft(&Config::default(), None, &sets(&["favorite_color=red"]))
            .unwrap_err();
        assert!(err.to_string().contains("favorite_color"));
    }

    #[test]
    fn test_build_draft_missing_preset() {
        let missing = Path::new("/nonexistent/appforge/preset.toml");
        assert!(build_draft(&Config::default(), Some(missing), &[]).is_err());
    }

    #[test]
    fn test_report_link_requires_url() {
        let err = report_link(&Config::default(), None, None).unwrap_err();
        assert_eq!(err.to_string(), MISSING_URL_MESSAGE);
    }

    #[test]
    fn test_report_link_encodes_url() {
        let link = report_link(
            &Config::default(),
            None,
            Some("https://example.com/a b".to_string()),
        )
        .unwrap();
        assert!(link.starts_with("https://www.pwabuilder.com/report?url="));
        assert!(link.contains("https%3A%2F%2Fexample.com%2Fa%20b"));
    }

    #[test]
    fn test_report_link_rejects_malformed_url() {
        assert!(report_link(&Config::default(), None, Some("not a url".to_string())).is_err());
    }

    #[test]
    fn test_cmd_guide_writes_redacted_signing_guide() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("dist");

        tokio_test::block_on(cmd_guide(
            &Config::default(),
            GuideKind::Signing,
            None,
            &sets(&["keystore_password=hunter2"]),
            Some(out.clone()),
            false,
        ))
        .unwrap();

        let written = std::fs::read_to_string(out.join("RELEASE_INSTRUCTIONS.md")).unwrap();
        assert!(!written.contains("hunter2"));
    }

    #[test]
    fn test_cmd_guide_plaintext_when_requested() {
        let dir = TempDir::new().unwrap();

        tokio_test::block_on(cmd_guide(
            &Config::default(),
            GuideKind::Signing,
            None,
            &sets(&["keystore_password=hunter2"]),
            Some(dir.path().to_path_buf()),
            true,
        ))
        .unwrap();

        let written =
            std::fs::read_to_string(dir.path().join("RELEASE_INSTRUCTIONS.md")).unwrap();
        assert!(written.contains("hunter2"));
    }
}
