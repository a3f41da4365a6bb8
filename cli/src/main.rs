use clap::{ArgAction, CommandFactory, Parser};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tinyspec::{
    build_document, discover_sources, render_html, to_json, to_yaml, TARGET_JSON_FILE,
    TARGET_YAML_FILE,
};
use tinyspec_compiler::{error::SpecError, types::Options};

#[derive(Parser, Debug)]
#[command(name = "tinyspec")]
#[command(about = "Generate OpenAPI/Swagger documents from tinyspec models and endpoints", long_about = None)]
#[command(disable_help_flag = true)]
struct Cli {
    /// Generate OpenAPI/Swagger YAML
    #[arg(short = 'y', long, group = "mode")]
    yaml: bool,

    /// Generate OpenAPI/Swagger JSON
    #[arg(short = 'j', long, group = "mode")]
    json: bool,

    /// Generate HTML/CSS document
    #[arg(short = 'h', long, group = "mode")]
    html: bool,

    /// Path to output generated files, relative to the source directory
    #[arg(short = 'o', long, default_value = ".")]
    output: PathBuf,

    /// Directory searched (recursively) for the tinyspec sources
    #[arg(long, env = "TINYSPEC_SOURCE", default_value = ".")]
    source: PathBuf,

    /// Do not add `id`, `created_at` and `updated_at` to all models
    #[arg(long)]
    no_default_attrs: bool,

    /// Include `null` as possible value for non-required fields
    #[arg(long)]
    add_nulls: bool,

    /// Program used to render HTML from the JSON document
    #[arg(long, env = "TINYSPEC_RENDERER", default_value = "bootprint")]
    renderer: String,

    /// Display this help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Help,
    Yaml,
    Json,
    Html,
}

impl Cli {
    fn mode(&self) -> Mode {
        if self.yaml {
            Mode::Yaml
        } else if self.json {
            Mode::Json
        } else if self.html {
            Mode::Html
        } else {
            Mode::Help
        }
    }

    fn options(&self) -> Options {
        Options {
            inject_default_fields: !self.no_default_attrs,
            add_nulls:             self.add_nulls,
        }
    }
}

fn write_output(path: &Path, contents: &str) -> Result<(), SpecError> {
    fs::write(path, contents)?;
    info!(path = %path.display(), "wrote document");
    Ok(())
}

fn run(cli: &Cli) -> Result<(), SpecError> {
    let mode = cli.mode();
    if mode == Mode::Help {
        Cli::command().print_help()?;
        return Ok(());
    }

    let sources    = discover_sources(&cli.source)?;
    let document   = build_document(&sources, cli.options())?;
    let output_dir = cli.source.join(&cli.output);

    match mode {
        Mode::Yaml => write_output(&output_dir.join(TARGET_YAML_FILE), &to_yaml(&document)?),
        Mode::Json => write_output(&output_dir.join(TARGET_JSON_FILE), &to_json(&document)?),
        Mode::Html => {
            // The renderer reads the JSON from the source dir; remove it after
            // unless it was already there.
            let json_path    = cli.source.join(TARGET_JSON_FILE);
            let need_cleanup = !json_path.exists();

            write_output(&json_path, &to_json(&document)?)?;
            let rendered = render_html(&json_path, &output_dir, &cli.renderer);
            if need_cleanup {
                if let Err(e) = fs::remove_file(&json_path) {
                    warn!(path = %json_path.display(), error = %e, "could not remove temporary json");
                }
            }
            rendered
        }
        Mode::Help => Ok(()),
    }
}

fn main() -> Result<(), SpecError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    run(&cli)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_project(root: &Path) {
        fs::write(root.join("header.yaml"), "swagger: \"2.0\"\ninfo:\n  title: Shop\n  version: 1.0.0\n").unwrap();
        fs::write(root.join("models.tinyspec"), "Order:\n  total*: number\n  note: string\n").unwrap();
        fs::write(root.join("endpoints.tinyspec"), "GET /orders\n  => [Order]\n").unwrap();
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("tinyspec").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_mode_flags() {
        assert_eq!(parse(&[]).mode(), Mode::Help);
        assert_eq!(parse(&["-y"]).mode(), Mode::Yaml);
        assert_eq!(parse(&["--json"]).mode(), Mode::Json);
        assert_eq!(parse(&["-h"]).mode(), Mode::Html);
        assert!(Cli::try_parse_from(["tinyspec", "--yaml", "--json"]).is_err());
    }

    #[test]
    fn test_options_from_flags() {
        assert_eq!(parse(&["-y"]).options(), Options::default());
        let cli = parse(&["-y", "--no-default-attrs", "--add-nulls"]);
        assert_eq!(
            cli.options(),
            Options {
                inject_default_fields: false,
                add_nulls:             true,
            }
        );
    }

    #[test]
    fn test_run_writes_yaml() {
        let dir = tempdir().unwrap();
        write_project(dir.path());
        fs::create_dir(dir.path().join("out")).unwrap();

        let source = dir.path().to_str().unwrap();
        run(&parse(&["--yaml", "--source", source, "-o", "out"])).unwrap();

        let yaml = fs::read_to_string(dir.path().join("out").join(TARGET_YAML_FILE)).unwrap();
        assert!(yaml.contains("/orders"));
        assert!(yaml.contains("created_at"));
    }

    #[test]
    fn test_run_writes_json() {
        let dir = tempdir().unwrap();
        write_project(dir.path());

        let source = dir.path().to_str().unwrap();
        run(&parse(&["--json", "--source", source, "--no-default-attrs", "--add-nulls"])).unwrap();

        let json = fs::read_to_string(dir.path().join(TARGET_JSON_FILE)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["info"]["title"], "Shop");
        assert_eq!(
            value["definitions"]["Order"]["properties"]["note"]["type"],
            serde_json::json!(["string", "null"])
        );
        assert!(value["definitions"]["Order"]["properties"].get("id").is_none());
    }

    #[test]
    fn test_run_html_cleans_up_json_on_render_failure() {
        let dir = tempdir().unwrap();
        write_project(dir.path());

        let source = dir.path().to_str().unwrap();
        let err = run(&parse(&[
            "--html",
            "--source",
            source,
            "--renderer",
            "tinyspec-renderer-that-does-not-exist",
        ]))
        .unwrap_err();

        assert!(matches!(err, SpecError::Render(_)));
        assert!(!dir.path().join(TARGET_JSON_FILE).exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_run_html_keeps_existing_json() {
        let dir = tempdir().unwrap();
        write_project(dir.path());
        let json_path = dir.path().join(TARGET_JSON_FILE);
        fs::write(&json_path, "{}").unwrap();

        let source = dir.path().to_str().unwrap();
        run(&parse(&["--html", "--source", source, "--renderer", "true"])).unwrap();

        let json = fs::read_to_string(&json_path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["info"]["title"], "Shop");
    }

    #[cfg(unix)]
    #[test]
    fn test_run_html_removes_temporary_json_after_render() {
        let dir = tempdir().unwrap();
        write_project(dir.path());

        let source = dir.path().to_str().unwrap();
        run(&parse(&["--html", "--source", source, "--renderer", "true"])).unwrap();

        assert!(!dir.path().join(TARGET_JSON_FILE).exists());
    }

    #[test]
    fn test_run_reports_compile_errors() {
        let dir = tempdir().unwrap();
        write_project(dir.path());
        fs::write(dir.path().join("endpoints.tinyspec"), "FETCH /orders\n").unwrap();

        let source = dir.path().to_str().unwrap();
        let err = run(&parse(&["--yaml", "--source", source])).unwrap_err();
        assert!(matches!(err, SpecError::UnknownMethod(_)));
        assert!(!dir.path().join(TARGET_YAML_FILE).exists());
    }
}
