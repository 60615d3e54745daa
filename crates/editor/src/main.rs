use std::io::Read;
use std::process::ExitCode;

use massing_editor_lib::command::execute_json_batch;
use massing_editor_lib::harness::TestHarness;
use massing_editor_lib::state::{AppSettings, SceneStore};

/// Parsed command line: `massing-editor [--scene <document.json>] [<commands.json>]`
#[derive(Debug, Default)]
struct Args {
    scene: Option<String>,
    commands: Option<String>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--scene" => {
                let path = iter.next().ok_or("--scene requires a path")?;
                args.scene = Some(path);
            }
            _ if args.commands.is_none() => args.commands = Some(arg),
            _ => return Err(format!("Unexpected argument: {arg}")),
        }
    }
    Ok(args)
}

fn run() -> Result<bool, String> {
    let args = parse_args()?;
    let settings = AppSettings::load();
    let mut store = SceneStore::with_settings(&settings);

    if let Some(path) = &args.scene {
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read scene file {path}: {e}"))?;
        let count = store
            .load_document(&json)
            .map_err(|e| format!("Failed to load scene from {path}: {e}"))?;
        tracing::info!("Loaded scene from {path} ({count} shapes)");
    }

    let commands = match &args.commands {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read commands file {path}: {e}"))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("Failed to read commands from stdin: {e}"))?;
            buf
        }
    };

    let mut harness = TestHarness::from_store(store);
    let responses = execute_json_batch(&mut harness, &commands)?;
    let failed = responses.iter().filter(|r| !r.success).count();
    tracing::info!("Executed {} commands ({failed} failed)", responses.len());

    let out = serde_json::to_string_pretty(&responses)
        .map_err(|e| format!("Failed to serialize responses: {e}"))?;
    println!("{out}");
    Ok(failed == 0)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "massing_editor=info,massing_editor_lib=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
