use std::env;
use std::fs;
use std::path::PathBuf;

use presenters::{PresenterConfig, VrPose, VrTransforms};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

const CONFIG_ENV: &str = "POSESYNC_CONFIG";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let mut args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(usage());
    }

    let cmd = args[1].clone();
    args.drain(0..2);

    match cmd.as_str() {
        "replay" => cmd_replay(args),
        "example" => cmd_example(args),
        _ => Err(usage()),
    }
}

fn cmd_replay(args: Vec<String>) -> Result<(), String> {
    // posesync replay <poses.jsonl> [--config FILE]
    let mut input: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = env::var(CONFIG_ENV).ok().map(PathBuf::from);

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                if i >= args.len() {
                    return Err("--config requires a path".to_string());
                }
                config_path = Some(PathBuf::from(&args[i]));
            }
            s if s.starts_with('-') => {
                return Err(format!("unknown arg: {s}\n\n{}", usage()));
            }
            _ if input.is_none() => input = Some(PathBuf::from(&args[i])),
            other => return Err(format!("unexpected arg: {other}\n\n{}", usage())),
        }
        i += 1;
    }

    let input = input.ok_or_else(usage)?;
    let config = load_config(config_path)?;
    let payload = fs::read_to_string(&input).map_err(|e| format!("read {input:?}: {e}"))?;
    let report = tools::replay_str(&payload, config)?;
    print_json(&report)
}

fn cmd_example(args: Vec<String>) -> Result<(), String> {
    // posesync example
    if let Some(arg) = args.first() {
        return Err(format!("unknown arg: {arg}\n\n{}", usage()));
    }
    let pose = foundation::Pose::new(40.0, -74.0, 10.0, 90.0, 5.0, 0.0);
    let config = PresenterConfig::default();
    let t = VrTransforms::compute(&VrPose::from(&pose), &config.vr);

    #[derive(Serialize)]
    struct Example {
        pose: foundation::Pose,
        rig_position: String,
        rig_rotation: String,
        compass_rotation: String,
        horizon_rotation: String,
        horizon_position: String,
    }

    print_json(&Example {
        pose,
        rig_position: t.rig_position.to_string(),
        rig_rotation: t.rig_rotation.to_string(),
        compass_rotation: t.compass_rotation.to_string(),
        horizon_rotation: t.horizon_rotation.to_string(),
        horizon_position: t.horizon_position.to_string(),
    })
}

fn load_config(path: Option<PathBuf>) -> Result<PresenterConfig, String> {
    let Some(path) = path else {
        return Ok(PresenterConfig::default());
    };
    let json = fs::read_to_string(&path).map_err(|e| format!("read {path:?}: {e}"))?;
    PresenterConfig::from_json_str(&json).map_err(|e| format!("{path:?}: {e}"))
}

fn print_json(value: &impl Serialize) -> Result<(), String> {
    let payload = serde_json::to_string_pretty(value).map_err(|e| format!("json: {e}"))?;
    println!("{payload}");
    Ok(())
}

fn usage() -> String {
    let exe = env::args().next().unwrap_or_else(|| "posesync".to_string());
    format!(
        "Usage:\n  {exe} replay <poses.jsonl> [--config FILE]\n  {exe} example\n\nNotes:\n- Each input line is a JSON object of data-* pose attributes; the first line mounts, the rest update.\n- The config path may also be given via ${CONFIG_ENV}.\n- Set RUST_LOG=debug to trace presenter activity on stderr.\n"
    )
}
