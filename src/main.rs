use clap::Parser;
use std::path::PathBuf;

use gesture_recorder::camera::{self, CameraCapture, CameraSettings};
use gesture_recorder::cli::{Args, Command, ConfigAction};
use gesture_recorder::config::{self, Config};
use gesture_recorder::dataset::{assemble, prepare_folders, DatasetLayout, LabelMap};
use gesture_recorder::detector::SubprocessDetector;
use gesture_recorder::hotkeys::{key_from_name, KeyListener};
use gesture_recorder::keypoints::KEYPOINT_LEN;
use gesture_recorder::session::{self, SessionOptions};

fn main() {
    env_logger::init();

    let args = Args::parse();

    // If --config is specified, require the file to exist (except for
    // `config init`, which creates it); otherwise fall back to defaults
    // when no config file is present.
    let managing_config = matches!(args.command, Command::Config { .. });
    if let Some(ref path) = args.config {
        if !managing_config && !path.exists() {
            eprintln!("Error: config file '{}' does not exist", path.display());
            std::process::exit(1);
        }
    }
    let cfg = match Config::load(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match args.command {
        Command::ListCameras => run_list_cameras(),
        Command::Prepare { actions, sequences } => {
            run_prepare(&cfg, args.data_path, actions, sequences)
        }
        Command::Record {
            action,
            sequence,
            frames,
            camera,
            mirror,
            no_save_frames,
            trigger_key,
            quit_key,
            detector,
        } => run_record(
            &cfg,
            args.data_path,
            RecordArgs {
                action,
                sequence,
                frames,
                camera,
                mirror,
                no_save_frames,
                trigger_key,
                quit_key,
                detector,
            },
        ),
        Command::Assemble {
            actions,
            sequences,
            frames,
        } => run_assemble(&cfg, args.data_path, actions, sequences, frames),
        Command::Config { action } => run_config(args.config.as_deref(), action),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Record subcommand options, as parsed from the CLI.
struct RecordArgs {
    action: String,
    sequence: usize,
    frames: Option<usize>,
    camera: Option<u32>,
    mirror: bool,
    no_save_frames: bool,
    trigger_key: Option<String>,
    quit_key: Option<String>,
    detector: Option<String>,
}

fn run_list_cameras() -> Result<(), String> {
    let devices = camera::list_devices().map_err(|e| e.to_string())?;
    if devices.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }
    println!("Available cameras:");
    for device in &devices {
        println!("  {}", device);
    }
    Ok(())
}

/// Resolve the dataset layout: CLI --data-path > config > built-in default.
fn resolve_layout(cfg: &Config, data_path: Option<PathBuf>) -> DatasetLayout {
    DatasetLayout::new(data_path.unwrap_or_else(|| cfg.dataset.root.clone()))
}

/// Resolve the action list: CLI > config. Errors when neither names any.
fn resolve_actions(cfg: &Config, cli_actions: Vec<String>) -> Result<Vec<String>, String> {
    let actions = if cli_actions.is_empty() {
        cfg.dataset.actions.clone()
    } else {
        cli_actions
    };
    if actions.is_empty() {
        return Err(
            "no actions specified. Pass --actions or set dataset.actions in the config file"
                .to_string(),
        );
    }
    Ok(actions)
}

fn run_prepare(
    cfg: &Config,
    data_path: Option<PathBuf>,
    cli_actions: Vec<String>,
    sequences: Option<usize>,
) -> Result<(), String> {
    let layout = resolve_layout(cfg, data_path);
    let actions = resolve_actions(cfg, cli_actions)?;
    let no_sequences = sequences.unwrap_or(cfg.dataset.sequences);

    prepare_folders(&layout, &actions, no_sequences).map_err(|e| e.to_string())?;

    println!(
        "Prepared {} folders under {} ({} actions x {} sequences)",
        actions.len() * no_sequences,
        layout.root().display(),
        actions.len(),
        no_sequences
    );
    Ok(())
}

fn run_record(
    cfg: &Config,
    data_path: Option<PathBuf>,
    rec: RecordArgs,
) -> Result<(), String> {
    let layout = resolve_layout(cfg, data_path);

    // Merge settings: CLI args > config file > built-in defaults
    let settings = CameraSettings {
        device_index: rec.camera.unwrap_or(cfg.camera.device),
        mirror: rec.mirror || cfg.camera.mirror,
        ..CameraSettings::default()
    };
    let trigger_name = rec
        .trigger_key
        .unwrap_or_else(|| cfg.capture.trigger_key.clone());
    let quit_name = rec.quit_key.unwrap_or_else(|| cfg.capture.quit_key.clone());

    let trigger_key = key_from_name(&trigger_name)
        .ok_or_else(|| format!("unknown trigger key '{}'", trigger_name))?;
    let quit_key =
        key_from_name(&quit_name).ok_or_else(|| format!("unknown quit key '{}'", quit_name))?;

    let detector_command = rec
        .detector
        .or_else(|| cfg.detector.command.clone())
        .ok_or_else(|| {
            "no hand landmark detector configured.\n\n\
             Pass --detector <command> or set detector.command in the config file.\n\
             The command must speak the frame-in, JSON-line-out detector protocol."
                .to_string()
        })?;

    let options = SessionOptions {
        action: rec.action,
        start_sequence: rec.sequence,
        sequence_length: rec.frames.unwrap_or(cfg.dataset.frames),
        save_frames: !rec.no_save_frames && cfg.capture.save_frames,
        ..SessionOptions::default()
    };

    let mut detector = SubprocessDetector::spawn(&detector_command, &cfg.detector.args)
        .map_err(|e| e.to_string())?;

    let mut camera = CameraCapture::open(settings).map_err(|e| e.to_string())?;
    camera.start().map_err(|e| e.to_string())?;

    if let Err(e) = session::setup_interrupt_handler() {
        eprintln!("Warning: Could not set up Ctrl+C handler: {}", e);
    }

    let mut keys = KeyListener::new(trigger_key, quit_key);
    keys.start()?;

    print_session_status(&options, &camera, &trigger_name, &quit_name);

    let outcome = session::run(&mut camera, &mut detector, &keys, &layout, &options)
        .map_err(|e| e.to_string())?;

    camera.stop();
    keys.stop();

    println!(
        "Recorded {} sequence(s). Next free sequence index: {}",
        outcome.sequences_recorded, outcome.next_sequence
    );
    Ok(())
}

/// Display formatted startup status showing current settings.
fn print_session_status(
    options: &SessionOptions,
    camera: &CameraCapture,
    trigger_name: &str,
    quit_name: &str,
) {
    let resolution = camera
        .actual_resolution()
        .map(|r| format!("{}x{}", r.width, r.height))
        .unwrap_or_else(|| "unknown".to_string());

    println!();
    println!("Recording action '{}'", options.action);
    println!("  Camera:     device {} ({})", camera.settings().device_index, resolution);
    println!("  Frames:     {} per sequence", options.sequence_length);
    println!("  Starting:   sequence {}", options.start_sequence);
    println!(
        "  Frame dump: {}",
        if options.save_frames { "on" } else { "off" }
    );
    println!();
    println!("  Press '{}' to record one sequence", trigger_name);
    println!("  Press '{}' or Ctrl+C to finish", quit_name);
    println!();
}

fn run_assemble(
    cfg: &Config,
    data_path: Option<PathBuf>,
    cli_actions: Vec<String>,
    sequences: Option<usize>,
    frames: Option<usize>,
) -> Result<(), String> {
    let layout = resolve_layout(cfg, data_path);
    let actions = resolve_actions(cfg, cli_actions)?;
    let no_sequences = sequences.unwrap_or(cfg.dataset.sequences);
    let sequence_length = frames.unwrap_or(cfg.dataset.frames);

    let label_map = LabelMap::from_actions(&actions);
    let dataset =
        assemble(&layout, &label_map, no_sequences, sequence_length).map_err(|e| e.to_string())?;

    println!(
        "Assembled {} samples from {}",
        dataset.len(),
        layout.root().display()
    );
    println!("  Window shape: ({}, {})", sequence_length, KEYPOINT_LEN);
    for (index, action) in label_map.actions().iter().enumerate() {
        let count = dataset.labels.iter().filter(|&&l| l == index).count();
        println!("  [{}] {}: {} samples", index, action, count);
    }
    Ok(())
}

fn run_config(config_path: Option<&std::path::Path>, action: ConfigAction) -> Result<(), String> {
    match action {
        ConfigAction::Show => {
            let path = config_path
                .map(PathBuf::from)
                .unwrap_or_else(config::default_path);
            println!("Config file: {}", path.display());
            if path.exists() {
                let content = std::fs::read_to_string(&path)
                    .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
                println!("{}", content);
            } else {
                println!("(not present, using built-in defaults)");
            }
            Ok(())
        }
        ConfigAction::Init => {
            let path = config_path
                .map(PathBuf::from)
                .unwrap_or_else(config::default_path);
            if path.exists() {
                return Err(format!(
                    "config file '{}' already exists, not overwriting",
                    path.display()
                ));
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| format!("Failed to create '{}': {}", parent.display(), e))?;
            }
            std::fs::write(&path, Config::default_toml())
                .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))?;
            println!("Created {}", path.display());
            Ok(())
        }
    }
}
