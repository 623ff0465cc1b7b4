use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use log::{debug, error, info};
use raster_select::{
    color_raster, load_image, mask_image, AccumulationPolicy, ApplyMode, ColumnBounds,
    LabelRaster, LabeledImage, RegionAlgorithm, Result, Selectable, Selection, SelectionEngine,
    SelectionSettings, SessionOptions,
};

/// Input rasters and the steps to run on them.
#[derive(serde::Deserialize, Debug)]
struct Script {
    labels: PathBuf,
    colors: Option<PathBuf>,
    output: PathBuf,
    #[serde(default)]
    origin: [f64; 2],
    #[serde(default)]
    columns: Vec<ColumnBounds>,
    #[serde(default)]
    settings: SelectionSettings,
    steps: Vec<Step>,
}

#[derive(serde::Deserialize, Debug)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Step {
    Start {
        #[serde(default)]
        algorithm: RegionAlgorithm,
        #[serde(default)]
        policy: AccumulationPolicy,
    },
    Algorithm {
        algorithm: RegionAlgorithm,
    },
    Policy {
        policy: AccumulationPolicy,
    },
    Settings {
        settings: SelectionSettings,
    },
    Rect {
        start: [f64; 2],
        end: [f64; 2],
    },
    Poly {
        points: Vec<[f64; 2]>,
    },
    SelectAll,
    Invert,
    Clear,
    Expand,
    SelectRight,
    Undo,
    Redo,
    Apply,
    Cancel,
}

fn main() -> ExitCode {
    env_logger::init();
    let Some(path) = std::env::args_os().nth(1) else {
        eprintln!("usage: raster-select <script.json>");
        return ExitCode::from(2);
    };
    match run(Path::new(&path)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(path: &Path) -> Result<()> {
    let script: Script = serde_json::from_slice(&std::fs::read(path)?)?;
    let mut engine = SelectionEngine::with_target(load_target(&script)?);
    engine.set_redraw_callback(|selection| {
        debug!("{} pixels selected", selection.selected_count());
    });

    for step in script.steps {
        debug!("{step:?}");
        let changed = match step {
            Step::Start { algorithm, policy } => {
                let options = SessionOptions::new(algorithm, policy)
                    .with_settings(script.settings)
                    .with_apply_mode(ApplyMode::Keep);
                engine.start_session(options)?;
                continue;
            }
            Step::Algorithm { algorithm } => {
                engine.set_algorithm(algorithm)?;
                continue;
            }
            Step::Policy { policy } => {
                engine.set_policy(policy)?;
                continue;
            }
            Step::Settings { settings } => {
                engine.set_settings(settings)?;
                continue;
            }
            Step::Rect { start, end } => engine.on_rect_select(start, end)?,
            Step::Poly { points } => engine.on_poly_select(points)?,
            Step::SelectAll => engine.select_all()?,
            Step::Invert => engine.invert()?,
            Step::Clear => engine.clear()?,
            Step::Expand => engine.expand()?,
            Step::SelectRight => engine.select_right()?,
            Step::Undo => engine.undo()?,
            Step::Redo => engine.redo()?,
            Step::Apply => {
                engine.apply()?;
                continue;
            }
            Step::Cancel => {
                engine.cancel()?;
                continue;
            }
        };
        if !changed {
            info!("Selection unchanged");
        }
    }

    let mask = match engine.selection() {
        Some(selection) => selection.selected_part(),
        None => engine
            .target()
            .map(|target| Selection::none(target.label_raster()).selected_part())
            .unwrap_or_default(),
    };
    info!(
        "Writing {} selected pixels to {}",
        mask.iter().filter(|&&m| m).count(),
        script.output.display()
    );
    mask_image(mask.view()).save(&script.output)?;
    Ok(())
}

fn load_target(script: &Script) -> Result<LabeledImage> {
    let labels = LabelRaster::from_image(&load_image(&script.labels)?);
    info!(
        "Loaded {} components from {}",
        labels.max_label(),
        script.labels.display()
    );

    let mut target = LabeledImage::new(labels).with_origin(script.origin);
    if let Some(colors) = &script.colors {
        target = target.with_colors(color_raster(&load_image(colors)?))?;
    }
    if !script.columns.is_empty() {
        target = target.with_columns(script.columns.clone());
    }
    Ok(target)
}
