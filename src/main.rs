//! gridboard - inspect the layout catalog and stored dashboard state.

use clap::{Parser, Subcommand, ValueEnum};
use gridboard::catalog::{GridLayout, LayoutCatalog, SplitDirection};
use gridboard::config::ResolvedConfig;
use gridboard::floating::{resize, ResizeHandle};
use gridboard::grid_size::GridSizeTracker;
use gridboard::logging::LogTarget;
use gridboard::model::{CanvasSize, Position, Rect, TemplateId};
use gridboard::positioning::peek_widgets;
use gridboard::store::FileStore;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Dashboard layout engine - catalog and stored-state inspector
#[derive(Parser, Debug)]
#[command(name = "gridboard")]
#[command(version)]
#[command(about = "Inspect dashboard layouts, grid sizes and floating widgets")]
pub struct Args {
    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory of the local store (overrides config and GRIDBOARD_STORE_DIR)
    #[arg(long, global = true)]
    pub store_dir: Option<PathBuf>,

    /// Path to the log file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Log to stderr instead of the log file
    #[arg(long, global = true)]
    pub log_stderr: bool,

    #[allow(missing_docs)]
    #[command(subcommand)]
    pub command: Command,
}

/// Inspection commands.
#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// List catalog layouts
    Layouts {
        /// Only layouts with this many cells
        #[arg(long)]
        cells: Option<usize>,
    },
    /// Print one layout as JSON (by id or display name)
    Layout {
        /// Layout id or name
        layout: String,
    },
    /// Check every catalog invariant
    Validate,
    /// Print the stored cell percentages of a template
    Sizes {
        /// Template id
        template: String,
        /// Layout the template uses
        #[arg(long)]
        layout: String,
    },
    /// List the floating widgets stored for a template
    Widgets {
        /// Template id
        template: String,
    },
    /// Compute a resize with the configured minimum size
    Resize {
        /// Handle being dragged
        #[arg(long, value_enum)]
        handle: HandleArg,
        /// Starting geometry as x,y,width,height
        #[arg(long, value_parser = parse_rect)]
        rect: Rect,
        /// Pointer delta x
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        dx: f64,
        /// Pointer delta y
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        dy: f64,
        /// Canvas size as WIDTHxHEIGHT
        #[arg(long, value_parser = parse_canvas)]
        canvas: CanvasSize,
    },
}

/// Resize handle names accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleArg {
    /// Top edge
    N,
    /// Bottom edge
    S,
    /// Right edge
    E,
    /// Left edge
    W,
    /// Top-right corner
    Ne,
    /// Top-left corner
    Nw,
    /// Bottom-right corner
    Se,
    /// Bottom-left corner
    Sw,
}

impl From<HandleArg> for ResizeHandle {
    fn from(arg: HandleArg) -> Self {
        match arg {
            HandleArg::N => ResizeHandle::N,
            HandleArg::S => ResizeHandle::S,
            HandleArg::E => ResizeHandle::E,
            HandleArg::W => ResizeHandle::W,
            HandleArg::Ne => ResizeHandle::NE,
            HandleArg::Nw => ResizeHandle::NW,
            HandleArg::Se => ResizeHandle::SE,
            HandleArg::Sw => ResizeHandle::SW,
        }
    }
}

fn parse_rect(raw: &str) -> Result<Rect, String> {
    let parts: Vec<f64> = raw
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("invalid number in {raw:?}: {e}"))?;
    match parts.as_slice() {
        [x, y, width, height] => Ok(Rect::new(*x, *y, *width, *height)),
        _ => Err(format!("expected x,y,width,height, got {raw:?}")),
    }
}

fn parse_canvas(raw: &str) -> Result<CanvasSize, String> {
    let (w, h) = raw
        .split_once('x')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {raw:?}"))?;
    let width: f64 = w.trim().parse().map_err(|e| format!("invalid width: {e}"))?;
    let height: f64 = h.trim().parse().map_err(|e| format!("invalid height: {e}"))?;
    CanvasSize::measured(width, height)
        .ok_or_else(|| format!("canvas must be positive and finite, got {raw:?}"))
}

#[derive(Serialize)]
struct LayoutReport<'a> {
    #[serde(flatten)]
    layout: &'a GridLayout,
    free_floating: bool,
    orientation: SplitDirection,
    default_percentages: Vec<f64>,
}

fn run(
    command: Command,
    config: &ResolvedConfig,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = LayoutCatalog::builtin();

    match command {
        Command::Layouts { cells } => {
            let layouts: Vec<&GridLayout> = match cells {
                Some(cells) => catalog.list_layouts_with_cells(cells),
                None => catalog.list_layouts().iter().collect(),
            };
            for layout in layouts {
                writeln!(out, "{}\t{}\t{}", layout.id, layout.cells, layout.name)?;
            }
        }
        Command::Layout { layout } => {
            let found = match catalog.get_layout(&layout) {
                Some(found) => found,
                None => catalog
                    .get_layout_by_name(&layout)
                    .ok_or_else(|| gridboard::model::LayoutError::UnknownLayout(layout.clone()))?,
            };
            let report = LayoutReport {
                layout: found,
                free_floating: found.is_free_floating(),
                orientation: found.orientation(),
                default_percentages: found.default_percentages(),
            };
            writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        }
        Command::Validate => {
            catalog.validate()?;
            writeln!(out, "{} layouts OK", catalog.list_layouts().len())?;
        }
        Command::Sizes { template, layout } => {
            let template_id = TemplateId::new(template)?;
            catalog.require_layout(&layout)?;
            let mut tracker = GridSizeTracker::new(Box::new(FileStore::new(&config.store_dir)));
            let percentages = tracker.activate(&template_id, &layout);
            writeln!(out, "{}", serde_json::to_string(&percentages)?)?;
        }
        Command::Widgets { template } => {
            let template_id = TemplateId::new(template)?;
            let store = FileStore::new(&config.store_dir);
            let now = chrono::Utc::now().timestamp_millis();
            for widget in peek_widgets(&store, &template_id, now) {
                writeln!(
                    out,
                    "{}\t{}\t{},{},{},{}",
                    widget.id,
                    widget.widget_id,
                    widget.position.x,
                    widget.position.y,
                    widget.size.width,
                    widget.size.height
                )?;
            }
        }
        Command::Resize {
            handle,
            rect,
            dx,
            dy,
            canvas,
        } => {
            let next = resize(rect, Position::new(dx, dy), handle.into(), canvas, config.limits);
            writeln!(
                out,
                "{},{},{},{}",
                next.position.x, next.position.y, next.size.width, next.size.height
            )?;
        }
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = gridboard::config::resolve(
        args.config.clone(),
        args.store_dir.clone(),
        args.log_file.clone(),
    )?;

    let target = if args.log_stderr {
        LogTarget::Stderr
    } else {
        LogTarget::File(config.log_file_path.clone())
    };
    gridboard::logging::init_target(&target)?;

    info!(config = ?config, command = ?args.command, "Starting gridboard");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(args.command, &config, &mut out)
}
