//! Command execution: one page session per invocation.

use crate::cli::{Cli, Command};
use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::script::load_script;
use kurbo::{Rect, Size};
use scribble_core::render::parse_css_color;
use scribble_core::page::KEY_PREFIX;
use scribble_core::{
    FileStorage, FlushOutcome, PageKey, ScribbleSession, Storage, Stroke, Surface,
};
use scribble_render::RasterSurface;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

type PageSession = ScribbleSession<FileStorage, RasterSurface>;

/// Run a parsed command line, writing the report to `out`.
pub fn run<W: Write>(cli: Cli, out: &mut W) -> AppResult<()> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let storage = Arc::new(open_storage(cli.store, &config)?);

    match cli.command {
        Command::Show { url } => run_show(&storage, &config, &url, out),
        Command::Replay { url, script } => run_replay(&storage, &config, &url, &script, out),
        Command::Export {
            url,
            out: path,
            width,
            height,
        } => {
            let size = width.zip(height).map(|(w, h)| Size::new(w as f64, h as f64));
            run_export(&storage, &config, &url, path, size, out)
        }
        Command::List => run_list(&storage, out),
        Command::Clear { url } => run_clear(&storage, &config, &url, out),
    }
}

fn open_storage(store: Option<PathBuf>, config: &AppConfig) -> AppResult<FileStorage> {
    let storage = match store.or_else(|| config.store_dir.clone()) {
        Some(dir) => FileStorage::new(dir)?,
        None => FileStorage::default_location()?,
    };
    log::debug!("Using annotation store at {:?}", storage.base_path());
    Ok(storage)
}

/// Open the session for `url` and wait for its annotations to load.
fn open_session(storage: &Arc<FileStorage>, config: &AppConfig, url: &str) -> AppResult<PageSession> {
    let key = PageKey::from_url(url)?;
    let mut surface = RasterSurface::new(0, 0).with_max_dimension(config.max_surface_px);
    if let Some(color) = config.background.as_deref() {
        match parse_css_color(color) {
            Some(color) => surface = surface.with_background(color),
            None => log::warn!("Ignoring unrecognized background color {:?}", color),
        }
    }
    surface.resize(Size::new(
        config.surface_width as f64,
        config.surface_height as f64,
    ))?;
    let mut session = ScribbleSession::new(config.session.clone(), key, Arc::clone(storage), surface);
    pollster::block_on(session.load());
    Ok(session)
}

fn flush(session: &mut PageSession) -> AppResult<()> {
    match pollster::block_on(session.flush()) {
        FlushOutcome::Dropped => Err(AppError::PersistDropped(session.key().to_string())),
        FlushOutcome::Idle | FlushOutcome::Written => Ok(()),
    }
}

fn report<W: Write>(out: &mut W, line: std::fmt::Arguments<'_>) -> AppResult<()> {
    writeln!(out, "{}", line).map_err(|source| AppError::Io {
        path: PathBuf::from("<stdout>"),
        source,
    })
}

fn run_show<W: Write>(
    storage: &Arc<FileStorage>,
    config: &AppConfig,
    url: &str,
    out: &mut W,
) -> AppResult<()> {
    let session = open_session(storage, config, url)?;
    let store = session.store();
    report(
        out,
        format_args!(
            "{}: {} strokes, {} points",
            session.key(),
            store.len(),
            store.point_count()
        ),
    )
}

fn run_replay<W: Write>(
    storage: &Arc<FileStorage>,
    config: &AppConfig,
    url: &str,
    script: &Path,
    out: &mut W,
) -> AppResult<()> {
    let steps = load_script(script)?;
    let mut session = open_session(storage, config, url)?;

    let mut changes = 0;
    for step in &steps {
        if step.apply(&mut session)? {
            changes += 1;
        }
    }
    flush(&mut session)?;

    log::info!("Replayed {} steps against {}", steps.len(), session.key());
    report(
        out,
        format_args!(
            "{}: replayed {} steps ({} changes), {} strokes",
            session.key(),
            steps.len(),
            changes,
            session.strokes().len()
        ),
    )
}

fn run_export<W: Write>(
    storage: &Arc<FileStorage>,
    config: &AppConfig,
    url: &str,
    path: Option<PathBuf>,
    size: Option<Size>,
    out: &mut W,
) -> AppResult<()> {
    let mut session = open_session(storage, config, url)?;
    let fallback = Size::new(config.surface_width as f64, config.surface_height as f64);
    let size = size.unwrap_or_else(|| fit_strokes(session.strokes(), fallback));
    session.resize(size)?;

    let image = session.export()?;
    let path = path.unwrap_or_else(|| PathBuf::from(&image.file_name));
    fs::write(&path, &image.bytes).map_err(|source| AppError::Io {
        path: path.clone(),
        source,
    })?;

    report(
        out,
        format_args!(
            "{}: wrote {} ({}x{})",
            session.key(),
            path.display(),
            size.width,
            size.height
        ),
    )
}

fn run_clear<W: Write>(
    storage: &Arc<FileStorage>,
    config: &AppConfig,
    url: &str,
    out: &mut W,
) -> AppResult<()> {
    let mut session = open_session(storage, config, url)?;
    let count = session.strokes().len();
    session.clear();
    flush(&mut session)?;
    report(out, format_args!("{}: cleared {} strokes", session.key(), count))
}

fn run_list<W: Write>(storage: &Arc<FileStorage>, out: &mut W) -> AppResult<()> {
    let mut keys: Vec<String> = pollster::block_on(storage.keys())?
        .into_iter()
        .filter(|key| key.starts_with(KEY_PREFIX))
        .collect();
    keys.sort();
    for key in &keys {
        report(out, format_args!("{}", key))?;
    }
    Ok(())
}

/// Surface size covering every stroke from the document origin, with room
/// for the widest line. Empty pages use `fallback`.
pub fn fit_strokes(strokes: &[Stroke], fallback: Size) -> Size {
    let bounds = strokes
        .iter()
        .filter_map(Stroke::bounds)
        .reduce(|acc, rect| acc.union(rect));
    let Some(bounds) = bounds else {
        return fallback;
    };
    let margin = strokes.iter().map(|s| s.width).fold(0.0, f64::max);
    let extent = Rect::new(0.0, 0.0, bounds.x1 + margin, bounds.y1 + margin);
    Size::new(extent.width().ceil().max(1.0), extent.height().ceil().max(1.0))
}
