use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use personalization::{BackgroundStyle, RgbaColor};
use renderer::GpuPowerPreference;

#[derive(Parser, Debug)]
#[command(
    name = "curtains",
    author,
    version,
    about = "Animated gradient curtains with a pulsing halo border",
    arg_required_else_help = false
)]
pub struct Cli {
    /// Settings file to load and save (defaults to `<config dir>/settings.json`).
    #[arg(long, value_name = "FILE", global = true, env = "CURTAINS_SETTINGS")]
    pub settings: Option<PathBuf>,

    #[command(flatten)]
    pub run: RunArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Window size in physical pixels (e.g. `1280x800`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_size, default_value = "1280x800")]
    pub size: (u32, u32),

    /// Named background style (`deep-blue`, `deep-red`, `deep-green`).
    #[arg(long, value_name = "NAME", value_parser = parse_style, conflicts_with = "color")]
    pub style: Option<BackgroundStyle>,

    /// Custom base colour as `R,G,B[,A]` with channels in 0-1.
    #[arg(long, value_name = "R,G,B[,A]", value_parser = parse_color)]
    pub color: Option<RgbaColor>,

    /// Start with the halo border hidden.
    #[arg(long)]
    pub no_halo: bool,

    /// Do not write settings back when the window closes.
    #[arg(long)]
    pub no_save: bool,

    /// Reload the settings file whenever another program edits it.
    #[arg(long)]
    pub watch: bool,

    /// Print the measured frame rate to stdout.
    #[arg(long)]
    pub print_fps: bool,

    /// GPU adapter preference.
    #[arg(long, value_enum, default_value_t = PowerArg::Low)]
    pub gpu_power: PowerArg,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PowerArg {
    Low,
    High,
}

impl From<PowerArg> for GpuPowerPreference {
    fn from(value: PowerArg) -> Self {
        match value {
            PowerArg::Low => GpuPowerPreference::Low,
            PowerArg::High => GpuPowerPreference::High,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Inspect or reset the persisted settings without opening a window.
    Settings(SettingsCommand),
}

#[derive(Parser, Debug)]
pub struct SettingsCommand {
    #[command(subcommand)]
    pub action: SettingsAction,
}

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Print the effective settings as JSON.
    Show,
    /// Overwrite the settings file with defaults.
    Reset,
    /// Print the resolved config directory and settings file.
    Where,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let (w, h) = value
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("invalid size '{value}'; expected WIDTHxHEIGHT"))?;
    let width: u32 = w
        .trim()
        .parse()
        .map_err(|_| format!("invalid width '{w}'"))?;
    let height: u32 = h
        .trim()
        .parse()
        .map_err(|_| format!("invalid height '{h}'"))?;
    if width == 0 || height == 0 {
        return Err("size must be non-zero".to_string());
    }
    Ok((width, height))
}

pub fn parse_style(value: &str) -> Result<BackgroundStyle, String> {
    value.parse().map_err(|_| {
        let names: Vec<&str> = BackgroundStyle::all().iter().map(|style| style.id()).collect();
        format!("unknown style '{value}'; expected one of {}", names.join(", "))
    })
}

pub fn parse_color(value: &str) -> Result<RgbaColor, String> {
    let channels = value
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|_| format!("invalid colour channel '{}'", part.trim()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if channels.iter().any(|channel| !channel.is_finite()) {
        return Err("colour channels must be finite".to_string());
    }
    match channels.as_slice() {
        [r, g, b] => Ok(RgbaColor::new(*r, *g, *b, 1.0)),
        [r, g, b, a] => Ok(RgbaColor::new(*r, *g, *b, *a)),
        _ => Err(format!(
            "expected 3 or 4 comma-separated channels, got {}",
            channels.len()
        )),
    }
}
