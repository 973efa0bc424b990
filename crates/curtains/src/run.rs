use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use personalization::ViewPersonalizationSettings;
use renderer::{Renderer, RendererConfig, SettingsFeed, SettingsPublisher};
use tracing_subscriber::EnvFilter;

use crate::cli::RunArgs;
use crate::state::SettingsStore;

const WATCH_INTERVAL: Duration = Duration::from_millis(250);

pub fn run(args: RunArgs, store: &SettingsStore) -> Result<()> {
    let mut settings = store.load();
    apply_overrides(&mut settings, &args);
    tracing::info!(
        settings = %store.path().display(),
        style = ?settings.background.style,
        halo = settings.halo.is_visible,
        "starting curtains preview"
    );

    let (publisher, feed) = SettingsFeed::new();
    if args.watch {
        spawn_settings_watcher(store.clone(), settings.clone(), publisher)?;
    }

    let fps_listener = if args.print_fps {
        let (tx, rx) = crossbeam_channel::unbounded::<f64>();
        thread::Builder::new()
            .name("curtains-fps".into())
            .spawn(move || {
                for fps in rx {
                    println!("fps: {fps:.1}");
                }
            })
            .context("failed to spawn fps printer")?;
        Some(tx)
    } else {
        None
    };

    let config = RendererConfig {
        surface_size: args.size,
        initial_settings: settings,
        settings: feed,
        fps_listener,
        power_preference: args.gpu_power.into(),
        ..RendererConfig::default()
    };
    let final_settings = Renderer::new(config)
        .run()
        .context("preview window failed")?;

    if args.no_save {
        tracing::debug!("--no-save given; leaving stored settings untouched");
    } else if let Err(err) = store.persist(&final_settings) {
        tracing::warn!(error = %err, "failed to save settings");
    } else {
        tracing::debug!(path = %store.path().display(), "settings saved");
    }
    Ok(())
}

/// CLI flags win over whatever was stored.
fn apply_overrides(settings: &mut ViewPersonalizationSettings, args: &RunArgs) {
    if let Some(color) = args.color {
        settings.background.custom_color = color;
        settings.background.style = None;
    }
    if let Some(style) = args.style {
        settings.background.style = Some(style);
    }
    if args.no_halo {
        settings.halo.is_visible = false;
    }
}

/// Polls the settings file and publishes a fresh snapshot after every edit.
/// Malformed edits keep the last good snapshot.
fn spawn_settings_watcher(
    store: SettingsStore,
    initial: ViewPersonalizationSettings,
    publisher: SettingsPublisher,
) -> Result<()> {
    thread::Builder::new()
        .name("curtains-settings-watch".into())
        .spawn(move || {
            let mut last_seen = store.modified();
            let mut current = initial;
            loop {
                thread::sleep(WATCH_INTERVAL);
                let modified = store.modified();
                if modified.is_none() || modified == last_seen {
                    continue;
                }
                last_seen = modified;
                let next = store.load_or_keep(current.clone());
                if next == current {
                    continue;
                }
                tracing::info!(path = %store.path().display(), "settings file changed; reloading");
                current = next.clone();
                if !publisher.publish(next) {
                    break;
                }
            }
        })
        .context("failed to spawn settings watcher")?;
    Ok(())
}

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;
    use personalization::{BackgroundStyle, RgbaColor};

    fn args(flags: &[&str]) -> RunArgs {
        let mut argv = vec!["curtains"];
        argv.extend_from_slice(flags);
        Cli::try_parse_from(argv).unwrap().run
    }

    #[test]
    fn color_override_clears_stored_style() {
        let mut settings = ViewPersonalizationSettings::default();
        settings.background.style = Some(BackgroundStyle::DeepRed);
        apply_overrides(&mut settings, &args(&["--color", "1,0.5,0"]));
        assert_eq!(settings.background.style, None);
        assert_eq!(
            settings.background.custom_color,
            RgbaColor::new(1.0, 0.5, 0.0, 1.0)
        );
    }

    #[test]
    fn style_and_halo_overrides_apply() {
        let mut settings = ViewPersonalizationSettings::default();
        apply_overrides(&mut settings, &args(&["--style", "green", "--no-halo"]));
        assert_eq!(settings.background.style, Some(BackgroundStyle::DeepGreen));
        assert!(!settings.halo.is_visible);
    }

    #[test]
    fn no_flags_leave_settings_alone() {
        let mut settings = ViewPersonalizationSettings::default();
        settings.halo.corner_radius = 12.0;
        let before = settings.clone();
        apply_overrides(&mut settings, &args(&[]));
        assert_eq!(settings, before);
    }
}
