mod cli;
mod paths;
mod run;
mod state;

use anyhow::Result;
use cli::{Command, SettingsAction};
use paths::AppPaths;
use personalization::ViewPersonalizationSettings;
use state::SettingsStore;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    let paths = AppPaths::discover()?;
    let store = SettingsStore::new(
        cli.settings
            .clone()
            .unwrap_or_else(|| paths.settings_file()),
    );
    tracing::debug!(
        config = %paths.config_dir().display(),
        settings = %store.path().display(),
        "resolved curtains paths"
    );

    match cli.command {
        Some(Command::Settings(settings_cmd)) => {
            handle_settings_command(settings_cmd.action, &paths, &store)
        }
        None => run::run(cli.run, &store),
    }
}

fn handle_settings_command(
    action: SettingsAction,
    paths: &AppPaths,
    store: &SettingsStore,
) -> Result<()> {
    match action {
        SettingsAction::Show => {
            let settings = store.load();
            println!("{}", settings.to_json_string_pretty()?);
        }
        SettingsAction::Reset => {
            store.persist(&ViewPersonalizationSettings::default())?;
            println!("Settings reset to defaults at {}", store.path().display());
        }
        SettingsAction::Where => {
            println!("Configuration directories:");
            println!("  config:    {}", paths.config_dir().display());
            println!("  settings:  {}", store.path().display());
            if !store.path().exists() {
                println!("  (settings file not written yet)");
            }
        }
    }
    Ok(())
}
