use anyhow::Result;

use crate::Context;
use crate::cli::{ConfigCommand, ConnectionArgs};
use crate::config::{FileConfig, Settings, config_path};
use crate::ui;

pub fn run(ctx: &Context, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { connection } => show(ctx, &connection),
        ConfigCommand::Path => path(ctx),
    }
}

fn show(ctx: &Context, connection: &ConnectionArgs) -> Result<()> {
    let path = config_path(ctx.config.as_deref())?;
    let settings = Settings::resolve(connection, FileConfig::load(&path)?);

    ui::header("Configuration");
    if path.exists() {
        ui::kv("Config file", &path.display().to_string());
    } else {
        ui::kv("Config file", &format!("{} (not found)", path.display()));
    }
    println!();
    for (key, value) in describe(&settings) {
        ui::kv(key, &value);
    }
    println!();
    ui::dim("Flags override NDO_* environment variables, which override the config file.");
    Ok(())
}

fn path(ctx: &Context) -> Result<()> {
    println!("{}", config_path(ctx.config.as_deref())?.display());
    Ok(())
}

/// Printable settings with the password masked
fn describe(settings: &Settings) -> Vec<(&'static str, String)> {
    let unset = || "(not set)".to_string();
    vec![
        ("host", settings.host.clone().unwrap_or_else(unset)),
        ("username", settings.username.clone().unwrap_or_else(unset)),
        (
            "password",
            settings
                .password
                .as_ref()
                .map_or_else(unset, |_| "********".to_string()),
        ),
        ("login_domain", settings.login_domain.clone()),
        ("validate_certs", settings.validate_certs.to_string()),
        ("timeout", format!("{}s", settings.timeout.as_secs())),
        (
            "output",
            format!("{:?}", settings.output).to_lowercase(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_masks_password() {
        let file = FileConfig {
            host: Some("nd.local".to_string()),
            password: Some("hunter2".to_string()),
            ..Default::default()
        };
        let settings = Settings::resolve(&ConnectionArgs::default(), file);
        let described = describe(&settings);

        assert!(described.iter().all(|(_, v)| !v.contains("hunter2")));
        assert!(described.contains(&("password", "********".to_string())));
        assert!(described.contains(&("username", "(not set)".to_string())));
        assert!(described.contains(&("timeout", "30s".to_string())));
    }
}
