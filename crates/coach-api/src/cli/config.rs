//! `coach config`: show the resolved configuration.
//!
//! The API key is never printed, only whether one was found.

use console::style;

use coach_infra::config::resolve_api_key_from_env;
use coach_infra::dictation::create_dictation;

use crate::state::AppState;

pub fn show_config(state: &AppState, json: bool) -> anyhow::Result<()> {
    let provider = &state.config.provider;
    let key_found = resolve_api_key_from_env(provider).is_ok();
    let dictation = create_dictation(state.config.dictation.as_ref());

    if json {
        let info = serde_json::json!({
            "data_dir": state.data_dir.display().to_string(),
            "config_path": state.config_path.display().to_string(),
            "config_exists": state.config_path.exists(),
            "provider": provider.kind.to_string(),
            "model": provider.model,
            "base_url": provider.base_url,
            "api_key_env": provider.api_key_env,
            "api_key_found": key_found,
            "temperature": provider.temperature,
            "max_tokens": provider.max_tokens,
            "dictation": state.config.dictation.as_ref().map(|d| d.command.clone()),
            "dictation_available": dictation.is_supported(),
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    let check_mark = |ok: bool| {
        if ok {
            format!("{}", style("✓").green())
        } else {
            format!("{}", style("✗").red())
        }
    };

    println!();
    println!("  {}", style("Configuration").bold());
    println!();
    println!(
        "  {}  {}{}",
        style("Config file:").bold(),
        style(state.config_path.display()).dim(),
        if state.config_path.exists() {
            String::new()
        } else {
            format!(" {}", style("(not found, using defaults)").yellow())
        }
    );
    println!("  {}     {}", style("Provider:").bold(), provider.kind);
    println!("  {}        {}", style("Model:").bold(), provider.model);
    if let Some(base_url) = &provider.base_url {
        println!("  {}     {}", style("Base URL:").bold(), base_url);
    }
    println!(
        "  {}  {:.1} / {} max tokens",
        style("Temperature:").bold(),
        provider.temperature,
        provider.max_tokens
    );
    println!();
    println!(
        "  {} API key ({})",
        check_mark(key_found),
        style(&provider.api_key_env).cyan()
    );
    println!(
        "  {} Dictation{}",
        check_mark(dictation.is_supported()),
        match &state.config.dictation {
            Some(d) => format!(" ({})", style(&d.command).cyan()),
            None => format!(" {}", style("(not configured)").dim()),
        }
    );
    println!();
    Ok(())
}
