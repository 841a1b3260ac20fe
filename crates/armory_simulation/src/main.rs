//! Headless armory simulation
//!
//! Гоняет seeded soak (случайные equip/select/trigger intents) и проверяет
//! инварианты hotbar'а каждый тик.
//!
//! Usage: `armory_simulation [seed] [ticks] [config.json]`

use armory_simulation::harness::run_soak;
use armory_simulation::logger::set_log_level;
use armory_simulation::{init_logger, log_error, log_info, ArmoryConfig, LogLevel};

fn main() {
    init_logger();
    // Per-trigger debug строки только мешают на длинном прогоне
    set_log_level(LogLevel::Info);

    let args: Vec<String> = std::env::args().collect();
    let seed = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(42);
    let ticks = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(10_000);

    let config = match args.get(3) {
        Some(path) => match std::fs::read_to_string(path).map_err(|e| e.to_string()).and_then(|json| {
            ArmoryConfig::from_json(&json).map_err(|e| e.to_string())
        }) {
            Ok(config) => config,
            Err(err) => {
                log_error(&format!("Failed to load config '{}': {}", path, err));
                std::process::exit(2);
            }
        },
        None => ArmoryConfig::default(),
    };

    log_info(&format!(
        "Starting armory soak (seed: {}, ticks: {}, slots: {})",
        seed, ticks, config.slot_count
    ));

    match run_soak(seed, ticks, &config) {
        Ok(summary) => {
            log_info(&format!(
                "Soak complete: {} intents, {} accepted / {} rejected triggers, {} windows closed, {} meter reports, {} save roundtrips",
                summary.intents_sent,
                summary.triggers_accepted,
                summary.triggers_rejected,
                summary.windows_closed,
                summary.cooldown_reports,
                summary.save_roundtrips
            ));
        }
        Err(err) => {
            log_error(&format!("Soak failed: {}", err));
            std::process::exit(1);
        }
    }
}
