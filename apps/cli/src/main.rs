#![deny(warnings)]

//! Headless driver: runs the economy engine on a fixed cadence with a
//! scripted player, then prints a progression summary.
//!
//! The driver clicks every tick, buys greedily whatever it can afford,
//! and takes a career change the moment the gate opens — a crude but
//! useful smoke test of the whole progression loop.

use anyhow::Result;
use game_state::{GameConfig, GameState};
use persistence::{FileStore, SaveManager};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

struct Args {
    ticks: u64,
    clicks_per_tick: u32,
    seed: u64,
    save_dir: Option<String>,
}

fn parse_args() -> Args {
    let mut args = Args {
        ticks: 600,
        clicks_per_tick: 4,
        seed: 42,
        save_dir: None,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--ticks" => {
                if let Some(v) = it.next().and_then(|s| s.parse().ok()) {
                    args.ticks = v;
                }
            }
            "--clicks-per-tick" => {
                if let Some(v) = it.next().and_then(|s| s.parse().ok()) {
                    args.clicks_per_tick = v;
                }
            }
            "--seed" => {
                if let Some(v) = it.next().and_then(|s| s.parse().ok()) {
                    args.seed = v;
                }
            }
            "--save-dir" => args.save_dir = it.next(),
            _ => {}
        }
    }
    args
}

/// Buy whatever is affordable, cheapest producers first, then any
/// unlocked upgrade.
fn greedy_purchases(state: &mut GameState, now_ms: i64) {
    loop {
        let affordable: Option<String> = state
            .producer_info()
            .into_iter()
            .filter(|p| p.unlocked && p.can_afford)
            .min_by(|a, b| a.cost.cmp(&b.cost))
            .map(|p| p.id);
        match affordable {
            Some(id) => {
                let _ = state.purchase_producer(&id, now_ms);
            }
            None => break,
        }
    }
    let purchasable: Vec<String> = state
        .upgrade_info()
        .into_iter()
        .filter(|u| u.unlocked && !u.purchased && u.can_afford)
        .map(|u| u.id)
        .collect();
    for id in purchasable {
        let _ = state.purchase_upgrade(&id, now_ms);
    }
}

fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .init();

    let args = parse_args();
    info!(ticks = args.ticks, seed = args.seed, "starting driver");

    let mut now_ms = chrono::Utc::now().timestamp_millis();
    let mut state = GameState::new(
        GameConfig {
            rng_seed: args.seed,
            ..GameConfig::default()
        },
        now_ms,
    );

    let mut manager = args
        .save_dir
        .as_ref()
        .map(|dir| SaveManager::new(FileStore::new(dir)));
    if let Some(manager) = manager.as_mut() {
        match manager.load(&mut state, now_ms)? {
            Some(source) => info!(?source, "loaded existing save"),
            None => info!("no existing save, starting fresh"),
        }
    }

    let dt_ms: u64 = 1000;
    let mut career_changes = 0u32;
    for _ in 0..args.ticks {
        now_ms += dt_ms as i64;
        for _ in 0..args.clicks_per_tick {
            state.click(now_ms);
        }
        greedy_purchases(&mut state, now_ms);
        if state.prestige.can_prestige(state.total_resumes) {
            let outcome = state.perform_prestige(now_ms)?;
            career_changes += 1;
            info!(
                level = outcome.new_level,
                experience = %outcome.experience_gained,
                "career change"
            );
        }
        let outcome = state.update(now_ms, dt_ms);
        if let Some(event) = outcome.event {
            info!(id = %event.id, title = %event.title, "event");
        }
        for id in outcome.unlocked_achievements {
            info!(id = %id, "achievement");
        }
    }

    let summary = state.summary();
    println!(
        "Run complete | resumes: {} | lifetime: {} | rate: {}/s | click: {}",
        summary.formatted_resumes,
        summary.formatted_total_resumes,
        summary.formatted_rate,
        summary.formatted_click_power
    );
    let prestige = state.prestige_info();
    println!(
        "Prestige | level: {} | career changes: {} | experience: {} | next gate: {}",
        prestige.level, career_changes, prestige.formatted_experience, prestige.formatted_requirement
    );
    for producer in state.producer_info() {
        if producer.owned > 0 {
            println!(
                "  {} {} x{} ({}/s)",
                producer.icon, producer.name, producer.owned, producer.formatted_production_rate
            );
        }
    }
    let purchased: Vec<String> = state
        .upgrade_info()
        .into_iter()
        .filter(|u| u.purchased)
        .map(|u| u.name)
        .collect();
    if !purchased.is_empty() {
        println!("  upgrades: {}", purchased.join(", "));
    }

    if let Some(manager) = manager.as_mut() {
        manager.save(&state)?;
        info!("state saved");
    }
    Ok(())
}
