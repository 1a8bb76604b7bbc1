//! Relicforge - Entry Point
//!
//! Rolls a batch of loot from the command line and walks the first piece
//! through identification.
//!
//! Usage: relicforge [table_id] [floor] [quantity] [seed] [--content DIR]

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use relicforge::data::{registry_from_dir, EngineConfig};
use relicforge::items::Modifier;
use relicforge::progression::{IdentificationEvent, StartOutcome};
use relicforge::{DefinitionRegistry, EquipmentInstance, LootGenerator, Player, Roster, IdentificationScheduler};

/// Safety cap on the identification loop
const MAX_TICKS: u32 = 1_000;

#[derive(Parser)]
#[command(name = "relicforge")]
#[command(about = "Roll loot from a table and identify the first piece", long_about = None)]
struct Cli {
    /// Loot table to roll from
    #[arg(default_value = "dungeon_common")]
    table_id: String,

    /// Dungeon floor (depth)
    #[arg(default_value_t = 1)]
    floor: u32,

    /// Number of draws
    #[arg(default_value_t = 5)]
    quantity: u32,

    /// RNG seed; random when omitted
    seed: Option<u64>,

    /// Directory holding items.ron, loot_tables.ron and modifiers.ron
    #[arg(long, env = "RELICFORGE_CONTENT")]
    content: Option<PathBuf>,
}

fn print_item(item: &EquipmentInstance) {
    let stats: Vec<String> = item
        .final_stats()
        .iter()
        .map(|(stat, value)| format!("{} {:.1}", stat, value))
        .collect();
    let count = if item.count() > 1 {
        format!(" x{}", item.count())
    } else {
        String::new()
    };

    println!("#{} {}{} [{}]", item.id(), item.display_name(), count, item.rarity().name());
    println!("    stats: {}", stats.join(", "));

    let mut revealed = item.clone();
    revealed.identify(&Player::new(0, "Appraiser", 10));
    if revealed.modifier_count() > 0 {
        println!("    really: {}", revealed.display_name());
        for modifier in revealed.visible_modifiers() {
            let tag = match &modifier {
                Modifier::Curse(c) if c.hidden => " (hidden)",
                _ => "",
            };
            println!("      - {}{}", modifier.description(), tag);
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Relicforge v{}", env!("CARGO_PKG_VERSION"));

    let args = Cli::parse();
    let seed = args.seed.unwrap_or_else(rand::random);
    let config = EngineConfig::load_or_default();

    let registry = match &args.content {
        Some(dir) => registry_from_dir(dir),
        None => DefinitionRegistry::with_defaults(),
    };
    if registry.loot_table(&args.table_id).is_none() {
        bail!(
            "unknown loot table '{}' (available: {})",
            args.table_id,
            registry.loot_table_ids().join(", ")
        );
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let generator = LootGenerator::new(&registry, &config);
    let loot = generator.generate(&args.table_id, args.floor, args.quantity, &mut rng);

    println!(
        "Rolled {} item(s) from '{}' on floor {} (seed {})",
        loot.len(),
        args.table_id,
        args.floor,
        seed
    );
    for item in &loot {
        print_item(item);
    }

    // Equip the first piece that can be worn, then study it
    let Some(first) = loot.iter().find(|i| i.category().takes_modifiers()).map(|i| i.id()) else {
        println!("Nothing worth identifying.");
        return Ok(());
    };

    let mut roster = Roster::new();
    roster.add_owner(Player::new(1, "Wanderer", 14));
    roster.add_items(loot);
    roster.equip(1, first);

    let mut scheduler = IdentificationScheduler::new(config.identification.clone());
    let outcome = match roster.split(1, first) {
        Some((owner, item)) => scheduler.start(owner, item),
        None => StartOutcome::Rejected,
    };
    match outcome {
        StartOutcome::Rejected => bail!("could not start identifying item {}", first),
        StartOutcome::Queued { duration } => println!("Studying item {} for {} turn(s)", first, duration),
        StartOutcome::Completed { experience, .. } => {
            println!("  it's cursed, and it won't come off (+{} XP)", experience);
        }
    }

    let mut ticks = 0;
    while !scheduler.is_empty() && ticks < MAX_TICKS {
        ticks += 1;
        for event in scheduler.tick(&mut roster).events {
            match event {
                IdentificationEvent::Progress { percent_remaining, .. } => {
                    println!("  turn {}: {}% left to study", ticks, percent_remaining);
                }
                IdentificationEvent::Completed { cursed_bound, experience, .. } => {
                    if cursed_bound {
                        println!("  turn {}: it's cursed, and it won't come off (+{} XP)", ticks, experience);
                    }
                }
                IdentificationEvent::Dropped { .. } => {}
            }
        }
    }

    if let Some(item) = roster.item(first) {
        println!(
            "Identified after {} turn(s): {} (can unequip: {})",
            ticks,
            item.display_name(),
            item.can_unequip()
        );
    }

    log::info!("Relicforge shut down cleanly");
    Ok(())
}
