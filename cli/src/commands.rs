use std::io::Write;
use std::path::Path;
use std::time::Instant;

use skirmish_core::context::AppConfigExt;
use skirmish_core::{Match, Player, Slot, SteamId, format_clock};
use skirmish_types::{AttackWindowRecord, MomentRecord};

use crate::context::{CliContext, error_chain};

pub fn load(ctx: &mut CliContext, match_id: u64, path: Option<&str>) -> Result<(), String> {
    let timer = Instant::now();
    let m = ctx.load_match(match_id, path.map(Path::new))?;
    let events = m.events().map_err(|e| error_chain(&e))?.len();
    let players = m.players().map_err(|e| error_chain(&e))?.len();
    println!(
        "loaded match {match_id}: {events} events, {players} players in {}ms",
        timer.elapsed().as_millis()
    );
    Ok(())
}

pub fn players(ctx: &CliContext) -> Result<(), String> {
    let m = ctx.active()?;
    let players = m.players().map_err(|e| error_chain(&e))?;

    println!(
        "{:<6} {:<32} {:<36} {:>6} {:>6} {:>6} Steam ID",
        "Slot", "Hero", "Unit", "Dealt", "Taken", "Deaths"
    );
    println!("{}", "-".repeat(117));
    for player in &players {
        let row = player_row(player);
        println!(
            "{:<6} {:<32} {:<36} {:>6} {:>6} {:>6} {}",
            row.slot,
            row.hero_name,
            row.unit,
            row.hits_dealt,
            row.hits_taken,
            row.deaths,
            row.steam_id
        );
    }
    println!("\nTotal: {} players", players.len());
    Ok(())
}

pub fn highlights(ctx: &CliContext, hero: Option<&str>, json: bool) -> Result<(), String> {
    let m = ctx.active()?;
    let records = match hero {
        Some(hero) => m.get_single_player_action_moments(hero),
        None => m.get_action_moments(),
    }
    .map_err(|e| error_chain(&e))?;

    if json {
        return print_json(&records);
    }
    print_moments(&records);
    Ok(())
}

pub fn windows(ctx: &CliContext, hero: &str, json: bool) -> Result<(), String> {
    let m = ctx.active()?;
    let records = m.attack_windows(hero).map_err(|e| error_chain(&e))?;

    if json {
        return print_json(&records);
    }
    print_windows(&records);
    Ok(())
}

pub fn signals(
    ctx: &CliContext,
    hero: &str,
    start: Option<i64>,
    end: Option<i64>,
) -> Result<(), String> {
    let m = ctx.active()?;
    let player = find_player(m, hero)?;
    let signals = player.signals().slice(start, end);

    println!(
        "{:<8} {:>8} {:>10} {:>10} {:>10}",
        "Clock", "HP", "Max HP", "dHP", "Smooth"
    );
    println!("{}", "-".repeat(50));
    let rows = signals
        .health
        .iter()
        .zip(signals.max_health.values())
        .zip(signals.d_health.values())
        .zip(signals.smoothed_d_health.values());
    for ((((tick, hp), max_hp), dhp), sdhp) in rows {
        println!(
            "{:<8} {:>8.0} {:>10.0} {:>10.1} {:>10.1}",
            format_clock(tick),
            hp,
            max_hp,
            dhp,
            sdhp
        );
    }
    println!("\nTotal: {} samples", signals.len());
    Ok(())
}

pub fn show_settings(ctx: &CliContext) -> Result<(), String> {
    let config = &ctx.config;
    println!("replay directory:          {}", config.replay_directory);
    println!(
        "hero table:                {}",
        config.hero_table_path.as_deref().unwrap_or("<bundled>")
    );
    let analysis = &config.analysis;
    println!("max health window:         {}", analysis.max_health_window);
    println!("smooth window:             {}", analysis.smooth_window);
    println!("health rate threshold:     {}", analysis.health_rate_threshold);
    println!("relative health threshold: {}", analysis.relative_health_threshold);
    println!("moment merge gap:          {}", analysis.moment_merge_gap);
    println!("single player merge gap:   {}", analysis.single_player_merge_gap);
    println!(
        "moment sources:            kills={} escapes={}",
        analysis.moment_sources.kills, analysis.moment_sources.escapes
    );
    match ctx.active() {
        Ok(m) => println!("active match:              {m}"),
        Err(_) => println!("active match:              none"),
    }
    Ok(())
}

pub fn set_directory(ctx: &mut CliContext, path: &str) -> Result<(), String> {
    if !Path::new(path).is_dir() {
        return Err(format!("not a directory: {path}"));
    }
    ctx.config.replay_directory = path.to_string();
    ctx.config.clone().save().map_err(|e| error_chain(&e))?;
    ctx.clear();
    println!("replay directory set to {path}");
    Ok(())
}

pub fn exit() {
    // stdout may already be closed when input ends
    let _ = writeln!(std::io::stdout(), "quitting...");
    let _ = std::io::stdout().flush();
}

/// One line of the `players` table.
#[derive(Debug, PartialEq)]
pub struct PlayerRow {
    pub slot: Slot,
    pub hero_name: String,
    pub unit: String,
    pub steam_id: SteamId,
    pub hits_dealt: usize,
    pub hits_taken: usize,
    pub deaths: usize,
}

pub fn player_row(player: &Player<'_>) -> PlayerRow {
    PlayerRow {
        slot: player.slot(),
        hero_name: player.hero_name().to_string(),
        unit: player.unit().to_string(),
        steam_id: player.steam_id(),
        hits_dealt: player.damage_out().len(),
        hits_taken: player.damage_in().len(),
        deaths: player.deaths().len(),
    }
}

fn find_player<'m>(m: &'m Match, hero: &str) -> Result<Player<'m>, String> {
    m.player(hero)
        .map_err(|e| error_chain(&e))?
        .ok_or_else(|| format!("match {} has no player on {hero}", m.match_id()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}

fn print_moments(records: &[MomentRecord]) {
    if records.is_empty() {
        println!("No action moments");
        return;
    }
    println!("{:<10} {:<10} {:>8} {:>8}", "Start", "End", "Tick", "Length");
    println!("{}", "-".repeat(40));
    for record in records {
        println!(
            "{:<10} {:<10} {:>8} {:>8}",
            record.clock_start,
            record.clock_end,
            record.start,
            record.end - record.start
        );
    }
    println!("\nTotal: {} moments", records.len());
}

fn print_windows(records: &[AttackWindowRecord]) {
    if records.is_empty() {
        println!("No attack windows");
        return;
    }
    println!("{:<10} {:<10} {:<6} Attackers", "Start", "End", "Dead");
    println!("{}", "-".repeat(70));
    for record in records {
        let attackers = if record.attackers.is_empty() {
            "-".to_string()
        } else {
            record.attackers.join(", ")
        };
        println!(
            "{:<10} {:<10} {:<6} {}",
            format_clock(record.start),
            format_clock(record.end),
            if record.target_dead { "yes" } else { "no" },
            attackers
        );
    }
    println!("\nTotal: {} windows", records.len());
}
