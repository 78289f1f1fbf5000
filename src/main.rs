//! buzzer-fx command-line player
//!
//! Plays melodies and sound effects through the host speaker (`streaming`
//! feature), renders them to WAV (`export-wav` feature), or prints the exact
//! sequence of buzzer commands a firmware build would issue (`--dry-run`).

mod args;

use anyhow::{bail, Context, Result};
use args::{CliArgs, Effect};
use buzzer_fx::sim::{run_until_idle, SimulatedBuzzer};
use buzzer_fx::tables::{melodies, SAMPLE_MELODY};
use buzzer_fx::{
    AlertController, BuzzerConfig, Channel, ChannelId, Controller, MelodyController,
    SirenController, ToneController, ToneHardware, ToneSeriesController,
};

const CHANNEL: ChannelId = ChannelId(0);

/// Longest run the simulator renders (10 minutes)
const SIMULATION_LIMIT_MS: u32 = 600_000;

/// Build the controller for `effect` and start it on `hw`
fn start_effect(
    effect: &Effect,
    repeat: u8,
    config: &BuzzerConfig,
    hw: &mut dyn ToneHardware,
) -> Result<Box<dyn Controller>> {
    let channel = Channel::new(CHANNEL);
    let controller: Box<dyn Controller> = match *effect {
        Effect::Notation(ref notation) => {
            let mut melody = MelodyController::with_config(channel, config);
            melody.start_notation(hw, notation.as_str(), repeat)?;
            Box::new(melody)
        }
        Effect::Sample => {
            let mut melody = MelodyController::with_config(channel, config);
            melody.start(hw, &SAMPLE_MELODY[..], repeat)?;
            Box::new(melody)
        }
        Effect::Tone {
            frequency,
            duration_ms,
        } => {
            let mut tone = ToneController::with_config(channel, config);
            tone.start(hw, frequency, duration_ms)?;
            Box::new(tone)
        }
        Effect::Beep {
            count,
            frequency,
            duration_ms,
            lapse_ms,
        } => {
            let mut alert = AlertController::with_config(channel, config);
            alert.beep(hw, count, frequency, duration_ms, lapse_ms)?;
            Box::new(alert)
        }
        Effect::Sweep {
            start,
            end,
            step,
            duration_ms,
        } => {
            let mut series = ToneSeriesController::with_config(channel, config);
            series.start(hw, start, end, step, duration_ms)?;
            Box::new(series)
        }
        Effect::Siren {
            low,
            high,
            total_ms,
        } => {
            let mut siren = SirenController::with_config(channel, config);
            siren.start(hw, low, high, total_ms)?;
            Box::new(siren)
        }
    };
    Ok(controller)
}

/// Run `effect` to completion against the simulator
fn simulate(effect: &Effect, repeat: u8, config: &BuzzerConfig) -> Result<SimulatedBuzzer> {
    let mut buzzer = SimulatedBuzzer::new();
    let mut controller = start_effect(effect, repeat, config, &mut buzzer)?;
    let spent = run_until_idle(controller.as_mut(), &mut buzzer, 1, SIMULATION_LIMIT_MS);
    if controller.is_active() {
        controller.stop(&mut buzzer);
        log::warn!("{} still running after {} ms, stopped", effect, spent);
    }
    Ok(buzzer)
}

fn print_dry_run(effect: &Effect, buzzer: &SimulatedBuzzer) {
    println!("{}:", effect);
    for event in buzzer.events() {
        println!("  {}", event);
    }
    println!(
        "{} tones, {} silences, {} ms",
        buzzer.emit_count(),
        buzzer.silence_count(),
        buzzer.events().last().map_or(0, |e| e.at_ms())
    );
}

#[cfg(feature = "export-wav")]
fn export(buzzer: &SimulatedBuzzer, path: &std::path::Path) -> Result<()> {
    use buzzer_fx::export::{export_to_wav_with_config, ExportConfig};

    export_to_wav_with_config(buzzer, CHANNEL, path, ExportConfig::default().fade_out(0.05))
        .with_context(|| format!("exporting to {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

#[cfg(not(feature = "export-wav"))]
fn export(_buzzer: &SimulatedBuzzer, _path: &std::path::Path) -> Result<()> {
    bail!("WAV export requires the \"export-wav\" feature. Rebuild with `--features export-wav`.")
}

#[cfg(feature = "streaming")]
fn play(effect: &Effect, repeat: u8, config: &BuzzerConfig) -> Result<()> {
    use buzzer_fx::{Board, Speaker, SystemClock};
    use std::time::Duration;

    let speaker = Speaker::new(44_100, 0.3)?;
    let mut board = Board::new(speaker.output(), SystemClock::new());
    let mut controller = start_effect(effect, repeat, config, &mut board)?;
    println!("Playing {}", effect);

    while controller.is_active() {
        controller.tick(&mut board);
        std::thread::sleep(Duration::from_millis(1));
    }
    // Let the last batch drain before closing the stream
    std::thread::sleep(Duration::from_millis(50));
    speaker.finish();
    Ok(())
}

#[cfg(not(feature = "streaming"))]
fn play(effect: &Effect, repeat: u8, config: &BuzzerConfig) -> Result<()> {
    eprintln!("Speaker playback requires the \"streaming\" feature; printing a dry run instead.");
    let buzzer = simulate(effect, repeat, config)?;
    print_dry_run(effect, &buzzer);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let args = CliArgs::parse();
    if args.show_help {
        CliArgs::print_help();
        return Ok(());
    }

    if args.list {
        for (name, notation) in melodies::ALL {
            let parsed = buzzer_fx::parse_notation(notation)?;
            println!(
                "{:<12} {:<14} {:>3} notes{}",
                name,
                parsed.name(),
                parsed.len(),
                if parsed.is_truncated() { " (truncated)" } else { "" }
            );
        }
        return Ok(());
    }

    let config = match &args.config_path {
        Some(path) => BuzzerConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => BuzzerConfig::default(),
    };

    let Some(effect) = args.effect.as_ref() else {
        CliArgs::print_help();
        bail!("nothing to play");
    };

    if let Some(path) = &args.export_path {
        let buzzer = simulate(effect, args.repeat, &config)?;
        if args.dry_run {
            print_dry_run(effect, &buzzer);
        }
        return export(&buzzer, path);
    }

    if args.dry_run {
        let buzzer = simulate(effect, args.repeat, &config)?;
        print_dry_run(effect, &buzzer);
        return Ok(());
    }

    play(effect, args.repeat, &config)
}
