//! Sound-effect test harness
//!
//! Drives the effect library against an in-memory PSG and shows what ended
//! up in the registers.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::{info, LevelFilter};

use ym2149_sfx::effects::DEATH_NAME;
use ym2149_sfx::psg::fields::{envelope_shape_name, LEVEL_ENVELOPE_MODE};
use ym2149_sfx::psg::{MemoryPsg, RegisterWrite};
use ym2149_sfx::{Channel, Effect, PsgConfig, Register, RegisterBank, Sfx, SoundControl};

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

#[derive(Parser, Debug)]
#[command(name = "ym2149-sfx")]
#[command(about = "Play YM2149 sound effects against an in-memory PSG and inspect the registers")]
struct Args {
    /// PSG master clock in Hz, used for frequency display
    #[arg(long, default_value_t = PsgConfig::default().master_clock_hz)]
    clock: u32,

    /// Print register dumps as JSON
    #[arg(long)]
    json: bool,

    /// Write every register write to a CSV file
    #[arg(long)]
    trace: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play effects in order (death, pain, walk, train, collect, beep)
    Play {
        /// Effect names
        #[arg(required = true)]
        effects: Vec<String>,

        /// Play the whole list this many times
        #[arg(long, default_value_t = 1)]
        repeat: u32,
    },
    /// Read keys from stdin, one effect per key
    Interactive,
    /// Dump the power-on register state
    Regs,
    /// Silence everything and dump the result
    Stop,
}

fn init_logging(verbose: u8) -> anyhow::Result<()> {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{}] {}: {}", record.level(), record.target(), message))
        })
        .level(level)
        .chain(io::stderr())
        .apply()
        .context("failed to install logger")
}

fn frequency_to_note_label(freq: f32) -> Option<String> {
    if !freq.is_finite() || freq <= 0.0 {
        return None;
    }
    let midi = (69.0 + 12.0 * (freq / 440.0).log2()).round();
    if !(0.0..=127.0).contains(&midi) {
        return None;
    }
    let midi = midi as i32;
    let octave = midi / 12 - 1;
    Some(format!("{}{}", NOTE_NAMES[(midi % 12) as usize], octave))
}

fn describe_channel(
    ctl: &SoundControl<MemoryPsg>,
    bank: &RegisterBank,
    channel: Channel,
    clock: u32,
) -> String {
    let period = ctl.tone(channel);
    let mixer = ctl.mixer();
    let level = bank.get(channel.level());

    let mut parts = Vec::new();
    match period.frequency(clock) {
        Some(freq) => {
            parts.push(format!("{freq:>7.1}Hz"));
            if let Some(note) = frequency_to_note_label(freq) {
                parts.push(note);
            }
        }
        None => parts.push("--".into()),
    }
    if level & LEVEL_ENVELOPE_MODE != 0 {
        parts.push("ENV".into());
    } else {
        parts.push(format!("VOL {level:>2}"));
    }
    parts.push(format!(
        "T{} N{}",
        if mixer.is_tone_enabled(channel) { '+' } else { '-' },
        if mixer.is_noise_enabled(channel) { '+' } else { '-' },
    ));
    format!("{channel}: {}", parts.join(" "))
}

fn bank_to_json(bank: &RegisterBank) -> anyhow::Result<String> {
    serde_json::to_string_pretty(bank).context("failed to encode register dump")
}

fn dump(ctl: &SoundControl<MemoryPsg>, clock: u32, json: bool) -> anyhow::Result<()> {
    let bank = ctl.snapshot();
    if json {
        println!("{}", bank_to_json(&bank)?);
        return Ok(());
    }

    for reg in Register::ALL {
        println!("  {:<32} {:#04x}", reg.to_string(), bank.get(reg));
    }
    println!();
    for channel in Channel::ALL {
        println!("  {}", describe_channel(ctl, &bank, channel, clock));
    }
    let sustain = u16::from_le_bytes([
        bank.get(Register::EnvelopeFine),
        bank.get(Register::EnvelopeRough),
    ]);
    let shape = bank.get(Register::EnvelopeShape);
    println!(
        "  Envelope: {} ({shape:#x}), sustain {sustain:#06x}",
        envelope_shape_name(shape)
    );
    Ok(())
}

fn write_trace(path: &Path, writes: &[RegisterWrite]) -> anyhow::Result<()> {
    let mut out = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create trace file '{}'", path.display()))?;
    for write in writes {
        out.serialize(write)?;
    }
    out.flush()?;
    info!("wrote {} register writes to {}", writes.len(), path.display());
    Ok(())
}

fn key_to_effect(key: char) -> Option<&'static str> {
    match key.to_ascii_lowercase() {
        'd' => Some(DEATH_NAME),
        'p' => Some(Effect::Pain.name()),
        'w' => Some(Effect::Walk.name()),
        't' => Some(Effect::TrainHorn.name()),
        'c' => Some(Effect::Collect.name()),
        'b' => Some(Effect::Beep.name()),
        _ => None,
    }
}

fn interactive(ctl: &SoundControl<MemoryPsg>, sfx: &mut Sfx, args: &Args) -> anyhow::Result<()> {
    println!("Keys: d=death p=pain w=walk t=train c=collect b=beep s=stop r=registers q=quit");
    let started = Instant::now();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    'input: for line in stdin.lock().lines() {
        for key in line?.chars().filter(|c| !c.is_whitespace()) {
            let elapsed = started.elapsed().as_secs_f32();
            match key.to_ascii_lowercase() {
                'q' => break 'input,
                's' => {
                    ctl.stop_all_sound();
                    println!("[{elapsed:>8.3}s] stop");
                }
                'r' => dump(ctl, args.clock, args.json)?,
                other => match key_to_effect(other) {
                    Some(name) => {
                        sfx.trigger(name, ctl)?;
                        println!("[{elapsed:>8.3}s] {name}");
                    }
                    None => println!("unknown key '{other}'"),
                },
            }
        }
        stdout.flush()?;
    }

    ctl.stop_all_sound();
    Ok(())
}

fn run(args: Args) -> anyhow::Result<()> {
    PsgConfig::default().with_clock(args.clock).validate()?;

    let ctl = SoundControl::new(MemoryPsg::new());
    let mut sfx = Sfx::new();

    match &args.command {
        Command::Play { effects, repeat } => {
            for _ in 0..*repeat {
                for name in effects {
                    sfx.trigger(name, &ctl)?;
                    info!("played {name}");
                }
            }
            dump(&ctl, args.clock, args.json)?;
        }
        Command::Interactive => interactive(&ctl, &mut sfx, &args)?,
        Command::Regs => dump(&ctl, args.clock, args.json)?,
        Command::Stop => {
            ctl.stop_all_sound();
            dump(&ctl, args.clock, args.json)?;
        }
    }

    if let Some(path) = &args.trace {
        let writes = ctl.with_host(|psg| psg.writes().to_vec());
        write_trace(path, &writes)?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;
    run(args)
}
