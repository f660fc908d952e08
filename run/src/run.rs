use std::error::Error;
use std::fmt::Write;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use chipvm::{Machine, MachineError, Outcome, State, TIMER_HZ};
use chipvm_display::Display;

use crate::keymap::keymap;

pub struct Options {
    pub clock_hz: u32,
    pub scale: u32,
    pub step: bool,
}

pub fn run(mut machine: Machine, rom: &Path, options: Options) -> Result<(), Box<dyn Error>> {
    // Get SDL2 context
    let sdl: sdl2::Sdl = sdl2::init()?;
    let mut display: Display = Display::new(&sdl, options.scale)?;
    let mut events = sdl.event_pump()?;

    // Load ROM
    let mut reader = BufReader::new(File::open(rom)?);
    machine.load_rom(&mut reader)?;
    info!("loaded {}", rom.display());

    // Timers tick once per frame; the CPU runs however many cycles fit in one
    let frame_time = Duration::from_secs(1) / TIMER_HZ;
    let cycles_per_frame = (options.clock_hz / TIMER_HZ).max(1);

    'event: loop {
        let frame_start = Instant::now();
        // Single steps requested during this frame
        let mut steps = 0;

        // Handle input
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. } => break 'event,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => match (key, keymap(key)) {
                    (_, Some(kc)) => machine.key_press(kc),
                    (Keycode::Escape, _) => break 'event,
                    (Keycode::Space, _) => steps += 1,
                    _ => continue,
                },
                Event::KeyUp {
                    keycode: Some(key), ..
                } => {
                    if let Some(kc) = keymap(key) {
                        machine.key_release(kc)
                    }
                }
                _ => continue,
            };
        }

        // Update state
        let was_beeping = machine.is_beeping();
        if options.step {
            for _ in 0..steps {
                let outcome = step(&mut machine)?;
                report(outcome);
                info!("{}", describe(machine.state()));
            }
        } else {
            for _ in 0..cycles_per_frame {
                match machine.cycle()? {
                    Outcome::Executed => continue,
                    // no point spinning until the next key press
                    Outcome::AwaitingKey => break,
                    outcome => report(outcome),
                }
            }
            machine.tick_timers();
        }
        match (was_beeping, machine.is_beeping()) {
            (false, true) => debug!("beep on"),
            (true, false) => debug!("beep off"),
            _ => {}
        }

        // If the draw flag is set, unset it and render the current frame
        if let Some(frame) = machine.take_frame() {
            display.render(&frame)?;
        }

        // Handle timing
        let elapsed = frame_start.elapsed();
        if frame_time > elapsed {
            std::thread::sleep(frame_time - elapsed);
        }
    }

    Ok(())
}

/// Runs one cycle in step mode. Timers count one tick per step so delay loops still
/// make progress.
fn step(machine: &mut Machine) -> Result<Outcome, MachineError> {
    let outcome = machine.cycle()?;
    machine.tick_timers();
    Ok(outcome)
}

/// Logs anything noteworthy about a cycle
fn report(outcome: Outcome) {
    match outcome {
        Outcome::Executed | Outcome::AwaitingKey => {}
        Outcome::Unimplemented(_) => info!("{}", outcome),
        Outcome::Unknown(_) => warn!("{}", outcome),
    }
}

/// A one-screen dump of the registers and the instructions around pc
fn describe(state: &State) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "PC = {:#06X}  I = {:#06X}  OP = {:#06X}  DT = {:#04X}  ST = {:#04X}  SP = {}",
        state.pc, state.i, state.opcode, state.delay_timer, state.sound_timer, state.sp
    );
    for (index, value) in state.v.iter().enumerate() {
        let _ = write!(out, "V{:X} = {:#04X}", index, value);
        out.push(if index % 4 == 3 { '\n' } else { ' ' });
    }

    let pc = usize::from(state.pc);
    let start = pc.saturating_sub(4);
    let end = (pc + 6).min(state.memory.len() - 1);
    for address in (start..end).step_by(2) {
        let word = u16::from(state.memory[address]) << 8 | u16::from(state.memory[address + 1]);
        let marker = if address == pc { '>' } else { ' ' };
        let _ = writeln!(out, "{} {:#05X}  {:04X}", marker, address, word);
    }
    out
}
