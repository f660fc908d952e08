use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::error;

use chipvm::{JumpQuirk, Machine, Quirks, TransferQuirk, CLOCK_SPEED};

mod keymap;
mod run;

#[derive(Parser, Debug)]
#[command(version, about = "Runs a Chip-8 program")]
struct Args {
    /// Path to the ROM file to run
    rom: PathBuf,

    /// Instructions executed per second
    #[arg(long, default_value_t = CLOCK_SPEED)]
    clock_hz: u32,

    /// Size of each Chip-8 pixel on screen
    #[arg(long, default_value_t = 10)]
    scale: u32,

    /// Execute one instruction per press of Space instead of free running
    #[arg(long, default_value_t = false)]
    step: bool,

    /// BNNN jumps to (V0 + NNN) & 0x0FFF
    #[arg(long, default_value_t = false)]
    masked_jump: bool,

    /// FX55 and FX65 include Vx itself
    #[arg(long, default_value_t = false)]
    inclusive_transfer: bool,

    /// Seed for CXNN's random numbers; taken from the OS when omitted
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    fn quirks(&self) -> Quirks {
        Quirks {
            jump: if self.masked_jump {
                JumpQuirk::MaskedSum
            } else {
                JumpQuirk::AddressPlusV0
            },
            register_transfer: if self.inclusive_transfer {
                TransferQuirk::Inclusive
            } else {
                TransferQuirk::Exclusive
            },
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let machine = match args.seed {
        Some(seed) => Machine::with_seed(seed),
        None => Machine::new(),
    }
    .with_quirks(args.quirks());

    let options = run::Options {
        clock_hz: args.clock_hz.max(1),
        scale: args.scale,
        step: args.step,
    };
    match run::run(machine, &args.rom, options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_default_quirks() {
        let args = Args::parse_from(["chipvm", "game.ch8"]);
        assert_eq!(args.quirks(), Quirks::default());
        assert_eq!(args.clock_hz, CLOCK_SPEED);
        assert!(!args.step);
    }

    #[test]
    fn test_args_quirk_flags() {
        let args = Args::parse_from([
            "chipvm",
            "--masked-jump",
            "--inclusive-transfer",
            "--seed",
            "7",
            "game.ch8",
        ]);
        assert_eq!(args.quirks().jump, JumpQuirk::MaskedSum);
        assert_eq!(args.quirks().register_transfer, TransferQuirk::Inclusive);
        assert_eq!(args.seed, Some(7));
    }
}
