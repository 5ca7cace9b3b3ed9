use std::error::Error;
use std::path::PathBuf;

use log::LevelFilter;
use structopt::StructOpt;

use chip_8_vm::emulator::instruction::disassemble;
use chip_8_vm::emulator::memory::PROGRAM_START;
use chip_8_vm::emulator::{Config, Machine, Quirks};

/// Run a CHIP-8 program without a frontend and print the final screen.
#[derive(StructOpt, Debug)]
#[structopt(name = "chip-8-vm")]
struct Opt {
    /// Verbose mode (-v, -vv, -vvv)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,

    /// Number of 60 Hz frames to run
    #[structopt(short, long, default_value = "60")]
    frames: u32,

    /// Instructions executed per frame
    #[structopt(short, long, default_value = "10")]
    cycles_per_frame: u32,

    /// Compatibility preset, `cosmac-vip` or `chip48`
    #[structopt(short, long, default_value = "cosmac-vip")]
    quirks: Quirks,

    /// Seed for the random number instruction
    #[structopt(short, long)]
    seed: Option<u64>,

    /// Keys (hexadecimal, 0-f) held down for the whole run
    #[structopt(short, long = "key", parse(try_from_str = parse_key))]
    keys: Vec<u8>,

    /// Print a listing of the program instead of running it
    #[structopt(short, long)]
    disassemble: bool,

    /// The program to execute
    #[structopt(parse(from_os_str))]
    input: PathBuf,
}

fn parse_key(s: &str) -> Result<u8, String> {
    u8::from_str_radix(s.trim_start_matches("0x"), 16)
        .map_err(|e| format!("`{}` is not a hexadecimal key: {}", s, e))
}

fn init_logger(verbose: u8) {
    let mut builder = env_logger::Builder::from_default_env();
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(LevelFilter::Info);
        }
        2 => {
            builder.filter_level(LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(LevelFilter::Trace);
        }
    }
    builder.init();
}

fn main() -> Result<(), Box<dyn Error>> {
    // Get configuration and read input file
    let opt = Opt::from_args();
    init_logger(opt.verbose);
    log::info!("Executing {:?}", &opt.input);
    let program = std::fs::read(&opt.input)?;

    if opt.disassemble {
        for line in disassemble(&program, PROGRAM_START as u16) {
            println!("{}", line);
        }
        return Ok(());
    }

    let mut config = Config::default().with_quirks(opt.quirks);
    config.rng_seed = opt.seed;

    // Load instructions into emulator memory
    let mut machine = Machine::with_config(config);
    machine.load_rom(&program)?;

    for key in &opt.keys {
        machine.set_key(*key, true)?;
    }

    'frames: for _ in 0..opt.frames {
        for _ in 0..opt.cycles_per_frame {
            if machine.step().is_err() {
                break 'frames;
            }
        }
        machine.tick_timers();
    }

    print!("{}", machine.display());
    println!(
        "status: {:?}, pc: {:#05x}, sound: {}",
        machine.status(),
        machine.program_counter(),
        if machine.is_sound_active() { "on" } else { "off" }
    );

    match machine.halt_reason() {
        Some(reason) => Err(reason.clone().into()),
        None => Ok(()),
    }
}
