/*!

A CHIP-8 virtual machine as specified at https://en.wikipedia.org/wiki/CHIP-8.

The machine only interprets programs. Drawing the screen, playing the buzzer,
reading a keyboard and deciding how fast to run are left to the host.

# Runner

To try the machine on a program without any frontend, run
`cargo run --release -- <program> --frames 120`, which runs the program for two
seconds of emulated time and prints the screen.
Use `--disassemble` to list the program instead.

# Library

Create a `Machine`, load a program and step through it.

```rust
use chip_8_vm::emulator::{Machine, StepOutcome};

let mut machine = Machine::new();

// Load a program at address 0x200.
let set_va = [0x6A, 0x02];
machine.load_rom(&set_va).unwrap();

assert_eq!(machine.step(), Ok(StepOutcome::Advanced));
assert_eq!(machine.registers().v[0xA], 2);
assert_eq!(machine.program_counter(), 0x202);
```

A host runs a loop along these lines, once per 60 Hz frame.

```rust
use chip_8_vm::emulator::{Machine, MachineStatus};

let mut machine = Machine::new();
machine.load_rom(&[0xF0, 0x0A, 0x12, 0x02]).unwrap();

for frame in 0..3 {
    // Key presses from the host go in first.
    machine.set_key(0x5, frame == 2).unwrap();

    for _ in 0..10 {
        if machine.step().is_err() {
            break;
        }
    }
    machine.tick_timers();

    let _pixels = machine.display();
    let _beep = machine.is_sound_active();
}

assert_eq!(machine.status(), MachineStatus::Running);
assert_eq!(machine.registers().v[0], 0x5);
```

## Quirks

Interpreters disagree on a handful of instructions. The defaults follow the
COSMAC VIP, other behaviours are picked through `Config`.

```rust
use chip_8_vm::emulator::{Config, Machine, Quirks};

let config = Config::default().with_quirks(Quirks::chip48()).with_seed(42);
let machine = Machine::with_config(config);
assert!(!machine.config().quirks.shift_uses_vy);
```
*/

pub mod emulator;
pub mod util;
