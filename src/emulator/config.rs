use crate::emulator::quirks::Quirks;

/// How a [`Machine`](crate::emulator::Machine) behaves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    pub quirks: Quirks,
    /// Seed for `CXNN`. Without one the random source is seeded from the OS,
    /// with one every reset replays the same random sequence.
    pub rng_seed: Option<u64>,
}

impl Config {
    pub fn with_quirks(mut self, quirks: Quirks) -> Config {
        self.quirks = quirks;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Config {
        self.rng_seed = Some(seed);
        self
    }
}
