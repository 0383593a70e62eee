//! Sample script generation.
//!
//! When no script is given we generate one with a seeded RNG. The mix is
//! chosen so every outcome shows up in the metrics:
//!
//! - Mostly well-formed names over a mixed-case alphabet
//! - Some names too short or too uniform to pass the entry check
//! - Some names with digits and underscores (cipher pass-through)
//! - Compactions and dumps sprinkled between encodes

use crate::script::Command;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const SYMBOLS: &[u8] = b"0123456789_";

/// Generate a sample script of `commands` commands after the leading
/// `capacity` line.
pub fn generate_commands(seed: u64, commands: usize) -> Vec<Command> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let capacity: u32 = rng.gen_range(1..=32);

    let mut script = Vec::with_capacity(commands + 1);
    script.push(Command::Capacity(capacity));

    for _ in 0..commands {
        let command = match rng.gen_range(0..20) {
            // 60% encodes
            0..=11 => Command::Encode(generate_name(&mut rng)),
            12..=13 => Command::CompactTrees,
            14..=15 => Command::CompactHeap(rng.gen_range(1..=4)),
            16 => Command::DumpTree,
            17..=18 => Command::DumpArea(rng.gen_range(1..=capacity)),
            _ => Command::DumpHeap(rng.gen_range(1..=4)),
        };
        script.push(command);
    }
    script
}

/// Generate the text form of a sample script.
pub fn generate_script(seed: u64, commands: usize) -> String {
    let mut text = format!("# generated with seed {}\n", seed);
    for command in generate_commands(seed, commands) {
        text.push_str(&command.to_string());
        text.push('\n');
    }
    text
}

fn generate_name(rng: &mut ChaCha8Rng) -> String {
    match rng.gen_range(0..10) {
        // too short
        0 => (0..rng.gen_range(1..=2)).map(|_| pick(rng, LETTERS)).collect(),

        // too uniform: two distinct characters repeated
        1 => {
            let a = pick(rng, LETTERS);
            let b = pick(rng, LETTERS);
            (0..rng.gen_range(3..=8))
                .map(|i| if i % 2 == 0 { a } else { b })
                .collect()
        }

        // letters mixed with digits and underscores
        2..=3 => (0..rng.gen_range(3..=12))
            .map(|_| {
                if rng.gen_bool(0.3) {
                    pick(rng, SYMBOLS)
                } else {
                    pick(rng, LETTERS)
                }
            })
            .collect(),

        _ => (0..rng.gen_range(3..=10)).map(|_| pick(rng, LETTERS)).collect(),
    }
}

fn pick(rng: &mut ChaCha8Rng, alphabet: &[u8]) -> char {
    alphabet[rng.gen_range(0..alphabet.len())] as char
}
