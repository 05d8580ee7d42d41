//! Table obfuscation used by some CPK archives

const SEED: u32 = 0x0000_655F;
const MULTIPLIER: u32 = 0x0000_4115;

/// XOR `data` with CRI's table key stream.
///
/// The key stream does not depend on the data, so applying this twice restores the input.
pub fn decrypt(data: &[u8]) -> Vec<u8> {
    let mut key = SEED;
    data.iter()
        .map(|byte| {
            let plain = byte ^ (key & 0xFF) as u8;
            key = key.wrapping_mul(MULTIPLIER);
            plain
        })
        .collect()
}
