//! Random short-code generation

/// Upper-case letters and digits
pub const CODE_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub const DEFAULT_CODE_LENGTH: usize = 10;

/// Safety limit on redraws before giving up
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

/// Draws fixed-length codes uniformly from [`CODE_ALPHABET`]
///
/// The generator only produces candidates. Whether a candidate is free is
/// decided by the store's atomic insert, so the check and the write always
/// see the same state.
#[derive(Debug, Clone, Copy)]
pub struct CodeGenerator {
    length: usize,
    max_attempts: u32,
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH, DEFAULT_MAX_ATTEMPTS)
    }
}

impl CodeGenerator {
    pub fn new(length: usize, max_attempts: u32) -> Self {
        Self {
            length: length.max(1),
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// One candidate, each position chosen independently
    pub fn draw(&self) -> String {
        std::iter::repeat_with(|| CODE_ALPHABET[rand::random_range(0..CODE_ALPHABET.len())] as char)
            .take(self.length)
            .collect()
    }
}
