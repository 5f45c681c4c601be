// LumiTouch — Radio Line Encoding
//
// Self-clocking line code for the lighting protocol. Every symbol opens
// with a `1` clock edge; a second `1` before the terminating `0` marks a
// data one. Receivers sync on the fixed preamble and validate a single
// parity symbol appended after the 28 payload bits.

use crate::message::CommandMsg;

// Fixed framing patterns, in wire order.
const PREAMBLE: &str = "10101011110";
const SYMBOL_ONE: &str = "110";
const SYMBOL_ZERO: &str = "10";
const STOP: &str = "11110";

/// Number of packed-word bits transmitted, MSB first.
pub const PAYLOAD_BITS: usize = 28;

/// 128 bits — worst-case frame is 102 bits (all-ones payload).
pub const BUFFER_BYTES: usize = 16;

// ---------------------------------------------------------------------------
// Bit Buffer
// ---------------------------------------------------------------------------

/// Fixed-capacity bit queue filled by the encoder and drained one bit per
/// tick by the transmit clock. Bit `n` is stored at `bytes[n / 8]`, mask
/// `1 << (n % 8)`.
pub struct BitBuffer {
    bytes: [u8; BUFFER_BYTES],
    total: usize,
    position: usize,
}

impl BitBuffer {
    pub const fn new() -> Self {
        Self {
            bytes: [0; BUFFER_BYTES],
            total: 0,
            position: 0,
        }
    }

    /// Clear all queued bits and rewind the cursor.
    pub fn reset(&mut self) {
        self.bytes = [0; BUFFER_BYTES];
        self.total = 0;
        self.position = 0;
    }

    /// Bits queued so far.
    #[allow(dead_code)]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Next bit to emit.
    #[allow(dead_code)]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Pop the bit at the cursor, or `None` once the buffer is drained.
    pub fn advance(&mut self) -> Option<bool> {
        if self.position >= self.total {
            return None;
        }
        let bit = self.bytes[self.position / 8] & (1 << (self.position % 8)) != 0;
        self.position += 1;
        Some(bit)
    }

    fn push(&mut self, bit: bool) {
        debug_assert!(self.total < BUFFER_BYTES * 8);
        if bit {
            self.bytes[self.total / 8] |= 1 << (self.total % 8);
        }
        self.total += 1;
    }

    fn append_bits(&mut self, pattern: &str) {
        for b in pattern.bytes() {
            self.push(b == b'1');
        }
    }
}

impl Default for BitBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Encoder
// ---------------------------------------------------------------------------

/// Encode `msg` into `buf`, replacing its contents with a complete frame:
/// preamble, 28 payload symbols, parity symbol, stop pattern.
pub fn encode(msg: &CommandMsg, buf: &mut BitBuffer) {
    encode_word(msg.pack(), buf);
}

fn encode_word(word: u32, buf: &mut BitBuffer) {
    buf.reset();
    buf.append_bits(PREAMBLE);

    let mut data = word;
    let mut ones: u32 = 0;
    for _ in 0..PAYLOAD_BITS {
        if data & 0x8000_0000 != 0 {
            ones += 1;
            buf.append_bits(SYMBOL_ONE);
        } else {
            buf.append_bits(SYMBOL_ZERO);
        }
        data <<= 1;
    }

    // Parity over the payload bits.
    buf.append_bits(if ones % 2 == 1 { SYMBOL_ONE } else { SYMBOL_ZERO });

    buf.append_bits(STOP);
}
