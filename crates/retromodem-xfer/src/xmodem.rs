//! XMODEM block receiver.
//!
//! A push-style state machine that consumes one network byte at a time and
//! tells the caller what to send back (ACK/NAK) and when the transfer is
//! over. Supports the classic 128-byte checksum variant, CRC-16 framing and
//! 1024-byte (1K) blocks:
//!
//! ```text
//! SOH/STX  seq  ~seq  data[128|1024]  checksum | crc_hi crc_lo
//! ```
//!
//! A block whose sequence or checksum fails is NAKed and never advances the
//! expected block number; the receiver never resynchronizes by skipping
//! blocks.

/// Start of a 128-byte block.
pub const SOH: u8 = 0x01;
/// Start of a 1024-byte block.
pub const STX: u8 = 0x02;
/// End of transmission.
pub const EOT: u8 = 0x04;
/// Positive acknowledgement.
pub const ACK: u8 = 0x06;
/// Negative acknowledgement / checksum-mode probe.
pub const NAK: u8 = 0x15;
/// Transfer cancel (sender side; the receiver treats it as noise).
pub const CAN: u8 = 0x18;
/// CRC-mode probe sent by a receiver-to-be.
pub const CRC_PROBE: u8 = b'C';

const BLOCK_SIZE: usize = 128;
const BLOCK_1K_SIZE: usize = 1024;

/// Framing variant negotiated for a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmodemMode {
    /// 128-byte blocks with an additive 8-bit checksum.
    Checksum,
    /// 128-byte blocks with CRC-16/XMODEM.
    Crc,
    /// 1024-byte blocks with CRC-16/XMODEM.
    OneK,
}

/// CRC-16/XMODEM: polynomial 0x1021, initial value 0, MSB-first.
pub fn crc16_xmodem(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ 0x1021;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}

fn checksum8(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |sum, &b| sum.wrapping_add(b))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    WaitHeader,
    WaitSeq,
    WaitSeqComplement,
    WaitData,
    WaitCrcHigh,
    WaitCrcLow,
    WaitChecksum,
}

/// What the bridge should do after feeding a byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmodemStep {
    /// Mid-block; nothing to send.
    Continue,
    /// Block verified: send ACK. `total` bytes received so far.
    Ack { total: usize },
    /// Corrupt or unexpected block: request retransmission.
    Nak,
    /// EOT seen: send a final ACK; the transfer is complete.
    Done { total: usize },
}

/// Receive side of an XMODEM transfer.
#[derive(Debug)]
pub struct XmodemReceiver {
    mode: XmodemMode,
    state: State,
    block: Vec<u8>,
    block_size: usize,
    expected_seq: u8,
    next_block: u8,
    received: usize,
    received_crc: u16,
    data: Vec<u8>,
}

impl XmodemReceiver {
    /// Create a receiver for the given framing variant.
    pub fn new(mode: XmodemMode) -> Self {
        let block_size = match mode {
            XmodemMode::OneK => BLOCK_1K_SIZE,
            _ => BLOCK_SIZE,
        };
        XmodemReceiver {
            mode,
            state: State::WaitHeader,
            block: Vec::with_capacity(block_size),
            block_size,
            expected_seq: 0,
            next_block: 1,
            received: 0,
            received_crc: 0,
            data: Vec::new(),
        }
    }

    /// Total payload bytes accepted so far.
    pub fn received(&self) -> usize {
        self.received
    }

    /// The reassembled payload accepted so far.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the receiver, yielding the reassembled payload.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Feed one byte from the sender.
    pub fn feed(&mut self, byte: u8) -> XmodemStep {
        match self.state {
            State::WaitHeader => match byte {
                EOT => XmodemStep::Done {
                    total: self.received,
                },
                SOH => {
                    self.block_size = BLOCK_SIZE;
                    self.begin_block();
                    XmodemStep::Continue
                }
                STX => {
                    self.block_size = BLOCK_1K_SIZE;
                    self.begin_block();
                    XmodemStep::Continue
                }
                _ => {
                    // Line noise between blocks: ask for a resend.
                    XmodemStep::Nak
                }
            },
            State::WaitSeq => {
                self.expected_seq = byte;
                self.state = State::WaitSeqComplement;
                XmodemStep::Continue
            }
            State::WaitSeqComplement => {
                if self.expected_seq != self.next_block || byte != 255 - self.expected_seq {
                    log::debug!(
                        "xmodem: bad sequence {} (complement {}), expected block {}",
                        self.expected_seq,
                        byte,
                        self.next_block
                    );
                    self.state = State::WaitHeader;
                    return XmodemStep::Nak;
                }
                self.state = State::WaitData;
                XmodemStep::Continue
            }
            State::WaitData => {
                self.block.push(byte);
                if self.block.len() >= self.block_size {
                    self.state = match self.mode {
                        XmodemMode::Crc | XmodemMode::OneK => State::WaitCrcHigh,
                        XmodemMode::Checksum => State::WaitChecksum,
                    };
                }
                XmodemStep::Continue
            }
            State::WaitCrcHigh => {
                self.received_crc = (byte as u16) << 8;
                self.state = State::WaitCrcLow;
                XmodemStep::Continue
            }
            State::WaitCrcLow => {
                self.received_crc |= byte as u16;
                let verified = self.received_crc == crc16_xmodem(&self.block);
                self.finish_block(verified)
            }
            State::WaitChecksum => {
                let verified = byte == checksum8(&self.block);
                self.finish_block(verified)
            }
        }
    }

    fn begin_block(&mut self) {
        self.state = State::WaitSeq;
        self.block.clear();
    }

    fn finish_block(&mut self, verified: bool) -> XmodemStep {
        self.state = State::WaitHeader;
        if verified {
            self.received += self.block_size;
            self.next_block = self.next_block.wrapping_add(1);
            self.data.extend_from_slice(&self.block);
            XmodemStep::Ack {
                total: self.received,
            }
        } else {
            log::debug!("xmodem: block {} failed verification", self.next_block);
            XmodemStep::Nak
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a conformant block for the given sequence number.
    fn crc_block(seq: u8, payload: &[u8]) -> Vec<u8> {
        assert_eq!(payload.len(), 128);
        let mut block = vec![SOH, seq, 255 - seq];
        block.extend_from_slice(payload);
        let crc = crc16_xmodem(payload);
        block.push((crc >> 8) as u8);
        block.push((crc & 0xFF) as u8);
        block
    }

    fn feed_all(rx: &mut XmodemReceiver, bytes: &[u8]) -> Vec<XmodemStep> {
        bytes
            .iter()
            .map(|&b| rx.feed(b))
            .filter(|s| *s != XmodemStep::Continue)
            .collect()
    }

    #[test]
    fn test_crc16_known_vectors() {
        // Standard check value for CRC-16/XMODEM.
        assert_eq!(crc16_xmodem(b"123456789"), 0x31C3);
        assert_eq!(crc16_xmodem(&[]), 0x0000);
    }

    #[test]
    fn test_round_trip_multiple_blocks() {
        let payload: Vec<u8> = (0..384).map(|i| (i % 251) as u8).collect();
        let mut rx = XmodemReceiver::new(XmodemMode::Crc);

        let mut acks = 0;
        for (i, chunk) in payload.chunks(128).enumerate() {
            let steps = feed_all(&mut rx, &crc_block(i as u8 + 1, chunk));
            assert_eq!(
                steps,
                vec![XmodemStep::Ack {
                    total: (i + 1) * 128
                }]
            );
            acks += 1;
        }
        assert_eq!(acks, 3);
        assert_eq!(rx.feed(EOT), XmodemStep::Done { total: 384 });
        assert_eq!(rx.into_data(), payload);
    }

    #[test]
    fn test_corrupt_crc_naks_without_advancing() {
        let payload = [0x55u8; 128];
        let mut rx = XmodemReceiver::new(XmodemMode::Crc);

        let mut bad = crc_block(1, &payload);
        let last = bad.len() - 1;
        bad[last] ^= 0xFF;
        let steps = feed_all(&mut rx, &bad);
        assert_eq!(steps, vec![XmodemStep::Nak]);
        assert_eq!(rx.received(), 0);

        // The retransmitted block must still be accepted as block 1.
        let steps = feed_all(&mut rx, &crc_block(1, &payload));
        assert_eq!(steps, vec![XmodemStep::Ack { total: 128 }]);
    }

    #[test]
    fn test_wrong_sequence_complement_rejected() {
        let mut rx = XmodemReceiver::new(XmodemMode::Crc);
        assert_eq!(rx.feed(SOH), XmodemStep::Continue);
        assert_eq!(rx.feed(1), XmodemStep::Continue);
        // Complement must be 254 for sequence 1.
        assert_eq!(rx.feed(0x00), XmodemStep::Nak);
        assert_eq!(rx.received(), 0);
    }

    #[test]
    fn test_out_of_order_block_rejected() {
        let payload = [0xAAu8; 128];
        let mut rx = XmodemReceiver::new(XmodemMode::Crc);
        // Block 2 before block 1: sequence/complement are self-consistent
        // but do not match the locally tracked block number.
        let steps = feed_all(&mut rx, &crc_block(2, &payload));
        assert_eq!(steps, vec![XmodemStep::Nak]);
    }

    #[test]
    fn test_header_noise_naks() {
        let mut rx = XmodemReceiver::new(XmodemMode::Crc);
        assert_eq!(rx.feed(0x7E), XmodemStep::Nak);
        assert_eq!(rx.feed(CAN), XmodemStep::Nak);
        // Still willing to take a real block afterwards.
        assert_eq!(rx.feed(SOH), XmodemStep::Continue);
    }

    #[test]
    fn test_checksum_mode() {
        let payload = [7u8; 128];
        let mut block = vec![SOH, 1, 254];
        block.extend_from_slice(&payload);
        block.push(checksum8(&payload));

        let mut rx = XmodemReceiver::new(XmodemMode::Checksum);
        let steps = feed_all(&mut rx, &block);
        assert_eq!(steps, vec![XmodemStep::Ack { total: 128 }]);
        assert_eq!(rx.feed(EOT), XmodemStep::Done { total: 128 });
    }

    #[test]
    fn test_checksum_mismatch_naks() {
        let payload = [7u8; 128];
        let mut block = vec![SOH, 1, 254];
        block.extend_from_slice(&payload);
        block.push(checksum8(&payload).wrapping_add(1));

        let mut rx = XmodemReceiver::new(XmodemMode::Checksum);
        let steps = feed_all(&mut rx, &block);
        assert_eq!(steps, vec![XmodemStep::Nak]);
    }

    #[test]
    fn test_one_k_blocks_via_stx() {
        let payload = vec![0x42u8; 1024];
        let mut block = vec![STX, 1, 254];
        block.extend_from_slice(&payload);
        let crc = crc16_xmodem(&payload);
        block.push((crc >> 8) as u8);
        block.push((crc & 0xFF) as u8);

        let mut rx = XmodemReceiver::new(XmodemMode::OneK);
        let steps = feed_all(&mut rx, &block);
        assert_eq!(steps, vec![XmodemStep::Ack { total: 1024 }]);
        assert_eq!(rx.data().len(), 1024);
    }

    #[test]
    fn test_soh_in_one_k_mode_selects_small_block() {
        // A 1K session may still carry a short final block under SOH.
        let payload = [9u8; 128];
        let mut rx = XmodemReceiver::new(XmodemMode::OneK);
        let steps = feed_all(&mut rx, &crc_block(1, &payload));
        assert_eq!(steps, vec![XmodemStep::Ack { total: 128 }]);
    }

    #[test]
    fn test_sequence_wraps_after_255() {
        let payload = [3u8; 128];
        let mut rx = XmodemReceiver::new(XmodemMode::Crc);
        for seq in 1..=255u16 {
            let steps = feed_all(&mut rx, &crc_block(seq as u8, &payload));
            assert_eq!(steps.len(), 1, "block {seq}");
            assert!(matches!(steps[0], XmodemStep::Ack { .. }), "block {seq}");
        }
        // Block number wraps to 0 after 255.
        let steps = feed_all(&mut rx, &crc_block(0, &payload));
        assert_eq!(steps, vec![XmodemStep::Ack { total: 256 * 128 }]);
    }
}
