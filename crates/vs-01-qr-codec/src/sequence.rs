//! # Sequence Assembler
//!
//! Folds classified frames into a payload. The first frame fixes the kind
//! of the sequence; every later frame must be of the same kind.

use crate::error::CodecError;
use crate::frame::{FountainFrame, Frame, LegacyFrame, ShareEnvelope};
use raptorq::{Decoder, EncodingPacket, ObjectTransmissionInformation};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Result of a completed sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assembled {
    /// Raw payload bytes (static frame, fountain-decoded or joined legacy parts).
    Payload(Vec<u8>),
    /// Enough banana split shares are present; recovery needs a passphrase.
    BananaSplit(BananaSplitSet),
}

/// Shares collected for one split secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BananaSplitSet {
    pub title: String,
    pub required: u8,
    pub shares: BTreeSet<String>,
}

struct FountainAssembly {
    size: u32,
    decoder: Decoder,
    /// (source block, symbol id) pairs already fed to the decoder.
    symbols: BTreeSet<(u8, u32)>,
}

impl fmt::Debug for FountainAssembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FountainAssembly")
            .field("size", &self.size)
            .field("symbols", &self.symbols.len())
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
struct LegacyAssembly {
    total: u16,
    parts: BTreeMap<u16, Vec<u8>>,
}

impl LegacyAssembly {
    fn is_complete(&self) -> bool {
        self.parts.len() >= usize::from(self.total)
    }

    fn join(self) -> Vec<u8> {
        self.parts.into_values().flatten().collect()
    }
}

#[derive(Debug)]
struct ShareAssembly {
    first: ShareEnvelope,
    shares: BTreeSet<String>,
}

#[derive(Debug, Default)]
enum InProgress {
    #[default]
    None,
    Fountain(FountainAssembly),
    Legacy(LegacyAssembly),
    Banana(ShareAssembly),
}

impl InProgress {
    fn kind(&self) -> &'static str {
        match self {
            InProgress::None => "empty",
            InProgress::Fountain(_) => "fountain",
            InProgress::Legacy(_) => "legacy",
            InProgress::Banana(_) => "banana split",
        }
    }
}

/// Incremental assembler over one frame sequence.
#[derive(Debug, Default)]
pub struct SequenceAssembler {
    state: InProgress,
}

impl SequenceAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one frame. Returns `Some` once the sequence is complete.
    pub fn push(&mut self, frame: Frame) -> Result<Option<Assembled>, CodecError> {
        match frame {
            Frame::Fountain(fountain) => self.push_fountain(fountain),
            Frame::Static(bytes) => match self.state {
                InProgress::None => Ok(Some(Assembled::Payload(bytes))),
                _ => Err(self.interrupted_by("static")),
            },
            Frame::Legacy(legacy) => self.push_legacy(legacy),
            Frame::BananaShare(share) => self.push_share(share),
        }
    }

    fn interrupted_by(&self, found: &'static str) -> CodecError {
        CodecError::MixedSequence {
            expected: self.state.kind(),
            found,
        }
    }

    fn push_fountain(&mut self, frame: FountainFrame) -> Result<Option<Assembled>, CodecError> {
        let symbol_len = u16::try_from(frame.symbol_len())
            .map_err(|_| CodecError::OversizedSymbol(frame.symbol_len()))?;

        if let InProgress::None = self.state {
            let config =
                ObjectTransmissionInformation::with_defaults(u64::from(frame.size), symbol_len);
            self.state = InProgress::Fountain(FountainAssembly {
                size: frame.size,
                decoder: Decoder::new(config),
                symbols: BTreeSet::new(),
            });
        }
        let assembly = match &mut self.state {
            InProgress::Fountain(assembly) => assembly,
            _ => return Err(self.interrupted_by("fountain")),
        };

        if assembly.size != frame.size {
            return Err(CodecError::ConflictingFountainSizes {
                expected: assembly.size,
                found: frame.size,
            });
        }

        let packet = EncodingPacket::deserialize(&frame.packet);
        let id = packet.payload_id();
        if !assembly
            .symbols
            .insert((id.source_block_number(), id.encoding_symbol_id()))
        {
            return Ok(None);
        }
        match assembly.decoder.decode(packet) {
            Some(payload) => {
                self.state = InProgress::None;
                Ok(Some(Assembled::Payload(payload)))
            }
            None => Ok(None),
        }
    }

    fn push_legacy(&mut self, frame: LegacyFrame) -> Result<Option<Assembled>, CodecError> {
        if frame.total == 0 {
            return Err(CodecError::EmptyLegacyTotal);
        }
        if frame.index >= frame.total {
            return Err(CodecError::IndexOutOfRange {
                index: frame.index,
                total: frame.total,
            });
        }

        if let InProgress::None = self.state {
            self.state = InProgress::Legacy(LegacyAssembly {
                total: frame.total,
                parts: BTreeMap::new(),
            });
        }
        let assembly = match &mut self.state {
            InProgress::Legacy(assembly) => assembly,
            _ => return Err(self.interrupted_by("legacy")),
        };

        if assembly.total != frame.total {
            return Err(CodecError::ConflictingLengths {
                expected: assembly.total,
                found: frame.total,
            });
        }
        if let Some(existing) = assembly.parts.get(&frame.index) {
            if *existing != frame.data {
                return Err(CodecError::DuplicateIndex(frame.index));
            }
            return Ok(None);
        }
        assembly.parts.insert(frame.index, frame.data);

        if !assembly.is_complete() {
            return Ok(None);
        }
        match std::mem::take(&mut self.state) {
            InProgress::Legacy(done) => Ok(Some(Assembled::Payload(done.join()))),
            _ => Ok(None),
        }
    }

    fn push_share(&mut self, share: ShareEnvelope) -> Result<Option<Assembled>, CodecError> {
        share.validate()?;

        if let InProgress::None = self.state {
            self.state = InProgress::Banana(ShareAssembly {
                first: share.clone(),
                shares: BTreeSet::new(),
            });
        }
        let assembly = match &mut self.state {
            InProgress::Banana(assembly) => assembly,
            _ => return Err(self.interrupted_by("banana split")),
        };

        if !assembly.first.same_set(&share) {
            return Err(CodecError::ConflictingShares);
        }
        assembly.shares.insert(share.data);

        if assembly.shares.len() < usize::from(assembly.first.required) {
            return Ok(None);
        }
        match std::mem::take(&mut self.state) {
            InProgress::Banana(done) => Ok(Some(Assembled::BananaSplit(BananaSplitSet {
                title: done.first.title,
                required: done.first.required,
                shares: done.shares,
            }))),
            _ => Ok(None),
        }
    }
}
