//! Packet capture files, a recording decoder and replay.
//!
//! A capture file is the 8-byte magic `F1CAPv01` followed by one record per
//! packet:
//!
//! ```text
//! timestamp_ns: u64 LE | len: u32 LE | payload: [u8; len]
//! ```
//!
//! Timestamps are nanoseconds since the recorder started.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;
use std::time::Instant;

use async_trait::async_trait;
use openracing_f1_codec::{CodecResult, DecodedPacket, PacketKind};
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::decoder::PacketDecoder;
use crate::error::{ListenerError, ListenerResult};
use crate::handler::{PacketHandler, run};
use crate::source::{PacketSource, log_decode_error};

pub const CAPTURE_MAGIC: &[u8; 8] = b"F1CAPv01";

/// Packets kept per kind by a [`RecordingDecoder`] unless configured otherwise.
pub const DEFAULT_PER_KIND_LIMIT: usize = 1000;

/// Largest payload a capture record may carry.
pub const MAX_CAPTURED_PACKET: u32 = 65_535;

const RECORD_HEADER_LEN: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedPacket {
    pub timestamp_ns: u64,
    pub payload: Vec<u8>,
}

// ── Writer ───────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct CaptureWriter<W: Write> {
    inner: W,
    written: u64,
}

impl CaptureWriter<BufWriter<File>> {
    /// Create (or truncate) a capture file.
    ///
    /// # Errors
    ///
    /// I/O errors from creating the file or writing the magic.
    pub fn create(path: &Path) -> ListenerResult<Self> {
        Self::new(BufWriter::new(File::create(path)?))
    }
}

impl<W: Write> CaptureWriter<W> {
    /// # Errors
    ///
    /// I/O errors from writing the magic.
    pub fn new(mut inner: W) -> ListenerResult<Self> {
        inner.write_all(CAPTURE_MAGIC)?;
        Ok(Self { inner, written: 0 })
    }

    /// # Errors
    ///
    /// [`ListenerError::OversizedPacket`] for payloads over
    /// [`MAX_CAPTURED_PACKET`], or I/O errors.
    pub fn write_packet(&mut self, timestamp_ns: u64, payload: &[u8]) -> ListenerResult<()> {
        let len = u32::try_from(payload.len())
            .ok()
            .filter(|len| *len <= MAX_CAPTURED_PACKET)
            .ok_or(ListenerError::OversizedPacket {
                index: self.written,
                len: u32::try_from(payload.len()).unwrap_or(u32::MAX),
                limit: MAX_CAPTURED_PACKET,
            })?;
        self.inner.write_all(&timestamp_ns.to_le_bytes())?;
        self.inner.write_all(&len.to_le_bytes())?;
        self.inner.write_all(payload)?;
        self.written = self.written.saturating_add(1);
        Ok(())
    }

    pub fn packets_written(&self) -> u64 {
        self.written
    }

    /// Flush and hand back the underlying writer.
    ///
    /// # Errors
    ///
    /// I/O errors from the flush.
    pub fn finish(mut self) -> ListenerResult<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

// ── Reader ───────────────────────────────────────────────────────────────────

/// Iterates the packets of a capture file.
///
/// A clean end of input between records ends the iteration; input that ends
/// inside a record yields [`ListenerError::Truncated`] once.
#[derive(Debug)]
pub struct CaptureReader<R: Read> {
    inner: R,
    index: u64,
    done: bool,
}

impl CaptureReader<BufReader<File>> {
    /// # Errors
    ///
    /// I/O errors, or [`ListenerError::BadMagic`].
    pub fn open(path: &Path) -> ListenerResult<Self> {
        Self::new(BufReader::new(File::open(path)?))
    }
}

impl<R: Read> CaptureReader<R> {
    /// # Errors
    ///
    /// I/O errors, or [`ListenerError::BadMagic`] if the input does not
    /// start with [`CAPTURE_MAGIC`].
    pub fn new(mut inner: R) -> ListenerResult<Self> {
        let mut found = [0u8; 8];
        let filled = read_full(&mut inner, &mut found)?;
        if filled < found.len() || &found != CAPTURE_MAGIC {
            return Err(ListenerError::BadMagic { found });
        }
        Ok(Self {
            inner,
            index: 0,
            done: false,
        })
    }

    fn read_record(&mut self) -> ListenerResult<Option<CapturedPacket>> {
        let mut head = [0u8; RECORD_HEADER_LEN];
        match read_full(&mut self.inner, &mut head)? {
            0 => return Ok(None),
            RECORD_HEADER_LEN => {}
            _ => return Err(ListenerError::Truncated { index: self.index }),
        }

        let [t0, t1, t2, t3, t4, t5, t6, t7, l0, l1, l2, l3] = head;
        let timestamp_ns = u64::from_le_bytes([t0, t1, t2, t3, t4, t5, t6, t7]);
        let len = u32::from_le_bytes([l0, l1, l2, l3]);
        let oversized = ListenerError::OversizedPacket {
            index: self.index,
            len,
            limit: MAX_CAPTURED_PACKET,
        };
        if len > MAX_CAPTURED_PACKET {
            return Err(oversized);
        }
        let Ok(size) = usize::try_from(len) else {
            return Err(oversized);
        };

        let mut payload = vec![0u8; size];
        if read_full(&mut self.inner, &mut payload)? < size {
            return Err(ListenerError::Truncated { index: self.index });
        }
        self.index = self.index.saturating_add(1);
        Ok(Some(CapturedPacket {
            timestamp_ns,
            payload,
        }))
    }
}

impl<R: Read> Iterator for CaptureReader<R> {
    type Item = ListenerResult<CapturedPacket>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let next = self.read_record().transpose();
        if !matches!(next, Some(Ok(_))) {
            self.done = true;
        }
        next
    }
}

/// Fill `buf` as far as the input allows; returns the bytes read.
fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0usize;
    while let Some(rest) = buf.get_mut(filled..) {
        if rest.is_empty() {
            break;
        }
        match reader.read(rest) {
            Ok(0) => break,
            Ok(n) => filled = filled.saturating_add(n),
            Err(err) if err.kind() == ErrorKind::Interrupted => {}
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}

// ── Recording decoder ────────────────────────────────────────────────────────

/// Wraps a decoder and keeps the raw bytes of what it decodes.
///
/// Only packets that decode are kept, at most `per_kind_limit` of each
/// kind; later ones of a full kind are decoded but not stored.
#[derive(Debug)]
pub struct RecordingDecoder<D> {
    inner: D,
    per_kind_limit: usize,
    started: Instant,
    captured: Mutex<BTreeMap<PacketKind, Vec<CapturedPacket>>>,
}

impl<D: PacketDecoder> RecordingDecoder<D> {
    pub fn new(inner: D) -> Self {
        Self::with_per_kind_limit(inner, DEFAULT_PER_KIND_LIMIT)
    }

    pub fn with_per_kind_limit(inner: D, per_kind_limit: usize) -> Self {
        Self {
            inner,
            per_kind_limit,
            started: Instant::now(),
            captured: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }

    /// Stored packets per kind.
    pub fn counts(&self) -> BTreeMap<PacketKind, usize> {
        self.captured
            .lock()
            .iter()
            .map(|(kind, packets)| (*kind, packets.len()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.captured.lock().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn packets(&self, kind: PacketKind) -> Vec<CapturedPacket> {
        self.captured.lock().get(&kind).cloned().unwrap_or_default()
    }

    /// Write every stored packet in timestamp order.
    ///
    /// # Errors
    ///
    /// I/O errors from `writer`.
    pub fn write_to<W: Write>(&self, writer: W) -> ListenerResult<u64> {
        let mut all: Vec<CapturedPacket> =
            self.captured.lock().values().flatten().cloned().collect();
        all.sort_by_key(|p| p.timestamp_ns);

        let mut capture = CaptureWriter::new(writer)?;
        for packet in &all {
            capture.write_packet(packet.timestamp_ns, &packet.payload)?;
        }
        let written = capture.packets_written();
        capture.finish()?;
        Ok(written)
    }

    /// Save every stored packet to a capture file at `path`.
    ///
    /// # Errors
    ///
    /// I/O errors.
    pub fn save(&self, path: &Path) -> ListenerResult<u64> {
        let written = self.write_to(BufWriter::new(File::create(path)?))?;
        info!(path = %path.display(), packets = written, "capture saved");
        Ok(written)
    }

    fn elapsed_ns(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }
}

impl<D: PacketDecoder> PacketDecoder for RecordingDecoder<D> {
    fn decode(&self, raw: &[u8]) -> CodecResult<DecodedPacket> {
        let packet = self.inner.decode(raw)?;
        let timestamp_ns = self.elapsed_ns();
        let mut captured = self.captured.lock();
        let stored = captured.entry(packet.kind).or_default();
        if stored.len() < self.per_kind_limit {
            stored.push(CapturedPacket {
                timestamp_ns,
                payload: raw.to_vec(),
            });
            debug!(kind = %packet.kind, stored = stored.len(), "recorded packet");
        }
        Ok(packet)
    }
}

// ── Replay ───────────────────────────────────────────────────────────────────

/// Decode every packet of a capture file.
///
/// # Errors
///
/// Errors reading the capture file. Decode failures are returned per packet.
pub fn replay<D: PacketDecoder + ?Sized>(
    path: &Path,
    decoder: &D,
) -> ListenerResult<Vec<CodecResult<DecodedPacket>>> {
    let mut results = Vec::new();
    for packet in CaptureReader::open(path)? {
        let packet = packet?;
        results.push(decoder.decode(&packet.payload));
    }
    debug!(path = %path.display(), packets = results.len(), "capture replayed");
    Ok(results)
}

/// Feed every packet of a capture file through `handler`.
///
/// # Errors
///
/// Errors reading the capture file.
pub async fn replay_into<D, H>(path: &Path, decoder: D, handler: &mut H) -> ListenerResult<u64>
where
    D: PacketDecoder,
    H: PacketHandler + ?Sized,
{
    let mut source = CaptureSource::open(path, decoder)?;
    run(&mut source, handler, std::future::pending::<()>()).await
}

/// A capture file as a [`PacketSource`].
#[derive(Debug)]
pub struct CaptureSource<R: Read, D> {
    reader: CaptureReader<R>,
    decoder: D,
}

impl<D: PacketDecoder> CaptureSource<BufReader<File>, D> {
    /// # Errors
    ///
    /// See [`CaptureReader::open`].
    pub fn open(path: &Path, decoder: D) -> ListenerResult<Self> {
        Ok(Self::new(CaptureReader::open(path)?, decoder))
    }
}

impl<R: Read, D: PacketDecoder> CaptureSource<R, D> {
    pub fn new(reader: CaptureReader<R>, decoder: D) -> Self {
        Self { reader, decoder }
    }
}

#[async_trait]
impl<R, D> PacketSource for CaptureSource<R, D>
where
    R: Read + Send,
    D: PacketDecoder,
{
    async fn next_decoded(&mut self) -> ListenerResult<Option<CodecResult<DecodedPacket>>> {
        let Some(packet) = self.reader.next().transpose()? else {
            return Ok(None);
        };
        let result = self.decoder.decode(&packet.payload);
        if let Err(err) = &result {
            log_decode_error(err, packet.payload.len());
        }
        Ok(Some(result))
    }
}
