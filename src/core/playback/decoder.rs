//! core/playback/decoder.rs
//! MP3 decoding through symphonia, handed to rodio as an f32 sample stream.

use std::fs::File;
use std::path::Path;
use std::time::Duration;

use rodio::Source;

use symphonia::core::audio::{AudioBufferRef, SampleBuffer, SignalSpec};
use symphonia::core::codecs::{CodecParameters, Decoder, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader, SeekMode, SeekTo};
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::units::Time;

use crate::core::error::{Error, Result};

/// Open `path` positioned at `start`. Also returns the full track duration
/// when the container knows it.
pub(crate) fn open_source_at(
    path: &Path,
    start: Duration,
) -> Result<(SymphoniaSource, Option<Duration>)> {
    let mut reader = probe(path)?;

    let (track_id, params) = {
        let track = reader
            .default_track()
            .ok_or_else(|| Error::Decode("no supported audio track found".into()))?;
        (track.id, track.codec_params.clone())
    };
    let duration = track_duration(&params);

    if !start.is_zero() {
        reader
            .seek(
                SeekMode::Accurate,
                SeekTo::Time {
                    time: Time::from(start),
                    track_id: Some(track_id),
                },
            )
            .map_err(|e| Error::Seek(e.to_string()))?;
    }

    // Built after the seek so it never sees stale state.
    let decoder = symphonia::default::get_codecs()
        .make(&params, &DecoderOptions::default())
        .map_err(|e| Error::Decode(format!("decoder init failed: {e}")))?;

    Ok((SymphoniaSource::new(reader, decoder, track_id), duration))
}

fn probe(path: &Path) -> Result<Box<dyn FormatReader>> {
    let file = File::open(path).map_err(|e| Error::Open(e.to_string()))?;
    let mss = MediaSourceStream::new(Box::new(file), MediaSourceStreamOptions::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| Error::Decode(format!("format probe failed: {e}")))?;

    Ok(probed.format)
}

fn track_duration(params: &CodecParameters) -> Option<Duration> {
    let time = params.time_base?.calc_time(params.n_frames?);
    Some(Duration::from_secs(time.seconds) + Duration::from_secs_f64(time.frac))
}

/// Append one decoded packet to `out` as interleaved f32.
/// Returns (sample rate, channel count) of the packet.
fn interleave(decoded: AudioBufferRef<'_>, out: &mut Vec<f32>) -> (u32, u16) {
    let spec = SignalSpec::new(decoded.spec().rate, decoded.spec().channels.clone());
    let format = (spec.rate, spec.channels.count() as u16);

    let mut samples = SampleBuffer::<f32>::new(decoded.frames() as u64, spec);
    samples.copy_interleaved_ref(decoded);
    out.extend_from_slice(samples.samples());

    format
}

pub(crate) struct SymphoniaSource {
    reader: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,

    sample_rate: u32,
    channels: u16,

    /// Samples of the last decoded packet, consumed from `cursor`.
    pending: Vec<f32>,
    cursor: usize,
    done: bool,
}

impl SymphoniaSource {
    fn new(reader: Box<dyn FormatReader>, decoder: Box<dyn Decoder>, track_id: u32) -> Self {
        let mut source = Self {
            reader,
            decoder,
            track_id,
            sample_rate: 44_100,
            channels: 2,
            pending: Vec::new(),
            cursor: 0,
            done: false,
        };

        // rodio reads the format before the first sample.
        if let Err(e) = source.refill() {
            log::warn!("{e}");
            source.done = true;
        }

        source
    }

    /// Decode the next packet of our track into `pending`.
    /// Ok(false) once the stream is exhausted.
    fn refill(&mut self) -> Result<bool> {
        self.pending.clear();
        self.cursor = 0;

        while !self.done {
            let packet = match self.reader.next_packet() {
                Ok(p) => p,
                // symphonia reports end of stream as an io error.
                Err(SymphoniaError::IoError(_)) => {
                    self.done = true;
                    break;
                }
                Err(SymphoniaError::ResetRequired) => {
                    self.decoder.reset();
                    continue;
                }
                Err(e) => return Err(Error::Decode(format!("read error: {e}"))),
            };

            if packet.track_id() != self.track_id {
                continue;
            }

            match self.decoder.decode(&packet) {
                Ok(decoded) => {
                    let (rate, channels) = interleave(decoded, &mut self.pending);
                    self.sample_rate = rate;
                    self.channels = channels;
                    return Ok(true);
                }
                Err(SymphoniaError::DecodeError(e)) => log::debug!("skipping bad packet: {e}"),
                Err(SymphoniaError::ResetRequired) => self.decoder.reset(),
                Err(SymphoniaError::IoError(_)) => self.done = true,
                Err(e) => return Err(Error::Decode(e.to_string())),
            }
        }

        Ok(false)
    }
}

impl Iterator for SymphoniaSource {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        while self.cursor >= self.pending.len() {
            match self.refill() {
                Ok(true) => {}
                Ok(false) => return None,
                Err(e) => {
                    log::warn!("{e}");
                    self.done = true;
                    return None;
                }
            }
        }

        let sample = self.pending[self.cursor];
        self.cursor += 1;
        Some(sample)
    }
}

impl Source for SymphoniaSource {
    // Packets may change format; let rodio re-check every sample.
    fn current_span_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}
