//! Timbre feature extraction from WAV recordings.
//!
//! A recording is reduced to a fixed-length vector of mel-cepstral
//! coefficients averaged over frames. Two recordings of the same speaker
//! land close together under Euclidean distance; the authenticator compares
//! that distance against a configured threshold.

use std::f32::consts::PI;
use std::path::Path;

/// Length of the feature vector
pub const FEATURE_DIM: usize = 13;

const FRAME_LEN: usize = 512;
const HOP_LEN: usize = 256;
const MEL_FILTERS: usize = 26;

/// Read a 16-bit PCM WAV file, returning samples in [-1, 1] and the sample
/// rate. Multi-channel audio keeps the first channel.
pub fn read_wav_mono(path: &Path) -> Result<(Vec<f32>, u32), String> {
    let bytes = std::fs::read(path).map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    parse_wav(&bytes)
}

fn parse_wav(bytes: &[u8]) -> Result<(Vec<f32>, u32), String> {
    if bytes.len() < 12 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return Err("not a RIFF/WAVE file".to_string());
    }

    let mut channels = 0u16;
    let mut sample_rate = 0u32;
    let mut samples: Option<Vec<f32>> = None;

    let mut pos = 12;
    while pos + 8 <= bytes.len() {
        let id = &bytes[pos..pos + 4];
        let size = u32::from_le_bytes([
            bytes[pos + 4],
            bytes[pos + 5],
            bytes[pos + 6],
            bytes[pos + 7],
        ]) as usize;
        let body = pos + 8;
        if body + size > bytes.len() {
            return Err("truncated chunk".to_string());
        }

        match id {
            b"fmt " => {
                if size < 16 {
                    return Err("fmt chunk too short".to_string());
                }
                let format = u16::from_le_bytes([bytes[body], bytes[body + 1]]);
                channels = u16::from_le_bytes([bytes[body + 2], bytes[body + 3]]);
                sample_rate = u32::from_le_bytes([
                    bytes[body + 4],
                    bytes[body + 5],
                    bytes[body + 6],
                    bytes[body + 7],
                ]);
                let bits = u16::from_le_bytes([bytes[body + 14], bytes[body + 15]]);
                if format != 1 || bits != 16 {
                    return Err(format!("unsupported WAV encoding (format {format}, {bits}-bit)"));
                }
                if channels == 0 {
                    return Err("fmt chunk declares zero channels".to_string());
                }
            }
            b"data" => {
                if channels == 0 {
                    return Err("data chunk before fmt".to_string());
                }
                let stride = 2 * channels as usize;
                let mut out = Vec::with_capacity(size / stride);
                let mut i = body;
                while i + 2 <= body + size {
                    let v = i16::from_le_bytes([bytes[i], bytes[i + 1]]);
                    out.push(v as f32 / 32768.0);
                    i += stride;
                }
                samples = Some(out);
            }
            _ => {}
        }

        // Chunks are word-aligned
        pos = body + size + (size & 1);
    }

    match samples {
        Some(s) if !s.is_empty() => Ok((s, sample_rate)),
        _ => Err("no audio data".to_string()),
    }
}

/// Extract the fixed-length timbre feature vector.
pub fn timbre_features(samples: &[f32], sample_rate: u32) -> Vec<f32> {
    let filters = mel_filterbank(sample_rate);
    let mut sums = vec![0.0f32; FEATURE_DIM];
    let mut frames = 0usize;

    for frame in frame_iter(samples) {
        let power = power_spectrum(&frame);
        let mut log_energies = [0.0f32; MEL_FILTERS];
        for (m, filter) in filters.iter().enumerate() {
            let energy: f32 = filter.iter().map(|&(bin, w)| power[bin] * w).sum();
            log_energies[m] = (energy + 1e-10).ln();
        }
        let coeffs = dct(&log_energies);
        for (s, c) in sums.iter_mut().zip(coeffs.iter()) {
            *s += c;
        }
        frames += 1;
    }

    if frames > 0 {
        for s in &mut sums {
            *s /= frames as f32;
        }
    }
    sums
}

pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

/// Hamming-windowed frames of FRAME_LEN samples, HOP_LEN apart. Short
/// input yields one zero-padded frame.
fn frame_iter(samples: &[f32]) -> Vec<[f32; FRAME_LEN]> {
    let window: Vec<f32> = (0..FRAME_LEN)
        .map(|n| 0.54 - 0.46 * (2.0 * PI * n as f32 / (FRAME_LEN - 1) as f32).cos())
        .collect();

    let mut frames = Vec::new();
    if samples.len() < FRAME_LEN {
        let mut frame = [0.0f32; FRAME_LEN];
        for (i, &s) in samples.iter().enumerate() {
            frame[i] = s * window[i];
        }
        frames.push(frame);
        return frames;
    }

    let mut start = 0;
    while start + FRAME_LEN <= samples.len() {
        let mut frame = [0.0f32; FRAME_LEN];
        for i in 0..FRAME_LEN {
            frame[i] = samples[start + i] * window[i];
        }
        frames.push(frame);
        start += HOP_LEN;
    }
    frames
}

/// Power spectrum over the first FRAME_LEN/2 + 1 bins.
fn power_spectrum(frame: &[f32; FRAME_LEN]) -> Vec<f32> {
    let mut buf: Vec<(f32, f32)> = frame.iter().map(|&s| (s, 0.0)).collect();
    fft(&mut buf);
    buf[..FRAME_LEN / 2 + 1]
        .iter()
        .map(|&(re, im)| (re * re + im * im) / FRAME_LEN as f32)
        .collect()
}

/// Iterative in-place radix-2 FFT. Length must be a power of two.
fn fft(buf: &mut [(f32, f32)]) {
    let n = buf.len();

    let mut j = 0;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j |= bit;
        if i < j {
            buf.swap(i, j);
        }
    }

    let mut len = 2;
    while len <= n {
        let ang = -2.0 * PI / len as f32;
        let (step_re, step_im) = (ang.cos(), ang.sin());
        let mut base = 0;
        while base < n {
            let (mut w_re, mut w_im) = (1.0f32, 0.0f32);
            for k in 0..len / 2 {
                let (u_re, u_im) = buf[base + k];
                let (v_re, v_im) = buf[base + k + len / 2];
                let t_re = v_re * w_re - v_im * w_im;
                let t_im = v_re * w_im + v_im * w_re;
                buf[base + k] = (u_re + t_re, u_im + t_im);
                buf[base + k + len / 2] = (u_re - t_re, u_im - t_im);
                let next_re = w_re * step_re - w_im * step_im;
                w_im = w_re * step_im + w_im * step_re;
                w_re = next_re;
            }
            base += len;
        }
        len <<= 1;
    }
}

/// Triangular mel filters as sparse (bin, weight) lists.
fn mel_filterbank(sample_rate: u32) -> Vec<Vec<(usize, f32)>> {
    let mel = |f: f32| 2595.0 * (1.0 + f / 700.0).log10();
    let inv_mel = |m: f32| 700.0 * (10f32.powf(m / 2595.0) - 1.0);

    let nyquist = sample_rate as f32 / 2.0;
    let max_mel = mel(nyquist);
    let bins = FRAME_LEN / 2;

    let centers: Vec<usize> = (0..MEL_FILTERS + 2)
        .map(|i| {
            let hz = inv_mel(max_mel * i as f32 / (MEL_FILTERS + 1) as f32);
            ((hz / nyquist) * bins as f32).round() as usize
        })
        .collect();

    (0..MEL_FILTERS)
        .map(|m| {
            let (lo, mid, hi) = (centers[m], centers[m + 1], centers[m + 2]);
            let mut filter = Vec::new();
            for bin in lo..=hi.min(bins) {
                let w = if bin < mid && mid > lo {
                    (bin - lo) as f32 / (mid - lo) as f32
                } else if bin >= mid && hi > mid {
                    (hi - bin) as f32 / (hi - mid) as f32
                } else {
                    1.0
                };
                if w > 0.0 {
                    filter.push((bin, w));
                }
            }
            filter
        })
        .collect()
}

/// DCT-II of the log filter energies, truncated to FEATURE_DIM.
fn dct(input: &[f32; MEL_FILTERS]) -> [f32; FEATURE_DIM] {
    let mut out = [0.0f32; FEATURE_DIM];
    for (k, coeff) in out.iter_mut().enumerate() {
        *coeff = input
            .iter()
            .enumerate()
            .map(|(m, &x)| x * (PI * k as f32 * (m as f32 + 0.5) / MEL_FILTERS as f32).cos())
            .sum();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal 16-bit mono PCM WAV encoder for tests
    fn wav_bytes(samples: &[i16], sample_rate: u32) -> Vec<u8> {
        let data_len = (samples.len() * 2) as u32;
        let mut out = Vec::new();
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data_len).to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes()); // PCM
        out.extend_from_slice(&1u16.to_le_bytes()); // mono
        out.extend_from_slice(&sample_rate.to_le_bytes());
        out.extend_from_slice(&(sample_rate * 2).to_le_bytes()); // byte rate
        out.extend_from_slice(&2u16.to_le_bytes()); // block align
        out.extend_from_slice(&16u16.to_le_bytes()); // bits
        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_len.to_le_bytes());
        for s in samples {
            out.extend_from_slice(&s.to_le_bytes());
        }
        out
    }

    fn sine(freq: f32, secs: f32, sample_rate: u32) -> Vec<i16> {
        let n = (secs * sample_rate as f32) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                ((2.0 * PI * freq * t).sin() * 12000.0) as i16
            })
            .collect()
    }

    #[test]
    fn parses_generated_wav() {
        let samples = sine(440.0, 0.5, 16000);
        let bytes = wav_bytes(&samples, 16000);
        let (parsed, rate) = parse_wav(&bytes).expect("parse");
        assert_eq!(rate, 16000);
        assert_eq!(parsed.len(), samples.len());
        assert!((parsed[10] - samples[10] as f32 / 32768.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_non_wav_input() {
        assert!(parse_wav(b"definitely not audio").is_err());
        assert!(parse_wav(b"RIFF\0\0\0\0MIDI").is_err());
    }

    #[test]
    fn feature_vector_has_fixed_length() {
        let samples: Vec<f32> = sine(300.0, 0.3, 16000)
            .iter()
            .map(|&s| s as f32 / 32768.0)
            .collect();
        assert_eq!(timbre_features(&samples, 16000).len(), FEATURE_DIM);

        // Even degenerate input yields a full-length vector
        assert_eq!(timbre_features(&[0.0; 10], 16000).len(), FEATURE_DIM);
    }

    #[test]
    fn identical_recordings_have_zero_distance() {
        let samples: Vec<f32> = sine(440.0, 0.5, 16000)
            .iter()
            .map(|&s| s as f32 / 32768.0)
            .collect();
        let a = timbre_features(&samples, 16000);
        let b = timbre_features(&samples, 16000);
        assert_eq!(euclidean_distance(&a, &b), 0.0);
    }

    #[test]
    fn different_tones_are_separated() {
        let to_f32 = |v: Vec<i16>| -> Vec<f32> { v.iter().map(|&s| s as f32 / 32768.0).collect() };
        let low = timbre_features(&to_f32(sine(220.0, 0.5, 16000)), 16000);
        let high = timbre_features(&to_f32(sine(3000.0, 0.5, 16000)), 16000);
        assert!(euclidean_distance(&low, &high) > 0.5);
    }
}
