/// Sound engine: procedural 8-bit style effects via rodio, one per kind of
/// `GameEvent`.
///
/// Every buffer is synthesized once at startup into an in-memory WAV and
/// played fire-and-forget through a detached Sink.
///
/// Without the "sound" feature the stub engine does nothing.

use girder::sim::event::GameEvent;

/// Effect identifiers. Several events share one effect.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Sfx {
    Jump,
    Bonus,
    Smash,
    Pickup,
    Shot,
    Throw,
    Hit,
    Death,
    Win,
}

const SFX_COUNT: usize = 9;

impl Sfx {
    /// Sound for an event, if it has one.
    pub fn for_event(event: &GameEvent) -> Option<Sfx> {
        match event {
            GameEvent::Jumped => Some(Sfx::Jump),
            GameEvent::BarrelCleared { .. } => Some(Sfx::Bonus),
            GameEvent::BarrelSmashed { .. } | GameEvent::MonkeyKilled { .. } => Some(Sfx::Smash),
            GameEvent::WeaponPicked { .. } => Some(Sfx::Pickup),
            GameEvent::ShotFired { .. } => Some(Sfx::Shot),
            GameEvent::BananaThrown { .. } => Some(Sfx::Throw),
            GameEvent::BossHit { .. } => Some(Sfx::Hit),
            GameEvent::PlayerKilled { .. } | GameEvent::TimeUp => Some(Sfx::Death),
            GameEvent::LevelWon => Some(Sfx::Win),
            GameEvent::ProjectileExpired { .. } => None,
        }
    }
}

#[cfg(feature = "sound")]
mod inner {
    use std::f32::consts::TAU;
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use super::{Sfx, SFX_COUNT};

    const SAMPLE_RATE: u32 = 22050;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        /// Indexed by `Sfx as usize`.
        buffers: [Arc<Vec<u8>>; SFX_COUNT],
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    tracing::warn!(error = %e, "no audio output, sound disabled");
                    return None;
                }
            };

            let buffers = [
                Sfx::Jump, Sfx::Bonus, Sfx::Smash, Sfx::Pickup, Sfx::Shot,
                Sfx::Throw, Sfx::Hit, Sfx::Death, Sfx::Win,
            ]
            .map(|sfx| Arc::new(make_wav(&synthesize(sfx))));

            Some(SoundEngine { _stream: stream, handle, buffers })
        }

        pub fn play(&self, sfx: Sfx) {
            let buf = &self.buffers[sfx as usize];
            let Ok(sink) = Sink::try_new(&self.handle) else { return };
            if let Ok(src) = rodio::Decoder::new(Cursor::new(buf.as_ref().clone())) {
                sink.append(src);
                sink.detach();
            }
        }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators (mono f32 samples)
    // ════════════════════════════════════════════════════════════

    fn synthesize(sfx: Sfx) -> Vec<f32> {
        match sfx {
            Sfx::Jump => sweep(300.0, 700.0, 0.10, 0.25),
            Sfx::Bonus => notes(&[(1319.0, 0.05), (1760.0, 0.08)], 0.25),
            Sfx::Smash => noise_burst(0.14, 160.0, 0.35),
            Sfx::Pickup => notes(&[(1047.0, 0.045), (1319.0, 0.045), (1568.0, 0.06)], 0.25),
            Sfx::Shot => sweep(1400.0, 500.0, 0.07, 0.2),
            Sfx::Throw => sweep(500.0, 350.0, 0.08, 0.15),
            Sfx::Hit => noise_burst(0.09, 90.0, 0.4),
            Sfx::Death => notes(&[(440.0, 0.12), (370.0, 0.12), (311.0, 0.12), (261.0, 0.2)], 0.3),
            Sfx::Win => notes(&[(523.0, 0.1), (659.0, 0.1), (784.0, 0.1), (1047.0, 0.3)], 0.3),
        }
    }

    /// Note sequence, sine plus a third harmonic for a square-ish edge.
    fn notes(seq: &[(f32, f32)], volume: f32) -> Vec<f32> {
        let mut samples = Vec::new();
        for &(freq, dur) in seq {
            let n = (SAMPLE_RATE as f32 * dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32).powf(0.6);
                let wave = (t * freq * TAU).sin() * 0.75 + (t * freq * 3.0 * TAU).sin() * 0.25;
                samples.push(wave * env * volume);
            }
        }
        samples
    }

    /// Linear pitch slide from `from` to `to` Hz.
    fn sweep(from: f32, to: f32, duration: f32, volume: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut phase = 0.0_f32;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                phase += (from + (to - from) * t) * TAU / SAMPLE_RATE as f32;
                phase.sin() * (1.0 - t) * volume
            })
            .collect()
    }

    /// Noise mixed with a low tone, fast decay.
    fn noise_burst(duration: f32, tone: f32, volume: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut rng: u32 = 0x2545_f491;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                rng = rng.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                let low = (i as f32 / SAMPLE_RATE as f32 * tone * TAU).sin();
                (noise * 0.6 + low * 0.4) * (1.0 - t).powi(2) * volume
            })
            .collect()
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder: 16-bit PCM mono
    // ════════════════════════════════════════════════════════════

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let channels: u16 = 1;
        let bits: u16 = 16;
        let byte_rate = SAMPLE_RATE * u32::from(channels) * u32::from(bits) / 8;
        let block_align = channels * bits / 8;
        let data_size = samples.len() as u32 * 2;

        let mut buf = Vec::with_capacity(44 + data_size as usize);
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_size).to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());
        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }
        buf
    }
}

// ════════════════════════════════════════════════════════════
//  Public API (no-ops when the sound feature is off)
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play(&self, _sfx: Sfx) {}
}

impl SoundEngine {
    /// Play the effect for each event, once per effect per tick.
    pub fn play_events(&self, events: &[GameEvent]) {
        let mut played = [false; SFX_COUNT];
        for sfx in events.iter().filter_map(Sfx::for_event) {
            if !played[sfx as usize] {
                played[sfx as usize] = true;
                self.play(sfx);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use girder::sim::event::DeathCause;

    #[test]
    fn expiry_is_silent() {
        let event = GameEvent::ProjectileExpired {
            kind: girder::domain::projectile::ProjectileKind::Bullet,
        };
        assert_eq!(Sfx::for_event(&event), None);
    }

    #[test]
    fn every_loss_plays_the_death_sound() {
        assert_eq!(Sfx::for_event(&GameEvent::TimeUp), Some(Sfx::Death));
        assert_eq!(
            Sfx::for_event(&GameEvent::PlayerKilled { cause: DeathCause::Banana }),
            Some(Sfx::Death)
        );
    }
}
