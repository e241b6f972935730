use anyhow::Result;
use bevy_ecs::system::Resource;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample};
use crossbeam_channel::{Receiver, Sender, bounded};
use fundsp::hacker32::*;
use log::{debug, error};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crate::simulation::GameEvent;

pub const DEFAULT_TONE_VOLUME: f32 = 0.08;

// Level the gain ramp decays to by the end of a tone
const RAMP_FLOOR: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

/// A single oscillator beep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency: f32,
    pub waveform: Waveform,
    pub duration: f32, // seconds
    pub volume: f32,
}

impl Tone {
    #[must_use]
    pub fn new(frequency: f32, waveform: Waveform, duration: f32) -> Self {
        Self {
            frequency,
            waveform,
            duration,
            volume: DEFAULT_TONE_VOLUME,
        }
    }
}

/// The tone that accompanies a game event, if any
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn tone_for(event: &GameEvent) -> Option<Tone> {
    match *event {
        GameEvent::Started => None,
        GameEvent::Dropped => Some(Tone::new(350.0, Waveform::Sine, 0.2)),
        GameEvent::Perfect { streak_before, .. } => Some(Tone::new(
            600.0 + streak_before as f32 * 60.0,
            Waveform::Triangle,
            0.15,
        )),
        GameEvent::Partial { .. } => Some(Tone::new(280.0, Waveform::Square, 0.1)),
        GameEvent::Collapsed { .. } => Some(Tone::new(120.0, Waveform::Sawtooth, 0.6)),
    }
}

// Command to control the audio thread
enum AudioCommand {
    Play(Tone),
    SetVolume(f32), // 0.0 to 1.0
}

#[derive(Resource)]
pub struct AudioState {
    sender: Option<Sender<AudioCommand>>,
    available: Arc<AtomicBool>,
    sound_enabled: bool,
    volume: f32,
}

impl AudioState {
    pub fn new() -> Self {
        let (sender, receiver) = bounded(64);
        let available = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&available);

        // Start the audio thread
        let spawned = thread::Builder::new()
            .name("audio".into())
            .spawn(move || {
                if let Err(e) = run_audio_thread(receiver) {
                    error!("Audio thread error: {e}");
                    flag.store(false, Ordering::Relaxed);
                }
            });
        if let Err(e) = spawned {
            error!("Could not start audio thread: {e}");
            available.store(false, Ordering::Relaxed);
        }

        Self {
            sender: Some(sender),
            available,
            sound_enabled: true,
            volume: 1.0,
        }
    }

    /// An audio state with no backend; every tone is dropped
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            sender: None,
            available: Arc::new(AtomicBool::new(false)),
            sound_enabled: true,
            volume: 1.0,
        }
    }

    /// Queues a tone without blocking. Returns false when muted or when
    /// there is no working backend.
    pub fn play_tone(&self, tone: Tone) -> bool {
        if !self.sound_enabled || !self.is_audio_available() {
            return false;
        }
        match &self.sender {
            Some(sender) => sender.try_send(AudioCommand::Play(tone)).is_ok(),
            None => false,
        }
    }

    pub fn is_audio_available(&self) -> bool {
        self.sender.is_some() && self.available.load(Ordering::Relaxed)
    }

    pub fn is_sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn toggle_sound(&mut self) {
        self.sound_enabled = !self.sound_enabled;
        debug!("Sound enabled: {}", self.sound_enabled);
    }

    pub fn get_volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) {
        // Clamp volume between 0.0 and 1.0
        self.volume = volume.clamp(0.0, 1.0);

        // Send volume change to audio thread
        if let Some(sender) = &self.sender {
            let _ = sender.try_send(AudioCommand::SetVolume(self.volume));
        }
    }
}

impl Default for AudioState {
    fn default() -> Self {
        Self::new()
    }
}

fn run_audio_thread(receiver: Receiver<AudioCommand>) -> Result<()> {
    // Get the default audio device
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| anyhow::anyhow!("No audio output device found"))?;
    let config = device.default_output_config()?;
    let sample_rate = f64::from(config.sample_rate().0);

    // Finished voices are handed to the stream callback ready to play
    let (voice_sender, voice_receiver) = bounded::<Voice>(64);

    let _stream = match config.sample_format() {
        cpal::SampleFormat::F32 => run_audio_stream::<f32>(&device, &config.into(), voice_receiver)?,
        cpal::SampleFormat::I16 => run_audio_stream::<i16>(&device, &config.into(), voice_receiver)?,
        cpal::SampleFormat::U16 => run_audio_stream::<u16>(&device, &config.into(), voice_receiver)?,
        _ => return Err(anyhow::anyhow!("Unsupported audio format")),
    };

    let mut volume = 1.0f32;

    // Keep the thread alive and process commands until the sender goes away
    while let Ok(command) = receiver.recv() {
        match command {
            AudioCommand::Play(tone) => {
                let voice = Voice::new(&tone, volume, sample_rate);
                let _ = voice_sender.try_send(voice);
            }
            AudioCommand::SetVolume(new_volume) => volume = new_volume,
        }
    }

    Ok(())
}

// A tone being rendered, with the number of samples it has left
struct Voice {
    unit: Box<dyn AudioUnit>,
    remaining: u64,
}

impl Voice {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn new(tone: &Tone, master: f32, sample_rate: f64) -> Self {
        let mut unit = create_tone(tone, master);
        unit.set_sample_rate(sample_rate);
        Self {
            unit,
            remaining: (f64::from(tone.duration) * sample_rate).ceil() as u64,
        }
    }
}

fn run_audio_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    voice_receiver: Receiver<Voice>,
) -> Result<cpal::Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = config.channels as usize;
    let mut voices: Vec<Voice> = Vec::new();

    let mut next_value = move || {
        while let Ok(voice) = voice_receiver.try_recv() {
            voices.push(voice);
        }

        let mut sample = 0.0;
        for voice in &mut voices {
            sample += voice.unit.get_mono();
            voice.remaining = voice.remaining.saturating_sub(1);
        }
        voices.retain(|voice| voice.remaining > 0);

        sample.clamp(-1.0, 1.0)
    };

    let err_fn = |err| error!("Error in audio stream: {err}");

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            for frame in data.chunks_mut(channels) {
                let value = T::from_sample(next_value());
                for sample in frame.iter_mut() {
                    *sample = value;
                }
            }
        },
        err_fn,
        None,
    )?;

    stream.play()?;

    Ok(stream)
}

/// Gain at time `t` of a tone starting at `start` and ramping exponentially
/// down to the floor over `duration`; silent afterwards.
#[must_use]
pub fn ramp_gain(start: f32, duration: f32, t: f32) -> f32 {
    if t >= duration || start <= 0.0 {
        return 0.0;
    }
    if start <= RAMP_FLOOR {
        return start * (1.0 - t / duration);
    }
    start * (RAMP_FLOOR / start).powf(t / duration)
}

// Build the oscillator for a tone with its decaying envelope
fn create_tone(tone: &Tone, master: f32) -> Box<dyn AudioUnit> {
    let start = tone.volume * master;
    let duration = tone.duration;
    let env = envelope(move |t| ramp_gain(start, duration, t));

    match tone.waveform {
        Waveform::Sine => Box::new(sine_hz(tone.frequency) * env),
        Waveform::Square => Box::new(square_hz(tone.frequency) * env),
        Waveform::Triangle => Box::new(triangle_hz(tone.frequency) * env),
        Waveform::Sawtooth => Box::new(saw_hz(tone.frequency) * env),
    }
}

/// Renders a tone offline into mono samples. Used to check the synth
/// without an audio device.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn render_tone(tone: &Tone, sample_rate: f64) -> Vec<f32> {
    let mut voice = Voice::new(tone, 1.0, sample_rate);
    let mut samples = Vec::with_capacity(voice.remaining as usize);
    while voice.remaining > 0 {
        samples.push(voice.unit.get_mono());
        voice.remaining -= 1;
    }
    samples
}
