//! WAV file export functionality

use super::{apply_fade_out, ExportConfig};
use crate::hal::ChannelId;
use crate::sim::SimulatedBuzzer;
use crate::{BuzzerError, Result};
use log::info;
use std::path::Path;

/// Export the recorded output of `channel` to a WAV file with default settings
pub fn export_to_wav<P: AsRef<Path>>(
    buzzer: &SimulatedBuzzer,
    channel: ChannelId,
    output_path: P,
) -> Result<()> {
    export_to_wav_with_config(buzzer, channel, output_path, ExportConfig::default())
}

/// Export the recorded output of `channel` to a WAV file
///
/// Renders from the first command recorded on `channel` up to the buzzer's
/// current clock, so advance the clock past the end of the run first.
pub fn export_to_wav_with_config<P: AsRef<Path>>(
    buzzer: &SimulatedBuzzer,
    channel: ChannelId,
    output_path: P,
    config: ExportConfig,
) -> Result<()> {
    if config.sample_rate == 0 || !(1..=2).contains(&config.channels) {
        return Err(BuzzerError::ConfigError(format!(
            "unsupported export format: {} Hz, {} channels",
            config.sample_rate, config.channels
        )));
    }

    let mut samples = buzzer.render(channel, config.sample_rate, config.volume);
    info!(
        target: "buzzer::export",
        "rendered {} samples ({:.2}s) from {}",
        samples.len(),
        samples.len() as f32 / config.sample_rate as f32,
        channel
    );

    if config.fade_out_duration > 0.0 {
        apply_fade_out(&mut samples, config.fade_out_duration, config.sample_rate);
    }

    let final_samples = if config.channels == 2 {
        mono_to_stereo(&samples)
    } else {
        samples
    };

    write_wav_file(
        output_path.as_ref(),
        &final_samples,
        config.sample_rate,
        config.channels,
    )?;
    info!(target: "buzzer::export", "wrote {}", output_path.as_ref().display());
    Ok(())
}

/// Convert mono samples to stereo (duplicate each sample)
fn mono_to_stereo(mono: &[f32]) -> Vec<f32> {
    let mut stereo = Vec::with_capacity(mono.len() * 2);
    for &sample in mono {
        stereo.push(sample);
        stereo.push(sample);
    }
    stereo
}

/// Write samples to WAV file
fn write_wav_file(path: &Path, samples: &[f32], sample_rate: u32, channels: u16) -> Result<()> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)
        .map_err(|e| BuzzerError::AudioFileError(format!("failed to create WAV file: {}", e)))?;

    for &sample in samples {
        let sample_i16 = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer
            .write_sample(sample_i16)
            .map_err(|e| BuzzerError::AudioFileError(format!("failed to write sample: {}", e)))?;
    }

    writer
        .finalize()
        .map_err(|e| BuzzerError::AudioFileError(format!("failed to finalize WAV file: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::ToneOutput;

    #[test]
    fn test_mono_to_stereo() {
        let mono = vec![0.1, 0.2, 0.3];
        let stereo = mono_to_stereo(&mono);

        assert_eq!(stereo.len(), 6);
        assert_eq!(stereo, vec![0.1, 0.1, 0.2, 0.2, 0.3, 0.3]);
    }

    #[test]
    fn test_export_writes_readable_wav() {
        let mut buzzer = SimulatedBuzzer::new();
        buzzer.emit(ChannelId(0), 440);
        buzzer.advance(100);
        buzzer.silence(ChannelId(0));
        buzzer.advance(50);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        export_to_wav_with_config(
            &buzzer,
            ChannelId(0),
            &path,
            ExportConfig::with_sample_rate(8000).volume(1.0),
        )
        .unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, 8000);
        assert_eq!(reader.spec().channels, 1);
        // 150 ms at 8 kHz
        assert_eq!(reader.duration(), 1200);
        let samples: Vec<i16> = reader.into_samples().map(|s| s.unwrap()).collect();
        assert_eq!(samples[0], i16::MAX);
        assert_eq!(samples[1199], 0);
    }

    #[test]
    fn test_rejects_bad_format() {
        let buzzer = SimulatedBuzzer::new();
        let dir = tempfile::tempdir().unwrap();
        let config = ExportConfig {
            channels: 3,
            ..Default::default()
        };
        assert!(matches!(
            export_to_wav_with_config(&buzzer, ChannelId(0), dir.path().join("x.wav"), config),
            Err(BuzzerError::ConfigError(_))
        ));
    }
}
