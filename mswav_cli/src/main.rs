use std::{env::args, fs};

use rodio::{buffer::SamplesBuffer, OutputStream, Sink, Source};

use mswav::Wav;
use mswav_player::{AudioBackend, ClipPlayer};

struct AudioBackendImpl;

#[async_trait::async_trait]
impl AudioBackend for AudioBackendImpl {
    async fn play_wave(&self, channels: u16, sample_rate: u32, data: &[i16]) {
        let buffer = SamplesBuffer::new(channels as _, sample_rate as _, data);
        let duration = buffer.total_duration().unwrap();

        let (_output_stream, stream_handle) = OutputStream::try_default().unwrap();
        let sink = Sink::try_new(&stream_handle).unwrap();
        sink.append(buffer);

        tokio::time::sleep(duration).await;
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();

    let file = args().nth(1).expect("No file given");
    let data = fs::read(&file).expect("Failed to read file");

    let wav = Wav::parse(&data).expect("Failed to parse file");
    log::info!(
        "{}: {:?}, {} channel(s) at {} hz",
        file,
        wav.format.format,
        wav.format.channels,
        wav.format.sample_rate
    );

    let backend = AudioBackendImpl;
    let mut player = ClipPlayer::new(&backend);
    player.play(&file, &data).await.expect("Failed to play clip");
}
