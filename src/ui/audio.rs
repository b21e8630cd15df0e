use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::thread;

use anyhow::Context;
use log::{info, warn};

/// Plays a narration file on a background thread.
pub fn play_narration(path: &Path) {
    let path = path.to_path_buf();
    thread::spawn(move || {
        if let Err(e) = play_blocking(&path) {
            warn!("could not play {}: {e:#}", path.display());
        }
    });
}

fn play_blocking(path: &Path) -> anyhow::Result<()> {
    let (_stream, handle) =
        rodio::OutputStream::try_default().context("no audio output device")?;
    let sink = rodio::Sink::try_new(&handle).context("could not open audio sink")?;

    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let source = rodio::Decoder::new(BufReader::new(file)).context("decoding narration")?;

    info!("playing {}", path.display());
    sink.append(source);
    sink.sleep_until_end();
    Ok(())
}
