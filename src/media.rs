use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result, bail};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackStatus {
    Stopped,
    Playing,
    Paused,
    Ended,
}

/// What the overlay needs from a playback backend.
pub trait MediaPlayer {
    fn play(&mut self);
    fn pause(&mut self);
    fn status(&self) -> PlaybackStatus;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Video,
}

impl MediaKind {
    fn label(self) -> &'static str {
        match self {
            MediaKind::Audio => "Audio",
            MediaKind::Video => "Video",
        }
    }

    // Video overlays stay up after the clip finishes.
    fn removes_overlay_on_end(self) -> bool {
        matches!(self, MediaKind::Audio)
    }
}

pub struct MediaSession {
    kind: MediaKind,
    name: String,
    player: Box<dyn MediaPlayer>,
    overlay_visible: bool,
    ended: bool,
}

impl MediaSession {
    pub fn new(
        kind: MediaKind,
        name: impl Into<String>,
        player: Box<dyn MediaPlayer>,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            player,
            overlay_visible: true,
            ended: false,
        }
    }

    pub fn toggle(&mut self) {
        if self.player.status() == PlaybackStatus::Playing {
            self.player.pause();
        } else {
            self.player.play();
        }
    }

    pub fn button_label(&self) -> &'static str {
        if self.player.status() == PlaybackStatus::Playing {
            "Pause"
        } else {
            "Play"
        }
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn status(&self) -> PlaybackStatus {
        self.player.status()
    }
    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    /// Returns `true` the first time the player is seen at its end.
    fn poll_ended(&mut self) -> bool {
        if self.ended || self.player.status() != PlaybackStatus::Ended {
            return false;
        }
        self.ended = true;
        if self.kind.removes_overlay_on_end() {
            self.overlay_visible = false;
        }
        true
    }
}

/// Audio and video sessions layered over the canvas, one slot each.
#[derive(Default)]
pub struct MediaOverlay {
    audio: Option<MediaSession>,
    video: Option<MediaSession>,
    description: String,
}

impl MediaOverlay {
    pub fn open_audio(&mut self, path: &Path) -> Result<()> {
        let player = AudioPlayer::open(path)?;
        self.start(MediaSession::new(
            MediaKind::Audio,
            file_name(path),
            Box::new(player),
        ));
        Ok(())
    }

    /// Video files are recognised but there is no video decoder, so this
    /// never starts a session.
    pub fn open_video(&mut self, path: &Path) -> Result<()> {
        File::open(path)
            .with_context(|| format!("cannot open {}", path.display()))?;
        bail!("video playback not supported: {}", path.display())
    }

    /// Starts `session`, replacing any session of the same kind.
    pub fn start(&mut self, mut session: MediaSession) {
        session.player.play();
        self.description =
            format!("Playing {}: {}", session.kind.label(), session.name);
        tracing::info!(kind = ?session.kind, name = %session.name, "media started");

        let slot = self.slot_mut(session.kind);
        if let Some(previous) = slot.replace(session) {
            tracing::debug!(name = %previous.name, "replaced media session");
        }
    }

    pub fn toggle(&mut self, kind: MediaKind) {
        if let Some(session) = self.slot_mut(kind) {
            session.toggle();
        }
    }

    /// Polls both sessions; returns the kinds that reached their end since
    /// the last call.
    pub fn tick(&mut self) -> Vec<MediaKind> {
        let mut ended = Vec::new();
        for session in [&mut self.audio, &mut self.video].into_iter().flatten() {
            if session.poll_ended() {
                tracing::info!(name = %session.name, "media finished");
                ended.push(session.kind);
            }
        }
        ended
    }

    pub fn session(&self, kind: MediaKind) -> Option<&MediaSession> {
        match kind {
            MediaKind::Audio => self.audio.as_ref(),
            MediaKind::Video => self.video.as_ref(),
        }
    }

    pub fn is_playing(&self) -> bool {
        [&self.audio, &self.video]
            .into_iter()
            .flatten()
            .any(|s| s.status() == PlaybackStatus::Playing)
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    fn slot_mut(&mut self, kind: MediaKind) -> &mut Option<MediaSession> {
        match kind {
            MediaKind::Audio => &mut self.audio,
            MediaKind::Video => &mut self.video,
        }
    }
}

/// rodio-backed audio playback.
pub struct AudioPlayer {
    // Dropping the stream silences the sink.
    _stream: rodio::OutputStream,
    sink: rodio::Sink,
    started: bool,
}

impl AudioPlayer {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("cannot open {}", path.display()))?;
        let source = rodio::Decoder::new(BufReader::new(file))
            .with_context(|| format!("cannot decode {}", path.display()))?;
        let (stream, handle) = rodio::OutputStream::try_default()
            .context("no audio output device")?;
        let sink =
            rodio::Sink::try_new(&handle).context("cannot create audio sink")?;
        sink.pause();
        sink.append(source);
        Ok(Self {
            _stream: stream,
            sink,
            started: false,
        })
    }
}

impl MediaPlayer for AudioPlayer {
    fn play(&mut self) {
        self.sink.play();
        self.started = true;
    }
    fn pause(&mut self) {
        self.sink.pause();
    }
    fn status(&self) -> PlaybackStatus {
        if !self.started {
            PlaybackStatus::Stopped
        } else if self.sink.empty() {
            PlaybackStatus::Ended
        } else if self.sink.is_paused() {
            PlaybackStatus::Paused
        } else {
            PlaybackStatus::Playing
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
