//! Sound effects and background music
//!
//! Playback is fire-and-forget: a failed or rejected play is logged and
//! otherwise ignored, so audio can never stall a tick.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Entity jumped
    Jump,
    /// Gate cleared
    Point,
    /// Session ended
    Crash,
}

impl SoundEffect {
    /// Asset served next to the page
    pub fn file(&self) -> &'static str {
        match self {
            SoundEffect::Jump => "jump.mp3",
            SoundEffect::Point => "point.wav",
            SoundEffect::Crash => "crash.wav",
        }
    }
}

/// What a game event should sound like
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    Effect(SoundEffect),
    StartMusic,
    StopMusic,
}

pub fn cue_for_event(event: GameEvent) -> Option<AudioCue> {
    match event {
        GameEvent::Jumped => Some(AudioCue::Effect(SoundEffect::Jump)),
        GameEvent::Scored => Some(AudioCue::Effect(SoundEffect::Point)),
        GameEvent::Crashed => Some(AudioCue::Effect(SoundEffect::Crash)),
        GameEvent::SessionStarted => Some(AudioCue::StartMusic),
        GameEvent::ReturnedToMenu => Some(AudioCue::StopMusic),
        GameEvent::NewBestScore(_) | GameEvent::SettingsChanged => None,
    }
}

const MUSIC_FILE: &str = "background.mp3";

/// Audio manager for the game
pub struct AudioManager {
    enabled: bool,
    #[cfg(target_arch = "wasm32")]
    music: Option<web_sys::HtmlAudioElement>,
}

impl AudioManager {
    pub fn new(enabled: bool) -> Self {
        #[cfg(target_arch = "wasm32")]
        let music = match web_sys::HtmlAudioElement::new_with_src(MUSIC_FILE) {
            Ok(music) => {
                music.set_loop(true);
                Some(music)
            }
            Err(e) => {
                log::warn!("Failed to create music element - music disabled: {e:?}");
                None
            }
        };
        Self {
            enabled,
            #[cfg(target_arch = "wasm32")]
            music,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.stop_music();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// React to everything a tick reported
    pub fn handle_events(&self, events: &[GameEvent]) {
        for cue in events.iter().filter_map(|e| cue_for_event(*e)) {
            match cue {
                AudioCue::Effect(effect) => self.play(effect),
                AudioCue::StartMusic => self.start_music(),
                AudioCue::StopMusic => self.stop_music(),
            }
        }
    }

    /// Play a sound effect. Overlapping plays are allowed.
    pub fn play(&self, effect: SoundEffect) {
        if !self.enabled {
            return;
        }
        log::debug!("Playing sound: {}", effect.file());
        self.play_file(effect.file());
    }

    #[cfg(target_arch = "wasm32")]
    fn play_file(&self, file: &'static str) {
        match web_sys::HtmlAudioElement::new_with_src(file) {
            Ok(audio) => spawn_play(&audio, file),
            Err(e) => log::warn!("Failed to create audio for {file}: {e:?}"),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn play_file(&self, _file: &'static str) {
        // No-op for native
    }

    #[cfg(target_arch = "wasm32")]
    fn start_music(&self) {
        if !self.enabled {
            return;
        }
        if let Some(music) = &self.music {
            music.set_current_time(0.0);
            spawn_play(music, MUSIC_FILE);
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn stop_music(&self) {
        if let Some(music) = &self.music {
            if let Err(e) = music.pause() {
                log::warn!("Failed to pause music: {e:?}");
            }
            music.set_current_time(0.0);
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn start_music(&self) {
        if self.enabled {
            log::debug!("Music: {MUSIC_FILE}");
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn stop_music(&self) {}
}

/// Start playback and log a rejected play promise instead of propagating it
#[cfg(target_arch = "wasm32")]
fn spawn_play(audio: &web_sys::HtmlMediaElement, file: &'static str) {
    match audio.play() {
        Ok(promise) => {
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = wasm_bindgen_futures::JsFuture::from(promise).await {
                    log::error!("Error playing {file}: {e:?}");
                }
            });
        }
        Err(e) => log::error!("Error playing {file}: {e:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_cues() {
        assert_eq!(
            cue_for_event(GameEvent::Jumped),
            Some(AudioCue::Effect(SoundEffect::Jump))
        );
        assert_eq!(
            cue_for_event(GameEvent::Crashed),
            Some(AudioCue::Effect(SoundEffect::Crash))
        );
        assert_eq!(cue_for_event(GameEvent::SessionStarted), Some(AudioCue::StartMusic));
        assert_eq!(cue_for_event(GameEvent::ReturnedToMenu), Some(AudioCue::StopMusic));
        assert_eq!(cue_for_event(GameEvent::NewBestScore(3)), None);
    }

    #[test]
    fn test_disabled_manager_is_silent() {
        let mut audio = AudioManager::new(true);
        audio.set_enabled(false);
        assert!(!audio.is_enabled());
        // Must not panic on any event
        audio.handle_events(&[GameEvent::Jumped, GameEvent::Scored, GameEvent::Crashed]);
    }
}
