//! Sound cues
//!
//! Each cue maps to one or more short clips under `/sounds/`. The ball hit
//! alternates between two recordings picked at random.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::frame::{Cue, SoundTrigger};

pub const WALL_CLIPS: &[&str] = &["/sounds/wall.mp3"];
pub const SCORE_CLIPS: &[&str] = &["/sounds/score.mp3"];
pub const BALL_HIT_CLIPS: &[&str] = &["/sounds/ballHit1.mp3", "/sounds/ballHit2.mp3"];

/// Clip URLs that can play for a cue
pub fn assets_for(cue: Cue) -> &'static [&'static str] {
    match cue {
        Cue::Wall => WALL_CLIPS,
        Cue::Score => SCORE_CLIPS,
        Cue::BallHit => BALL_HIT_CLIPS,
    }
}

/// Every clip the game may request, for preloading
pub fn all_assets() -> impl Iterator<Item = &'static str> {
    [Cue::Wall, Cue::Score, Cue::BallHit]
        .into_iter()
        .flat_map(|cue| assets_for(cue).iter().copied())
}

/// Picks the clip for each cue
pub struct CueSelector {
    rng: Pcg32,
}

impl CueSelector {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn select(&mut self, cue: Cue) -> &'static str {
        let clips = assets_for(cue);
        match clips {
            [only] => *only,
            [first, second] => {
                if self.rng.random_bool(0.5) {
                    *first
                } else {
                    *second
                }
            }
            _ => clips[self.rng.random_range(0..clips.len())],
        }
    }
}

/// Sound sink for headless runs: logs each cue instead of playing it
pub struct LoggingSound {
    selector: CueSelector,
    /// Cues received, in order
    pub played: Vec<Cue>,
}

impl LoggingSound {
    pub fn new(seed: u64) -> Self {
        Self {
            selector: CueSelector::new(seed),
            played: Vec::new(),
        }
    }
}

impl SoundTrigger for LoggingSound {
    fn play(&mut self, cue: Cue) {
        let clip = self.selector.select(cue);
        log::debug!("cue {} -> {}", cue.as_str(), clip);
        self.played.push(cue);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::collections::HashMap;

    use wasm_bindgen_futures::JsFuture;
    use web_sys::HtmlAudioElement;

    use super::{CueSelector, all_assets};
    use crate::frame::{Cue, SoundTrigger};
    use crate::settings::Settings;

    /// HAVE_METADATA; anything below means the clip has not loaded yet
    const MIN_READY_STATE: u16 = 1;

    /// Audio manager for the game
    pub struct AudioManager {
        clips: HashMap<&'static str, HtmlAudioElement>,
        selector: CueSelector,
        settings: Settings,
    }

    impl AudioManager {
        pub fn new(settings: Settings, seed: u64) -> Self {
            let mut clips = HashMap::new();
            for url in all_assets() {
                match HtmlAudioElement::new_with_src(url) {
                    Ok(el) => {
                        el.set_preload("auto");
                        clips.insert(url, el);
                    }
                    Err(e) => log::warn!("Failed to create audio element {}: {:?}", url, e),
                }
            }
            log::info!("Loaded {} sound clips", clips.len());
            Self {
                clips,
                selector: CueSelector::new(seed),
                settings,
            }
        }

        /// Mute/unmute all audio and persist the choice
        pub fn toggle_mute(&mut self) {
            let muted = self.settings.toggle_mute();
            self.settings.save();
            log::info!("Sound {}", if muted { "muted" } else { "on" });
        }
    }

    impl SoundTrigger for AudioManager {
        fn play(&mut self, cue: Cue) {
            let vol = self.settings.effective_volume();
            if vol <= 0.0 {
                return;
            }

            let url = self.selector.select(cue);
            let Some(clip) = self.clips.get(url) else {
                return;
            };
            if clip.ready_state() < MIN_READY_STATE {
                log::debug!("Clip {} not ready, skipping", url);
                return;
            }

            clip.set_current_time(0.0);
            clip.set_volume(vol as f64);
            match clip.play() {
                // Autoplay rejections surface through the promise
                Ok(promise) => wasm_bindgen_futures::spawn_local(async move {
                    if let Err(e) = JsFuture::from(promise).await {
                        log::debug!("Playback rejected: {:?}", e);
                    }
                }),
                Err(e) => log::debug!("Playback failed: {:?}", e),
            }
        }
    }
}
