use std::cell::Cell;
use std::rc::Rc;

use mazechase_core::{AudioSink, Cue};
use wasm_bindgen::JsValue;
use web_sys::HtmlAudioElement;

pub(crate) const fn volume_for(cue: Cue) -> f64 {
    match cue {
        Cue::Start => 0.1,
        _ => 0.01,
    }
}

pub(crate) fn sound_url(cue: Cue) -> String {
    format!("/sounds/{}.mp3", cue.name())
}

struct Sounds {
    elements: Vec<(Cue, HtmlAudioElement)>,
    enabled: Cell<bool>,
}

/// One `<audio>` element per cue. Clones share the elements and the mute switch.
#[derive(Clone)]
pub(crate) struct HtmlAudio {
    sounds: Rc<Sounds>,
}

impl HtmlAudio {
    pub(crate) fn new() -> Result<Self, JsValue> {
        let elements = Cue::ALL
            .into_iter()
            .map(|cue| {
                let element = HtmlAudioElement::new_with_src(&sound_url(cue))?;
                element.set_volume(volume_for(cue));
                Ok((cue, element))
            })
            .collect::<Result<Vec<_>, JsValue>>()?;

        Ok(Self {
            sounds: Rc::new(Sounds {
                elements,
                enabled: Cell::new(true),
            }),
        })
    }

    pub(crate) fn is_enabled(&self) -> bool {
        self.sounds.enabled.get()
    }

    /// Flips the mute switch, playing the start jingle when sound comes back on.
    pub(crate) fn toggle(&self) -> bool {
        let enabled = !self.is_enabled();
        if enabled {
            self.rewind_and_play(Cue::Start);
        } else {
            self.rewind(Cue::Start);
        }
        self.sounds.enabled.set(enabled);
        enabled
    }

    fn element(&self, cue: Cue) -> Option<&HtmlAudioElement> {
        self.sounds
            .elements
            .iter()
            .find(|(candidate, _)| *candidate == cue)
            .map(|(_, element)| element)
    }

    fn rewind_and_play(&self, cue: Cue) {
        let Some(element) = self.element(cue) else {
            return;
        };
        element.set_current_time(0.0);
        // The returned promise is dropped; it rejects while autoplay is blocked.
        if let Err(err) = element.play() {
            log::warn!("Cannot play sound {}: {err:?}", cue.name());
        }
    }

    fn rewind(&self, cue: Cue) {
        let Some(element) = self.element(cue) else {
            return;
        };
        if let Err(err) = element.pause() {
            log::warn!("Cannot stop sound {}: {err:?}", cue.name());
        }
        element.set_current_time(0.0);
    }
}

impl AudioSink for HtmlAudio {
    fn play(&mut self, cue: Cue) {
        if self.is_enabled() {
            self.rewind_and_play(cue);
        }
    }

    fn stop(&mut self, cue: Cue) {
        self.rewind(cue);
    }
}
