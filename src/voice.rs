use crate::alert::{AlertLevel, AlertSink};
use log::debug;

/// A spoken instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpokenPrompt {
    /// The text to speak.
    pub text: &'static str,
    /// The SSML rendition of the text.
    pub ssml: &'static str,
}

/// Played when an obstacle is on the predicted path but still distant.
pub const PROMPT_HAZARD_ON_ROUTE: SpokenPrompt = SpokenPrompt {
    text: "Hazard on route, proceed with caution",
    ssml: "Hazard on route",
};

/// Played when an obstacle is close ahead.
pub const PROMPT_HAZARD_AHEAD: SpokenPrompt = SpokenPrompt {
    text: "Hazard, ahead. Hazard, ahead. Hazard, ahead.",
    ssml: "Hazard ahead",
};

/// Played when the vehicle has reached an obstacle.
pub const PROMPT_HAZARD_DEAD: SpokenPrompt = SpokenPrompt {
    text: "Sorry, you are now dead",
    ssml: "Sorry, you are now dead",
};

/// A speech synthesizer.
pub trait Speaker {
    fn speak(&mut self, prompt: &SpokenPrompt);
}

impl Speaker for Vec<SpokenPrompt> {
    fn speak(&mut self, prompt: &SpokenPrompt) {
        self.push(*prompt);
    }
}

/// Gets the prompt announcing an alert level, if any.
pub fn prompt_for(level: AlertLevel) -> Option<SpokenPrompt> {
    match level {
        AlertLevel::None => None,
        AlertLevel::Warning => Some(PROMPT_HAZARD_ON_ROUTE),
        AlertLevel::Danger => Some(PROMPT_HAZARD_AHEAD),
        AlertLevel::Death => Some(PROMPT_HAZARD_DEAD),
    }
}

/// An [AlertSink] which announces alerts through a [Speaker].
///
/// Alerts arrive with every horizon update, so a prompt is only spoken
/// when the alert level changes.
pub struct VoicePrompter<S> {
    speaker: S,
    last_level: AlertLevel,
}

impl<S: Speaker> VoicePrompter<S> {
    /// Creates a prompter which has not yet announced anything.
    pub fn new(speaker: S) -> Self {
        Self {
            speaker,
            last_level: AlertLevel::None,
        }
    }

    /// Gets a reference to the speaker.
    pub fn speaker(&self) -> &S {
        &self.speaker
    }

    /// Consumes the prompter, returning the speaker.
    pub fn into_inner(self) -> S {
        self.speaker
    }
}

impl<S: Speaker> AlertSink for VoicePrompter<S> {
    fn notify(&mut self, level: AlertLevel, message: &str) {
        if level == self.last_level {
            return;
        }
        self.last_level = level;
        if let Some(prompt) = prompt_for(level) {
            debug!("speaking {:?} for \"{}\"", prompt.ssml, message);
            self.speaker.speak(&prompt);
        }
    }
}
