use crate::recognizer::{RecognitionEvent, SpeechRecognizer};
use serde::{Deserialize, Serialize};

pub const START_FAILURE_MESSAGE: &str = "Failed to start voice recognition.";
pub const UNSUPPORTED_MESSAGE: &str = "Speech recognition is not supported on this platform.";

/// Snapshot of the controller for whatever renders it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceState {
    pub is_listening: bool,
    pub transcript: String,
    pub is_supported: bool,
    pub error: Option<String>,
}

type TextCallback = Box<dyn Fn(&str) + Send>;

/// State machine over a platform speech recognizer.
///
/// All transitions run on discrete calls (user actions or recognizer
/// events); there is no internal concurrency. Recognition failures are
/// absorbed into state and the error callback, never raised to the caller.
pub struct VoiceInputController {
    recognizer: Option<Box<dyn SpeechRecognizer>>,
    state: VoiceState,
    // Final segments accumulate here for the lifetime of one listening
    // session; interim text lives only in `state.transcript`.
    final_transcript: String,
    on_transcript: Option<TextCallback>,
    on_error: Option<TextCallback>,
}

impl VoiceInputController {
    /// `recognizer = None` means the platform has no speech capability;
    /// the controller is then permanently inert with an error pre-set.
    pub fn new(recognizer: Option<Box<dyn SpeechRecognizer>>) -> Self {
        let is_supported = recognizer.is_some();
        Self {
            recognizer,
            state: VoiceState {
                is_listening: false,
                transcript: String::new(),
                is_supported,
                error: (!is_supported).then(|| UNSUPPORTED_MESSAGE.to_string()),
            },
            final_transcript: String::new(),
            on_transcript: None,
            on_error: None,
        }
    }

    pub fn on_transcript(&mut self, cb: impl Fn(&str) + Send + 'static) {
        self.on_transcript = Some(Box::new(cb));
    }

    pub fn on_error(&mut self, cb: impl Fn(&str) + Send + 'static) {
        self.on_error = Some(Box::new(cb));
    }

    pub fn state(&self) -> &VoiceState {
        &self.state
    }

    pub fn is_listening(&self) -> bool {
        self.state.is_listening
    }

    pub fn transcript(&self) -> &str {
        &self.state.transcript
    }

    /// Begins a fresh listening session: transcript and error are cleared
    /// first. A platform start failure (device busy, permission) is caught
    /// here and surfaced via state and the error callback only.
    pub fn start(&mut self) {
        let Some(recognizer) = self.recognizer.as_mut() else {
            return;
        };

        self.state.transcript.clear();
        self.final_transcript.clear();
        self.state.error = None;

        match recognizer.start() {
            Ok(()) => {
                self.state.is_listening = true;
            }
            Err(e) => {
                log::error!("speech recognizer failed to start: {e:#}");
                self.state.error = Some(START_FAILURE_MESSAGE.to_string());
                if let Some(cb) = &self.on_error {
                    cb(START_FAILURE_MESSAGE);
                }
            }
        }
    }

    /// Requests the recognizer halt. Listening actually ends when the
    /// `End` event arrives; transcript and error are left alone.
    pub fn stop(&mut self) {
        if let Some(recognizer) = self.recognizer.as_mut() {
            recognizer.stop();
        }
    }

    /// Feeds one recognizer event through the state machine.
    pub fn handle_event(&mut self, event: RecognitionEvent) {
        match event {
            RecognitionEvent::Result { segments } => {
                let mut interim = String::new();
                for segment in segments {
                    if segment.is_final {
                        self.final_transcript.push_str(&segment.text);
                    } else {
                        interim.push_str(&segment.text);
                    }
                }
                // Finals are permanent for the session; interim text is
                // whatever the latest event said, nothing more.
                self.state.transcript = format!("{}{}", self.final_transcript, interim);
            }
            RecognitionEvent::Error(code) => {
                let message = code.user_message();
                log::warn!("speech recognition error: {code:?}");
                self.state.error = Some(message.clone());
                self.state.is_listening = false;
                if let Some(cb) = &self.on_error {
                    cb(&message);
                }
            }
            RecognitionEvent::End => {
                self.state.is_listening = false;
            }
        }
    }

    /// Resets transcript and error; listening state is untouched.
    pub fn clear_transcript(&mut self) {
        self.state.transcript.clear();
        self.final_transcript.clear();
        self.state.error = None;
    }

    /// Hands the trimmed transcript to the transcript callback and clears
    /// it. Empty or whitespace-only transcripts are a no-op. Listening
    /// continues either way.
    pub fn submit_transcript(&mut self) {
        let trimmed = self.state.transcript.trim();
        if trimmed.is_empty() {
            return;
        }

        if let Some(cb) = &self.on_transcript {
            cb(trimmed);
        }
        self.state.transcript.clear();
        self.final_transcript.clear();
    }
}

impl Drop for VoiceInputController {
    fn drop(&mut self) {
        // Release the capture handle if a session is still running.
        if self.state.is_listening {
            if let Some(recognizer) = self.recognizer.as_mut() {
                recognizer.stop();
            }
        }
    }
}
