use serde::{Deserialize, Serialize};

/// Settings handed to the platform recognizer when capture is set up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognizerConfig {
    /// BCP 47 language tag.
    pub language: String,
    /// Keep capturing across pauses instead of ending after one utterance.
    pub continuous: bool,
    /// Deliver provisional segments while the speaker is still talking.
    pub interim_results: bool,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            language: "en-US".into(),
            continuous: true,
            interim_results: true,
        }
    }
}

/// One recognized span of speech. Interim segments are provisional and get
/// superseded by the next event; final segments will not be revised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub is_final: bool,
}

impl Segment {
    pub fn final_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: true,
        }
    }

    pub fn interim(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: false,
        }
    }
}

/// Events the platform recognizer pushes while capture is running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    /// Zero or more segments recognized since the last event.
    Result { segments: Vec<Segment> },
    Error(RecognitionErrorCode),
    /// Capture ended, whether we asked for it or the platform decided.
    End,
}

/// Platform error codes, mirrored from the speech service's fixed set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionErrorCode {
    NoSpeech,
    AudioCapture,
    NotAllowed,
    Network,
    ServiceNotAllowed,
    BadGrammar,
    LanguageNotSupported,
    Other(String),
}

impl RecognitionErrorCode {
    pub fn from_platform_code(code: &str) -> Self {
        match code {
            "no-speech" => Self::NoSpeech,
            "audio-capture" => Self::AudioCapture,
            "not-allowed" => Self::NotAllowed,
            "network" => Self::Network,
            "service-not-allowed" => Self::ServiceNotAllowed,
            "bad-grammar" => Self::BadGrammar,
            "language-not-supported" => Self::LanguageNotSupported,
            other => Self::Other(other.to_string()),
        }
    }

    /// Keep messages actionable and short; details are in logs.
    pub fn user_message(&self) -> String {
        match self {
            Self::NoSpeech => "No speech was detected. Please try again.".into(),
            Self::AudioCapture => "No microphone was found or it is not working.".into(),
            Self::NotAllowed => "Microphone access was denied. Check your permissions.".into(),
            Self::Network => "A network error interrupted voice recognition.".into(),
            Self::ServiceNotAllowed => "The speech service is not allowed on this device.".into(),
            Self::BadGrammar => "The speech service rejected the recognition grammar.".into(),
            Self::LanguageNotSupported => "The configured language is not supported.".into(),
            Self::Other(code) => format!("Voice recognition failed ({code})."),
        }
    }
}

/// Capability boundary over the platform speech service.
///
/// `start`/`stop` are synchronous requests, like an audio capture handle:
/// actual state changes arrive later as [`RecognitionEvent`]s, and teardown
/// has to work from `Drop`, outside any async context.
pub trait SpeechRecognizer: Send {
    /// Asks the platform to begin capturing. Fails if the device is busy
    /// or permission is missing.
    fn start(&mut self) -> anyhow::Result<()>;

    /// Asks the platform to halt capture. The recognizer confirms with an
    /// `End` event; this call itself guarantees nothing.
    fn stop(&mut self);
}
