pub mod controller;
pub mod recognizer;

pub use controller::{VoiceInputController, VoiceState};
pub use recognizer::{
    RecognitionErrorCode, RecognitionEvent, RecognizerConfig, Segment, SpeechRecognizer,
};
