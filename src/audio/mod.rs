//! Audio upload handling — WAV parsing and validation.
//!
//! The app never captures live audio; the only audio input is a WAV file
//! chosen through the file dialog.  This module validates the upload locally
//! before the bytes are shipped to the remote recognition service.

pub mod wav;

pub use wav::{WavClip, WavError};
