pub mod lyrics;
pub mod now_playing;
pub mod root;
