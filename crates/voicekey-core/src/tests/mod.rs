mod asr;
mod audio;
