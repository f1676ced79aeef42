mod capture;
mod recorder;
mod resampler;
mod wav;
