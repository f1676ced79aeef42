mod config;
mod shortcut;
