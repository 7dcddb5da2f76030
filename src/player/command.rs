/// The closed set of things a user can ask the player to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Play the catalog entry at this index.
    SelectTrack(usize),
    TogglePlayPause,
    /// Jump to this fraction (0.0..=1.0) of the current track.
    Seek(f64),
    Next,
    Previous,
    /// Volume slider position, 0-100.
    SetVolume(u8),
    /// Load the catalog behind this source key.
    SwitchCatalog(String),
}
