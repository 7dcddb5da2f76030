use serde::Deserialize;

/// One playable entry of a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub title: String,
    /// Inherited from the containing album.
    pub artist: String,
    /// Nominal duration as written in the document; the live handle is
    /// authoritative once loaded.
    pub duration: String,
    /// Media reference, relative to the catalog document unless absolute.
    pub file: String,
}

/// `{ "albums": [ { "artist": ..., "songs": [ { "title", "duration", "file" } ] } ] }`
#[derive(Debug, Deserialize)]
pub struct CatalogDocument {
    pub albums: Vec<Album>,
}

#[derive(Debug, Deserialize)]
pub struct Album {
    pub artist: String,
    pub songs: Vec<Song>,
}

#[derive(Debug, Deserialize)]
pub struct Song {
    pub title: String,
    #[serde(default)]
    pub duration: String,
    pub file: String,
}

impl CatalogDocument {
    /// Flatten albums into tracks: albums in document order, songs in
    /// album order, each song tagged with its album's artist.
    pub fn into_tracks(self) -> Vec<Track> {
        self.albums
            .into_iter()
            .flat_map(|album| {
                let artist = album.artist;
                album.songs.into_iter().map(move |song| Track {
                    title: song.title,
                    artist: artist.clone(),
                    duration: song.duration,
                    file: song.file,
                })
            })
            .collect()
    }
}
