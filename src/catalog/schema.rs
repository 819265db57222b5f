//! SQLite schema definition
//!
//! Table, column, and index names are shared with the playback-side tools
//! that read this database, so they are reproduced here exactly.

/// SQL schema for the catalog database
pub const SCHEMA_SQL: &str = r#"
-- Series: one row per distinct upstream series
CREATE TABLE IF NOT EXISTS Series (
    Id INTEGER NOT NULL CONSTRAINT PK_Series PRIMARY KEY,
    Metadata_SeriesId TEXT,
    Metadata_Title TEXT,
    Metadata_Category INTEGER,
    Metadata_ImageUrl TEXT,
    Metadata_PosterUrl TEXT,
    Metadata_StartTime TEXT,
    Metadata_IsNew INTEGER,
    Metadata_Url TEXT
);

-- Episodes: one row per imported recording
CREATE TABLE IF NOT EXISTS Episodes (
    Id INTEGER NOT NULL CONSTRAINT PK_Episodes PRIMARY KEY,
    SeriesId INTEGER,
    SeriesStartTime TEXT NOT NULL,
    Metadata_Category INTEGER,
    Metadata_ChannelImageUrl TEXT,
    Metadata_ChannelName TEXT,
    Metadata_ChannelNumber TEXT,
    Metadata_EndTime TEXT,
    Metadata_EpisodeNumber TEXT,
    Metadata_EpisodeTitle TEXT,
    Metadata_FirstAiring INTEGER,
    Metadata_ImageUrl TEXT,
    Metadata_MovieScore TEXT,
    Metadata_OriginalAirdate TEXT,
    Metadata_PosterUrl TEXT,
    Metadata_ProgramId TEXT,
    Metadata_RecordEndTime TEXT,
    Metadata_RecordError TEXT,
    Metadata_RecordStartTime TEXT,
    Metadata_RecordSuccess INTEGER,
    Metadata_SeriesId TEXT,
    Metadata_StartTime TEXT,
    Metadata_Synopsis TEXT,
    Metadata_Title TEXT,
    Metadata_Filename TEXT,
    Metadata_PlayUrl TEXT,
    Metadata_CmdUrl TEXT,
    DownloadInterrupted INTEGER NOT NULL,
    DownloadStarted TEXT NOT NULL,
    DownloadReason INTEGER NOT NULL,
    DeleteReason INTEGER NOT NULL,
    ReRecordable INTEGER NOT NULL,
    CONSTRAINT FK_Episodes_Series_SeriesId FOREIGN KEY (SeriesId) REFERENCES Series (Id)
);

-- Series lookup index
CREATE INDEX IF NOT EXISTS IX_Episodes_SeriesId ON Episodes(SeriesId);
"#;
