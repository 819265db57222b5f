//! Archival of processed sidecars
//!
//! A recording is archived in a fixed order: catalog rows first, then the
//! sidecar moves that retire the triple from future walks. A move failure
//! after the rows are in is a partial archive, surfaced loudly; no rollback
//! is attempted. Recycle directories are created lazily, so a dry run never
//! needs them to exist.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::catalog::{CatalogDb, Statement};
use crate::error::{Error, Result};
use crate::walk::RecordingTriple;

/// One planned sidecar relocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMove {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Everything one recording writes: rows first, moves second.
#[derive(Debug, Clone)]
pub struct ArchivePlan {
    pub statements: Vec<Statement>,
    pub moves: Vec<FileMove>,
}

impl ArchivePlan {
    /// Dry-run report: fully bound SQL, then `mv` lines.
    pub fn preview(&self) -> Vec<String> {
        let mut lines: Vec<String> = self.statements.iter().map(Statement::render).collect();
        for mv in &self.moves {
            lines.push(format!("mv {} {}", mv.from.display(), mv.to.display()));
        }
        lines
    }

    /// Execute the plan: every row, then every move.
    pub async fn commit(&self, db: &CatalogDb) -> Result<()> {
        for statement in &self.statements {
            db.execute(statement).await?;
        }
        for mv in &self.moves {
            // Rows are already durable; failures from here on are partial.
            if let Some(parent) = mv.to.parent() {
                fs::create_dir_all(parent).map_err(|e| partial(mv, e))?;
            }
            fs::rename(&mv.from, &mv.to).map_err(|e| partial(mv, e))?;
            debug!(from = %mv.from.display(), to = %mv.to.display(), "Archived sidecar");
        }
        Ok(())
    }
}

fn partial(mv: &FileMove, source: std::io::Error) -> Error {
    Error::PartialArchive {
        from: mv.from.clone(),
        to: mv.to.clone(),
        source,
    }
}

/// Plan the sidecar moves for a triple: the recycle tree mirrors the
/// directory layout relative to the library root.
pub fn recycle_moves(
    root: &Path,
    recycle_dir: &str,
    triple: &RecordingTriple,
) -> Result<Vec<FileMove>> {
    let dir = triple.video.parent().unwrap_or(root);
    let rel = dir.strip_prefix(root).map_err(|_| {
        Error::InvalidPath(format!(
            "{} is outside the library root {}",
            dir.display(),
            root.display()
        ))
    })?;
    let dest_dir = root.join(recycle_dir).join(rel);

    let mut moves = Vec::with_capacity(2);
    for sidecar in [&triple.episode_sidecar, &triple.storage_sidecar] {
        let name = sidecar.file_name().ok_or_else(|| {
            Error::InvalidPath(format!("No file name in {}", sidecar.display()))
        })?;
        moves.push(FileMove {
            from: sidecar.clone(),
            to: dest_dir.join(name),
        });
    }
    Ok(moves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{insert_series, CatalogDb};
    use crate::models::{Category, SeriesRecord};
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn triple_under(root: &Path, dir: &str) -> RecordingTriple {
        let base = if dir.is_empty() {
            root.to_path_buf()
        } else {
            root.join(dir)
        };
        RecordingTriple {
            video: base.join("ep1.mpg"),
            episode_sidecar: base.join("ep1.mpg.episode.json"),
            storage_sidecar: base.join("ep1.mpg.storage.json"),
        }
    }

    fn sample_series() -> SeriesRecord {
        SeriesRecord {
            series_id: "C100".to_string(),
            title: "Jeopardy".to_string(),
            category: Category::Series,
            image_url: "http://guide/img".to_string(),
            poster_url: None,
            start_time: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            is_new: false,
            url: "http://dvr/episodes".to_string(),
        }
    }

    #[test]
    fn test_recycle_moves_mirror_layout() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        let triple = triple_under(root, "Show (C1)");

        let moves = recycle_moves(root, ".recycle-bin", &triple).unwrap();
        assert_eq!(
            moves[0].to,
            root.join(".recycle-bin/Show (C1)/ep1.mpg.episode.json")
        );
        assert_eq!(
            moves[1].to,
            root.join(".recycle-bin/Show (C1)/ep1.mpg.storage.json")
        );
    }

    #[test]
    fn test_recycle_moves_root_level() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        let triple = triple_under(root, "");

        let moves = recycle_moves(root, ".recycle-bin", &triple).unwrap();
        assert_eq!(moves[0].to, root.join(".recycle-bin/ep1.mpg.episode.json"));
    }

    #[test]
    fn test_preview_lists_sql_then_moves() {
        let plan = ArchivePlan {
            statements: vec![insert_series(1, &sample_series())],
            moves: vec![FileMove {
                from: PathBuf::from("/lib/a.json"),
                to: PathBuf::from("/lib/.recycle-bin/a.json"),
            }],
        };
        let lines = plan.preview();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("INSERT INTO Series"));
        assert_eq!(lines[1], "mv /lib/a.json /lib/.recycle-bin/a.json");
    }

    #[tokio::test]
    async fn test_commit_writes_rows_then_moves() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        let db = CatalogDb::open(&root.join("catalog.db")).await.unwrap();

        let triple = triple_under(root, "Show");
        std::fs::create_dir_all(root.join("Show")).unwrap();
        std::fs::write(&triple.episode_sidecar, b"{}").unwrap();
        std::fs::write(&triple.storage_sidecar, b"{}").unwrap();

        let plan = ArchivePlan {
            statements: vec![insert_series(1, &sample_series())],
            moves: recycle_moves(root, ".recycle-bin", &triple).unwrap(),
        };
        plan.commit(&db).await.unwrap();

        assert!(!triple.episode_sidecar.exists());
        assert!(!triple.storage_sidecar.exists());
        assert!(root.join(".recycle-bin/Show/ep1.mpg.episode.json").exists());
        assert!(root.join(".recycle-bin/Show/ep1.mpg.storage.json").exists());
        assert_eq!(db.max_series_id().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_move_failure_is_partial_and_keeps_rows() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        let db = CatalogDb::open(&root.join("catalog.db")).await.unwrap();

        let triple = triple_under(root, "Show");
        std::fs::create_dir_all(root.join("Show")).unwrap();
        std::fs::write(&triple.episode_sidecar, b"{}").unwrap();
        std::fs::write(&triple.storage_sidecar, b"{}").unwrap();
        // A plain file where the recycle tree should go blocks the moves.
        std::fs::write(root.join(".recycle-bin"), b"not a dir").unwrap();

        let plan = ArchivePlan {
            statements: vec![insert_series(1, &sample_series())],
            moves: recycle_moves(root, ".recycle-bin", &triple).unwrap(),
        };
        let err = plan.commit(&db).await.unwrap_err();
        assert!(matches!(err, Error::PartialArchive { .. }));

        // The row landed even though the move failed; nothing rolls back.
        assert_eq!(db.max_series_id().await.unwrap(), 1);
        assert!(triple.episode_sidecar.exists());
    }
}
