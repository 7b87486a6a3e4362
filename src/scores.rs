use std::fs;
use std::io;
use std::path::PathBuf;

/// Where the record lives, relative to the working directory.
pub const DEFAULT_SCORE_FILE: &str = "highscore.txt";

/// The single persisted best (name, score) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighScore {
    pub name: String,
    pub score: u32,
}

/// File-backed store for exactly one high-score record.
///
/// The on-disk format is one line of `name:score`. Anything that cannot be
/// read back as that is treated as "no record yet" rather than an error, so
/// gameplay never stalls on score I/O.
#[derive(Debug, Clone)]
pub struct ScoreStore {
    path: PathBuf,
}

impl ScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the stored record. Missing, unreadable or malformed files all
    /// load as `None`.
    pub fn load(&self) -> Option<HighScore> {
        let line = fs::read_to_string(&self.path).ok()?;
        parse_record(&line)
    }

    /// True if `candidate` would replace the stored record. With no record
    /// on disk any non-zero score qualifies.
    pub fn qualifies(&self, candidate: u32) -> bool {
        candidate > self.load().map_or(0, |record| record.score)
    }

    /// Overwrite the record. The new line lands in a temp file next to the
    /// target and is renamed over it, so a failed write leaves whatever was
    /// there before intact.
    pub fn persist(&self, record: &HighScore) -> io::Result<()> {
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, format!("{}:{}\n", record.name, record.score))?;
        fs::rename(&tmp, &self.path)
    }
}

fn parse_record(line: &str) -> Option<HighScore> {
    // split on the last colon so names containing ':' still round-trip
    let (name, score) = line.trim().rsplit_once(':')?;
    let score = score.trim().parse().ok()?;
    Some(HighScore {
        name: name.trim().to_string(),
        score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &tempfile::TempDir) -> ScoreStore {
        ScoreStore::new(dir.path().join("highscore.txt"))
    }

    #[test]
    fn missing_file_loads_as_no_record() {
        let dir = tempdir().unwrap();
        assert_eq!(store_in(&dir).load(), None);
    }

    #[test]
    fn malformed_lines_load_as_no_record() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        for garbage in ["", "   ", "no-colon", "name:NaN", "name:"] {
            fs::write(dir.path().join("highscore.txt"), garbage).unwrap();
            assert_eq!(store.load(), None, "line {garbage:?} should not parse");
        }
    }

    #[test]
    fn record_round_trips() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let record = HighScore {
            name: "Alice".to_string(),
            score: 120,
        };
        store.persist(&record).unwrap();
        assert_eq!(store.load(), Some(record));
    }

    #[test]
    fn whitespace_around_fields_is_tolerated() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("highscore.txt"), "  Alice : 120 \n").unwrap();
        let record = store_in(&dir).load().unwrap();
        assert_eq!(record.name, "Alice");
        assert_eq!(record.score, 120);
    }

    #[test]
    fn qualification_is_strictly_greater() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        // empty store: any non-zero score qualifies, zero does not
        assert!(!store.qualifies(0));
        assert!(store.qualifies(1));

        store
            .persist(&HighScore {
                name: "Alice".to_string(),
                score: 120,
            })
            .unwrap();
        assert!(!store.qualifies(119));
        assert!(!store.qualifies(120));
        assert!(store.qualifies(121));
    }

    #[test]
    fn new_record_overwrites_old_one() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("highscore.txt");
        fs::write(&path, "Alice:120").unwrap();

        let store = ScoreStore::new(&path);
        assert!(store.qualifies(150));
        store
            .persist(&HighScore {
                name: "Bob".to_string(),
                score: 150,
            })
            .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap().trim(), "Bob:150");
    }
}
