//! JSON file store: one current-quiz document plus a JSON-lines log.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile;

use super::{PublishedQuiz, QuizStore, Submission};
use crate::error::Result;

const CURRENT_QUIZ_FILE: &str = "current_quiz.json";
const SUBMISSIONS_FILE: &str = "submissions.jsonl";

pub struct FileStore {
    dir: PathBuf,
    append_lock: Mutex<()>,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            append_lock: Mutex::new(()),
        })
    }

    /// `<data_local_dir>/exam-gen`, falling back to the home directory
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .map(|d| d.join("exam-gen"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn current_path(&self) -> PathBuf {
        self.dir.join(CURRENT_QUIZ_FILE)
    }

    fn submissions_path(&self) -> PathBuf {
        self.dir.join(SUBMISSIONS_FILE)
    }
}

impl QuizStore for FileStore {
    fn publish(&self, quiz: &PublishedQuiz) -> Result<()> {
        // Readers see either the old quiz or the new one, never a partial file
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        serde_json::to_writer_pretty(&mut tmp, quiz)?;
        tmp.flush()?;
        tmp.persist(self.current_path()).map_err(|e| e.error)?;

        log::info!(
            "Published quiz {} ({} questions)",
            quiz.quiz_id,
            quiz.questions.len()
        );
        Ok(())
    }

    fn current(&self) -> Result<Option<PublishedQuiz>> {
        let path = self.current_path();
        if !path.exists() {
            return Ok(None);
        }

        let reader = BufReader::new(File::open(&path)?);
        Ok(Some(serde_json::from_reader(reader)?))
    }

    fn append_submission(&self, submission: &Submission) -> Result<()> {
        let mut line = serde_json::to_string(submission)?;
        line.push('\n');

        // One write of a whole line in append mode keeps records from other
        // processes intact; the mutex serializes writers in this process
        let _guard = self
            .append_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.submissions_path())?;
        file.write_all(line.as_bytes())?;

        log::debug!("Stored submission for {}", submission.name);
        Ok(())
    }

    fn submissions(&self) -> Result<Vec<Submission>> {
        let path = self.submissions_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&path)?);
        let mut submissions = Vec::new();

        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Submission>(&line) {
                Ok(submission) => submissions.push(submission),
                Err(e) => log::warn!(
                    "Skipping malformed line {} in {}: {}",
                    number + 1,
                    path.display(),
                    e
                ),
            }
        }

        Ok(submissions)
    }
}
