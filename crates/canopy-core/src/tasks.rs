use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CanopyError, Result};
use crate::filter::FilterKind;

/// One filtering job: apply `kind` to `input`, write to `output`.
#[derive(Clone, Debug)]
pub struct FilterTask {
    pub kind: FilterKind,
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Parse the task-list file: a task count, then per task a filter
/// keyword, input path, and output path, all whitespace-separated.
/// The `mean` keyword may be followed by one extra token which is
/// accepted and ignored.
pub fn load_tasks(path: &Path) -> Result<Vec<FilterTask>> {
    let contents = fs::read_to_string(path)?;
    parse_tasks(&contents)
}

pub fn parse_tasks(contents: &str) -> Result<Vec<FilterTask>> {
    let mut tokens = contents.split_whitespace();
    let count: usize = tokens
        .next()
        .ok_or_else(|| CanopyError::InvalidTaskList("missing task count".into()))?
        .parse()
        .map_err(|_| CanopyError::InvalidTaskList("task count is not a number".into()))?;

    let mut tasks = Vec::with_capacity(count);
    for i in 0..count {
        let keyword = tokens
            .next()
            .ok_or_else(|| CanopyError::InvalidTaskList(format!("task {i}: missing filter")))?;
        let kind = match keyword {
            "sobel" => FilterKind::Sobel,
            "mean" => {
                // Secondary token after "mean" (e.g. "removal") is ignored.
                tokens.next().ok_or_else(|| {
                    CanopyError::InvalidTaskList(format!("task {i}: missing input path"))
                })?;
                FilterKind::Mean
            }
            other => {
                return Err(CanopyError::InvalidTaskList(format!(
                    "task {i}: unknown filter '{other}'"
                )))
            }
        };
        let input = tokens
            .next()
            .ok_or_else(|| CanopyError::InvalidTaskList(format!("task {i}: missing input path")))?;
        let output = tokens
            .next()
            .ok_or_else(|| CanopyError::InvalidTaskList(format!("task {i}: missing output path")))?;
        tasks.push(FilterTask {
            kind,
            input: PathBuf::from(input),
            output: PathBuf::from(output),
        });
    }
    Ok(tasks)
}
