//! `VersionControl` backed by the git command line.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::{ExecError, ExecResult};
use crate::process::{capture, stderr_text, stdout_text};
use crate::traits::VersionControl;

/// Runs git queries from a project directory.
///
/// Paths are relative to that directory, so a dbt project nested inside a
/// larger repository works the same as one at the repository root.
#[derive(Debug, Clone)]
pub struct GitCli {
    executable: String,
    work_dir: PathBuf,
}

impl GitCli {
    pub fn new(executable: impl Into<String>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            work_dir: work_dir.into(),
        }
    }

    fn args(raw: &[&str]) -> Vec<String> {
        let mut args = vec!["-c".to_string(), "core.quotepath=off".to_string()];
        args.extend(raw.iter().map(|a| a.to_string()));
        args
    }
}

#[async_trait]
impl VersionControl for GitCli {
    async fn resolve_revision(&self, revision: &str) -> ExecResult<String> {
        let spec = format!("{}^{{commit}}", revision);
        let args = Self::args(&["rev-parse", "--verify", "--quiet", spec.as_str()]);
        let output = capture(&self.executable, &args, &self.work_dir).await?;
        if !output.status.success() {
            let stderr = stderr_text(&output);
            return Err(ExecError::UnknownRevision {
                revision: revision.to_string(),
                stderr: if stderr.is_empty() {
                    "not a commit in this repository".to_string()
                } else {
                    stderr
                },
            });
        }
        Ok(stdout_text(&self.executable, &output)?.trim().to_string())
    }

    async fn changed_files(
        &self,
        base: &str,
        head: &str,
        dirs: &[String],
    ) -> ExecResult<Vec<String>> {
        let mut raw = vec![
            "diff",
            "--name-only",
            "--relative",
            "--no-renames",
            "--diff-filter=AM",
            base,
            head,
            "--",
        ];
        raw.extend(dirs.iter().map(String::as_str));
        let args = Self::args(&raw);

        let output = capture(&self.executable, &args, &self.work_dir).await?;
        if !output.status.success() {
            return Err(ExecError::Git {
                args: raw.join(" "),
                stderr: stderr_text(&output),
            });
        }

        let mut files: Vec<String> = stdout_text(&self.executable, &output)?
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();
        files.sort();
        files.dedup();
        Ok(files)
    }

    async fn blob_exists(&self, revision: &str, path: &str) -> ExecResult<bool> {
        let object = format!("{}:./{}", revision, path);
        let args = Self::args(&["cat-file", "-e", object.as_str()]);
        let output = capture(&self.executable, &args, &self.work_dir).await?;
        Ok(output.status.success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_disable_path_quoting() {
        let args = GitCli::args(&["diff", "--name-only"]);
        assert_eq!(args, vec!["-c", "core.quotepath=off", "diff", "--name-only"]);
    }

    /// Run git in `dir` for fixture setup, without user or system config.
    fn git(dir: &std::path::Path, args: &[&str]) {
        let status = std::process::Command::new("git")
            .args([
                "-c",
                "user.name=dbt-refresh",
                "-c",
                "user.email=dbt-refresh@example.com",
                "-c",
                "commit.gpgsign=false",
            ])
            .args(args)
            .current_dir(dir)
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .env("HOME", dir)
            .status()
            .unwrap();
        assert!(status.success(), "git {:?} failed", args);
    }

    fn write(path: &std::path::Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    /// A repository whose dbt project lives in `dbt/`, with two commits:
    /// the second modifies one model, adds one, deletes one and touches a
    /// seed outside the model directory.
    fn nested_project_repo() -> tempfile::TempDir {
        let repo = tempfile::tempdir().unwrap();
        let root = repo.path();
        git(root, &["init", "-q"]);

        write(&root.join("dbt/models/mart/orders.sql"), "select 1 as id\n");
        write(&root.join("dbt/models/mart/legacy.sql"), "select 2 as id\n");
        write(&root.join("README.md"), "analytics\n");
        git(root, &["add", "-A"]);
        git(root, &["commit", "-q", "-m", "initial models"]);

        write(&root.join("dbt/models/mart/orders.sql"), "select 1 as id, 2 as amount\n");
        write(&root.join("dbt/models/mart/new model.sql"), "select 3 as id\n");
        write(&root.join("dbt/seeds/countries.csv"), "code\nNL\n");
        std::fs::remove_file(root.join("dbt/models/mart/legacy.sql")).unwrap();
        git(root, &["add", "-A"]);
        git(root, &["commit", "-q", "-m", "rework mart"]);

        repo
    }

    fn git_available() -> bool {
        std::process::Command::new("git")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    #[tokio::test]
    async fn test_queries_against_nested_project() {
        if !git_available() {
            eprintln!("git not installed; skipping");
            return;
        }
        let repo = nested_project_repo();
        let git = GitCli::new("git", repo.path().join("dbt"));

        let head = git.resolve_revision("HEAD").await.unwrap();
        let base = git.resolve_revision("HEAD~1").await.unwrap();
        assert_eq!(head.len(), 40);
        assert_ne!(head, base);

        let changed = git
            .changed_files(&base, &head, &["models".to_string()])
            .await
            .unwrap();
        assert_eq!(
            changed,
            vec!["models/mart/new model.sql", "models/mart/orders.sql"]
        );

        assert!(git.blob_exists(&base, "models/mart/orders.sql").await.unwrap());
        assert!(!git.blob_exists(&base, "models/mart/new model.sql").await.unwrap());
        assert!(git.blob_exists(&head, "models/mart/new model.sql").await.unwrap());
    }

    #[tokio::test]
    async fn test_revision_past_root_is_unknown() {
        if !git_available() {
            eprintln!("git not installed; skipping");
            return;
        }
        let repo = nested_project_repo();
        let git = GitCli::new("git", repo.path().join("dbt"));

        let err = git.resolve_revision("HEAD~2").await.unwrap_err();
        assert!(matches!(err, ExecError::UnknownRevision { ref revision, .. } if revision == "HEAD~2"));
    }

    #[tokio::test]
    async fn test_missing_git_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let git = GitCli::new("definitely-not-git-xyz", dir.path());
        let err = git.resolve_revision("HEAD").await.unwrap_err();
        assert!(matches!(err, ExecError::Spawn { .. }));
    }
}
