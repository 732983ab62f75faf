//! Plan Builder: typed dbt invocations and the refresh plan.
//!
//! Commands are kept as structured values and only rendered to an argument
//! list at the process boundary, so selectors and patterns are never pasted
//! into a shell string.

use std::fmt;

use crate::model_name::ModelName;

/// dbt sub-commands the planner issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbtSubcommand {
    /// `dbt compile`, used to produce a manifest
    Compile,
    /// `dbt build`: run and test selected resources
    Build,
}

impl DbtSubcommand {
    pub fn as_str(self) -> &'static str {
        match self {
            DbtSubcommand::Compile => "compile",
            DbtSubcommand::Build => "build",
        }
    }
}

/// Pass-through modifiers applied to every command of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Profile target (`--target`)
    pub target: Option<String>,
    /// Exclusion selector (`--exclude`)
    pub exclude: Option<String>,
}

/// A single dbt invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbtCommand {
    subcommand: DbtSubcommand,
    select: Vec<ModelName>,
    exclude: Option<String>,
    target: Option<String>,
    full_refresh: bool,
}

impl DbtCommand {
    fn new(subcommand: DbtSubcommand) -> Self {
        Self {
            subcommand,
            select: Vec::new(),
            exclude: None,
            target: None,
            full_refresh: false,
        }
    }

    /// `dbt compile` with the run's target. Exclusions are not applied so the
    /// manifest covers the whole project.
    pub fn compile(modifiers: &Modifiers) -> Self {
        let mut cmd = Self::new(DbtSubcommand::Compile);
        cmd.target = modifiers.target.clone();
        cmd
    }

    /// `dbt build` with the run's target and exclusions.
    pub fn build(modifiers: &Modifiers) -> Self {
        let mut cmd = Self::new(DbtSubcommand::Build);
        cmd.target = modifiers.target.clone();
        cmd.exclude = modifiers.exclude.clone();
        cmd
    }

    /// Restrict the command to `models`, joined into one comma-separated
    /// selector in the given order.
    pub fn select(mut self, models: &[ModelName]) -> Self {
        self.select = models.to_vec();
        self
    }

    pub fn full_refresh(mut self, full_refresh: bool) -> Self {
        self.full_refresh = full_refresh;
        self
    }

    /// Comma-joined selector, if any models are selected.
    pub fn selector(&self) -> Option<String> {
        if self.select.is_empty() {
            return None;
        }
        Some(
            self.select
                .iter()
                .map(ModelName::as_str)
                .collect::<Vec<_>>()
                .join(","),
        )
    }

    /// Argument list for the dbt executable (sub-command first).
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![self.subcommand.as_str().to_string()];
        if let Some(selector) = self.selector() {
            args.push("--select".to_string());
            args.push(selector);
        }
        if self.full_refresh {
            args.push("--full-refresh".to_string());
        }
        if let Some(target) = &self.target {
            args.push("--target".to_string());
            args.push(target.clone());
        }
        if let Some(exclude) = &self.exclude {
            args.push("--exclude".to_string());
            args.push(exclude.clone());
        }
        args
    }
}

impl fmt::Display for DbtCommand {
    /// Shell-style rendering for logs and the run report.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("dbt")?;
        for arg in self.args() {
            write!(f, " {}", shell_quote(&arg))?;
        }
        Ok(())
    }
}

fn shell_quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_.,:/+=@".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

/// The ordered commands of a refresh run.
///
/// Built once from the audited models and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshPlan {
    refresh: DbtCommand,
    build_rest: Option<DbtCommand>,
}

impl RefreshPlan {
    /// Build the plan for `models`.
    ///
    /// Returns `None` when there is nothing to refresh. The trailing
    /// full-project build is included only when `build_rest` is set.
    pub fn new(models: &[ModelName], modifiers: &Modifiers, build_rest: bool) -> Option<Self> {
        if models.is_empty() {
            return None;
        }
        let refresh = DbtCommand::build(modifiers)
            .select(models)
            .full_refresh(true);
        let build_rest = build_rest.then(|| DbtCommand::build(modifiers));
        Some(Self {
            refresh,
            build_rest,
        })
    }

    /// The combined full-refresh command.
    pub fn refresh(&self) -> &DbtCommand {
        &self.refresh
    }

    /// The optional full-project build.
    pub fn build_rest(&self) -> Option<&DbtCommand> {
        self.build_rest.as_ref()
    }
}

#[cfg(test)]
#[path = "plan_test.rs"]
mod tests;
