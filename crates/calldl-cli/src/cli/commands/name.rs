//! `calldl name` – preview a destination file name.

use anyhow::Result;
use calldl_core::config::{CollisionPolicy, NamePolicy};
use calldl_core::reconcile::{title_case, Reconciler};

pub fn run_name(name: &str, time: &str, surname_last: bool) -> Result<()> {
    println!("{}", preview(name, time, surname_last)?);
    Ok(())
}

fn preview(name: &str, time: &str, surname_last: bool) -> Result<String> {
    let policy = if surname_last {
        NamePolicy::SurnameLast
    } else {
        NamePolicy::Strict
    };
    let reconciler = Reconciler::new(".", ".", "wav", CollisionPolicy::Suffix, policy);
    let plan = reconciler.plan(&title_case(name.trim()), time)?;
    Ok(plan.file_name)
}
