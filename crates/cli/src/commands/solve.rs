//! `coralink solve` — run the local solver once, no session needed.

pub fn run(problem: &str) -> anyhow::Result<()> {
    println!("{}", coralink_solver::solve(problem));
    Ok(())
}
