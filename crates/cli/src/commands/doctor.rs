//! `coralink doctor` — report on the environment without connecting.

use coralink_config::{Settings, VarStatus};

pub fn run() -> anyhow::Result<()> {
    println!("Coralink doctor\n");

    for line in coralink_config::env_report() {
        match (&line.status, line.required) {
            (VarStatus::Set(value), false) => println!("  set      {}={value}", line.var),
            (VarStatus::Set(_), true) => println!("  ok       {}", line.var),
            (VarStatus::SetSecret, _) => println!("  ok       {} (value not shown)", line.var),
            (VarStatus::Missing, true) => println!("  MISSING  {} (required)", line.var),
            (VarStatus::Missing, false) => println!("  default  {}", line.var),
        }
    }

    println!();
    match Settings::from_env() {
        Ok(settings) => {
            println!("Configuration is valid:");
            println!("{settings:#?}");
            Ok(())
        }
        Err(e) => {
            println!("Configuration error: {e}");
            Err(e.into())
        }
    }
}
